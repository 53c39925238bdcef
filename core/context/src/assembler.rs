//! The Context Assembler (spec §4.7): turns a session's persisted messages
//! into the ordered [`ModelMessage`] list a [`Provider`](relay_protocol)
//! adapter's `openCompletion` expects.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use relay_protocol::FileContent;
use relay_protocol::Message;
use relay_protocol::MessageRole;
use relay_protocol::MessageStatus;
use relay_protocol::ModelInfo;
use relay_protocol::Part;
use relay_protocol::model::Capability;

use crate::error::Result;
use crate::error::context_error::FileContentMissingSnafu;
use crate::error::context_error::InvalidConfigSnafu;
use crate::model_message::ContentPart;
use crate::model_message::ModelMessage;
use crate::system_status::render_system_status;
use crate::system_status::render_todo_context;

/// Read access to out-of-line file content, implemented by the Session
/// Store. Kept as a local trait so this crate doesn't depend on
/// `relay-session-store` (which depends on this crate's `ModelMessage`
/// output via the Streaming Engine).
pub trait FileContentSource {
    fn get_file_content(&self, id: &str) -> Option<FileContent>;
}

const TEXTUAL_MEDIA_TYPES: &[&str] = &[
    "application/json",
    "application/xml",
    "application/javascript",
    "application/x-yaml",
    "application/yaml",
];

fn is_textual(media_type: &str) -> bool {
    media_type.starts_with("text/") || TEXTUAL_MEDIA_TYPES.contains(&media_type)
}

fn is_image(media_type: &str) -> bool {
    media_type.starts_with("image/")
}

/// Builds the ordered model-facing prompt for one turn (spec §4.7).
pub struct ContextAssembler;

impl ContextAssembler {
    /// Assembles `messages` into the list `Provider::open_completion`
    /// consumes, honoring `model`'s input capabilities.
    pub fn assemble(
        messages: &[Message],
        model: &ModelInfo,
        file_source: &dyn FileContentSource,
    ) -> Result<Vec<ModelMessage>> {
        let mut out = Vec::with_capacity(messages.len());
        for message in messages {
            out.push(Self::assemble_message(message, model, file_source)?);
        }
        Ok(out)
    }

    fn assemble_message(
        message: &Message,
        model: &ModelInfo,
        file_source: &dyn FileContentSource,
    ) -> Result<ModelMessage> {
        let output_role = match message.role {
            // System-role session messages are lifted into model role
            // `user` to preserve attention decay semantics (spec §4.7).
            MessageRole::System => MessageRole::User,
            other => other,
        };

        let mut content = Vec::new();

        if matches!(message.role, MessageRole::User | MessageRole::System) {
            let snapshot = message.metadata.as_ref().and_then(|m| m.resource_snapshot);
            if let Some(snapshot) = snapshot {
                content.push(ContentPart::text(render_system_status(
                    message.created_at,
                    Some(snapshot),
                )));
            }
            if let Some(todos) = &message.todo_snapshot {
                if let Some(rendered) = render_todo_context(todos) {
                    content.push(ContentPart::text(rendered));
                }
            }
        }

        for step in &message.steps {
            for part in &step.parts {
                Self::assemble_part(part, message.role, model, file_source, &mut content)?;
            }
        }

        if matches!(message.status, MessageStatus::Abort) {
            content.push(ContentPart::text(
                "[This response was aborted by the user]",
            ));
        } else if matches!(message.status, MessageStatus::Error) {
            content.push(ContentPart::text(
                "[This response ended with an error]",
            ));
        }

        Ok(ModelMessage::new(output_role, content))
    }

    fn assemble_part(
        part: &Part,
        role: MessageRole,
        model: &ModelInfo,
        file_source: &dyn FileContentSource,
        out: &mut Vec<ContentPart>,
    ) -> Result<()> {
        match part {
            Part::Text { content, .. } => out.push(ContentPart::text(content.clone())),
            Part::Reasoning { content, .. } => out.push(ContentPart::Reasoning {
                text: content.clone(),
            }),
            Part::Error { error, .. } => out.push(ContentPart::text(format!("[Error: {error}]"))),
            Part::SystemMessage { content, .. } => out.push(ContentPart::text(content.clone())),
            Part::Tool {
                tool_id,
                name,
                input,
                result,
                error,
                ..
            } => {
                out.push(ContentPart::ToolCall {
                    tool_call_id: tool_id.clone(),
                    tool_name: name.clone(),
                    input: input.clone(),
                });
                if let Some(result) = result {
                    out.push(ContentPart::ToolResult {
                        tool_call_id: tool_id.clone(),
                        tool_name: name.clone(),
                        result: result.clone(),
                    });
                } else if let Some(error) = error {
                    out.push(ContentPart::ToolResult {
                        tool_call_id: tool_id.clone(),
                        tool_name: name.clone(),
                        result: serde_json::json!({ "error": error }),
                    });
                }
            }
            Part::File {
                relative_path,
                media_type,
                base64,
                ..
            } => {
                let bytes = BASE64.decode(base64).map_err(|e| {
                    InvalidConfigSnafu {
                        message: format!("malformed base64 in file part: {e}"),
                    }
                    .build()
                })?;
                Self::emit_file(role, relative_path, media_type, &bytes, model, out)?;
            }
            Part::FileRef {
                relative_path,
                media_type,
                file_content_id,
                ..
            } => {
                let file = file_source.get_file_content(file_content_id).ok_or_else(|| {
                    FileContentMissingSnafu {
                        file_content_id: file_content_id.clone(),
                    }
                    .build()
                })?;
                Self::emit_file(role, relative_path, media_type, &file.content, model, out)?;
            }
        }
        Ok(())
    }

    fn emit_file(
        role: MessageRole,
        relative_path: &str,
        media_type: &str,
        bytes: &[u8],
        model: &ModelInfo,
        out: &mut Vec<ContentPart>,
    ) -> Result<()> {
        let model_accepts_natively = if is_image(media_type) {
            model.supports_input(Capability::Image)
        } else {
            model.supports_input(Capability::File)
        };

        if matches!(role, MessageRole::Assistant) {
            // Assistant file parts represent generated artifacts (spec
            // §4.7): inline to the model only if it accepts images
            // natively, otherwise point at a materialized temp file.
            if is_image(media_type) && model_accepts_natively {
                out.push(ContentPart::File {
                    data: BASE64.encode(bytes),
                    media_type: media_type.to_string(),
                    filename: relative_path.to_string(),
                });
            } else {
                let path = write_temp_file(relative_path, bytes).map_err(|e| {
                    InvalidConfigSnafu {
                        message: format!("failed to materialize generated file: {e}"),
                    }
                    .build()
                })?;
                out.push(ContentPart::text(format!(
                    "[I generated an image and saved it to: {}]",
                    path.display()
                )));
            }
            return Ok(());
        }

        if model_accepts_natively {
            out.push(ContentPart::File {
                data: BASE64.encode(bytes),
                media_type: media_type.to_string(),
                filename: relative_path.to_string(),
            });
        } else if is_textual(media_type) {
            let text = String::from_utf8_lossy(bytes);
            out.push(ContentPart::text(format!(
                "<file path=\"{relative_path}\">{text}</file>"
            )));
        } else {
            out.push(ContentPart::text(format!(
                "<file path=\"{relative_path}\" type=\"{media_type}\" size=\"{}\">[Binary file content not shown]</file>",
                bytes.len()
            )));
        }
        Ok(())
    }
}

fn write_temp_file(relative_path: &str, bytes: &[u8]) -> std::io::Result<std::path::PathBuf> {
    let file_name = relative_path
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("generated");
    let dir = tempfile::Builder::new().prefix("relay-generated-").tempdir()?;
    let path = dir.keep().join(file_name);
    std::fs::write(&path, bytes)?;
    Ok(path)
}

#[cfg(test)]
#[path = "assembler.test.rs"]
mod tests;
