//! Aggregate conversation context (spec §4.7).
//!
//! Combines the runtime environment, the token budget, and the tool/memory
//! inventory into a single value the [`crate::assembler`] prompt builder
//! consults when assembling a turn's model-facing messages.

use serde::Deserialize;
use serde::Serialize;

use crate::budget::ContextBudget;
use crate::environment::EnvironmentInfo;

/// A memory file loaded into context (e.g. a project's `AGENTS.md`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryFile {
    /// File path (relative or display name).
    pub path: String,
    /// File content.
    pub content: String,
    /// Priority for ordering (lower = higher priority).
    pub priority: i32,
}

/// Content injected into the system prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextInjection {
    /// Label for this injection.
    pub label: String,
    /// Content to inject.
    pub content: String,
    /// Where to inject this content.
    pub position: InjectionPosition,
}

/// Position for injected content in the system prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectionPosition {
    /// Before tool definitions section.
    BeforeTools,
    /// After tool definitions section.
    AfterTools,
    /// At the end of the prompt.
    EndOfPrompt,
}

/// Aggregate conversation context for prompt generation.
#[derive(Debug, Clone)]
pub struct ConversationContext {
    /// Runtime environment information.
    pub environment: EnvironmentInfo,
    /// Token budget tracker.
    pub budget: ContextBudget,
    /// Available tool names (spec §4.6 Tool Registry).
    pub tool_names: Vec<String>,
    /// Connected MCP server names (tools whose `source` is `mcp`).
    pub mcp_server_names: Vec<String>,
    /// Loaded memory files.
    pub memory_files: Vec<MemoryFile>,
    /// Prompt injections.
    pub injections: Vec<ContextInjection>,
}

impl ConversationContext {
    /// Create a builder for constructing conversation context.
    pub fn builder() -> ConversationContextBuilder {
        ConversationContextBuilder::default()
    }

    /// Check if any MCP servers are connected.
    pub fn has_mcp_servers(&self) -> bool {
        !self.mcp_server_names.is_empty()
    }

    /// Check if any tools are available.
    pub fn has_tools(&self) -> bool {
        !self.tool_names.is_empty()
    }
}

/// Builder for [`ConversationContext`].
#[derive(Debug, Default)]
pub struct ConversationContextBuilder {
    environment: Option<EnvironmentInfo>,
    budget: Option<ContextBudget>,
    tool_names: Vec<String>,
    mcp_server_names: Vec<String>,
    memory_files: Vec<MemoryFile>,
    injections: Vec<ContextInjection>,
}

impl ConversationContextBuilder {
    pub fn environment(mut self, env: EnvironmentInfo) -> Self {
        self.environment = Some(env);
        self
    }

    pub fn budget(mut self, budget: ContextBudget) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn tool_names(mut self, names: Vec<String>) -> Self {
        self.tool_names = names;
        self
    }

    pub fn mcp_server_names(mut self, names: Vec<String>) -> Self {
        self.mcp_server_names = names;
        self
    }

    pub fn memory_files(mut self, files: Vec<MemoryFile>) -> Self {
        self.memory_files = files;
        self
    }

    pub fn injections(mut self, injections: Vec<ContextInjection>) -> Self {
        self.injections = injections;
        self
    }

    /// Build the [`ConversationContext`].
    ///
    /// Returns `Err` if required fields are missing.
    pub fn build(self) -> crate::error::Result<ConversationContext> {
        let environment = self.environment.ok_or_else(|| {
            crate::error::context_error::BuildSnafu {
                message: "environment is required",
            }
            .build()
        })?;

        let budget = self.budget.unwrap_or_else(|| {
            ContextBudget::new(environment.context_window, environment.max_output_tokens)
        });

        Ok(ConversationContext {
            environment,
            budget,
            tool_names: self.tool_names,
            mcp_server_names: self.mcp_server_names,
            memory_files: self.memory_files,
            injections: self.injections,
        })
    }
}

#[cfg(test)]
#[path = "conversation_context.test.rs"]
mod tests;
