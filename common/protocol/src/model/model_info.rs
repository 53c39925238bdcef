//! The catalog entry for a single model (spec §4.4).

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use super::ReasoningEffort;
use crate::ProviderType;

/// A capability a model may support on its input or output side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Text,
    Image,
    Video,
    Audio,
    File,
    Tools,
}

/// The set of capabilities a model supports in one direction (input or
/// output).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet {
    #[serde(default)]
    pub text: bool,
    #[serde(default)]
    pub image: bool,
    #[serde(default)]
    pub video: bool,
    #[serde(default)]
    pub audio: bool,
    #[serde(default)]
    pub file: bool,
    #[serde(default)]
    pub tools: bool,
}

impl CapabilitySet {
    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Text => self.text,
            Capability::Image => self.image,
            Capability::Video => self.video,
            Capability::Audio => self.audio,
            Capability::File => self.file,
            Capability::Tools => self.tools,
        }
    }
}

/// Whether and how a model supports extended reasoning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasoningSupport {
    #[default]
    No,
    Yes,
    Auto,
}

/// Catalog lifecycle state of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelStatus {
    #[default]
    Active,
    Deprecated,
    Beta,
}

/// Optional per-token pricing, in USD per million tokens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub input_per_million: f64,
    pub output_per_million: f64,
}

/// A catalog entry describing one model offered by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Opaque catalog id, stable across restarts (e.g. `"anthropic/claude-opus-4"`).
    pub id: String,
    pub provider_id: String,
    pub provider_type: ProviderType,
    pub display_name: String,
    /// Groups sibling variants of the same underlying model line (e.g.
    /// `"claude-opus"` for `claude-opus-4`/`claude-opus-4-1`), so callers can
    /// resolve "the fast model for this provider" without hardcoding ids.
    /// Defaults to `id` when a catalog entry doesn't set it explicitly.
    #[serde(default)]
    pub family: String,
    /// Relative speed/cost rank within a family; lower is faster/cheaper.
    #[serde(default)]
    pub speed_rank: u8,
    pub input_capabilities: CapabilitySet,
    pub output_capabilities: CapabilitySet,
    pub max_context: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<Pricing>,
    #[serde(default)]
    pub reasoning: ReasoningSupport,
    /// Reasoning efforts this model actually accepts, used by
    /// [`ModelInfo::nearest_supported_effort`]. Empty when `reasoning` is
    /// [`ReasoningSupport::No`].
    #[serde(default)]
    pub supported_efforts: Vec<ReasoningEffort>,
    #[serde(default)]
    pub status: ModelStatus,
    /// Per-provider free-form options, passed through to `openCompletion`.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub options: HashMap<String, serde_json::Value>,
}

impl ModelInfo {
    pub fn supports_input(&self, capability: Capability) -> bool {
        self.input_capabilities.supports(capability)
    }

    pub fn supports_output(&self, capability: Capability) -> bool {
        self.output_capabilities.supports(capability)
    }

    /// The nearest reasoning effort this model actually supports, used when
    /// a caller requests an effort level the model doesn't offer.
    pub fn nearest_effort(&self, requested: ReasoningEffort, supported: &[ReasoningEffort]) -> ReasoningEffort {
        if matches!(self.reasoning, ReasoningSupport::No) {
            return ReasoningEffort::None;
        }
        super::nearest_effort(requested, supported)
    }

    /// Same as [`ModelInfo::nearest_effort`], using this model's own
    /// `supported_efforts` instead of a caller-supplied list.
    pub fn nearest_supported_effort(&self, requested: ReasoningEffort) -> ReasoningEffort {
        self.nearest_effort(requested, &self.supported_efforts)
    }

    /// The family this model belongs to, defaulting to its own id for
    /// catalog entries that never set `family` explicitly.
    pub fn family_id(&self) -> &str {
        if self.family.is_empty() { &self.id } else { &self.family }
    }
}

#[cfg(test)]
#[path = "model_info.test.rs"]
mod tests;
