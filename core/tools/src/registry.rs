//! Enumeration and filtering of registered tools (spec §4.6).

use std::collections::HashMap;
use std::sync::Arc;

use relay_protocol::SecurityLevel;
use relay_protocol::ToolCategory;

use crate::error::Result;
use crate::error::tool_error::UnknownToolSnafu;
use crate::tool::Tool;

/// Effectively immutable after startup (spec §5 "Locks").
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: HashMap::new() }
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.info().id.clone(), tool);
    }

    pub fn get(&self, tool_id: &str) -> Result<Arc<dyn Tool>> {
        self.tools.get(tool_id).cloned().ok_or_else(|| UnknownToolSnafu { tool_id: tool_id.to_string() }.build())
    }

    pub fn all(&self) -> Vec<Arc<dyn Tool>> {
        self.tools.values().cloned().collect()
    }

    pub fn by_category(&self, category: ToolCategory) -> Vec<Arc<dyn Tool>> {
        self.tools.values().filter(|t| t.info().category == category).cloned().collect()
    }

    pub fn by_max_security_level(&self, max: SecurityLevel) -> Vec<Arc<dyn Tool>> {
        self.tools.values().filter(|t| t.info().security_level <= max).cloned().collect()
    }

    /// Enabled-by-default tools compatible with `model_id`, honoring each
    /// tool's allow/deny list (spec §4.6 `supportedByModels`/
    /// `unsupportedByModels`).
    pub fn available_for_model(&self, model_id: &str) -> Vec<Arc<dyn Tool>> {
        self.tools
            .values()
            .filter(|t| t.info().enabled_by_default && t.info().compatible_with_model(model_id))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
#[path = "registry.test.rs"]
mod tests;
