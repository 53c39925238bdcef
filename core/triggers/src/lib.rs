//! Trigger layer: context-usage and resource-pressure rules evaluated
//! before every turn, producing system messages and session flag patches
//! (spec §4.9).

pub mod builtin;
pub mod layer;
pub mod trigger;

pub use builtin::ContextUsageTrigger;
pub use builtin::ResourcePressureTrigger;
pub use layer::TriggerLayer;
pub use layer::TriggerLayerResult;
pub use trigger::Trigger;
pub use trigger::TriggerContext;
pub use trigger::TriggerOutcome;
