//! Tool system for function calling.

pub mod arguments;
pub mod image_generation;
pub mod set;
pub mod tool;
pub mod types;
pub mod validation;

pub use arguments::ToolArguments;
pub use image_generation::{ImageGenerationTool, GENERATE_IMAGE_TOOL};
pub use set::ToolSet;
pub use tool::{Tool, ToolExecutionContext};
pub use types::AgentToolParameters;
