//! Named collection of tools and function-call dispatch.

use std::sync::Arc;

use tracing::{debug, warn};

use super::arguments::ToolArguments;
use super::tool::{Tool, ToolExecutionContext};
use super::validation::validate_arguments;
use crate::provider::ToolDefinition;
use crate::types::{AgentToolCall, AgentToolResult};

/// The function map an agent exposes to its model.
#[derive(Clone, Default)]
pub struct ToolSet {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool; a later tool with the same name replaces the earlier one.
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.retain(|t| t.name() != tool.name());
        self.tools.push(tool);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Function contracts for the provider request, `None` when empty.
    pub fn definitions(&self) -> Option<Vec<ToolDefinition>> {
        if self.tools.is_empty() {
            None
        } else {
            Some(self.tools.iter().map(|t| t.definition()).collect())
        }
    }

    /// Run one model-requested call.
    ///
    /// Unknown tools, schema violations and tool failures come back as an
    /// error result rather than an `Err`, so the conversation can continue.
    pub async fn dispatch(&self, call: &AgentToolCall, ctx: &ToolExecutionContext) -> AgentToolResult {
        let Some(tool) = self.get(&call.name) else {
            warn!(tool = %call.name, "Tool not found");
            return error_result(call, format!("Tool '{}' not found", call.name));
        };

        let args = ToolArguments::new(call.arguments.clone());
        if let Err(e) = validate_arguments(args.raw(), &tool.parameters().schema) {
            warn!(tool = %call.name, error = %e, "Tool arguments rejected");
            return error_result(call, e.to_string());
        }

        debug!(tool = %call.name, call_id = %call.id, "Executing tool");
        match tool.execute(&args, ctx).await {
            Ok(result) => AgentToolResult {
                tool_call_id: call.id.clone(),
                result,
                is_error: false,
            },
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool execution failed");
                error_result(call, e.to_string())
            }
        }
    }
}

impl std::fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.tools.iter().map(|t| t.name()))
            .finish()
    }
}

fn error_result(call: &AgentToolCall, message: String) -> AgentToolResult {
    AgentToolResult {
        tool_call_id: call.id.clone(),
        result: serde_json::json!({ "error": message }),
        is_error: true,
    }
}
