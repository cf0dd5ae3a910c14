//! Tool trait, catalog metadata, and the registry.
//!
//! Tools are the capabilities the planner can invoke: record search,
//! detail lookup, statistics. Each tool declares a `ToolSpec` beside its
//! implementation (builder pattern — no runtime reflection), and the
//! registry renders the catalog for the planner prompt, answers
//! machine-readable listings, and dispatches invocations by name.
//!
//! The invoke contract: `ToolRegistry::invoke` never lets a tool fault
//! escape. An unknown name or a failing callable both come back as a
//! `ToolInvocationResult` with `success == false`, which the loop feeds
//! back to the planner as an observation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use crate::error::ToolError;

/// Semantic type tag for a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
    Any,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Any => "any",
        }
    }
}

/// One declared parameter of a tool. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name, unique within its tool
    pub name: String,

    /// Semantic type tag
    #[serde(rename = "type")]
    pub param_type: ParamType,

    /// Human description, shown to the planner
    #[serde(default)]
    pub description: String,

    /// Whether the planner must supply this parameter
    #[serde(default)]
    pub required: bool,

    /// Default value for optional parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl ToolParameter {
    /// A required parameter (no default value).
    pub fn required(
        name: impl Into<String>,
        param_type: ParamType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: description.into(),
            required: true,
            default: None,
        }
    }

    /// An optional parameter without a default.
    pub fn optional(
        name: impl Into<String>,
        param_type: ParamType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: description.into(),
            required: false,
            default: None,
        }
    }

    /// Attach a default value (implies optional).
    pub fn with_default(mut self, default: serde_json::Value) -> Self {
        self.required = false;
        self.default = Some(default);
        self
    }
}

/// The static description of one tool: name, purpose, category, and
/// ordered parameter list. Built once, never mutated after registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub category: String,
    pub parameters: Vec<ToolParameter>,
}

impl ToolSpec {
    /// Start building a spec. Category defaults to "general".
    pub fn builder(name: impl Into<String>, description: impl Into<String>) -> ToolSpecBuilder {
        ToolSpecBuilder {
            spec: ToolSpec {
                name: name.into(),
                description: description.into(),
                category: "general".into(),
                parameters: Vec::new(),
            },
        }
    }

    /// Render this spec as one prompt entry: a headline plus one
    /// indented line per parameter, required ones marked with `*`.
    pub fn to_prompt_string(&self) -> String {
        let mut out = format!("- **{}**: {}", self.name, self.description);
        for p in &self.parameters {
            let req_mark = if p.required { "*" } else { "" };
            out.push_str(&format!(
                "\n    - {}{} ({}): {}",
                p.name,
                req_mark,
                p.param_type.as_str(),
                p.description
            ));
        }
        out
    }
}

/// Builder for [`ToolSpec`], used beside each tool implementation.
pub struct ToolSpecBuilder {
    spec: ToolSpec,
}

impl ToolSpecBuilder {
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.spec.category = category.into();
        self
    }

    pub fn param(mut self, parameter: ToolParameter) -> Self {
        self.spec.parameters.push(parameter);
        self
    }

    pub fn build(self) -> ToolSpec {
        self.spec
    }
}

/// The core Tool trait.
///
/// Each capability implements this trait and is registered in the
/// ToolRegistry, which exclusively owns it. The callable receives named
/// parameters as a JSON object and returns a JSON payload.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The static spec for this tool (built once at construction).
    fn spec(&self) -> &ToolSpec;

    /// Execute the tool with the given named parameters.
    async fn call(&self, params: serde_json::Value)
    -> std::result::Result<serde_json::Value, ToolError>;

    /// The unique name of this tool.
    fn name(&self) -> &str {
        &self.spec().name
    }

    /// What this tool does (shown to the planner).
    fn description(&self) -> &str {
        &self.spec().description
    }
}

/// The outcome of one tool invocation: exactly one of result or error.
/// Produced fresh on every call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocationResult {
    pub tool_name: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolInvocationResult {
    pub fn ok(tool_name: impl Into<String>, result: serde_json::Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn fail(tool_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }
}

/// The process-wide tool lookup table.
///
/// Registration happens once at startup (`&mut self`); afterwards the
/// registry moves behind an `Arc` and is shared read-only by concurrent
/// runs. No hidden global — the registry instance is passed into the
/// orchestration loop at construction time.
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Overwrites (with a warning) any existing tool
    /// with the same name; never fails.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            warn!(tool = %name, "tool already registered, overwriting");
        } else {
            debug!(tool = %name, "tool registered");
        }
        self.tools.insert(name, tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// List registered tools, optionally filtered by category,
    /// ordered by name.
    pub fn list(&self, category: Option<&str>) -> Vec<&dyn Tool> {
        let mut tools: Vec<&dyn Tool> = self
            .tools
            .values()
            .map(|t| t.as_ref())
            .filter(|t| category.is_none_or(|c| t.spec().category == c))
            .collect();
        tools.sort_by_key(|t| t.name().to_string());
        tools
    }

    /// All registered tool names, ordered.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invoke a tool by name. Never raises: an unknown name or a tool
    /// fault is returned as a failed result for the planner to observe.
    pub async fn invoke(&self, name: &str, params: serde_json::Value) -> ToolInvocationResult {
        let Some(tool) = self.get(name) else {
            return ToolInvocationResult::fail(name, format!("tool '{name}' is not registered"));
        };

        match tool.call(params).await {
            Ok(payload) => ToolInvocationResult::ok(name, payload),
            Err(e) => ToolInvocationResult::fail(name, e.to_string()),
        }
    }

    /// Render the capability listing for inclusion in the planner's
    /// instructions: grouped by category, one entry per tool.
    pub fn describe_for_prompt(&self, category: Option<&str>) -> String {
        let tools = self.list(category);
        if tools.is_empty() {
            return "No tools are currently available.".into();
        }

        let mut by_category: BTreeMap<&str, Vec<&dyn Tool>> = BTreeMap::new();
        for tool in tools {
            by_category
                .entry(tool.spec().category.as_str())
                .or_default()
                .push(tool);
        }

        let mut lines = vec!["## Available tools".to_string()];
        for (cat, cat_tools) in by_category {
            lines.push(format!("\n### {cat}\n"));
            for tool in cat_tools {
                lines.push(tool.spec().to_prompt_string());
            }
        }
        lines.join("\n")
    }

    /// The same catalog as machine-readable records, ordered by name.
    pub fn describe_as_data(&self) -> Vec<ToolSpec> {
        self.list(None).iter().map(|t| t.spec().clone()).collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
