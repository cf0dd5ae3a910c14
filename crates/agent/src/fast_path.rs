//! Fast-path matcher: catalog-style questions answered without planning.
//!
//! A handful of questions ("list all lawyers", "contract statistics")
//! map to exactly one tool invocation with fixed parameters. The matcher
//! recognizes those by keyword and the runner answers from the tool
//! result directly, skipping the planner entirely. A miss, or a failed
//! invocation, falls through to the normal loop unchanged.

use tenderdesk_core::tool::ToolInvocationResult;

/// One recognizable question shape and the invocation that answers it.
#[derive(Debug, Clone)]
pub struct FastRule {
    /// Rule name, for logging
    pub name: &'static str,

    /// Lowercase phrases; the rule fires if the task contains any
    triggers: &'static [&'static str],

    /// Tool to invoke
    pub tool: &'static str,

    /// Lead-in line for the rendered answer
    intro: &'static str,
}

impl FastRule {
    fn matches(&self, task_lower: &str) -> bool {
        self.triggers.iter().any(|t| task_lower.contains(t))
    }
}

/// The ordered rule set. First match wins.
#[derive(Debug, Clone)]
pub struct FastPath {
    rules: Vec<FastRule>,
}

impl FastPath {
    /// The standard rules for the record domains.
    pub fn standard() -> Self {
        Self {
            rules: vec![
                FastRule {
                    name: "lawyer_roster",
                    triggers: &[
                        "list all lawyers",
                        "all lawyers",
                        "lawyer roster",
                        "who are the lawyers",
                        "which lawyers",
                    ],
                    tool: "list_lawyers",
                    intro: "Here is the full lawyer roster:",
                },
                FastRule {
                    name: "contract_overview",
                    triggers: &[
                        "contract statistics",
                        "contract stats",
                        "how many contracts",
                        "contract overview",
                    ],
                    tool: "contract_stats",
                    intro: "Here is the contract portfolio overview:",
                },
                FastRule {
                    name: "enterprise_roster",
                    triggers: &[
                        "list all enterprises",
                        "all enterprises",
                        "list all clients",
                        "all client enterprises",
                    ],
                    tool: "search_enterprises",
                    intro: "Here are all client enterprises on record:",
                },
            ],
        }
    }

    /// An empty rule set (fast path disabled).
    pub fn disabled() -> Self {
        Self { rules: Vec::new() }
    }

    /// The first rule matching this task, if any. Matching is
    /// case-insensitive and purely lexical.
    pub fn matches(&self, task: &str) -> Option<&FastRule> {
        let task_lower = task.to_lowercase();
        self.rules.iter().find(|r| r.matches(&task_lower))
    }

    /// Render the final answer from a successful invocation.
    pub fn render_answer(&self, rule: &FastRule, outcome: &ToolInvocationResult) -> String {
        let payload = outcome
            .result
            .as_ref()
            .map(|r| serde_json::to_string_pretty(r).unwrap_or_else(|_| r.to_string()))
            .unwrap_or_default();
        format!("{}\n{}", rule.intro, payload)
    }
}
