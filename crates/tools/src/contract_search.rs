//! Contract record tools: search, detail lookup, and statistics.
//!
//! These wrap the record store's contract domain. All filters are
//! optional; the planner combines them as the question requires.

use async_trait::async_trait;
use std::sync::Arc;
use tenderdesk_core::error::ToolError;
use tenderdesk_core::tool::{ParamType, Tool, ToolParameter, ToolSpec};

use crate::store::{ContractFilter, RecordStore};

pub struct ContractSearchTool {
    store: Arc<RecordStore>,
    spec: ToolSpec,
}

impl ContractSearchTool {
    pub fn new(store: Arc<RecordStore>) -> Self {
        let spec = ToolSpec::builder(
            "search_contracts",
            "Search performance contracts, filterable by client, category, amount, recency, and keyword",
        )
        .category("contracts")
        .param(ToolParameter::optional(
            "client",
            ParamType::String,
            "Client name (fuzzy match)",
        ))
        .param(ToolParameter::optional(
            "category",
            ParamType::String,
            "Contract category: advisory, agency, or other",
        ))
        .param(ToolParameter::optional(
            "min_amount",
            ParamType::Number,
            "Minimum contract amount (thousands)",
        ))
        .param(ToolParameter::optional(
            "max_amount",
            ParamType::Number,
            "Maximum contract amount (thousands)",
        ))
        .param(ToolParameter::optional(
            "years",
            ParamType::Integer,
            "Only contracts signed within the last N years",
        ))
        .param(ToolParameter::optional(
            "keyword",
            ParamType::String,
            "Free-text search over title, summary, and client",
        ))
        .build();
        Self { store, spec }
    }
}

#[async_trait]
impl Tool for ContractSearchTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn call(
        &self,
        params: serde_json::Value,
    ) -> std::result::Result<serde_json::Value, ToolError> {
        let filter = ContractFilter {
            client: params["client"].as_str().map(String::from),
            category: params["category"].as_str().map(String::from),
            min_amount: params["min_amount"].as_f64(),
            max_amount: params["max_amount"].as_f64(),
            years: params["years"].as_i64().map(|y| y as i32),
            keyword: params["keyword"].as_str().map(String::from),
        };

        let results = self.store.search_contracts(&filter);
        Ok(serde_json::json!({
            "count": results.len(),
            "contracts": results,
        }))
    }
}

pub struct ContractDetailTool {
    store: Arc<RecordStore>,
    spec: ToolSpec,
}

impl ContractDetailTool {
    pub fn new(store: Arc<RecordStore>) -> Self {
        let spec = ToolSpec::builder(
            "get_contract_detail",
            "Get the full record for one performance contract by its ID",
        )
        .category("contracts")
        .param(ToolParameter::required(
            "contract_id",
            ParamType::Integer,
            "The contract record ID",
        ))
        .build();
        Self { store, spec }
    }
}

#[async_trait]
impl Tool for ContractDetailTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn call(
        &self,
        params: serde_json::Value,
    ) -> std::result::Result<serde_json::Value, ToolError> {
        let id = params["contract_id"]
            .as_u64()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'contract_id' argument".into()))?
            as u32;

        Ok(match self.store.contract_by_id(id) {
            Some(contract) => serde_json::json!({ "found": true, "contract": contract }),
            None => serde_json::json!({
                "found": false,
                "message": format!("No contract record with id {id}"),
            }),
        })
    }
}

pub struct ContractStatsTool {
    store: Arc<RecordStore>,
    spec: ToolSpec,
}

impl ContractStatsTool {
    pub fn new(store: Arc<RecordStore>) -> Self {
        let spec = ToolSpec::builder(
            "contract_stats",
            "Aggregate statistics over all performance contracts: total count, total amount, per-category counts",
        )
        .category("contracts")
        .build();
        Self { store, spec }
    }
}

#[async_trait]
impl Tool for ContractStatsTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn call(
        &self,
        _params: serde_json::Value,
    ) -> std::result::Result<serde_json::Value, ToolError> {
        let stats = self.store.contract_stats();
        serde_json::to_value(&stats).map_err(|e| ToolError::ExecutionFailed {
            tool_name: "contract_stats".into(),
            reason: e.to_string(),
        })
    }
}
