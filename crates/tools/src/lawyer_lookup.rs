//! Lawyer record tools: filtered search and the full roster listing.

use async_trait::async_trait;
use std::sync::Arc;
use tenderdesk_core::error::ToolError;
use tenderdesk_core::tool::{ParamType, Tool, ToolParameter, ToolSpec};

use crate::store::RecordStore;

pub struct LawyerSearchTool {
    store: Arc<RecordStore>,
    spec: ToolSpec,
}

impl LawyerSearchTool {
    pub fn new(store: Arc<RecordStore>) -> Self {
        let spec = ToolSpec::builder(
            "search_lawyers",
            "Search staff lawyers by name or license number",
        )
        .category("lawyers")
        .param(ToolParameter::optional(
            "name",
            ParamType::String,
            "Lawyer name (fuzzy match)",
        ))
        .param(ToolParameter::optional(
            "license_no",
            ParamType::String,
            "Practice license number (exact match)",
        ))
        .build();
        Self { store, spec }
    }
}

#[async_trait]
impl Tool for LawyerSearchTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn call(
        &self,
        params: serde_json::Value,
    ) -> std::result::Result<serde_json::Value, ToolError> {
        let results = self
            .store
            .search_lawyers(params["name"].as_str(), params["license_no"].as_str());
        Ok(serde_json::json!({
            "count": results.len(),
            "lawyers": results,
        }))
    }
}

pub struct LawyerListTool {
    store: Arc<RecordStore>,
    spec: ToolSpec,
}

impl LawyerListTool {
    pub fn new(store: Arc<RecordStore>) -> Self {
        let spec = ToolSpec::builder("list_lawyers", "List all staff lawyers")
            .category("lawyers")
            .build();
        Self { store, spec }
    }
}

#[async_trait]
impl Tool for LawyerListTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn call(
        &self,
        _params: serde_json::Value,
    ) -> std::result::Result<serde_json::Value, ToolError> {
        let lawyers = self.store.all_lawyers();
        Ok(serde_json::json!({
            "count": lawyers.len(),
            "lawyers": lawyers,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Arc<RecordStore> {
        Arc::new(RecordStore::with_sample_data())
    }

    #[tokio::test]
    async fn search_by_name() {
        let tool = LawyerSearchTool::new(store());
        let result = tool.call(serde_json::json!({"name": "raman"})).await.unwrap();
        assert_eq!(result["count"], 1);
        assert_eq!(result["lawyers"][0]["specialty"], "energy contracts");
    }

    #[tokio::test]
    async fn search_without_filters_returns_all() {
        let tool = LawyerSearchTool::new(store());
        let result = tool.call(serde_json::json!({})).await.unwrap();
        assert_eq!(result["count"], 5);
    }

    #[tokio::test]
    async fn list_returns_roster() {
        let tool = LawyerListTool::new(store());
        let result = tool.call(serde_json::json!({})).await.unwrap();
        assert_eq!(result["count"], 5);
        assert_eq!(result["lawyers"].as_array().unwrap().len(), 5);
    }
}
