//! Enterprise record tools: filtered search and exact-name lookup.

use async_trait::async_trait;
use std::sync::Arc;
use tenderdesk_core::error::ToolError;
use tenderdesk_core::tool::{ParamType, Tool, ToolParameter, ToolSpec};

use crate::store::RecordStore;

pub struct EnterpriseSearchTool {
    store: Arc<RecordStore>,
    spec: ToolSpec,
}

impl EnterpriseSearchTool {
    pub fn new(store: Arc<RecordStore>) -> Self {
        let spec = ToolSpec::builder(
            "search_enterprises",
            "Search client enterprises by name keyword, industry, or state ownership",
        )
        .category("enterprises")
        .param(ToolParameter::optional(
            "name_keyword",
            ParamType::String,
            "Enterprise name keyword (fuzzy match)",
        ))
        .param(ToolParameter::optional(
            "industry",
            ParamType::String,
            "Industry label, e.g. energy, construction",
        ))
        .param(ToolParameter::optional(
            "state_owned",
            ParamType::Boolean,
            "Whether the enterprise is state-owned",
        ))
        .build();
        Self { store, spec }
    }
}

#[async_trait]
impl Tool for EnterpriseSearchTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn call(
        &self,
        params: serde_json::Value,
    ) -> std::result::Result<serde_json::Value, ToolError> {
        let results = self.store.search_enterprises(
            params["name_keyword"].as_str(),
            params["industry"].as_str(),
            params["state_owned"].as_bool(),
        );
        Ok(serde_json::json!({
            "count": results.len(),
            "enterprises": results,
        }))
    }
}

pub struct EnterpriseLookupTool {
    store: Arc<RecordStore>,
    spec: ToolSpec,
}

impl EnterpriseLookupTool {
    pub fn new(store: Arc<RecordStore>) -> Self {
        let spec = ToolSpec::builder(
            "get_enterprise_by_name",
            "Get one enterprise record by its exact name",
        )
        .category("enterprises")
        .param(ToolParameter::required(
            "name",
            ParamType::String,
            "The enterprise name (exact match)",
        ))
        .build();
        Self { store, spec }
    }
}

#[async_trait]
impl Tool for EnterpriseLookupTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn call(
        &self,
        params: serde_json::Value,
    ) -> std::result::Result<serde_json::Value, ToolError> {
        let name = params["name"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'name' argument".into()))?;

        Ok(match self.store.enterprise_by_name(name) {
            Some(enterprise) => serde_json::json!({ "found": true, "enterprise": enterprise }),
            None => serde_json::json!({
                "found": false,
                "message": format!("No enterprise named '{name}'"),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Arc<RecordStore> {
        Arc::new(RecordStore::with_sample_data())
    }

    #[tokio::test]
    async fn search_by_industry() {
        let tool = EnterpriseSearchTool::new(store());
        let result = tool
            .call(serde_json::json!({"industry": "energy"}))
            .await
            .unwrap();
        assert_eq!(result["count"], 2);
    }

    #[tokio::test]
    async fn search_state_owned_flag() {
        let tool = EnterpriseSearchTool::new(store());
        let result = tool
            .call(serde_json::json!({"state_owned": true}))
            .await
            .unwrap();
        assert_eq!(result["count"], 2);
        for e in result["enterprises"].as_array().unwrap() {
            assert_eq!(e["state_owned"], true);
        }
    }

    #[tokio::test]
    async fn lookup_exact_name() {
        let tool = EnterpriseLookupTool::new(store());

        let hit = tool
            .call(serde_json::json!({"name": "Meridian Rail Holdings"}))
            .await
            .unwrap();
        assert_eq!(hit["found"], true);
        assert_eq!(hit["enterprise"]["industry"], "transportation");

        let miss = tool.call(serde_json::json!({"name": "Nobody Inc."})).await.unwrap();
        assert_eq!(miss["found"], false);
    }

    #[tokio::test]
    async fn lookup_requires_name() {
        let tool = EnterpriseLookupTool::new(store());
        let err = tool.call(serde_json::json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
