//! Record-query tool implementations for Tenderdesk.
//!
//! Three record domains back the agent's answers: performance contracts,
//! client enterprises, and staff lawyers. Each tool declares its spec
//! beside its implementation and receives the record store as a
//! constructor argument — the store handle never appears among a tool's
//! planner-visible parameters.

pub mod contract_search;
pub mod enterprise_lookup;
pub mod lawyer_lookup;
pub mod store;

use std::sync::Arc;
use tenderdesk_core::tool::ToolRegistry;

pub use store::{ContractFilter, ContractRecord, ContractStats, Enterprise, Lawyer, RecordStore};

/// Create the default tool registry over one record store.
pub fn default_registry(store: Arc<RecordStore>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(contract_search::ContractSearchTool::new(
        store.clone(),
    )));
    registry.register(Box::new(contract_search::ContractDetailTool::new(
        store.clone(),
    )));
    registry.register(Box::new(contract_search::ContractStatsTool::new(
        store.clone(),
    )));
    registry.register(Box::new(enterprise_lookup::EnterpriseSearchTool::new(
        store.clone(),
    )));
    registry.register(Box::new(enterprise_lookup::EnterpriseLookupTool::new(
        store.clone(),
    )));
    registry.register(Box::new(lawyer_lookup::LawyerSearchTool::new(
        store.clone(),
    )));
    registry.register(Box::new(lawyer_lookup::LawyerListTool::new(store)));
    tracing::debug!(tools = registry.len(), "default registry built");
    registry
}
