//! `tenderdesk tools` — print the tool catalog.

use std::sync::Arc;

use tenderdesk_tools::RecordStore;

pub fn run() {
    let registry = tenderdesk_tools::default_registry(Arc::new(RecordStore::with_sample_data()));
    println!("{}", registry.describe_for_prompt(None));
    println!();
    println!("{} tools registered.", registry.len());
}
