//! In-memory record store — stand-in for the external record storage.
//!
//! In production the record tools would sit on a real database behind
//! the firm's document pipeline. The seeded store returns deterministic
//! sample records so the agent loop can be exercised end-to-end without
//! external services. Filter semantics match the production query layer:
//! fuzzy client matching, category equality, amount ranges, a
//! recent-N-years window, and free-text keyword search.

use chrono::{Datelike, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// One performance contract record.
#[derive(Debug, Clone, Serialize)]
pub struct ContractRecord {
    pub id: u32,
    pub title: String,
    /// The client (party A) the work was performed for
    pub client: String,
    /// "advisory", "agency", or "other"
    pub category: String,
    /// Contract amount in thousands
    pub amount: f64,
    /// Year the contract was signed
    pub year: i32,
    pub summary: String,
}

/// One client enterprise record.
#[derive(Debug, Clone, Serialize)]
pub struct Enterprise {
    pub id: u32,
    pub name: String,
    pub industry: String,
    pub state_owned: bool,
    /// Registered capital in millions
    pub registered_capital: f64,
}

/// One staff lawyer record.
#[derive(Debug, Clone, Serialize)]
pub struct Lawyer {
    pub id: u32,
    pub name: String,
    pub license_no: String,
    pub practice_years: u32,
    pub specialty: String,
}

/// Filters for contract search. All fields are optional and combined
/// with AND.
#[derive(Debug, Clone, Default)]
pub struct ContractFilter {
    /// Substring match on the client name (case-insensitive)
    pub client: Option<String>,
    /// Exact category match
    pub category: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    /// Only contracts signed within the last N years
    pub years: Option<i32>,
    /// Substring match on title, summary, or client
    pub keyword: Option<String>,
}

/// Aggregate statistics over the contract records.
#[derive(Debug, Clone, Serialize)]
pub struct ContractStats {
    pub total: usize,
    pub total_amount: f64,
    pub by_category: BTreeMap<String, usize>,
}

/// The record store holding all three domains.
pub struct RecordStore {
    contracts: Vec<ContractRecord>,
    enterprises: Vec<Enterprise>,
    lawyers: Vec<Lawyer>,
}

impl RecordStore {
    /// An empty store (mainly for tests).
    pub fn empty() -> Self {
        Self {
            contracts: Vec::new(),
            enterprises: Vec::new(),
            lawyers: Vec::new(),
        }
    }

    /// A store seeded with deterministic sample records.
    pub fn with_sample_data() -> Self {
        let this_year = Utc::now().year();
        Self {
            contracts: sample_contracts(this_year),
            enterprises: sample_enterprises(),
            lawyers: sample_lawyers(),
        }
    }

    // --- contracts ---

    pub fn search_contracts(&self, filter: &ContractFilter) -> Vec<&ContractRecord> {
        let this_year = Utc::now().year();
        self.contracts
            .iter()
            .filter(|c| {
                if let Some(client) = &filter.client
                    && !contains_ci(&c.client, client)
                {
                    return false;
                }
                if let Some(category) = &filter.category
                    && !c.category.eq_ignore_ascii_case(category)
                {
                    return false;
                }
                if let Some(min) = filter.min_amount
                    && c.amount < min
                {
                    return false;
                }
                if let Some(max) = filter.max_amount
                    && c.amount > max
                {
                    return false;
                }
                if let Some(years) = filter.years
                    && c.year < this_year - years + 1
                {
                    return false;
                }
                if let Some(keyword) = &filter.keyword
                    && !(contains_ci(&c.title, keyword)
                        || contains_ci(&c.summary, keyword)
                        || contains_ci(&c.client, keyword))
                {
                    return false;
                }
                true
            })
            .collect()
    }

    pub fn contract_by_id(&self, id: u32) -> Option<&ContractRecord> {
        self.contracts.iter().find(|c| c.id == id)
    }

    pub fn contract_stats(&self) -> ContractStats {
        let mut by_category: BTreeMap<String, usize> = BTreeMap::new();
        for c in &self.contracts {
            *by_category.entry(c.category.clone()).or_default() += 1;
        }
        ContractStats {
            total: self.contracts.len(),
            total_amount: self.contracts.iter().map(|c| c.amount).sum(),
            by_category,
        }
    }

    // --- enterprises ---

    pub fn search_enterprises(
        &self,
        name_keyword: Option<&str>,
        industry: Option<&str>,
        state_owned: Option<bool>,
    ) -> Vec<&Enterprise> {
        self.enterprises
            .iter()
            .filter(|e| {
                if let Some(kw) = name_keyword
                    && !contains_ci(&e.name, kw)
                {
                    return false;
                }
                if let Some(ind) = industry
                    && !e.industry.eq_ignore_ascii_case(ind)
                {
                    return false;
                }
                if let Some(so) = state_owned
                    && e.state_owned != so
                {
                    return false;
                }
                true
            })
            .collect()
    }

    pub fn enterprise_by_name(&self, name: &str) -> Option<&Enterprise> {
        self.enterprises.iter().find(|e| e.name == name)
    }

    // --- lawyers ---

    pub fn search_lawyers(
        &self,
        name: Option<&str>,
        license_no: Option<&str>,
    ) -> Vec<&Lawyer> {
        self.lawyers
            .iter()
            .filter(|l| {
                if let Some(n) = name
                    && !contains_ci(&l.name, n)
                {
                    return false;
                }
                if let Some(lic) = license_no
                    && l.license_no != lic
                {
                    return false;
                }
                true
            })
            .collect()
    }

    pub fn all_lawyers(&self) -> &[Lawyer] {
        &self.lawyers
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn sample_contracts(this_year: i32) -> Vec<ContractRecord> {
    vec![
        ContractRecord {
            id: 1,
            title: "Annual legal advisory for Northwind Energy Group".into(),
            client: "Northwind Energy Group".into(),
            category: "advisory".into(),
            amount: 850.0,
            year: this_year - 1,
            summary: "Retainer covering grid-construction procurement reviews and compliance for an energy utility.".into(),
        },
        ContractRecord {
            id: 2,
            title: "Bid dispute representation for Harbor Bridge Phase II".into(),
            client: "Coastal Infrastructure Co.".into(),
            category: "agency".into(),
            amount: 1200.0,
            year: this_year - 2,
            summary: "Represented the contractor in a tender award dispute over the Harbor Bridge expansion.".into(),
        },
        ContractRecord {
            id: 3,
            title: "Annual legal advisory for Meridian Rail Holdings".into(),
            client: "Meridian Rail Holdings".into(),
            category: "advisory".into(),
            amount: 600.0,
            year: this_year - 4,
            summary: "General counsel services for a state-owned rail operator, including bid document reviews.".into(),
        },
        ContractRecord {
            id: 4,
            title: "Arbitration for Sunfield Solar EPC contract".into(),
            client: "Sunfield Renewables".into(),
            category: "agency".into(),
            amount: 2300.0,
            year: this_year - 1,
            summary: "Arbitration over delayed milestones in a solar-farm engineering, procurement and construction contract.".into(),
        },
        ContractRecord {
            id: 5,
            title: "Compliance audit for Delta Water Works tender program".into(),
            client: "Delta Water Works".into(),
            category: "other".into(),
            amount: 300.0,
            year: this_year - 3,
            summary: "Audited municipal water-treatment tender procedures against procurement regulations.".into(),
        },
        ContractRecord {
            id: 6,
            title: "Annual legal advisory for Coastal Infrastructure Co.".into(),
            client: "Coastal Infrastructure Co.".into(),
            category: "advisory".into(),
            amount: 780.0,
            year: this_year,
            summary: "Ongoing retainer for an infrastructure builder, with emphasis on subcontractor agreements.".into(),
        },
        ContractRecord {
            id: 7,
            title: "Litigation for Granite Peak Mining royalties".into(),
            client: "Granite Peak Mining".into(),
            category: "agency".into(),
            amount: 1750.0,
            year: this_year - 5,
            summary: "Royalty dispute litigation for a mining concern, settled before trial.".into(),
        },
        ContractRecord {
            id: 8,
            title: "Tender documentation for Aurora Hospital expansion".into(),
            client: "Aurora Health Alliance".into(),
            category: "other".into(),
            amount: 450.0,
            year: this_year - 1,
            summary: "Drafted and reviewed tender documentation for a hospital-wing construction program.".into(),
        },
    ]
}

fn sample_enterprises() -> Vec<Enterprise> {
    vec![
        Enterprise {
            id: 1,
            name: "Northwind Energy Group".into(),
            industry: "energy".into(),
            state_owned: true,
            registered_capital: 5200.0,
        },
        Enterprise {
            id: 2,
            name: "Coastal Infrastructure Co.".into(),
            industry: "construction".into(),
            state_owned: false,
            registered_capital: 1800.0,
        },
        Enterprise {
            id: 3,
            name: "Meridian Rail Holdings".into(),
            industry: "transportation".into(),
            state_owned: true,
            registered_capital: 9600.0,
        },
        Enterprise {
            id: 4,
            name: "Sunfield Renewables".into(),
            industry: "energy".into(),
            state_owned: false,
            registered_capital: 750.0,
        },
        Enterprise {
            id: 5,
            name: "Aurora Health Alliance".into(),
            industry: "healthcare".into(),
            state_owned: false,
            registered_capital: 420.0,
        },
    ]
}

fn sample_lawyers() -> Vec<Lawyer> {
    vec![
        Lawyer {
            id: 1,
            name: "Elena Vasquez".into(),
            license_no: "L-2009-0417".into(),
            practice_years: 17,
            specialty: "construction disputes".into(),
        },
        Lawyer {
            id: 2,
            name: "Marcus Chen".into(),
            license_no: "L-2013-1122".into(),
            practice_years: 12,
            specialty: "procurement compliance".into(),
        },
        Lawyer {
            id: 3,
            name: "Priya Raman".into(),
            license_no: "L-2016-0886".into(),
            practice_years: 9,
            specialty: "energy contracts".into(),
        },
        Lawyer {
            id: 4,
            name: "Tomasz Nowak".into(),
            license_no: "L-2011-0233".into(),
            practice_years: 14,
            specialty: "arbitration".into(),
        },
        Lawyer {
            id: 5,
            name: "Sarah Okafor".into(),
            license_no: "L-2019-1504".into(),
            practice_years: 6,
            specialty: "corporate advisory".into(),
        },
    ]
}
