use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::BumpType;

/// A recorded, pending change affecting one or more packages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consignment {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub packages: BTreeSet<String>,
    pub change_type: BumpType,
    pub summary: String,
    #[serde(default)]
    pub metadata: IndexMap<String, String>,
}

impl Consignment {
    #[must_use]
    pub fn affects(&self, package: &str) -> bool {
        self.packages.contains(package)
    }
}

/// Groups consignments by the packages they affect, keyed in name order.
///
/// A consignment touching several packages appears under each of them.
#[must_use]
pub fn group_by_package(consignments: &[Consignment]) -> BTreeMap<&str, Vec<&Consignment>> {
    let mut grouped: BTreeMap<&str, Vec<&Consignment>> = BTreeMap::new();
    for consignment in consignments {
        for package in &consignment.packages {
            grouped.entry(package.as_str()).or_default().push(consignment);
        }
    }
    grouped
}
