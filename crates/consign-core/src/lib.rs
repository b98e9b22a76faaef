mod consignment;
mod package;
pub mod types;

pub use consignment::{Consignment, group_by_package};
pub use package::{BumpMapping, DependencyEdge, Package, Strategy};
pub use types::*;
