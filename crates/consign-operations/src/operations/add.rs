use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use consign_core::{BumpType, Consignment};
use indexmap::IndexMap;
use tracing::info;

use crate::Result;
use crate::error::OperationError;
use crate::operations::context::available_packages;
use crate::traits::{ConsignmentWriter, ProjectProvider};

pub struct AddInput {
    pub packages: Vec<String>,
    pub change_type: BumpType,
    pub summary: String,
    pub metadata: IndexMap<String, String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug)]
pub struct AddOutput {
    pub consignment: Consignment,
    pub path: PathBuf,
}

pub struct AddOperation<P, W> {
    project_provider: P,
    consignment_writer: W,
}

impl<P, W> AddOperation<P, W>
where
    P: ProjectProvider,
    W: ConsignmentWriter,
{
    pub fn new(project_provider: P, consignment_writer: W) -> Self {
        Self {
            project_provider,
            consignment_writer,
        }
    }

    /// Records a new consignment in the project's consignment directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the project cannot be discovered or has no packages,
    /// if no package is given or one is not configured, if the summary is
    /// blank, or if the file cannot be written.
    pub fn execute(&self, start_path: &Path, input: AddInput) -> Result<AddOutput> {
        let config = self.project_provider.discover_project(start_path)?;

        if config.packages().is_empty() {
            return Err(OperationError::EmptyProject(config.root().to_path_buf()));
        }

        if input.packages.is_empty() {
            return Err(OperationError::NoPackagesSelected);
        }

        let mut packages = BTreeSet::new();
        for name in input.packages {
            if config.package(&name).is_none() {
                return Err(OperationError::UnknownPackage {
                    name,
                    available: available_packages(&config),
                });
            }
            packages.insert(name);
        }

        let summary = input.summary.trim();
        if summary.is_empty() {
            return Err(OperationError::EmptySummary);
        }

        let consignment_dir = config.consignment_path();
        let consignment = Consignment {
            id: self.consignment_writer.generate_id(&consignment_dir),
            timestamp: input.timestamp,
            packages,
            change_type: input.change_type,
            summary: summary.to_string(),
            metadata: input.metadata,
        };

        let path = self
            .consignment_writer
            .write_consignment(&consignment_dir, &consignment)?;
        info!(id = %consignment.id, path = %path.display(), "consignment recorded");

        Ok(AddOutput { consignment, path })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::mocks::{MockConsignmentIO, MockProjectProvider};

    fn input(packages: &[&str], summary: &str) -> AddInput {
        AddInput {
            packages: packages.iter().map(|p| (*p).to_string()).collect(),
            change_type: BumpType::Minor,
            summary: summary.to_string(),
            metadata: IndexMap::new(),
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[test]
    fn writes_consignment_for_selected_packages() {
        let writer = Arc::new(MockConsignmentIO::new());
        let operation = AddOperation::new(MockProjectProvider::core_api(), Arc::clone(&writer));

        let output = operation
            .execute(Path::new("/any"), input(&["api", "core", "api"], "  Add retries \n"))
            .expect("add");

        assert_eq!(output.consignment.id, "mock-consignment-1");
        assert_eq!(output.consignment.summary, "Add retries");
        assert_eq!(
            output.consignment.packages.iter().collect::<Vec<_>>(),
            vec!["api", "core"]
        );
        assert_eq!(output.path, Path::new("/mock/project/.consign/mock-consignment-1.md"));
        assert_eq!(writer.consignments(), vec![output.consignment]);
    }

    #[test]
    fn keeps_metadata_order() {
        let writer = Arc::new(MockConsignmentIO::new());
        let operation = AddOperation::new(MockProjectProvider::core_api(), Arc::clone(&writer));
        let mut add = input(&["core"], "Fix");
        add.metadata.insert("ticket".to_string(), "OPS-12".to_string());
        add.metadata.insert("author".to_string(), "sam".to_string());

        let output = operation.execute(Path::new("/any"), add).expect("add");

        let keys: Vec<_> = output.consignment.metadata.keys().collect();
        assert_eq!(keys, vec!["ticket", "author"]);
    }

    #[test]
    fn rejects_unknown_package() {
        let writer = Arc::new(MockConsignmentIO::new());
        let operation = AddOperation::new(MockProjectProvider::core_api(), Arc::clone(&writer));

        let err = operation
            .execute(Path::new("/any"), input(&["ghost"], "Fix"))
            .expect_err("ghost is not configured");

        assert!(matches!(
            err,
            OperationError::UnknownPackage { ref name, ref available }
                if name == "ghost" && available == "api, core"
        ));
        assert!(writer.consignments().is_empty());
    }

    #[test]
    fn rejects_empty_package_list() {
        let operation =
            AddOperation::new(MockProjectProvider::core_api(), MockConsignmentIO::new());

        let err = operation
            .execute(Path::new("/any"), input(&[], "Fix"))
            .expect_err("no packages");

        assert!(matches!(err, OperationError::NoPackagesSelected));
    }

    #[test]
    fn rejects_blank_summary() {
        let operation =
            AddOperation::new(MockProjectProvider::core_api(), MockConsignmentIO::new());

        let err = operation
            .execute(Path::new("/any"), input(&["core"], "   "))
            .expect_err("blank summary");

        assert!(matches!(err, OperationError::EmptySummary));
    }

    #[test]
    fn rejects_empty_project() {
        let operation = AddOperation::new(MockProjectProvider::from_toml(""), MockConsignmentIO::new());

        let err = operation
            .execute(Path::new("/any"), input(&["core"], "Fix"))
            .expect_err("no packages configured");

        assert!(matches!(err, OperationError::EmptyProject(_)));
    }
}
