use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("package '{package}' is defined more than once")]
    DuplicatePackage { package: String },

    #[error("package '{package}' depends on undefined package '{dependency}'")]
    UndefinedPackage { package: String, dependency: String },

    #[error(
        "internal error: dependency cycle remains after condensation among: {}",
        packages.join(", ")
    )]
    CycleAfterCondensation { packages: Vec<String> },
}

impl GraphError {
    /// Whether the error stems from invalid configuration rather than a bug.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicatePackage { .. } | Self::UndefinedPackage { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_package_message_names_both_packages() {
        let err = GraphError::UndefinedPackage {
            package: "api".to_string(),
            dependency: "ghost".to_string(),
        };

        let msg = err.to_string();

        assert!(msg.contains("api"));
        assert!(msg.contains("ghost"));
        assert!(err.is_config_error());
    }

    #[test]
    fn leftover_cycle_is_internal() {
        let err = GraphError::CycleAfterCondensation {
            packages: vec!["a".to_string(), "b".to_string()],
        };

        assert!(err.to_string().contains("internal error"));
        assert!(err.to_string().contains("a, b"));
        assert!(!err.is_config_error());
    }
}
