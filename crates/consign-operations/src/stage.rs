use std::collections::{BTreeMap, BTreeSet};

use consign_core::VersionBump;
use consign_project::{PackageStageState, PreReleaseState, StageConfig};
use consign_version::{is_prerelease, stage_version};
use semver::Version;
use tracing::{debug, warn};

use crate::error::StageError;
use crate::traits::{TagContext, TagRenderer};

/// Result of moving one package through a stage transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutcome {
    pub package: String,
    pub stage: String,
    pub counter: u32,
    /// `<target>-<stage>.<counter>`.
    pub version: Version,
    pub target_version: Version,
    pub tag_name: String,
}

/// A package whose freshly computed target differs from the stored one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDrift {
    pub package: String,
    pub previous: Version,
    pub current: Version,
}

/// Outcomes in package-name order, plus the state to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRun {
    pub state: PreReleaseState,
    pub outcomes: Vec<StageOutcome>,
    pub drift: Vec<TargetDrift>,
}

#[derive(Debug, Clone)]
pub struct StageMachine {
    /// Ascending by order; never empty.
    stages: Vec<StageConfig>,
    default_template: String,
}

impl StageMachine {
    /// # Errors
    ///
    /// Returns `StageError::NoStagesConfigured` if `stages` is empty, or
    /// `StageError::DuplicateStageOrder` if two stages share an order.
    pub fn new(
        stages: &[StageConfig],
        default_template: impl Into<String>,
    ) -> Result<Self, StageError> {
        if stages.is_empty() {
            return Err(StageError::NoStagesConfigured);
        }

        let mut stages = stages.to_vec();
        stages.sort_by_key(|s| s.order);
        if let Some(pair) = stages.windows(2).find(|pair| pair[0].order == pair[1].order) {
            return Err(StageError::DuplicateStageOrder {
                order: pair[0].order,
                first: pair[0].name.clone(),
                second: pair[1].name.clone(),
            });
        }

        Ok(Self {
            stages,
            default_template: default_template.into(),
        })
    }

    #[must_use]
    pub fn stages(&self) -> &[StageConfig] {
        &self.stages
    }

    #[must_use]
    pub fn lowest(&self) -> &StageConfig {
        &self.stages[0]
    }

    #[must_use]
    pub fn highest(&self) -> &StageConfig {
        &self.stages[self.stages.len() - 1]
    }

    fn position(&self, package: &str, stage: &str) -> Result<usize, StageError> {
        self.stages
            .iter()
            .position(|s| s.name == stage)
            .ok_or_else(|| StageError::UnknownStage {
                package: package.to_string(),
                stage: stage.to_string(),
            })
    }

    fn outcome<R: TagRenderer + ?Sized>(
        &self,
        position: usize,
        counter: u32,
        bump: &VersionBump,
        renderer: &R,
    ) -> Result<StageOutcome, StageError> {
        let stage = &self.stages[position];
        let version = stage_version(&bump.new_version, &stage.name, counter)?;
        let template = stage
            .tag_template
            .as_deref()
            .unwrap_or(&self.default_template);
        let tag_name = renderer.render(
            template,
            &TagContext {
                package: &bump.package,
                version: &version,
                stage: Some(&stage.name),
                counter: Some(counter),
            },
        );

        Ok(StageOutcome {
            package: bump.package.clone(),
            stage: stage.name.clone(),
            counter,
            version,
            target_version: bump.new_version.clone(),
            tag_name,
        })
    }

    /// Only a stable old version is remembered as the base of the cycle.
    fn record(state: &mut PreReleaseState, outcome: &StageOutcome, bump: &VersionBump) {
        let mut entry = PackageStageState::new(
            outcome.stage.clone(),
            outcome.counter,
            outcome.target_version.clone(),
        );
        if !is_prerelease(&bump.old_version) {
            entry = entry.with_stable_version(bump.old_version.clone());
        }
        state.insert(outcome.package.clone(), entry);
    }

    /// Cuts the next pre-release for every bumped package.
    ///
    /// A package without state starts at the lowest stage with counter 1. With
    /// an unchanged target the counter advances. A changed target restarts the
    /// counter in the current stage and is reported as drift. Entries for
    /// packages not in `bumps` are carried over unchanged.
    ///
    /// # Errors
    ///
    /// Returns `StageError::UnknownStage` if stored state names a stage that is
    /// not configured.
    pub fn pre_release<R: TagRenderer + ?Sized>(
        &self,
        state: &PreReleaseState,
        bumps: &BTreeMap<String, VersionBump>,
        renderer: &R,
    ) -> Result<StageRun, StageError> {
        let mut next = state.clone();
        let mut outcomes = Vec::with_capacity(bumps.len());
        let mut drift = Vec::new();

        for (package, bump) in bumps {
            let (position, counter) = match state.get(package) {
                None => (0, 1),
                Some(entry) => {
                    let position = self.position(package, &entry.stage)?;
                    if entry.target_version == bump.new_version {
                        (position, entry.counter.saturating_add(1))
                    } else {
                        warn!(
                            package = %package,
                            previous = %entry.target_version,
                            current = %bump.new_version,
                            "pre-release target changed; restarting counter"
                        );
                        drift.push(TargetDrift {
                            package: package.clone(),
                            previous: entry.target_version.clone(),
                            current: bump.new_version.clone(),
                        });
                        (position, 1)
                    }
                }
            };

            let outcome = self.outcome(position, counter, bump, renderer)?;
            debug!(
                package = %package,
                stage = %outcome.stage,
                counter = outcome.counter,
                version = %outcome.version,
                "pre-release"
            );
            Self::record(&mut next, &outcome, bump);
            outcomes.push(outcome);
        }

        Ok(StageRun {
            state: next,
            outcomes,
            drift,
        })
    }

    /// Moves every bumped package to the next stage with counter 1.
    ///
    /// All packages are checked before anything is computed, so on error no
    /// package has moved.
    ///
    /// # Errors
    ///
    /// Returns `StageError::NoPriorState` for a package with no pre-release
    /// state, `StageError::AlreadyAtHighestStage` for a package in the last
    /// stage, and `StageError::UnknownStage` if stored state names a stage that
    /// is not configured.
    pub fn promote<R: TagRenderer + ?Sized>(
        &self,
        state: &PreReleaseState,
        bumps: &BTreeMap<String, VersionBump>,
        renderer: &R,
    ) -> Result<StageRun, StageError> {
        let mut positions = Vec::with_capacity(bumps.len());
        for package in bumps.keys() {
            let entry = state.get(package).ok_or_else(|| StageError::NoPriorState {
                package: package.clone(),
            })?;
            let position = self.position(package, &entry.stage)?;
            if position + 1 == self.stages.len() {
                return Err(StageError::AlreadyAtHighestStage {
                    package: package.clone(),
                    stage: entry.stage.clone(),
                });
            }
            positions.push(position + 1);
        }

        let mut next = state.clone();
        let mut outcomes = Vec::with_capacity(bumps.len());
        let mut drift = Vec::new();

        for ((package, bump), position) in bumps.iter().zip(positions) {
            if let Some(entry) = state.get(package) {
                if entry.target_version != bump.new_version {
                    warn!(
                        package = %package,
                        previous = %entry.target_version,
                        current = %bump.new_version,
                        "pre-release target changed during promotion"
                    );
                    drift.push(TargetDrift {
                        package: package.clone(),
                        previous: entry.target_version.clone(),
                        current: bump.new_version.clone(),
                    });
                }
            }

            let outcome = self.outcome(position, 1, bump, renderer)?;
            debug!(
                package = %package,
                stage = %outcome.stage,
                version = %outcome.version,
                "promoted"
            );
            Self::record(&mut next, &outcome, bump);
            outcomes.push(outcome);
        }

        Ok(StageRun {
            state: next,
            outcomes,
            drift,
        })
    }
}

/// Drops the entries of packages that were released as stable.
#[must_use]
pub fn finish_pre_release<'a>(
    state: &PreReleaseState,
    released: impl IntoIterator<Item = &'a str>,
) -> PreReleaseState {
    let released: BTreeSet<&str> = released.into_iter().collect();
    let mut next = PreReleaseState::new();
    for (package, entry) in state.iter() {
        if !released.contains(package) {
            next.insert(package.to_string(), entry.clone());
        }
    }
    next
}
