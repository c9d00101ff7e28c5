//! Advisor facade: the entry points used by conversation and API layers.
//!
//! Every call takes the catalog snapshot current at call time and works on
//! it alone, so a concurrent refresh never changes a request midway.

use crate::core::acceleration::{AccelerationPlanner, AccelerationReport};
use crate::core::assembler::{PlanAssembler, PlanOutcome, PlanningContext};
use crate::core::catalog::{CatalogHandle, CatalogSnapshot};
use crate::core::error::{Advisory, PlanningError};
use crate::core::failure::{FailureImpactAnalyzer, FailureImpactReport};
use crate::core::models::{StudentProfile, TermIndex};
use crate::core::resolver::{ChainEntry, PrerequisiteResolver};
use crate::core::scheduler::ScheduleRequest;
use crate::core::scoring::{SuccessScorer, WeightedScorer};
use crate::core::settings::PlannerSettings;
use crate::core::tracks::ChoiceSelections;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Planning front door shared by all requests
pub struct Advisor {
    catalog: CatalogHandle,
    settings: PlannerSettings,
    scorer: Box<dyn SuccessScorer>,
}

impl Advisor {
    /// Advisor over `snapshot` with the default scorer
    #[must_use]
    pub fn new(snapshot: CatalogSnapshot, settings: PlannerSettings) -> Self {
        Self {
            catalog: CatalogHandle::new(snapshot),
            settings,
            scorer: Box::new(WeightedScorer::default()),
        }
    }

    /// Replace the success scorer
    #[must_use]
    pub fn with_scorer(mut self, scorer: Box<dyn SuccessScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Handle used to refresh the catalog
    #[must_use]
    pub const fn catalog(&self) -> &CatalogHandle {
        &self.catalog
    }

    /// Settings in effect
    #[must_use]
    pub const fn settings(&self) -> &PlannerSettings {
        &self.settings
    }

    fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.catalog.current()
    }

    /// Build a plan, or a choice request when a choice group is open.
    ///
    /// # Errors
    /// `UnknownMajor`, `UnknownTrack`, `UnsatisfiableChoiceGroup` or
    /// `SchedulingDeadlock`.
    pub fn create_plan(&self, profile: &StudentProfile) -> Result<PlanOutcome, PlanningError> {
        let snapshot = self.snapshot();
        PlanAssembler::new(
            snapshot.graph(),
            snapshot.tracks(),
            &self.settings,
            self.scorer.as_ref(),
        )
        .create_plan(profile)
    }

    /// Continue a paused plan with the caller's selections.
    ///
    /// # Errors
    /// Same as [`Self::create_plan`].
    pub fn resolve_choices(
        &self,
        context: PlanningContext,
        selections: ChoiceSelections,
    ) -> Result<PlanOutcome, PlanningError> {
        let snapshot = self.snapshot();
        PlanAssembler::new(
            snapshot.graph(),
            snapshot.tracks(),
            &self.settings,
            self.scorer.as_ref(),
        )
        .resolve_choices(context, selections)
    }

    /// Impact of failing `course` in `failure_term` (defaults to the
    /// profile's current term).
    ///
    /// # Errors
    /// `UnknownCourseCode` for an unknown course, plus profile and
    /// scheduling errors.
    pub fn analyze_failure(
        &self,
        course: &str,
        profile: &StudentProfile,
        failure_term: Option<TermIndex>,
    ) -> Result<FailureImpactReport, PlanningError> {
        let snapshot = self.snapshot();
        FailureImpactAnalyzer::new(
            snapshot.graph(),
            snapshot.tracks(),
            &self.settings,
            self.scorer.as_ref(),
        )
        .analyze(course, profile, failure_term)
    }

    /// Every transitive requisite of `course` with its distance level,
    /// deepest first.
    ///
    /// # Errors
    /// `UnknownCourseCode` if the course is not in the catalog.
    pub fn get_prerequisite_chain(&self, course: &str) -> Result<Vec<ChainEntry>, PlanningError> {
        let snapshot = self.snapshot();
        let graph = snapshot.graph();
        let id = graph.require_id(course)?;
        Ok(PrerequisiteResolver::new(graph).transitive_chain(id))
    }

    /// Codes of every course that cannot be taken without `course`.
    ///
    /// # Errors
    /// `UnknownCourseCode` if the course is not in the catalog.
    pub fn get_blocked_courses(&self, course: &str) -> Result<BTreeSet<String>, PlanningError> {
        let snapshot = self.snapshot();
        let graph = snapshot.graph();
        let id = graph.require_id(course)?;
        Ok(PrerequisiteResolver::new(graph)
            .transitive_blocked(id)
            .into_iter()
            .map(|c| graph.code(c).to_string())
            .collect())
    }

    /// Ranked summer sessions that shorten the profile's timeline. Open
    /// choice groups are left out and reported as advisories.
    ///
    /// # Errors
    /// Profile errors, or `SchedulingDeadlock` if no baseline schedule exists.
    pub fn evaluate_acceleration(
        &self,
        profile: &StudentProfile,
    ) -> Result<AccelerationReport, PlanningError> {
        let snapshot = self.snapshot();
        let graph = snapshot.graph();
        let mut remaining = snapshot
            .tracks()
            .resolve(graph, profile, &ChoiceSelections::new())?;

        let mut advisories = std::mem::take(&mut remaining.advisories);
        advisories.extend(
            remaining
                .pending
                .drain(..)
                .map(|p| Advisory::ChoicePending { group: p.group }),
        );

        let base = ScheduleRequest::new(
            profile.planning_start(),
            profile.credit_load,
            self.settings.horizon,
        );
        let mut report = AccelerationPlanner::new(graph, &self.settings).evaluate(&remaining, &base)?;
        advisories.append(&mut report.advisories);
        report.advisories = advisories;
        Ok(report)
    }
}
