//! Acceleration planner: evaluates off-cycle (summer) terms as timeline shorteners

use crate::core::catalog::CatalogGraph;
use crate::core::error::{Advisory, PlanningError};
use crate::core::models::{Season, SemesterSchedule, TermIndex};
use crate::core::scheduler::{ScheduleOutcome, ScheduleRequest, SemesterScheduler, SummerPolicy};
use crate::core::settings::PlannerSettings;
use crate::core::tracks::RemainingRequirements;
use crate::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Summed difficulty at or above which a summer counts as intensive
const INTENSIVE_DIFFICULTY: u32 = 8;

/// Summed difficulty at or below which a summer counts as light
const LIGHT_DIFFICULTY: u32 = 3;

/// Qualitative workload of a summer session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    /// One easy course
    Light,
    /// Manageable load
    Moderate,
    /// Several hard courses in a compressed session
    Intensive,
}

impl Intensity {
    /// Grade a session by the summed difficulty of its courses
    #[must_use]
    pub const fn from_difficulty(total: u32) -> Self {
        if total >= INTENSIVE_DIFFICULTY {
            Self::Intensive
        } else if total <= LIGHT_DIFFICULTY {
            Self::Light
        } else {
            Self::Moderate
        }
    }
}

/// One summer session considered for insertion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccelerationCandidate {
    /// The summer session
    pub term: TermIndex,
    /// Courses the scheduler places there
    pub courses: Vec<String>,
    /// Credits placed there
    pub credits: f32,
    /// Regular terms saved against the no-summer baseline
    pub terms_saved: usize,
    /// Graduation term with this summer inserted
    pub graduation_term: Option<TermIndex>,
    /// Summed difficulty of the summer courses
    pub difficulty: u32,
    /// Qualitative workload
    pub intensity: Intensity,
}

/// Ranked acceleration options for a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccelerationReport {
    /// Graduation term without summer sessions
    pub baseline_graduation: Option<TermIndex>,
    /// Regular terms without summer sessions
    pub baseline_regular_terms: usize,
    /// Candidates, most useful first
    pub candidates: Vec<AccelerationCandidate>,
    /// Non-fatal issues
    pub advisories: Vec<Advisory>,
}

/// Tries each summer session before the baseline graduation term
pub struct AccelerationPlanner<'a> {
    graph: &'a CatalogGraph,
    settings: &'a PlannerSettings,
}

impl<'a> AccelerationPlanner<'a> {
    /// Create a planner
    #[must_use]
    pub const fn new(graph: &'a CatalogGraph, settings: &'a PlannerSettings) -> Self {
        Self { graph, settings }
    }

    /// Rank single-summer insertions by the regular terms they save.
    /// A course only lands in a summer if it is offered then and its
    /// requisites are done by that point.
    ///
    /// # Errors
    /// Returns `SchedulingDeadlock` if even the baseline cannot be scheduled.
    pub fn evaluate(
        &self,
        remaining: &RemainingRequirements,
        base: &ScheduleRequest,
    ) -> Result<AccelerationReport, PlanningError> {
        let scheduler = SemesterScheduler::new(self.graph, self.settings);
        let baseline_request = base.clone().with_summers(SummerPolicy::Skip);
        let baseline = scheduler.schedule(remaining, &baseline_request)?;

        let mut candidates = Vec::new();
        for summer in summer_sessions_before(base.start, baseline.last_term()) {
            let request = base
                .clone()
                .with_summers(SummerPolicy::Only(BTreeSet::from([summer])));
            match scheduler.schedule(remaining, &request) {
                Ok(outcome) => {
                    if let Some(candidate) = self.candidate(summer, &baseline, &outcome) {
                        candidates.push(candidate);
                    }
                }
                Err(err) => debug!("Skipping {}: {}", summer, err),
            }
        }

        rank(&mut candidates);

        Ok(AccelerationReport {
            baseline_graduation: baseline.last_term(),
            baseline_regular_terms: baseline.regular_term_count(),
            candidates,
            advisories: baseline.advisories,
        })
    }

    fn candidate(
        &self,
        summer: TermIndex,
        baseline: &ScheduleOutcome,
        outcome: &ScheduleOutcome,
    ) -> Option<AccelerationCandidate> {
        let session = outcome.semesters.iter().find(|s| s.term == summer)?;
        let difficulty = self.session_difficulty(session);

        Some(AccelerationCandidate {
            term: summer,
            courses: session.courses.iter().map(|c| c.code.clone()).collect(),
            credits: session.total_credits,
            terms_saved: baseline
                .regular_term_count()
                .saturating_sub(outcome.regular_term_count()),
            graduation_term: outcome.last_term(),
            difficulty,
            intensity: Intensity::from_difficulty(difficulty),
        })
    }

    /// Summed difficulty of a scheduled session
    #[must_use]
    pub fn session_difficulty(&self, session: &SemesterSchedule) -> u32 {
        session
            .courses
            .iter()
            .filter_map(|c| self.graph.course_by_code(&c.code))
            .map(|c| u32::from(c.difficulty))
            .sum()
    }
}

/// Summer sessions from `start` up to (not including) `last`
#[must_use]
pub fn summer_sessions_before(start: TermIndex, last: Option<TermIndex>) -> Vec<TermIndex> {
    let Some(last) = last else {
        return Vec::new();
    };
    (start.year..=last.year)
        .map(|year| TermIndex::new(year, Season::Summer))
        .filter(|summer| *summer >= start && *summer < last)
        .collect()
}

/// Most terms saved first, then the lighter session, then the earlier one
fn rank(candidates: &mut [AccelerationCandidate]) {
    candidates.sort_by(|a, b| {
        b.terms_saved
            .cmp(&a.terms_saved)
            .then_with(|| a.credits.total_cmp(&b.credits))
            .then_with(|| a.term.cmp(&b.term))
    });
}
