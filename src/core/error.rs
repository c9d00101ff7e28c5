//! Error taxonomy for planning requests and catalog loading

use super::models::TermIndex;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Fatal errors returned by catalog construction and planning operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanningError {
    /// The catalog's requisite edges contain a cycle (load time only)
    #[error("cyclic prerequisite chain detected: {}", cycle.join(" -> "))]
    CyclicPrerequisiteDetected {
        /// Course codes along the detected cycle, first code repeated at the end
        cycle: Vec<String>,
    },

    /// A course code does not exist in the catalog
    #[error("unknown course code '{0}'")]
    UnknownCourseCode(String),

    /// The profile names a major the catalog does not define
    #[error("unknown major '{0}'")]
    UnknownMajor(String),

    /// The profile or a selection names a track the major does not offer
    #[error("unknown track '{track}' for major '{major}'")]
    UnknownTrack {
        /// Requested track
        track: String,
        /// Major the track was looked up in
        major: String,
    },

    /// Supplied selections do not fit a choice group
    #[error("choice group '{group}' cannot be satisfied: {reason}")]
    UnsatisfiableChoiceGroup {
        /// Group identifier
        group: String,
        /// Why the selection was rejected
        reason: String,
    },

    /// No legal ordering exists within the bounded term horizon
    #[error("no legal schedule within {horizon} regular terms; unmet: {}", unmet.join(", "))]
    SchedulingDeadlock {
        /// Course codes (or quota descriptions) that could not be placed
        unmet: Vec<String>,
        /// Regular-term horizon that was searched
        horizon: usize,
    },

    /// The catalog document could not be read or parsed
    #[error("failed to load catalog: {0}")]
    CatalogLoad(String),

    /// A student profile document could not be read or parsed
    #[error("failed to load profile: {0}")]
    ProfileLoad(String),
}

/// Non-fatal advisory attached to plans and reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// A profile course code is not in the catalog and was ignored
    UnknownCourseCode {
        /// The unrecognized code
        code: String,
    },
    /// A term's credit weight stays above the typical maximum after rebalancing
    CreditOverload {
        /// Overloaded term
        term: TermIndex,
        /// Scheduled credits
        credits: f32,
        /// Typical maximum
        typical_max: f32,
    },
    /// Early graduation was requested but no shorter timeline was found
    EarlyGoalUnmet {
        /// Number of terms in the resulting plan
        terms: usize,
    },
    /// The plan runs past the standard number of regular terms
    ExtendedTimeline {
        /// Regular terms planned
        regular_terms: usize,
        /// Standard number of regular terms
        standard: usize,
    },
    /// A choice group is still open and was left out of a timeline estimate
    ChoicePending {
        /// Group identifier
        group: String,
    },
    /// Coursework for the declared tracks exceeds the typical credit total
    TrackCreditsExceeded {
        /// Declared tracks
        tracks: Vec<String>,
        /// Credits of courses satisfying track requirements
        credits: f32,
        /// Typical maximum
        typical_max: f32,
    },
    /// An off-cycle term carries a high-difficulty course load
    IntensiveSummer {
        /// The summer term
        term: TermIndex,
        /// Summed difficulty of its courses
        difficulty: u32,
    },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCourseCode { code } => {
                write!(f, "unknown course code '{code}' ignored")
            }
            Self::CreditOverload {
                term,
                credits,
                typical_max,
            } => write!(
                f,
                "heavy load in {term}: {credits} credits exceeds the typical {typical_max}"
            ),
            Self::EarlyGoalUnmet { terms } => write!(
                f,
                "early graduation requested but no shorter timeline than {terms} terms was found"
            ),
            Self::ExtendedTimeline {
                regular_terms,
                standard,
            } => write!(
                f,
                "plan needs {regular_terms} regular terms (standard is {standard})"
            ),
            Self::ChoicePending { group } => {
                write!(f, "choice group '{group}' unresolved; excluded from estimate")
            }
            Self::TrackCreditsExceeded {
                tracks,
                credits,
                typical_max,
            } => write!(
                f,
                "track coursework for {} totals {credits} credits, above the typical {typical_max}",
                tracks.join(" + ")
            ),
            Self::IntensiveSummer { term, difficulty } => write!(
                f,
                "intensive off-cycle load in {term} (difficulty {difficulty})"
            ),
        }
    }
}
