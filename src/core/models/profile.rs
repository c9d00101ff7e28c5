//! Student profile model (copy-in input to every planning request)

use super::term::{Season, TermIndex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// How quickly the student wants to graduate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraduationGoal {
    /// Standard eight-semester pace
    #[default]
    Standard,
    /// Graduate early using heavier loads and off-cycle terms
    Early,
    /// No fixed target; a longer horizon is acceptable
    Flexible,
}

impl fmt::Display for GraduationGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Standard => "standard",
            Self::Early => "early",
            Self::Flexible => "flexible",
        };
        write!(f, "{label}")
    }
}

/// Preferred per-term credit load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreditLoad {
    /// Reduced load
    Light,
    /// Typical full-time load
    #[default]
    Standard,
    /// Maximum allowed load
    Heavy,
}

impl CreditLoad {
    /// One step heavier (used when the goal is early graduation)
    #[must_use]
    pub const fn relaxed(self) -> Self {
        match self {
            Self::Light => Self::Standard,
            Self::Standard | Self::Heavy => Self::Heavy,
        }
    }
}

impl fmt::Display for CreditLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Light => "light",
            Self::Standard => "standard",
            Self::Heavy => "heavy",
        };
        write!(f, "{label}")
    }
}

const fn default_term() -> TermIndex {
    TermIndex::new(1, Season::Fall)
}

/// A student's situation at the time of a planning request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    /// Major identifier
    pub major: String,

    /// Declared track, if any
    #[serde(default)]
    pub track: Option<String>,

    /// Second declared track for dual-track students
    #[serde(default, alias = "secondTrack")]
    pub second_track: Option<String>,

    /// Completed course codes
    #[serde(default, alias = "completedCourses")]
    pub completed_courses: BTreeSet<String>,

    /// Course codes currently being taken
    #[serde(default, alias = "inProgressCourses")]
    pub in_progress_courses: BTreeSet<String>,

    /// The term the student is currently in
    #[serde(default = "default_term", alias = "currentTerm")]
    pub current_term: TermIndex,

    /// Graduation pace goal
    #[serde(default, alias = "graduationGoal")]
    pub graduation_goal: GraduationGoal,

    /// Credit-load preference
    #[serde(default, alias = "creditLoad")]
    pub credit_load: CreditLoad,
}

impl StudentProfile {
    /// Create a profile for a student starting the major in Fall of year 1
    #[must_use]
    pub fn new(major: &str) -> Self {
        Self {
            major: major.to_string(),
            track: None,
            second_track: None,
            completed_courses: BTreeSet::new(),
            in_progress_courses: BTreeSet::new(),
            current_term: default_term(),
            graduation_goal: GraduationGoal::Standard,
            credit_load: CreditLoad::Standard,
        }
    }

    /// Set the declared track
    #[must_use]
    pub fn with_track(mut self, track: &str) -> Self {
        self.track = Some(track.to_string());
        self
    }

    /// Set a second track to complete alongside the first
    #[must_use]
    pub fn with_second_track(mut self, track: &str) -> Self {
        self.second_track = Some(track.to_string());
        self
    }

    /// Add completed course codes
    #[must_use]
    pub fn with_completed(mut self, codes: &[&str]) -> Self {
        self.completed_courses
            .extend(codes.iter().map(|c| (*c).to_string()));
        self
    }

    /// Set the current term
    #[must_use]
    pub const fn at_term(mut self, term: TermIndex) -> Self {
        self.current_term = term;
        self
    }

    /// Set the graduation goal and credit load
    #[must_use]
    pub const fn with_pace(mut self, goal: GraduationGoal, load: CreditLoad) -> Self {
        self.graduation_goal = goal;
        self.credit_load = load;
        self
    }

    /// First term that can receive newly planned courses.
    ///
    /// The current term is plannable while nothing is in progress; otherwise
    /// planning starts at the next regular term.
    #[must_use]
    pub fn planning_start(&self) -> TermIndex {
        if self.in_progress_courses.is_empty() {
            self.current_term
        } else {
            self.current_term.next_regular()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relaxed_load() {
        assert_eq!(CreditLoad::Light.relaxed(), CreditLoad::Standard);
        assert_eq!(CreditLoad::Standard.relaxed(), CreditLoad::Heavy);
        assert_eq!(CreditLoad::Heavy.relaxed(), CreditLoad::Heavy);
    }

    #[test]
    fn test_planning_start() {
        let mut profile = StudentProfile::new("cs").at_term(TermIndex::new(2, Season::Fall));
        assert_eq!(profile.planning_start(), TermIndex::new(2, Season::Fall));

        profile.in_progress_courses.insert("CS25100".to_string());
        assert_eq!(profile.planning_start(), TermIndex::new(2, Season::Spring));
    }

    #[test]
    fn test_profile_from_toml_accepts_contract_names() {
        let profile: StudentProfile = toml::from_str(
            r#"
major = "cs"
track = "mi"
secondTrack = "se"
completedCourses = ["CS18000", "MA16100"]
graduationGoal = "early"
creditLoad = "heavy"

[currentTerm]
year = 2
season = "spring"
"#,
        )
        .unwrap();

        assert_eq!(profile.track.as_deref(), Some("mi"));
        assert_eq!(profile.second_track.as_deref(), Some("se"));
        assert_eq!(profile.completed_courses.len(), 2);
        assert_eq!(profile.current_term, TermIndex::new(2, Season::Spring));
        assert_eq!(profile.graduation_goal, GraduationGoal::Early);
        assert_eq!(profile.credit_load, CreditLoad::Heavy);
    }

    #[test]
    fn test_profile_defaults() {
        let profile: StudentProfile = toml::from_str(r#"major = "cs""#).unwrap();
        assert!(profile.track.is_none());
        assert!(profile.second_track.is_none());
        assert_eq!(profile.current_term, TermIndex::new(1, Season::Fall));
        assert_eq!(profile.credit_load, CreditLoad::Standard);
    }
}
