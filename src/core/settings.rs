//! Planner settings passed explicitly into every planning call

use crate::core::models::{ClassLevel, CreditLoad, Season, TermIndex};
use serde::{Deserialize, Serialize};

/// Credit caps for one load preference
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TermCaps {
    /// Fall semester cap
    pub fall: f32,
    /// Spring semester cap
    pub spring: f32,
    /// Summer session cap
    pub summer: f32,
    /// Regular-term cap while the student is a freshman
    pub freshman: f32,
}

/// Cap table indexed by credit-load preference
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapTable {
    /// Light load caps
    pub light: TermCaps,
    /// Standard load caps
    pub standard: TermCaps,
    /// Heavy load caps
    pub heavy: TermCaps,
}

impl Default for CapTable {
    fn default() -> Self {
        Self {
            light: TermCaps {
                fall: 15.0,
                spring: 15.0,
                summer: 6.0,
                freshman: 14.0,
            },
            standard: TermCaps {
                fall: 18.0,
                spring: 18.0,
                summer: 9.0,
                freshman: 16.0,
            },
            heavy: TermCaps {
                fall: 21.0,
                spring: 21.0,
                summer: 12.0,
                freshman: 18.0,
            },
        }
    }
}

impl CapTable {
    /// Caps for a load preference
    #[must_use]
    pub const fn for_load(&self, load: CreditLoad) -> &TermCaps {
        match load {
            CreditLoad::Light => &self.light,
            CreditLoad::Standard => &self.standard,
            CreditLoad::Heavy => &self.heavy,
        }
    }
}

/// Maximum number of track-category courses per term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackNorm {
    /// Regular terms of the first year
    pub freshman: usize,
    /// Other regular terms
    pub regular: usize,
    /// Summer sessions
    pub summer: usize,
}

impl Default for TrackNorm {
    fn default() -> Self {
        Self {
            freshman: 2,
            regular: 3,
            summer: 2,
        }
    }
}

/// Thresholds used to grade failure severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityThresholds {
    /// Blocked-set size at or above which a failure is critical
    pub critical_blocked: usize,
    /// Number of tracks whose coursework must depend on a course for it to count as a chokepoint
    pub chokepoint_tracks: usize,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            critical_blocked: 5,
            chokepoint_tracks: 2,
        }
    }
}

/// Tunables for scheduling, assembly and failure analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerSettings {
    /// Regular terms searched before scheduling gives up
    pub horizon: usize,
    /// Extra regular terms granted to flexible graduation goals
    pub flexible_extra_terms: usize,
    /// Number of regular terms in a standard degree
    pub standard_terms: usize,
    /// Credits above which a term is reported as overloaded
    pub typical_max_credits: f32,
    /// Credits of track coursework above which a plan is flagged
    pub typical_track_credits: f32,
    /// Whether summer sessions may be used without an early goal
    pub allow_summer: bool,
    /// Fail with a deadlock (instead of an advisory) when an early goal
    /// cannot beat the standard-pace timeline
    pub strict_early_goal: bool,
    /// Credit caps per load preference
    pub caps: CapTable,
    /// Track-course sequencing norm
    pub track_norm: TrackNorm,
    /// Failure severity thresholds
    pub severity: SeverityThresholds,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            horizon: 12,
            flexible_extra_terms: 2,
            standard_terms: 8,
            typical_max_credits: 18.0,
            typical_track_credits: 30.0,
            allow_summer: false,
            strict_early_goal: true,
            caps: CapTable::default(),
            track_norm: TrackNorm::default(),
            severity: SeverityThresholds::default(),
        }
    }
}

impl PlannerSettings {
    /// Credit cap for a term under a load preference.
    /// Freshman regular terms use the reduced freshman cap.
    #[must_use]
    pub fn credit_cap(&self, term: TermIndex, load: CreditLoad) -> f32 {
        let caps = self.caps.for_load(load);
        match term.season {
            Season::Summer => caps.summer,
            Season::Fall | Season::Spring if term.class_level() == ClassLevel::Freshman => {
                caps.freshman
            }
            Season::Fall => caps.fall,
            Season::Spring => caps.spring,
        }
    }

    /// Maximum track-category courses in a term
    #[must_use]
    pub fn track_course_limit(&self, term: TermIndex) -> usize {
        if term.is_off_cycle() {
            self.track_norm.summer
        } else if term.class_level() == ClassLevel::Freshman {
            self.track_norm.freshman
        } else {
            self.track_norm.regular
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_caps() {
        let settings = PlannerSettings::default();
        let fall1 = TermIndex::new(1, Season::Fall);
        let fall2 = TermIndex::new(2, Season::Fall);
        let summer2 = TermIndex::new(2, Season::Summer);

        assert!((settings.credit_cap(fall1, CreditLoad::Standard) - 16.0).abs() < f32::EPSILON);
        assert!((settings.credit_cap(fall2, CreditLoad::Standard) - 18.0).abs() < f32::EPSILON);
        assert!((settings.credit_cap(fall2, CreditLoad::Heavy) - 21.0).abs() < f32::EPSILON);
        assert!((settings.credit_cap(summer2, CreditLoad::Light) - 6.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_caps_grow_with_load() {
        let settings = PlannerSettings::default();
        for term in [
            TermIndex::new(1, Season::Spring),
            TermIndex::new(3, Season::Fall),
            TermIndex::new(2, Season::Summer),
        ] {
            assert!(
                settings.credit_cap(term, CreditLoad::Light)
                    < settings.credit_cap(term, CreditLoad::Standard)
            );
            assert!(
                settings.credit_cap(term, CreditLoad::Standard)
                    < settings.credit_cap(term, CreditLoad::Heavy)
            );
        }
    }

    #[test]
    fn test_track_course_limit() {
        let settings = PlannerSettings::default();
        assert_eq!(settings.track_course_limit(TermIndex::new(1, Season::Fall)), 2);
        assert_eq!(settings.track_course_limit(TermIndex::new(3, Season::Spring)), 3);
        assert_eq!(settings.track_course_limit(TermIndex::new(3, Season::Summer)), 2);
    }
}
