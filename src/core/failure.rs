//! Failure impact analysis: blocked courses, severity, retake timing and
//! revised timelines for each recovery strategy

use crate::core::catalog::CatalogGraph;
use crate::core::error::{Advisory, PlanningError};
use crate::core::models::{CourseId, Season, SemesterSchedule, StudentProfile, TermIndex};
use crate::core::resolver::PrerequisiteResolver;
use crate::core::scheduler::{ScheduleOutcome, ScheduleRequest, SemesterScheduler, SummerPolicy};
use crate::core::scoring::{PlanFeatures, RecoveryFeatures, SuccessScorer};
use crate::core::settings::PlannerSettings;
use crate::core::tracks::{ChoiceSelections, RemainingRequirements, TrackCatalog};
use crate::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub use crate::core::scoring::RecoveryKind;

/// How far ahead to look for the next regular offering of a course
const RETAKE_SEARCH_TERMS: usize = 4;

/// Impact grade of a failed course
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Little or no downstream effect
    Low,
    /// Some courses or terms are delayed
    Moderate,
    /// Large blocked set, a multi-track chokepoint, or a multi-term delay
    Critical,
}

/// When the failed course can be attempted again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetakeTiming {
    /// Next fall/spring term offering the course
    pub next_regular: Option<TermIndex>,
    /// Next summer session offering the course
    pub summer: Option<TermIndex>,
}

/// Change between the on-track schedule and the revised one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineDelta {
    /// Graduation term had the course been passed
    pub baseline_graduation: Option<TermIndex>,
    /// Graduation term after the failure
    pub revised_graduation: Option<TermIndex>,
    /// Extra regular terms needed
    pub additional_terms: usize,
    /// Courses that move to a later term, by code
    pub delayed_courses: Vec<String>,
}

/// One way to recover from the failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryStrategy {
    /// Strategy kind
    pub kind: RecoveryKind,
    /// Term the course is retaken in
    pub retake_term: TermIndex,
    /// Resulting graduation term
    pub graduation_term: Option<TermIndex>,
    /// Extra regular terms compared with the baseline
    pub additional_terms: usize,
    /// Heuristic success probability
    pub success_probability: f64,
    /// Whether this is the suggested strategy
    pub recommended: bool,
}

/// Structured result of a failure analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureImpactReport {
    /// Failed course code
    pub course: String,
    /// Term the course was failed in
    pub failure_term: TermIndex,
    /// Every course that transitively requires the failed one
    pub blocked_courses: Vec<String>,
    /// Blocked courses named by the student's track (or the major's tracks)
    pub track_blocked_courses: Vec<String>,
    /// Number of tracks whose coursework depends on the failed course
    pub dependent_tracks: usize,
    /// Impact grade
    pub severity: Severity,
    /// Retake opportunities
    pub retake: RetakeTiming,
    /// Revised schedule for the recommended strategy
    pub revised_schedule: Vec<SemesterSchedule>,
    /// Change against the baseline
    pub delta: TimelineDelta,
    /// Success probability of the revised plan
    pub revised_success_probability: f64,
    /// Recovery strategies, recommended one first
    pub strategies: Vec<RecoveryStrategy>,
    /// Non-fatal issues
    pub advisories: Vec<Advisory>,
}

/// Computes the consequences of failing a course
pub struct FailureImpactAnalyzer<'a> {
    graph: &'a CatalogGraph,
    tracks: &'a TrackCatalog,
    settings: &'a PlannerSettings,
    scorer: &'a dyn SuccessScorer,
}

impl<'a> FailureImpactAnalyzer<'a> {
    /// Create an analyzer
    #[must_use]
    pub fn new(
        graph: &'a CatalogGraph,
        tracks: &'a TrackCatalog,
        settings: &'a PlannerSettings,
        scorer: &'a dyn SuccessScorer,
    ) -> Self {
        Self {
            graph,
            tracks,
            settings,
            scorer,
        }
    }

    /// Analyze failing `course` in `failure_term` (the profile's current term when `None`).
    ///
    /// # Errors
    /// - `UnknownCourseCode` if the course is not in the catalog
    /// - `UnknownMajor` / `UnknownTrack` for bad profile ids
    /// - `SchedulingDeadlock` if no recovery strategy can be scheduled
    pub fn analyze(
        &self,
        course: &str,
        profile: &StudentProfile,
        failure_term: Option<TermIndex>,
    ) -> Result<FailureImpactReport, PlanningError> {
        let failed = self.graph.require_id(course)?;
        let failure_term = failure_term.unwrap_or(profile.current_term);
        let resolver = PrerequisiteResolver::new(self.graph);
        info!("Analyzing failure of {} in {}", course, failure_term);

        let blocked = resolver.transitive_blocked(failed);
        let (dependent_tracks, track_blocked) = self.track_centrality(failed, &blocked, profile);
        let retake = self.retake_timing(failed, failure_term);

        let mut advisories = Vec::new();
        let start = failure_term.next();
        let summers = if self.settings.allow_summer {
            SummerPolicy::All
        } else {
            SummerPolicy::Skip
        };

        let baseline_profile = Self::with_course(profile, failed, self.graph, true, &blocked);
        let baseline_remaining = self.remaining(&baseline_profile, &mut advisories)?;
        let base_request = ScheduleRequest::new(start, profile.credit_load, self.settings.horizon)
            .with_summers(summers.clone());
        let scheduler = SemesterScheduler::new(self.graph, self.settings);
        let baseline = scheduler.schedule(&baseline_remaining, &base_request)?;

        let revised_profile = Self::with_course(profile, failed, self.graph, false, &blocked);
        let mut revised_remaining = self.remaining(&revised_profile, &mut Vec::new())?;
        if !revised_remaining.required.contains(&failed) {
            revised_remaining.required.push(failed);
        }

        let difficulty = self.graph.course(failed).difficulty;
        let mut strategies: Vec<(RecoveryStrategy, ScheduleOutcome)> = Vec::new();

        for (kind, retake_term) in self.candidate_retakes(failed, &retake) {
            let request = match kind {
                RecoveryKind::OffCycleRetake => {
                    let policy = match &summers {
                        SummerPolicy::All => SummerPolicy::All,
                        _ => SummerPolicy::Only(BTreeSet::from([retake_term])),
                    };
                    base_request.clone().with_summers(policy)
                }
                _ => base_request.clone(),
            }
            .not_before(failed, retake_term);

            match scheduler.schedule(&revised_remaining, &request) {
                Ok(outcome) => {
                    let additional = outcome
                        .regular_term_count()
                        .saturating_sub(baseline.regular_term_count());
                    let success_probability = self.scorer.recovery_success(&RecoveryFeatures {
                        kind,
                        difficulty,
                        delay_terms: additional,
                    });
                    strategies.push((
                        RecoveryStrategy {
                            kind,
                            retake_term: outcome.placements.get(&failed).copied().unwrap_or(retake_term),
                            graduation_term: outcome.last_term(),
                            additional_terms: additional,
                            success_probability,
                            recommended: false,
                        },
                        outcome,
                    ));
                }
                Err(err) => debug!("Recovery strategy '{}' not schedulable: {}", kind, err),
            }
        }

        // Fewest extra terms first, then the most likely to succeed
        strategies.sort_by(|(a, _), (b, _)| {
            a.additional_terms
                .cmp(&b.additional_terms)
                .then_with(|| b.success_probability.total_cmp(&a.success_probability))
                .then_with(|| a.kind.cmp(&b.kind))
        });

        let Some((best, revised)) = strategies.first_mut() else {
            return Err(PlanningError::SchedulingDeadlock {
                unmet: vec![course.to_string()],
                horizon: self.settings.horizon,
            });
        };
        best.recommended = true;
        let revised = revised.clone();

        let delta = self.delta(&baseline, &revised, failed);
        let severity = self.severity(blocked.len(), dependent_tracks, &track_blocked, &delta);
        let revised_success_probability = self.scorer.plan_success(&PlanFeatures {
            load: profile.credit_load,
            goal: profile.graduation_goal,
            heavy_terms: revised
                .advisories
                .iter()
                .filter(|a| matches!(a, Advisory::CreditOverload { .. }))
                .count(),
            failure_delays: delta.additional_terms,
        });

        advisories.extend(revised.advisories.iter().cloned());

        Ok(FailureImpactReport {
            course: course.to_string(),
            failure_term,
            blocked_courses: self.codes(&blocked),
            track_blocked_courses: self.codes(&track_blocked),
            dependent_tracks,
            severity,
            retake,
            revised_schedule: revised.semesters,
            delta,
            revised_success_probability,
            strategies: strategies.into_iter().map(|(s, _)| s).collect(),
            advisories,
        })
    }

    /// Profile copy with the course passed (`passed`) or removed along with
    /// in-progress courses that depend on it
    fn with_course(
        profile: &StudentProfile,
        course: CourseId,
        graph: &CatalogGraph,
        passed: bool,
        blocked: &BTreeSet<CourseId>,
    ) -> StudentProfile {
        let code = graph.code(course).to_string();
        let mut copy = profile.clone();
        copy.in_progress_courses.remove(&code);
        if passed {
            copy.completed_courses.insert(code);
        } else {
            copy.completed_courses.remove(&code);
            copy.in_progress_courses
                .retain(|c| graph.id_of(c).is_none_or(|id| !blocked.contains(&id)));
        }
        copy
    }

    /// Resolve requirements, leaving pending choice groups out of the estimate
    fn remaining(
        &self,
        profile: &StudentProfile,
        advisories: &mut Vec<Advisory>,
    ) -> Result<RemainingRequirements, PlanningError> {
        let mut remaining = self
            .tracks
            .resolve(self.graph, profile, &ChoiceSelections::new())?;
        advisories.append(&mut remaining.advisories);
        for pending in remaining.pending.drain(..) {
            advisories.push(Advisory::ChoicePending {
                group: pending.group,
            });
        }
        Ok(remaining)
    }

    /// Number of tracks depending on the course, and the blocked courses the
    /// student's declared tracks (or the major's tracks, if none chosen) name
    fn track_centrality(
        &self,
        failed: CourseId,
        blocked: &BTreeSet<CourseId>,
        profile: &StudentProfile,
    ) -> (usize, BTreeSet<CourseId>) {
        let depends = |c: &CourseId| *c == failed || blocked.contains(c);

        let dependent_tracks = self
            .tracks
            .tracks()
            .filter(|t| {
                t.requirements
                    .iter()
                    .flat_map(|r| r.named_courses())
                    .any(|c| depends(&c))
            })
            .count();

        let relevant: Vec<&str> = match (&profile.track, self.tracks.major(&profile.major)) {
            (Some(track), _) => std::iter::once(track.as_str())
                .chain(profile.second_track.as_deref())
                .collect(),
            (None, Some(major)) => major.tracks.iter().map(String::as_str).collect(),
            (None, None) => Vec::new(),
        };
        let track_blocked = relevant
            .iter()
            .filter_map(|id| self.tracks.track(id))
            .flat_map(|t| t.requirements.iter().flat_map(|r| r.named_courses()))
            .filter(|c| blocked.contains(c))
            .collect();

        (dependent_tracks, track_blocked)
    }

    fn retake_timing(&self, course: CourseId, failure_term: TermIndex) -> RetakeTiming {
        let info = self.graph.course(course);

        let mut term = failure_term;
        let mut next_regular = None;
        for _ in 0..RETAKE_SEARCH_TERMS {
            term = term.next_regular();
            if info.is_offered_in(term.season) {
                next_regular = Some(term);
                break;
            }
        }

        let summer = info.is_offered_in(Season::Summer).then(|| {
            if failure_term.is_off_cycle() {
                TermIndex::new(failure_term.year.saturating_add(1), failure_term.season)
            } else {
                failure_term.following_summer()
            }
        });

        RetakeTiming {
            next_regular,
            summer,
        }
    }

    /// Retake term for each applicable strategy
    fn candidate_retakes(
        &self,
        course: CourseId,
        retake: &RetakeTiming,
    ) -> Vec<(RecoveryKind, TermIndex)> {
        let info = self.graph.course(course);
        let mut candidates = Vec::new();

        if let Some(term) = retake.next_regular {
            candidates.push((RecoveryKind::ImmediateRetake, term));

            let mut later = term;
            for _ in 0..RETAKE_SEARCH_TERMS {
                later = later.next_regular();
                if info.is_offered_in(later.season) {
                    candidates.push((RecoveryKind::PreparationThenRetake, later));
                    break;
                }
            }
        }
        if let Some(term) = retake.summer {
            candidates.push((RecoveryKind::OffCycleRetake, term));
        }

        candidates
    }

    fn delta(
        &self,
        baseline: &ScheduleOutcome,
        revised: &ScheduleOutcome,
        failed: CourseId,
    ) -> TimelineDelta {
        let mut delayed: Vec<String> = revised
            .placements
            .iter()
            .filter(|(course, term)| {
                **course != failed && baseline.placements.get(course).is_some_and(|b| b < term)
            })
            .map(|(course, _)| self.graph.code(*course).to_string())
            .collect();
        delayed.sort();

        TimelineDelta {
            baseline_graduation: baseline.last_term(),
            revised_graduation: revised.last_term(),
            additional_terms: revised
                .regular_term_count()
                .saturating_sub(baseline.regular_term_count()),
            delayed_courses: delayed,
        }
    }

    fn severity(
        &self,
        blocked: usize,
        dependent_tracks: usize,
        track_blocked: &BTreeSet<CourseId>,
        delta: &TimelineDelta,
    ) -> Severity {
        let thresholds = &self.settings.severity;
        let chokepoint = dependent_tracks >= thresholds.chokepoint_tracks && !track_blocked.is_empty();

        if blocked >= thresholds.critical_blocked || chokepoint || delta.additional_terms >= 2 {
            Severity::Critical
        } else if blocked > 0 || delta.additional_terms > 0 {
            Severity::Moderate
        } else {
            Severity::Low
        }
    }

    fn codes(&self, courses: &BTreeSet<CourseId>) -> Vec<String> {
        let mut codes: Vec<String> = courses
            .iter()
            .map(|c| self.graph.code(*c).to_string())
            .collect();
        codes.sort();
        codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::CatalogBuilder;
    use crate::core::models::{Category, Course, Major, Requirement, Track};
    use crate::core::scoring::WeightedScorer;

    fn fixture() -> (CatalogGraph, TrackCatalog) {
        let mut builder = CatalogBuilder::new();
        builder
            .add_course(Course::new("A".into(), "A".into(), 3.0, Category::Foundation))
            .add_course(
                Course::new("B".into(), "B".into(), 3.0, Category::Foundation)
                    .with_offered(&[Season::Fall, Season::Spring, Season::Summer]),
            )
            .add_course(Course::new("C".into(), "C".into(), 3.0, Category::Foundation))
            .add_prerequisite("B", "A")
            .add_prerequisite("C", "B");
        let graph = builder.build().unwrap();

        let mut tracks = TrackCatalog::new();
        tracks.add_major(Major {
            id: "cs".into(),
            name: "CS".into(),
            requirements: ["A", "B", "C"]
                .iter()
                .map(|c| Requirement::RequiredCourse {
                    course: graph.id_of(c).unwrap(),
                })
                .collect(),
            tracks: Vec::new(),
        });
        (graph, tracks)
    }

    fn profile() -> StudentProfile {
        StudentProfile::new("cs")
            .with_completed(&["A"])
            .at_term(TermIndex::new(1, Season::Spring))
    }

    #[test]
    fn test_chain_failure_blocks_downstream_only() {
        let (graph, tracks) = fixture();
        let settings = PlannerSettings::default();
        let scorer = WeightedScorer::default();
        let analyzer = FailureImpactAnalyzer::new(&graph, &tracks, &settings, &scorer);

        let report = analyzer.analyze("B", &profile(), None).unwrap();
        assert_eq!(report.blocked_courses, vec!["C".to_string()]);
        assert!(!report.blocked_courses.contains(&"A".to_string()));
        assert_eq!(report.severity, Severity::Moderate);
    }

    #[test]
    fn test_retake_timing_and_strategies() {
        let (graph, tracks) = fixture();
        let settings = PlannerSettings::default();
        let scorer = WeightedScorer::default();
        let analyzer = FailureImpactAnalyzer::new(&graph, &tracks, &settings, &scorer);

        let report = analyzer.analyze("B", &profile(), None).unwrap();
        assert_eq!(report.retake.next_regular, Some(TermIndex::new(2, Season::Fall)));
        assert_eq!(report.retake.summer, Some(TermIndex::new(1, Season::Summer)));

        let kinds: BTreeSet<RecoveryKind> = report.strategies.iter().map(|s| s.kind).collect();
        assert_eq!(kinds.len(), 3);
        assert_eq!(report.strategies.iter().filter(|s| s.recommended).count(), 1);
        assert!(report.strategies[0].recommended);

        let off_cycle = report
            .strategies
            .iter()
            .find(|s| s.kind == RecoveryKind::OffCycleRetake)
            .unwrap();
        assert_eq!(off_cycle.retake_term, TermIndex::new(1, Season::Summer));
        assert_eq!(off_cycle.additional_terms, 0);
        for strategy in &report.strategies {
            assert!((0.0..=1.0).contains(&strategy.success_probability));
        }
    }

    #[test]
    fn test_leaf_failure_blocks_nothing() {
        let (graph, tracks) = fixture();
        let settings = PlannerSettings::default();
        let scorer = WeightedScorer::default();
        let analyzer = FailureImpactAnalyzer::new(&graph, &tracks, &settings, &scorer);

        let profile = StudentProfile::new("cs")
            .with_completed(&["A", "B"])
            .at_term(TermIndex::new(2, Season::Fall));
        let report = analyzer.analyze("C", &profile, None).unwrap();
        assert!(report.blocked_courses.is_empty());
        assert_eq!(report.delta.additional_terms, 1);
        assert_eq!(report.severity, Severity::Moderate);
        assert!(report.revised_success_probability < 0.75);
    }

    #[test]
    fn test_severity_grades() {
        let (graph, tracks) = fixture();
        let settings = PlannerSettings::default();
        let scorer = WeightedScorer::default();
        let analyzer = FailureImpactAnalyzer::new(&graph, &tracks, &settings, &scorer);
        let on_time = TimelineDelta {
            baseline_graduation: None,
            revised_graduation: None,
            additional_terms: 0,
            delayed_courses: Vec::new(),
        };
        let none = BTreeSet::new();

        assert_eq!(analyzer.severity(0, 0, &none, &on_time), Severity::Low);
        assert_eq!(analyzer.severity(2, 0, &none, &on_time), Severity::Moderate);
        assert_eq!(analyzer.severity(5, 0, &none, &on_time), Severity::Critical);

        let two_terms = TimelineDelta {
            additional_terms: 2,
            ..on_time
        };
        assert_eq!(analyzer.severity(0, 0, &none, &two_terms), Severity::Critical);
    }

    #[test]
    fn test_unknown_course() {
        let (graph, tracks) = fixture();
        let settings = PlannerSettings::default();
        let scorer = WeightedScorer::default();
        let analyzer = FailureImpactAnalyzer::new(&graph, &tracks, &settings, &scorer);
        assert_eq!(
            analyzer.analyze("Z", &profile(), None).unwrap_err(),
            PlanningError::UnknownCourseCode("Z".into())
        );
    }

    #[test]
    fn test_chokepoint_is_critical() {
        let (graph, mut tracks) = fixture();
        let c = graph.id_of("C").unwrap();
        let mut major = tracks.major("cs").unwrap().clone();
        major.tracks = vec!["t1".into(), "t2".into()];
        tracks.add_major(major);
        for id in ["t1", "t2"] {
            tracks.add_track(Track {
                id: id.into(),
                name: id.into(),
                major: "cs".into(),
                requirements: vec![Requirement::RequiredCourse { course: c }],
                min_terms: 1,
            });
        }
        let settings = PlannerSettings::default();
        let scorer = WeightedScorer::default();
        let analyzer = FailureImpactAnalyzer::new(&graph, &tracks, &settings, &scorer);

        let report = analyzer
            .analyze("B", &profile().with_track("t1"), None)
            .unwrap();
        assert_eq!(report.dependent_tracks, 2);
        assert_eq!(report.severity, Severity::Critical);
    }
}
