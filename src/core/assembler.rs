//! Plan assembler: drives a planning request from profile to finished plan
//!
//! The assembler walks a small state machine:
//! `CollectingProfile` → `ResolvingRequirements` → (`AwaitingChoices` when a
//! choice group is open) → `Scheduling` → `Finalized`. Any unrecoverable
//! input moves it to `Error`. A paused request resumes through
//! [`PlanAssembler::resolve_choices`] with the caller's selections.

use crate::core::acceleration::{summer_sessions_before, AccelerationPlanner, Intensity};
use crate::core::catalog::CatalogGraph;
use crate::core::error::{Advisory, PlanningError};
use crate::core::models::{
    ChoiceRequest, CourseId, CreditLoad, GraduationGoal, Plan, Season, StudentProfile,
    TermIndex,
};
use crate::core::scheduler::{ScheduleOutcome, ScheduleRequest, SemesterScheduler, SummerPolicy};
use crate::core::scoring::{PlanFeatures, SuccessScorer};
use crate::core::settings::PlannerSettings;
use crate::core::tracks::{ChoiceSelections, RemainingRequirements, TrackCatalog};
use crate::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Assembly progress of one planning request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssemblyState {
    /// Waiting for a profile
    CollectingProfile,
    /// Resolving major and track requirements
    ResolvingRequirements,
    /// Paused on open choice groups
    AwaitingChoices,
    /// Placing courses into terms
    Scheduling,
    /// A plan was produced
    Finalized,
    /// The request failed
    Error,
}

impl fmt::Display for AssemblyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::CollectingProfile => "collecting profile",
            Self::ResolvingRequirements => "resolving requirements",
            Self::AwaitingChoices => "awaiting choices",
            Self::Scheduling => "scheduling",
            Self::Finalized => "finalized",
            Self::Error => "error",
        };
        write!(f, "{label}")
    }
}

/// Everything needed to resume a paused request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningContext {
    /// Profile the request started with
    pub profile: StudentProfile,
    /// Selections supplied so far
    #[serde(default)]
    pub selections: ChoiceSelections,
}

impl PlanningContext {
    /// Start a context with no selections
    #[must_use]
    pub fn new(profile: StudentProfile) -> Self {
        Self {
            profile,
            selections: ChoiceSelections::new(),
        }
    }
}

/// Result of an assembly step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlanOutcome {
    /// A complete plan
    Finalized {
        /// The plan
        plan: Box<Plan>,
    },
    /// Choice groups must be answered before scheduling
    NeedsChoices {
        /// Open groups and their options
        request: ChoiceRequest,
        /// Context to pass back with the selections
        context: PlanningContext,
    },
}

impl PlanOutcome {
    /// The plan, if assembly finished
    #[must_use]
    pub fn plan(&self) -> Option<&Plan> {
        match self {
            Self::Finalized { plan } => Some(plan),
            Self::NeedsChoices { .. } => None,
        }
    }

    /// The choice request, if assembly paused
    #[must_use]
    pub const fn choice_request(&self) -> Option<&ChoiceRequest> {
        match self {
            Self::Finalized { .. } => None,
            Self::NeedsChoices { request, .. } => Some(request),
        }
    }
}

/// How the schedule was shaped to the graduation goal
#[derive(Debug, Clone)]
struct GoalSchedule {
    outcome: ScheduleOutcome,
    load: CreditLoad,
    early_unmet: bool,
}

/// Builds plans for one request at a time
pub struct PlanAssembler<'a> {
    graph: &'a CatalogGraph,
    tracks: &'a TrackCatalog,
    settings: &'a PlannerSettings,
    scorer: &'a dyn SuccessScorer,
    state: AssemblyState,
}

impl<'a> PlanAssembler<'a> {
    /// Create an assembler over a catalog
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
            state: AssemblyState::CollectingProfile,
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> AssemblyState {
        self.state
    }

    /// Plan for `profile`, pausing if a choice group is open.
    ///
    /// # Errors
    /// Any [`PlanningError`] raised while resolving or scheduling; the
    /// assembler is left in [`AssemblyState::Error`].
    pub fn create_plan(&mut self, profile: &StudentProfile) -> Result<PlanOutcome, PlanningError> {
        self.state = AssemblyState::CollectingProfile;
        self.run(PlanningContext::new(profile.clone()))
    }

    /// Resume a paused request with more selections. Later selections for
    /// the same group replace earlier ones.
    ///
    /// # Errors
    /// `UnsatisfiableChoiceGroup` for selections that do not fit their
    /// group, plus anything [`Self::create_plan`] can return.
    pub fn resolve_choices(
        &mut self,
        mut context: PlanningContext,
        selections: ChoiceSelections,
    ) -> Result<PlanOutcome, PlanningError> {
        context.selections.extend(selections);
        self.run(context)
    }

    fn run(&mut self, context: PlanningContext) -> Result<PlanOutcome, PlanningError> {
        match self.assemble(context) {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                self.transition(AssemblyState::Error);
                warn!("Plan assembly failed: {}", err);
                Err(err)
            }
        }
    }

    fn transition(&mut self, next: AssemblyState) {
        info!("Assembler: {} -> {}", self.state, next);
        self.state = next;
    }

    fn assemble(&mut self, context: PlanningContext) -> Result<PlanOutcome, PlanningError> {
        self.transition(AssemblyState::ResolvingRequirements);
        let remaining = self
            .tracks
            .resolve(self.graph, &context.profile, &context.selections)?;

        if remaining.has_pending() {
            self.transition(AssemblyState::AwaitingChoices);
            let request = ChoiceRequest {
                major: context.profile.major.clone(),
                track: remaining.track.clone(),
                groups: remaining.pending,
            };
            return Ok(PlanOutcome::NeedsChoices { request, context });
        }

        self.transition(AssemblyState::Scheduling);
        let profile = &context.profile;
        let scheduled = self.schedule_for_goal(&remaining, profile)?;
        self.validate(&remaining, &scheduled.outcome)?;

        let plan = self.finalize(&remaining, profile, scheduled);
        self.transition(AssemblyState::Finalized);
        Ok(PlanOutcome::Finalized {
            plan: Box::new(plan),
        })
    }

    fn summer_policy(&self) -> SummerPolicy {
        if self.settings.allow_summer {
            SummerPolicy::All
        } else {
            SummerPolicy::Skip
        }
    }

    fn schedule_for_goal(
        &self,
        remaining: &RemainingRequirements,
        profile: &StudentProfile,
    ) -> Result<GoalSchedule, PlanningError> {
        let scheduler = SemesterScheduler::new(self.graph, self.settings);
        let start = profile.planning_start();

        match profile.graduation_goal {
            GraduationGoal::Standard => {
                let request = ScheduleRequest::new(start, profile.credit_load, self.settings.horizon)
                    .with_summers(self.summer_policy());
                Ok(GoalSchedule {
                    outcome: scheduler.schedule(remaining, &request)?,
                    load: profile.credit_load,
                    early_unmet: false,
                })
            }
            GraduationGoal::Flexible => {
                let horizon = self.settings.horizon + self.settings.flexible_extra_terms;
                let request = ScheduleRequest::new(start, profile.credit_load, horizon)
                    .with_summers(self.summer_policy());
                Ok(GoalSchedule {
                    outcome: scheduler.schedule(remaining, &request)?,
                    load: profile.credit_load,
                    early_unmet: false,
                })
            }
            GraduationGoal::Early => self.schedule_early(&scheduler, remaining, start, profile),
        }
    }

    /// Heavier caps plus greedily accepted summer sessions, compared with a
    /// standard-pace plan. "Early" means strictly fewer scheduled terms.
    /// When summers are allowed, a plan using every summer also competes;
    /// it is the only option when a required course runs in summer alone.
    fn schedule_early(
        &self,
        scheduler: &SemesterScheduler<'_>,
        remaining: &RemainingRequirements,
        start: TermIndex,
        profile: &StudentProfile,
    ) -> Result<GoalSchedule, PlanningError> {
        let load = profile.credit_load.relaxed();
        let horizon = self.settings.horizon;

        let reference_request = ScheduleRequest::new(start, CreditLoad::Standard, horizon)
            .with_summers(self.summer_policy());
        let reference = scheduler.schedule(remaining, &reference_request)?;

        let base = ScheduleRequest::new(start, load, horizon);
        let greedy = Self::greedy_summers(scheduler, remaining, &base, start);
        let best = if self.settings.allow_summer {
            let every_summer = base.clone().with_summers(SummerPolicy::All);
            match (greedy, scheduler.schedule(remaining, &every_summer)) {
                (Ok(greedy), Ok(all)) => {
                    if Self::shorter(&all, &greedy) {
                        debug!("Early goal: every summer beats the greedy pick");
                        all
                    } else {
                        greedy
                    }
                }
                (Ok(only), Err(err)) | (Err(err), Ok(only)) => {
                    debug!("Early goal: one candidate failed: {}", err);
                    only
                }
                (Err(err), Err(_)) => return Err(err),
            }
        } else {
            greedy?
        };

        let unmet = !reference.semesters.is_empty()
            && best.semesters.len() >= reference.semesters.len();
        if unmet && self.settings.strict_early_goal {
            let terms = reference.semesters.len();
            return Err(PlanningError::SchedulingDeadlock {
                unmet: vec![format!(
                    "early graduation (no plan shorter than {terms} terms)"
                )],
                horizon,
            });
        }

        Ok(GoalSchedule {
            outcome: best,
            load,
            early_unmet: unmet,
        })
    }

    /// Regular terms at `base`, adding one summer at a time while it shortens the plan
    fn greedy_summers(
        scheduler: &SemesterScheduler<'_>,
        remaining: &RemainingRequirements,
        base: &ScheduleRequest,
        start: TermIndex,
    ) -> Result<ScheduleOutcome, PlanningError> {
        let mut best = scheduler.schedule(remaining, base)?;
        let mut accepted: BTreeSet<TermIndex> = BTreeSet::new();

        for summer in summer_sessions_before(start, best.last_term()) {
            let mut trial = accepted.clone();
            trial.insert(summer);
            let request = base.clone().with_summers(SummerPolicy::Only(trial.clone()));
            match scheduler.schedule(remaining, &request) {
                Ok(outcome) if Self::shorter(&outcome, &best) => {
                    debug!("Early goal: {} shortens the plan", summer);
                    accepted = trial;
                    best = outcome;
                }
                Ok(_) => debug!("Early goal: {} does not help", summer),
                Err(err) => debug!("Early goal: {} rejected: {}", summer, err),
            }
        }
        Ok(best)
    }

    /// Fewer terms, or as many terms ending earlier
    fn shorter(candidate: &ScheduleOutcome, current: &ScheduleOutcome) -> bool {
        (candidate.semesters.len(), candidate.last_term())
            < (current.semesters.len(), current.last_term())
    }

    /// Every required course must be completed or placed
    fn validate(
        &self,
        remaining: &RemainingRequirements,
        outcome: &ScheduleOutcome,
    ) -> Result<(), PlanningError> {
        let unmet: Vec<String> = remaining
            .required
            .iter()
            .filter(|c| !remaining.completed.contains(c) && !outcome.placements.contains_key(c))
            .map(|c| self.graph.code(*c).to_string())
            .collect();

        if unmet.is_empty() {
            Ok(())
        } else {
            Err(PlanningError::SchedulingDeadlock {
                unmet,
                horizon: self.settings.horizon,
            })
        }
    }

    fn finalize(
        &self,
        remaining: &RemainingRequirements,
        profile: &StudentProfile,
        scheduled: GoalSchedule,
    ) -> Plan {
        let GoalSchedule {
            outcome,
            load,
            early_unmet,
        } = scheduled;

        let warnings = self.warnings(remaining, profile, &outcome, early_unmet);
        let notes = self.customization_notes(remaining, profile, &outcome, load);
        let heavy_terms = warnings
            .iter()
            .filter(|w| matches!(w, Advisory::CreditOverload { .. }))
            .count();

        let success_probability = self.scorer.plan_success(&PlanFeatures {
            load,
            goal: profile.graduation_goal,
            heavy_terms,
            failure_delays: 0,
        });

        Plan {
            major: profile.major.clone(),
            track: remaining.track.clone(),
            second_track: remaining.second_track.clone(),
            graduation_term: outcome.last_term().unwrap_or(profile.current_term),
            semesters: outcome.semesters,
            success_probability,
            warnings,
            customization_notes: notes,
        }
    }

    fn warnings(
        &self,
        remaining: &RemainingRequirements,
        profile: &StudentProfile,
        outcome: &ScheduleOutcome,
        early_unmet: bool,
    ) -> Vec<Advisory> {
        let mut warnings = remaining.advisories.clone();
        warnings.extend(outcome.advisories.iter().cloned());

        let acceleration = AccelerationPlanner::new(self.graph, self.settings);
        for session in outcome.semesters.iter().filter(|s| s.term.is_off_cycle()) {
            let difficulty = acceleration.session_difficulty(session);
            if Intensity::from_difficulty(difficulty) == Intensity::Intensive {
                warnings.push(Advisory::IntensiveSummer {
                    term: session.term,
                    difficulty,
                });
            }
        }

        let regular_terms =
            elapsed_regular_terms(profile.planning_start()) + outcome.regular_term_count();
        if regular_terms > self.settings.standard_terms {
            warnings.push(Advisory::ExtendedTimeline {
                regular_terms,
                standard: self.settings.standard_terms,
            });
        }

        let track_credits: f32 = remaining
            .track_courses
            .iter()
            .map(|c| self.graph.course(*c).credits)
            .sum();
        if track_credits > self.settings.typical_track_credits {
            warnings.push(Advisory::TrackCreditsExceeded {
                tracks: remaining
                    .track
                    .iter()
                    .chain(remaining.second_track.iter())
                    .cloned()
                    .collect(),
                credits: track_credits,
                typical_max: self.settings.typical_track_credits,
            });
        }

        if early_unmet {
            warnings.push(Advisory::EarlyGoalUnmet {
                terms: outcome.semesters.len(),
            });
        }

        warnings
    }

    fn customization_notes(
        &self,
        remaining: &RemainingRequirements,
        profile: &StudentProfile,
        outcome: &ScheduleOutcome,
        load: CreditLoad,
    ) -> Vec<String> {
        let mut notes = Vec::new();

        if !remaining.completed.is_empty() {
            notes.push(format!(
                "Counted {} completed or in-progress courses toward requirements",
                remaining.completed.len()
            ));
        }

        if !outcome.added_requisites.is_empty() {
            notes.push(format!(
                "Added prerequisites needed by later coursework: {}",
                self.join_codes(&outcome.added_requisites)
            ));
        }

        if !outcome.quota_courses.is_empty() {
            notes.push(format!(
                "Category credit requirements filled with: {}",
                self.join_codes(&outcome.quota_courses)
            ));
        }

        match profile.graduation_goal {
            GraduationGoal::Early => notes.push(format!(
                "Accelerated for early graduation with a {load} credit load"
            )),
            GraduationGoal::Flexible => notes.push(format!(
                "Flexible timeline allows up to {} regular terms",
                self.settings.horizon + self.settings.flexible_extra_terms
            )),
            GraduationGoal::Standard => {
                notes.push(format!("Standard pace with a {load} credit load"));
            }
        }

        let summers = outcome.summer_terms();
        if !summers.is_empty() {
            let labels: Vec<String> = summers.iter().map(ToString::to_string).collect();
            notes.push(format!("Uses summer sessions: {}", labels.join(", ")));
        }

        if let Some(track) = remaining.track.as_deref().and_then(|id| self.tracks.track(id)) {
            notes.push(format!(
                "Focused on the {} track ({} term minimum)",
                track.name, track.min_terms
            ));
        }

        if let Some(second) = remaining
            .second_track
            .as_deref()
            .and_then(|id| self.tracks.track(id))
        {
            notes.push(format!("Completes the {} track as a second track", second.name));
            if !remaining.shared_courses.is_empty() {
                notes.push(format!(
                    "Courses counted toward both tracks: {}",
                    self.join_codes(&remaining.shared_courses)
                ));
            }
        }

        notes
    }

    fn join_codes(&self, courses: &[CourseId]) -> String {
        courses
            .iter()
            .map(|c| self.graph.code(*c))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Regular terms already behind the student when planning starts
fn elapsed_regular_terms(start: TermIndex) -> usize {
    let before_year = usize::from(start.year.saturating_sub(1)) * 2;
    let within_year = match start.season {
        Season::Fall => 0,
        Season::Spring => 1,
        Season::Summer => 2,
    };
    before_year + within_year
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::CatalogBuilder;
    use crate::core::models::{Category, Course, Major, Requirement, Track};
    use crate::core::scoring::WeightedScorer;
    use crate::core::tracks::TRACK_GROUP;

    struct Fixture {
        graph: CatalogGraph,
        tracks: TrackCatalog,
        settings: PlannerSettings,
        scorer: WeightedScorer,
    }

    impl Fixture {
        fn assembler(&self) -> PlanAssembler<'_> {
            PlanAssembler::new(&self.graph, &self.tracks, &self.settings, &self.scorer)
        }
    }

    /// Foundation F1 → F2, track course T1 requiring F2, and a 1-of-2 elective group
    fn fixture() -> Fixture {
        let mut builder = CatalogBuilder::new();
        builder
            .add_course(Course::new("F1".into(), "Programming I".into(), 4.0, Category::Foundation))
            .add_course(Course::new("F2".into(), "Programming II".into(), 4.0, Category::Foundation))
            .add_course(Course::new("T1".into(), "Machine Learning".into(), 3.0, Category::Track))
            .add_course(Course::new("E1".into(), "Elective One".into(), 3.0, Category::Elective))
            .add_course(Course::new("E2".into(), "Elective Two".into(), 3.0, Category::Elective))
            .add_prerequisite("F2", "F1")
            .add_prerequisite("T1", "F2");
        let graph = builder.build().unwrap();
        let id = |code: &str| graph.id_of(code).unwrap();

        let mut tracks = TrackCatalog::new();
        tracks.add_major(Major {
            id: "cs".into(),
            name: "Computer Science".into(),
            requirements: vec![
                Requirement::RequiredCourse { course: id("F1") },
                Requirement::RequiredCourse { course: id("F2") },
            ],
            tracks: vec!["mi".into()],
        });
        tracks.add_track(Track {
            id: "mi".into(),
            name: "Machine Intelligence".into(),
            major: "cs".into(),
            requirements: vec![
                Requirement::RequiredCourse { course: id("T1") },
                Requirement::ChooseKOf {
                    id: "electives".into(),
                    label: "Elective Selection".into(),
                    k: 1,
                    candidates: vec![id("E1"), id("E2")],
                },
            ],
            min_terms: 3,
        });

        Fixture {
            graph,
            tracks,
            settings: PlannerSettings::default(),
            scorer: WeightedScorer::default(),
        }
    }

    fn selections(pairs: &[(&str, &[&str])]) -> ChoiceSelections {
        pairs
            .iter()
            .map(|(group, picks)| {
                (
                    (*group).to_string(),
                    picks.iter().map(|p| (*p).to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_pauses_for_track_then_group() {
        let fixture = fixture();
        let mut assembler = fixture.assembler();
        assert_eq!(assembler.state(), AssemblyState::CollectingProfile);

        let first = assembler.create_plan(&StudentProfile::new("cs")).unwrap();
        assert_eq!(assembler.state(), AssemblyState::AwaitingChoices);
        let PlanOutcome::NeedsChoices { request, context } = first else {
            panic!("expected a choice request");
        };
        assert_eq!(request.groups.len(), 1);
        assert_eq!(request.groups[0].group, TRACK_GROUP);

        let second = assembler
            .resolve_choices(context, selections(&[(TRACK_GROUP, &["mi"])]))
            .unwrap();
        let PlanOutcome::NeedsChoices { request, context } = second else {
            panic!("expected the elective group next");
        };
        assert_eq!(request.track.as_deref(), Some("mi"));
        assert_eq!(request.groups[0].group, "electives");

        let done = assembler
            .resolve_choices(context, selections(&[("electives", &["E2"])]))
            .unwrap();
        assert_eq!(assembler.state(), AssemblyState::Finalized);
        let plan = done.plan().unwrap();
        assert!(plan.term_of("E2").is_some());
        assert!(plan.term_of("E1").is_none());
        assert!(plan.term_of("F1").unwrap() < plan.term_of("F2").unwrap());
        assert!(plan.term_of("F2").unwrap() < plan.term_of("T1").unwrap());
    }

    #[test]
    fn test_bad_selection_moves_to_error() {
        let fixture = fixture();
        let mut assembler = fixture.assembler();
        let profile = StudentProfile::new("cs").with_track("mi");
        let context = PlanningContext::new(profile);

        let err = assembler
            .resolve_choices(context, selections(&[("electives", &["F1"])]))
            .unwrap_err();
        assert!(matches!(err, PlanningError::UnsatisfiableChoiceGroup { .. }));
        assert_eq!(assembler.state(), AssemblyState::Error);
    }

    #[test]
    fn test_completed_profile_notes_and_graduation_term() {
        let fixture = fixture();
        let mut assembler = fixture.assembler();
        let profile = StudentProfile::new("cs")
            .with_track("mi")
            .with_completed(&["F1", "F2", "E1", "XX999"])
            .at_term(TermIndex::new(3, Season::Fall));

        let outcome = assembler.create_plan(&profile).unwrap();
        let plan = outcome.plan().unwrap();

        assert_eq!(plan.semesters.len(), 1);
        assert_eq!(plan.graduation_term, TermIndex::new(3, Season::Fall));
        assert!(plan
            .warnings
            .contains(&Advisory::UnknownCourseCode { code: "XX999".into() }));
        assert!(plan.customization_notes[0].starts_with("Counted 3"));
        assert!(plan
            .customization_notes
            .iter()
            .any(|n| n.contains("Machine Intelligence")));
        assert!(plan.success_probability > 0.0 && plan.success_probability <= 1.0);
    }

    #[test]
    fn test_unknown_major_is_error_state() {
        let fixture = fixture();
        let mut assembler = fixture.assembler();
        let err = assembler.create_plan(&StudentProfile::new("ee")).unwrap_err();
        assert_eq!(err, PlanningError::UnknownMajor("ee".into()));
        assert_eq!(assembler.state(), AssemblyState::Error);
    }

    #[test]
    fn test_extended_timeline_warning() {
        let fixture = fixture();
        let mut assembler = fixture.assembler();
        let profile = StudentProfile::new("cs")
            .with_track("mi")
            .with_completed(&["E1"])
            .at_term(TermIndex::new(4, Season::Spring));

        let plan = assembler
            .create_plan(&profile)
            .unwrap()
            .plan()
            .cloned()
            .unwrap();
        assert!(plan.warnings.iter().any(|w| matches!(
            w,
            Advisory::ExtendedTimeline { standard: 8, .. }
        )));
    }

    #[test]
    fn test_early_goal_without_gain() {
        let mut fixture = fixture();
        let profile = StudentProfile::new("cs")
            .with_track("mi")
            .with_completed(&["E1"])
            .with_pace(GraduationGoal::Early, CreditLoad::Heavy);

        // The chain F1 → F2 → T1 takes three terms whatever the load
        let err = fixture.assembler().create_plan(&profile).unwrap_err();
        assert!(matches!(err, PlanningError::SchedulingDeadlock { .. }));

        fixture.settings.strict_early_goal = false;
        let plan = fixture
            .assembler()
            .create_plan(&profile)
            .unwrap()
            .plan()
            .cloned()
            .unwrap();
        assert!(plan
            .warnings
            .iter()
            .any(|w| matches!(w, Advisory::EarlyGoalUnmet { .. })));
    }

    /// A100 → S200 where S200 only runs in summer, plus ten general courses
    fn summer_only_fixture() -> Fixture {
        let mut builder = CatalogBuilder::new();
        builder
            .add_course(Course::new("A100".into(), "Foundations".into(), 3.0, Category::Foundation))
            .add_course(
                Course::new("S200".into(), "Field Session".into(), 3.0, Category::Track)
                    .with_offered(&[Season::Summer]),
            )
            .add_prerequisite("S200", "A100");
        let generals: Vec<String> = (1..=10).map(|n| format!("G{n:03}")).collect();
        for code in &generals {
            builder.add_course(Course::new(code.clone(), code.clone(), 3.0, Category::General));
        }
        let graph = builder.build().unwrap();

        let mut requirements: Vec<Requirement> = ["A100", "S200"]
            .iter()
            .map(|code| Requirement::RequiredCourse {
                course: graph.id_of(code).unwrap(),
            })
            .collect();
        requirements.extend(generals.iter().map(|code| Requirement::RequiredCourse {
            course: graph.id_of(code).unwrap(),
        }));

        let mut tracks = TrackCatalog::new();
        tracks.add_major(Major {
            id: "field".into(),
            name: "Field Studies".into(),
            requirements,
            tracks: Vec::new(),
        });

        let mut settings = PlannerSettings::default();
        settings.allow_summer = true;
        Fixture {
            graph,
            tracks,
            settings,
            scorer: WeightedScorer::default(),
        }
    }

    #[test]
    fn test_early_goal_with_summer_only_course() {
        let fixture = summer_only_fixture();
        let standard = fixture
            .assembler()
            .create_plan(&StudentProfile::new("field"))
            .unwrap()
            .plan()
            .cloned()
            .unwrap();
        assert_eq!(standard.semesters.len(), 4);

        let profile =
            StudentProfile::new("field").with_pace(GraduationGoal::Early, CreditLoad::Heavy);
        let plan = fixture
            .assembler()
            .create_plan(&profile)
            .unwrap()
            .plan()
            .cloned()
            .unwrap();
        assert_eq!(plan.semesters.len(), 3);
        assert_eq!(plan.term_of("S200"), Some(TermIndex::new(1, Season::Summer)));
        assert!(!plan
            .warnings
            .iter()
            .any(|w| matches!(w, Advisory::EarlyGoalUnmet { .. })));
    }

    #[test]
    fn test_track_credit_warning() {
        let mut fixture = fixture();
        let profile = StudentProfile::new("cs").with_track("mi");
        let chosen = selections(&[("electives", &["E1"])]);

        let plan = fixture
            .assembler()
            .resolve_choices(PlanningContext::new(profile.clone()), chosen.clone())
            .unwrap()
            .plan()
            .cloned()
            .unwrap();
        assert!(!plan
            .warnings
            .iter()
            .any(|w| matches!(w, Advisory::TrackCreditsExceeded { .. })));

        fixture.settings.typical_track_credits = 5.0;
        let plan = fixture
            .assembler()
            .resolve_choices(PlanningContext::new(profile), chosen)
            .unwrap()
            .plan()
            .cloned()
            .unwrap();
        assert!(plan.warnings.contains(&Advisory::TrackCreditsExceeded {
            tracks: vec!["mi".into()],
            credits: 6.0,
            typical_max: 5.0,
        }));
    }

    #[test]
    fn test_elapsed_regular_terms() {
        assert_eq!(elapsed_regular_terms(TermIndex::new(1, Season::Fall)), 0);
        assert_eq!(elapsed_regular_terms(TermIndex::new(2, Season::Spring)), 3);
        assert_eq!(elapsed_regular_terms(TermIndex::new(2, Season::Summer)), 4);
    }
}
