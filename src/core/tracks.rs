//! Track requirement catalog: majors, tracks and their resolution against a profile

use crate::core::catalog::CatalogGraph;
use crate::core::error::{Advisory, PlanningError};
use crate::core::models::{
    Category, ChoiceKind, ChoiceOption, CourseId, Major, PendingChoice, Requirement,
    StudentProfile, Track,
};
use crate::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Selection key used for choosing a track
pub const TRACK_GROUP: &str = "track";

/// Caller-supplied choice selections: group id → chosen option ids
pub type ChoiceSelections = BTreeMap<String, Vec<String>>;

/// Credits still owed toward a category quota
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditQuota {
    /// Category whose courses count
    pub category: Category,
    /// Credits still needed after completed coursework
    pub credits_needed: f32,
}

/// What a profile still has to schedule for its major and track
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RemainingRequirements {
    /// Track in effect (declared or selected)
    pub track: Option<String>,
    /// Courses that must still be scheduled, in requirement order
    pub required: Vec<CourseId>,
    /// Open credit quotas
    pub quotas: Vec<CreditQuota>,
    /// Choice groups that need a caller selection
    pub pending: Vec<PendingChoice>,
    /// Non-fatal issues found while resolving
    pub advisories: Vec<Advisory>,
    /// Known completed or in-progress courses
    pub completed: BTreeSet<CourseId>,
    /// Second track of a dual-track profile
    pub second_track: Option<String>,
    /// Courses (completed or planned) that satisfy track requirements
    pub track_courses: BTreeSet<CourseId>,
    /// Courses named by both declared tracks
    pub shared_courses: Vec<CourseId>,
}

impl RemainingRequirements {
    /// Whether any choice is still open
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

/// Registry of majors and tracks, immutable once loaded
#[derive(Debug, Clone, Default)]
pub struct TrackCatalog {
    majors: BTreeMap<String, Major>,
    tracks: BTreeMap<String, Track>,
}

impl TrackCatalog {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a major
    pub fn add_major(&mut self, major: Major) {
        self.majors.insert(major.id.clone(), major);
    }

    /// Register a track
    pub fn add_track(&mut self, track: Track) {
        self.tracks.insert(track.id.clone(), track);
    }

    /// Look up a major
    #[must_use]
    pub fn major(&self, id: &str) -> Option<&Major> {
        self.majors.get(id)
    }

    /// Look up a track
    #[must_use]
    pub fn track(&self, id: &str) -> Option<&Track> {
        self.tracks.get(id)
    }

    /// All majors, ordered by id
    pub fn majors(&self) -> impl Iterator<Item = &Major> {
        self.majors.values()
    }

    /// All tracks, ordered by id
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    /// Tracks offered by `major`
    pub fn tracks_of<'a>(&'a self, major: &'a Major) -> impl Iterator<Item = &'a Track> + 'a {
        major.tracks.iter().filter_map(|id| self.tracks.get(id))
    }

    /// Resolve the profile's major and track requirements.
    ///
    /// Requirements come from the major, then the track, then the second
    /// track if one is declared. Every course satisfies at most one
    /// requirement: required courses are settled first, choice groups
    /// only draw on what is left, and credit quotas only count completed
    /// courses no other rule claimed.
    ///
    /// # Errors
    /// - `UnknownMajor` / `UnknownTrack` for profile or selection ids that do not exist
    /// - `UnsatisfiableChoiceGroup` when a selection has the wrong size,
    ///   names a non-candidate, or targets an unknown group
    pub fn resolve(
        &self,
        graph: &CatalogGraph,
        profile: &StudentProfile,
        selections: &ChoiceSelections,
    ) -> Result<RemainingRequirements, PlanningError> {
        let major = self
            .major(&profile.major)
            .ok_or_else(|| PlanningError::UnknownMajor(profile.major.clone()))?;

        let mut remaining = RemainingRequirements::default();

        for code in profile
            .completed_courses
            .iter()
            .chain(profile.in_progress_courses.iter())
        {
            match graph.id_of(code) {
                Some(id) => {
                    remaining.completed.insert(id);
                }
                None => {
                    warn!("Ignoring unknown course code '{}' in profile", code);
                    remaining
                        .advisories
                        .push(Advisory::UnknownCourseCode { code: code.clone() });
                }
            }
        }

        let track = self.select_track(major, profile, selections)?;
        let second = match track {
            Some(first) => self.select_second_track(major, first, profile)?,
            None => None,
        };
        remaining.track = track.map(|t| t.id.clone());
        remaining.second_track = second.map(|t| t.id.clone());

        if track.is_none() && major.requires_track() {
            debug!("Major '{}' has no track selected; requesting one", major.id);
            remaining.pending.push(PendingChoice {
                group: TRACK_GROUP.to_string(),
                label: format!("{} track selection", major.name),
                kind: ChoiceKind::Track,
                choose: 1,
                options: self
                    .tracks_of(major)
                    .map(|t| ChoiceOption {
                        id: t.id.clone(),
                        title: t.name.clone(),
                    })
                    .collect(),
            });
        }

        let declared: Vec<&Track> = track.into_iter().chain(second).collect();
        let mut shared: BTreeSet<CourseId> = BTreeSet::new();
        if let [first, other] = declared.as_slice() {
            let first_courses: BTreeSet<CourseId> = first
                .requirements
                .iter()
                .flat_map(Requirement::named_courses)
                .collect();
            for course in other.requirements.iter().flat_map(Requirement::named_courses) {
                if first_courses.contains(&course) {
                    shared.insert(course);
                }
            }
        }

        // (requirement, whether a declared track owns it)
        let requirements: Vec<(&Requirement, bool)> = major
            .requirements
            .iter()
            .map(|r| (r, false))
            .chain(
                declared
                    .iter()
                    .copied()
                    .flat_map(|t| t.requirements.iter().map(|r| (r, true))),
            )
            .collect();

        let mut claimed: BTreeSet<CourseId> = BTreeSet::new();
        let mut planned: BTreeSet<CourseId> = BTreeSet::new();
        let mut known_groups: BTreeSet<&str> = BTreeSet::new();
        let mut quotas: Vec<(Category, f32)> = Vec::new();

        // Required courses first, so no choice group can also count them.
        // A course required by several rules is one requirement.
        for (requirement, for_track) in &requirements {
            let Requirement::RequiredCourse { course } = requirement else {
                continue;
            };
            if *for_track {
                remaining.track_courses.insert(*course);
            }
            if remaining.completed.contains(course) {
                claimed.insert(*course);
            } else if planned.insert(*course) {
                remaining.required.push(*course);
            }
        }

        for (requirement, for_track) in &requirements {
            match requirement {
                Requirement::RequiredCourse { .. } => {}
                Requirement::ChooseKOf {
                    id,
                    label,
                    k,
                    candidates,
                } => {
                    known_groups.insert(id.as_str());
                    let done: Vec<CourseId> = candidates
                        .iter()
                        .filter(|c| remaining.completed.contains(*c) && !claimed.contains(*c))
                        .take(*k)
                        .copied()
                        .collect();
                    claimed.extend(done.iter().copied());
                    if *for_track {
                        remaining.track_courses.extend(done.iter().copied());
                    }

                    let need = k.saturating_sub(done.len());
                    if need == 0 {
                        continue;
                    }

                    let open: Vec<CourseId> = candidates
                        .iter()
                        .filter(|c| {
                            !remaining.completed.contains(*c)
                                && !claimed.contains(*c)
                                && !planned.contains(*c)
                        })
                        .copied()
                        .collect();

                    if open.len() < need {
                        return Err(PlanningError::UnsatisfiableChoiceGroup {
                            group: id.clone(),
                            reason: format!(
                                "needs {need} more course(s) but only {} candidate(s) remain",
                                open.len()
                            ),
                        });
                    }

                    if let Some(chosen) = selections.get(id) {
                        let picked = validate_selection(graph, id, need, &open, chosen)?;
                        for course in picked {
                            planned.insert(course);
                            remaining.required.push(course);
                            if *for_track {
                                remaining.track_courses.insert(course);
                            }
                        }
                    } else {
                        debug!("Choice group '{}' pending ({} of {} open)", id, need, k);
                        remaining.pending.push(PendingChoice {
                            group: id.clone(),
                            label: label.clone(),
                            kind: ChoiceKind::Courses,
                            choose: need,
                            options: open
                                .iter()
                                .map(|c| {
                                    let course = graph.course(*c);
                                    ChoiceOption {
                                        id: course.code.clone(),
                                        title: course.title.clone(),
                                    }
                                })
                                .collect(),
                        });
                    }
                }
                Requirement::CreditsOfCategory { category, credits } => {
                    quotas.push((*category, *credits));
                }
            }
        }

        for (category, credits) in quotas {
            let mut earned = 0.0f32;
            let eligible: Vec<CourseId> = remaining
                .completed
                .iter()
                .filter(|c| !claimed.contains(*c) && graph.course(**c).category == category)
                .copied()
                .collect();
            for course in eligible {
                if earned >= credits {
                    break;
                }
                earned += graph.course(course).credits;
                claimed.insert(course);
            }
            if earned < credits {
                remaining.quotas.push(CreditQuota {
                    category,
                    credits_needed: credits - earned,
                });
            }
        }

        // Only shared courses the plan actually counts
        remaining.shared_courses = shared
            .into_iter()
            .filter(|c| remaining.track_courses.contains(c))
            .collect();

        // Selections for groups of a track that is not chosen yet are kept by
        // the caller; only reject unknown groups once every group is visible.
        if remaining.track.is_some() || !major.requires_track() {
            if let Some(unknown) = selections
                .keys()
                .find(|g| g.as_str() != TRACK_GROUP && !known_groups.contains(g.as_str()))
            {
                return Err(PlanningError::UnsatisfiableChoiceGroup {
                    group: unknown.clone(),
                    reason: "no such choice group".to_string(),
                });
            }
        }

        Ok(remaining)
    }

    fn select_track<'a>(
        &'a self,
        major: &Major,
        profile: &StudentProfile,
        selections: &ChoiceSelections,
    ) -> Result<Option<&'a Track>, PlanningError> {
        let requested = match (&profile.track, selections.get(TRACK_GROUP)) {
            (Some(track), _) => Some(track.clone()),
            (None, Some(chosen)) => {
                if chosen.len() != 1 {
                    return Err(PlanningError::UnsatisfiableChoiceGroup {
                        group: TRACK_GROUP.to_string(),
                        reason: format!("exactly one track must be chosen, got {}", chosen.len()),
                    });
                }
                chosen.first().cloned()
            }
            (None, None) => None,
        };

        let Some(requested) = requested else {
            return Ok(None);
        };

        let unknown = || PlanningError::UnknownTrack {
            track: requested.clone(),
            major: major.id.clone(),
        };
        if !major.tracks.contains(&requested) {
            return Err(unknown());
        }
        self.track(&requested).map(Some).ok_or_else(unknown)
    }

    /// Second track of a dual-track profile; the primary's id is ignored
    fn select_second_track<'a>(
        &'a self,
        major: &Major,
        first: &Track,
        profile: &StudentProfile,
    ) -> Result<Option<&'a Track>, PlanningError> {
        let Some(requested) = profile.second_track.as_ref() else {
            return Ok(None);
        };
        if *requested == first.id {
            debug!("Second track '{}' repeats the first; ignoring", requested);
            return Ok(None);
        }
        let unknown = || PlanningError::UnknownTrack {
            track: requested.clone(),
            major: major.id.clone(),
        };
        if !major.tracks.contains(requested) {
            return Err(unknown());
        }
        self.track(requested).map(Some).ok_or_else(unknown)
    }
}

/// Check that `chosen` picks exactly `need` distinct open candidates
fn validate_selection(
    graph: &CatalogGraph,
    group: &str,
    need: usize,
    open: &[CourseId],
    chosen: &[String],
) -> Result<Vec<CourseId>, PlanningError> {
    let unsatisfiable = |reason: String| PlanningError::UnsatisfiableChoiceGroup {
        group: group.to_string(),
        reason,
    };

    let mut picked: Vec<CourseId> = Vec::with_capacity(chosen.len());
    for code in chosen {
        let id = graph
            .id_of(code)
            .filter(|id| open.contains(id))
            .ok_or_else(|| unsatisfiable(format!("'{code}' is not an open candidate")))?;
        if picked.contains(&id) {
            return Err(unsatisfiable(format!("'{code}' selected twice")));
        }
        picked.push(id);
    }

    if picked.len() != need {
        return Err(unsatisfiable(format!(
            "expected {need} selection(s), got {}",
            picked.len()
        )));
    }

    Ok(picked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::CatalogBuilder;
    use crate::core::models::Course;

    fn fixture() -> (CatalogGraph, TrackCatalog) {
        let mut builder = CatalogBuilder::new();
        for (code, category) in [
            ("CS101", Category::Foundation),
            ("CS102", Category::Foundation),
            ("AI301", Category::Track),
            ("ML302", Category::Track),
            ("NLP303", Category::Track),
            ("EL201", Category::Elective),
            ("EL202", Category::Elective),
        ] {
            builder.add_course(Course::new(code.into(), code.into(), 3.0, category));
        }
        builder.add_prerequisite("CS102", "CS101");
        let graph = builder.build().unwrap();
        let id = |code: &str| graph.id_of(code).unwrap();

        let mut catalog = TrackCatalog::new();
        catalog.add_major(Major {
            id: "cs".into(),
            name: "Computer Science".into(),
            requirements: vec![
                Requirement::RequiredCourse { course: id("CS101") },
                Requirement::RequiredCourse { course: id("CS102") },
                Requirement::CreditsOfCategory {
                    category: Category::Elective,
                    credits: 6.0,
                },
            ],
            tracks: vec!["mi".into()],
        });
        catalog.add_track(Track {
            id: "mi".into(),
            name: "Machine Intelligence".into(),
            major: "cs".into(),
            requirements: vec![
                Requirement::RequiredCourse { course: id("AI301") },
                Requirement::ChooseKOf {
                    id: "mi-elective".into(),
                    label: "MI elective".into(),
                    k: 1,
                    candidates: vec![id("ML302"), id("NLP303")],
                },
            ],
            min_terms: 2,
        });
        (graph, catalog)
    }

    #[test]
    fn test_missing_track_is_pending() {
        let (graph, catalog) = fixture();
        let profile = StudentProfile::new("cs");
        let remaining = catalog.resolve(&graph, &profile, &ChoiceSelections::new()).unwrap();

        assert_eq!(remaining.pending.len(), 1);
        assert_eq!(remaining.pending[0].kind, ChoiceKind::Track);
        assert_eq!(remaining.pending[0].options[0].id, "mi");
        assert_eq!(remaining.required.len(), 2);
    }

    #[test]
    fn test_choice_group_pending_then_selected() {
        let (graph, catalog) = fixture();
        let profile = StudentProfile::new("cs").with_track("mi");

        let remaining = catalog.resolve(&graph, &profile, &ChoiceSelections::new()).unwrap();
        assert_eq!(remaining.pending.len(), 1);
        assert_eq!(remaining.pending[0].group, "mi-elective");
        assert_eq!(remaining.pending[0].options.len(), 2);

        let mut selections = ChoiceSelections::new();
        selections.insert("mi-elective".into(), vec!["NLP303".into()]);
        let remaining = catalog.resolve(&graph, &profile, &selections).unwrap();
        assert!(remaining.pending.is_empty());
        assert!(remaining.required.contains(&graph.id_of("NLP303").unwrap()));
    }

    #[test]
    fn test_completed_candidate_satisfies_group() {
        let (graph, catalog) = fixture();
        let profile = StudentProfile::new("cs")
            .with_track("mi")
            .with_completed(&["ML302", "CS101"]);
        let remaining = catalog.resolve(&graph, &profile, &ChoiceSelections::new()).unwrap();

        assert!(remaining.pending.is_empty());
        let codes: Vec<&str> = remaining.required.iter().map(|c| graph.code(*c)).collect();
        assert_eq!(codes, vec!["CS102", "AI301"]);
    }

    #[test]
    fn test_bad_selections_rejected() {
        let (graph, catalog) = fixture();
        let profile = StudentProfile::new("cs").with_track("mi");

        let mut selections = ChoiceSelections::new();
        selections.insert("mi-elective".into(), vec!["ML302".into(), "NLP303".into()]);
        assert!(matches!(
            catalog.resolve(&graph, &profile, &selections),
            Err(PlanningError::UnsatisfiableChoiceGroup { .. })
        ));

        selections.insert("mi-elective".into(), vec!["CS101".into()]);
        assert!(matches!(
            catalog.resolve(&graph, &profile, &selections),
            Err(PlanningError::UnsatisfiableChoiceGroup { .. })
        ));

        let mut selections = ChoiceSelections::new();
        selections.insert("nonexistent".into(), vec!["ML302".into()]);
        assert!(matches!(
            catalog.resolve(&graph, &profile, &selections),
            Err(PlanningError::UnsatisfiableChoiceGroup { group, .. }) if group == "nonexistent"
        ));
    }

    #[test]
    fn test_quota_counts_unclaimed_completed_credits() {
        let (graph, catalog) = fixture();
        let profile = StudentProfile::new("cs")
            .with_track("mi")
            .with_completed(&["EL201"]);
        let remaining = catalog.resolve(&graph, &profile, &ChoiceSelections::new()).unwrap();

        assert_eq!(remaining.quotas.len(), 1);
        assert!((remaining.quotas[0].credits_needed - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_unknown_codes_are_advisories() {
        let (graph, catalog) = fixture();
        let profile = StudentProfile::new("cs")
            .with_track("mi")
            .with_completed(&["OLD999"]);
        let remaining = catalog.resolve(&graph, &profile, &ChoiceSelections::new()).unwrap();

        assert_eq!(
            remaining.advisories,
            vec![Advisory::UnknownCourseCode {
                code: "OLD999".into()
            }]
        );
    }

    #[test]
    fn test_unknown_major_and_track() {
        let (graph, catalog) = fixture();
        assert_eq!(
            catalog
                .resolve(&graph, &StudentProfile::new("art"), &ChoiceSelections::new())
                .unwrap_err(),
            PlanningError::UnknownMajor("art".into())
        );
        assert!(matches!(
            catalog.resolve(
                &graph,
                &StudentProfile::new("cs").with_track("systems"),
                &ChoiceSelections::new()
            ),
            Err(PlanningError::UnknownTrack { .. })
        ));
    }

    #[test]
    fn test_track_selected_through_choices() {
        let (graph, catalog) = fixture();
        let mut selections = ChoiceSelections::new();
        selections.insert(TRACK_GROUP.into(), vec!["mi".into()]);
        selections.insert("mi-elective".into(), vec!["ML302".into()]);

        let remaining = catalog
            .resolve(&graph, &StudentProfile::new("cs"), &selections)
            .unwrap();
        assert_eq!(remaining.track.as_deref(), Some("mi"));
        assert!(!remaining.has_pending());
    }

    /// Major group over X1/Y1 whose tracks also require X1
    fn overlap_fixture() -> (CatalogGraph, TrackCatalog) {
        let mut builder = CatalogBuilder::new();
        for code in ["X1", "Y1", "Z1", "W1"] {
            builder.add_course(Course::new(code.into(), code.into(), 4.0, Category::Track));
        }
        let graph = builder.build().unwrap();
        let id = |code: &str| graph.id_of(code).unwrap();

        let mut catalog = TrackCatalog::new();
        catalog.add_major(Major {
            id: "m".into(),
            name: "Major".into(),
            requirements: vec![Requirement::ChooseKOf {
                id: "g".into(),
                label: "Core choice".into(),
                k: 1,
                candidates: vec![id("X1"), id("Y1")],
            }],
            tracks: vec!["t".into(), "u".into()],
        });
        catalog.add_track(Track {
            id: "t".into(),
            name: "T".into(),
            major: "m".into(),
            requirements: vec![Requirement::RequiredCourse { course: id("X1") }],
            min_terms: 1,
        });
        catalog.add_track(Track {
            id: "u".into(),
            name: "U".into(),
            major: "m".into(),
            requirements: vec![
                Requirement::RequiredCourse { course: id("X1") },
                Requirement::RequiredCourse { course: id("Z1") },
                Requirement::RequiredCourse { course: id("W1") },
            ],
            min_terms: 1,
        });
        (graph, catalog)
    }

    #[test]
    fn test_completed_course_counts_once_across_group_and_track() {
        let (graph, catalog) = overlap_fixture();
        let profile = StudentProfile::new("m")
            .with_track("t")
            .with_completed(&["X1"]);
        let remaining = catalog.resolve(&graph, &profile, &ChoiceSelections::new()).unwrap();

        assert!(remaining.required.is_empty());
        assert_eq!(remaining.pending.len(), 1);
        assert_eq!(remaining.pending[0].group, "g");
        let options: Vec<&str> = remaining.pending[0].options.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(options, vec!["Y1"]);
    }

    #[test]
    fn test_group_cannot_select_track_required_course() {
        let (graph, catalog) = overlap_fixture();
        let profile = StudentProfile::new("m").with_track("t");

        let mut selections = ChoiceSelections::new();
        selections.insert("g".into(), vec!["X1".into()]);
        assert!(matches!(
            catalog.resolve(&graph, &profile, &selections),
            Err(PlanningError::UnsatisfiableChoiceGroup { group, .. }) if group == "g"
        ));

        selections.insert("g".into(), vec!["Y1".into()]);
        let remaining = catalog.resolve(&graph, &profile, &selections).unwrap();
        let codes: Vec<&str> = remaining.required.iter().map(|c| graph.code(*c)).collect();
        assert_eq!(codes, vec!["X1", "Y1"]);
    }

    #[test]
    fn test_second_track_merges_shared_courses_once() {
        let (graph, catalog) = overlap_fixture();
        let profile = StudentProfile::new("m")
            .with_track("t")
            .with_second_track("u");
        let mut selections = ChoiceSelections::new();
        selections.insert("g".into(), vec!["Y1".into()]);
        let remaining = catalog.resolve(&graph, &profile, &selections).unwrap();

        assert_eq!(remaining.second_track.as_deref(), Some("u"));
        let codes: Vec<&str> = remaining.required.iter().map(|c| graph.code(*c)).collect();
        assert_eq!(codes, vec!["X1", "Z1", "W1", "Y1"]);
        assert_eq!(remaining.shared_courses, vec![graph.id_of("X1").unwrap()]);
        assert_eq!(remaining.track_courses.len(), 3);
    }

    #[test]
    fn test_second_track_validation() {
        let (graph, catalog) = overlap_fixture();
        let same = StudentProfile::new("m").with_track("t").with_second_track("t");
        let mut selections = ChoiceSelections::new();
        selections.insert("g".into(), vec!["Y1".into()]);
        let remaining = catalog.resolve(&graph, &same, &selections).unwrap();
        assert_eq!(remaining.second_track, None);

        let unknown = StudentProfile::new("m").with_track("t").with_second_track("v");
        assert!(matches!(
            catalog.resolve(&graph, &unknown, &selections),
            Err(PlanningError::UnknownTrack { track, .. }) if track == "v"
        ));
    }
}
