//! Semester scheduler for distributing remaining coursework across future terms
//!
//! This module implements a term-by-term greedy scheduler that:
//! 1. Pulls in uncompleted transitive requisites of every required course
//! 2. Keeps a ready set of courses whose prerequisites finished in earlier terms
//! 3. Fills each term up to its credit cap, foundation courses first, then
//!    courses with the fewest offered seasons, then lower course levels
//! 4. Places corequisites in the same term when they are not already done
//! 5. Fills open credit quotas from the catalog pool of the matching category
//! 6. Rebalances terms above the typical maximum into later terms with slack

use crate::core::catalog::CatalogGraph;
use crate::core::error::{Advisory, PlanningError};
use crate::core::models::{
    Category, CourseId, CreditLoad, EdgeKind, ScheduledCourse, SemesterSchedule, TermIndex,
};
use crate::core::resolver::PrerequisiteResolver;
use crate::core::settings::PlannerSettings;
use crate::core::tracks::RemainingRequirements;
use crate::debug;
use std::collections::{BTreeMap, BTreeSet};

/// Tolerance for fractional credit comparisons
const CREDIT_EPSILON: f32 = 1e-4;

/// Number of rebalancing sweeps
const REBALANCE_PASSES: usize = 3;

/// Which off-cycle (summer) terms the scheduler may use
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SummerPolicy {
    /// Never schedule summer sessions
    #[default]
    Skip,
    /// Every summer session is available
    All,
    /// Only the listed summer sessions are available
    Only(BTreeSet<TermIndex>),
}

impl SummerPolicy {
    /// Whether `term` may receive courses
    #[must_use]
    pub fn allows(&self, term: TermIndex) -> bool {
        match self {
            Self::Skip => false,
            Self::All => true,
            Self::Only(terms) => terms.contains(&term),
        }
    }
}

/// Parameters of one scheduling run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRequest {
    /// First term that can receive courses
    pub start: TermIndex,
    /// Credit-load preference selecting the cap table row
    pub load: CreditLoad,
    /// Summer sessions available
    pub summers: SummerPolicy,
    /// Earliest term per course (retake constraints)
    pub earliest: BTreeMap<CourseId, TermIndex>,
    /// Regular terms searched before giving up
    pub horizon: usize,
}

impl ScheduleRequest {
    /// Create a request without summer sessions or per-course constraints
    #[must_use]
    pub const fn new(start: TermIndex, load: CreditLoad, horizon: usize) -> Self {
        Self {
            start,
            load,
            summers: SummerPolicy::Skip,
            earliest: BTreeMap::new(),
            horizon,
        }
    }

    /// Set the summer policy
    #[must_use]
    pub fn with_summers(mut self, summers: SummerPolicy) -> Self {
        self.summers = summers;
        self
    }

    /// Forbid placing `course` before `term`
    #[must_use]
    pub fn not_before(mut self, course: CourseId, term: TermIndex) -> Self {
        self.earliest.insert(course, term);
        self
    }
}

/// Result of a successful scheduling run
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleOutcome {
    /// Scheduled terms in order (empty summers omitted)
    pub semesters: Vec<SemesterSchedule>,
    /// Term of every placed course
    pub placements: BTreeMap<CourseId, TermIndex>,
    /// Requisites scheduled because a required course depends on them
    pub added_requisites: Vec<CourseId>,
    /// Courses chosen to fill credit quotas
    pub quota_courses: Vec<CourseId>,
    /// Non-fatal issues (credit overloads left after rebalancing)
    pub advisories: Vec<Advisory>,
}

impl ScheduleOutcome {
    /// Term of the last scheduled semester
    #[must_use]
    pub fn last_term(&self) -> Option<TermIndex> {
        self.semesters.last().map(|s| s.term)
    }

    /// Number of scheduled regular terms
    #[must_use]
    pub fn regular_term_count(&self) -> usize {
        self.semesters
            .iter()
            .filter(|s| s.term.season.is_regular())
            .count()
    }

    /// Scheduled summer sessions
    #[must_use]
    pub fn summer_terms(&self) -> Vec<TermIndex> {
        self.semesters
            .iter()
            .filter(|s| s.term.is_off_cycle())
            .map(|s| s.term)
            .collect()
    }
}

/// A term under construction
#[derive(Debug, Clone)]
struct TermSlot {
    term: TermIndex,
    courses: Vec<CourseId>,
    credits: f32,
    track_courses: usize,
}

impl TermSlot {
    const fn new(term: TermIndex) -> Self {
        Self {
            term,
            courses: Vec::new(),
            credits: 0.0,
            track_courses: 0,
        }
    }
}

/// Credit quota still being filled
#[derive(Debug, Clone, Copy)]
struct OpenQuota {
    category: Category,
    needed: f32,
}

/// Term-by-term scheduler over a catalog graph
pub struct SemesterScheduler<'a> {
    graph: &'a CatalogGraph,
    settings: &'a PlannerSettings,
}

impl<'a> SemesterScheduler<'a> {
    /// Create a new scheduler
    #[must_use]
    pub const fn new(graph: &'a CatalogGraph, settings: &'a PlannerSettings) -> Self {
        Self { graph, settings }
    }

    /// Schedule every remaining requirement.
    ///
    /// # Errors
    /// Returns `SchedulingDeadlock` when some course or quota cannot be placed
    /// within `request.horizon` regular terms.
    pub fn schedule(
        &self,
        remaining: &RemainingRequirements,
        request: &ScheduleRequest,
    ) -> Result<ScheduleOutcome, PlanningError> {
        let completed = &remaining.completed;
        let (targets, added_requisites) = self.planned_courses(remaining);

        let mut quotas: Vec<OpenQuota> = remaining
            .quotas
            .iter()
            .map(|q| OpenQuota {
                category: q.category,
                needed: q.credits_needed,
            })
            .collect();

        let mut pool: Vec<CourseId> = self
            .graph
            .ids()
            .filter(|c| {
                let category = self.graph.course(*c).category;
                !completed.contains(c)
                    && !targets.contains(c)
                    && quotas.iter().any(|q| q.category == category)
            })
            .collect();
        pool.sort_by_key(|c| {
            let course = self.graph.course(*c);
            (course.level(), course.code.clone())
        });

        let mut unplaced: Vec<CourseId> = targets.iter().copied().collect();
        unplaced.sort_by_key(|c| self.priority_key(*c));

        let mut placed: BTreeMap<CourseId, TermIndex> = BTreeMap::new();
        let mut slots: Vec<TermSlot> = Vec::new();
        let mut quota_courses: Vec<CourseId> = Vec::new();
        let mut term = request.start;
        let mut regular_used = 0usize;

        while !unplaced.is_empty() || quotas.iter().any(|q| q.needed > CREDIT_EPSILON) {
            if term.is_off_cycle() && !request.summers.allows(term) {
                term = term.next();
                continue;
            }
            if term.season.is_regular() {
                if regular_used >= request.horizon {
                    return Err(self.deadlock(&unplaced, &quotas, request.horizon));
                }
                regular_used += 1;
            }

            let mut slot = TermSlot::new(term);
            self.fill_required(&mut slot, &mut unplaced, &mut placed, completed, request);
            self.fill_quotas(
                &mut slot,
                &mut quotas,
                &pool,
                &mut placed,
                &mut quota_courses,
                completed,
                request,
            );
            debug!(
                "Scheduled {} course(s), {} credits in {}",
                slot.courses.len(),
                slot.credits,
                term
            );

            if !slot.courses.is_empty() || term.season.is_regular() {
                slots.push(slot);
            }
            term = term.next();
        }

        self.rebalance(&mut slots, &mut placed, request.load);

        let advisories = slots
            .iter()
            .filter(|s| s.credits > self.settings.typical_max_credits + CREDIT_EPSILON)
            .map(|s| Advisory::CreditOverload {
                term: s.term,
                credits: s.credits,
                typical_max: self.settings.typical_max_credits,
            })
            .collect();

        Ok(ScheduleOutcome {
            semesters: slots.iter().map(|s| self.to_schedule(s)).collect(),
            placements: placed,
            added_requisites,
            quota_courses,
            advisories,
        })
    }

    /// Required courses plus their uncompleted transitive requisites
    fn planned_courses(&self, remaining: &RemainingRequirements) -> (BTreeSet<CourseId>, Vec<CourseId>) {
        let resolver = PrerequisiteResolver::new(self.graph);
        let completed = &remaining.completed;

        let mut targets: BTreeSet<CourseId> = remaining
            .required
            .iter()
            .filter(|c| !completed.contains(c))
            .copied()
            .collect();
        let mut added: BTreeSet<CourseId> = BTreeSet::new();

        for course in &remaining.required {
            for ancestor in resolver.ancestors(*course) {
                if !completed.contains(&ancestor) && targets.insert(ancestor) {
                    debug!(
                        "Adding requisite {} needed by {}",
                        self.graph.code(ancestor),
                        self.graph.code(*course)
                    );
                    added.insert(ancestor);
                }
            }
        }

        let mut added: Vec<CourseId> = added.into_iter().collect();
        added.sort_by(|a, b| self.graph.code(*a).cmp(self.graph.code(*b)));
        (targets, added)
    }

    /// Ordering key: category rank, fewest offered seasons, level, code
    fn priority_key(&self, course: CourseId) -> (u8, usize, u8, String) {
        let info = self.graph.course(course);
        (
            info.category.schedule_rank(),
            info.offered_count(),
            info.level(),
            info.code.clone(),
        )
    }

    /// Whether every requisite of `course` is satisfied for `term`, counting
    /// corequisites in `bundle` as taken alongside it
    fn is_ready(
        &self,
        course: CourseId,
        term: TermIndex,
        placed: &BTreeMap<CourseId, TermIndex>,
        completed: &BTreeSet<CourseId>,
        bundle: &BTreeSet<CourseId>,
        request: &ScheduleRequest,
    ) -> bool {
        if !self.graph.course(course).is_offered_in(term.season) {
            return false;
        }
        if request.earliest.get(&course).is_some_and(|t| *t > term) {
            return false;
        }
        self.graph
            .requisites_of(course)
            .iter()
            .all(|(req, kind)| {
                completed.contains(req)
                    || match kind {
                        EdgeKind::Prerequisite => placed.get(req).is_some_and(|t| *t < term),
                        EdgeKind::Corequisite => {
                            placed.get(req).is_some_and(|t| *t <= term) || bundle.contains(req)
                        }
                    }
            })
    }

    /// The course plus the unfinished corequisites it must be taken with,
    /// if all of them can go in `term`
    fn bundle_for(
        &self,
        course: CourseId,
        term: TermIndex,
        placed: &BTreeMap<CourseId, TermIndex>,
        completed: &BTreeSet<CourseId>,
        schedulable: &BTreeSet<CourseId>,
        request: &ScheduleRequest,
    ) -> Option<BTreeSet<CourseId>> {
        let mut bundle = BTreeSet::from([course]);
        let mut stack = vec![course];

        while let Some(current) = stack.pop() {
            for coreq in self.graph.corequisites_of(current) {
                if completed.contains(&coreq) || placed.contains_key(&coreq) {
                    continue;
                }
                if !schedulable.contains(&coreq) {
                    return None;
                }
                if bundle.insert(coreq) {
                    stack.push(coreq);
                }
            }
        }

        bundle
            .iter()
            .all(|member| self.is_ready(*member, term, placed, completed, &bundle, request))
            .then_some(bundle)
    }

    /// Whether a group of courses fits the term's credit cap and track norm
    fn fits(&self, slot: &TermSlot, group: &BTreeSet<CourseId>, load: CreditLoad) -> bool {
        let credits: f32 = group.iter().map(|c| self.graph.course(*c).credits).sum();
        let track = group
            .iter()
            .filter(|c| self.graph.course(**c).category == Category::Track)
            .count();

        slot.credits + credits <= self.settings.credit_cap(slot.term, load) + CREDIT_EPSILON
            && slot.track_courses + track <= self.settings.track_course_limit(slot.term)
    }

    fn place(
        &self,
        slot: &mut TermSlot,
        course: CourseId,
        placed: &mut BTreeMap<CourseId, TermIndex>,
    ) {
        let info = self.graph.course(course);
        slot.courses.push(course);
        slot.credits += info.credits;
        if info.category == Category::Track {
            slot.track_courses += 1;
        }
        placed.insert(course, slot.term);
    }

    /// Greedily place ready required courses until nothing else fits
    fn fill_required(
        &self,
        slot: &mut TermSlot,
        unplaced: &mut Vec<CourseId>,
        placed: &mut BTreeMap<CourseId, TermIndex>,
        completed: &BTreeSet<CourseId>,
        request: &ScheduleRequest,
    ) {
        // Placing a corequisite can make its partner ready in the same term
        loop {
            let schedulable: BTreeSet<CourseId> = unplaced.iter().copied().collect();
            let mut progress = false;

            for &course in unplaced.iter() {
                if placed.contains_key(&course) {
                    continue;
                }
                let Some(bundle) =
                    self.bundle_for(course, slot.term, placed, completed, &schedulable, request)
                else {
                    continue;
                };
                if !self.fits(slot, &bundle, request.load) {
                    continue;
                }
                for member in bundle {
                    self.place(slot, member, placed);
                }
                progress = true;
            }

            unplaced.retain(|c| !placed.contains_key(c));
            if !progress {
                break;
            }
        }
    }

    /// Place pool courses toward open credit quotas
    #[allow(clippy::too_many_arguments)]
    fn fill_quotas(
        &self,
        slot: &mut TermSlot,
        quotas: &mut [OpenQuota],
        pool: &[CourseId],
        placed: &mut BTreeMap<CourseId, TermIndex>,
        quota_courses: &mut Vec<CourseId>,
        completed: &BTreeSet<CourseId>,
        request: &ScheduleRequest,
    ) {
        for quota in quotas.iter_mut() {
            for &course in pool {
                if quota.needed <= CREDIT_EPSILON {
                    break;
                }
                let info = self.graph.course(course);
                if info.category != quota.category || placed.contains_key(&course) {
                    continue;
                }
                let single = BTreeSet::from([course]);
                if !self.is_ready(course, slot.term, placed, completed, &single, request)
                    || !self.fits(slot, &single, request.load)
                {
                    continue;
                }
                self.place(slot, course, placed);
                quota.needed -= info.credits;
                quota_courses.push(course);
                debug!(
                    "Filling {} quota with {} in {}",
                    quota.category, info.code, slot.term
                );
            }
        }
    }

    /// Move courses out of terms above the typical maximum into later terms
    /// that have slack, without breaking requisite order
    fn rebalance(
        &self,
        slots: &mut [TermSlot],
        placed: &mut BTreeMap<CourseId, TermIndex>,
        load: CreditLoad,
    ) {
        let limit = self.settings.typical_max_credits;

        for _ in 0..REBALANCE_PASSES {
            let mut moved = false;

            for from in 0..slots.len() {
                if slots[from].credits <= limit + CREDIT_EPSILON {
                    continue;
                }

                let candidates: Vec<CourseId> = slots[from].courses.iter().rev().copied().collect();
                for course in candidates {
                    if slots[from].credits <= limit + CREDIT_EPSILON {
                        break;
                    }
                    let Some(to) = self.relocation_target(course, from, slots, placed, load) else {
                        continue;
                    };

                    let info = self.graph.course(course);
                    let is_track = info.category == Category::Track;
                    slots[from].courses.retain(|c| *c != course);
                    slots[from].credits -= info.credits;
                    slots[to].courses.push(course);
                    slots[to].credits += info.credits;
                    if is_track {
                        slots[from].track_courses -= 1;
                        slots[to].track_courses += 1;
                    }
                    placed.insert(course, slots[to].term);
                    debug!(
                        "Rebalanced {} from {} to {}",
                        info.code, slots[from].term, slots[to].term
                    );
                    moved = true;
                }
            }

            if !moved {
                break;
            }
        }
    }

    /// Earliest later term that can take `course` without overloading it
    fn relocation_target(
        &self,
        course: CourseId,
        from: usize,
        slots: &[TermSlot],
        placed: &BTreeMap<CourseId, TermIndex>,
        load: CreditLoad,
    ) -> Option<usize> {
        let current = slots[from].term;
        let info = self.graph.course(course);

        // Corequisite partners in the same term stay together
        let has_partner_here = self
            .graph
            .corequisites_of(course)
            .any(|c| placed.get(&c) == Some(&current))
            || self
                .graph
                .dependent_edges_of(course)
                .iter()
                .any(|(d, kind)| *kind == EdgeKind::Corequisite && placed.get(d) == Some(&current));
        if has_partner_here {
            return None;
        }

        for (to, slot) in slots.iter().enumerate().skip(from + 1) {
            let term = slot.term;
            let blocks_dependent = self
                .graph
                .dependent_edges_of(course)
                .iter()
                .any(|(dep, kind)| {
                    placed.get(dep).is_some_and(|t| match kind {
                        EdgeKind::Prerequisite => *t <= term,
                        EdgeKind::Corequisite => *t < term,
                    })
                });
            if blocks_dependent {
                return None;
            }
            if !info.is_offered_in(term.season) {
                continue;
            }

            let ceiling = self
                .settings
                .credit_cap(term, load)
                .min(self.settings.typical_max_credits);
            let track_ok = info.category != Category::Track
                || slot.track_courses < self.settings.track_course_limit(term);
            if slot.credits + info.credits <= ceiling + CREDIT_EPSILON && track_ok {
                return Some(to);
            }
        }

        None
    }

    fn deadlock(
        &self,
        unplaced: &[CourseId],
        quotas: &[OpenQuota],
        horizon: usize,
    ) -> PlanningError {
        let mut unmet: Vec<String> = unplaced
            .iter()
            .map(|c| self.graph.code(*c).to_string())
            .collect();
        unmet.sort();
        unmet.extend(
            quotas
                .iter()
                .filter(|q| q.needed > CREDIT_EPSILON)
                .map(|q| format!("{} {} credits", q.needed, q.category)),
        );
        PlanningError::SchedulingDeadlock { unmet, horizon }
    }

    fn to_schedule(&self, slot: &TermSlot) -> SemesterSchedule {
        let mut semester = SemesterSchedule::new(slot.term);
        for course in &slot.courses {
            let info = self.graph.course(*course);
            semester.add_course(ScheduledCourse {
                code: info.code.clone(),
                title: info.title.clone(),
                credits: info.credits,
                category: info.category,
            });
        }
        semester
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::CatalogBuilder;
    use crate::core::models::{Course, Season};
    use crate::core::tracks::CreditQuota;

    fn course(code: &str, category: Category) -> Course {
        Course::new(code.to_string(), code.to_string(), 3.0, category)
    }

    fn remaining_for(graph: &CatalogGraph, codes: &[&str]) -> RemainingRequirements {
        RemainingRequirements {
            required: codes.iter().map(|c| graph.id_of(c).unwrap()).collect(),
            ..RemainingRequirements::default()
        }
    }

    fn fall(year: u8) -> TermIndex {
        TermIndex::new(year, Season::Fall)
    }

    #[test]
    fn test_chain_scheduled_in_order() {
        let mut builder = CatalogBuilder::new();
        for code in ["A", "B", "C"] {
            builder.add_course(course(code, Category::Foundation));
        }
        builder.add_prerequisite("B", "A").add_prerequisite("C", "B");
        let graph = builder.build().unwrap();
        let settings = PlannerSettings::default();

        let outcome = SemesterScheduler::new(&graph, &settings)
            .schedule(
                &remaining_for(&graph, &["C", "B", "A"]),
                &ScheduleRequest::new(fall(1), CreditLoad::Standard, 12),
            )
            .unwrap();

        assert_eq!(outcome.semesters.len(), 3);
        assert_eq!(outcome.semesters[0].courses[0].code, "A");
        assert_eq!(outcome.semesters[1].courses[0].code, "B");
        assert_eq!(outcome.semesters[2].courses[0].code, "C");
    }

    #[test]
    fn test_credit_cap_respected() {
        let mut builder = CatalogBuilder::new();
        let codes: Vec<String> = (1..=7).map(|i| format!("G10{i}")).collect();
        for code in &codes {
            builder.add_course(course(code, Category::General));
        }
        let graph = builder.build().unwrap();
        let settings = PlannerSettings::default();
        let refs: Vec<&str> = codes.iter().map(String::as_str).collect();

        let outcome = SemesterScheduler::new(&graph, &settings)
            .schedule(
                &remaining_for(&graph, &refs),
                &ScheduleRequest::new(fall(1), CreditLoad::Standard, 12),
            )
            .unwrap();

        // Freshman standard cap is 16 credits
        assert_eq!(outcome.semesters[0].courses.len(), 5);
        assert_eq!(outcome.semesters[1].courses.len(), 2);
        for semester in &outcome.semesters {
            assert!(semester.total_credits <= 16.0);
        }
    }

    #[test]
    fn test_offered_terms_respected() {
        let mut builder = CatalogBuilder::new();
        builder.add_course(course("S200", Category::Foundation).with_offered(&[Season::Spring]));
        let graph = builder.build().unwrap();
        let settings = PlannerSettings::default();

        let outcome = SemesterScheduler::new(&graph, &settings)
            .schedule(
                &remaining_for(&graph, &["S200"]),
                &ScheduleRequest::new(fall(1), CreditLoad::Standard, 12),
            )
            .unwrap();

        assert_eq!(outcome.semesters.len(), 2);
        assert!(outcome.semesters[0].is_empty());
        assert_eq!(outcome.semesters[1].term, TermIndex::new(1, Season::Spring));
    }

    #[test]
    fn test_corequisites_share_a_term() {
        let mut builder = CatalogBuilder::new();
        builder
            .add_course(course("PHYS172", Category::Foundation))
            .add_course(Course::new("PHYS172L".into(), "Lab".into(), 1.0, Category::Foundation))
            .add_corequisite("PHYS172", "PHYS172L")
            .add_corequisite("PHYS172L", "PHYS172");
        let result = builder.build();
        // Mutual corequisites form a cycle and are rejected at load time
        assert!(result.is_err());

        let mut builder = CatalogBuilder::new();
        builder
            .add_course(course("PHYS172", Category::Foundation))
            .add_course(
                Course::new("PHYS172L".into(), "Lab".into(), 1.0, Category::Foundation)
                    .with_offered(&[Season::Spring]),
            )
            .add_corequisite("PHYS172", "PHYS172L");
        let graph = builder.build().unwrap();
        let settings = PlannerSettings::default();

        let outcome = SemesterScheduler::new(&graph, &settings)
            .schedule(
                &remaining_for(&graph, &["PHYS172"]),
                &ScheduleRequest::new(fall(1), CreditLoad::Standard, 12),
            )
            .unwrap();

        let lecture = graph.id_of("PHYS172").unwrap();
        let lab = graph.id_of("PHYS172L").unwrap();
        assert_eq!(outcome.placements[&lecture], outcome.placements[&lab]);
        assert_eq!(outcome.placements[&lab].season, Season::Spring);
        assert_eq!(outcome.added_requisites, vec![lab]);
    }

    #[test]
    fn test_missing_prerequisites_are_added() {
        let mut builder = CatalogBuilder::new();
        builder
            .add_course(course("MA161", Category::General))
            .add_course(course("CS251", Category::Foundation))
            .add_prerequisite("CS251", "MA161");
        let graph = builder.build().unwrap();
        let settings = PlannerSettings::default();

        let outcome = SemesterScheduler::new(&graph, &settings)
            .schedule(
                &remaining_for(&graph, &["CS251"]),
                &ScheduleRequest::new(fall(1), CreditLoad::Standard, 12),
            )
            .unwrap();

        let ma = graph.id_of("MA161").unwrap();
        let cs = graph.id_of("CS251").unwrap();
        assert_eq!(outcome.added_requisites, vec![ma]);
        assert!(outcome.placements[&ma] < outcome.placements[&cs]);
    }

    #[test]
    fn test_quota_filled_from_pool() {
        let mut builder = CatalogBuilder::new();
        builder
            .add_course(course("EL300", Category::Elective))
            .add_course(course("EL200", Category::Elective))
            .add_course(course("EL100", Category::Elective))
            .add_course(course("GE100", Category::General));
        let graph = builder.build().unwrap();
        let settings = PlannerSettings::default();
        let remaining = RemainingRequirements {
            quotas: vec![CreditQuota {
                category: Category::Elective,
                credits_needed: 6.0,
            }],
            ..RemainingRequirements::default()
        };

        let outcome = SemesterScheduler::new(&graph, &settings)
            .schedule(&remaining, &ScheduleRequest::new(fall(1), CreditLoad::Standard, 12))
            .unwrap();

        let codes: Vec<&str> = outcome.quota_courses.iter().map(|c| graph.code(*c)).collect();
        assert_eq!(codes, vec!["EL100", "EL200"]);
    }

    #[test]
    fn test_deadlock_when_never_offered() {
        let mut builder = CatalogBuilder::new();
        builder.add_course(course("SUM100", Category::Foundation).with_offered(&[Season::Summer]));
        let graph = builder.build().unwrap();
        let settings = PlannerSettings::default();
        let scheduler = SemesterScheduler::new(&graph, &settings);
        let remaining = remaining_for(&graph, &["SUM100"]);

        let err = scheduler
            .schedule(&remaining, &ScheduleRequest::new(fall(1), CreditLoad::Standard, 12))
            .unwrap_err();
        assert_eq!(
            err,
            PlanningError::SchedulingDeadlock {
                unmet: vec!["SUM100".into()],
                horizon: 12
            }
        );

        let outcome = scheduler
            .schedule(
                &remaining,
                &ScheduleRequest::new(fall(1), CreditLoad::Standard, 12)
                    .with_summers(SummerPolicy::All),
            )
            .unwrap();
        assert_eq!(outcome.summer_terms(), vec![TermIndex::new(1, Season::Summer)]);
        assert_eq!(outcome.regular_term_count(), 2);
    }

    #[test]
    fn test_earliest_term_constraint() {
        let mut builder = CatalogBuilder::new();
        builder.add_course(course("A", Category::Foundation));
        let graph = builder.build().unwrap();
        let settings = PlannerSettings::default();
        let a = graph.id_of("A").unwrap();

        let outcome = SemesterScheduler::new(&graph, &settings)
            .schedule(
                &remaining_for(&graph, &["A"]),
                &ScheduleRequest::new(fall(1), CreditLoad::Standard, 12).not_before(a, fall(2)),
            )
            .unwrap();
        assert_eq!(outcome.placements[&a], fall(2));
    }

    #[test]
    fn test_track_norm_limits_track_courses() {
        let mut builder = CatalogBuilder::new();
        for code in ["T1", "T2", "T3", "T4"] {
            builder.add_course(course(code, Category::Track));
        }
        let graph = builder.build().unwrap();
        let settings = PlannerSettings::default();

        let outcome = SemesterScheduler::new(&graph, &settings)
            .schedule(
                &remaining_for(&graph, &["T1", "T2", "T3", "T4"]),
                &ScheduleRequest::new(fall(1), CreditLoad::Standard, 12),
            )
            .unwrap();
        assert_eq!(outcome.semesters.len(), 2);
        assert!(outcome.semesters.iter().all(|s| s.track_courses().len() == 2));
    }

    #[test]
    fn test_rebalance_moves_overload_to_later_term() {
        let mut builder = CatalogBuilder::new();
        builder
            .add_course(course("X100", Category::Foundation))
            .add_course(course("Y200", Category::Foundation))
            .add_prerequisite("Y200", "X100");
        let generals: Vec<String> = (1..=7).map(|i| format!("G10{i}")).collect();
        for code in &generals {
            builder.add_course(course(code, Category::General));
        }
        let graph = builder.build().unwrap();
        let settings = PlannerSettings::default();

        let mut codes: Vec<&str> = vec!["X100", "Y200"];
        codes.extend(generals.iter().map(String::as_str));

        let outcome = SemesterScheduler::new(&graph, &settings)
            .schedule(
                &remaining_for(&graph, &codes),
                &ScheduleRequest::new(fall(2), CreditLoad::Heavy, 12),
            )
            .unwrap();

        assert_eq!(outcome.semesters.len(), 2);
        assert!(outcome.semesters[0].total_credits <= 18.0);
        assert!(outcome.advisories.is_empty());
    }

    #[test]
    fn test_overload_reported_when_no_slack() {
        let mut builder = CatalogBuilder::new();
        let generals: Vec<String> = (1..=7).map(|i| format!("G10{i}")).collect();
        for code in &generals {
            builder.add_course(course(code, Category::General));
        }
        let graph = builder.build().unwrap();
        let settings = PlannerSettings::default();
        let codes: Vec<&str> = generals.iter().map(String::as_str).collect();

        let outcome = SemesterScheduler::new(&graph, &settings)
            .schedule(
                &remaining_for(&graph, &codes),
                &ScheduleRequest::new(fall(2), CreditLoad::Heavy, 12),
            )
            .unwrap();

        assert_eq!(outcome.semesters.len(), 1);
        assert!(matches!(
            outcome.advisories.as_slice(),
            [Advisory::CreditOverload { credits, .. }] if (*credits - 21.0).abs() < f32::EPSILON
        ));
    }
}
