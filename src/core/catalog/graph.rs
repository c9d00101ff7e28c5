//! Course catalog graph: an immutable DAG of courses over arena indices

use crate::core::error::PlanningError;
use crate::core::models::{Course, CourseId, EdgeKind};
use std::collections::{HashMap, VecDeque};
use std::fmt;

/// Collects courses and requisite edges, then validates them into a [`CatalogGraph`]
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    courses: Vec<Course>,
    /// (course code, required course code, kind)
    edges: Vec<(String, String, EdgeKind)>,
}

impl CatalogBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a course
    pub fn add_course(&mut self, course: Course) -> &mut Self {
        self.courses.push(course);
        self
    }

    /// Add a prerequisite relationship
    ///
    /// # Arguments
    /// * `course` - Course that requires the prerequisite
    /// * `prerequisite` - Course that must be taken first
    pub fn add_prerequisite(&mut self, course: &str, prerequisite: &str) -> &mut Self {
        self.edges.push((
            course.to_string(),
            prerequisite.to_string(),
            EdgeKind::Prerequisite,
        ));
        self
    }

    /// Add a corequisite relationship
    pub fn add_corequisite(&mut self, course: &str, corequisite: &str) -> &mut Self {
        self.edges.push((
            course.to_string(),
            corequisite.to_string(),
            EdgeKind::Corequisite,
        ));
        self
    }

    /// Validate and freeze the catalog.
    ///
    /// # Errors
    /// - `CatalogLoad` for duplicate course codes
    /// - `UnknownCourseCode` when an edge names a course that was never added
    /// - `CyclicPrerequisiteDetected` when the requisite edges contain a cycle
    pub fn build(self) -> Result<CatalogGraph, PlanningError> {
        let mut index: HashMap<String, CourseId> = HashMap::with_capacity(self.courses.len());
        for (pos, course) in self.courses.iter().enumerate() {
            let id = CourseId(
                u32::try_from(pos)
                    .map_err(|_| PlanningError::CatalogLoad("too many courses".to_string()))?,
            );
            if index.insert(course.code.clone(), id).is_some() {
                return Err(PlanningError::CatalogLoad(format!(
                    "duplicate course code '{}'",
                    course.code
                )));
            }
        }

        let mut requisites: Vec<Vec<(CourseId, EdgeKind)>> = vec![Vec::new(); self.courses.len()];
        let mut dependents: Vec<Vec<(CourseId, EdgeKind)>> = vec![Vec::new(); self.courses.len()];

        for (course, required, kind) in &self.edges {
            let from = *index
                .get(course)
                .ok_or_else(|| PlanningError::UnknownCourseCode(course.clone()))?;
            let to = *index
                .get(required)
                .ok_or_else(|| PlanningError::UnknownCourseCode(required.clone()))?;

            if !requisites[from.index()].iter().any(|(id, _)| *id == to) {
                requisites[from.index()].push((to, *kind));
                dependents[to.index()].push((from, *kind));
            }
        }

        // Deterministic adjacency order regardless of input edge order
        for list in requisites.iter_mut().chain(dependents.iter_mut()) {
            list.sort_by(|a, b| self.courses[a.0.index()].code.cmp(&self.courses[b.0.index()].code));
        }

        let topo_order = topological_order(&self.courses, &requisites, &dependents)?;

        Ok(CatalogGraph {
            courses: self.courses,
            index,
            requisites,
            dependents,
            topo_order,
        })
    }
}

/// Kahn's algorithm over requisite → dependent edges, ties broken by code.
/// On failure, reports one concrete cycle.
fn topological_order(
    courses: &[Course],
    requisites: &[Vec<(CourseId, EdgeKind)>],
    dependents: &[Vec<(CourseId, EdgeKind)>],
) -> Result<Vec<CourseId>, PlanningError> {
    let mut indegree: Vec<usize> = requisites.iter().map(Vec::len).collect();

    let mut roots: Vec<usize> = (0..courses.len()).filter(|&i| indegree[i] == 0).collect();
    roots.sort_by(|a, b| courses[*a].code.cmp(&courses[*b].code));
    let mut queue: VecDeque<usize> = roots.into_iter().collect();

    let mut order = Vec::with_capacity(courses.len());
    while let Some(node) = queue.pop_front() {
        order.push(CourseId(u32::try_from(node).unwrap_or(u32::MAX)));
        for (child, _) in &dependents[node] {
            let entry = &mut indegree[child.index()];
            *entry -= 1;
            if *entry == 0 {
                queue.push_back(child.index());
            }
        }
    }

    if order.len() == courses.len() {
        return Ok(order);
    }

    // Every node left over still has a left-over requisite, so walking
    // requisite edges inside that set must revisit a node.
    let start = (0..courses.len())
        .filter(|&i| indegree[i] > 0)
        .min_by(|a, b| courses[*a].code.cmp(&courses[*b].code))
        .unwrap_or(0);

    let mut path: Vec<usize> = Vec::new();
    let mut seen_at: HashMap<usize, usize> = HashMap::new();
    let mut current = start;
    loop {
        if let Some(&pos) = seen_at.get(&current) {
            let mut cycle: Vec<String> = path[pos..]
                .iter()
                .map(|&i| courses[i].code.clone())
                .collect();
            cycle.push(courses[current].code.clone());
            return Err(PlanningError::CyclicPrerequisiteDetected { cycle });
        }
        seen_at.insert(current, path.len());
        path.push(current);

        match requisites[current]
            .iter()
            .find(|(id, _)| indegree[id.index()] > 0)
        {
            Some((next, _)) => current = next.index(),
            None => {
                return Err(PlanningError::CyclicPrerequisiteDetected {
                    cycle: vec![courses[current].code.clone()],
                })
            }
        }
    }
}

/// Immutable directed acyclic graph of courses.
///
/// Courses live in an arena addressed by [`CourseId`]; both edge directions are
/// stored so that prerequisite and dependent lookups are O(1) per edge.
#[derive(Debug, Clone)]
pub struct CatalogGraph {
    courses: Vec<Course>,
    index: HashMap<String, CourseId>,
    /// course -> courses it requires
    requisites: Vec<Vec<(CourseId, EdgeKind)>>,
    /// course -> courses that require it
    dependents: Vec<Vec<(CourseId, EdgeKind)>>,
    /// requisites always precede their dependents
    topo_order: Vec<CourseId>,
}

impl CatalogGraph {
    /// Look up a course by code
    #[must_use]
    pub fn course_by_code(&self, code: &str) -> Option<&Course> {
        self.index.get(code).map(|id| &self.courses[id.index()])
    }

    /// Look up the arena index for a code
    #[must_use]
    pub fn id_of(&self, code: &str) -> Option<CourseId> {
        self.index.get(code).copied()
    }

    /// Resolve a code, failing with `UnknownCourseCode`
    ///
    /// # Errors
    /// Returns `UnknownCourseCode` when the code is not in the catalog.
    pub fn require_id(&self, code: &str) -> Result<CourseId, PlanningError> {
        self.id_of(code)
            .ok_or_else(|| PlanningError::UnknownCourseCode(code.to_string()))
    }

    /// Course stored at `id`
    #[must_use]
    pub fn course(&self, id: CourseId) -> &Course {
        &self.courses[id.index()]
    }

    /// Code of the course stored at `id`
    #[must_use]
    pub fn code(&self, id: CourseId) -> &str {
        &self.courses[id.index()].code
    }

    /// Direct prerequisites of a course (prerequisite edges only)
    pub fn prerequisites_of(&self, id: CourseId) -> impl Iterator<Item = CourseId> + '_ {
        self.requisites[id.index()]
            .iter()
            .filter(|(_, kind)| *kind == EdgeKind::Prerequisite)
            .map(|(req, _)| *req)
    }

    /// Direct corequisites of a course
    pub fn corequisites_of(&self, id: CourseId) -> impl Iterator<Item = CourseId> + '_ {
        self.requisites[id.index()]
            .iter()
            .filter(|(_, kind)| *kind == EdgeKind::Corequisite)
            .map(|(req, _)| *req)
    }

    /// All direct requisites (both kinds) with their edge kind
    #[must_use]
    pub fn requisites_of(&self, id: CourseId) -> &[(CourseId, EdgeKind)] {
        &self.requisites[id.index()]
    }

    /// Courses that directly require `id` (both kinds)
    pub fn dependents_of(&self, id: CourseId) -> impl Iterator<Item = CourseId> + '_ {
        self.dependents[id.index()].iter().map(|(dep, _)| *dep)
    }

    /// Dependents with their edge kind
    #[must_use]
    pub fn dependent_edges_of(&self, id: CourseId) -> &[(CourseId, EdgeKind)] {
        &self.dependents[id.index()]
    }

    /// Courses in an order where every requisite precedes its dependents
    #[must_use]
    pub fn topological_order(&self) -> &[CourseId] {
        &self.topo_order
    }

    /// All course ids in arena order
    pub fn ids(&self) -> impl Iterator<Item = CourseId> + '_ {
        (0..self.courses.len()).map(|i| CourseId(u32::try_from(i).unwrap_or(u32::MAX)))
    }

    /// All courses in arena order
    pub fn courses(&self) -> impl Iterator<Item = &Course> {
        self.courses.iter()
    }

    /// Number of courses
    #[must_use]
    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    /// Check if a course exists
    #[must_use]
    pub fn contains_course(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }
}

impl fmt::Display for CatalogGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Catalog graph ({} courses):", self.courses.len())?;
        writeln!(f)?;

        let mut sorted: Vec<&Course> = self.courses.iter().collect();
        sorted.sort_by(|a, b| a.code.cmp(&b.code));

        for course in sorted {
            let Some(id) = self.id_of(&course.code) else {
                continue;
            };
            let reqs = self.requisites_of(id);
            if reqs.is_empty() {
                writeln!(f, "  {} → (no prerequisites)", course.code)?;
            } else {
                let listed: Vec<String> = reqs
                    .iter()
                    .map(|(req, kind)| match kind {
                        EdgeKind::Prerequisite => self.code(*req).to_string(),
                        EdgeKind::Corequisite => format!("{} (co)", self.code(*req)),
                    })
                    .collect();
                writeln!(f, "  {} → {}", course.code, listed.join(", "))?;
            }
        }

        Ok(())
    }
}
