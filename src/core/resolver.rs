//! Prerequisite resolver: pure transitive queries over the catalog graph

use crate::core::catalog::CatalogGraph;
use crate::core::models::CourseId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};

/// An ancestor of a queried course with its distance along the longest
/// requisite path to that course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEntry {
    /// Catalog index of the ancestor
    pub course: CourseId,
    /// Ancestor course code
    pub code: String,
    /// Longest-path distance to the queried course (direct requisites are 1)
    pub level: usize,
}

/// Read-only query helper borrowing a catalog graph
pub struct PrerequisiteResolver<'a> {
    graph: &'a CatalogGraph,
}

impl<'a> PrerequisiteResolver<'a> {
    /// Create a resolver over `graph`
    #[must_use]
    pub const fn new(graph: &'a CatalogGraph) -> Self {
        Self { graph }
    }

    /// Every ancestor of `target` (prerequisites and corequisites, transitively),
    /// deepest first, ties broken by course code.
    #[must_use]
    pub fn transitive_chain(&self, target: CourseId) -> Vec<ChainEntry> {
        let mut level: Vec<Option<usize>> = vec![None; self.graph.course_count()];
        level[target.index()] = Some(0);

        // Dependents come later in topological order, so walking it backwards
        // finalizes a node's distance before its requisites are relaxed.
        for &node in self.graph.topological_order().iter().rev() {
            let Some(dist) = level[node.index()] else {
                continue;
            };
            for (req, _) in self.graph.requisites_of(node) {
                let slot = &mut level[req.index()];
                *slot = Some(slot.map_or(dist + 1, |d| d.max(dist + 1)));
            }
        }

        let mut chain: Vec<ChainEntry> = level
            .iter()
            .enumerate()
            .filter_map(|(idx, lvl)| {
                let lvl = (*lvl)?;
                if lvl == 0 {
                    return None;
                }
                let id = CourseId(u32::try_from(idx).ok()?);
                Some(ChainEntry {
                    course: id,
                    code: self.graph.code(id).to_string(),
                    level: lvl,
                })
            })
            .collect();

        chain.sort_by(|a, b| b.level.cmp(&a.level).then_with(|| a.code.cmp(&b.code)));
        chain
    }

    /// All courses that cannot be taken without first passing `course`
    /// (breadth-first over dependent edges of both kinds).
    #[must_use]
    pub fn transitive_blocked(&self, course: CourseId) -> BTreeSet<CourseId> {
        let mut blocked = BTreeSet::new();
        let mut queue = VecDeque::from([course]);

        while let Some(current) = queue.pop_front() {
            for dep in self.graph.dependents_of(current) {
                if blocked.insert(dep) {
                    queue.push_back(dep);
                }
            }
        }

        blocked
    }

    /// All transitive requisites of `course` as a set
    #[must_use]
    pub fn ancestors(&self, course: CourseId) -> BTreeSet<CourseId> {
        let mut seen = BTreeSet::new();
        let mut stack = vec![course];

        while let Some(current) = stack.pop() {
            for (req, _) in self.graph.requisites_of(current) {
                if seen.insert(*req) {
                    stack.push(*req);
                }
            }
        }

        seen
    }

    /// Whether `ancestor` must be passed before `course` can be taken
    #[must_use]
    pub fn is_transitive_requisite(&self, ancestor: CourseId, course: CourseId) -> bool {
        self.ancestors(course).contains(&ancestor)
    }

    /// Topological level of every course: 0 for courses without requisites,
    /// otherwise one more than the deepest requisite. Indexed by [`CourseId::index`].
    #[must_use]
    pub fn topological_levels(&self) -> Vec<usize> {
        let mut levels = vec![0usize; self.graph.course_count()];
        for &node in self.graph.topological_order() {
            let depth = self
                .graph
                .requisites_of(node)
                .iter()
                .map(|(req, _)| levels[req.index()] + 1)
                .max()
                .unwrap_or(0);
            levels[node.index()] = depth;
        }
        levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::CatalogBuilder;
    use crate::core::models::{Category, Course};

    fn course(code: &str) -> Course {
        Course::new(code.to_string(), code.to_string(), 3.0, Category::Foundation)
    }

    /// A → B → C, A → D, D → C (diamond with a long side)
    fn diamond() -> CatalogGraph {
        let mut builder = CatalogBuilder::new();
        for code in ["A", "B", "C", "D", "E"] {
            builder.add_course(course(code));
        }
        builder
            .add_prerequisite("B", "A")
            .add_prerequisite("C", "B")
            .add_prerequisite("D", "A")
            .add_prerequisite("C", "D")
            .add_corequisite("E", "C");
        builder.build().unwrap()
    }

    #[test]
    fn test_transitive_chain_levels_and_order() {
        let graph = diamond();
        let resolver = PrerequisiteResolver::new(&graph);
        let chain = resolver.transitive_chain(graph.id_of("C").unwrap());

        let listed: Vec<(&str, usize)> = chain.iter().map(|e| (e.code.as_str(), e.level)).collect();
        assert_eq!(listed, vec![("A", 2), ("B", 1), ("D", 1)]);
    }

    #[test]
    fn test_transitive_chain_follows_corequisites() {
        let graph = diamond();
        let resolver = PrerequisiteResolver::new(&graph);
        let chain = resolver.transitive_chain(graph.id_of("E").unwrap());
        assert_eq!(chain.first().map(|e| (e.code.as_str(), e.level)), Some(("A", 3)));
        assert_eq!(chain.len(), 4);
    }

    #[test]
    fn test_chain_of_root_is_empty() {
        let graph = diamond();
        let resolver = PrerequisiteResolver::new(&graph);
        assert!(resolver.transitive_chain(graph.id_of("A").unwrap()).is_empty());
    }

    #[test]
    fn test_transitive_blocked() {
        let graph = diamond();
        let resolver = PrerequisiteResolver::new(&graph);
        let a = graph.id_of("A").unwrap();
        let blocked = resolver.transitive_blocked(a);

        let codes: Vec<&str> = blocked.iter().map(|id| graph.code(*id)).collect();
        assert_eq!(codes, vec!["B", "C", "D", "E"]);
        assert!(!blocked.contains(&a));
    }

    #[test]
    fn test_blocked_is_asymmetric() {
        let graph = diamond();
        let resolver = PrerequisiteResolver::new(&graph);
        let b = graph.id_of("B").unwrap();
        let c = graph.id_of("C").unwrap();

        assert!(resolver.transitive_blocked(b).contains(&c));
        assert!(!resolver.transitive_blocked(c).contains(&b));
        assert!(resolver.is_transitive_requisite(b, c));
        assert!(!resolver.is_transitive_requisite(c, b));
    }

    #[test]
    fn test_topological_levels() {
        let graph = diamond();
        let levels = PrerequisiteResolver::new(&graph).topological_levels();
        assert_eq!(levels[graph.id_of("A").unwrap().index()], 0);
        assert_eq!(levels[graph.id_of("B").unwrap().index()], 1);
        assert_eq!(levels[graph.id_of("C").unwrap().index()], 2);
        assert_eq!(levels[graph.id_of("E").unwrap().index()], 3);
    }
}
