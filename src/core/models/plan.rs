//! Plan model: semester schedules, finished plans and choice requests

use super::course::Category;
use super::term::TermIndex;
use crate::core::error::Advisory;
use serde::{Deserialize, Serialize};

/// A course placed in a semester
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledCourse {
    /// Course code
    pub code: String,
    /// Course title
    pub title: String,
    /// Credit weight
    pub credits: f32,
    /// Course category
    pub category: Category,
}

/// One term of a multi-semester plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterSchedule {
    /// Term being scheduled
    pub term: TermIndex,
    /// Courses in placement order
    pub courses: Vec<ScheduledCourse>,
    /// Total credit weight of the term
    pub total_credits: f32,
}

impl SemesterSchedule {
    /// Create an empty schedule for `term`
    #[must_use]
    pub const fn new(term: TermIndex) -> Self {
        Self {
            term,
            courses: Vec::new(),
            total_credits: 0.0,
        }
    }

    /// Add a course to the term
    pub fn add_course(&mut self, course: ScheduledCourse) {
        self.total_credits += course.credits;
        self.courses.push(course);
    }

    /// Remove a course by code, returning it if present
    pub fn remove_course(&mut self, code: &str) -> Option<ScheduledCourse> {
        let pos = self.courses.iter().position(|c| c.code == code)?;
        let course = self.courses.remove(pos);
        self.total_credits -= course.credits;
        Some(course)
    }

    /// Season label (e.g., "Fall")
    #[must_use]
    pub fn label(&self) -> String {
        self.term.season.to_string()
    }

    /// Year of study
    #[must_use]
    pub const fn year(&self) -> u8 {
        self.term.year
    }

    /// Codes of the track-specific courses in this term
    #[must_use]
    pub fn track_courses(&self) -> Vec<&str> {
        self.courses
            .iter()
            .filter(|c| c.category == Category::Track)
            .map(|c| c.code.as_str())
            .collect()
    }

    /// Whether the term holds any course
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Whether the course is placed in this term
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.courses.iter().any(|c| c.code == code)
    }
}

/// What a pending choice asks the caller to pick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChoiceKind {
    /// Pick a track of the major
    Track,
    /// Pick courses from a k-of-n group
    Courses,
}

/// One selectable option of a pending choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// Course code or track identifier
    pub id: String,
    /// Display title
    pub title: String,
}

/// An unresolved choice group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingChoice {
    /// Group identifier to use as the selection key
    pub group: String,
    /// Human-readable label
    pub label: String,
    /// What is being chosen
    pub kind: ChoiceKind,
    /// How many options must be selected
    pub choose: usize,
    /// Available options
    pub options: Vec<ChoiceOption>,
}

/// Pause signal returned while choice groups remain unresolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceRequest {
    /// Major being planned
    pub major: String,
    /// Track being planned, if known
    pub track: Option<String>,
    /// Unresolved groups
    pub groups: Vec<PendingChoice>,
}

/// A finalized multi-semester plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Major planned
    pub major: String,
    /// Track planned, if any
    pub track: Option<String>,
    /// Second track of a dual-track plan
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_track: Option<String>,
    /// Ordered term schedules
    pub semesters: Vec<SemesterSchedule>,
    /// Term of the last scheduled course (or the current term if nothing remains)
    pub graduation_term: TermIndex,
    /// Heuristic success probability in `[0, 1]`
    pub success_probability: f64,
    /// Advisory warnings
    pub warnings: Vec<Advisory>,
    /// Notes on how the plan was tailored to the student
    pub customization_notes: Vec<String>,
}

impl Plan {
    /// Number of scheduled terms (off-cycle terms included)
    #[must_use]
    pub fn term_count(&self) -> usize {
        self.semesters.len()
    }

    /// Number of scheduled regular (fall/spring) terms
    #[must_use]
    pub fn regular_term_count(&self) -> usize {
        self.semesters
            .iter()
            .filter(|s| s.term.season.is_regular())
            .count()
    }

    /// Term a course is scheduled in
    #[must_use]
    pub fn term_of(&self, code: &str) -> Option<TermIndex> {
        self.semesters
            .iter()
            .find(|s| s.contains(code))
            .map(|s| s.term)
    }

    /// Total planned credits
    #[must_use]
    pub fn total_credits(&self) -> f32 {
        self.semesters.iter().map(|s| s.total_credits).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Season;

    fn course(code: &str, credits: f32, category: Category) -> ScheduledCourse {
        ScheduledCourse {
            code: code.to_string(),
            title: code.to_string(),
            credits,
            category,
        }
    }

    #[test]
    fn test_semester_add_and_remove() {
        let mut semester = SemesterSchedule::new(TermIndex::new(1, Season::Fall));
        semester.add_course(course("CS18000", 4.0, Category::Foundation));
        semester.add_course(course("CS37300", 3.0, Category::Track));

        assert!((semester.total_credits - 7.0).abs() < f32::EPSILON);
        assert_eq!(semester.track_courses(), vec!["CS37300"]);
        assert_eq!(semester.label(), "Fall");
        assert_eq!(semester.year(), 1);

        let removed = semester.remove_course("CS18000");
        assert!(removed.is_some());
        assert!((semester.total_credits - 3.0).abs() < f32::EPSILON);
        assert!(semester.remove_course("CS18000").is_none());
    }

    #[test]
    fn test_plan_term_counts() {
        let mut fall = SemesterSchedule::new(TermIndex::new(1, Season::Fall));
        fall.add_course(course("A", 3.0, Category::Foundation));
        let mut summer = SemesterSchedule::new(TermIndex::new(1, Season::Summer));
        summer.add_course(course("B", 3.0, Category::Foundation));

        let plan = Plan {
            major: "cs".into(),
            track: None,
            second_track: None,
            semesters: vec![fall, summer],
            graduation_term: TermIndex::new(1, Season::Summer),
            success_probability: 0.8,
            warnings: Vec::new(),
            customization_notes: Vec::new(),
        };

        assert_eq!(plan.term_count(), 2);
        assert_eq!(plan.regular_term_count(), 1);
        assert_eq!(plan.term_of("B"), Some(TermIndex::new(1, Season::Summer)));
        assert!((plan.total_credits() - 6.0).abs() < f32::EPSILON);
    }
}
