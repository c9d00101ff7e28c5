//! Course model

use super::term::Season;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Stable arena index of a course inside a loaded catalog graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CourseId(pub(crate) u32);

impl CourseId {
    /// Position of the course in the catalog arena
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Broad role a course plays in a degree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Core sequence every student of the major takes first
    Foundation,
    /// Specialization (track) coursework
    Track,
    /// Free or directed electives
    Elective,
    /// General education
    General,
}

impl Category {
    /// Scheduling rank: foundation first, then general education,
    /// then track courses, electives last
    #[must_use]
    pub const fn schedule_rank(self) -> u8 {
        match self {
            Self::Foundation => 0,
            Self::General => 1,
            Self::Track => 2,
            Self::Elective => 3,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Foundation => "foundation",
            Self::Track => "track",
            Self::Elective => "elective",
            Self::General => "general",
        };
        write!(f, "{label}")
    }
}

/// Kind of requisite relationship between two courses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Must be completed in an earlier term
    Prerequisite,
    /// Must be completed earlier or taken in the same term
    Corequisite,
}

/// Represents a course in the catalog. Immutable once the catalog is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Course code used for lookups (e.g., "CS25100")
    pub code: String,

    /// Course title (e.g., "Data Structures And Algorithms")
    pub title: String,

    /// Credit weight (can be fractional)
    pub credits: f32,

    /// Seasons in which the course is typically offered
    pub offered: BTreeSet<Season>,

    /// Role of the course in the degree
    pub category: Category,

    /// Difficulty score from 1 (easy) to 5 (very hard)
    pub difficulty: u8,
}

impl Course {
    /// Create a new course offered in fall and spring with medium difficulty
    ///
    /// # Arguments
    /// * `code` - Course code
    /// * `title` - Course title
    /// * `credits` - Credit weight
    /// * `category` - Course category
    #[must_use]
    pub fn new(code: String, title: String, credits: f32, category: Category) -> Self {
        Self {
            code,
            title,
            credits,
            offered: [Season::Fall, Season::Spring].into_iter().collect(),
            category,
            difficulty: 3,
        }
    }

    /// Replace the offered-terms set
    #[must_use]
    pub fn with_offered(mut self, seasons: &[Season]) -> Self {
        self.offered = seasons.iter().copied().collect();
        self
    }

    /// Set the difficulty score (clamped to 1..=5)
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: u8) -> Self {
        self.difficulty = difficulty.clamp(1, 5);
        self
    }

    /// Whether the course is typically offered in `season`
    #[must_use]
    pub fn is_offered_in(&self, season: Season) -> bool {
        self.offered.contains(&season)
    }

    /// Number of seasons the course is offered in
    #[must_use]
    pub fn offered_count(&self) -> usize {
        self.offered.len()
    }

    /// Course level taken from the first digit of the course number
    /// (e.g., "CS25100" → 2). Defaults to 1 when the code has no digits.
    #[must_use]
    pub fn level(&self) -> u8 {
        self.code
            .chars()
            .find(char::is_ascii_digit)
            .and_then(|c| c.to_digit(10))
            .and_then(|d| u8::try_from(d).ok())
            .filter(|d| *d > 0)
            .unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_creation() {
        let course = Course::new(
            "CS25100".to_string(),
            "Data Structures".to_string(),
            3.0,
            Category::Foundation,
        );

        assert_eq!(course.code, "CS25100");
        assert!((course.credits - 3.0).abs() < f32::EPSILON);
        assert!(course.is_offered_in(Season::Fall));
        assert!(course.is_offered_in(Season::Spring));
        assert!(!course.is_offered_in(Season::Summer));
        assert_eq!(course.difficulty, 3);
    }

    #[test]
    fn test_course_level() {
        let course = Course::new("CS38100".into(), "Algorithms".into(), 3.0, Category::Track);
        assert_eq!(course.level(), 3);

        let no_digits = Course::new("GENED".into(), "Gen Ed".into(), 3.0, Category::General);
        assert_eq!(no_digits.level(), 1);
    }

    #[test]
    fn test_with_offered_and_difficulty() {
        let course = Course::new("MA16100".into(), "Calculus I".into(), 5.0, Category::Foundation)
            .with_offered(&[Season::Fall, Season::Spring, Season::Summer])
            .with_difficulty(9);

        assert_eq!(course.offered_count(), 3);
        assert_eq!(course.difficulty, 5);
    }

    #[test]
    fn test_schedule_rank_orders_foundation_first() {
        assert!(Category::Foundation.schedule_rank() < Category::General.schedule_rank());
        assert!(Category::General.schedule_rank() < Category::Track.schedule_rank());
        assert!(Category::Track.schedule_rank() < Category::Elective.schedule_rank());
    }
}
