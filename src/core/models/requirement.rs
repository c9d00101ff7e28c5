//! Degree requirement model: majors, tracks and their rule sets

use super::course::{Category, CourseId};
use serde::{Deserialize, Serialize};

/// A single degree rule, resolved against the catalog's course indices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Requirement {
    /// A specific course must be completed
    RequiredCourse {
        /// The required course
        course: CourseId,
    },
    /// Exactly `k` courses must be picked from `candidates`
    ChooseKOf {
        /// Stable group identifier used in choice selections
        id: String,
        /// Human-readable label (e.g., "AI/ML Course Selection")
        label: String,
        /// Number of courses to pick
        k: usize,
        /// Candidate courses, in catalog order
        candidates: Vec<CourseId>,
    },
    /// A credit total must be earned from courses of one category
    CreditsOfCategory {
        /// Category whose credits count toward the quota
        category: Category,
        /// Credits required
        credits: f32,
    },
}

impl Requirement {
    /// Courses this requirement names explicitly
    #[must_use]
    pub fn named_courses(&self) -> Vec<CourseId> {
        match self {
            Self::RequiredCourse { course } => vec![*course],
            Self::ChooseKOf { candidates, .. } => candidates.clone(),
            Self::CreditsOfCategory { .. } => Vec::new(),
        }
    }
}

/// A named specialization within a major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Track identifier (e.g., "mi")
    pub id: String,
    /// Display name (e.g., "Machine Intelligence")
    pub name: String,
    /// Identifier of the owning major
    pub major: String,
    /// Ordered requirement list
    pub requirements: Vec<Requirement>,
    /// Minimum number of terms the track's coursework is defined over
    pub min_terms: usize,
}

/// A degree program with its own base requirements and optional tracks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Major {
    /// Major identifier (e.g., "cs")
    pub id: String,
    /// Display name (e.g., "Computer Science")
    pub name: String,
    /// Ordered base requirement list shared by every track
    pub requirements: Vec<Requirement>,
    /// Track identifiers offered by the major
    pub tracks: Vec<String>,
}

impl Major {
    /// Whether students of this major must declare a track
    #[must_use]
    pub fn requires_track(&self) -> bool {
        !self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_courses() {
        let required = Requirement::RequiredCourse { course: CourseId(3) };
        assert_eq!(required.named_courses(), vec![CourseId(3)]);

        let choice = Requirement::ChooseKOf {
            id: "ai".to_string(),
            label: "AI course".to_string(),
            k: 1,
            candidates: vec![CourseId(1), CourseId(2)],
        };
        assert_eq!(choice.named_courses().len(), 2);

        let credits = Requirement::CreditsOfCategory {
            category: Category::Elective,
            credits: 6.0,
        };
        assert!(credits.named_courses().is_empty());
    }

    #[test]
    fn test_major_requires_track() {
        let mut major = Major {
            id: "cs".to_string(),
            name: "Computer Science".to_string(),
            requirements: Vec::new(),
            tracks: Vec::new(),
        };
        assert!(!major.requires_track());

        major.tracks.push("mi".to_string());
        assert!(major.requires_track());
    }
}
