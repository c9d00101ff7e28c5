//! TOML loader for catalog snapshots and student profiles

use super::graph::{CatalogBuilder, CatalogGraph};
use super::snapshot::CatalogSnapshot;
use crate::core::error::PlanningError;
use crate::core::models::{Category, Course, Major, Requirement, Season, StudentProfile, Track};
use crate::core::tracks::TrackCatalog;
use crate::debug;
use serde::Deserialize;
use std::fs;
use std::path::Path;

fn default_offered() -> Vec<Season> {
    vec![Season::Fall, Season::Spring]
}

const fn default_difficulty() -> u8 {
    3
}

const fn default_min_terms() -> usize {
    4
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    name: String,
    #[serde(default)]
    courses: Vec<CourseEntry>,
    #[serde(default)]
    majors: Vec<MajorEntry>,
    #[serde(default)]
    tracks: Vec<TrackEntry>,
}

#[derive(Debug, Deserialize)]
struct CourseEntry {
    code: String,
    #[serde(default)]
    title: String,
    credits: f32,
    #[serde(default = "default_offered")]
    offered: Vec<Season>,
    category: Category,
    #[serde(default = "default_difficulty")]
    difficulty: u8,
    #[serde(default)]
    prerequisites: Vec<String>,
    #[serde(default)]
    corequisites: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum RequirementEntry {
    RequiredCourse {
        course: String,
    },
    ChooseKOf {
        id: String,
        #[serde(default)]
        label: Option<String>,
        k: usize,
        candidates: Vec<String>,
    },
    CreditsOfCategory {
        category: Category,
        credits: f32,
    },
}

#[derive(Debug, Deserialize)]
struct MajorEntry {
    id: String,
    name: String,
    #[serde(default)]
    tracks: Vec<String>,
    #[serde(default)]
    requirements: Vec<RequirementEntry>,
}

#[derive(Debug, Deserialize)]
struct TrackEntry {
    id: String,
    name: String,
    major: String,
    #[serde(default = "default_min_terms")]
    min_terms: usize,
    #[serde(default)]
    requirements: Vec<RequirementEntry>,
}

/// Parse a catalog snapshot from TOML text.
///
/// # Errors
/// - `CatalogLoad` for malformed TOML, non-positive course credits, or
///   inconsistent major/track references
/// - `UnknownCourseCode` for requisites or requirements naming missing courses
/// - `CyclicPrerequisiteDetected` when the requisite graph has a cycle
pub fn parse_catalog_str(text: &str) -> Result<CatalogSnapshot, PlanningError> {
    let document: CatalogDocument =
        toml::from_str(text).map_err(|e| PlanningError::CatalogLoad(e.to_string()))?;

    let mut builder = CatalogBuilder::new();
    for entry in &document.courses {
        if entry.credits.is_nan() || entry.credits <= 0.0 {
            return Err(PlanningError::CatalogLoad(format!(
                "course '{}' has invalid credits {}",
                entry.code, entry.credits
            )));
        }
        let title = if entry.title.is_empty() {
            entry.code.clone()
        } else {
            entry.title.clone()
        };
        builder.add_course(
            Course::new(entry.code.clone(), title, entry.credits, entry.category)
                .with_offered(&entry.offered)
                .with_difficulty(entry.difficulty),
        );
        for prereq in &entry.prerequisites {
            builder.add_prerequisite(&entry.code, prereq);
        }
        for coreq in &entry.corequisites {
            builder.add_corequisite(&entry.code, coreq);
        }
    }
    let graph = builder.build()?;

    let mut tracks = TrackCatalog::new();
    for entry in &document.tracks {
        if !document.majors.iter().any(|m| m.id == entry.major) {
            return Err(PlanningError::CatalogLoad(format!(
                "track '{}' belongs to unknown major '{}'",
                entry.id, entry.major
            )));
        }
        tracks.add_track(Track {
            id: entry.id.clone(),
            name: entry.name.clone(),
            major: entry.major.clone(),
            requirements: convert_requirements(&graph, &entry.requirements)?,
            min_terms: entry.min_terms,
        });
    }

    for entry in &document.majors {
        let mut track_ids = entry.tracks.clone();
        for track in &document.tracks {
            if track.major == entry.id && !track_ids.contains(&track.id) {
                track_ids.push(track.id.clone());
            }
        }
        if let Some(missing) = track_ids.iter().find(|id| tracks.track(id).is_none()) {
            return Err(PlanningError::CatalogLoad(format!(
                "major '{}' lists unknown track '{missing}'",
                entry.id
            )));
        }

        tracks.add_major(Major {
            id: entry.id.clone(),
            name: entry.name.clone(),
            requirements: convert_requirements(&graph, &entry.requirements)?,
            tracks: track_ids,
        });
    }

    debug!(
        "Loaded catalog '{}': {} courses, {} majors, {} tracks",
        document.name,
        graph.course_count(),
        document.majors.len(),
        document.tracks.len()
    );

    Ok(CatalogSnapshot::new(document.name, graph, tracks))
}

fn convert_requirements(
    graph: &CatalogGraph,
    entries: &[RequirementEntry],
) -> Result<Vec<Requirement>, PlanningError> {
    entries
        .iter()
        .map(|entry| match entry {
            RequirementEntry::RequiredCourse { course } => Ok(Requirement::RequiredCourse {
                course: graph.require_id(course)?,
            }),
            RequirementEntry::ChooseKOf {
                id,
                label,
                k,
                candidates,
            } => {
                if *k == 0 || *k > candidates.len() {
                    return Err(PlanningError::CatalogLoad(format!(
                        "choice group '{id}' picks {k} of {} candidates",
                        candidates.len()
                    )));
                }
                Ok(Requirement::ChooseKOf {
                    id: id.clone(),
                    label: label.clone().unwrap_or_else(|| id.clone()),
                    k: *k,
                    candidates: candidates
                        .iter()
                        .map(|code| graph.require_id(code))
                        .collect::<Result<_, _>>()?,
                })
            }
            RequirementEntry::CreditsOfCategory { category, credits } => {
                Ok(Requirement::CreditsOfCategory {
                    category: *category,
                    credits: *credits,
                })
            }
        })
        .collect()
}

/// Load a catalog snapshot from a TOML file
///
/// # Errors
/// Returns `CatalogLoad` if the file cannot be read, otherwise any error of
/// [`parse_catalog_str`].
pub fn load_catalog(path: &Path) -> Result<CatalogSnapshot, PlanningError> {
    let text = fs::read_to_string(path)
        .map_err(|e| PlanningError::CatalogLoad(format!("{}: {e}", path.display())))?;
    parse_catalog_str(&text)
}

/// Parse a student profile from TOML text
///
/// # Errors
/// Returns `ProfileLoad` for malformed profiles.
pub fn parse_profile_str(text: &str) -> Result<StudentProfile, PlanningError> {
    let profile: StudentProfile =
        toml::from_str(text).map_err(|e| PlanningError::ProfileLoad(e.to_string()))?;
    if profile.current_term.year == 0 {
        return Err(PlanningError::ProfileLoad(
            "currentTerm.year must start at 1".to_string(),
        ));
    }
    Ok(profile)
}

/// Load a student profile from a TOML file
///
/// # Errors
/// Returns `ProfileLoad` if the file cannot be read or parsed.
pub fn load_profile(path: &Path) -> Result<StudentProfile, PlanningError> {
    let text = fs::read_to_string(path)
        .map_err(|e| PlanningError::ProfileLoad(format!("{}: {e}", path.display())))?;
    parse_profile_str(&text)
}
