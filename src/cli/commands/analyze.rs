//! Read-only analysis commands: prerequisite chains, blocked sets, failure
//! impact and acceleration

use super::{emit, load_advisor, read_profile};
use crate::args::OutputArgs;
use nu_pathways::config::Config;
use nu_pathways::core::acceleration::AccelerationReport;
use nu_pathways::core::failure::FailureImpactReport;
use nu_pathways::core::models::TermIndex;
use std::fmt::Write as _;
use std::path::Path;

/// `chain`: transitive prerequisites of a course
pub fn chain(
    course: &str,
    catalog: Option<&Path>,
    output: &OutputArgs,
    config: &Config,
) -> Result<(), String> {
    let advisor = load_advisor(catalog, config)?;
    let entries = advisor
        .get_prerequisite_chain(course)
        .map_err(|e| format!("✗ {e}"))?;

    emit(
        &entries,
        || {
            let mut out = format!("Prerequisite chain for {course}:\n");
            if entries.is_empty() {
                out.push_str("  (no prerequisites)\n");
            }
            for entry in &entries {
                let _ = writeln!(out, "  level {:>2}  {}", entry.level, entry.code);
            }
            out
        },
        &format!("{course}-chain"),
        output,
        config,
    )
}

/// `blocked`: courses that depend on a course
pub fn blocked(
    course: &str,
    catalog: Option<&Path>,
    output: &OutputArgs,
    config: &Config,
) -> Result<(), String> {
    let advisor = load_advisor(catalog, config)?;
    let codes = advisor
        .get_blocked_courses(course)
        .map_err(|e| format!("✗ {e}"))?;

    emit(
        &codes,
        || {
            if codes.is_empty() {
                format!("No courses depend on {course}\n")
            } else {
                let listed: Vec<&str> = codes.iter().map(String::as_str).collect();
                format!(
                    "{} courses require {course}:\n  {}\n",
                    codes.len(),
                    listed.join(", ")
                )
            }
        },
        &format!("{course}-blocked"),
        output,
        config,
    )
}

/// `failure`: consequences of failing a course
pub fn failure(
    profile_path: &Path,
    course: &str,
    term: Option<TermIndex>,
    catalog: Option<&Path>,
    output: &OutputArgs,
    config: &Config,
) -> Result<(), String> {
    let advisor = load_advisor(catalog, config)?;
    let profile = read_profile(profile_path)?;
    let report = advisor
        .analyze_failure(course, &profile, term)
        .map_err(|e| format!("✗ Failure analysis failed: {e}"))?;

    emit(
        &report,
        || render_failure(&report),
        &format!("{course}-failure"),
        output,
        config,
    )
}

/// `accelerate`: summer sessions that shorten the timeline
pub fn accelerate(
    profile_path: &Path,
    catalog: Option<&Path>,
    output: &OutputArgs,
    config: &Config,
) -> Result<(), String> {
    let advisor = load_advisor(catalog, config)?;
    let profile = read_profile(profile_path)?;
    let report = advisor
        .evaluate_acceleration(&profile)
        .map_err(|e| format!("✗ Acceleration analysis failed: {e}"))?;

    emit(
        &report,
        || render_acceleration(&report),
        "acceleration",
        output,
        config,
    )
}

fn term_label(term: Option<TermIndex>) -> String {
    term.map_or_else(|| "now".to_string(), |t| t.to_string())
}

fn render_failure(report: &FailureImpactReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Failing {} in {}: {:?} impact",
        report.course, report.failure_term, report.severity
    );
    let blocked = if report.blocked_courses.is_empty() {
        "none".to_string()
    } else {
        report.blocked_courses.join(", ")
    };
    let _ = writeln!(out, "  Blocked courses: {blocked}");
    if report.dependent_tracks > 0 {
        let _ = writeln!(
            out,
            "  Tracks depending on it: {}",
            report.dependent_tracks
        );
    }
    let _ = writeln!(
        out,
        "  Retake: next regular {}, summer {}",
        report
            .retake
            .next_regular
            .map_or_else(|| "none".to_string(), |t| t.to_string()),
        report
            .retake
            .summer
            .map_or_else(|| "none".to_string(), |t| t.to_string())
    );
    let _ = writeln!(
        out,
        "  Graduation: {} -> {} (+{} terms)",
        term_label(report.delta.baseline_graduation),
        term_label(report.delta.revised_graduation),
        report.delta.additional_terms
    );

    let _ = writeln!(out, "\nRecovery strategies:");
    for strategy in &report.strategies {
        let marker = if strategy.recommended { "*" } else { " " };
        let _ = writeln!(
            out,
            " {marker} {:<26} retake {:<18} +{} terms  {:.0}%",
            strategy.kind.to_string(),
            strategy.retake_term.to_string(),
            strategy.additional_terms,
            strategy.success_probability * 100.0
        );
    }
    for advisory in &report.advisories {
        let _ = writeln!(out, "  - {advisory}");
    }
    out
}

fn render_acceleration(report: &AccelerationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Without summers: graduation {} after {} regular terms",
        term_label(report.baseline_graduation),
        report.baseline_regular_terms
    );
    if report.candidates.is_empty() {
        out.push_str("No summer session can take any remaining course\n");
    }
    for candidate in &report.candidates {
        let _ = writeln!(
            out,
            "  {:<18} saves {} terms  {:>4.1} cr  {:?}  {}",
            candidate.term.to_string(),
            candidate.terms_saved,
            candidate.credits,
            candidate.intensity,
            candidate.courses.join(", ")
        );
    }
    for advisory in &report.advisories {
        let _ = writeln!(out, "  - {advisory}");
    }
    out
}
