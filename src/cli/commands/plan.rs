//! Plan command handler

use super::{emit, load_advisor, read_profile};
use crate::args::OutputArgs;
use nu_pathways::config::Config;
use nu_pathways::core::assembler::{PlanOutcome, PlanningContext};
use nu_pathways::core::models::{ChoiceRequest, Plan};
use nu_pathways::core::tracks::ChoiceSelections;
use nu_pathways::{info, verbose};
use std::fmt::Write as _;
use std::path::Path;

/// Build a plan for the profile, applying `--choose` selections up front
pub fn run(
    profile_path: &Path,
    catalog: Option<&Path>,
    choices: &[String],
    output: &OutputArgs,
    config: &Config,
) -> Result<(), String> {
    let advisor = load_advisor(catalog, config)?;
    let profile = read_profile(profile_path)?;
    let selections = parse_choices(choices)?;
    info!(
        "Planning for major '{}' with {} selection groups",
        profile.major,
        selections.len()
    );

    let outcome = if selections.is_empty() {
        advisor.create_plan(&profile)
    } else {
        advisor.resolve_choices(PlanningContext::new(profile), selections)
    }
    .map_err(|e| format!("✗ Planning failed: {e}"))?;

    match &outcome {
        PlanOutcome::Finalized { plan } => {
            verbose!("✓ Plan finalized with {} terms", plan.term_count());
            emit(&outcome, || render_plan(plan), "plan", output, config)
        }
        PlanOutcome::NeedsChoices { request, .. } => {
            emit(&outcome, || render_choices(request), "choices", output, config)
        }
    }
}

/// Parse `GROUP=OPTION[,OPTION...]` arguments. Repeating a group appends to it.
pub fn parse_choices(choices: &[String]) -> Result<ChoiceSelections, String> {
    let mut selections = ChoiceSelections::new();
    for choice in choices {
        let (group, options) = choice
            .split_once('=')
            .ok_or_else(|| format!("✗ Expected GROUP=OPTIONS, got '{choice}'"))?;
        let group = group.trim();
        if group.is_empty() {
            return Err(format!("✗ Missing group name in '{choice}'"));
        }
        selections.entry(group.to_string()).or_default().extend(
            options
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string),
        );
    }
    Ok(selections)
}

fn render_plan(plan: &Plan) -> String {
    let mut out = String::new();
    let track = match (plan.track.as_deref(), plan.second_track.as_deref()) {
        (Some(first), Some(second)) => format!("{first} + {second}"),
        (Some(first), None) => first.to_string(),
        (None, _) => "none".to_string(),
    };
    let _ = writeln!(out, "Plan for {} (track: {track})", plan.major);
    let _ = writeln!(
        out,
        "Graduation: {} after {} terms ({} credits)",
        plan.graduation_term,
        plan.term_count(),
        plan.total_credits()
    );
    let _ = writeln!(
        out,
        "Success probability: {:.0}%\n",
        plan.success_probability * 100.0
    );

    for semester in &plan.semesters {
        let codes: Vec<&str> = semester.courses.iter().map(|c| c.code.as_str()).collect();
        let listing = if codes.is_empty() {
            "(no courses)".to_string()
        } else {
            codes.join(", ")
        };
        let _ = writeln!(
            out,
            "  {:<18} {:>5.1} cr  {listing}",
            semester.term.to_string(),
            semester.total_credits
        );
    }

    if !plan.warnings.is_empty() {
        let _ = writeln!(out, "\nWarnings:");
        for warning in &plan.warnings {
            let _ = writeln!(out, "  - {warning}");
        }
    }
    if !plan.customization_notes.is_empty() {
        let _ = writeln!(out, "\nNotes:");
        for note in &plan.customization_notes {
            let _ = writeln!(out, "  - {note}");
        }
    }
    out
}

fn render_choices(request: &ChoiceRequest) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Selections needed for major '{}':", request.major);
    for group in &request.groups {
        let _ = writeln!(
            out,
            "\n  {} ({}): choose {}",
            group.group, group.label, group.choose
        );
        for option in &group.options {
            let _ = writeln!(out, "    {:<10} {}", option.id, option.title);
        }
    }
    let _ = writeln!(out, "\nRe-run with --choose GROUP=OPTION[,OPTION...]");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_choices() {
        let parsed = parse_choices(&[
            "track=mi".to_string(),
            "electives = CS37300, CS47100".to_string(),
            "electives=CS48900".to_string(),
        ])
        .unwrap();
        assert_eq!(parsed["track"], vec!["mi".to_string()]);
        assert_eq!(
            parsed["electives"],
            vec![
                "CS37300".to_string(),
                "CS47100".to_string(),
                "CS48900".to_string()
            ]
        );
    }

    #[test]
    fn test_parse_choices_rejects_malformed() {
        assert!(parse_choices(&["track".to_string()]).is_err());
        assert!(parse_choices(&["=mi".to_string()]).is_err());
    }
}
