use std::fs;
use std::path::{Path, PathBuf};

use libtest_mimic::{Arguments, Failed, Trial};
use serde::Deserialize;
use speech_corpus_tools::{plan_cuts, read_alignment_tier, TierSelector, TrimPolicy};

const SUITE_NAME: &str = "trim_plan_matches_fixture";
const TOLERANCE_S: f64 = 1e-9;

#[derive(Debug, Deserialize)]
struct ExpectedCut {
    id: String,
    #[serde(default)]
    tier: Option<String>,
    max_padding_ms: u64,
    max_pause_ms: u64,
    #[serde(default)]
    boundaries: Vec<f64>,
    #[serde(default)]
    segment_lengths: Vec<f64>,
    /// Substring of the expected error message; set for rejected tiers.
    #[serde(default)]
    error: Option<String>,
}

fn main() {
    let args = Arguments::from_args();
    let data_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data");

    let cases = match load_cases(&data_dir) {
        Ok(cases) => cases,
        Err(err) => {
            run_setup_failure(&args, err);
            return;
        }
    };
    if cases.is_empty() {
        run_setup_failure(&args, "No cases found in expected_cuts.json.".to_string());
        return;
    }

    let tests = cases
        .into_iter()
        .map(|case| {
            let alignment = data_dir
                .join("alignments")
                .join(format!("{}.TextGrid", case.id));
            Trial::test(format!("{SUITE_NAME}::{}", case.id), move || {
                run_case(&case, &alignment).map_err(Failed::from)
            })
        })
        .collect();
    libtest_mimic::run(&args, tests).exit();
}

fn load_cases(data_dir: &Path) -> Result<Vec<ExpectedCut>, String> {
    let path = data_dir.join("expected_cuts.json");
    let contents = fs::read_to_string(&path)
        .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
    serde_json::from_str(&contents)
        .map_err(|err| format!("Failed to parse '{}': {err}", path.display()))
}

fn run_setup_failure(args: &Arguments, message: String) {
    let test = Trial::test(format!("{SUITE_NAME}::setup"), move || {
        Err(Failed::from(message))
    });
    libtest_mimic::run(args, vec![test]).exit();
}

fn run_case(case: &ExpectedCut, alignment: &Path) -> Result<(), String> {
    let selector = case
        .tier
        .clone()
        .map_or(TierSelector::First, TierSelector::Named);
    let tier = read_alignment_tier(alignment, &selector)
        .map_err(|err| format!("{}: {err}", case.id))?;
    let policy = TrimPolicy::from_millis(case.max_padding_ms, case.max_pause_ms);

    match (plan_cuts(&tier, &policy), &case.error) {
        (Ok(plan), None) => {
            compare("boundaries", &case.id, &case.boundaries, &plan.boundaries)?;
            compare(
                "segment_lengths",
                &case.id,
                &case.segment_lengths,
                &plan.segment_lengths,
            )
        }
        (Ok(plan), Some(expected)) => Err(format!(
            "{}: expected an error containing '{expected}', got boundaries {:?}",
            case.id, plan.boundaries
        )),
        (Err(err), Some(expected)) if err.to_string().contains(expected.as_str()) => Ok(()),
        (Err(err), _) => Err(format!("{}: unexpected error: {err}", case.id)),
    }
}

fn compare(what: &str, id: &str, expected: &[f64], observed: &[f64]) -> Result<(), String> {
    if expected.len() != observed.len() {
        return Err(format!(
            "{id}: {what} count mismatch (expected {}, got {})",
            expected.len(),
            observed.len()
        ));
    }
    for (idx, (want, got)) in expected.iter().zip(observed).enumerate() {
        if (want - got).abs() > TOLERANCE_S {
            return Err(format!(
                "{id}: {what}[{idx}] expected {want}, got {got} (all: {observed:?})"
            ));
        }
    }
    Ok(())
}
