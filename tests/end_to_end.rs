use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use survey_eda::analysis::{Outputs, RESEARCH_QUESTIONS};
use survey_eda::common::report::REPORT_FILE_NAME;
use survey_eda::common::PlotSink;
use survey_eda::run_analysis;

const SURVEY_CSV: &str = "\
PROG_EXP,PROG_EXP_YEAR,PROG_EXP_HOUR,GAME_EXP,GAME_EXP_HOUR,MOT_MEAN,USE_FREQ,CONTRIB_DIFF,STATEMENT
1,0,1,1,4,2.0,1,1,1
1,2,1,2,3,3.5,2,1,2
2,2,2,3,2,4.0,3,2,1
3,2,2,4,1,5.0,5,4,2
";

fn write_survey(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("dataset.csv");
    fs::write(&path, SURVEY_CSV).unwrap();
    path
}

#[test]
fn test_default_run_normalizes_and_answers_every_question() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write_survey(temp_dir.path());
    let mut outputs = Outputs::new(PlotSink::disabled());

    let dataset = run_analysis(&input, RESEARCH_QUESTIONS, &mut outputs).unwrap();

    // PROG_EXP_COMP is [0.75, 1.25, 2.0, 2.5] before normalization.
    assert_eq!(
        dataset.numeric("PROG_EXP_COMP").unwrap(),
        &[0.0, 0.3, 0.7, 1.0]
    );
    assert_eq!(
        dataset.numeric("MOT_MEAN_NORM").unwrap(),
        &[0.0, 0.5, 0.7, 1.0]
    );

    let tests: Vec<&str> = outputs
        .report
        .entries()
        .iter()
        .map(|entry| entry.test.as_str())
        .collect();
    assert_eq!(
        tests,
        vec!["Pearson", "Pearson", "Kendall's tau", "Mann-Whitney U"]
    );
    let sections: Vec<&str> = outputs
        .report
        .entries()
        .iter()
        .map(|entry| entry.section.as_str())
        .collect();
    assert_eq!(sections, vec!["RQ2", "RQ2", "RQ4", "RQ5"]);
}

#[test]
fn test_compressed_input_matches_plain_input() {
    let temp_dir = tempfile::tempdir().unwrap();
    let plain = write_survey(temp_dir.path());
    let compressed = temp_dir.path().join("dataset.csv.zst");

    let mut encoder = zstd::Encoder::new(fs::File::create(&compressed).unwrap(), 3).unwrap();
    encoder.write_all(SURVEY_CSV.as_bytes()).unwrap();
    encoder.finish().unwrap();

    let mut outputs = Outputs::new(PlotSink::disabled());
    let from_plain = run_analysis(&plain, &[], &mut outputs).unwrap();
    let from_compressed = run_analysis(&compressed, &[], &mut outputs).unwrap();

    assert_eq!(from_plain, from_compressed);
}

#[test]
fn test_missing_input_is_an_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut outputs = Outputs::new(PlotSink::disabled());

    let result = run_analysis(
        &temp_dir.path().join("missing.csv"),
        RESEARCH_QUESTIONS,
        &mut outputs,
    );
    assert!(matches!(
        result,
        Err(survey_eda::AnalysisError::Parsing(_))
    ));
}

#[test]
fn test_cli_writes_report() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write_survey(temp_dir.path());
    let output_dir = temp_dir.path().join("out");

    let output = Command::new(env!("CARGO_BIN_EXE_survey-eda"))
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output_dir)
        .arg("--no-plots")
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("############ RQ2 ############"));
    assert!(stdout.contains("***** PROG_EXP_COMP vs. MOT_MEAN_NORM *****"));
    assert!(stdout.contains("Kendall's Tau value: "));
    assert!(stdout.contains("Mann-Whitney U test: "));

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(output_dir.join(REPORT_FILE_NAME)).unwrap())
            .unwrap();
    assert_eq!(report["entries"].as_array().unwrap().len(), 4);
}

#[test]
fn test_cli_reports_invalid_method_and_continues() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write_survey(temp_dir.path());

    let output = Command::new(env!("CARGO_BIN_EXE_survey-eda"))
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(temp_dir.path().join("out"))
        .args(["--no-plots", "--independent", "USE_FREQ"])
        .args(["--dependent", "CONTRIB_DIFF", "--method", "anova"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(
        "Invalid method. Choose from 'pearson', 'kendall', 'spearman', or 'mann_whitney'."
    ));
}
