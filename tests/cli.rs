use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const BIN: &str = env!("CARGO_BIN_EXE_parse_groups");

fn write_input(dir: &Path) -> PathBuf {
    let path = dir.join("samples.csv");
    let mut text = String::from("SampleID,R1,R2,Treatment\n");
    for i in 0..10 {
        let treatment = if i % 2 == 0 { "A" } else { "B" };
        text.push_str(&format!("s{i},s{i}_R1.fq.gz,s{i}_R2.fq.gz,{treatment}\n"));
    }
    fs::write(&path, text).unwrap();
    path
}

fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(BIN)
        .current_dir(dir)
        .args(args)
        .output()
        .expect("failed to spawn parse_groups")
}

fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .unwrap();
    let header = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (header, rows)
}

fn sample_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .filter_map(Result::ok)
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with("sample") && n.ends_with(".csv") && n != "samples.csv")
        .collect();
    names.sort();
    names
}

#[test]
fn writes_one_file_per_replicate_with_balanced_groups() {
    let dir = tempfile::tempdir().unwrap();
    write_input(dir.path());

    let out = run_in(
        dir.path(),
        &["--csv", "samples.csv", "--output", "subset", "--sample", "3", "--number", "2"],
    );
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(sample_files(dir.path()), vec!["sample1.csv", "sample2.csv"]);

    for name in ["sample1.csv", "sample2.csv"] {
        let (header, rows) = read_csv(&dir.path().join(name));
        assert_eq!(header, vec!["RowID", "SampleID", "R1", "R2", "Treatment"]);
        assert_eq!(rows.len(), 6);

        let row_ids: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(row_ids, vec!["0", "1", "2", "3", "4", "5"]);

        let mut per_treatment: HashMap<&str, HashSet<&str>> = HashMap::new();
        for row in &rows {
            per_treatment.entry(row[4].as_str()).or_default().insert(row[1].as_str());
        }
        assert_eq!(per_treatment["A"].len(), 3, "no duplicate rows within group A");
        assert_eq!(per_treatment["B"].len(), 3, "no duplicate rows within group B");
    }
}

#[test]
fn oversized_sample_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    write_input(dir.path());

    let out = run_in(dir.path(), &["-c", "samples.csv", "-o", "subset", "-s", "10"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("exceeds"));
    assert!(sample_files(dir.path()).is_empty());
}

#[test]
fn no_arguments_prints_help_and_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_in(dir.path(), &[]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Usage"));
}

#[test]
fn missing_required_flag_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_input(dir.path());
    let out = run_in(dir.path(), &["-c", "samples.csv"]);
    assert!(!out.status.success());
}

#[test]
fn composite_treatment_and_column_subset() {
    let dir = tempfile::tempdir().unwrap();
    let mut text = String::from("SampleID,Treatment,Time\n");
    for i in 0..12 {
        let treatment = if i < 6 { "A" } else { "B" };
        let time = if i % 2 == 0 { "0h" } else { "2h" };
        text.push_str(&format!("s{i},{treatment},{time}\n"));
    }
    fs::write(dir.path().join("timecourse.csv"), text).unwrap();

    let out = run_in(
        dir.path(),
        &[
            "-c", "timecourse.csv", "-o", "subset", "-t", "Treatment", "Time", "-s", "2",
            "--colnames", "Time", "SampleID", "Treatment",
        ],
    );
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let (header, rows) = read_csv(&dir.path().join("sample1.csv"));
    assert_eq!(header, vec!["RowID", "Time", "SampleID", "Treatment"]);
    assert_eq!(rows.len(), 8);

    let mut counts: HashMap<(String, String), usize> = HashMap::new();
    for row in &rows {
        *counts.entry((row[3].clone(), row[1].clone())).or_default() += 1;
    }
    assert_eq!(counts.len(), 4);
    assert!(counts.values().all(|&c| c == 2));
}

#[test]
fn seeded_runs_are_reproducible() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    for dir in [first.path(), second.path()] {
        write_input(dir);
        let out = run_in(dir, &["-c", "samples.csv", "-o", "x", "-s", "2", "-n", "3", "--seed", "11"]);
        assert!(out.status.success());
    }
    for name in ["sample1.csv", "sample2.csv", "sample3.csv"] {
        assert_eq!(
            fs::read_to_string(first.path().join(name)).unwrap(),
            fs::read_to_string(second.path().join(name)).unwrap()
        );
    }
}

#[test]
fn out_dir_receives_the_files() {
    let dir = tempfile::tempdir().unwrap();
    write_input(dir.path());
    let out = run_in(dir.path(), &["-c", "samples.csv", "-o", "x", "-s", "1", "-d", "reps"]);
    assert!(out.status.success());
    assert!(dir.path().join("reps").join("sample1.csv").is_file());
    assert!(!dir.path().join("sample1.csv").exists());
}

#[test]
fn missing_treatment_column_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_input(dir.path());
    let out = run_in(dir.path(), &["-c", "samples.csv", "-o", "x", "-t", "Condition"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Condition"));
}

#[test]
fn missing_input_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_in(dir.path(), &["-c", "absent.csv", "-o", "x"]);
    assert!(!out.status.success());
    assert!(sample_files(dir.path()).is_empty());
}

#[test]
fn na_treatment_rows_are_left_out() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("with_na.csv"),
        "SampleID,Treatment\ns1,A\ns2,NA\ns3,A\ns4,B\ns5,B\n",
    )
    .unwrap();

    let out = run_in(dir.path(), &["-c", "with_na.csv", "-o", "x", "-s", "2"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let (_, rows) = read_csv(&dir.path().join("sample1.csv"));
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|r| r[2] != "NA" && r[1] != "s2"));
}

#[test]
fn quoted_fields_survive_the_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("quoted.csv"),
        "SampleID,Note,Treatment\ns1,\"left, lane 1\",A\ns2,plain,A\n",
    )
    .unwrap();

    let out = run_in(dir.path(), &["-c", "quoted.csv", "-o", "x", "-s", "2"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let (header, rows) = read_csv(&dir.path().join("sample1.csv"));
    assert_eq!(header, vec!["RowID", "SampleID", "Note", "Treatment"]);
    assert!(rows.iter().all(|r| r.len() == 4 && r[3] == "A"));
    assert!(rows.iter().any(|r| r[2] == "left, lane 1"));
}

#[test]
fn unused_prefix_is_quiet_at_default_log_level() {
    let dir = tempfile::tempdir().unwrap();
    write_input(dir.path());

    let out = run_in(dir.path(), &["-c", "samples.csv", "-o", "subset", "-s", "1"]);
    assert!(out.status.success());
    assert!(!String::from_utf8_lossy(&out.stderr).contains("Output prefix"));

    let out = run_in(
        dir.path(),
        &["-c", "samples.csv", "-o", "subset", "-s", "1", "--log-level", "Debug"],
    );
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Output prefix 'subset'"));
}
