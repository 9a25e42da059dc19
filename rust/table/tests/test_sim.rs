use std::fs;

use felt_engine::logger::HandRecord;
use felt_table::sim;

fn run(args: &[&str]) -> (i32, String, String) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let mut argv = vec!["felt-sim"];
    argv.extend_from_slice(args);
    let code = sim::run(argv, &mut out, &mut err);
    (
        code,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

#[test]
fn writes_one_record_per_hand_to_the_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("runs").join("sim.jsonl");
    let path_arg = path.to_string_lossy().to_string();

    let (code, out, err) = run(&[
        "--hands", "12", "--seed", "42", "--rollouts", "20", "--output", &path_arg,
    ]);
    assert_eq!(code, 0, "stderr: {err}");
    assert!(out.contains("Simulated: 12 hands"));

    let contents = fs::read_to_string(&path).unwrap();
    let records: Vec<HandRecord> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 12);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.hand_number, i as u64 + 1);
        assert_eq!(record.seed, 42);
        assert!(record.ts.is_some());
        let before: u32 = record.starting_stacks.iter().sum();
        let after: u32 = record.final_stacks.iter().sum();
        assert_eq!(before, after);
    }
}

#[test]
fn stdout_stays_pure_jsonl() {
    let (code, out, err) = run(&[
        "--hands", "3", "--seed", "7", "--rollouts", "10", "--policies", "bluffer,math,tight",
    ]);
    assert_eq!(code, 0, "stderr: {err}");
    assert_eq!(out.lines().count(), 3);
    assert!(out.lines().all(|l| serde_json::from_str::<HandRecord>(l).is_ok()));
    assert!(err.contains("Simulated: 3 hands"));
}

#[test]
fn same_seed_produces_the_same_hands() {
    let args = ["--hands", "5", "--seed", "3", "--rollouts", "10"];
    let strip_ts = |out: String| -> Vec<HandRecord> {
        out.lines()
            .map(|l| {
                let mut r: HandRecord = serde_json::from_str(l).unwrap();
                r.ts = None;
                r
            })
            .collect()
    };
    let (_, first, _) = run(&args);
    let (_, second, _) = run(&args);
    assert_eq!(strip_ts(first), strip_ts(second));
}

#[test]
fn rejects_bad_arguments() {
    let (code, _, err) = run(&["--hands", "0"]);
    assert_eq!(code, 2);
    assert!(err.contains("hands must be >= 1"));

    let (code, _, err) = run(&["--policies", "conservative,shark"]);
    assert_eq!(code, 2);
    assert!(err.contains("shark"));

    let (code, _, err) = run(&["--policies", "conservative"]);
    assert_eq!(code, 2);
    assert!(err.contains("two policies"));

    let (code, _, _) = run(&["--bogus"]);
    assert_eq!(code, 2);
}

#[test]
fn help_goes_to_stdout() {
    let (code, out, _) = run(&["--help"]);
    assert_eq!(code, 0);
    assert!(out.contains("--policies"));
}

#[test]
fn show_config_prints_sources() {
    let (code, out, _) = run(&["--show-config"]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert!(json["big_blind"]["value"].is_u64());
    assert!(json["rollouts"]["source"].is_string());
}
