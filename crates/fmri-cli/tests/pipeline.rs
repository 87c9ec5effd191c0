//! Integration tests for run orchestration and the CLI binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use fmri_cli::pipeline::{
    InputSources, LssTarget, inspect_conditions, render_json, resolve_inputs, resolve_lss_target,
    run_lss, run_standard,
};
use fmri_model::DesignOptions;

const EVENTS: &str = "onset,duration,trial_type,trial_ID\n\
                      0.0,2.0,CS-_first_half,1\n\
                      10.0,2.0,CS-_first_half,2\n\
                      20.0,2.0,CS+,3\n";

const CONFOUNDS: &str = "csf\twhite_matter\ttrans_x\ttrans_y\ttrans_z\trot_x\trot_y\trot_z\n\
                         0.5\t0.25\t0\t0\t0\t0\t0\t0\n\
                         0.75\t0.5\t0.01\t0.02\t0.03\t0.001\t0.002\t0.003\n";

struct Fixture {
    dir: tempfile::TempDir,
    events: PathBuf,
    regressors: PathBuf,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().expect("temp dir");
    let events = dir.path().join("events.csv");
    let regressors = dir.path().join("confounds.tsv");
    fs::write(&events, EVENTS).expect("write events");
    fs::write(&regressors, CONFOUNDS).expect("write confounds");
    Fixture {
        dir,
        events,
        regressors,
    }
}

fn sources(fixture: &Fixture) -> InputSources {
    InputSources {
        scan: Some(PathBuf::from("sub-01_task-phase2_bold.nii.gz")),
        events: Some(fixture.events.clone()),
        regressors: Some(fixture.regressors.clone()),
        ..InputSources::default()
    }
}

fn options(dir: &Path) -> DesignOptions {
    DesignOptions::new().with_motion_file(dir.join("motion.par"))
}

#[test]
fn standard_run_renders_engine_fields() {
    let fixture = fixture();
    let inputs = resolve_inputs(&sources(&fixture)).expect("resolve inputs");
    let result = run_standard(inputs, None, &options(fixture.dir.path())).expect("run");

    let json: serde_json::Value =
        serde_json::from_str(&render_json(&result).expect("render")).expect("parse JSON");
    assert!(json.get("trial_ID").is_none());
    assert!(json["motion_file"].as_str().is_some_and(|p| p.ends_with("motion.par")));
    let design = &json["design"];
    assert_eq!(design["scans"], "sub-01_task-phase2_bold.nii.gz");
    assert_eq!(
        design["conditions"],
        serde_json::json!(["CS-_first_half_first", "CS-_first_half_others", "CS+"])
    );
    assert_eq!(design["onsets"], serde_json::json!([[0.0], [10.0], [20.0]]));
    assert_eq!(
        design["regressor_names"],
        serde_json::json!(["csf", "white_matter"])
    );
}

#[test]
fn inputs_bundle_and_sidecar_fill_repetition_time() {
    let fixture = fixture();
    let bundle = fixture.dir.path().join("inputs.json");
    let sidecar = fixture.dir.path().join("bold.json");
    fs::write(
        &bundle,
        serde_json::json!({
            "bold": "bold.nii.gz",
            "events": fixture.events,
            "regressors": fixture.regressors,
            "trial_ID": 2,
        })
        .to_string(),
    )
    .expect("write bundle");
    fs::write(&sidecar, r#"{"RepetitionTime": 2.0, "TaskName": "phase2"}"#).expect("write sidecar");

    let inputs = resolve_inputs(&InputSources {
        bundle: Some(bundle),
        sidecar: Some(sidecar),
        ..InputSources::default()
    })
    .expect("resolve inputs");
    assert_eq!(inputs.repetition_time, Some(2.0));
    assert_eq!(inputs.trial_id, Some(2));

    let target = resolve_lss_target(None, false, &inputs).expect("target");
    assert_eq!(target, LssTarget::Trial(2));

    let result = run_lss(inputs, None, &options(fixture.dir.path()), target).expect("run LSS");
    let json: serde_json::Value =
        serde_json::from_str(&render_json(&result).expect("render")).expect("parse JSON");
    assert_eq!(json["trial_ID"], 2);
    assert_eq!(json["repetition_time"], 2.0);
    assert_eq!(json["design"]["conditions"], serde_json::json!(["trial", "others"]));
    assert_eq!(json["design"]["onsets"], serde_json::json!([[10.0], [0.0, 20.0]]));
}

#[test]
fn lss_target_precedence() {
    let fixture = fixture();
    let inputs = resolve_inputs(&sources(&fixture)).expect("resolve inputs");
    assert_eq!(
        resolve_lss_target(Some(3), false, &inputs).expect("target"),
        LssTarget::Trial(3)
    );
    assert_eq!(
        resolve_lss_target(None, true, &inputs).expect("target"),
        LssTarget::All
    );
    assert!(resolve_lss_target(None, false, &inputs).is_err());
}

#[test]
fn lss_sweep_renders_an_array() {
    let fixture = fixture();
    let inputs = resolve_inputs(&sources(&fixture)).expect("resolve inputs");
    let result = run_lss(inputs, None, &options(fixture.dir.path()), LssTarget::All).expect("run");

    let json: serde_json::Value =
        serde_json::from_str(&render_json(&result).expect("render")).expect("parse JSON");
    let designs = json.as_array().expect("array of designs");
    assert_eq!(designs.len(), 3);
    assert_eq!(designs[2]["trial_ID"], 3);
    assert!(
        designs[2]["motion_file"]
            .as_str()
            .is_some_and(|p| p.ends_with("motion_trial-3.par"))
    );
}

#[test]
fn conditions_report_counts_trials() {
    let fixture = fixture();
    let report = inspect_conditions(&fixture.events, None).expect("inspect");
    assert_eq!(report.column.name, "trial_type");
    assert!(report.split);
    assert_eq!(
        report.conditions,
        vec![
            ("CS-_first_half_first".to_string(), 1),
            ("CS-_first_half_others".to_string(), 1),
            ("CS+".to_string(), 1),
        ]
    );
}

#[test]
fn missing_path_flags_are_reported() {
    let err = resolve_inputs(&InputSources::default()).unwrap_err();
    assert!(err.to_string().contains("--scan"));
}

#[test]
fn binary_writes_design_json_to_output() {
    let fixture = fixture();
    let output = fixture.dir.path().join("out").join("design.json");
    let motion = fixture.dir.path().join("motion.par");

    let status = Command::new(env!("CARGO_BIN_EXE_fmri-designer"))
        .arg("design")
        .arg("--scan")
        .arg("bold.nii.gz")
        .arg("--events")
        .arg(&fixture.events)
        .arg("--regressors")
        .arg(&fixture.regressors)
        .arg("--motion-file")
        .arg(&motion)
        .arg("--decimals")
        .arg("1")
        .arg("--output")
        .arg(&output)
        .status()
        .expect("run binary");
    assert!(status.success());

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).expect("read output")).expect("parse");
    assert_eq!(json["design"]["scans"], "bold.nii.gz");
    assert!(motion.exists());
}

#[test]
fn binary_fails_on_unknown_trial() {
    let fixture = fixture();
    let output = Command::new(env!("CARGO_BIN_EXE_fmri-designer"))
        .arg("lss")
        .arg("--scan")
        .arg("bold.nii.gz")
        .arg("--events")
        .arg(&fixture.events)
        .arg("--regressors")
        .arg(&fixture.regressors)
        .arg("--motion-file")
        .arg(fixture.dir.path().join("motion.par"))
        .arg("--trial-id")
        .arg("99")
        .output()
        .expect("run binary");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("trial ID 99 not found"));
}
