//! End-to-end CLI tests
//!
//! Trains three tiny gbdt models in a temp directory, writes a dataset, and
//! drives the `qco` binary against them. Feature names are taken from
//! `qco models --json` so the fixtures always match the catalogue.

use std::path::Path;
use std::process::{Command, Output};

use gbdt::config::Config;
use gbdt::decision_tree::Data;
use gbdt::gradient_boost::GBDT;
use serde_json::{json, Map, Value};

fn qco_bin() -> String {
    env!("CARGO_BIN_EXE_qco").to_string()
}

/// Run qco isolated from the caller's config and environment
fn run_qco(cwd: &Path, args: &[&str]) -> Output {
    Command::new(qco_bin())
        .args(args)
        .current_dir(cwd)
        .env_remove("QCO_DATASET")
        .env_remove("QCO_MODEL_DIR")
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", cwd.join(".config"))
        .env("HOME", cwd)
        .output()
        .expect("Failed to run qco")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// (slug, kind, feature names) for every model, from the catalogue
fn catalogue(cwd: &Path) -> Vec<(String, String, Vec<String>)> {
    let output = run_qco(cwd, &["models", "--json"]);
    assert!(output.status.success(), "models failed: {}", stderr(&output));
    let entries: Vec<Value> = serde_json::from_str(&stdout(&output)).expect("catalogue JSON");
    entries
        .iter()
        .map(|e| {
            (
                e["id"].as_str().unwrap().to_string(),
                e["kind"].as_str().unwrap().to_string(),
                e["features"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|f| f.as_str().unwrap().to_string())
                    .collect(),
            )
        })
        .collect()
}

/// Deterministic 0/1 training rows; the label follows the first feature
fn train(features: usize, classifier: bool, path: &Path) {
    let mut cfg = Config::new();
    cfg.set_feature_size(features);
    cfg.set_max_depth(2);
    cfg.set_iterations(5);
    cfg.set_shrinkage(0.3);
    cfg.set_loss(if classifier { "LogLikelyhood" } else { "SquaredError" });
    cfg.set_debug(false);
    cfg.set_min_leaf_size(1);

    let mut data: Vec<Data> = (0..8)
        .map(|i| {
            let row: Vec<f32> = (0..features).map(|j| ((i + j) % 2) as f32).collect();
            let positive = row[0] > 0.5;
            let label = match (classifier, positive) {
                (true, true) => 1.0,
                (true, false) => -1.0,
                (false, true) => 85.0,
                (false, false) => 40.0,
            };
            Data::new_training_data(row, 1.0, label, None)
        })
        .collect();

    let mut model = GBDT::new(&cfg);
    model.fit(&mut data);
    model
        .save_model(path.to_str().unwrap())
        .expect("save model");
}

/// Temp workspace with trained models and a two-record dataset
fn setup() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let models_dir = dir.path().join("models");
    std::fs::create_dir_all(&models_dir).unwrap();

    let specs = catalogue(dir.path());
    assert_eq!(specs.len(), 3);

    let mut rows = Vec::new();
    for (module, style, fill) in [("M01", "ST-100", 1.0), ("M02", "ST-200", 0.0)] {
        let mut row = Map::new();
        row.insert("Module Number".into(), json!(module));
        row.insert("Style Number".into(), json!(style));
        for (_, _, features) in &specs {
            for f in features {
                row.insert(f.clone(), json!(fill));
            }
        }
        rows.push(Value::Object(row));
    }
    std::fs::write(
        dir.path().join("qco.json"),
        serde_json::to_string_pretty(&rows).unwrap(),
    )
    .unwrap();

    for (slug, kind, features) in &specs {
        let file = models_dir.join(format!("{}.json", slug.replace('-', "_")));
        train(features.len(), kind == "classifier", &file);
    }

    dir
}

fn predict_json(dir: &Path, extra: &[&str]) -> Value {
    let mut args = vec![
        "predict",
        "M01",
        "ST-100",
        "--dataset",
        "qco.json",
        "--format",
        "json",
    ];
    args.extend_from_slice(extra);
    let output = run_qco(dir, &args);
    assert!(output.status.success(), "predict failed: {}", stderr(&output));
    serde_json::from_str(&stdout(&output)).expect("prediction JSON")
}

#[test]
fn test_predict_all_models_json() {
    let dir = setup();
    let report = predict_json(dir.path(), &[]);

    let per_model = report["ensemble"]["per_model"].as_object().unwrap();
    assert_eq!(per_model.len(), 3);
    let score = |id: &str| per_model[id]["score"].as_f64().unwrap();
    let expected = score("historia") * 0.3 + score("critical-path") * 0.6 + score("talento") * 0.1;
    let total = report["ensemble"]["weighted_total"].as_f64().unwrap();
    assert!((total - expected).abs() < 1e-9, "{total} != {expected}");

    let tier = report["ensemble"]["tier"].as_str().unwrap();
    let expected_tier = match total {
        t if t >= 85.0 => "high-confidence",
        t if t >= 70.0 => "monitor",
        t if t >= 50.0 => "moderate-risk",
        _ => "high-risk",
    };
    assert_eq!(tier, expected_tier);

    let rows = report["breakdown"].as_array().unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[3]["label"], "FINAL SCORE");
    assert_eq!(report["module"], "m01");
}

#[test]
fn test_predict_single_model_is_not_renormalized() {
    let dir = setup();
    let report = predict_json(dir.path(), &["--models", "historia"]);
    let per_model = report["ensemble"]["per_model"].as_object().unwrap();
    assert_eq!(per_model.len(), 1);
    let historia = per_model["historia"]["score"].as_f64().unwrap();
    let total = report["ensemble"]["weighted_total"].as_f64().unwrap();
    assert!((total - historia * 0.3).abs() < 1e-9);
}

#[test]
fn test_predict_keys_are_case_insensitive() {
    let dir = setup();
    let output = run_qco(
        dir.path(),
        &["predict", " m01 ", "st-100", "--dataset", "qco.json", "--no-emoji"],
    );
    assert!(output.status.success(), "predict failed: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("FINAL SCORE"));
    assert!(text.contains("CONTRIBUTION BREAKDOWN"));
}

#[test]
fn test_predict_unknown_record_fails() {
    let dir = setup();
    let output = run_qco(
        dir.path(),
        &["predict", "M99", "ST-100", "--dataset", "qco.json"],
    );
    // Input the user can fix exits with 2
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("No matching record found"));
}

#[test]
fn test_predict_missing_model_file_names_path() {
    let dir = setup();
    std::fs::remove_file(dir.path().join("models").join("talento.json")).unwrap();
    let output = run_qco(
        dir.path(),
        &["predict", "M01", "ST-100", "--dataset", "qco.json"],
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("talento.json"));

    // Not selecting the missing model still works
    let report = predict_json(dir.path(), &["-m", "historia,critical-path"]);
    assert_eq!(report["ensemble"]["per_model"].as_object().unwrap().len(), 2);
}

#[test]
fn test_predict_markdown_to_file() {
    let dir = setup();
    let output = run_qco(
        dir.path(),
        &[
            "predict", "M02", "ST-200", "--dataset", "qco.json", "--format", "md", "-o", "out.md",
        ],
    );
    assert!(output.status.success(), "predict failed: {}", stderr(&output));
    let md = std::fs::read_to_string(dir.path().join("out.md")).unwrap();
    assert!(md.starts_with("# QCO Completion Prediction"));
    // every checklist item is zero for M02
    assert!(md.contains("Incomplete Activities (Critical Path)"));
}

#[test]
fn test_dataset_from_project_config() {
    let dir = setup();
    std::fs::write(
        dir.path().join("qco.toml"),
        "[dataset]\npath = \"qco.json\"\n\n[output]\nformat = \"json\"\n",
    )
    .unwrap();
    let output = run_qco(dir.path(), &["predict", "M01", "ST-100"]);
    assert!(output.status.success(), "predict failed: {}", stderr(&output));
    let report: Value = serde_json::from_str(&stdout(&output)).expect("JSON from config format");
    assert_eq!(report["style"], "st-100");
}

#[test]
fn test_keys_listing() {
    let dir = setup();
    let output = run_qco(
        dir.path(),
        &["keys", "--dataset", "qco.json", "--json"],
    );
    assert!(output.status.success(), "keys failed: {}", stderr(&output));
    let map: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(map["m01"][0], "st-100");
    assert_eq!(map["m02"][0], "st-200");
}

#[test]
fn test_init_writes_config_once() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_qco(dir.path(), &["init"]);
    assert!(output.status.success(), "init failed: {}", stderr(&output));
    let config = std::fs::read_to_string(dir.path().join("qco.toml")).unwrap();
    assert!(config.contains("[models]"));

    let again = run_qco(dir.path(), &["init"]);
    assert!(again.status.success());
    assert!(stdout(&again).contains("Already initialized"));
}

#[test]
fn test_predict_without_dataset_explains_how_to_set_one() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_qco(dir.path(), &["predict", "M01", "ST-100"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("--dataset"));
}
