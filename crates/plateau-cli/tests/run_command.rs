//! Drives the run command end to end with a shell-script engine
#![cfg(unix)]

use clap::Parser;
use plateau_cli::commands::execute_run;
use plateau_cli::config::OutputFormat;
use plateau_cli::{Cli, Command, Config, Formatter};
use plateau_controller::{CancellationFlag, Report};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use tempfile::TempDir;

#[tokio::test]
async fn test_run_with_script_engine_converges() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    let engine = root.join("engine.sh");
    fs::write(
        &engine,
        "#!/bin/sh\necho '[{\"term_string\": \"duty\", \"score\": 0.7, \"occurrences\": 2}]' > \"$2/terms.json\"\n",
    )
    .unwrap();
    fs::set_permissions(&engine, fs::Permissions::from_mode(0o755)).unwrap();

    let mut entries = Vec::new();
    for (i, id) in ["a", "b", "c", "d"].iter().enumerate() {
        fs::write(root.join(format!("{}.txt", id)), "text").unwrap();
        entries.push(format!(r#"{{"id": "{}", "path": "{}.txt", "score": {}}}"#, id, id, 1.0 - i as f64 * 0.1));
    }
    let catalog = root.join("catalog.json");
    fs::write(&catalog, format!(r#"{{"entries": [{}]}}"#, entries.join(","))).unwrap();

    let out = root.join("run");
    let cli = Cli::parse_from([
        "plateau",
        "run",
        "--catalog",
        catalog.to_str().unwrap(),
        "--engine",
        engine.to_str().unwrap(),
        "--output-dir",
        out.to_str().unwrap(),
        "--strategy",
        "term_weight",
    ]);
    let args = match cli.command {
        Command::Run(args) => args,
        _ => panic!("Expected Run command"),
    };

    let mut config = Config::default();
    config.engine.extra_args.clear();
    let formatter = Formatter::new(OutputFormat::Json, false);
    execute_run(args, &config, &formatter, CancellationFlag::new()).await.unwrap();

    let report: Report =
        serde_json::from_str(&fs::read_to_string(out.join("reports/final_report.json")).unwrap()).unwrap();
    assert!(report.converged);
    assert_eq!(report.iteration_count(), 3);
    let ids: Vec<&str> = report.documents_processed.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}
