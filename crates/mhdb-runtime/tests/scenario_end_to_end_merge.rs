//! Full run over real files: baseline + changes + product map in, merged
//! database out. Exercises the file sources/sink, the fixed stage order and
//! the no-partial-write guarantee.

use std::path::PathBuf;

use tempfile::TempDir;

use mhdb_runtime::{
    run, FileChangeSetSource, FileDatabaseSink, FileDatabaseSource, RunConfig, RuntimeError,
};

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

const BASELINE: &str = r#"{
  "entries": {
    "Future-cme-[*]": {
      "exchangeTimeZone": "America/Chicago",
      "holidays": ["1/1/2024"]
    },
    "Future-cme-ES": {
      "dataTimeZone": "UTC",
      "exchangeTimeZone": "America/Chicago",
      "holidays": ["1/1/2024"],
      "earlyCloses": { "11/29/2024": "12:15:00" }
    }
  }
}"#;

const PRODUCTS: &str = r#"{ "equity": { "cmeKeys": { "ES": "cme" } } }"#;

const CHANGES: &str = r#"{
  "equity": {
    "exchangeTimeZone": "America/Chicago",
    "earlyCloses": { "12/24/2024": "12:15:00" },
    "holidays": ["12/25/2024"],
    "remove": { "earlyCloses": ["11/29/2024"] }
  }
}"#;

#[test]
fn merge_run_produces_merged_sorted_output() {
    let dir = TempDir::new().unwrap();
    let source = FileDatabaseSource {
        database_path: write(&dir, "mhdb.json", BASELINE),
        products_path: write(&dir, "products.json", PRODUCTS),
    };
    let changes = FileChangeSetSource {
        path: write(&dir, "changes.json", CHANGES),
    };
    let out_path = dir.path().join("mhdb-updated.json");
    let sink = FileDatabaseSink {
        path: out_path.clone(),
    };

    let report = run(&source, &changes, &sink, &RunConfig::default()).unwrap();
    // One early close + one holiday inserted; one early close removed.
    assert_eq!(report.merge.inserted, 2);
    assert_eq!(report.merge.removed, 1);
    // The 1/1/2024 child holiday duplicates the generic parent's: repaired.
    assert_eq!(report.integrity.repaired, 1);

    let out: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    let es = &out["entries"]["Future-cme-ES"];

    assert_eq!(es["holidays"], serde_json::json!(["12/25/2024"]));
    assert_eq!(es["earlyCloses"]["12/24/2024"], "12:15:00");
    assert_eq!(es["earlyCloses"].as_object().unwrap().len(), 1);
    // Unmanaged fields survive.
    assert_eq!(es["dataTimeZone"], "UTC");
    // Entry order preserved: generic entry still first.
    let keys: Vec<&String> = out["entries"].as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["Future-cme-[*]", "Future-cme-ES"]);
}

#[test]
fn second_identical_run_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let source = FileDatabaseSource {
        database_path: write(&dir, "mhdb.json", BASELINE),
        products_path: write(&dir, "products.json", PRODUCTS),
    };
    let changes = FileChangeSetSource {
        path: write(&dir, "changes.json", CHANGES),
    };
    let first_out = dir.path().join("first.json");
    run(
        &source,
        &changes,
        &FileDatabaseSink {
            path: first_out.clone(),
        },
        &RunConfig::default(),
    )
    .unwrap();

    // Feed the first output back in as the baseline.
    let source2 = FileDatabaseSource {
        database_path: first_out.clone(),
        products_path: write(&dir, "products2.json", PRODUCTS),
    };
    let second_out = dir.path().join("second.json");
    let report = run(
        &source2,
        &changes,
        &FileDatabaseSink {
            path: second_out.clone(),
        },
        &RunConfig::default(),
    )
    .unwrap();

    assert_eq!(report.merge.inserted, 0);
    assert_eq!(report.merge.removed, 0);
    assert_eq!(
        std::fs::read_to_string(&first_out).unwrap(),
        std::fs::read_to_string(&second_out).unwrap()
    );
}

#[test]
fn malformed_changes_abort_before_any_write() {
    let dir = TempDir::new().unwrap();
    let source = FileDatabaseSource {
        database_path: write(&dir, "mhdb.json", BASELINE),
        products_path: write(&dir, "products.json", PRODUCTS),
    };
    let changes = FileChangeSetSource {
        path: write(
            &dir,
            "changes.json",
            r#"{ "equity": { "exchangeTimeZone": "America/Chicago", "holidays": ["2024-12-25"] } }"#,
        ),
    };
    let out_path = dir.path().join("mhdb-updated.json");
    let sink = FileDatabaseSink {
        path: out_path.clone(),
    };

    let err = run(&source, &changes, &sink, &RunConfig::default()).unwrap_err();
    assert!(matches!(err, RuntimeError::ChangeSet(_)));
    assert!(!out_path.exists());
}

#[test]
fn ensure_bank_holidays_pass_fills_every_entry() {
    let dir = TempDir::new().unwrap();
    let source = FileDatabaseSource {
        database_path: write(&dir, "mhdb.json", BASELINE),
        products_path: write(&dir, "products.json", PRODUCTS),
    };
    let changes = FileChangeSetSource {
        path: write(&dir, "changes.json", r#"{}"#),
    };
    let out_path = dir.path().join("out.json");
    let sink = FileDatabaseSink {
        path: out_path.clone(),
    };

    let config = RunConfig {
        ensure_bank_holiday_collections: true,
        ..RunConfig::default()
    };
    run(&source, &changes, &sink, &config).unwrap();

    let out: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_eq!(out["entries"]["Future-cme-ES"]["bankHolidays"], serde_json::json!([]));
    assert_eq!(out["entries"]["Future-cme-[*]"]["bankHolidays"], serde_json::json!([]));
}
