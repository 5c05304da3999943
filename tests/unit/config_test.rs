//! Tests for configuration validation

use std::io::Write;

use restaurant_seating::config::{
    PipelineConfig, SeatingConfig, ShutdownPolicy, TablesConfig, DEFAULT_AUDIT_CAPACITY,
    DEFAULT_PIPELINE_CAPACITY,
};

#[test]
fn test_tables_config_validation() {
    let valid = TablesConfig {
        sizes: vec![2, 3, 4, 5, 6, 6, 2],
    };
    assert!(valid.validate().is_ok());
}

#[test]
fn test_tables_config_rejects_empty() {
    let invalid = TablesConfig { sizes: vec![] };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_tables_config_rejects_out_of_range() {
    for bad in [1, 7] {
        let invalid = TablesConfig {
            sizes: vec![2, 3, 4, 5, 6, bad],
        };
        let err = invalid.validate().unwrap_err();
        assert!(err.contains(&bad.to_string()), "{err}");
    }
}

#[test]
fn test_tables_config_requires_every_size() {
    let invalid = TablesConfig {
        sizes: vec![2, 2, 4, 6],
    };
    let err = invalid.validate().unwrap_err();
    assert!(err.contains("missing: 3, 5"), "{err}");
}

#[test]
fn test_pipeline_config_defaults() {
    let cfg = PipelineConfig::default();
    assert_eq!(cfg.capacity, DEFAULT_PIPELINE_CAPACITY);
    assert_eq!(cfg.shutdown, ShutdownPolicy::Drain);
    assert!(cfg.validate().is_ok());
    assert!(cfg.with_capacity(0).validate().is_err());
    assert!(PipelineConfig::new().with_thread_name("").validate().is_err());
}

#[test]
fn test_seating_config_from_json_str() {
    let json = r#"{
        "tables": { "sizes": [2, 3, 4, 5, 6] },
        "pipeline": { "capacity": 16, "shutdown": "abandon" }
    }"#;
    let cfg = SeatingConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.tables.sizes, vec![2, 3, 4, 5, 6]);
    assert_eq!(cfg.pipeline.capacity, 16);
    assert_eq!(cfg.pipeline.shutdown, ShutdownPolicy::Abandon);
    assert_eq!(cfg.pipeline.thread_name, "seating-admission");
    assert_eq!(cfg.audit_capacity, DEFAULT_AUDIT_CAPACITY);
}

#[test]
fn test_seating_config_json_defaults_pipeline() {
    let cfg = SeatingConfig::from_json_str(r#"{ "tables": { "sizes": [6, 5, 4, 3, 2] } }"#)
        .unwrap();
    assert_eq!(cfg.pipeline, PipelineConfig::new());
}

#[test]
fn test_seating_config_from_json_str_rejects_invalid() {
    assert!(SeatingConfig::from_json_str("not json")
        .unwrap_err()
        .starts_with("parse error"));
    let err = SeatingConfig::from_json_str(r#"{ "tables": { "sizes": [2, 3] } }"#).unwrap_err();
    assert!(err.starts_with("tables invalid"), "{err}");
}

#[test]
fn test_seating_config_from_json_file() {
    let path = std::env::temp_dir().join(format!("seating-{}.json", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    write!(file, r#"{{ "tables": {{ "sizes": [2, 3, 4, 5, 6] }}, "audit_capacity": 8 }}"#).unwrap();
    drop(file);

    let cfg = SeatingConfig::from_json_file(&path).unwrap();
    assert_eq!(cfg.audit_capacity, 8);
    std::fs::remove_file(&path).unwrap();

    let err = SeatingConfig::from_json_file(&path).unwrap_err();
    assert!(format!("{err:#}").contains("reading seating config"));
}

#[test]
fn test_shutdown_policy_from_str() {
    assert_eq!(" Drain ".parse::<ShutdownPolicy>(), Ok(ShutdownPolicy::Drain));
    assert_eq!("abandon".parse::<ShutdownPolicy>(), Ok(ShutdownPolicy::Abandon));
    assert!("later".parse::<ShutdownPolicy>().is_err());
}
