//! End-to-end loading of the debug run document.

mod common;

use common::{fixture_document, fixture_path, load_fixture, setup_test_logging, write_document};
use trainconf::{
    ConfigError, ConfigLoader, FsdpType, LoadOptions, ModelDtype, Override, TokenizerKind,
};

#[test]
fn test_fixture_loads_without_overrides() {
    setup_test_logging();
    let config = load_fixture(&[], true).expect("Fixture should load in strict mode");

    assert_eq!(config.name, "debug");
    assert_eq!(config.model.dim, 1024);
    assert!((config.optim.lr - 3e-4).abs() < f64::EPSILON);
    assert_eq!(config.checkpoint.dump.every, 100);
    assert_eq!(config.distributed.fsdp_type, FsdpType::FullShard);
    assert_eq!(config.distributed.model_dtype, ModelDtype::Bf16);
    assert_eq!(config.data.tokenizer.name, TokenizerKind::Bytes);
    assert_eq!(config.data.sources.len(), 1);
    assert!(config.profiling.run);
}

#[test]
fn test_fixture_loads_from_file() {
    let config = ConfigLoader::load_from_file(fixture_path(), &[], LoadOptions::strict())
        .expect("Fixture file should load");
    assert_eq!(config.steps, 1000);
    assert_eq!(config.seed, 777);
}

#[test]
fn test_zero_lr_is_validation_error() {
    let err = load_fixture(&["optim.lr=0"], false).unwrap_err();
    match err {
        ConfigError::Validation { key_path, reason } => {
            assert_eq!(key_path, "optim.lr");
            assert!(reason.contains("positive"));
        }
        other => panic!("Expected Validation error, got {other:?}"),
    }
}

#[test]
fn test_unknown_key_depends_on_strict_mode() {
    let err = load_fixture(&["foo.bar=1"], true).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownKey { ref key_paths } if key_paths == &["foo.bar"]));

    let lenient = load_fixture(&["foo.bar=1"], false).expect("Unknown key should be ignored");
    let plain = load_fixture(&[], false).unwrap();
    assert_eq!(lenient, plain);
}

#[test]
fn test_warmup_above_steps_rejected() {
    let err = load_fixture(&["steps=100"], false).unwrap_err();
    assert_eq!(err.to_string(), "optim.warmup (200) exceeds steps (100)");
}

#[test]
fn test_omitted_optional_field_gets_default() {
    let document = fixture_document().replace("    every: 100\n    keep: 1\n\nlogging", "    every: 100\n\nlogging");
    assert!(!document.contains("eval:\n    every: 100\n    keep: 1"));

    let config = ConfigLoader::load_str(&document, &[], LoadOptions::strict()).unwrap();
    assert_eq!(config.checkpoint.eval.every, 100);
    assert_eq!(config.checkpoint.eval.keep, 1);
}

#[test]
fn test_malformed_document_is_parse_error() {
    let file = write_document("name: debug\noptim:\n  lr: [3e-4\n");
    let err = ConfigLoader::load_from_file(file.path(), &[], LoadOptions::default()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn test_serialized_config_reloads_identically() {
    let config = load_fixture(&[], true).unwrap();
    let yaml = config.to_yaml().unwrap();

    let file = write_document(&yaml);
    let reloaded = ConfigLoader::load_from_file(file.path(), &[], LoadOptions::strict()).unwrap();
    assert_eq!(reloaded, config);
}

#[test]
fn test_override_builds_new_instance() {
    let base = load_fixture(&[], true).unwrap();
    let o: Override = "distributed.tp_size=2".parse().unwrap();

    // Probing is on in the fixture, which requires tp_size == 1.
    let err = ConfigLoader::apply_override(&base, &o).unwrap_err();
    assert_eq!(err.key_path(), Some("distributed.tp_size"));

    let no_probe = ConfigLoader::apply_override(&base, &"probe_freq=0".parse().unwrap()).unwrap();
    let variant = ConfigLoader::apply_override(&no_probe, &o).unwrap();
    assert_eq!(variant.distributed.tp_size, 2);
    assert_eq!(no_probe.distributed.tp_size, 1);
    assert_eq!(base.probe_freq, 100);
}

#[test]
fn test_tokenizer_model_file_required() {
    let err = load_fixture(&["data.tokenizer.name=tiktoken"], false).unwrap_err();
    assert_eq!(err.key_path(), Some("data.tokenizer.path"));

    let config = load_fixture(
        &["data.tokenizer.name=tiktoken", "data.tokenizer.path=tokenizers/cl100k.tiktoken"],
        true,
    )
    .unwrap();
    assert_eq!(
        config.data.tokenizer.path.as_deref(),
        Some("tokenizers/cl100k.tiktoken")
    );
}
