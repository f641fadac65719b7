//! Environment overrides as collected by the `load` command.

mod common;

use common::load_fixture;
use trainconf::cli::commands::load::ENV_PREFIX;
use trainconf::{ConfigLoader, LoadOptions, Override};

#[test]
fn test_env_overrides_apply_before_cli_overrides() {
    temp_env::with_vars(
        [
            ("TRAINCONF_OPTIM__LR", Some("0.001")),
            ("TRAINCONF_MODEL__N_LAYERS", Some("4")),
        ],
        || {
            let mut overrides = Override::from_env(ENV_PREFIX).unwrap();
            assert!(overrides.iter().any(|o| o.key_path() == "optim.lr"));
            overrides.push("model.n_layers=16".parse().unwrap());

            let document = common::fixture_document();
            let config = ConfigLoader::load_str(&document, &overrides, LoadOptions::strict()).unwrap();

            assert!((config.optim.lr - 0.001).abs() < f64::EPSILON);
            assert_eq!(config.model.n_layers, 16);
        },
    );
}

#[test]
fn test_unknown_env_override_in_strict_mode() {
    temp_env::with_var("TRAINCONF_OPTIM__LEARNING_RATE", Some("0.1"), || {
        let overrides: Vec<Override> = Override::from_env(ENV_PREFIX)
            .unwrap()
            .into_iter()
            .filter(|o| o.key_path().starts_with("optim."))
            .collect();
        let document = common::fixture_document();

        let err = ConfigLoader::load_str(&document, &overrides, LoadOptions::strict()).unwrap_err();
        assert!(err.to_string().contains("optim.learning_rate"));

        let lenient = ConfigLoader::load_str(&document, &overrides, LoadOptions::default()).unwrap();
        assert_eq!(lenient, load_fixture(&[], true).unwrap());
    });
}
