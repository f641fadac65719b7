use clap::Parser;
use trainconf::cli::{Cli, Commands};
use trainconf::infrastructure::logging::LogFormat;

#[test]
fn test_parse_load_with_overrides() {
    let cli = Cli::try_parse_from(vec![
        "trainconf",
        "load",
        "configs/debug.yaml",
        "--set",
        "optim.lr=1e-4",
        "--set",
        "model.n_layers=12",
        "--strict",
    ])
    .unwrap();

    match cli.command {
        Commands::Load(args) => {
            assert_eq!(args.path.to_str(), Some("configs/debug.yaml"));
            assert!(args.strict);
            assert!(!args.no_env);
            let paths: Vec<String> = args.overrides.iter().map(|o| o.key_path()).collect();
            assert_eq!(paths, vec!["optim.lr", "model.n_layers"]);
            assert_eq!(args.overrides[0].value().as_f64(), Some(1e-4));
        }
        Commands::Keys(_) => panic!("Wrong command"),
    }
}

#[test]
fn test_parse_load_defaults() {
    let cli = Cli::try_parse_from(vec!["trainconf", "load", "run.yaml"]).unwrap();

    assert!(!cli.json);
    assert_eq!(cli.log_level, "warn");
    assert_eq!(cli.log_format, LogFormat::Pretty);
    match cli.command {
        Commands::Load(args) => {
            assert!(!args.strict);
            assert!(args.overrides.is_empty());
        }
        Commands::Keys(_) => panic!("Wrong command"),
    }
}

#[test]
fn test_malformed_override_rejected_by_parser() {
    let result = Cli::try_parse_from(vec!["trainconf", "load", "run.yaml", "--set", "optim.lr"]);
    assert!(result.is_err());
}

#[test]
fn test_load_requires_path() {
    assert!(Cli::try_parse_from(vec!["trainconf", "load"]).is_err());
}

#[test]
fn test_parse_keys_with_global_flags() {
    let cli = Cli::try_parse_from(vec![
        "trainconf",
        "keys",
        "optim",
        "--json",
        "--log-format",
        "json",
    ])
    .unwrap();

    assert!(cli.json);
    assert_eq!(cli.log_format, LogFormat::Json);
    match cli.command {
        Commands::Keys(args) => assert_eq!(args.prefix.as_deref(), Some("optim")),
        Commands::Load(_) => panic!("Wrong command"),
    }
}
