use clap::Parser;
use socratic_tutor::cli::{Cli, Commands, SessionArgs};
use std::path::PathBuf;

#[test]
fn test_parse_session_defaults() {
    let cli = Cli::try_parse_from(["tutor", "session"]).unwrap();
    assert!(!cli.json);
    assert!(cli.config.is_none());
    match cli.command {
        Commands::Session(args) => assert_eq!(args, SessionArgs::default()),
        other => panic!("Wrong command: {other:?}"),
    }
}

#[test]
fn test_parse_session_with_options() {
    let cli = Cli::try_parse_from([
        "tutor",
        "session",
        "--essay",
        "draft.txt",
        "--export",
        "--seed",
        "42",
    ])
    .unwrap();

    match cli.command {
        Commands::Session(args) => {
            assert_eq!(args.essay, Some(PathBuf::from("draft.txt")));
            assert!(args.export);
            assert_eq!(args.seed, Some(42));
        }
        other => panic!("Wrong command: {other:?}"),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["tutor", "rubric", "--json", "--config", "custom.yaml"]).unwrap();
    assert!(cli.json);
    assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
    assert!(matches!(cli.command, Commands::Rubric));
}

#[test]
fn test_config_command() {
    let cli = Cli::try_parse_from(["tutor", "-j", "config"]).unwrap();
    assert!(cli.json);
    assert!(matches!(cli.command, Commands::Config));
}

#[test]
fn test_rejects_bad_seed_and_unknown_command() {
    assert!(Cli::try_parse_from(["tutor", "session", "--seed", "many"]).is_err());
    assert!(Cli::try_parse_from(["tutor", "grade"]).is_err());
    assert!(Cli::try_parse_from(["tutor"]).is_err());
}
