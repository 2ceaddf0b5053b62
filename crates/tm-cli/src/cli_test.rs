use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(std::iter::once("tm").chain(args.iter().copied()))
}

#[test]
fn test_up_limit() {
    let limit = |args: &[&str]| match parse(args).unwrap().command {
        Commands::Migrate(MigrateArgs {
            command: MigrateCommands::Up(up),
        }) => up.limit(),
        other => panic!("unexpected command: {other:?}"),
    };
    assert_eq!(limit(&["migrate", "up"]), None);
    assert_eq!(limit(&["migrate", "up", "2"]), Some(2));
    assert_eq!(limit(&["migrate", "up", "-1"]), None);
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = parse(&["migrate", "version", "-d", "app.duckdb", "--timeout-secs", "5"]).unwrap();
    assert_eq!(cli.global.database.as_deref(), Some("app.duckdb"));
    assert_eq!(cli.global.timeout_secs, Some(5));
}

#[test]
fn test_apply_requires_exactly_one_mode() {
    assert!(parse(&["apply"]).is_err());
    assert!(parse(&["apply", "--ddl", "a.sql", "--dml", "b.sql"]).is_err());
    assert!(parse(&["apply", "--ddl", "a.sql", "--partitioned"]).is_err());
    assert!(parse(&["apply", "--dml", "b.sql", "--partitioned"]).is_ok());
}
