//! CLI module
//!
//! Command-line interface over the authenticated client.
//!
//! # Commands
//!
//! - `login` / `logout` / `refresh` / `status` - Session management
//! - `mkdir` / `rm` / `mv` - Directory operations
//! - `get` / `put` - Download and upload

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_rm() {
        let cli = Cli::try_parse_from(["webui-auth", "rm", "-r", "/docs"]).unwrap();
        match cli.command {
            Commands::Rm { path, recursive } => {
                assert_eq!(path, "/docs");
                assert!(recursive);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "webui-auth",
            "mv",
            "/docs/a.txt",
            "b.txt",
            "--base-url",
            "https://example.com",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("https://example.com"));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Mv { .. }));
    }

    #[test]
    fn test_parse_login_credentials() {
        let cli = Cli::try_parse_from(["webui-auth", "login", "-u", "alice", "--password", "pw"])
            .unwrap();
        assert!(matches!(cli.command, Commands::Login));
        assert_eq!(cli.user.as_deref(), Some("alice"));
        assert_eq!(cli.password.as_deref(), Some("pw"));
    }

    #[test]
    fn test_command_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
