//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::files;
use crate::http::AuthenticatedClient;
use std::io::Write;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Session file used when neither the config nor the environment names one
pub const DEFAULT_SESSION_FILE: &str = "webui-auth-session.json";

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let client = AuthenticatedClient::new(self.config()?)?;

        match &self.cli.command {
            Commands::Login => {
                let (Some(user), Some(password)) = (&self.cli.user, &self.cli.password) else {
                    return Err(Error::config("login needs --user and --password"));
                };
                client.login(user, password).await?;
                println!("Logged in as {user}");
            }
            Commands::Logout => {
                self.authenticate(&client).await?;
                client.logout().await?;
                println!("Logged out");
            }
            Commands::Refresh => {
                self.authenticate(&client).await?;
                client.refresh().await?;
                println!("Access token refreshed");
            }
            Commands::Status => {
                if client.is_logged_in().await {
                    println!("Logged in");
                } else {
                    println!("Not logged in");
                }
            }
            Commands::Mkdir { path } => {
                self.authenticate(&client).await?;
                files::mkdir(&client, path).await?;
            }
            Commands::Rm { path, recursive } => {
                self.authenticate(&client).await?;
                files::remove(&client, path, *recursive).await?;
            }
            Commands::Mv { from, to } => {
                self.authenticate(&client).await?;
                files::rename(&client, from, to).await?;
            }
            Commands::Get { path, output } => {
                self.authenticate(&client).await?;
                let data = files::download(&client, path).await?;
                match output {
                    Some(output) => tokio::fs::write(output, &data).await?,
                    None => {
                        let mut stdout = tokio::io::stdout();
                        stdout.write_all(&data).await?;
                        stdout.flush().await?;
                    }
                }
            }
            Commands::Put { local, remote } => {
                self.authenticate(&client).await?;
                let data = tokio::fs::read(local).await?;
                files::upload(&client, remote, data.into(), Some(print_progress)).await?;
                eprintln!();
            }
        }

        Ok(())
    }

    /// Build the client config from file, environment and flags
    fn config(&self) -> Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        }
        .with_env_overrides();

        if let Some(base_url) = &self.cli.base_url {
            config.base_url.clone_from(base_url);
        }
        if config.session_file.is_none() {
            config.session_file = Some(std::env::temp_dir().join(DEFAULT_SESSION_FILE));
        }

        config.validate()?;
        debug!("Using server {}", config.base_url);
        Ok(config)
    }

    /// Log in with --user/--password when both were given
    async fn authenticate(&self, client: &AuthenticatedClient) -> Result<()> {
        if let (Some(user), Some(password)) = (&self.cli.user, &self.cli.password) {
            client.login(user, password).await?;
        }
        Ok(())
    }
}

fn print_progress(percent: f64) {
    eprint!("\r{percent:5.1}%");
    let _ = std::io::stderr().flush();
}
