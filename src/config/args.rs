//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

use super::StaticConfig;

/// tinylink - multi-user URL shortener
#[derive(Parser, Debug)]
#[command(name = "tinylink")]
#[command(version)]
#[command(about = "A small multi-user URL shortener", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(long, short = 'c', global = true, default_value = "config.toml")]
    pub config: String,

    /// Override server.host
    #[arg(long)]
    pub host: Option<String>,

    /// Override server.port
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Register two demo accounts with a couple of links at startup
    #[arg(long)]
    pub seed_demo: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a sample configuration file (or write it to --output)
    GenerateConfig {
        #[arg(long, short = 'o')]
        output: Option<String>,
    },
}

impl Cli {
    /// Apply command-line overrides on top of a loaded configuration
    pub fn apply_overrides(&self, config: &mut StaticConfig) {
        if let Some(ref host) = self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::parse_from(["tinylink"]);
        assert_eq!(cli.config, "config.toml");
        assert!(cli.command.is_none());
        assert!(!cli.seed_demo);
    }

    #[test]
    fn test_overrides_applied() {
        let cli = Cli::parse_from(["tinylink", "-c", "custom.toml", "--host", "0.0.0.0", "-p", "9000"]);
        let mut config = StaticConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(cli.config, "custom.toml");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_generate_config_subcommand() {
        let cli = Cli::parse_from(["tinylink", "generate-config", "--output", "out.toml"]);
        match cli.command {
            Some(Commands::GenerateConfig { output }) => {
                assert_eq!(output.as_deref(), Some("out.toml"))
            }
            None => panic!("expected generate-config"),
        }
    }
}
