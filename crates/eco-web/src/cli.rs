use clap::{Parser, Subcommand};

/// Top-level CLI parser for the `ecos` binary.
#[derive(Debug, Parser)]
#[command(name = "ecos", version, about = "Ecosphere - creative economy dashboard and public site")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the web server
    Serve {
        /// Port to listen on (overrides server.port)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Apply database migrations and exit
    Migrate,
    /// Show which configuration sections are set
    CheckConfig,
    /// Load demo data into an empty database
    Seed,
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_with_port() {
        let cli = Cli::try_parse_from(["ecos", "serve", "--port", "8080"]).expect("cli should parse");
        assert!(matches!(cli.command, Commands::Serve { port: Some(8080) }));
        assert!(!cli.verbose);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["ecos", "migrate", "--quiet"]).expect("cli should parse");
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Migrate));
    }

    #[test]
    fn kebab_case_subcommand() {
        let cli = Cli::try_parse_from(["ecos", "-v", "check-config"]).expect("cli should parse");
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::CheckConfig));
    }

    #[test]
    fn port_must_be_numeric() {
        assert!(Cli::try_parse_from(["ecos", "serve", "--port", "web"]).is_err());
    }
}
