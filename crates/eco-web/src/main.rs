use anyhow::Context;
use clap::Parser;

use eco_config::EcoConfig;
use eco_web::{bootstrap, server};

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("ecos error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let mut config = EcoConfig::load_with_dotenv().context("failed to load configuration")?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            let state = bootstrap::build_state(&config).await?;
            let address = config.server.bind_address();
            server::serve(state, &address)
                .await
                .with_context(|| format!("server on {address} failed"))?;
        }
        Commands::Migrate => {
            let service = bootstrap::open_service(&config.database, true).await?;
            let target = if service.db().is_remote() { "hosted" } else { "local" };
            println!("migrations applied to the {target} database");
        }
        Commands::CheckConfig => {
            let configured = config.configured_sections();
            for section in ["database", "clerk"] {
                let state = if configured.contains(&section) {
                    "configured"
                } else {
                    "not configured"
                };
                println!("{section:<10} {state}");
            }
            if !config.database.is_remote() {
                println!("{:<10} {}", "local db", config.database.local_path);
            }
            println!("{:<10} {}", "listen", config.server.bind_address());
        }
        Commands::Seed => {
            let service = bootstrap::open_service(&config.database, true).await?;
            let today = chrono::Utc::now().date_naive();
            match service.seed_demo(today).await.context("failed to seed demo data")? {
                Some(summary) => println!(
                    "seeded {} organizations, {} practitioners, {} opportunities, {} investments",
                    summary.organizations,
                    summary.practitioners,
                    summary.opportunities,
                    summary.investments
                ),
                None => println!("database already has data; nothing seeded"),
            }
        }
    }
    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("ECOSPHERE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
