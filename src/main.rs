mod app;
mod cli;
mod config;
mod datasources;
mod error;
mod logic;
mod models;

use anyhow::Context;
use app::App;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logs go to stderr so --json output stays clean
    let default_filter = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init => {
            Config::setup_interactive(cli.config).context("Setup failed")?;
        }
        Commands::Languages => {
            let config = load_config(cli.config)?;
            print!("{}", app::languages_text(config.translation.source_language));
        }
        Commands::Options { json } => {
            let options = app::AdvisoryOptions::new();
            if json {
                println!("{}", serde_json::to_string_pretty(&options)?);
            } else {
                print!("{}", options.render_text());
            }
        }
        Commands::Translate(args) => {
            let app = App::new(load_config(cli.config)?)?;
            let batch = app.translate(args.texts, &args.lang).await;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&batch)?);
            } else {
                print!("{}", app::render_batch(&batch));
            }
        }
        Commands::Rules => {
            let app = App::new(load_config(cli.config)?)?;
            print!("{}", app.rules_summary().render_text());
        }
        Commands::Advise(args) => {
            let app = App::new(load_config(cli.config)?)?;
            let report = app.advise(&args).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report.render_text());
            }
        }
        Commands::Check => {
            let path = Config::resolved_path(cli.config.as_deref());
            match &path {
                Some(p) => println!("Config: {}", p.display()),
                None => println!("Config: none found, using defaults"),
            }
            let app = App::new(load_config(cli.config)?)?;
            print!("{}", app.rules_summary().render_text());
            println!("Connections:");
            print!("{}", app.check_connections().await.render_text());
        }
    }

    Ok(())
}

fn load_config(path: Option<std::path::PathBuf>) -> anyhow::Result<Config> {
    Config::load(path).context("Configuration error (run `agri-advisor init` to set up)")
}
