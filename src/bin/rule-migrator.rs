//! rule-migrator CLI - converts deprecated cloudflare_rate_limit rules
//!
//! Serves the conversion web form, or converts a single rule from a file or stdin.

use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use ratelimit_migrator::{
    convert, extract_record, router, AppState, MigratorError, Result, ServerConfig, TeraPresenter,
};

#[derive(Parser)]
#[command(name = "rule-migrator")]
#[command(version, about = "Convert cloudflare_rate_limit rules to cloudflare_ruleset", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the conversion web form
    Serve {
        /// Address to listen on (overrides HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Ruleset layout template (overrides RULE_TEMPLATE)
        #[arg(short, long)]
        template: Option<PathBuf>,
    },

    /// Convert one legacy rule and print the result
    Convert {
        /// File containing the legacy rule; reads stdin when omitted or "-"
        input: Option<PathBuf>,

        /// Ruleset layout template
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Print the extracted migration record as JSON instead
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { host, port, template } => serve(host, port, template),
        Commands::Convert { input, template, json } => convert_file(input, template, json),
    };

    if let Err(e) = result {
        eprintln!("❌ {}", e);
        process::exit(1);
    }
}

fn serve(host: Option<String>, port: Option<u16>, template: Option<PathBuf>) -> Result<()> {
    let config = ServerConfig::from_env()?.with_overrides(host, port, template);
    let presenter = TeraPresenter::load(config.template_path.as_deref())?;
    let state = AppState::new(Arc::new(presenter))?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let addr = config.bind_address();
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!("Rule migrator listening on {}", addr);

        axum::serve(listener, router(state)).await?;
        Ok::<(), MigratorError>(())
    })
}

fn convert_file(input: Option<PathBuf>, template: Option<PathBuf>, json: bool) -> Result<()> {
    let text = match input {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(&path).map_err(|e| {
            MigratorError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?,
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    if json {
        let record = extract_record(&text);
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    let presenter = TeraPresenter::load(template.as_deref())?;
    print!("{}", convert(&presenter, &text)?);
    Ok(())
}
