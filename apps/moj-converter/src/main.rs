//! MOJ Converter
//!
//! Discovers API specifications behind ambiguous entry points (bare spec
//! URLs, documentation pages, config indirections) and converts them to the
//! MOJ endpoint format. Inline documents from a file or stdin skip discovery.

use clap::{Parser, Subcommand, ValueEnum};
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv};
use eyre::{Result, eyre};
use spec_discovery::{
    HttpFetcher, IngestRequest, IngestResponse, IngestedDocument, InputKind, SpecProvider, ingest,
};
use std::io::Read;
use std::path::PathBuf;
use tracing::info;

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "moj-converter")]
#[command(about = "Convert OpenAPI specs and Postman collections to the MOJ endpoint format")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Provider {
    Swagger,
    Postman,
}

impl From<Provider> for SpecProvider {
    fn from(provider: Provider) -> Self {
        match provider {
            Provider::Swagger => SpecProvider::Swagger,
            Provider::Postman => SpecProvider::Postman,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Discover a specification and convert it
    Convert {
        /// Entry point: a spec URL, a documentation page, or a config URL
        #[arg(conflicts_with_all = ["file", "stdin"])]
        url: Option<String>,

        /// Read the specification from a local file instead
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Read the specification from stdin instead
        #[arg(long)]
        stdin: bool,

        /// Specification provider
        #[arg(short, long, value_enum, default_value_t = Provider::Swagger)]
        provider: Provider,

        /// Print the validated source document instead of the MOJ output
        #[arg(long)]
        raw: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();
    init_tracing(&Environment::from_env());

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            url,
            file,
            stdin,
            provider,
            raw,
        } => convert(url, file, stdin, provider.into(), raw).await,
    }
}

async fn convert(
    url: Option<String>,
    file: Option<PathBuf>,
    stdin: bool,
    provider: SpecProvider,
    raw: bool,
) -> Result<()> {
    let config = Config::from_env()?;
    let fetcher = HttpFetcher::new(&config.user_agent, config.timeout())
        .map_err(|error| eyre!("failed to build HTTP client: {error}"))?;

    let request = if let Some(url) = url {
        IngestRequest {
            data: url,
            kind: InputKind::Url,
            provider,
        }
    } else if let Some(path) = file {
        IngestRequest {
            data: std::fs::read_to_string(&path)?,
            kind: InputKind::Text,
            provider,
        }
    } else if stdin {
        let mut data = String::new();
        std::io::stdin().read_to_string(&mut data)?;
        IngestRequest {
            data,
            kind: InputKind::Text,
            provider,
        }
    } else {
        return Err(eyre!("provide a URL, --file, or --stdin"));
    };

    let document = match ingest(&request, &fetcher).await {
        Ok(document) => document,
        Err(error) => {
            // Scripted callers get the same failure envelope the library exposes
            let envelope = IngestResponse::from(Err(error));
            println!("{}", serde_json::to_string_pretty(&envelope)?);
            std::process::exit(1);
        }
    };

    let output = if raw {
        serde_json::to_string_pretty(&document.into_value())?
    } else {
        let moj = match document {
            IngestedDocument::Spec(spec) => moj_transform::transform_spec(&spec.document),
            IngestedDocument::Collection(collection) => {
                moj_transform::transform_collection(&collection)
            }
        };
        info!(endpoints = moj.endpoints.len(), "conversion complete");
        serde_json::to_string_pretty(&moj)?
    };

    println!("{output}");
    Ok(())
}
