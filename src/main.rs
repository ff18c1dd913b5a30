use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::warn;

use jsonld_schema_generator::{
    config,
    core::{GenerateRequest, GraphOverrides, SchemaGenerator, SchemaRecord},
    persistence::save_outputs,
    utils::as_script_tag,
    SchemaType,
};

#[derive(Parser)]
#[command(
    name = "jsonld_schema_generator",
    about = "Generate schema.org JSON-LD graphs for financial products from web pages",
    long_about = None,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a JSON-LD graph for one page
    Generate {
        /// Page URL to inspect
        url: String,

        /// Human-readable name of the product or service
        name: String,

        /// Schema type to build (payment_card, loan_or_credit, ...)
        #[arg(short, long, default_value = "payment_card")]
        schema_type: String,

        /// Offer catalog key to attach (prestamos, seguros, ...)
        #[arg(long)]
        offer_catalog: Option<String>,

        /// YAML or JSON file with override tables
        #[arg(long)]
        overrides: Option<PathBuf>,

        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit the graph wrapped in a <script> tag ready to embed
        #[arg(long)]
        script: bool,

        /// Emit only the schema graph, without extraction metadata
        #[arg(long)]
        schema_only: bool,

        /// Append the result to the CSV/JSONL logs
        #[arg(long)]
        save: bool,

        /// CSV log path
        #[arg(long, default_value = "extracciones.csv")]
        csv_path: PathBuf,

        /// JSONL log path
        #[arg(long, default_value = "schemas.jsonl")]
        jsonl_path: PathBuf,
    },

    /// Generate schemas for every request in a JSONL file
    Batch {
        /// File with one JSON request per line ({url, name, schema_type, ...})
        file: PathBuf,

        /// Append each result to the CSV/JSONL logs
        #[arg(long)]
        save: bool,

        /// CSV log path
        #[arg(long, default_value = "extracciones.csv")]
        csv_path: PathBuf,

        /// JSONL log path
        #[arg(long, default_value = "schemas.jsonl")]
        jsonl_path: PathBuf,
    },

    /// List the supported schema types
    ListTypes,

    /// List the configured offer catalogs
    ListCatalogs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug {
        tracing::Level::DEBUG
    } else if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Generate {
            url,
            name,
            schema_type,
            offer_catalog,
            overrides,
            output,
            script,
            schema_only,
            save,
            csv_path,
            jsonl_path,
        } => {
            generate_command(
                url,
                name,
                schema_type,
                offer_catalog,
                overrides,
                output,
                script,
                schema_only,
                save,
                csv_path,
                jsonl_path,
            )
            .await
        }
        Commands::Batch {
            file,
            save,
            csv_path,
            jsonl_path,
        } => batch_command(file, save, csv_path, jsonl_path).await,
        Commands::ListTypes => list_types_command(),
        Commands::ListCatalogs => list_catalogs_command(),
    }
}

#[allow(clippy::too_many_arguments)]
async fn generate_command(
    url: String,
    name: String,
    schema_type: String,
    offer_catalog: Option<String>,
    overrides_path: Option<PathBuf>,
    output: Option<PathBuf>,
    script: bool,
    schema_only: bool,
    save: bool,
    csv_path: PathBuf,
    jsonl_path: PathBuf,
) -> Result<()> {
    println!("{}", "Generating schema graph...".bright_blue().bold());

    let mut overrides = match &overrides_path {
        Some(path) => GraphOverrides::from_file(path)?,
        None => GraphOverrides::default(),
    };
    if offer_catalog.is_some() {
        overrides.offer_catalog_key = offer_catalog;
    }

    let generator = SchemaGenerator::new();
    let request = GenerateRequest {
        url,
        name,
        schema_type,
        overrides,
    };
    let record = generator.generate(&request).await?;

    print_summary(&record);

    let payload = if script {
        as_script_tag(&record.schema)
    } else if schema_only {
        serde_json::to_string_pretty(&record.schema)?
    } else {
        serde_json::to_string_pretty(&record.to_value())?
    };

    if let Some(output_path) = output {
        tokio::fs::write(&output_path, &payload).await?;
        println!(
            " Output written to: {}",
            output_path.display().to_string().bright_green()
        );
    } else {
        println!("{payload}");
    }

    if save {
        save_outputs(&record, &csv_path, &jsonl_path)?;
        println!(
            " Appended to {} and {}",
            csv_path.display().to_string().bright_green(),
            jsonl_path.display().to_string().bright_green()
        );
    }

    Ok(())
}

async fn batch_command(
    file: PathBuf,
    save: bool,
    csv_path: PathBuf,
    jsonl_path: PathBuf,
) -> Result<()> {
    println!("{}", "Starting batch generation...".bright_blue().bold());

    let content = tokio::fs::read_to_string(&file)
        .await
        .with_context(|| format!("Failed to read batch file: {}", file.display()))?;

    let requests: Vec<GenerateRequest> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            serde_json::from_str(line).with_context(|| format!("Invalid batch line: {line}"))
        })
        .collect::<Result<_>>()?;

    println!(" Requests: {}", requests.len().to_string().bright_cyan());

    let generator = SchemaGenerator::new();
    let progress = ProgressBar::new(requests.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .expect("valid progress template"),
    );

    let mut generated = 0usize;
    let mut failed = 0usize;
    for request in &requests {
        progress.set_message(request.url.clone());
        match generator.generate(request).await {
            Ok(record) => {
                if save {
                    save_outputs(&record, &csv_path, &jsonl_path)?;
                }
                generated += 1;
            }
            Err(error) => {
                warn!("Skipping {}: {}", request.url, error);
                failed += 1;
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    println!("\n{}", "Batch summary".bright_green().bold());
    println!(" Generated: {}", generated.to_string().bright_cyan());
    if failed > 0 {
        println!(" Failed: {}", failed.to_string().bright_yellow());
    }

    Ok(())
}

fn list_types_command() -> Result<()> {
    println!("{}", "Supported schema types".bright_blue().bold());
    for schema_type in SchemaType::ALL {
        println!("  {}", schema_type.key().bright_cyan());
    }
    Ok(())
}

fn list_catalogs_command() -> Result<()> {
    println!("{}", "Configured offer catalogs".bright_blue().bold());
    for key in config::offer_catalog_keys() {
        let name = config::offer_catalog(key)
            .and_then(|catalog| catalog.get("name"))
            .and_then(|name| name.as_str())
            .unwrap_or("");
        println!("  {} {}", key.bright_cyan(), name);
    }
    Ok(())
}

fn print_summary(record: &SchemaRecord) {
    let node_count = record.schema["@graph"]
        .as_array()
        .map(Vec::len)
        .unwrap_or(0);
    println!(" URL: {}", record.url.bright_green());
    println!(" Schema type: {}", record.schema_type.bright_cyan());
    println!(" Graph nodes: {}", node_count.to_string().bright_cyan());
    println!(" FAQs extracted: {}", record.extracted.faqs.len());
}
