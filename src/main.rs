use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lopdf::{Document, Object};

use inspectdoc::bundle::{combine, FileManifest};
use inspectdoc::core::validate::parse_record;
use inspectdoc::core::EngineConfig;
use inspectdoc::pipeline::{generate_with_outputs, DebugOutputs};

#[derive(Parser, Debug)]
#[command(name = "inspectdoc")]
#[command(version, about = "Vehicle inspection report generation and bundling", long_about = None)]
struct Cli {
    /// More log output (debug level)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a proof of collection / delivery PDF from an inspection record
    Generate {
        /// Inspection record JSON file
        input: PathBuf,

        /// Output PDF path (default: ./<input_name>.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Engine configuration JSON file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory holding the outline templates and logo
        #[arg(long)]
        assets: Option<PathBuf>,

        /// Also write the page plan as JSON
        #[arg(long)]
        plan: Option<PathBuf>,

        /// Also write one HTML preview per page into this directory
        #[arg(long)]
        debug_html: Option<PathBuf>,

        /// Compression worker threads (default: all cores)
        #[arg(long)]
        workers: Option<usize>,
    },

    /// Combine generated PDFs behind a summary page
    Bundle {
        /// Bundle manifest JSON file
        manifest: PathBuf,

        /// Output PDF path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show information about a PDF file
    Info {
        /// Input PDF file path
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Generate {
            input,
            output,
            config,
            assets,
            plan,
            debug_html,
            workers,
        } => generate_report(input, output, config, assets, plan, debug_html, workers),
        Commands::Bundle { manifest, output } => bundle_documents(manifest, output),
        Commands::Info { input } => show_info(input),
    }
}

fn generate_report(
    input: PathBuf,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
    assets: Option<PathBuf>,
    plan: Option<PathBuf>,
    debug_html: Option<PathBuf>,
    workers: Option<usize>,
) -> Result<()> {
    if !input.is_file() {
        anyhow::bail!("Input is not a file: {}", input.display());
    }

    let mut config = match &config_path {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(dir) = assets {
        config = config.with_asset_dir(dir);
    }
    if let Some(threads) = workers {
        config = config.with_workers(threads);
    }

    let output = output.unwrap_or_else(|| input.with_extension("pdf"));

    let json = fs::read_to_string(&input)
        .with_context(|| format!("Failed to read record: {}", input.display()))?;
    let record = parse_record(&json)
        .with_context(|| format!("Invalid inspection record: {}", input.display()))?;

    let outputs = DebugOutputs {
        plan_json: plan,
        html_dir: debug_html,
    };
    let generated = generate_with_outputs(&record, &config, &outputs)
        .with_context(|| format!("Failed to generate document for {}", record.job_reference))?;

    write_output(&output, &generated.bytes)?;

    println!(
        "{} pages, {} images ({} unavailable) -> {}",
        generated.page_count(),
        generated.report.compressed,
        generated.report.failed,
        output.display()
    );
    Ok(())
}

fn bundle_documents(manifest_path: PathBuf, output: PathBuf) -> Result<()> {
    let manifest = FileManifest::from_file(&manifest_path)
        .with_context(|| format!("Failed to read manifest: {}", manifest_path.display()))?;
    let base_dir = manifest_path.parent().unwrap_or_else(|| Path::new("."));
    let manifest = manifest
        .load_documents(base_dir)
        .context("Failed to read bundle documents")?;

    let bundle = combine(&manifest).context("Failed to combine documents")?;
    write_output(&output, &bundle.bytes)?;

    println!(
        "{} documents, {} pages, total {} -> {}",
        manifest.entries.len(),
        bundle.page_count,
        bundle.grand_total,
        output.display()
    );
    Ok(())
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("Failed to write: {}", path.display()))
}

fn show_info(input: PathBuf) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let doc = Document::load(&input)
        .with_context(|| format!("Failed to open PDF: {}", input.display()))?;

    println!("PDF Information");
    println!("===============");
    println!("File: {}", input.display());
    println!("Version: {}", doc.version);
    println!("Pages: {}", doc.get_pages().len());

    let info = doc
        .trailer
        .get(b"Info")
        .and_then(Object::as_reference)
        .and_then(|id| doc.get_dictionary(id));
    if let Ok(info) = info {
        for (key, value) in info.iter() {
            if let Ok(text) = value.as_str() {
                println!(
                    "{}: {}",
                    String::from_utf8_lossy(key),
                    String::from_utf8_lossy(text)
                );
            }
        }
    }

    Ok(())
}
