//
// cli.rs
// Ohif-Viewer-Input-rs
//
// Defines the CLI surface with Clap and dispatches user-selected commands to the corresponding modules.
//
// Thales Matheus Mendonça Santos - November 2025

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, Level};

use crate::{
    builder::MetadataBuilder,
    json::{self, JsonStyle},
    models::ViewerDocument,
    pipeline::{generate_document, ViewerRequest},
    resolver::ScanIdMap,
    scan,
    sop_class::FrameKind,
    storage::DocumentStore,
    summary::TreeSummary,
    web,
};

/// Command-line interface glue code: defines the available verbs and dispatches to modules.
#[derive(Parser)]
#[command(name = "ohif-viewer-input")]
#[command(about = "Build OHIF viewer input documents from scanned DICOM directories", long_about = None)]
pub struct Cli {
    /// Log at DEBUG level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a directory and write the viewer document
    Build {
        directory: PathBuf,
        #[arg(short, long)]
        transaction_id: String,
        /// Prefix for every instance URL (scheme included, e.g. dicomweb:https://...)
        #[arg(long)]
        base_url: String,
        /// JSON object mapping Series Instance UID to scan id
        #[arg(long)]
        scan_map: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        compact: bool,
        /// Build studies on the rayon pool
        #[arg(long)]
        parallel: bool,
        /// Also keep the document in this store directory
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// Print the patient/study/series tree found in a directory
    Summary { directory: PathBuf },
    /// Report whether SOP class UIDs are single- or multi-frame
    Classify {
        #[arg(required = true)]
        sop_class_uids: Vec<String>,
    },
    /// Start the web server
    Web {
        #[arg(short, long)]
        directory: PathBuf,
        #[arg(long)]
        base_url: String,
        #[arg(long)]
        scan_map: Option<PathBuf>,
        #[arg(long, default_value = "target/viewer-documents")]
        store: PathBuf,
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
}

pub async fn run() -> anyhow::Result<()> {
    // Parse the raw CLI arguments once and dispatch to a subcommand handler.
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Build {
            directory,
            transaction_id,
            base_url,
            scan_map,
            output,
            compact,
            parallel,
            store,
        } => {
            let resolver = load_scan_map(scan_map.as_deref())?;
            let style = if compact {
                JsonStyle::Compact
            } else {
                JsonStyle::Pretty
            };
            let request = ViewerRequest {
                scan_root: &directory,
                base_url: &base_url,
                style,
                parallel,
            };
            let builder = MetadataBuilder::default();
            let document = generate_document(&builder, &request, &transaction_id, &resolver)?;

            if let Some(store) = store {
                let text = json::to_json_string(&document, style)?;
                let stored = DocumentStore::new(&store)?.save(&transaction_id, &text)?;
                info!("Stored as {:?} (sha256 {})", stored.path, stored.digest);
            }

            emit_document(&document, output.as_deref(), style)?;
        }
        Commands::Summary { directory } => {
            let root = scan::scan_path(&directory)?;
            let builder = MetadataBuilder::default();
            print!("{}", TreeSummary::new(&root, builder.classification()));
        }
        Commands::Classify { sop_class_uids } => {
            let builder = MetadataBuilder::default();
            let table = builder.classification();
            for uid in sop_class_uids {
                let label = match table.classify(&uid) {
                    FrameKind::Single => "single-frame",
                    FrameKind::Multi => "multi-frame (excluded from viewer input)",
                };
                println!("{uid}: {label}");
            }
        }
        Commands::Web {
            directory,
            base_url,
            scan_map,
            store,
            host,
            port,
        } => {
            let state = web::AppState {
                scan_root: directory,
                base_url,
                resolver: Arc::new(load_scan_map(scan_map.as_deref())?),
                builder: Arc::new(MetadataBuilder::default()),
                store: DocumentStore::new(&store)?,
            };
            web::start_server(state, &host, port).await?
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn emit_document(
    document: &ViewerDocument,
    output: Option<&Path>,
    style: JsonStyle,
) -> anyhow::Result<()> {
    match output {
        Some(path) => json::write_json(document, path, style)
            .with_context(|| format!("Failed to write {:?}", path))?,
        None => println!("{}", json::to_json_string(document, style)?),
    }
    Ok(())
}

fn load_scan_map(path: Option<&Path>) -> anyhow::Result<ScanIdMap> {
    // No map means every series comes out with a null scan id.
    match path {
        Some(path) => ScanIdMap::from_json_file(path)
            .with_context(|| format!("Failed to load scan id map {:?}", path)),
        None => Ok(ScanIdMap::new()),
    }
}
