//! # Template Composer CLI
//!
//! Command-line interface for the template server and offline export.
//!
//! ## Usage
//!
//! ```bash
//! # Run the HTTP API with an in-memory store
//! template-composer serve --listen 0.0.0.0:5000
//!
//! # Persist templates as JSON files
//! template-composer serve --store dir --data-dir ./library
//!
//! # Export a saved template file
//! template-composer export invoice.json --format pdf --out invoice.pdf
//!
//! # Show the page size table
//! template-composer page-sizes
//! ```
//!
//! Logging is controlled with `RUST_LOG` (default `template_composer=info,tower_http=info`).

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use template_composer::{
    ComposerError, PageSizeTable,
    export::{self, ExportContext, ExportFormat, UploadDirLoader, import_json},
    server::{self, DEFAULT_MAX_UPLOAD_BYTES, ServerConfig, StoreKind},
    storage::DEFAULT_OWNER,
};

/// Template Composer - document template editor backend
#[derive(Parser, Debug)]
#[command(name = "template-composer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file with extra page sizes, merged over the built-in table
    #[arg(long, global = true, value_name = "FILE")]
    page_sizes: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StoreArg {
    Memory,
    Dir,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Pdf,
    Docx,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Pdf => ExportFormat::Pdf,
            FormatArg::Docx => ExportFormat::Docx,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:5000")]
        listen: String,

        /// Directory for uploaded images
        #[arg(long, default_value = "uploads")]
        upload_dir: PathBuf,

        /// Template store backend
        #[arg(long, value_enum, default_value = "memory")]
        store: StoreArg,

        /// Library directory for `--store dir`
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Owner id templates are filed under
        #[arg(long, default_value = DEFAULT_OWNER)]
        owner: String,

        /// Upload size limit in bytes
        #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
        max_upload_bytes: usize,

        /// Front-end build to serve at `/`
        #[arg(long, value_name = "DIR")]
        static_dir: Option<PathBuf>,
    },

    /// Export a template JSON file
    Export {
        /// Template file written by the JSON exporter
        input: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "pdf")]
        format: FormatArg,

        /// Output path (defaults to the template's export file name)
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Directory to resolve `/api/uploads/...` backgrounds against
        #[arg(long, default_value = "uploads")]
        upload_dir: PathBuf,
    },

    /// List the page size table
    PageSizes,
}

fn main() {
    init_tracing();
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("template_composer=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_page_sizes(path: Option<&Path>) -> Result<PageSizeTable, ComposerError> {
    let mut table = PageSizeTable::builtin();
    if let Some(path) = path {
        let json = std::fs::read_to_string(path)?;
        table.extend_from_json(&json)?;
        tracing::info!(path = %path.display(), sizes = table.len(), "loaded page sizes");
    }
    Ok(table)
}

fn run() -> Result<(), ComposerError> {
    let cli = Cli::parse();
    let page_sizes = load_page_sizes(cli.page_sizes.as_deref())?;

    match cli.command {
        Commands::Serve {
            listen,
            upload_dir,
            store,
            data_dir,
            owner,
            max_upload_bytes,
            static_dir,
        } => {
            let config = ServerConfig {
                listen_addr: listen,
                upload_dir,
                owner_id: owner,
                max_upload_bytes,
                store: match store {
                    StoreArg::Memory => StoreKind::Memory,
                    StoreArg::Dir => StoreKind::Directory(data_dir),
                },
                page_sizes,
                static_dir,
            };
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(config))
        }

        Commands::Export {
            input,
            format,
            out,
            upload_dir,
        } => {
            let text = std::fs::read_to_string(&input)?;
            let template = import_json(&text)?;
            let images = UploadDirLoader::new(upload_dir);
            let ctx = ExportContext::new(&page_sizes, &images);
            let artifact = export::export(&template, format.into(), &ctx)?;

            let out = out.unwrap_or_else(|| PathBuf::from(&artifact.file_name));
            std::fs::write(&out, &artifact.bytes)?;
            println!("Wrote {} ({} bytes)", out.display(), artifact.bytes.len());
            Ok(())
        }

        Commands::PageSizes => {
            println!(
                "{:<10} {:<24} {:>8} {:>8}  {:<4} CANVAS (px)",
                "KEY", "LABEL", "WIDTH", "HEIGHT", "UNIT"
            );
            for size in page_sizes.iter() {
                let canvas = size.canvas_size();
                println!(
                    "{:<10} {:<24} {:>8} {:>8}  {:<4} {:.2} x {:.2}",
                    size.key,
                    size.label,
                    size.width,
                    size.height,
                    size.unit.as_str(),
                    canvas.width,
                    canvas.height
                );
            }
            Ok(())
        }
    }
}
