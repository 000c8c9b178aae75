use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use filepane::commands::file_commands;
use filepane::models::operation::BatchReport;
use filepane::services::launcher::SystemLauncher;
use filepane::services::listing_service::{self, format_size};
use filepane::{Config, Session};

#[derive(Debug, Parser)]
#[command(name = "filepane", version, about = "Browse and manage files from the terminal")]
struct Cli {
    /// Path to a JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List a directory, folders first
    Ls {
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Only show entries whose name contains this text
        #[arg(long)]
        filter: Option<String>,
    },
    /// Render a thumbnail to a PNG file
    Thumb {
        path: PathBuf,
        #[arg(long)]
        size: Option<u32>,
        #[arg(long, short)]
        out: PathBuf,
    },
    /// Create a folder
    Mkdir { parent: PathBuf, name: String },
    /// Rename an entry within its folder
    Rename { path: PathBuf, new_name: String },
    /// Copy entries into a folder
    Cp {
        #[arg(required = true)]
        sources: Vec<PathBuf>,
        #[arg(long, short)]
        to: PathBuf,
    },
    /// Move entries into a folder
    Mv {
        #[arg(required = true)]
        sources: Vec<PathBuf>,
        #[arg(long, short)]
        to: PathBuf,
    },
    /// Delete entries (to the trash unless --permanent)
    Rm {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        #[arg(long)]
        permanent: bool,
    },
    /// Open with the default application, or list a folder
    Open { path: PathBuf },
    /// Show a text or image preview
    Preview { path: PathBuf },
    /// Show entry properties
    Info { path: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("loading config")?;
    filepane::init_logging(&config);

    match cli.command {
        Command::Ls { path, filter } => {
            let session = Session::new(&path, config)?;
            let entries = match filter {
                Some(q) => file_commands::search(&session, &q)?,
                None => file_commands::refresh(&session)?,
            };
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for entry in &entries {
                    let size = entry.size_bytes.map(format_size).unwrap_or_default();
                    println!("{:<8} {:>12}  {}", entry.kind_label(), size, entry.name);
                }
                let summary = listing_service::summarize(&entries);
                println!("{} folders | {} files", summary.folders, summary.files);
            }
        }
        Command::Thumb { path, size, out } => {
            let mut session = Session::new(&parent_dir(&path), config)?;
            let thumb = file_commands::thumbnail(&mut session, &path, size);
            let bitmap = thumb.bitmap();
            image::RgbaImage::from_raw(bitmap.width, bitmap.height, bitmap.pixels.clone())
                .context("thumbnail buffer has wrong length")?
                .save(&out)
                .with_context(|| format!("writing {}", out.display()))?;
            println!(
                "{} {}x{}{}",
                out.display(),
                bitmap.width,
                bitmap.height,
                if thumb.is_placeholder() { " (placeholder)" } else { "" }
            );
        }
        Command::Mkdir { parent, name } => {
            let mut session = Session::new(&parent, config)?;
            let record = file_commands::create_folder(&mut session, &name)?;
            print_json_or(cli.json, &record, || println!("created {}", record.source.display()))?;
        }
        Command::Rename { path, new_name } => {
            let mut session = Session::new(&parent_dir(&path), config)?;
            let record = file_commands::rename_item(&mut session, &path, &new_name)?;
            print_json_or(cli.json, &record, || {
                if let Some(dest) = &record.destination {
                    println!("renamed to {}", dest.display());
                }
            })?;
        }
        Command::Cp { sources, to } => {
            let mut session = Session::new(&to, config)?;
            session.copy(sources);
            finish_batch(cli.json, file_commands::paste(&mut session)?)?;
        }
        Command::Mv { sources, to } => {
            let mut session = Session::new(&to, config)?;
            session.cut(sources);
            finish_batch(cli.json, file_commands::paste(&mut session)?)?;
        }
        Command::Rm { paths, permanent } => {
            let mut session = Session::new(Path::new("."), config)?;
            let report = file_commands::delete_items(&mut session, &paths, permanent);
            finish_batch(cli.json, report)?;
        }
        Command::Open { path } => {
            let mut session = Session::new(&parent_dir(&path), config)?;
            let outcome = file_commands::open_entry(&mut session, &path, &SystemLauncher)?;
            print_json_or(cli.json, &outcome, || println!("{outcome:?}"))?;
        }
        Command::Preview { path } => {
            let session = Session::new(&parent_dir(&path), config)?;
            let preview = file_commands::preview(&session, &path);
            println!("{}", serde_json::to_string_pretty(&preview)?);
        }
        Command::Info { path } => {
            let props = file_commands::properties(&path)?;
            print_json_or(cli.json, &props, || {
                println!("Name:     {}", props.name);
                println!("Path:     {}", props.path.display());
                println!("Size:     {}", props.size_display);
                println!("Type:     {}", props.kind.label());
                println!("Modified: {}", props.modified_at.as_deref().unwrap_or("-"));
            })?;
        }
    }
    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn print_json_or<T: serde::Serialize>(json: bool, value: &T, text: impl FnOnce()) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        text();
    }
    Ok(())
}

fn finish_batch(json: bool, report: BatchReport) -> Result<()> {
    print_json_or(json, &report, || {
        for record in &report.completed {
            println!("{} {}", record.operation_type, record.source.display());
        }
        for failed in &report.failed {
            eprintln!("failed {}: {}", failed.path.display(), failed.error);
        }
    })?;
    if !report.is_success() {
        let total = report.failed.len() + report.completed.len();
        anyhow::bail!("{} of {total} items failed", report.failed.len());
    }
    Ok(())
}
