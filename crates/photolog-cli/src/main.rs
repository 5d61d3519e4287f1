mod logger;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use logger::CliLogger;
use photolog::PageGeometry;
use photolog::order::{apply_order, apply_renames, remove_photo, sort_by_name, sort_by_timestamp};
use photolog_async_runtime::{
    PhotoRecord, PhotologCommand, PhotologRequest, PhotologUpdate, WorkerHandle, spawn_worker,
};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "photolog", about = "Site photograph log generator", version)]
struct Cli {
    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only show errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the photos in a folder with their resolved metadata
    Scan {
        /// Folder containing the photos
        folder: PathBuf,

        /// Photo order
        #[arg(long, default_value = "name", value_enum)]
        sort: SortArg,
    },

    /// Generate photolog.pdf from a folder of photos
    Generate {
        /// Folder containing the photos
        folder: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Logo image drawn in every page header
        #[arg(long)]
        logo: Option<PathBuf>,

        /// Photo order
        #[arg(long, default_value = "name", value_enum)]
        sort: SortArg,

        /// Text file listing file names in the desired order, one per line
        #[arg(long)]
        order: Option<PathBuf>,

        /// File name to leave out (repeatable)
        #[arg(long)]
        exclude: Vec<String>,

        /// Rename photos on disk to "Photo N" after ordering
        #[arg(long, conflicts_with = "plan_only")]
        rename: bool,

        /// Page geometry JSON file
        #[arg(long)]
        geometry: Option<PathBuf>,

        /// Print the page plan only, don't generate the PDF
        #[arg(long)]
        plan_only: bool,
    },

    /// Write the default page geometry as JSON
    Geometry {
        /// Output JSON file
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Name,
    Time,
}

impl SortArg {
    fn apply(self, photos: &mut [PhotoRecord]) {
        match self {
            SortArg::Name => sort_by_name(photos),
            SortArg::Time => sort_by_timestamp(photos),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let logger = CliLogger::from_flags(cli.verbose, cli.quiet);
    let warnings = logger.clone();
    logger.init()?;

    match cli.command {
        Commands::Scan { folder, sort } => {
            let mut worker = spawn_worker();
            let mut photos = load_folder(&mut worker, &folder).await?;
            sort.apply(&mut photos);

            println!("{:<4} {:<32} {:<20} {:<14} Coordinates", "#", "File", "Captured", "Source");
            for (idx, photo) in photos.iter().enumerate() {
                println!(
                    "{:<4} {:<32} {:<20} {:<14} {}",
                    idx + 1,
                    photo.file_name(),
                    photo.captured_at.format("%Y-%m-%d %H:%M:%S"),
                    photo.timestamp_source.name(),
                    photo
                        .coordinates
                        .map(|c| c.label())
                        .unwrap_or_else(|| "-".to_string())
                );
            }
        }

        Commands::Generate {
            folder,
            output,
            logo,
            sort,
            order,
            exclude,
            rename,
            geometry,
            plan_only,
        } => {
            let geometry = match geometry {
                Some(path) => PageGeometry::load(&path)
                    .await
                    .with_context(|| format!("Cannot read geometry {}", path.display()))?,
                None => PageGeometry::default(),
            };
            geometry.validate()?;

            let mut worker = spawn_worker();
            let mut photos = load_folder(&mut worker, &folder).await?;
            sort.apply(&mut photos);

            if let Some(order_file) = order {
                let names = read_order_file(&order_file).await?;
                photos = apply_order(photos, &names[..])?;
            }
            for name in &exclude {
                if !remove_photo(&mut photos, &folder.join(name)) {
                    log::warn!("--exclude {} matched no photo", name);
                }
            }
            if photos.is_empty() {
                bail!("No photos left to lay out");
            }

            if rename {
                photos = apply_renames(photos).await?;
                log::info!("Renamed {} photos", photos.len());
            }

            if plan_only {
                let plans = photolog::plan(&photos, &geometry)?;
                println!("Layout Plan:");
                for page in &plans {
                    let names: Vec<String> = page
                        .slots
                        .iter()
                        .map(|slot| format!("{} ({})", slot.caption.text, slot.photo.file_name()))
                        .collect();
                    println!("  Page {}: {}", page.page_index + 1, names.join(", "));
                }
                return Ok(());
            }

            let mut request = PhotologRequest::new(&output).with_geometry(geometry);
            if let Some(logo) = logo {
                request = request.with_logo(logo);
            }

            let report = generate(&mut worker, photos, request).await?;
            println!(
                "Generated {} photos on {} pages → {}",
                report.photos,
                report.pages,
                report.output_path.display()
            );
            for path in &report.placeholders {
                println!("  Placeholder used for {}", path.display());
            }
            let count = warnings.warning_count();
            if count > 0 {
                println!("  {} warnings, rerun with -v for details", count);
            }
        }

        Commands::Geometry { output } => {
            PageGeometry::default().save(&output).await?;
            println!("Default geometry → {}", output.display());
        }
    }

    Ok(())
}

async fn load_folder(worker: &mut WorkerHandle, folder: &Path) -> Result<Vec<PhotoRecord>> {
    worker.send(PhotologCommand::LoadFolder {
        folder: folder.to_owned(),
    });
    match worker.next_update().await {
        Some(PhotologUpdate::PhotosLoaded { photos }) => Ok(photos),
        Some(PhotologUpdate::Error { message }) => bail!(message),
        Some(other) => bail!("Unexpected worker update: {:?}", other),
        None => bail!("Worker stopped unexpectedly"),
    }
}

async fn generate(
    worker: &mut WorkerHandle,
    photos: Vec<PhotoRecord>,
    request: PhotologRequest,
) -> Result<photolog::GenerationReport> {
    worker.send(PhotologCommand::Generate { photos, request });
    loop {
        match worker.next_update().await {
            Some(PhotologUpdate::Progress { percent }) => {
                eprint!("\rGenerating... {:>3.0}%", percent);
                let _ = std::io::stderr().flush();
            }
            Some(PhotologUpdate::Complete { report }) => {
                eprintln!();
                return Ok(report);
            }
            Some(PhotologUpdate::Error { message }) => {
                eprintln!();
                bail!(message);
            }
            Some(PhotologUpdate::PhotosLoaded { .. }) => {}
            None => bail!("Worker stopped unexpectedly"),
        }
    }
}

/// File names in order, skipping blank lines and `#` comments
async fn read_order_file(path: &Path) -> Result<Vec<String>> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Cannot read order file {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
