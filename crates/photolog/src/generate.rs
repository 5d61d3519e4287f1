use crate::constants::OUTPUT_FILE_NAME;
use crate::emit::{ProgressSink, emit};
use crate::layout::plan;
use crate::options::{CompressionOptions, PageGeometry};
use crate::render::{ImageCompressor, JpegCompressor, PdfSurface};
use crate::types::{PhotoRecord, PhotologError, Result};
use std::path::{Path, PathBuf};

/// Where and how to generate a photolog
#[derive(Debug, Clone, PartialEq)]
pub struct PhotologRequest {
    /// Directory receiving `photolog.pdf`; created if missing
    pub output_dir: PathBuf,
    /// Logo drawn in every page header
    pub logo: Option<PathBuf>,
    pub geometry: PageGeometry,
    pub compression: CompressionOptions,
}

impl PhotologRequest {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            logo: None,
            geometry: PageGeometry::default(),
            compression: CompressionOptions::default(),
        }
    }

    pub fn with_logo(mut self, logo: impl Into<PathBuf>) -> Self {
        self.logo = Some(logo.into());
        self
    }

    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Full path of the document this request produces
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(OUTPUT_FILE_NAME)
    }
}

/// Summary of a finished generation run
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    pub output_path: PathBuf,
    pub pages: usize,
    pub photos: usize,
    /// Photos that could not be embedded and were drawn as placeholders
    pub placeholders: Vec<PathBuf>,
}

/// Generate the photolog document for `photos` in the given order.
///
/// Preconditions (photos present, valid geometry, logo present, output
/// directory usable) are checked before anything is drawn. Progress is
/// reported from the blocking worker thread.
pub async fn create_photolog<P>(
    photos: &[PhotoRecord],
    request: &PhotologRequest,
    mut progress: P,
) -> Result<GenerationReport>
where
    P: FnMut(f32) + Send + 'static,
{
    let photos = photos.to_vec();
    let request = request.clone();

    // Image re-encoding and PDF assembly are CPU-bound, spawn blocking
    tokio::task::spawn_blocking(move || generate(&photos, &request, &mut progress)).await?
}

/// Blocking form of [`create_photolog`]
pub fn generate<P: ProgressSink + ?Sized>(
    photos: &[PhotoRecord],
    request: &PhotologRequest,
    progress: &mut P,
) -> Result<GenerationReport> {
    check_preconditions(photos, request)?;

    let compressor = JpegCompressor::new(request.compression);
    let logo = match &request.logo {
        Some(path) => Some(compressor.compress(path)?),
        None => None,
    };

    let plans = plan(photos, &request.geometry)?;
    let output_path = request.output_path();
    let mut surface = PdfSurface::new(
        &output_path,
        request.geometry.page_width,
        request.geometry.page_height,
    );

    log::info!(
        "Generating {} pages for {} photos",
        plans.len(),
        photos.len()
    );
    let report = emit(&plans, logo.as_ref(), &compressor, &mut surface, progress)?;

    Ok(GenerationReport {
        output_path,
        pages: report.pages,
        photos: report.photos,
        placeholders: report.placeholders,
    })
}

/// Check everything that can be known to fail before drawing starts.
pub fn check_preconditions(photos: &[PhotoRecord], request: &PhotologRequest) -> Result<()> {
    if photos.is_empty() {
        return Err(PhotologError::NoPhotos);
    }

    request.geometry.validate()?;

    if let Some(logo) = &request.logo {
        if !logo.is_file() {
            return Err(PhotologError::LogoNotFound(logo.clone()));
        }
    }

    prepare_output_dir(&request.output_dir)
}

fn prepare_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|source| PhotologError::OutputDir {
        path: dir.to_owned(),
        source,
    })?;

    let metadata = std::fs::metadata(dir).map_err(|source| PhotologError::OutputDir {
        path: dir.to_owned(),
        source,
    })?;
    if metadata.permissions().readonly() {
        return Err(PhotologError::OutputDir {
            path: dir.to_owned(),
            source: std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "directory is read-only",
            ),
        });
    }
    Ok(())
}
