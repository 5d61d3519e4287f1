use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhotologError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("No photos provided")]
    NoPhotos,
    #[error("No pages to lay out")]
    NoPages,
    #[error("Logo file not found: {}", .0.display())]
    LogoNotFound(PathBuf),
    #[error("Photo folder not found: {}", .0.display())]
    FolderNotFound(PathBuf),
    #[error("Cannot prepare output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid page geometry: {0}")]
    Geometry(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Cannot compress {}: {message}", path.display())]
    ImageCompression { path: PathBuf, message: String },
    #[error("Photo not in the current selection: {0}")]
    UnknownPhoto(String),

    #[error("Rename target already exists: {}", .0.display())]
    RenameConflict(PathBuf),
}

pub type Result<T> = std::result::Result<T, PhotologError>;

/// A capture position in signed decimal degrees (south and west negative).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Presentation form, rounded to six decimal places.
    pub fn label(&self) -> String {
        format!("{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Which source supplied a photo's capture time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimestampSource {
    /// Embedded "original capture time" tag
    CaptureTag,
    /// Embedded generic timestamp tag
    GenericTag,
    /// Filesystem modification time
    FileModified,
}

impl TimestampSource {
    pub fn name(self) -> &'static str {
        match self {
            TimestampSource::CaptureTag => "capture tag",
            TimestampSource::GenericTag => "generic tag",
            TimestampSource::FileModified => "file modified",
        }
    }
}

/// One discovered photo, flowing once through planning and emission.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhotoRecord {
    pub path: PathBuf,
    pub captured_at: NaiveDateTime,
    pub coordinates: Option<Coordinates>,
    pub timestamp_source: TimestampSource,
}

impl PhotoRecord {
    pub fn new(path: impl Into<PathBuf>, captured_at: NaiveDateTime) -> Self {
        Self {
            path: path.into(),
            captured_at,
            coordinates: None,
            timestamp_source: TimestampSource::FileModified,
        }
    }

    pub fn with_coordinates(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    /// File name as displayed to the user (lossy for non-UTF-8 names)
    pub fn file_name(&self) -> String {
        file_name_of(&self.path)
    }
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
