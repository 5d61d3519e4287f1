//! Capture time and location resolution
//!
//! Each photo gets a timestamp from the first tier that yields one:
//! 1. the embedded original-capture tag
//! 2. the embedded generic timestamp tag
//! 3. the file's modification time
//!
//! Embedded metadata is only consulted for formats that reliably carry it.
//! A block that fails to parse, or a tag that fails to parse, is logged and
//! the next tier is used instead.

use crate::geo::{Ratio, to_decimal_degrees};
use crate::types::{Coordinates, PhotoRecord, Result, TimestampSource};
use chrono::{DateTime, Local, NaiveDateTime};
use exif::{Exif, In, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Extensions whose embedded tags are read (lowercase, without the dot)
pub const EMBEDDED_METADATA_EXTENSIONS: &[&str] = &["jpg", "jpeg", "tif", "tiff"];

/// Timestamp pattern shared by both embedded time tags
pub const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// What happened when embedded metadata was consulted
#[derive(Debug, Clone, PartialEq)]
pub enum EmbeddedStatus {
    /// The format is not on the allow-list; tags were never read
    NotSupported,
    /// The tag block was read (individual tags may still be missing)
    Read,
    /// The tag block could not be read; the filesystem fallback was used
    Unreadable(String),
}

/// Outcome of resolving one file, tagged with the tier that fired
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMetadata {
    pub captured_at: NaiveDateTime,
    pub timestamp_source: TimestampSource,
    pub coordinates: Option<Coordinates>,
    pub embedded: EmbeddedStatus,
}

impl ResolvedMetadata {
    pub fn into_record(self, path: impl Into<std::path::PathBuf>) -> PhotoRecord {
        PhotoRecord {
            path: path.into(),
            captured_at: self.captured_at,
            coordinates: self.coordinates,
            timestamp_source: self.timestamp_source,
        }
    }
}

/// Tags pulled out of an embedded block, before fallback is applied
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddedTags {
    pub capture_time: Option<NaiveDateTime>,
    pub generic_time: Option<NaiveDateTime>,
    pub coordinates: Option<Coordinates>,
}

/// Resolve capture time and coordinates for a file.
///
/// Only the modification-time fallback can fail, and only when the file
/// itself cannot be stat'ed.
pub fn resolve(path: impl AsRef<Path>) -> Result<ResolvedMetadata> {
    let path = path.as_ref();

    let (tags, embedded) = if supports_embedded_metadata(path) {
        match read_embedded(path) {
            Ok(tags) => (tags, EmbeddedStatus::Read),
            Err(message) => {
                log::warn!("EXIF read failed for {}: {}", path.display(), message);
                (EmbeddedTags::default(), EmbeddedStatus::Unreadable(message))
            }
        }
    } else {
        (EmbeddedTags::default(), EmbeddedStatus::NotSupported)
    };

    let (captured_at, timestamp_source) = match (tags.capture_time, tags.generic_time) {
        (Some(time), _) => (time, TimestampSource::CaptureTag),
        (None, Some(time)) => (time, TimestampSource::GenericTag),
        (None, None) => (modified_time(path)?, TimestampSource::FileModified),
    };

    Ok(ResolvedMetadata {
        captured_at,
        timestamp_source,
        coordinates: tags.coordinates,
        embedded,
    })
}

impl PhotoRecord {
    /// Build a record for `path` by resolving its metadata.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        Ok(resolve(path)?.into_record(path))
    }
}

/// Whether the extension is on the embedded-metadata allow-list
pub fn supports_embedded_metadata(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            EMBEDDED_METADATA_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Filesystem modification time in local wall-clock time
pub fn modified_time(path: &Path) -> Result<NaiveDateTime> {
    let modified = std::fs::metadata(path)?.modified()?;
    Ok(DateTime::<Local>::from(modified).naive_local())
}

fn read_embedded(path: &Path) -> std::result::Result<EmbeddedTags, String> {
    let file = File::open(path).map_err(|e| e.to_string())?;
    let mut reader = BufReader::new(file);
    let exif = exif::Reader::new()
        .read_from_container(&mut reader)
        .map_err(|e| e.to_string())?;
    Ok(extract_tags(&exif, path))
}

/// Interpret an already-parsed EXIF block.
pub fn extract_tags(exif: &Exif, path: &Path) -> EmbeddedTags {
    EmbeddedTags {
        capture_time: time_tag(exif, Tag::DateTimeOriginal, path),
        generic_time: time_tag(exif, Tag::DateTime, path),
        coordinates: gps_coordinates(exif, path),
    }
}

fn time_tag(exif: &Exif, tag: Tag, path: &Path) -> Option<NaiveDateTime> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    let raw = ascii_value(&field.value)?;
    match parse_exif_datetime(&raw) {
        Some(time) => Some(time),
        None => {
            log::warn!(
                "Ignoring unparseable {} {:?} in {}",
                tag,
                raw,
                path.display()
            );
            None
        }
    }
}

/// Parse a `YYYY:MM:DD HH:MM:SS` timestamp, tolerating padding and quotes
pub fn parse_exif_datetime(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim().trim_matches(|c| c == '"' || c == '\0').trim();
    NaiveDateTime::parse_from_str(trimmed, EXIF_DATETIME_FORMAT).ok()
}

fn gps_coordinates(exif: &Exif, path: &Path) -> Option<Coordinates> {
    // All four tags must be present; a partial set means no coordinates.
    let lat = exif.get_field(Tag::GPSLatitude, In::PRIMARY)?;
    let lat_ref = exif.get_field(Tag::GPSLatitudeRef, In::PRIMARY)?;
    let lon = exif.get_field(Tag::GPSLongitude, In::PRIMARY)?;
    let lon_ref = exif.get_field(Tag::GPSLongitudeRef, In::PRIMARY)?;

    let latitude = axis_degrees(&lat.value, &lat_ref.value);
    let longitude = axis_degrees(&lon.value, &lon_ref.value);

    match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
        _ => {
            log::warn!("Ignoring malformed GPS tags in {}", path.display());
            None
        }
    }
}

fn axis_degrees(value: &Value, reference: &Value) -> Option<f64> {
    let dms = match value {
        Value::Rational(parts) if parts.len() >= 3 => [
            Ratio::new(parts[0].num, parts[0].denom),
            Ratio::new(parts[1].num, parts[1].denom),
            Ratio::new(parts[2].num, parts[2].denom),
        ],
        _ => return None,
    };
    let hemisphere = ascii_value(reference)?.trim().chars().next()?;
    let degrees = to_decimal_degrees(dms[0], dms[1], dms[2], hemisphere);
    degrees.is_finite().then_some(degrees)
}

fn ascii_value(value: &Value) -> Option<String> {
    match value {
        Value::Ascii(parts) => parts
            .first()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}
