use crate::constants::*;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fixed page layout constants, all in points
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PageGeometry {
    // Sheet
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,

    // Photo slots
    pub photo_width: f32,
    pub photo_height: f32,
    pub annotation_height: f32,
    pub slot_gap: f32,
    pub slots_per_page: usize,

    // Header
    pub header_allowance: f32,
    pub header_title: String,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            page_width: DEFAULT_PAGE_WIDTH_PT,
            page_height: DEFAULT_PAGE_HEIGHT_PT,
            margin: DEFAULT_MARGIN_PT,
            photo_width: DEFAULT_PHOTO_WIDTH_PT,
            photo_height: DEFAULT_PHOTO_HEIGHT_PT,
            annotation_height: DEFAULT_ANNOTATION_HEIGHT_PT,
            slot_gap: DEFAULT_SLOT_GAP_PT,
            slots_per_page: DEFAULT_SLOTS_PER_PAGE,
            header_allowance: DEFAULT_HEADER_ALLOWANCE_PT,
            header_title: DEFAULT_HEADER_TITLE.to_string(),
        }
    }
}

impl PageGeometry {
    /// Vertical advance from one slot to the next on the same page
    pub fn slot_height(&self) -> f32 {
        self.photo_height + self.annotation_height + self.slot_gap
    }

    /// Y coordinate of the top edge of the first slot on every page
    pub fn content_top(&self) -> f32 {
        self.page_height - self.margin - self.header_allowance
    }

    /// Height occupied by a full page of slots
    pub fn content_height(&self) -> f32 {
        let slots = self.slots_per_page as f32;
        slots * (self.photo_height + self.annotation_height)
            + (slots - 1.0).max(0.0) * self.slot_gap
    }

    /// Height available between the header allowance and the bottom margin
    pub fn available_height(&self) -> f32 {
        self.page_height - 2.0 * self.margin - self.header_allowance
    }

    /// Load geometry from a JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let geometry = serde_json::from_slice(&bytes)
            .map_err(|e| PhotologError::Config(format!("Failed to parse geometry: {}", e)))?;
        Ok(geometry)
    }

    /// Save geometry to a JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PhotologError::Config(format!("Failed to serialize geometry: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the layout constraints. Checked once before planning.
    pub fn validate(&self) -> Result<()> {
        let dimensions = [
            ("page_width", self.page_width),
            ("page_height", self.page_height),
            ("photo_width", self.photo_width),
            ("photo_height", self.photo_height),
            ("annotation_height", self.annotation_height),
        ];
        for (name, value) in dimensions {
            if !value.is_finite() || value <= 0.0 {
                return Err(PhotologError::Geometry(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        let offsets = [
            ("margin", self.margin),
            ("slot_gap", self.slot_gap),
            ("header_allowance", self.header_allowance),
        ];
        for (name, value) in offsets {
            if !value.is_finite() || value < 0.0 {
                return Err(PhotologError::Geometry(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }

        if self.slots_per_page == 0 {
            return Err(PhotologError::Geometry(
                "At least one slot per page is required".to_string(),
            ));
        }

        if self.photo_width > self.page_width - 2.0 * self.margin {
            return Err(PhotologError::Geometry(format!(
                "Photo width {}pt does not fit between the margins ({}pt available)",
                self.photo_width,
                self.page_width - 2.0 * self.margin
            )));
        }

        if self.annotation_height < NOTE_FIELD_OFFSETS[0] + NOTE_FIELD_HEIGHT {
            return Err(PhotologError::Geometry(format!(
                "Annotation box must be at least {}pt tall to hold both note fields",
                NOTE_FIELD_OFFSETS[0] + NOTE_FIELD_HEIGHT
            )));
        }

        if self.content_height() > self.available_height() {
            return Err(PhotologError::Geometry(format!(
                "{} slots need {}pt but only {}pt fit below the header",
                self.slots_per_page,
                self.content_height(),
                self.available_height()
            )));
        }

        Ok(())
    }
}

/// How photos are re-encoded before embedding
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompressionOptions {
    /// Bounding box the image is shrunk to fit (never enlarged)
    pub max_width: u32,
    pub max_height: u32,
    /// JPEG quality, 1-100
    pub quality: u8,
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_IMAGE_WIDTH,
            max_height: DEFAULT_MAX_IMAGE_HEIGHT,
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}
