//! Layout calculation for photo pages
//!
//! Turns an ordered photo sequence into page plans:
//! - Pagination (fixed slots per page, absolute photo numbering)
//! - Slot geometry (image, annotation box, caption, coordinates, note fields)
//! - Header placement (title and logo box)

mod planner;
mod types;

pub use planner::*;
pub use types::*;
