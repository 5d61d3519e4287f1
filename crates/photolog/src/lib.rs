pub mod constants;
pub mod emit;
mod generate;
pub mod geo;
pub mod layout;
pub mod metadata;
mod options;
pub mod order;
pub mod render;
pub mod scan;
mod types;

pub use emit::{EmitReport, ProgressSink, emit};
pub use generate::{
    GenerationReport, PhotologRequest, check_preconditions, create_photolog, generate,
};
pub use geo::{Ratio, to_decimal_degrees};
pub use layout::{PagePlan, PageSlot, plan};
pub use metadata::{EmbeddedStatus, ResolvedMetadata, resolve};
pub use options::*;
pub use scan::{discover_photos, load_photos};
pub use types::*;
