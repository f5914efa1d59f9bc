//! Field extraction from report text.

mod engine;
pub mod row;
mod scanner;

pub use engine::{run, ExtractionEngine, ExtractionReport};
pub use row::{extract_value, normalize_number, RowExtractor};
pub use scanner::scan_field;
