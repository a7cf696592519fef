pub mod types;
pub mod vocab;
pub mod extractor;

pub use types::*;
pub use extractor::{parse, parse_at, FieldExtractor};
