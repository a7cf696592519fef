pub mod id;
pub mod types;
pub mod lookup;
pub mod summary;

pub use types::*;
pub use summary::{format_brl, ProjectSummary, SummaryScope};
