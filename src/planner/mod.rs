pub mod types;
pub mod selector;

pub use types::*;
pub use selector::select_next;
