//! Query-side logic: synonym expansion and the hybrid search cascade.

pub mod expand;
pub mod hybrid;

pub use expand::SynonymExpander;
pub use hybrid::{HybridSearch, SearchOutcome};
