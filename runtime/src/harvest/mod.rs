//! Size-capped aggregation of a page with its stylesheets and scripts.

pub mod aggregator;
pub mod bundle;

pub use aggregator::{validate_url, Aggregator, PhaseEnd};
pub use bundle::{CssFile, JsFile, ResultBundle};
