//! Record layer: inspect job-report records against a compiled spec.
//!
//! A record is kept as a `serde_json::Value`. Only the parts the matcher needs
//! are validated:
//!
//! ```text
//! {
//!   "steps": [
//!     { "name": "cmsRun1", "output": [ { "dataset": "MC_...", "lfn": ["/a", "/b"] } ] },
//!     { "name": "stageOut1", ... }
//!   ],
//!   ...
//! }
//! ```

pub mod matcher;
pub mod value;

pub use matcher::{STEP_PREFIX, matches};
pub use value::stringify;
