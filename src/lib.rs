//! Record finder: select job-report records whose `cmsRun` step outputs match
//! a field spec, as a mapper/reducer pair for an external map-reduce runtime.

pub mod error;
pub mod job;
pub mod output;
pub mod record;
pub mod shard;
pub mod spec;

pub type Result<T> = anyhow::Result<T>;

pub use error::FinderError;
pub use job::{JobConfig, RecordFinder, Summary};
pub use spec::{CompiledSpec, MatcherValue};
