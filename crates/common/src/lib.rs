pub mod commodity;
pub mod config;
pub mod error;
pub mod report_store;
pub mod source;

pub use commodity::Commodity;
pub use config::{Config, MAX_HOURS_BACK, FetchConfig, ScheduleConfig, ScoringConfig};
pub use error::{IntelError, IntelResult};
pub use report_store::ReportStore;
pub use source::{HeadlineSource, RawHeadline, SourceBatch, SourceFetch, SourceManager, SourceOutcome};
