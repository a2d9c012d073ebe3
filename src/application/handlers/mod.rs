//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod playtime;

pub use playtime::{
    FetcherConfig, PlaytimeFetcher, ReconcilePlaytimeCommand, ReconcilePlaytimeHandler,
    ReconcilePolicy, RecordModerationPlaytimeCommand, RecordModerationPlaytimeHandler,
};
