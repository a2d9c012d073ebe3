//! Playtime command handlers.
//!
//! - `PlaytimeFetcher` - Concurrent provider lookups with per-player isolation
//! - `ReconcilePlaytimeHandler` - Force-refresh / fetch-unknown-only reconciliation
//! - `RecordModerationPlaytimeHandler` - Moderation-platform pushes

mod fetch_playtime;
mod reconcile_playtime;
mod record_moderation_playtime;

pub use fetch_playtime::{FetcherConfig, PlaytimeFetcher};
pub use reconcile_playtime::{ReconcilePlaytimeCommand, ReconcilePlaytimeHandler, ReconcilePolicy};
pub use record_moderation_playtime::{
    RecordModerationPlaytimeCommand, RecordModerationPlaytimeHandler,
};
