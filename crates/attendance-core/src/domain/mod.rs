//! Domain model for attendance scoring.
//!
//! Canonical definitions for the values the engine consumes and produces:
//! - `SessionWindow` / `ArrivalEvent`: scoring inputs
//! - `SessionScore` / `WeightedSessionResult` / `CumulativeScore`: results
//! - `EventAggregationConfig`: per-event weighting policy
//! - `SkipOverride`: administrative full-credit grant

pub mod config;
pub mod digest;
pub mod error;
pub mod ids;
pub mod score;
pub mod session;
pub mod skip;

pub use config::{AggregationMode, EventAggregationConfig};
pub use digest::{canonical_json, compute_digest};
pub use error::{AttendanceError, Result};
pub use ids::{EventId, SessionId, UserId};
pub use score::{
    clamp_percentage, CumulativeScore, ScoreSource, SessionScore, WeightedSessionResult,
    FULL_CREDIT,
};
pub use session::{ArrivalEvent, SessionWindow};
pub use skip::{SkipOverride, SkipOverrides};
