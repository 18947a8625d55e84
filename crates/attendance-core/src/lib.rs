//! Attendance scoring engine.
//!
//! Turns arrival timestamps into per-session percentages, aggregates them into
//! an event-level cumulative score under an optional weekly quota, supports
//! incremental updates of cached cumulative state, and honors administrative
//! skip overrides. Every operation is pure over its inputs; persistence and
//! authorization belong to the caller.

pub mod aggregate;
pub mod domain;
pub mod evaluation;
pub mod metrics;
pub mod obs;
pub mod policy;
pub mod scoring;
pub mod settings;
pub mod snapshot;
pub mod telemetry;

pub use domain::{
    clamp_percentage, AggregationMode, ArrivalEvent, AttendanceError, CumulativeScore,
    EventAggregationConfig, EventId, Result, ScoreSource, SessionId, SessionScore, SessionWindow,
    SkipOverride, SkipOverrides, UserId, WeightedSessionResult, FULL_CREDIT,
};

pub use aggregate::{aggregate, delta, earned_minutes, percentage_of};
pub use evaluation::{
    evaluate_event, latest_records, AttendanceRecord, EventReport, ScheduledSession,
    SessionOutcome, UserStanding,
};
pub use policy::resolve_cumulative;
pub use scoring::{score, score_weighted};
pub use snapshot::{refresh_cumulative, CumulativeSnapshot, RecomputeReason};

pub use metrics::METRICS;
pub use obs::EvaluationSpan;
pub use settings::{EngineSettings, LoggingSettings, CONFIG_ENV_VAR};
pub use telemetry::{init_from_settings, init_tracing};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
