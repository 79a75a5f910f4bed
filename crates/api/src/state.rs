use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate, Utc};
use rollcall_core::attendance_rules::{offset_from_minutes, to_local};
use rollcall_core::error::CoreError;
use rollcall_core::holiday::HolidayCalendar;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: rollcall_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Holiday lookup used by the rule engine.
    pub holidays: Arc<dyn HolidayCalendar>,
    /// The organisation's local time offset.
    pub org_offset: FixedOffset,
}

impl AppState {
    pub fn new(
        pool: rollcall_db::DbPool,
        config: ServerConfig,
        holidays: Arc<dyn HolidayCalendar>,
    ) -> Result<Self, CoreError> {
        let org_offset = offset_from_minutes(config.org_utc_offset_minutes)?;
        Ok(Self {
            pool,
            config: Arc::new(config),
            holidays,
            org_offset,
        })
    }

    /// Today's calendar date in organisation local time.
    pub fn local_today(&self) -> NaiveDate {
        to_local(Utc::now(), self.org_offset).date()
    }
}
