//! Shared query parameter types for API handlers.

use chrono::NaiveDate;
use serde::Deserialize;
use rollcall_core::access::parse_id_list;
use rollcall_core::assignment::DateRange;
use rollcall_core::error::CoreError;
use rollcall_core::types::DbId;

/// `?start=&end=&user_id=&user_ids=` used by assignment, log and report
/// reads. Both ends are inclusive.
#[derive(Debug, Deserialize)]
pub struct DateRangeParams {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub user_id: Option<DbId>,
    /// Comma-separated user ids.
    pub user_ids: Option<String>,
}

impl DateRangeParams {
    pub fn range(&self) -> Result<DateRange, CoreError> {
        DateRange::new(self.start, self.end)
    }

    /// The union of `user_id` and `user_ids`; empty when neither is given.
    pub fn requested_users(&self) -> Result<Vec<DbId>, CoreError> {
        let mut ids = parse_id_list(self.user_ids.as_deref())?;
        ids.extend(self.user_id);
        Ok(ids)
    }
}

/// `?status=` filter for workflow lists (devices, forms).
#[derive(Debug, Deserialize)]
pub struct StatusFilterParams {
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn params(start: &str, end: &str, user_id: Option<DbId>, user_ids: Option<&str>) -> DateRangeParams {
        DateRangeParams {
            start: start.parse().unwrap(),
            end: end.parse().unwrap(),
            user_id,
            user_ids: user_ids.map(str::to_string),
        }
    }

    #[test]
    fn requested_users_merges_both_forms() {
        let p = params("2024-06-01", "2024-06-07", Some(9), Some("1, 2"));
        assert_eq!(p.requested_users().unwrap(), vec![1, 2, 9]);
        assert!(params("2024-06-01", "2024-06-07", None, None)
            .requested_users()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn inverted_range_is_a_validation_error() {
        let p = params("2024-06-07", "2024-06-01", None, None);
        assert_matches!(p.range(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn malformed_id_list_is_rejected() {
        let p = params("2024-06-01", "2024-06-01", None, Some("1,abc"));
        assert_matches!(p.requested_users(), Err(CoreError::Validation(_)));
    }
}
