//! Bulk assignment writes.
//!
//! Every item is first checked against the caller's scope, the directory
//! and the shift catalog. The valid items are then de-duplicated on
//! `(user, date)` (last occurrence wins), so no key is written twice
//! concurrently, and written with bounded concurrency. A bad item never
//! aborts the batch.

use std::collections::HashSet;

use futures::stream::{self, StreamExt};
use rollcall_core::access::AccessScope;
use rollcall_core::assignment::{dedupe_last_wins, validate_batch_size, AssignmentItem, BulkReport};
use rollcall_core::types::DbId;
use rollcall_db::models::assignment::UpsertAssignment;
use rollcall_db::repositories::{AssignmentRepo, ShiftRepo, UserRepo};
use rollcall_db::DbPool;

use crate::error::AppResult;

/// One requested write plus its per-item options.
#[derive(Debug, Clone, Copy)]
pub struct PlannedAssignment {
    pub item: AssignmentItem,
    pub flexible: bool,
}

/// Batch-wide options.
#[derive(Debug, Clone)]
pub struct BulkOptions {
    pub mode: Option<String>,
    pub created_by: DbId,
    pub concurrency: usize,
}

/// Apply a batch of assignment writes and report per-item outcomes.
pub async fn run_bulk(
    pool: &DbPool,
    scope: &AccessScope,
    planned: &[PlannedAssignment],
    options: &BulkOptions,
) -> AppResult<BulkReport> {
    validate_batch_size(planned.len())?;

    let items: Vec<AssignmentItem> = planned.iter().map(|p| p.item).collect();
    let user_ids = unique(items.iter().map(|i| i.user_id));
    let shift_ids = unique(items.iter().map(|i| i.shift_id));
    let known_users: HashSet<DbId> = UserRepo::existing_ids(pool, &user_ids)
        .await?
        .into_iter()
        .collect();
    let known_shifts: HashSet<DbId> = ShiftRepo::existing_ids(pool, &shift_ids)
        .await?
        .into_iter()
        .collect();

    let mut report = BulkReport::default();
    let mut accepted: Vec<usize> = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        if !scope.permits(item.user_id) {
            report.record_failure(index, item, format!("User {} is outside your access scope", item.user_id));
        } else if !known_users.contains(&item.user_id) {
            report.record_failure(index, item, format!("User {} not found", item.user_id));
        } else if !known_shifts.contains(&item.shift_id) {
            report.record_failure(index, item, format!("Shift {} not found", item.shift_id));
        } else {
            accepted.push(index);
        }
    }

    // Only accepted items compete for a key.
    let candidates: Vec<AssignmentItem> = accepted.iter().map(|&i| items[i]).collect();
    let winners = dedupe_last_wins(&candidates);
    report.superseded = candidates.len() - winners.len();

    let writes: Vec<_> = winners
        .into_iter()
        .map(|(pos, item)| {
            let index = accepted[pos];
            (index, item, planned[index].flexible)
        })
        .collect();

    let outcomes: Vec<_> = stream::iter(writes)
        .map(|(index, item, flexible)| {
            let input = UpsertAssignment {
                user_id: item.user_id,
                shift_id: item.shift_id,
                work_date: item.date,
                flexible,
                mode: options.mode.clone(),
                created_by: Some(options.created_by),
            };
            async move { (index, item, AssignmentRepo::upsert(pool, &input).await) }
        })
        .buffer_unordered(options.concurrency.max(1))
        .collect()
        .await;

    for (index, item, outcome) in outcomes {
        match outcome {
            Ok(Some(_)) => report.applied += 1,
            // Deleted between the catalog check and the write.
            Ok(None) => report.record_failure(index, &item, format!("Shift {} not found", item.shift_id)),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    index,
                    user_id = item.user_id,
                    date = %item.date,
                    "Assignment write failed"
                );
                report.record_failure(index, &item, "Failed to save assignment");
            }
        }
    }

    let report = report.finish();
    tracing::info!(
        applied = report.applied,
        superseded = report.superseded,
        failed = report.failed.len(),
        created_by = options.created_by,
        "Bulk assignment applied"
    );
    Ok(report)
}

fn unique(ids: impl Iterator<Item = DbId>) -> Vec<DbId> {
    let mut v: Vec<DbId> = ids.collect();
    v.sort_unstable();
    v.dedup();
    v
}
