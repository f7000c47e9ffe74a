use crate::core::aggregator::ErrorAggregator;
use crate::domain::model::SeatMap;
use crate::domain::ports::SeatStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Replaced { rows: usize },
    /// Nothing was scraped; the table was left as it was.
    Skipped,
    /// Nothing was scraped although every request succeeded; the table was
    /// left as it was and the run is reported as failed.
    EmptySnapshot,
    DeleteFailed,
    InsertFailed,
}

/// Replaces the table contents with `seats`: delete every row, then insert
/// the snapshot. Store failures are recorded, never returned.
pub async fn reconcile<S: SeatStore + ?Sized>(
    store: &S,
    table: &str,
    seats: &SeatMap,
    errors: &mut ErrorAggregator,
) -> ReconcileOutcome {
    if seats.is_empty() {
        // 沒有任何請求失敗卻抓不到資料，多半是換學期或頁面結構改了
        if !errors.has_errors() {
            tracing::error!(
                "Scrape succeeded but found no sections, leaving table `{}` untouched",
                table
            );
            errors.store_error(format!(
                "No seat data scraped; table `{}` still holds the previous snapshot",
                table
            ));
            return ReconcileOutcome::EmptySnapshot;
        }
        tracing::warn!("No seat data scraped, leaving table `{}` untouched", table);
        return ReconcileOutcome::Skipped;
    }

    tracing::info!("Deleting all rows from table `{}`", table);
    if let Err(e) = store.delete_all(table).await {
        tracing::error!("Delete failed, not inserting: {}", e);
        errors.store_error(e.to_string());
        return ReconcileOutcome::DeleteFailed;
    }

    let rows = seats.to_rows();
    tracing::info!("Uploading {} rows to table `{}`", rows.len(), table);
    if let Err(e) = store.bulk_insert(table, &rows).await {
        tracing::error!("Bulk insert failed: {}", e);
        errors.store_error(e.to_string());
        return ReconcileOutcome::InsertFailed;
    }

    ReconcileOutcome::Replaced { rows: rows.len() }
}
