//! Writes and reads for the analysis task queue.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use pulse_core::errors::PulseResult;
use pulse_core::models::AnalysisTask;

use crate::to_storage_err;

/// Enqueue one analysis task. The task_id is unique, so retried enqueues
/// of the same task never duplicate.
pub fn enqueue_task(conn: &Connection, task: &AnalysisTask, now: DateTime<Utc>) -> PulseResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO analysis_queue
             (task_id, kind, publication_id, content_id, measure_point, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            task.task_id,
            task.kind.as_str(),
            task.publication_id,
            task.content_id,
            task.point.label(),
            now.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Number of pending tasks of one kind (job reporting and tests).
pub fn pending_count(conn: &Connection, kind: &str) -> PulseResult<u64> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM analysis_queue WHERE kind = ?1 AND status = 'pending'",
            params![kind],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count as u64)
}
