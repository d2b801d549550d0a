//! v004: analysis_queue — the outbound surface toward the analysis layer.

use rusqlite::Connection;

use pulse_core::errors::PulseResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> PulseResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS analysis_queue (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            task_id        TEXT NOT NULL UNIQUE,
            kind           TEXT NOT NULL,
            publication_id INTEGER NOT NULL,
            content_id     TEXT NOT NULL,
            measure_point  TEXT NOT NULL,
            status         TEXT NOT NULL DEFAULT 'pending',
            created_at     TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_analysis_queue_status ON analysis_queue(status);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
