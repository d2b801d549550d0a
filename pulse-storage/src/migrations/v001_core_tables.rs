//! v001: accounts, content, publications, metrics.

use rusqlite::Connection;

use pulse_core::errors::PulseResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> PulseResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS accounts (
            account_id  TEXT PRIMARY KEY,
            platform    TEXT NOT NULL,
            niche       TEXT,
            cluster     TEXT,
            status      TEXT NOT NULL DEFAULT 'setup',
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_accounts_platform ON accounts(platform);
        CREATE INDEX IF NOT EXISTS idx_accounts_status ON accounts(status);

        CREATE TABLE IF NOT EXISTS content (
            content_id          TEXT PRIMARY KEY,
            hook_type           TEXT,
            narrative_structure TEXT,
            duration_seconds    REAL,
            bgm_category        TEXT
        );

        CREATE TABLE IF NOT EXISTS publications (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            content_id  TEXT NOT NULL REFERENCES content(content_id),
            account_id  TEXT NOT NULL REFERENCES accounts(account_id),
            platform    TEXT NOT NULL,
            posted_at   TEXT,
            status      TEXT NOT NULL DEFAULT 'scheduled',
            tags        TEXT NOT NULL DEFAULT '[]',
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            updated_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_publications_account ON publications(account_id);
        CREATE INDEX IF NOT EXISTS idx_publications_status ON publications(status);
        CREATE INDEX IF NOT EXISTS idx_publications_posted_at ON publications(posted_at);

        CREATE TABLE IF NOT EXISTS metrics (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            publication_id INTEGER NOT NULL REFERENCES publications(id),
            measure_point  TEXT NOT NULL,
            views           INTEGER NOT NULL,
            likes           INTEGER,
            comments        INTEGER,
            shares          INTEGER,
            engagement_rate REAL,
            measured_at     TEXT NOT NULL,
            UNIQUE (publication_id, measure_point)
        );

        CREATE INDEX IF NOT EXISTS idx_metrics_measured_at ON metrics(measured_at);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
