//! Inserts, reads, and status transitions for publications.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use pulse_core::errors::PulseResult;
use pulse_core::models::{Platform, Publication, PublicationStatus};

use super::parse_ts;
use crate::to_storage_err;

/// Insert a publication and return its row id.
pub fn insert_publication(conn: &Connection, publication: &Publication) -> PulseResult<i64> {
    let tags_json = serde_json::to_string(&publication.tags)
        .map_err(|e| to_storage_err(e.to_string()))?;
    conn.execute(
        "INSERT INTO publications (content_id, account_id, platform, posted_at, status, tags)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            publication.content_id,
            publication.account_id,
            publication.platform.as_str(),
            publication.posted_at.map(|t| t.to_rfc3339()),
            publication.status.as_str(),
            tags_json,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(conn.last_insert_rowid())
}

/// Get a publication by row id.
pub fn get_publication(conn: &Connection, id: i64) -> PulseResult<Option<Publication>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, content_id, account_id, platform, posted_at, status, tags
             FROM publications WHERE id = ?1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let row = stmt
        .query_row(params![id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
            ))
        })
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    let Some((id, content_id, account_id, platform, posted_at, status, tags)) = row else {
        return Ok(None);
    };
    Ok(Some(Publication {
        id,
        content_id,
        account_id,
        platform: Platform::parse(&platform)
            .ok_or_else(|| to_storage_err(format!("unknown platform {platform:?}")))?,
        posted_at: posted_at.as_deref().map(parse_ts).transpose()?,
        status: PublicationStatus::parse(&status)
            .ok_or_else(|| to_storage_err(format!("unknown publication status {status:?}")))?,
        tags: serde_json::from_str(&tags).map_err(|e| to_storage_err(e.to_string()))?,
    }))
}

/// Transition a publication's status.
pub fn set_status(
    conn: &Connection,
    id: i64,
    status: PublicationStatus,
    now: DateTime<Utc>,
) -> PulseResult<()> {
    conn.execute(
        "UPDATE publications SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), now.to_rfc3339(), id],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
