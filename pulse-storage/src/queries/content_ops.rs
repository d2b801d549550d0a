//! Reads (and the seam-level insert) for the content table.

use rusqlite::{params, Connection, OptionalExtension};

use pulse_core::errors::PulseResult;
use pulse_core::models::ContentMeta;

use crate::to_storage_err;

/// Insert a content metadata row.
pub fn insert_content(conn: &Connection, content: &ContentMeta) -> PulseResult<()> {
    conn.execute(
        "INSERT INTO content (content_id, hook_type, narrative_structure, duration_seconds, bgm_category)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            content.content_id,
            content.hook_type,
            content.narrative_structure,
            content.duration_seconds,
            content.bgm_category,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Get content metadata by id.
pub fn get_content(conn: &Connection, content_id: &str) -> PulseResult<Option<ContentMeta>> {
    let mut stmt = conn
        .prepare(
            "SELECT content_id, hook_type, narrative_structure, duration_seconds, bgm_category
             FROM content WHERE content_id = ?1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    stmt.query_row(params![content_id], |row| {
        Ok(ContentMeta {
            content_id: row.get(0)?,
            hook_type: row.get(1)?,
            narrative_structure: row.get(2)?,
            duration_seconds: row.get(3)?,
            bgm_category: row.get(4)?,
        })
    })
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}
