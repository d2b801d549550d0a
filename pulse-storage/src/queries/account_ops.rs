//! Reads (and the seam-level insert) for the accounts table.
//!
//! Accounts are owned by the account-lifecycle subsystem; the prediction
//! core only reads them. The insert exists for that subsystem and tests.

use rusqlite::{params, Connection, OptionalExtension};

use pulse_core::errors::PulseResult;
use pulse_core::models::{Account, AccountStatus, Platform};

use super::parse_ts;
use crate::to_storage_err;

/// Insert an account row.
pub fn insert_account(conn: &Connection, account: &Account) -> PulseResult<()> {
    conn.execute(
        "INSERT INTO accounts (account_id, platform, niche, cluster, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            account.account_id,
            account.platform.as_str(),
            account.niche,
            account.cluster,
            account.status.as_str(),
            account.created_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Get a single account by id.
pub fn get_account(conn: &Connection, account_id: &str) -> PulseResult<Option<Account>> {
    let mut stmt = conn
        .prepare(
            "SELECT account_id, platform, niche, cluster, status, created_at
             FROM accounts WHERE account_id = ?1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let row = stmt
        .query_row(params![account_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    row.map(row_to_account).transpose()
}

/// List all active accounts.
pub fn list_active_accounts(conn: &Connection) -> PulseResult<Vec<Account>> {
    let mut stmt = conn
        .prepare(
            "SELECT account_id, platform, niche, cluster, status, created_at
             FROM accounts WHERE status = 'active' ORDER BY account_id",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut accounts = Vec::new();
    for row in rows {
        let raw = row.map_err(|e| to_storage_err(e.to_string()))?;
        accounts.push(row_to_account(raw)?);
    }
    Ok(accounts)
}

type RawAccount = (
    String,
    String,
    Option<String>,
    Option<String>,
    String,
    String,
);

fn row_to_account(raw: RawAccount) -> PulseResult<Account> {
    let (account_id, platform, niche, cluster, status, created_at) = raw;
    Ok(Account {
        account_id,
        platform: Platform::parse(&platform)
            .ok_or_else(|| to_storage_err(format!("unknown platform {platform:?}")))?,
        niche,
        cluster,
        status: AccountStatus::parse(&status)
            .ok_or_else(|| to_storage_err(format!("unknown account status {status:?}")))?,
        created_at: parse_ts(&created_at)?,
    })
}
