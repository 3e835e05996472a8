//! Ownership-scoped access shared by every per-user table
//!
//! Each record type names its table and column list once; lookups, deletes
//! and ownership checks then always carry the `user_id` predicate, so a row
//! owned by someone else is indistinguishable from a missing one.

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use uuid::Uuid;

/// A row type stored in a table with `id` and `user_id` columns
pub trait OwnedRecord: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin {
    /// Table name
    const TABLE: &'static str;
    /// Column list matching the record's `FromRow` fields
    const COLUMNS: &'static str;
    /// Human readable name used in error messages
    const LABEL: &'static str;
}

/// Generic repository for [`OwnedRecord`] types
pub struct OwnedRepository;

impl OwnedRepository {
    /// Fetch a row by ID if it belongs to the user
    pub async fn find<R: OwnedRecord>(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<Option<R>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1 AND user_id = $2",
            R::COLUMNS,
            R::TABLE
        );

        let record = sqlx::query_as::<_, R>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    /// Delete a row if it belongs to the user; returns whether a row was removed
    pub async fn delete<R: OwnedRecord>(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1 AND user_id = $2", R::TABLE);

        let result = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Whether every ID in `ids` names a row owned by the user
    pub async fn all_owned<R: OwnedRecord>(pool: &PgPool, ids: &[Uuid], user_id: Uuid) -> Result<bool> {
        let mut distinct = ids.to_vec();
        distinct.sort_unstable();
        distinct.dedup();

        if distinct.is_empty() {
            return Ok(true);
        }

        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE id = ANY($1) AND user_id = $2",
            R::TABLE
        );

        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(distinct.as_slice())
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        Ok(count == distinct.len() as i64)
    }
}
