//! IP block repository for database operations

use chrono::{Duration, Utc};

use crate::db::connection::DatabasePool;
use crate::db::error::DbResult;
use crate::db::models::IpBlock;

/// Repository for the IP block list
pub struct IpBlockRepository;

impl IpBlockRepository {
    /// Add or replace a block for an IP
    ///
    /// Upserts on the IP address, so at most one block row per IP exists.
    /// A permanent block carries no expiry; a temporary one expires after
    /// `duration_minutes`.
    pub async fn block(
        pool: &DatabasePool,
        ip_address: &str,
        reason: &str,
        duration_minutes: Option<i64>,
        is_permanent: bool,
    ) -> DbResult<()> {
        let now = Utc::now().to_rfc3339();
        let blocked_until = if is_permanent {
            None
        } else {
            duration_minutes.map(|m| (Utc::now() + Duration::minutes(m)).to_rfc3339())
        };

        sqlx::query(
            "INSERT INTO ip_blocks (ip_address, reason, blocked_until, is_permanent, created_at) \
             VALUES (?, ?, ?, ?, ?) \
             ON CONFLICT(ip_address) DO UPDATE SET \
                 reason = excluded.reason, \
                 blocked_until = excluded.blocked_until, \
                 is_permanent = excluded.is_permanent",
        )
        .bind(ip_address)
        .bind(reason)
        .bind(&blocked_until)
        .bind(is_permanent)
        .bind(&now)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Check whether an IP is currently blocked
    ///
    /// Returns the block reason if an active block exists. An expired
    /// temporary block is deleted here (lazy purge) and reported as absent.
    pub async fn is_blocked(pool: &DatabasePool, ip_address: &str) -> DbResult<Option<String>> {
        let row = sqlx::query_as::<_, IpBlock>("SELECT * FROM ip_blocks WHERE ip_address = ?")
            .bind(ip_address)
            .fetch_optional(pool)
            .await?;

        let Some(block) = row else {
            return Ok(None);
        };

        if block.is_permanent {
            return Ok(Some(block.reason.unwrap_or_else(|| "permanent block".to_string())));
        }

        match &block.blocked_until {
            Some(until) if *until > Utc::now().to_rfc3339() => {
                Ok(Some(block.reason.unwrap_or_else(|| "temporary block".to_string())))
            }
            _ => {
                // Expired (or malformed, no expiry on a temporary block): purge
                sqlx::query("DELETE FROM ip_blocks WHERE ip_address = ?")
                    .bind(ip_address)
                    .execute(pool)
                    .await?;
                Ok(None)
            }
        }
    }

    /// List all active blocks, newest first
    ///
    /// Expired temporary blocks are purged before the listing.
    pub async fn list(pool: &DatabasePool) -> DbResult<Vec<IpBlock>> {
        Self::purge_expired(pool).await?;

        let blocks =
            sqlx::query_as::<_, IpBlock>("SELECT * FROM ip_blocks ORDER BY created_at DESC")
                .fetch_all(pool)
                .await?;

        Ok(blocks)
    }

    /// Remove all expired temporary blocks
    pub async fn purge_expired(pool: &DatabasePool) -> DbResult<u64> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "DELETE FROM ip_blocks WHERE is_permanent = 0 AND blocked_until IS NOT NULL AND blocked_until < ?",
        )
        .bind(&now)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}
