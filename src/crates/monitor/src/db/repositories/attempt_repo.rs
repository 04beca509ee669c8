//! Attempt repository for database operations

use chrono::{Duration, Utc};

use crate::db::connection::DatabasePool;
use crate::db::error::DbResult;
use crate::db::models::{AttemptStats, ChartSummary, LoginAttempt, NewAttempt};

/// Repository for the login attempt log
pub struct AttemptRepository;

impl AttemptRepository {
    /// Record a new login attempt
    ///
    /// The creation instant is assigned here, exactly once; callers cannot
    /// supply it. Returns the persisted row including its sequence id.
    pub async fn record(pool: &DatabasePool, attempt: NewAttempt) -> DbResult<LoginAttempt> {
        let now = Utc::now().to_rfc3339();
        let metadata = attempt.metadata.map(|m| m.to_string());
        let recorded = sqlx::query_as::<_, LoginAttempt>(
            "INSERT INTO login_attempts \
             (username, ip_address, country, client_type, success, reason, user_agent, metadata, attempt_time) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING *",
        )
        .bind(&attempt.username)
        .bind(&attempt.ip_address)
        .bind(&attempt.country)
        .bind(&attempt.client_type)
        .bind(attempt.success)
        .bind(&attempt.reason)
        .bind(&attempt.user_agent)
        .bind(&metadata)
        .bind(&now)
        .fetch_one(pool)
        .await?;

        Ok(recorded)
    }

    /// Get the most recent attempts, newest first
    ///
    /// Ordered by sequence id: insert order is authoritative even if the
    /// wall clock steps backwards between inserts.
    pub async fn recent(pool: &DatabasePool, limit: i64) -> DbResult<Vec<LoginAttempt>> {
        let attempts = sqlx::query_as::<_, LoginAttempt>(
            "SELECT * FROM login_attempts ORDER BY id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(attempts)
    }

    /// Compute aggregate statistics over the whole attempt log
    ///
    /// Totals come from one aggregate query; the trailing windows are
    /// counted dynamically on every call.
    pub async fn stats(pool: &DatabasePool) -> DbResult<AttemptStats> {
        let (total_attempts, successful, failed, unique_users, unique_ips): (i64, i64, i64, i64, i64) =
            sqlx::query_as(
                "SELECT COUNT(*), \
                        COALESCE(SUM(success), 0), \
                        COALESCE(SUM(1 - success), 0), \
                        COUNT(DISTINCT username), \
                        COUNT(DISTINCT ip_address) \
                 FROM login_attempts",
            )
            .fetch_one(pool)
            .await?;

        let last_10_min = Self::count_since(pool, 10).await?;
        let last_30_min = Self::count_since(pool, 30).await?;
        let last_hour = Self::count_since(pool, 60).await?;

        Ok(AttemptStats {
            total_attempts,
            successful,
            failed,
            unique_users,
            unique_ips,
            last_10_min,
            last_30_min,
            last_hour,
        })
    }

    /// Count failed attempts from one IP within the trailing window
    pub async fn failed_count(
        pool: &DatabasePool,
        ip_address: &str,
        window_minutes: i64,
    ) -> DbResult<i64> {
        let threshold = window_threshold(window_minutes);
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM login_attempts \
             WHERE ip_address = ? AND success = 0 AND attempt_time >= ?",
        )
        .bind(ip_address)
        .bind(&threshold)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Cumulative success/failure totals for the monitor chart
    pub async fn chart_summary(pool: &DatabasePool) -> DbResult<ChartSummary> {
        let (successful, failed, total): (i64, i64, i64) = sqlx::query_as(
            "SELECT COALESCE(SUM(success), 0), COALESCE(SUM(1 - success), 0), COUNT(*) \
             FROM login_attempts",
        )
        .fetch_one(pool)
        .await?;

        Ok(ChartSummary {
            successful,
            failed,
            total,
        })
    }

    async fn count_since(pool: &DatabasePool, minutes: i64) -> DbResult<i64> {
        let threshold = window_threshold(minutes);
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM login_attempts WHERE attempt_time > ?")
                .bind(&threshold)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}

/// RFC 3339 instant `minutes` ago. Stored timestamps share the same format
/// and UTC offset, so string comparison matches chronological order.
fn window_threshold(minutes: i64) -> String {
    (Utc::now() - Duration::minutes(minutes)).to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DatabaseConnection;

    async fn setup() -> DatabaseConnection {
        let conn = DatabaseConnection::new_in_memory().await.unwrap();
        conn.run_migrations().await.unwrap();
        conn
    }

    #[tokio::test]
    async fn test_record_assigns_id_and_time() {
        let conn = setup().await;
        let recorded = AttemptRepository::record(
            conn.pool(),
            NewAttempt::new("ilya", true).with_ip("127.0.0.1"),
        )
        .await
        .unwrap();

        assert!(recorded.id > 0);
        assert!(!recorded.attempt_time.is_empty());
        assert_eq!(recorded.username, "ilya");
        assert!(recorded.success);
    }

    #[tokio::test]
    async fn test_recent_newest_first() {
        let conn = setup().await;
        for name in ["first", "second", "third"] {
            AttemptRepository::record(conn.pool(), NewAttempt::new(name, false))
                .await
                .unwrap();
        }

        let recent = AttemptRepository::recent(conn.pool(), 2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].username, "third");
        assert_eq!(recent[1].username, "second");
    }

    #[tokio::test]
    async fn test_stats_counts() {
        let conn = setup().await;
        AttemptRepository::record(conn.pool(), NewAttempt::new("ilya", true).with_ip("10.0.0.1"))
            .await
            .unwrap();
        AttemptRepository::record(conn.pool(), NewAttempt::new("ilya", false).with_ip("10.0.0.1"))
            .await
            .unwrap();
        AttemptRepository::record(conn.pool(), NewAttempt::new("admin", false).with_ip("10.0.0.2"))
            .await
            .unwrap();

        let stats = AttemptRepository::stats(conn.pool()).await.unwrap();
        assert_eq!(stats.total_attempts, 3);
        assert_eq!(stats.successful, 1);
        assert_eq!(stats.failed, 2);
        assert_eq!(stats.unique_users, 2);
        assert_eq!(stats.unique_ips, 2);
        // All rows were just inserted, so every window sees them
        assert_eq!(stats.last_10_min, 3);
        assert_eq!(stats.last_30_min, 3);
        assert_eq!(stats.last_hour, 3);
    }

    #[tokio::test]
    async fn test_stats_on_empty_log() {
        let conn = setup().await;
        let stats = AttemptRepository::stats(conn.pool()).await.unwrap();
        assert_eq!(stats, AttemptStats::default());
    }

    #[tokio::test]
    async fn test_failed_count_scoped_to_ip() {
        let conn = setup().await;
        for _ in 0..3 {
            AttemptRepository::record(
                conn.pool(),
                NewAttempt::new("ilya", false).with_ip("10.0.0.1"),
            )
            .await
            .unwrap();
        }
        AttemptRepository::record(conn.pool(), NewAttempt::new("ilya", true).with_ip("10.0.0.1"))
            .await
            .unwrap();
        AttemptRepository::record(conn.pool(), NewAttempt::new("ilya", false).with_ip("10.0.0.2"))
            .await
            .unwrap();

        let count = AttemptRepository::failed_count(conn.pool(), "10.0.0.1", 15)
            .await
            .unwrap();
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn test_chart_summary() {
        let conn = setup().await;
        AttemptRepository::record(conn.pool(), NewAttempt::new("ilya", true))
            .await
            .unwrap();
        AttemptRepository::record(conn.pool(), NewAttempt::new("ilya", false))
            .await
            .unwrap();

        let chart = AttemptRepository::chart_summary(conn.pool()).await.unwrap();
        assert_eq!(chart.successful, 1);
        assert_eq!(chart.failed, 1);
        assert_eq!(chart.total, 2);
    }
}
