//! Snippet repository
//!
//! Expiring-record store for snippets:
//! - insert: single INSERT, timestamps from the database clock
//! - get: point lookup filtered by `expires > NOW()`
//! - latest: top-N by recency filtered by `expires > NOW()`
//!
//! Expired rows are never deleted here; they simply stop matching.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::models::{LifetimeDays, SnippetContent, SnippetId, SnippetTitle};

/// Default number of snippets returned by [`SnippetRepo::latest`]
pub const DEFAULT_LATEST_LIMIT: u32 = 10;

/// Hard cap on the top-N size
pub const MAX_LATEST_LIMIT: u32 = 100;

/// Default per-operation deadline
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Snippet record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Snippet {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created: DateTime<Utc>,
    pub expires: DateTime<Utc>,
}

impl Snippet {
    /// Length of the validity window `[created, expires)`.
    pub fn lifetime(&self) -> chrono::Duration {
        self.expires - self.created
    }

    /// Whether the snippet is still valid at `at`.
    pub fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        self.expires > at
    }
}

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("query timed out after {after:?}")]
    Timeout { after: Duration },

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}

impl DbError {
    /// Absent or expired record.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Any datastore-layer fault, timeouts included.
    pub fn is_store_failure(&self) -> bool {
        !self.is_not_found()
    }
}

/// Snippet repository
///
/// Borrows the process-wide pool; every call acquires a connection for a
/// single statement and releases it before returning.
pub struct SnippetRepo<'a> {
    pool: &'a PgPool,
    timeout: Duration,
}

impl<'a> SnippetRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self {
            pool,
            timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Override the per-operation deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Insert a snippet valid for `lifetime` days from now.
    ///
    /// `created` and `expires` both come from the same `NOW()` so the
    /// window length is exact and immune to client clock skew. Days are
    /// counted as 24 hours so session time zones and DST cannot stretch them.
    pub async fn insert(
        &self,
        title: &SnippetTitle,
        content: &SnippetContent,
        lifetime: LifetimeDays,
    ) -> Result<i64, DbError> {
        let query = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO snippets (title, content, created, expires)
            VALUES ($1, $2, NOW(), NOW() + make_interval(hours => 24 * $3))
            RETURNING id
            "#,
        )
        .bind(title.as_str())
        .bind(content.as_str())
        .bind(lifetime.as_i32())
        .fetch_one(self.pool);

        let id = with_deadline(self.timeout, query).await?;
        tracing::debug!(id, days = lifetime.get(), "snippet inserted");
        Ok(id)
    }

    /// Get a single snippet that is still valid.
    ///
    /// Absent and expired rows both yield [`DbError::NotFound`].
    pub async fn get(&self, id: SnippetId) -> Result<Snippet, DbError> {
        let query = sqlx::query_as::<_, Snippet>(
            r#"
            SELECT id, title, content, created, expires
            FROM snippets
            WHERE id = $1
            AND expires > NOW()
            "#,
        )
        .bind(id.get())
        .fetch_optional(self.pool);

        with_deadline(self.timeout, query)
            .await?
            .ok_or_else(|| DbError::NotFound {
                resource: "snippet",
                id: id.get().to_string(),
            })
    }

    /// Most recently created valid snippets, newest first.
    ///
    /// A zero `limit` yields an empty list without touching the store;
    /// larger values are capped at [`MAX_LATEST_LIMIT`]. Rows are collected
    /// in full or the call fails; a truncated list is never returned.
    pub async fn latest(&self, limit: u32) -> Result<Vec<Snippet>, DbError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let limit = cap_limit(limit);

        let query = sqlx::query_as::<_, Snippet>(
            r#"
            SELECT id, title, content, created, expires
            FROM snippets
            WHERE expires > NOW()
            ORDER BY created DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(self.pool);

        with_deadline(self.timeout, query).await
    }
}

fn cap_limit(limit: u32) -> u32 {
    limit.min(MAX_LATEST_LIMIT)
}

/// Run a query under a deadline. Dropping the query future on expiry
/// cancels the statement and hands its connection back to the pool.
async fn with_deadline<T, F>(timeout: Duration, query: F) -> Result<T, DbError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(timeout, query).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(DbError::Timeout { after: timeout }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::MIGRATOR;
    use chrono::Duration as ChronoDuration;

    fn title(s: &str) -> SnippetTitle {
        SnippetTitle::new(s).unwrap()
    }

    fn content(s: &str) -> SnippetContent {
        SnippetContent::new(s).unwrap()
    }

    fn days(n: u32) -> LifetimeDays {
        LifetimeDays::new(n).unwrap()
    }

    /// Shift a row's window into the past so it has already lapsed.
    async fn backdate(pool: &PgPool, id: i64, by_days: i32) {
        sqlx::query(
            r#"
            UPDATE snippets
            SET created = created - make_interval(hours => 24 * $2),
                expires = expires - make_interval(hours => 24 * $2)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(by_days)
        .execute(pool)
        .await
        .unwrap();
    }

    #[test]
    fn limit_is_capped() {
        assert_eq!(cap_limit(1), 1);
        assert_eq!(cap_limit(10), 10);
        assert_eq!(cap_limit(1_000), MAX_LATEST_LIMIT);
    }

    #[tokio::test]
    async fn zero_limit_skips_the_store() {
        // Nothing listens here; a query would fail
        let pool = sqlx::postgres::PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(100))
            .connect_lazy("postgres://localhost:1/snipbox")
            .unwrap();
        let latest = SnippetRepo::new(&pool).latest(0).await.unwrap();
        assert!(latest.is_empty());
    }

    #[test]
    fn validity_window_is_half_open() {
        let created = Utc::now();
        let snippet = Snippet {
            id: 1,
            title: "t".into(),
            content: "c".into(),
            created,
            expires: created + ChronoDuration::days(7),
        };
        assert_eq!(snippet.lifetime(), ChronoDuration::days(7));
        assert!(snippet.is_valid_at(created));
        assert!(!snippet.is_valid_at(snippet.expires));
    }

    #[test]
    fn error_kinds() {
        let not_found = DbError::NotFound {
            resource: "snippet",
            id: "2".into(),
        };
        assert!(not_found.is_not_found());
        assert!(!not_found.is_store_failure());
        assert_eq!(not_found.to_string(), "not found: snippet '2'");

        let timeout = DbError::Timeout {
            after: Duration::from_secs(5),
        };
        assert!(timeout.is_store_failure());

        let sqlx_err = DbError::from(sqlx::Error::PoolTimedOut);
        assert!(sqlx_err.is_store_failure());
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_surfaces_timeout() {
        let stuck = std::future::pending::<Result<(), sqlx::Error>>();
        let err = with_deadline(Duration::from_millis(50), stuck)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Timeout { after } if after == Duration::from_millis(50)));
    }

    #[tokio::test]
    async fn deadline_passes_through_errors() {
        let failing = async { Err::<(), _>(sqlx::Error::RowNotFound) };
        let err = with_deadline(Duration::from_secs(1), failing)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Sqlx(sqlx::Error::RowNotFound)));
    }

    // Integration tests - run with DATABASE_URL set
    // cargo test -p snipbox-server -- --ignored

    #[sqlx::test(migrator = "MIGRATOR")]
    #[ignore = "requires database"]
    async fn o_snail_scenario(pool: PgPool) {
        let repo = SnippetRepo::new(&pool);
        let body = "O snail\nClimb Mount Fuji,\nBut slowly, slowly!\n\n- Kobayashi Issa";

        let id = repo
            .insert(&title("O snail"), &content(body), days(7))
            .await
            .unwrap();
        assert_eq!(id, 1);

        let snippet = repo.get(SnippetId::new(1).unwrap()).await.unwrap();
        assert_eq!(snippet.title, "O snail");
        assert_eq!(snippet.content, body);
        assert_eq!(snippet.expires, snippet.created + ChronoDuration::days(7));

        let err = repo.get(SnippetId::new(2).unwrap()).await.unwrap_err();
        assert!(err.is_not_found());

        let latest = repo.latest(DEFAULT_LATEST_LIMIT).await.unwrap();
        let ids: Vec<i64> = latest.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[sqlx::test(migrator = "MIGRATOR")]
    #[ignore = "requires database"]
    async fn round_trip_preserves_window(pool: PgPool) {
        let repo = SnippetRepo::new(&pool);

        for n in [1, 7, 365] {
            let id = repo
                .insert(&title("window"), &content("body"), days(n))
                .await
                .unwrap();
            let snippet = repo.get(SnippetId::new(id).unwrap()).await.unwrap();
            assert_eq!(snippet.lifetime(), ChronoDuration::days(i64::from(n)));
            assert!(snippet.expires > snippet.created);
        }
    }

    #[sqlx::test(migrator = "MIGRATOR")]
    #[ignore = "requires database"]
    async fn expired_snippet_is_hidden(pool: PgPool) {
        let repo = SnippetRepo::new(&pool);
        let kept = repo
            .insert(&title("kept"), &content("body"), days(7))
            .await
            .unwrap();
        let lapsed = repo
            .insert(&title("lapsed"), &content("body"), days(1))
            .await
            .unwrap();

        backdate(&pool, lapsed, 2).await;

        let err = repo.get(SnippetId::new(lapsed).unwrap()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { resource: "snippet", .. }));

        let ids: Vec<i64> = repo.latest(10).await.unwrap().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![kept]);

        // Still physically present
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM snippets")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 2);
    }

    #[sqlx::test(migrator = "MIGRATOR")]
    #[ignore = "requires database"]
    async fn latest_orders_newest_first(pool: PgPool) {
        let repo = SnippetRepo::new(&pool);
        let mut ids = Vec::new();
        for i in 0..5 {
            let id = repo
                .insert(&title(&format!("snippet {i}")), &content("body"), days(7))
                .await
                .unwrap();
            ids.push(id);
        }
        // Spread creation times so ordering does not hinge on the tie-break
        for (age, id) in ids.iter().rev().enumerate() {
            backdate(&pool, *id, age as i32).await;
        }

        let latest = repo.latest(3).await.unwrap();
        let got: Vec<i64> = latest.iter().map(|s| s.id).collect();
        assert_eq!(got, vec![ids[4], ids[3], ids[2]]);
        assert!(latest.windows(2).all(|w| w[0].created > w[1].created));
    }

    #[sqlx::test(migrator = "MIGRATOR")]
    #[ignore = "requires database"]
    async fn latest_breaks_ties_by_id(pool: PgPool) {
        let repo = SnippetRepo::new(&pool);
        for i in 0..3 {
            repo.insert(&title(&format!("tie {i}")), &content("body"), days(7))
                .await
                .unwrap();
        }
        sqlx::query(
            "UPDATE snippets SET created = '2026-01-01T00:00:00Z', expires = NOW() + INTERVAL '7 days'",
        )
        .execute(&pool)
        .await
        .unwrap();

        let ids: Vec<i64> = repo.latest(10).await.unwrap().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[sqlx::test(migrator = "MIGRATOR")]
    #[ignore = "requires database"]
    async fn latest_saturates_below_limit(pool: PgPool) {
        let repo = SnippetRepo::new(&pool);
        assert!(repo.latest(10).await.unwrap().is_empty());

        for i in 0..12 {
            repo.insert(&title(&format!("n{i}")), &content("body"), days(1))
                .await
                .unwrap();
        }
        assert_eq!(repo.latest(10).await.unwrap().len(), 10);
        assert_eq!(repo.latest(50).await.unwrap().len(), 12);
    }

    #[sqlx::test(migrator = "MIGRATOR")]
    #[ignore = "requires database"]
    async fn latest_zero_is_empty(pool: PgPool) {
        let repo = SnippetRepo::new(&pool);
        repo.insert(&title("present"), &content("body"), days(7))
            .await
            .unwrap();

        assert!(repo.latest(0).await.unwrap().is_empty());
        assert_eq!(repo.latest(1).await.unwrap().len(), 1);
    }

    #[sqlx::test(migrator = "MIGRATOR")]
    #[ignore = "requires database"]
    async fn concurrent_inserts_and_reads(pool: PgPool) {
        let handles: Vec<_> = (0..10)
            .map(|i| {
                let pool = pool.clone();
                tokio::spawn(async move {
                    let repo = SnippetRepo::new(&pool);
                    let id = repo
                        .insert(&title(&format!("c{i}")), &content("body"), days(1))
                        .await
                        .unwrap();
                    repo.latest(DEFAULT_LATEST_LIMIT).await.unwrap();
                    id
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 10);

        let latest = SnippetRepo::new(&pool).latest(50).await.unwrap();
        assert_eq!(latest.len(), 10);
    }

    #[sqlx::test(migrator = "MIGRATOR")]
    #[ignore = "requires database"]
    async fn schema_rejects_inverted_window(pool: PgPool) {
        let result = sqlx::query(
            "INSERT INTO snippets (title, content, created, expires) VALUES ('t', 'c', NOW(), NOW())",
        )
        .execute(&pool)
        .await;
        assert!(result.is_err());
    }
}
