//! Database access layer for yoga-search
//!
//! All connections are read-only. The schema (`asanas`, `series`,
//! `sequences`, `user_profiles`, `reminders`) is owned by the main
//! application; this module only queries it.

use anyhow::{Context, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqlitePool};
use std::path::Path;
use tracing::debug;
use yoga_common::export::Subject;
use yoga_common::models::{Reminder, UserProfile};

/// Searchable record tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Asanas,
    Series,
    Sequences,
}

impl AssetKind {
    pub fn table(&self) -> &'static str {
        match self {
            AssetKind::Asanas => "asanas",
            AssetKind::Series => "series",
            AssetKind::Sequences => "sequences",
        }
    }

    /// Columns a text query is matched against
    fn match_columns(&self) -> &'static [&'static str] {
        match self {
            AssetKind::Asanas => &["name", "sanskrit_name", "alternative_names"],
            AssetKind::Series | AssetKind::Sequences => &["name"],
        }
    }
}

/// Connect to the database in read-only mode
pub async fn connect_readonly(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.exists() {
        anyhow::bail!(
            "Database not found: {}\nThe practice database is created by the main application.",
            db_path.display()
        );
    }

    // mode=ro: the service never writes
    let db_url = format!("sqlite://{}?mode=ro", db_path.display());

    let pool = SqlitePool::connect(&db_url)
        .await
        .context("Failed to connect to database in read-only mode")?;

    #[cfg(debug_assertions)]
    {
        let write_test = sqlx::query("CREATE TABLE _test_write (id INTEGER)")
            .execute(&pool)
            .await;
        if write_test.is_ok() {
            anyhow::bail!("Database connection is not read-only");
        }
    }

    Ok(pool)
}

/// Escape LIKE wildcards and wrap the query for a substring match.
///
/// Uses `\` as the escape character; pair with `ESCAPE '\'`.
pub fn like_pattern(query: &str) -> String {
    let mut out = String::with_capacity(query.len() + 2);
    out.push('%');
    for c in query.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

/// Records of `kind` whose searchable columns contain `query`.
///
/// With `creators` set, only records created by one of them are returned.
/// No row limit is applied here: callers cut the list after grouping, so the
/// database order never decides which records are dropped.
pub async fn search_assets<T>(
    pool: &SqlitePool,
    kind: AssetKind,
    query: &str,
    creators: Option<&[&str]>,
) -> Result<Vec<T>>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    if creators.is_some_and(|c| c.is_empty()) {
        debug!(table = kind.table(), query, "No visible creators, skipping search");
        return Ok(Vec::new());
    }

    let columns = kind.match_columns();
    let mut sql = format!(
        "SELECT * FROM {} WHERE ({})",
        kind.table(),
        columns
            .iter()
            .map(|c| format!("{} LIKE ? ESCAPE '\\'", c))
            .collect::<Vec<_>>()
            .join(" OR ")
    );
    if let Some(creators) = creators {
        let placeholders = vec!["?"; creators.len()].join(", ");
        sql.push_str(&format!(" AND created_by IN ({})", placeholders));
    }

    let pattern = like_pattern(query);
    let mut q = sqlx::query_as::<_, T>(&sql);
    for _ in columns {
        q = q.bind(pattern.clone());
    }
    for creator in creators.unwrap_or_default() {
        q = q.bind(*creator);
    }
    let rows = q
        .fetch_all(pool)
        .await
        .with_context(|| format!("Search in {} failed", kind.table()))?;

    debug!(table = kind.table(), query, results = rows.len(), "Search complete");
    Ok(rows)
}

/// Records of `kind` created by the subject's id or email
pub async fn owned_assets<T>(pool: &SqlitePool, kind: AssetKind, subject: &Subject) -> Result<Vec<T>>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let sql = format!(
        "SELECT * FROM {} WHERE created_by = ? OR (? IS NOT NULL AND created_by = ?) ORDER BY created_at ASC",
        kind.table()
    );

    let rows = sqlx::query_as::<_, T>(&sql)
        .bind(&subject.user_id)
        .bind(subject.email.as_deref())
        .bind(subject.email.as_deref())
        .fetch_all(pool)
        .await
        .with_context(|| format!("Loading owned {} failed", kind.table()))?;
    Ok(rows)
}

pub async fn user_profile(pool: &SqlitePool, user_id: &str) -> Result<Option<UserProfile>> {
    let profile = sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profiles WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .context("Loading user profile failed")?;
    Ok(profile)
}

pub async fn user_reminders(pool: &SqlitePool, subject: &Subject) -> Result<Vec<Reminder>> {
    let reminders = sqlx::query_as::<_, Reminder>(
        "SELECT * FROM reminders
         WHERE user_id = ? OR (? IS NOT NULL AND user_email = ?)
         ORDER BY time_of_day ASC",
    )
    .bind(&subject.user_id)
    .bind(subject.email.as_deref())
    .bind(subject.email.as_deref())
    .fetch_all(pool)
    .await
    .context("Loading reminders failed")?;
    Ok(reminders)
}
