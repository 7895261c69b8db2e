//! Snippet storage
//!
//! Keyword-in-context snippets live in a PostgreSQL table with one row
//! per recorded occurrence. The store is optional: without a connection
//! string the dashboard still serves its charts, just without snippets.

use crate::{error::Result, Year};
use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

/// Upper bound on the number of snippets one lookup may return
///
/// Frequent keywords have tens of thousands of recorded contexts, far
/// more than a snippet table can usefully show.
pub const MAX_SNIPPETS: i64 = 500;

/// Snippet query without a year filter
///
/// The keyword and the row bound travel as bound parameters, never
/// inside the query text. DISTINCT folds away duplicate harvester rows,
/// and the ordering makes result truncation deterministic.
const FETCH_ALL_YEARS: &str = "SELECT DISTINCT publication, year, context, url \
                               FROM kwic WHERE term = $1 \
                               ORDER BY year, publication LIMIT $2";

/// Snippet query with a year filter, which binds the years as an array
const FETCH_SOME_YEARS: &str = "SELECT DISTINCT publication, year, context, url \
                                FROM kwic WHERE term = $1 AND year = ANY($2) \
                                ORDER BY year, publication LIMIT $3";

/// One row of the snippet store
#[derive(Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct SnippetRow {
    /// Newspaper the occurrence was printed in
    pub publication: String,

    /// Publication year
    pub year: Year,

    /// Text surrounding the occurrence
    pub context: String,

    /// Library viewer path of the scanned issue, without the origin
    pub url: String,
}

/// Source of keyword-in-context snippets
///
/// Lookup logic only sees this interface, so tests can substitute an
/// in-memory store for the real database.
#[async_trait]
pub trait SnippetStore: Send + Sync {
    /// Fetch the stored snippets of one keyword
    ///
    /// An empty year list means no year filter. Results are sorted by
    /// year, then publication, and at most [`MAX_SNIPPETS`] of them are
    /// returned.
    async fn fetch(&self, keyword: &str, years: &[Year]) -> Result<Vec<SnippetRow>>;
}

/// Snippet store backed by a PostgreSQL database
pub struct PgSnippetStore {
    /// Connection pool
    pool: PgPool,
}
//
impl PgSnippetStore {
    /// Set up the store from a connection string
    ///
    /// Connections are established lazily on first use, so a database
    /// that is down at startup degrades lookups instead of taking the
    /// whole dashboard down with it.
    pub fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(4)
            .connect_lazy(database_url)
            .context("parsing the store connection string")?;
        Ok(Self { pool })
    }
}
//
#[async_trait]
impl SnippetStore for PgSnippetStore {
    async fn fetch(&self, keyword: &str, years: &[Year]) -> Result<Vec<SnippetRow>> {
        let rows = if years.is_empty() {
            sqlx::query_as::<_, SnippetRow>(FETCH_ALL_YEARS)
                .bind(keyword)
                .bind(MAX_SNIPPETS)
                .fetch_all(&self.pool)
                .await?
        } else {
            sqlx::query_as::<_, SnippetRow>(FETCH_SOME_YEARS)
                .bind(keyword)
                .bind(years)
                .bind(MAX_SNIPPETS)
                .fetch_all(&self.pool)
                .await?
        };
        Ok(rows)
    }
}
