//! Session-scoped connection manager.
//!
//! A [`Session`] owns at most one live MySQL connection. It is created
//! empty (Disconnected), gains a connection on an explicit [`Session::connect`]
//! and loses it only on an explicit [`Session::disconnect`] or drop. There
//! is no pool, no reconnect, no retry: each interactive surface gets its
//! own `Session` and nothing is shared between them.

use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{Column, ConnectOptions, Connection, Row as SqlxRow};

use crate::catalog::AnalysisQuery;
use crate::chart::{chart_specs, Chart};
use crate::error::{Error, Result};
use crate::types::{QueryResult, Row, Value};

/// Parameters for opening a connection. Credentials are passed through to
/// the driver and never stored anywhere else.
#[derive(Debug, Clone)]
pub struct ConnectParams {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Default for ConnectParams {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            database: "crickets_db".to_string(),
        }
    }
}

/// Per-user interactive state: zero or one live connection.
#[derive(Default)]
pub struct Session {
    conn: Option<MySqlConnection>,
}

impl Session {
    /// Create a session in the Disconnected state.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when a connection is held.
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Open a connection with the given parameters (utf8mb4 charset).
    ///
    /// Fails with [`Error::Connection`] when a connection already exists:
    /// the caller must disconnect first, there is no implicit replacement.
    /// Driver failures (unreachable host, rejected credentials, unknown
    /// database) are surfaced verbatim and leave the session Disconnected.
    pub async fn connect(&mut self, params: &ConnectParams) -> Result<()> {
        if self.conn.is_some() {
            return Err(Error::Connection(
                "already connected; disconnect first".to_string(),
            ));
        }

        let options = MySqlConnectOptions::new()
            .host(&params.host)
            .port(params.port)
            .username(&params.user)
            .password(&params.password)
            .database(&params.database)
            .charset("utf8mb4");

        tracing::info!(
            host = %params.host,
            port = params.port,
            database = %params.database,
            "Connecting to MySQL"
        );

        let conn = options
            .connect()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        self.conn = Some(conn);
        Ok(())
    }

    /// Close and drop the connection.
    ///
    /// Returns `true` when a connection was closed, `false` when there was
    /// nothing to do. Disconnecting a Disconnected session is never an
    /// error.
    pub async fn disconnect(&mut self) -> bool {
        match self.conn.take() {
            Some(conn) => {
                if let Err(e) = conn.close().await {
                    // The handle is gone either way; the session is
                    // Disconnected regardless of how the close went.
                    tracing::warn!(error = %e, "Error while closing connection");
                }
                tracing::info!("Disconnected");
                true
            }
            None => false,
        }
    }

    /// Execute SQL with positional bind values and collect every row.
    ///
    /// Fails fast with [`Error::NotConnected`] when no connection is held;
    /// no network call is made in that case. Driver errors come back as
    /// [`Error::Query`] verbatim, and a failed query leaves the connection
    /// open and reusable.
    pub async fn run_query(&mut self, sql: &str, params: &[String]) -> Result<QueryResult> {
        let conn = self.conn.as_mut().ok_or(Error::NotConnected)?;

        let mut query = sqlx::query(sql);
        for param in params {
            query = query.bind(param.as_str());
        }

        tracing::debug!(sql, "Running query");

        let rows = query
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| Error::Query(e.to_string()))?;

        Ok(collect_result(&rows))
    }

    /// Execute an analysis query and classify the result for rendering.
    ///
    /// Classification is by analysis identity and costs nothing; errors
    /// from execution propagate unchanged, with no chart output.
    pub async fn run_analysis(
        &mut self,
        query: &AnalysisQuery,
    ) -> Result<(QueryResult, Vec<Chart>)> {
        let result = self.run_query(&query.sql, &query.params).await?;
        tracing::info!(
            analysis = ?query.analysis,
            dataset = %query.dataset,
            rows = result.rows.len(),
            "Analysis complete"
        );
        Ok((result, chart_specs(query.analysis)))
    }
}

/// Build a [`QueryResult`] from driver rows. Column names come from the
/// first row; an empty row set yields an empty result.
fn collect_result(rows: &[MySqlRow]) -> QueryResult {
    let Some(first) = rows.first() else {
        return QueryResult::default();
    };

    let columns: Vec<String> = first
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();

    let rows = rows
        .iter()
        .map(|row| Row {
            values: (0..columns.len()).map(|i| decode_value(row, i)).collect(),
        })
        .collect();

    QueryResult { columns, rows }
}

/// Decode one cell into a [`Value`], normalizing the driver types the
/// delivery schema produces. MySQL aggregates like `SUM()` come back as
/// DECIMAL, which lands in the `Float` variant.
fn decode_value(row: &MySqlRow, idx: usize) -> Value {
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        return v.map(Value::Int).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<u64>, _>(idx) {
        return v.map(|u| Value::Int(u as i64)).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<i32>, _>(idx) {
        return v.map(|i| Value::Int(i as i64)).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<u32>, _>(idx) {
        return v.map(|u| Value::Int(u as i64)).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(idx) {
        return v.map(Value::Float).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<rust_decimal::Decimal>, _>(idx) {
        return v
            .map(|d| {
                use rust_decimal::prelude::ToPrimitive;
                Value::Float(d.to_f64().unwrap_or(0.0))
            })
            .unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
        return v.map(Value::Text).unwrap_or(Value::Null);
    }

    Value::Null
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{select, Analysis};
    use crate::types::Dataset;

    #[test]
    fn test_new_session_is_disconnected() {
        let session = Session::new();
        assert!(!session.is_connected());
    }

    #[tokio::test]
    async fn test_disconnect_without_connect_is_noop() {
        let mut session = Session::new();
        assert!(!session.disconnect().await);
        assert!(!session.is_connected());
        // Still a no-op the second time around.
        assert!(!session.disconnect().await);
    }

    #[tokio::test]
    async fn test_run_query_disconnected_fails_fast() {
        let mut session = Session::new();
        let err = session
            .run_query("SELECT 1", &[])
            .await
            .expect_err("must fail without a connection");
        assert!(matches!(err, Error::NotConnected));
    }

    #[tokio::test]
    async fn test_run_analysis_disconnected_fails_fast() {
        let mut session = Session::new();
        let query = select(Analysis::TeamRuns, Dataset::Test, None);
        let err = session
            .run_analysis(&query)
            .await
            .expect_err("must fail without a connection");
        assert!(matches!(err, Error::NotConnected));
    }
}
