//! Database session for inventory fetching

use std::fmt;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use serde_json::Value;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{Column, ConnectOptions, Connection, Row, TypeInfo, ValueRef};
use tracing::{debug, instrument};

use dbinv_core::{BindingError, BindingSource, GroupingKey};

use crate::error::FetchError;
use crate::queries;

/// Connection parameters, sourced from external configuration only
#[derive(Clone, Deserialize)]
pub struct DbConfig {
    /// Database server hostname
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
    /// User name
    pub user: String,
    /// User password
    pub password: String,
    /// Database name
    pub database: String,
}

fn default_port() -> u16 {
    3306
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

/// A single scoped database connection.
///
/// Opened once per invocation and passed explicitly to each stage; not
/// shared across callers. Dropping the session closes the connection on
/// error paths; call [`DbSession::close`] for a clean shutdown.
pub struct DbSession {
    conn: MySqlConnection,
}

impl DbSession {
    /// Open a connection from the given parameters
    ///
    /// # Errors
    /// Returns [`FetchError::ConnectionFailed`] on connect or auth failure.
    #[instrument(skip(config), fields(host = %config.host, database = %config.database))]
    pub async fn connect(config: &DbConfig) -> Result<Self, FetchError> {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database);

        let conn = options
            .connect()
            .await
            .map_err(|e| FetchError::ConnectionFailed(e.to_string()))?;

        debug!("connection established");
        Ok(Self { conn })
    }

    /// Ordered column names of the inventory table, from the catalog
    ///
    /// # Errors
    /// Returns an error if the catalog query fails or a name cannot be read.
    #[instrument(skip(self))]
    pub async fn inventory_columns(&mut self) -> Result<Vec<String>, FetchError> {
        let rows = sqlx::query(queries::INVENTORY_COLUMNS)
            .bind(queries::INVENTORY_TABLE)
            .fetch_all(&mut self.conn)
            .await
            .map_err(|e| FetchError::QueryFailed(e.to_string()))?;

        let columns = rows
            .iter()
            .map(|row| {
                row.try_get::<String, _>(0).map_err(|e| FetchError::Decode {
                    column: "COLUMN_NAME".to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<String>, FetchError>>()?;

        debug!(count = columns.len(), "discovered inventory columns");
        Ok(columns)
    }

    /// Fetch the inventory row set as positional scalar values.
    ///
    /// An empty table yields an empty vector, not an error.
    ///
    /// # Errors
    /// Returns an error if the query fails or a cell cannot be decoded.
    #[instrument(skip(self, query))]
    pub async fn inventory_rows(&mut self, query: &str) -> Result<Vec<Vec<Value>>, FetchError> {
        let rows = sqlx::query(query)
            .fetch_all(&mut self.conn)
            .await
            .map_err(|e| FetchError::QueryFailed(e.to_string()))?;

        let decoded = rows
            .iter()
            .map(row_values)
            .collect::<Result<Vec<Vec<Value>>, FetchError>>()?;

        debug!(rows = decoded.len(), "fetched inventory rows");
        Ok(decoded)
    }

    /// Close the connection cleanly
    ///
    /// # Errors
    /// Returns [`FetchError::ConnectionFailed`] if the shutdown handshake
    /// fails.
    pub async fn close(self) -> Result<(), FetchError> {
        self.conn
            .close()
            .await
            .map_err(|e| FetchError::ConnectionFailed(e.to_string()))
    }
}

#[async_trait]
impl BindingSource for DbSession {
    async fn categorized_bindings(
        &mut self,
        key: GroupingKey,
        description: &str,
    ) -> Result<Vec<(String, Value)>, BindingError> {
        let rows = sqlx::query(queries::CATEGORIZED_BINDINGS)
            .bind(key.as_str())
            .bind(description)
            .fetch_all(&mut self.conn)
            .await
            .map_err(|e| BindingError(e.to_string()))?;

        rows.iter()
            .map(|row| {
                let name = row
                    .try_get::<String, _>(0)
                    .map_err(|e| BindingError(e.to_string()))?;
                let value = decode_scalar(row, 1).map_err(|e| BindingError(e.to_string()))?;
                Ok((name, value))
            })
            .collect()
    }
}

/// Convert one row to positional scalar values
fn row_values(row: &MySqlRow) -> Result<Vec<Value>, FetchError> {
    (0..row.len()).map(|idx| decode_scalar(row, idx)).collect()
}

/// Decode a single cell to a JSON scalar, dispatching on the column's MySQL
/// type
fn decode_scalar(row: &MySqlRow, idx: usize) -> Result<Value, FetchError> {
    let column = &row.columns()[idx];
    let decode_err = |reason: String| FetchError::Decode {
        column: column.name().to_string(),
        reason,
    };

    let raw = row
        .try_get_raw(idx)
        .map_err(|e| decode_err(e.to_string()))?;
    if raw.is_null() {
        return Ok(Value::Null);
    }

    let value = match column.type_info().name() {
        "BOOLEAN" => Value::Bool(
            row.try_get::<bool, _>(idx)
                .map_err(|e| decode_err(e.to_string()))?,
        ),
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" | "BIT" | "YEAR" => Value::from(
            row.try_get_unchecked::<u64, _>(idx)
                .map_err(|e| decode_err(e.to_string()))?,
        ),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => Value::from(
            row.try_get_unchecked::<i64, _>(idx)
                .map_err(|e| decode_err(e.to_string()))?,
        ),
        "FLOAT" => Value::from(f64::from(
            row.try_get::<f32, _>(idx)
                .map_err(|e| decode_err(e.to_string()))?,
        )),
        "DOUBLE" => Value::from(
            row.try_get::<f64, _>(idx)
                .map_err(|e| decode_err(e.to_string()))?,
        ),
        "DATETIME" | "TIMESTAMP" => Value::String(
            row.try_get::<NaiveDateTime, _>(idx)
                .map_err(|e| decode_err(e.to_string()))?
                .to_string(),
        ),
        "DATE" => Value::String(
            row.try_get::<NaiveDate, _>(idx)
                .map_err(|e| decode_err(e.to_string()))?
                .to_string(),
        ),
        "TIME" => Value::String(
            row.try_get::<NaiveTime, _>(idx)
                .map_err(|e| decode_err(e.to_string()))?
                .to_string(),
        ),
        "JSON" => row
            .try_get::<Value, _>(idx)
            .map_err(|e| decode_err(e.to_string()))?,
        // CHAR, VARCHAR, TEXT variants, ENUM, SET, DECIMAL: take the text
        // representation as-is
        _ => Value::String(
            row.try_get_unchecked::<String, _>(idx)
                .map_err(|e| decode_err(e.to_string()))?,
        ),
    };

    Ok(value)
}
