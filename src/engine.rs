//! Database execution engine.
//!
//! Runs interpreted queries against PostgreSQL with sqlx and turns rows
//! into JSON cells. Also owns the schema bootstrap and sample data.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::query::Query;
use sqlx::{Column, Executor, PgPool, Postgres, Row, TypeInfo};

use crate::ast::{SqlQuery, SqlValue};
use crate::config::DatabaseConfig;
use crate::error::{DrillError, DrillResult};

/// Column names plus rows of JSON cells, in select order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

/// Handle on the `users`/`orders` store.
#[derive(Clone)]
pub struct Store {
    pool: PgPool,
}

const CREATE_USERS: &str = "CREATE TABLE IF NOT EXISTS users (
    id SERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT UNIQUE NOT NULL,
    registration_date DATE NOT NULL
)";

const CREATE_ORDERS: &str = "CREATE TABLE IF NOT EXISTS orders (
    id SERIAL PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users (id),
    product_name TEXT NOT NULL,
    quantity INTEGER NOT NULL,
    price NUMERIC(10, 2) NOT NULL,
    order_date DATE NOT NULL
)";

const SAMPLE_USERS: &[(&str, &str, &str)] = &[
    ("Alice Smith", "alice@example.com", "2023-01-15"),
    ("Bob Johnson", "bob@example.com", "2023-02-20"),
    ("Charlie Brown", "charlie@example.com", "2023-03-01"),
    ("Diana Prince", "diana@example.com", "2023-04-10"),
    ("Eve Adams", "eve@example.com", "2024-05-05"),
];

/// `(user email, product, quantity, price, order date)`.
const SAMPLE_ORDERS: &[(&str, &str, i32, &str, &str)] = &[
    ("alice@example.com", "Laptop", 1, "1200.00", "2023-06-01"),
    ("alice@example.com", "Mouse", 2, "25.00", "2023-06-01"),
    ("bob@example.com", "Keyboard", 1, "75.00", "2023-07-10"),
    ("charlie@example.com", "Monitor", 1, "300.00", "2023-08-15"),
    ("diana@example.com", "Webcam", 1, "50.00", "2023-09-01"),
    ("alice@example.com", "Headphones", 1, "150.00", "2023-10-20"),
    ("eve@example.com", "Smartwatch", 1, "250.00", "2024-06-01"),
    ("bob@example.com", "SSD", 1, "80.00", "2024-07-25"),
];

impl Store {
    /// Connect with the configured pool size.
    pub async fn connect(config: &DatabaseConfig) -> DrillResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await
            .map_err(|e| DrillError::Connection(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Build the pool without connecting; the first query connects.
    pub fn connect_lazy(config: &DatabaseConfig) -> DrillResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_lazy(&config.url)
            .map_err(|e| DrillError::Config(format!("Invalid database URL: {}", e)))?;

        Ok(Self { pool })
    }

    /// Run a read query and collect every row.
    ///
    /// Column names are reported even when no row matches.
    pub async fn fetch(&self, query: &SqlQuery) -> DrillResult<QueryResult> {
        let rows: Vec<PgRow> = bind_all(sqlx::query(&query.sql), &query.params)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::warn!(sql = %query.sql, error = %e, "query failed");
                DrillError::from(e)
            })?;

        let columns = match rows.first() {
            Some(row) => column_names(row.columns()),
            None => self.describe_columns(&query.sql).await?,
        };

        Ok(QueryResult {
            columns,
            rows: rows.iter().map(row_to_cells).collect(),
        })
    }

    async fn describe_columns(&self, sql: &str) -> DrillResult<Vec<String>> {
        let describe = (&self.pool).describe(sql).await?;
        Ok(column_names(describe.columns()))
    }

    /// Create `users` and `orders` if they do not exist.
    pub async fn bootstrap(&self) -> DrillResult<()> {
        sqlx::query(CREATE_USERS).execute(&self.pool).await?;
        sqlx::query(CREATE_ORDERS).execute(&self.pool).await?;
        tracing::info!("schema ready");
        Ok(())
    }

    /// Insert the sample users and orders in one transaction.
    ///
    /// Users already present (by email) are kept; returns the number of
    /// orders inserted.
    pub async fn seed(&self) -> DrillResult<u64> {
        let mut tx = self.pool.begin().await?;

        for (name, email, registered) in SAMPLE_USERS {
            sqlx::query(
                "INSERT INTO users (name, email, registration_date) VALUES ($1, $2, $3) \
                 ON CONFLICT (email) DO NOTHING",
            )
            .bind(*name)
            .bind(*email)
            .bind(parse_date(registered)?)
            .execute(&mut *tx)
            .await?;
        }

        let mut inserted = 0;
        for (email, product, quantity, price, ordered) in SAMPLE_ORDERS {
            let price: Decimal = price
                .parse()
                .map_err(|e| DrillError::Config(format!("Bad sample price {}: {}", price, e)))?;
            let result = sqlx::query(
                "INSERT INTO orders (user_id, product_name, quantity, price, order_date) \
                 SELECT id, $2, $3, $4, $5 FROM users WHERE email = $1",
            )
            .bind(*email)
            .bind(*product)
            .bind(*quantity)
            .bind(price)
            .bind(parse_date(ordered)?)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        tracing::info!(orders = inserted, "sample data inserted");
        Ok(inserted)
    }
}

fn parse_date(s: &str) -> DrillResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| DrillError::Config(format!("Bad sample date {}: {}", s, e)))
}

fn bind_all<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &'q [SqlValue],
) -> Query<'q, Postgres, PgArguments> {
    for param in params {
        query = match param {
            SqlValue::Int(v) => query.bind(*v),
            SqlValue::Float(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.as_str()),
            SqlValue::Date(v) => query.bind(*v),
        };
    }
    query
}

fn column_names<C: Column>(columns: &[C]) -> Vec<String> {
    columns.iter().map(|c| c.name().to_string()).collect()
}

/// Convert a PgRow into JSON cells.
fn row_to_cells(row: &PgRow) -> Vec<serde_json::Value> {
    use serde_json::Value;

    row.columns()
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let type_name = column.type_info().name();
            let cell = match type_name {
                "BOOL" => row.try_get::<Option<bool>, _>(i).map(|v| v.map(Value::Bool)),
                "INT2" => row
                    .try_get::<Option<i16>, _>(i)
                    .map(|v| v.map(|n| Value::from(i64::from(n)))),
                "INT4" => row
                    .try_get::<Option<i32>, _>(i)
                    .map(|v| v.map(|n| Value::from(i64::from(n)))),
                "INT8" => row.try_get::<Option<i64>, _>(i).map(|v| v.map(Value::from)),
                "FLOAT4" => row
                    .try_get::<Option<f32>, _>(i)
                    .map(|v| v.and_then(|f| float_cell(f64::from(f)))),
                "FLOAT8" => row
                    .try_get::<Option<f64>, _>(i)
                    .map(|v| v.and_then(float_cell)),
                "NUMERIC" => row
                    .try_get::<Option<Decimal>, _>(i)
                    .map(|v| v.map(|d| Value::String(d.to_string()))),
                "DATE" => row
                    .try_get::<Option<NaiveDate>, _>(i)
                    .map(|v| v.map(|d| Value::String(d.format("%Y-%m-%d").to_string()))),
                _ => row.try_get::<Option<String>, _>(i).map(|v| v.map(Value::String)),
            };

            match cell {
                Ok(value) => value.unwrap_or(Value::Null),
                Err(e) => {
                    tracing::warn!(
                        column = column.name(),
                        r#type = type_name,
                        error = %e,
                        "could not decode cell, using null"
                    );
                    Value::Null
                }
            }
        })
        .collect()
}

fn float_cell(v: f64) -> Option<serde_json::Value> {
    serde_json::Number::from_f64(v).map(serde_json::Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_data_is_valid() {
        for (_, _, date) in SAMPLE_USERS {
            assert!(parse_date(date).is_ok());
        }
        for (email, _, _, price, date) in SAMPLE_ORDERS {
            assert!(SAMPLE_USERS.iter().any(|(_, e, _)| e == email));
            assert!(price.parse::<Decimal>().is_ok());
            assert!(parse_date(date).is_ok());
        }
    }

    #[test]
    fn test_float_cells() {
        assert_eq!(float_cell(1.5), Some(serde_json::json!(1.5)));
        assert_eq!(float_cell(f64::NAN), None);
        assert_eq!(float_cell(f64::INFINITY), None);
    }

    #[tokio::test]
    async fn test_connect_lazy_rejects_bad_url() {
        let config = DatabaseConfig {
            url: "not a url".to_string(),
            max_connections: 1,
        };
        assert!(matches!(
            Store::connect_lazy(&config),
            Err(DrillError::Config(_))
        ));
    }
}
