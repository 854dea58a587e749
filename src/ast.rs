//! Query templates over the `users` and `orders` tables.
//!
//! Each variant is one fixed SQL shape; the fields are the values pulled out
//! of the question. Rendering to SQL lives in [`crate::transpiler`].

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// A fully extracted query, ready to transpile.
#[derive(Debug, Clone, PartialEq)]
pub enum Template {
    /// Every user with all columns.
    AllUsers,
    /// Number of users.
    CountUsers,
    /// Sum of `quantity * price` over all orders.
    TotalSales,
    /// Distinct product names.
    DistinctProducts,
    /// Orders whose product name contains `product`.
    OrdersForProduct { product: String },
    /// Users whose name contains `name`.
    UsersNamed { name: String },
    /// Order count per product.
    OrderCountsByProduct,
    /// Product name and quantity of every order.
    ProductQuantities,
    /// Orders priced above `price`.
    OrdersPricedAbove { price: f64 },
    /// Just the user names.
    UserNames,
    /// Users whose email matches `email` (case-insensitive, no wildcards).
    UsersWithEmail { email: String },
    /// Users registered after `date`; `inclusive` turns `>` into `>=`.
    UsersRegisteredAfter { date: NaiveDate, inclusive: bool },
    /// Orders joined with the user whose name contains `name`.
    OrdersFromUser { name: String },
    /// Orders with exactly `quantity` items.
    OrdersWithQuantity { quantity: i64 },
    /// Users registered during `year`.
    UsersRegisteredIn { year: i32 },
}

/// A value bound to a `$n` placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Int(v) => write!(f, "{}", v),
            SqlValue::Float(v) => write!(f, "{:?}", v),
            SqlValue::Text(v) => write!(f, "'{}'", v.replace('\'', "''")),
            SqlValue::Date(v) => write!(f, "'{}'", v.format("%Y-%m-%d")),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v as i64)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        SqlValue::Date(v)
    }
}

/// SQL text with `$1..$n` placeholders and the values to bind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl SqlQuery {
    /// A statement with no bound values.
    pub fn fixed(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Bind the next value and return its placeholder (`$1`, `$2`, ...).
    pub fn bind(&mut self, value: impl Into<SqlValue>) -> String {
        self.params.push(value.into());
        format!("${}", self.params.len())
    }
}

impl fmt::Display for SqlQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}
