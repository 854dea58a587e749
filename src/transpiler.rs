//! SQL Transpiler for query templates.
//!
//! Converts templates into Postgres SQL. Every extracted value becomes a
//! bound parameter; wildcards for fuzzy matches are part of the value.

use crate::ast::*;

/// Trait for converting templates to SQL.
pub trait ToSql {
    /// Convert this node to parameterized SQL.
    fn to_sql(&self) -> SqlQuery;
}

impl ToSql for Template {
    fn to_sql(&self) -> SqlQuery {
        match self {
            Template::AllUsers => {
                SqlQuery::fixed("SELECT id, name, email, registration_date FROM users")
            }
            Template::CountUsers => SqlQuery::fixed("SELECT COUNT(*) FROM users"),
            Template::TotalSales => SqlQuery::fixed("SELECT SUM(quantity * price) FROM orders"),
            Template::DistinctProducts => {
                SqlQuery::fixed("SELECT DISTINCT product_name FROM orders")
            }
            Template::OrdersForProduct { product } => {
                let mut q = SqlQuery::fixed("");
                let p = q.bind(contains(product));
                q.sql = format!("SELECT * FROM orders WHERE product_name ILIKE {}", p);
                q
            }
            Template::UsersNamed { name } => {
                let mut q = SqlQuery::fixed("");
                let p = q.bind(contains(name));
                q.sql = format!("SELECT * FROM users WHERE name ILIKE {}", p);
                q
            }
            Template::OrderCountsByProduct => SqlQuery::fixed(
                "SELECT product_name, COUNT(*) FROM orders GROUP BY product_name",
            ),
            Template::ProductQuantities => {
                SqlQuery::fixed("SELECT product_name, quantity FROM orders")
            }
            Template::OrdersPricedAbove { price } => {
                let mut q = SqlQuery::fixed("");
                let p = q.bind(*price);
                q.sql = format!("SELECT * FROM orders WHERE price > {}", p);
                q
            }
            Template::UserNames => SqlQuery::fixed("SELECT name FROM users"),
            Template::UsersWithEmail { email } => {
                let mut q = SqlQuery::fixed("");
                let p = q.bind(email.as_str());
                q.sql = format!("SELECT * FROM users WHERE email ILIKE {}", p);
                q
            }
            Template::UsersRegisteredAfter { date, inclusive } => {
                let mut q = SqlQuery::fixed("");
                let p = q.bind(*date);
                let op = if *inclusive { ">=" } else { ">" };
                q.sql = format!("SELECT * FROM users WHERE registration_date {} {}", op, p);
                q
            }
            Template::OrdersFromUser { name } => {
                let mut q = SqlQuery::fixed("");
                let p = q.bind(contains(name));
                q.sql = format!(
                    "SELECT u.name, o.product_name, o.quantity, o.price, o.order_date \
                     FROM users u JOIN orders o ON u.id = o.user_id \
                     WHERE u.name ILIKE {}",
                    p
                );
                q
            }
            Template::OrdersWithQuantity { quantity } => {
                let mut q = SqlQuery::fixed("");
                let p = q.bind(*quantity);
                q.sql = format!("SELECT * FROM orders WHERE quantity = {}", p);
                q
            }
            Template::UsersRegisteredIn { year } => {
                let mut q = SqlQuery::fixed("");
                let p = q.bind(*year);
                q.sql = format!(
                    "SELECT * FROM users WHERE EXTRACT(YEAR FROM registration_date) = {}",
                    p
                );
                q
            }
        }
    }
}

/// `%value%` pattern for ILIKE.
fn contains(value: &str) -> String {
    format!("%{}%", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fixed_statements_have_no_params() {
        let q = Template::AllUsers.to_sql();
        assert_eq!(q.sql, "SELECT id, name, email, registration_date FROM users");
        assert!(q.params.is_empty());
        assert_eq!(
            Template::OrderCountsByProduct.to_sql().sql,
            "SELECT product_name, COUNT(*) FROM orders GROUP BY product_name"
        );
    }

    #[test]
    fn test_fuzzy_name_is_bound() {
        let q = Template::UsersNamed {
            name: "o'brien".to_string(),
        }
        .to_sql();
        assert_eq!(q.sql, "SELECT * FROM users WHERE name ILIKE $1");
        assert_eq!(q.params, vec![SqlValue::Text("%o'brien%".to_string())]);
    }

    #[test]
    fn test_email_has_no_wildcards() {
        let q = Template::UsersWithEmail {
            email: "alice@example.com".to_string(),
        }
        .to_sql();
        assert_eq!(q.sql, "SELECT * FROM users WHERE email ILIKE $1");
        assert_eq!(q.params, vec![SqlValue::from("alice@example.com")]);
    }

    #[test]
    fn test_registered_after_operator() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let strict = Template::UsersRegisteredAfter {
            date,
            inclusive: false,
        }
        .to_sql();
        assert_eq!(strict.sql, "SELECT * FROM users WHERE registration_date > $1");
        let inclusive = Template::UsersRegisteredAfter {
            date,
            inclusive: true,
        }
        .to_sql();
        assert_eq!(inclusive.sql, "SELECT * FROM users WHERE registration_date >= $1");
        assert_eq!(inclusive.params, vec![SqlValue::Date(date)]);
    }

    #[test]
    fn test_join_query() {
        let q = Template::OrdersFromUser {
            name: "alice smith".to_string(),
        }
        .to_sql();
        assert_eq!(
            q.sql,
            "SELECT u.name, o.product_name, o.quantity, o.price, o.order_date \
             FROM users u JOIN orders o ON u.id = o.user_id WHERE u.name ILIKE $1"
        );
        assert_eq!(q.params, vec![SqlValue::from("%alice smith%")]);
    }

    #[test]
    fn test_year_extract() {
        let q = Template::UsersRegisteredIn { year: 2023 }.to_sql();
        assert_eq!(
            q.sql,
            "SELECT * FROM users WHERE EXTRACT(YEAR FROM registration_date) = $1"
        );
        assert_eq!(q.params, vec![SqlValue::Int(2023)]);
    }
}
