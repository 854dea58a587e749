//! Store tests against a live PostgreSQL.
//!
//! Run: `DATADRILL_DATABASE_URL=postgres://... cargo test --test store_integration -- --ignored`

use datadrill::config::DatabaseConfig;
use datadrill::prelude::*;
use serde_json::json;

async fn seeded_store() -> DrillResult<Store> {
    let mut config = DatabaseConfig::default();
    if let Ok(url) = std::env::var("DATADRILL_DATABASE_URL") {
        config.url = url;
    }
    let store = Store::connect(&config).await?;
    store.bootstrap().await?;
    store.seed().await?;
    Ok(store)
}

fn sql(question: &str) -> SqlQuery {
    datadrill::interpret(question).unwrap_or_else(|| panic!("no SQL for {:?}", question))
}

#[tokio::test]
#[ignore = "Requires PostgreSQL - run with --ignored"]
async fn test_empty_result_keeps_columns() -> DrillResult<()> {
    let store = seeded_store().await?;

    let result = store.fetch(&sql("show orders for zork")).await?;

    assert!(result.rows.is_empty());
    assert_eq!(
        result.columns,
        vec!["id", "user_id", "product_name", "quantity", "price", "order_date"]
    );
    Ok(())
}

#[tokio::test]
#[ignore = "Requires PostgreSQL - run with --ignored"]
async fn test_user_lookup_cells() -> DrillResult<()> {
    let store = seeded_store().await?;

    let result = store.fetch(&sql("users with email alice@example.com")).await?;

    assert_eq!(
        result.columns,
        vec!["id", "name", "email", "registration_date"]
    );
    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.rows[0][1], json!("Alice Smith"));
    assert_eq!(result.rows[0][3], json!("2023-01-15"));
    Ok(())
}

#[tokio::test]
#[ignore = "Requires PostgreSQL - run with --ignored"]
async fn test_numeric_as_decimal_string() -> DrillResult<()> {
    let store = seeded_store().await?;

    let result = store.fetch(&sql("orders by price greater than 1000")).await?;

    assert!(!result.rows.is_empty());
    let price = result.columns.iter().position(|c| c == "price").unwrap();
    assert!(result.rows.iter().all(|row| row[price] == json!("1200.00")));
    Ok(())
}
