//! One test per catalog rule, plus priority and trigger behaviour.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use super::*;
use crate::ast::{SqlQuery, SqlValue};
use crate::interpreter::Interpreter;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn interpret(query: &str) -> Option<SqlQuery> {
    Interpreter::default().interpret_on(query, today())
}

fn sql(query: &str) -> String {
    interpret(query)
        .unwrap_or_else(|| panic!("no SQL for {:?}", query))
        .sql
}

fn params(query: &str) -> Vec<SqlValue> {
    interpret(query)
        .unwrap_or_else(|| panic!("no SQL for {:?}", query))
        .params
}

#[test]
fn test_catalog_order() {
    let catalog = RuleCatalog::standard();
    assert_eq!(catalog.len(), 15);
    let priorities: Vec<usize> = catalog.iter().map(|r| r.priority).collect();
    assert_eq!(priorities, (1..=15).collect::<Vec<_>>());
    assert_eq!(catalog.iter().next().unwrap().kind, RuleKind::ShowAllUsers);
    assert_eq!(catalog.iter().last().unwrap().kind, RuleKind::UsersRegisteredIn);
}

#[test]
fn test_all_of_trigger() {
    let t = Trigger::AllOf(&["orders from", "user"]);
    assert!(t.matches("orders from user alice"));
    assert!(!t.matches("orders from alice"));
    assert!(Trigger::AnyOf(&["a", "b"]).matches("xbx"));
}

#[test]
fn test_earliest_trigger_wins() {
    let catalog = RuleCatalog::standard();
    let rule = catalog
        .first_triggered("show user names and show all users")
        .unwrap();
    assert_eq!(rule.kind, RuleKind::ShowAllUsers);
    assert_eq!(
        sql("show user names and show all users"),
        "SELECT id, name, email, registration_date FROM users"
    );
}

#[test]
fn test_rule_1_show_all_users() {
    assert_eq!(
        sql("Show all users"),
        "SELECT id, name, email, registration_date FROM users"
    );
}

#[test]
fn test_rule_2_count_users() {
    assert_eq!(sql("How many users are there?"), "SELECT COUNT(*) FROM users");
    assert_eq!(sql("count users"), "SELECT COUNT(*) FROM users");
}

#[test]
fn test_rule_3_total_sales() {
    assert_eq!(
        sql("What is the total sales amount?"),
        "SELECT SUM(quantity * price) FROM orders"
    );
    assert_eq!(
        sql("sum of all orders"),
        "SELECT SUM(quantity * price) FROM orders"
    );
}

#[test]
fn test_rule_4_list_products() {
    assert_eq!(
        sql("List all products"),
        "SELECT DISTINCT product_name FROM orders"
    );
}

#[test]
fn test_rule_5_orders_for_product() {
    assert_eq!(
        sql("Show orders for laptop"),
        "SELECT * FROM orders WHERE product_name ILIKE $1"
    );
    assert_eq!(params("Show orders for laptop"), vec![SqlValue::from("%laptop%")]);
    assert_eq!(
        params("show orders for wireless mouse"),
        vec![SqlValue::from("%wireless mouse%")]
    );
    assert_eq!(interpret("show orders for"), None);
}

#[test]
fn test_rule_6_users_named() {
    assert_eq!(sql("Find users named Alice"), "SELECT * FROM users WHERE name ILIKE $1");
    assert_eq!(params("Find users named Alice"), vec![SqlValue::from("%alice%")]);
    assert_eq!(
        params("Find users named Bob Johnson"),
        vec![SqlValue::from("%bob johnson%")]
    );
    assert_eq!(params("users named zork"), vec![SqlValue::from("%zork%")]);
    assert_eq!(interpret("users named"), None);
}

#[test]
fn test_person_name_stops_before_date_words() {
    assert_eq!(params("users named alice today"), vec![SqlValue::from("%alice%")]);
    assert_eq!(
        params("orders from user bob johnson last week"),
        vec![SqlValue::from("%bob johnson%")]
    );
}

#[test]
fn test_rule_7_count_orders_by_product() {
    assert_eq!(
        sql("Count orders by product name"),
        "SELECT product_name, COUNT(*) FROM orders GROUP BY product_name"
    );
}

#[test]
fn test_rule_8_product_quantities() {
    assert_eq!(
        sql("Show product names and quantities"),
        "SELECT product_name, quantity FROM orders"
    );
    assert_eq!(
        sql("list product names and quantities"),
        "SELECT product_name, quantity FROM orders"
    );
}

#[test]
fn test_rule_9_orders_priced_above() {
    assert_eq!(
        sql("Orders by price greater than 100"),
        "SELECT * FROM orders WHERE price > $1"
    );
    assert_eq!(
        params("Orders by price greater than 100"),
        vec![SqlValue::Float(100.0)]
    );
    assert_eq!(
        params("orders by price greater than 99.5"),
        vec![SqlValue::Float(99.5)]
    );
    assert_eq!(interpret("orders by price greater than ten"), None);
}

#[test]
fn test_rule_10_user_names() {
    for q in ["users name", "user names", "show user names"] {
        assert_eq!(sql(q), "SELECT name FROM users");
    }
}

#[test]
fn test_rule_11_users_with_email() {
    assert_eq!(
        sql("users with email alice@example.com"),
        "SELECT * FROM users WHERE email ILIKE $1"
    );
    assert_eq!(
        params("Find users whose email is Bob@Example.com"),
        vec![SqlValue::from("Bob@Example.com")]
    );
    assert_eq!(interpret("users with email please"), None);
}

#[test]
fn test_rule_12_users_registered_after() {
    assert_eq!(
        sql("users registered after 2023-04-01"),
        "SELECT * FROM users WHERE registration_date > $1"
    );
    assert_eq!(
        params("users registered after 2023-04-01"),
        vec![SqlValue::Date(NaiveDate::from_ymd_opt(2023, 4, 1).unwrap())]
    );
    assert_eq!(
        sql("users registered after last year"),
        "SELECT * FROM users WHERE registration_date >= $1"
    );
    assert_eq!(
        params("users registered after last year"),
        vec![SqlValue::Date(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())]
    );
    assert_eq!(interpret("users registered after the launch"), None);
}

#[test]
fn test_rule_13_orders_from_user() {
    assert_eq!(
        sql("orders from user Alice Smith"),
        "SELECT u.name, o.product_name, o.quantity, o.price, o.order_date \
         FROM users u JOIN orders o ON u.id = o.user_id WHERE u.name ILIKE $1"
    );
    assert_eq!(
        params("orders from user Alice Smith"),
        vec![SqlValue::from("%alice smith%")]
    );
    // Without a recognizable person the word after "from" is used as-is.
    assert_eq!(params("orders from zork the user"), vec![SqlValue::from("%zork%")]);
}

#[test]
fn test_rule_14_orders_with_quantity() {
    assert_eq!(
        sql("show orders with quantity 1"),
        "SELECT * FROM orders WHERE quantity = $1"
    );
    assert_eq!(params("show orders with quantity 1"), vec![SqlValue::Int(1)]);
    assert_eq!(interpret("orders with quantity 2.5"), None);
}

#[test]
fn test_rule_15_users_registered_in() {
    assert_eq!(
        sql("all users registered in 2023"),
        "SELECT * FROM users WHERE EXTRACT(YEAR FROM registration_date) = $1"
    );
    assert_eq!(params("all users registered in 2023"), vec![SqlValue::Int(2023)]);
    assert_eq!(interpret("all users registered in 23"), None);
}

#[test]
fn test_first_number_in_document_order() {
    // The first number wins even when it is not next to the keyword.
    assert_eq!(
        params("top 5 orders by price greater than 100"),
        vec![SqlValue::Float(5.0)]
    );
}

#[test]
fn test_unicode_spaces_between_words() {
    assert_eq!(
        params("orders by price greater than\u{a0}100"),
        vec![SqlValue::Float(100.0)]
    );
    assert_eq!(
        params("show orders for\u{2009}laptop"),
        vec![SqlValue::from("%laptop%")]
    );
    assert_eq!(
        params("all users registered in\u{a0}2023"),
        vec![SqlValue::Int(2023)]
    );
}

#[test]
fn test_quotes_are_bound_not_spliced() {
    let q = interpret("users named o'brien").unwrap();
    assert_eq!(q.sql, "SELECT * FROM users WHERE name ILIKE $1");
    assert!(!q.sql.contains('\''));
    assert_eq!(q.params, vec![SqlValue::from("%o'brien%")]);
}
