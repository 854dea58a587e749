//! # DataDrill — plain-English questions over users and orders
//!
//! DataDrill turns a question such as *"show orders for laptop"* into a
//! parameterized PostgreSQL query against a fixed `users`/`orders` schema.
//!
//! ## Quick Example
//!
//! ```rust
//! use datadrill::prelude::*;
//!
//! let query = datadrill::interpret("Find users named Alice").unwrap();
//! assert_eq!(query.sql, "SELECT * FROM users WHERE name ILIKE $1");
//! assert_eq!(query.params, vec![SqlValue::from("%alice%")]);
//! ```
//!
//! ## Pipeline
//!
//! | Stage        | Module          | Output                 |
//! |--------------|-----------------|------------------------|
//! | Annotate     | [`annotate`]    | tokens, POS, deps, NER |
//! | Match a rule | [`rules`]       | a [`ast::Template`]    |
//! | Render       | [`transpiler`]  | [`ast::SqlQuery`]      |
//! | Execute      | [`engine`]      | columns and rows       |
//!
//! Questions no rule understands yield `None`, never an error.

pub mod annotate;
pub mod ast;
pub mod config;
pub mod engine;
pub mod error;
pub mod interpreter;
pub mod rules;
pub mod server;
pub mod transpiler;

pub mod prelude {
    pub use crate::annotate::{Annotation, Annotator, LexiconAnnotator};
    pub use crate::ast::*;
    pub use crate::config::Config;
    pub use crate::engine::{QueryResult, Store};
    pub use crate::error::*;
    pub use crate::interpreter::{Explanation, Interpreter};
    pub use crate::rules::{RuleCatalog, RuleKind};
    pub use crate::transpiler::ToSql;
}

/// Interpret a question with the standard catalog and built-in annotator.
///
/// # Example
///
/// ```
/// assert!(datadrill::interpret("how many users are there?").is_some());
/// assert!(datadrill::interpret("what's the weather").is_none());
/// ```
pub fn interpret(query: &str) -> Option<ast::SqlQuery> {
    interpreter::Interpreter::default().interpret(query)
}
