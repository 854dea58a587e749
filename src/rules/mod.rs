//! The fixed, ordered catalog of question patterns.
//!
//! | #  | Trigger                                   | Template                 |
//! |----|-------------------------------------------|--------------------------|
//! | 1  | `show all users`                          | all users                |
//! | 2  | `how many users`, `count users`           | user count               |
//! | 3  | `total sales`, `sum of all orders`        | sales total              |
//! | 4  | `list all products`                       | distinct products        |
//! | 5  | `orders for`                              | orders by product phrase |
//! | 6  | `users named`                             | users by name            |
//! | 7  | `count orders by product name`            | order count per product  |
//! | 8  | `show/list product names and quantities`  | product + quantity       |
//! | 9  | `orders by price greater than`            | orders above a price     |
//! | 10 | `users name`, `user names`, ...           | user names               |
//! | 11 | `users with email`, ...                   | users by email           |
//! | 12 | `users registered after`                  | users after a date       |
//! | 13 | `orders from` + `user`                    | orders joined to user    |
//! | 14 | `orders with quantity`                    | orders by quantity       |
//! | 15 | `all users registered in`                 | users in a year          |
//!
//! Triggers are case-insensitive substring tests, so one question can
//! trigger several rules. Only the earliest one is ever tried.

mod extract;

#[cfg(test)]
mod tests;

use chrono::NaiveDate;

use crate::annotate::Annotation;
use crate::ast::Template;

/// What a rule extractor gets to look at.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    /// The question as typed.
    pub raw: &'a str,
    /// The question lower-cased.
    pub lowered: &'a str,
    /// Annotation of `lowered`.
    pub annotation: &'a Annotation,
    /// Reference date for relative expressions like "last year".
    pub today: NaiveDate,
}

/// Phrase test over the lower-cased question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Any phrase present.
    AnyOf(&'static [&'static str]),
    /// Every phrase present.
    AllOf(&'static [&'static str]),
}

impl Trigger {
    pub fn matches(&self, lowered: &str) -> bool {
        match self {
            Trigger::AnyOf(phrases) => phrases.iter().any(|p| lowered.contains(p)),
            Trigger::AllOf(phrases) => phrases.iter().all(|p| lowered.contains(p)),
        }
    }

    pub fn phrases(&self) -> &'static [&'static str] {
        match self {
            Trigger::AnyOf(phrases) | Trigger::AllOf(phrases) => phrases,
        }
    }
}

/// One entry per catalog rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    ShowAllUsers,
    CountUsers,
    TotalSales,
    ListProducts,
    OrdersForProduct,
    UsersNamed,
    CountOrdersByProduct,
    ProductQuantities,
    OrdersPricedAbove,
    UserNames,
    UsersWithEmail,
    UsersRegisteredAfter,
    OrdersFromUser,
    OrdersWithQuantity,
    UsersRegisteredIn,
}

impl RuleKind {
    /// Build the template, or `None` when a required value is missing.
    pub fn extract(&self, ctx: &Context<'_>) -> Option<Template> {
        match self {
            RuleKind::ShowAllUsers => Some(Template::AllUsers),
            RuleKind::CountUsers => Some(Template::CountUsers),
            RuleKind::TotalSales => Some(Template::TotalSales),
            RuleKind::ListProducts => Some(Template::DistinctProducts),
            RuleKind::OrdersForProduct => extract::product_after_for(ctx.annotation)
                .map(|product| Template::OrdersForProduct { product }),
            RuleKind::UsersNamed => extract::person_or_word_after(ctx.annotation, "named")
                .map(|name| Template::UsersNamed { name }),
            RuleKind::CountOrdersByProduct => Some(Template::OrderCountsByProduct),
            RuleKind::ProductQuantities => Some(Template::ProductQuantities),
            RuleKind::OrdersPricedAbove => extract::first_float(ctx.annotation)
                .map(|price| Template::OrdersPricedAbove { price }),
            RuleKind::UserNames => Some(Template::UserNames),
            RuleKind::UsersWithEmail => {
                extract::email(ctx.raw).map(|email| Template::UsersWithEmail { email })
            }
            RuleKind::UsersRegisteredAfter => {
                extract::registration_cutoff(ctx.annotation, ctx.lowered, ctx.today)
                    .map(|(date, inclusive)| Template::UsersRegisteredAfter { date, inclusive })
            }
            RuleKind::OrdersFromUser => extract::person_or_word_after(ctx.annotation, "from")
                .map(|name| Template::OrdersFromUser { name }),
            RuleKind::OrdersWithQuantity => extract::first_int(ctx.annotation)
                .map(|quantity| Template::OrdersWithQuantity { quantity }),
            RuleKind::UsersRegisteredIn => extract::four_digit_year(ctx.annotation)
                .map(|year| Template::UsersRegisteredIn { year }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RuleKind::ShowAllUsers => "show-all-users",
            RuleKind::CountUsers => "count-users",
            RuleKind::TotalSales => "total-sales",
            RuleKind::ListProducts => "list-products",
            RuleKind::OrdersForProduct => "orders-for-product",
            RuleKind::UsersNamed => "users-named",
            RuleKind::CountOrdersByProduct => "count-orders-by-product",
            RuleKind::ProductQuantities => "product-quantities",
            RuleKind::OrdersPricedAbove => "orders-priced-above",
            RuleKind::UserNames => "user-names",
            RuleKind::UsersWithEmail => "users-with-email",
            RuleKind::UsersRegisteredAfter => "users-registered-after",
            RuleKind::OrdersFromUser => "orders-from-user",
            RuleKind::OrdersWithQuantity => "orders-with-quantity",
            RuleKind::UsersRegisteredIn => "users-registered-in",
        }
    }

    /// What the rule needs from the question beyond its trigger.
    pub fn needs(&self) -> &'static str {
        match self {
            RuleKind::OrdersForProduct => "noun phrase after \"for\"",
            RuleKind::UsersNamed => "PERSON, else word after \"named\"",
            RuleKind::OrdersPricedAbove => "first number",
            RuleKind::UsersWithEmail => "email address",
            RuleKind::UsersRegisteredAfter => "YYYY-MM-DD date or \"last year\"",
            RuleKind::OrdersFromUser => "PERSON, else word after \"from\"",
            RuleKind::OrdersWithQuantity => "first integer",
            RuleKind::UsersRegisteredIn => "first four-digit number",
            _ => "-",
        }
    }
}

/// A catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    /// 1-based position in the catalog; lower wins.
    pub priority: usize,
    pub kind: RuleKind,
    pub trigger: Trigger,
}

/// Immutable ordered rule list, built once at startup.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    rules: Vec<Rule>,
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl RuleCatalog {
    /// The fifteen built-in rules in priority order.
    pub fn standard() -> Self {
        use RuleKind::*;
        use Trigger::*;

        let entries: [(RuleKind, Trigger); 15] = [
            (ShowAllUsers, AnyOf(&["show all users"])),
            (CountUsers, AnyOf(&["how many users", "count users"])),
            (TotalSales, AnyOf(&["total sales", "sum of all orders"])),
            (ListProducts, AnyOf(&["list all products"])),
            (OrdersForProduct, AnyOf(&["orders for"])),
            (UsersNamed, AnyOf(&["users named"])),
            (CountOrdersByProduct, AnyOf(&["count orders by product name"])),
            (
                ProductQuantities,
                AnyOf(&[
                    "show product names and quantities",
                    "list product names and quantities",
                ]),
            ),
            (OrdersPricedAbove, AnyOf(&["orders by price greater than"])),
            (
                UserNames,
                AnyOf(&["users name", "user names", "show user names"]),
            ),
            (
                UsersWithEmail,
                AnyOf(&["users with email", "users whose email is", "find users email"]),
            ),
            (UsersRegisteredAfter, AnyOf(&["users registered after"])),
            (OrdersFromUser, AllOf(&["orders from", "user"])),
            (OrdersWithQuantity, AnyOf(&["orders with quantity"])),
            (UsersRegisteredIn, AnyOf(&["all users registered in"])),
        ];

        let rules = entries
            .into_iter()
            .enumerate()
            .map(|(i, (kind, trigger))| Rule {
                priority: i + 1,
                kind,
                trigger,
            })
            .collect();

        Self { rules }
    }

    /// The earliest rule whose trigger matches `lowered`.
    pub fn first_triggered(&self, lowered: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.trigger.matches(lowered))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
