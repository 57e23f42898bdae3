use std::fmt;

use crate::account_number;
use crate::money::Paise;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Family {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: i64,
    pub family_id: i64,
    pub name: String,
    pub nickname: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bank {
    pub id: i64,
    pub name: String,
}

/// Account-level data pulled out of a statement before it is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedStatement {
    pub account_number: String,
    pub opening_balance: Paise,
    pub closing_balance: Paise,
}

/// A persisted bank account snapshot.
///
/// Equality ignores `id` and compares account numbers after normalization,
/// so two imports of the same statement compare equal.
#[derive(Debug, Clone)]
pub struct BankAccount {
    pub id: i64,
    pub bank_id: i64,
    pub member_id: i64,
    pub account_number: String,
    pub opening_balance: Paise,
    pub closing_balance: Paise,
}

impl PartialEq for BankAccount {
    fn eq(&self, other: &Self) -> bool {
        self.bank_id == other.bank_id
            && self.member_id == other.member_id
            && self.opening_balance == other.opening_balance
            && self.closing_balance == other.closing_balance
            && account_number::same_account(&self.account_number, &other.account_number)
    }
}

impl Eq for BankAccount {}

impl fmt::Display for BankAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BankAccount{{id={}, bank_id={}, member_id={}, account='{}', opening_paise={}, closing_paise={}}}",
            self.id,
            self.bank_id,
            self.member_id,
            self.account_number,
            self.opening_balance,
            self.closing_balance
        )
    }
}

/// Selects a bank either by its database id or by its (case-insensitive) name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankSelector {
    Id(i64),
    Name(String),
}

impl BankSelector {
    /// All-digit text is an id, anything else is a name.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<i64>() {
            Ok(id) if raw.chars().all(|c| c.is_ascii_digit()) => Self::Id(id),
            _ => Self::Name(raw.to_string()),
        }
    }
}

impl fmt::Display for BankSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "bank #{id}"),
            Self::Name(name) => write!(f, "bank '{name}'"),
        }
    }
}
