//! Bank statement readers.
//!
//! Each bank export format gets its own [`StatementReader`]. Readers are
//! never constructed by name outside the registry; callers go through
//! [`crate::registry`] so new banks can be added without touching the
//! importer.

mod canara;
mod sbi;

use std::io::Read;
use std::path::Path;

use crate::error::{HomefinError, Result};
use crate::models::ExtractedStatement;
use crate::money::{parse_money, Paise};
use crate::registry::ReaderRegistry;

pub use canara::CanaraReader;
pub use sbi::SbiReader;

pub const ACCOUNT_NUMBER_LABEL: &str = "Account Number";
pub const OPENING_BALANCE_LABEL: &str = "Opening Balance";
pub const CLOSING_BALANCE_LABEL: &str = "Closing Balance";

pub trait StatementReader {
    /// Lowercase identifier of the format this reader handles, e.g. `"canara"`.
    fn bank_id(&self) -> &str;

    /// Consume the whole input and keep the extracted fields.
    ///
    /// Fails with `InvalidInput` unless the account number and both
    /// balances were found. The input is borrowed, never closed.
    fn parse(&mut self, input: &mut dyn Read) -> Result<()>;

    /// `None` until a successful [`parse`](Self::parse).
    fn extract_account_info(&self) -> Option<ExtractedStatement>;
}

/// Open `path` and hand it to `reader`. A missing file is `NotFound`.
pub fn parse_file(reader: &mut dyn StatementReader, path: &Path) -> Result<()> {
    let mut file = std::fs::File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            HomefinError::NotFound(format!("statement file {}", path.display()))
        }
        _ => HomefinError::Io(e),
    })?;
    reader.parse(&mut file)
}

/// Register every reader shipped with homefin. Safe to call repeatedly.
pub fn register_builtin_readers(registry: &ReaderRegistry) {
    registry.register("Canara", || {
        Some(Box::new(CanaraReader::default()) as Box<dyn StatementReader>)
    });
    registry.register("SBI", || {
        Some(Box::new(SbiReader::default()) as Box<dyn StatementReader>)
    });
}

/// Strip spreadsheet escape artifacts (`="..."`) from an account number cell.
pub(crate) fn clean_account_field(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '=' | '"'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Fields collected while scanning a labelled statement.
#[derive(Debug, Default, Clone)]
pub(crate) struct LabelledFields {
    account_number: Option<String>,
    opening: Option<Paise>,
    closing: Option<Paise>,
}

impl LabelledFields {
    /// Record `value` if `label` is one of the known row labels.
    /// Unparseable balances and empty account numbers are left unset.
    pub(crate) fn apply(&mut self, label: &str, value: &str, clean_account: fn(&str) -> String) {
        match label {
            ACCOUNT_NUMBER_LABEL => {
                let account = clean_account(value);
                if !account.is_empty() {
                    self.account_number = Some(account);
                }
            }
            OPENING_BALANCE_LABEL => {
                if let Ok(paise) = parse_money(value) {
                    self.opening = Some(paise);
                }
            }
            CLOSING_BALANCE_LABEL => {
                if let Ok(paise) = parse_money(value) {
                    self.closing = Some(paise);
                }
            }
            _ => {}
        }
    }

    pub(crate) fn complete(&self) -> Option<ExtractedStatement> {
        Some(ExtractedStatement {
            account_number: self.account_number.clone()?,
            opening_balance: self.opening?,
            closing_balance: self.closing?,
        })
    }

    /// The missing labels, for error messages.
    pub(crate) fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.account_number.is_none() {
            missing.push(ACCOUNT_NUMBER_LABEL);
        }
        if self.opening.is_none() {
            missing.push(OPENING_BALANCE_LABEL);
        }
        if self.closing.is_none() {
            missing.push(CLOSING_BALANCE_LABEL);
        }
        missing
    }

    pub(crate) fn finish(&self, bank_id: &str) -> Result<()> {
        let missing = self.missing();
        if missing.is_empty() {
            return Ok(());
        }
        Err(HomefinError::InvalidInput(format!(
            "{bank_id} statement is missing: {}",
            missing.join(", ")
        )))
    }
}
