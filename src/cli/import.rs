use std::path::PathBuf;

use super::open_db;
use crate::error::{HomefinError, Result};
use crate::fmt::money;
use crate::importer::{find_matching_accounts, import_file};
use crate::models::BankSelector;
use crate::registry;
use crate::settings::load_settings;
use crate::storage::Storage;

pub fn run(file: &str, member_id: i64, bank: Option<&str>) -> Result<()> {
    let bank = match bank {
        Some(b) => b.to_string(),
        None => load_settings().default_bank.ok_or_else(|| {
            HomefinError::InvalidInput("no --bank given and no default_bank configured".into())
        })?,
    };
    let selector = BankSelector::parse(&bank);
    let file_path = PathBuf::from(file);
    let conn = open_db()?;

    let id = import_file(&conn, registry::global(), &file_path, member_id, &selector)?;
    let account = conn.fetch_bank_account(id)?;

    println!(
        "Imported account #{id} ({}) for member #{member_id}\n  Opening: {}\n  Closing: {}",
        account.account_number,
        money(account.opening_balance),
        money(account.closing_balance)
    );

    let snapshots = find_matching_accounts(&conn, &account)?.len();
    if snapshots > 1 {
        println!("Note: {snapshots} identical snapshots of this account are now stored.");
    }
    Ok(())
}
