use comfy_table::{Cell, Table};

use super::open_db;
use crate::error::{HomefinError, Result};
use crate::fmt::money;
use crate::storage::Storage;

pub fn list(member_id: i64) -> Result<()> {
    let conn = open_db()?;
    if !conn.member_exists(member_id)? {
        return Err(HomefinError::NotFound(format!("member {member_id}")));
    }
    let accounts = conn.list_bank_accounts_by_member(member_id)?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Bank", "Account Number", "Opening", "Closing"]);
    for acct in accounts {
        let bank = conn.bank_name_by_id(acct.bank_id)?;
        table.add_row(vec![
            Cell::new(acct.id),
            Cell::new(bank),
            Cell::new(acct.account_number),
            Cell::new(money(acct.opening_balance)),
            Cell::new(money(acct.closing_balance)),
        ]);
    }
    println!("Accounts of member #{member_id}\n{table}");
    Ok(())
}
