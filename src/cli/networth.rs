use colored::Colorize;

use super::open_db;
use crate::error::Result;
use crate::fmt::money;
use crate::money::Paise;
use crate::networth;

fn print_total(label: &str, total: Paise) {
    let amount = if total < 0 {
        money(total).red().bold()
    } else {
        money(total).green().bold()
    };
    println!("{label}: {amount}");
}

pub fn member(member_id: i64) -> Result<()> {
    let conn = open_db()?;
    let total = networth::member_net_worth(&conn, member_id)?;
    print_total(&format!("Net worth of member #{member_id}"), total);
    Ok(())
}

pub fn family(family_id: i64) -> Result<()> {
    let conn = open_db()?;
    let total = networth::family_net_worth(&conn, family_id)?;
    print_total(&format!("Net worth of family #{family_id}"), total);
    Ok(())
}
