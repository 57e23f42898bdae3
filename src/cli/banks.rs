use colored::Colorize;
use comfy_table::{Cell, Table};

use super::open_db;
use crate::db;
use crate::error::Result;
use crate::registry;

pub fn add(name: &str) -> Result<()> {
    let conn = open_db()?;
    let id = db::add_bank(&conn, name)?;
    println!("Added bank #{id}: {}", name.trim());
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = open_db()?;
    let banks = db::list_banks(&conn)?;
    let registry = registry::global();

    let mut table = Table::new();
    table.set_header(vec!["ID", "Bank", "Reader"]);
    for bank in banks {
        let reader = if registry.is_registered(&bank.name) {
            "yes".green()
        } else {
            "no".dimmed()
        };
        table.add_row(vec![Cell::new(bank.id), Cell::new(bank.name), Cell::new(reader)]);
    }
    println!("Banks\n{table}");
    Ok(())
}

pub fn readers() -> Result<()> {
    let mut names = registry::global().list_registered();
    names.sort();
    for name in names {
        println!("{name}");
    }
    Ok(())
}
