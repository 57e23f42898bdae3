use comfy_table::{Cell, Table};

use super::open_db;
use crate::db;
use crate::error::Result;

pub fn add(name: &str) -> Result<()> {
    let conn = open_db()?;
    let id = db::add_family(&conn, name)?;
    println!("Added family #{id}: {}", name.trim());
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = open_db()?;
    let families = db::list_families(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name"]);
    for family in families {
        table.add_row(vec![Cell::new(family.id), Cell::new(family.name)]);
    }
    println!("Families\n{table}");
    Ok(())
}

pub fn show(family_id: i64) -> Result<()> {
    let conn = open_db()?;
    let family = db::get_family(&conn, family_id)?;
    let members = db::list_members(&conn, family_id)?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Nickname"]);
    for member in members {
        table.add_row(vec![
            Cell::new(member.id),
            Cell::new(member.name),
            Cell::new(member.nickname.unwrap_or_default()),
        ]);
    }
    println!("Family #{}: {}\n{table}", family.id, family.name);
    Ok(())
}

pub fn rename(family_id: i64, name: &str) -> Result<()> {
    let conn = open_db()?;
    db::update_family_name(&conn, family_id, name)?;
    println!("Renamed family #{family_id} to {}", name.trim());
    Ok(())
}

pub fn delete(family_id: i64) -> Result<()> {
    let conn = open_db()?;
    db::delete_family(&conn, family_id)?;
    println!("Deleted family #{family_id}");
    Ok(())
}
