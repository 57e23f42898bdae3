use comfy_table::{Cell, Table};

use super::open_db;
use crate::db;
use crate::error::Result;

pub fn add(name: &str, family_id: i64, nickname: Option<&str>) -> Result<()> {
    let conn = open_db()?;
    let id = db::add_member(&conn, family_id, name, nickname)?;
    println!("Added member #{id}: {} (family #{family_id})", name.trim());
    Ok(())
}

pub fn list(family_id: i64) -> Result<()> {
    let conn = open_db()?;
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
    println!("Members of family #{family_id}\n{table}");
    Ok(())
}

pub fn show(member_id: i64) -> Result<()> {
    let conn = open_db()?;
    let member = db::get_member(&conn, member_id)?;
    let nickname = member.nickname.as_deref().unwrap_or("-");
    println!(
        "Member #{}: {} ({nickname}), family #{}",
        member.id, member.name, member.family_id
    );
    Ok(())
}

pub fn update(member_id: i64, name: &str, nickname: Option<&str>) -> Result<()> {
    let conn = open_db()?;
    db::update_member(&conn, member_id, name, nickname)?;
    println!("Updated member #{member_id}");
    Ok(())
}

pub fn delete(member_id: i64) -> Result<()> {
    let conn = open_db()?;
    db::delete_member(&conn, member_id)?;
    println!("Deleted member #{member_id}");
    Ok(())
}
