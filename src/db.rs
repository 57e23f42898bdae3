use std::path::Path;

use rusqlite::{Connection, OptionalExtension};

use crate::error::{HomefinError, Result};
use crate::models::{Bank, BankAccount, Family, Member};
use crate::money::Paise;
use crate::storage::Storage;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS families (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS members (
    id INTEGER PRIMARY KEY,
    family_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    nickname TEXT,
    created_at TEXT DEFAULT (datetime('now')),
    FOREIGN KEY (family_id) REFERENCES families(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS banks (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE COLLATE NOCASE
);

CREATE TABLE IF NOT EXISTS bank_accounts (
    id INTEGER PRIMARY KEY,
    bank_id INTEGER NOT NULL,
    member_id INTEGER NOT NULL,
    account_number TEXT NOT NULL,
    opening_balance INTEGER NOT NULL,
    closing_balance INTEGER NOT NULL,
    imported_at TEXT DEFAULT (datetime('now')),
    FOREIGN KEY (bank_id) REFERENCES banks(id),
    FOREIGN KEY (member_id) REFERENCES members(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_bank_accounts_member ON bank_accounts(member_id);
CREATE INDEX IF NOT EXISTS idx_members_family ON members(family_id);
";

const DEFAULT_BANKS: &[&str] = &["Canara", "SBI", "Axis", "HDFC", "PNB"];

pub const MAX_MEMBERS_PER_FAMILY: u32 = 255;

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;

    let count: i64 = conn.query_row("SELECT count(*) FROM banks", [], |row| row.get(0))?;
    if count == 0 {
        for name in DEFAULT_BANKS {
            conn.execute("INSERT INTO banks (name) VALUES (?1)", [name])?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Families, members and banks
// ---------------------------------------------------------------------------

fn require_name<'a>(what: &str, name: &'a str) -> Result<&'a str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(HomefinError::InvalidInput(format!("{what} name must not be empty")));
    }
    Ok(name)
}

pub fn add_family(conn: &Connection, name: &str) -> Result<i64> {
    let name = require_name("family", name)?;
    conn.execute("INSERT INTO families (name) VALUES (?1)", [name])?;
    Ok(conn.last_insert_rowid())
}

pub fn list_families(conn: &Connection) -> Result<Vec<Family>> {
    let mut stmt = conn.prepare("SELECT id, name FROM families ORDER BY id")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Family {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn get_family(conn: &Connection, family_id: i64) -> Result<Family> {
    conn.query_row(
        "SELECT id, name FROM families WHERE id = ?1",
        [family_id],
        |row| {
            Ok(Family {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        },
    )
    .optional()?
    .ok_or_else(|| HomefinError::NotFound(format!("family {family_id}")))
}

pub fn update_family_name(conn: &Connection, family_id: i64, name: &str) -> Result<()> {
    let name = require_name("family", name)?;
    let updated = conn.execute(
        "UPDATE families SET name = ?1 WHERE id = ?2",
        rusqlite::params![name, family_id],
    )?;
    if updated == 0 {
        return Err(HomefinError::NotFound(format!("family {family_id}")));
    }
    Ok(())
}

/// Delete a family together with its members and their accounts.
pub fn delete_family(conn: &Connection, family_id: i64) -> Result<()> {
    let deleted = conn.execute("DELETE FROM families WHERE id = ?1", [family_id])?;
    if deleted == 0 {
        return Err(HomefinError::NotFound(format!("family {family_id}")));
    }
    Ok(())
}

pub fn add_member(conn: &Connection, family_id: i64, name: &str, nickname: Option<&str>) -> Result<i64> {
    let name = require_name("member", name)?;
    if !conn.family_exists(family_id)? {
        return Err(HomefinError::NotFound(format!("family {family_id}")));
    }
    let count: u32 = conn.query_row(
        "SELECT count(*) FROM members WHERE family_id = ?1",
        [family_id],
        |row| row.get(0),
    )?;
    if count >= MAX_MEMBERS_PER_FAMILY {
        return Err(HomefinError::MaxMembersExceeded {
            family_id,
            max: MAX_MEMBERS_PER_FAMILY,
        });
    }
    conn.execute(
        "INSERT INTO members (family_id, name, nickname) VALUES (?1, ?2, ?3)",
        rusqlite::params![family_id, name, nickname],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_members(conn: &Connection, family_id: i64) -> Result<Vec<Member>> {
    let mut stmt = conn.prepare(
        "SELECT id, family_id, name, nickname FROM members WHERE family_id = ?1 ORDER BY id",
    )?;
    let rows = stmt
        .query_map([family_id], |row| {
            Ok(Member {
                id: row.get(0)?,
                family_id: row.get(1)?,
                name: row.get(2)?,
                nickname: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn get_member(conn: &Connection, member_id: i64) -> Result<Member> {
    conn.query_row(
        "SELECT id, family_id, name, nickname FROM members WHERE id = ?1",
        [member_id],
        |row| {
            Ok(Member {
                id: row.get(0)?,
                family_id: row.get(1)?,
                name: row.get(2)?,
                nickname: row.get(3)?,
            })
        },
    )
    .optional()?
    .ok_or_else(|| HomefinError::NotFound(format!("member {member_id}")))
}

/// Replace a member's name and nickname. `None` clears the nickname.
pub fn update_member(conn: &Connection, member_id: i64, name: &str, nickname: Option<&str>) -> Result<()> {
    let name = require_name("member", name)?;
    let updated = conn.execute(
        "UPDATE members SET name = ?1, nickname = ?2 WHERE id = ?3",
        rusqlite::params![name, nickname, member_id],
    )?;
    if updated == 0 {
        return Err(HomefinError::NotFound(format!("member {member_id}")));
    }
    Ok(())
}

pub fn delete_member(conn: &Connection, member_id: i64) -> Result<()> {
    let deleted = conn.execute("DELETE FROM members WHERE id = ?1", [member_id])?;
    if deleted == 0 {
        return Err(HomefinError::NotFound(format!("member {member_id}")));
    }
    Ok(())
}

pub fn add_bank(conn: &Connection, name: &str) -> Result<i64> {
    let name = require_name("bank", name)?;
    conn.execute("INSERT INTO banks (name) VALUES (?1)", [name])?;
    Ok(conn.last_insert_rowid())
}

pub fn list_banks(conn: &Connection) -> Result<Vec<Bank>> {
    let mut stmt = conn.prepare("SELECT id, name FROM banks ORDER BY id")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Bank {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Storage implementation
// ---------------------------------------------------------------------------

fn exists(conn: &Connection, sql: &str, id: i64) -> Result<bool> {
    let mut stmt = conn.prepare_cached(sql)?;
    Ok(stmt.exists([id])?)
}

fn bank_account_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<BankAccount> {
    Ok(BankAccount {
        id: row.get(0)?,
        bank_id: row.get(1)?,
        member_id: row.get(2)?,
        account_number: row.get(3)?,
        opening_balance: row.get(4)?,
        closing_balance: row.get(5)?,
    })
}

impl Storage for Connection {
    fn bank_exists(&self, bank_id: i64) -> Result<bool> {
        exists(self, "SELECT 1 FROM banks WHERE id = ?1", bank_id)
    }

    fn member_exists(&self, member_id: i64) -> Result<bool> {
        exists(self, "SELECT 1 FROM members WHERE id = ?1", member_id)
    }

    fn family_exists(&self, family_id: i64) -> Result<bool> {
        exists(self, "SELECT 1 FROM families WHERE id = ?1", family_id)
    }

    fn bank_name_by_id(&self, bank_id: i64) -> Result<String> {
        self.query_row("SELECT name FROM banks WHERE id = ?1", [bank_id], |row| row.get(0))
            .optional()?
            .ok_or_else(|| HomefinError::NotFound(format!("bank {bank_id}")))
    }

    fn bank_id_by_name(&self, bank_name: &str) -> Result<i64> {
        self.query_row(
            "SELECT id FROM banks WHERE name = ?1 COLLATE NOCASE LIMIT 1",
            [bank_name.trim()],
            |row| row.get(0),
        )
        .optional()?
        .ok_or_else(|| HomefinError::NotFound(format!("bank '{bank_name}'")))
    }

    fn insert_bank_account(
        &self,
        bank_id: i64,
        member_id: i64,
        account_number: &str,
        opening: Paise,
        closing: Paise,
    ) -> Result<i64> {
        self.execute(
            "INSERT INTO bank_accounts (bank_id, member_id, account_number, opening_balance, closing_balance) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![bank_id, member_id, account_number, opening, closing],
        )?;
        Ok(self.last_insert_rowid())
    }

    fn fetch_bank_account(&self, id: i64) -> Result<BankAccount> {
        self.query_row(
            "SELECT id, bank_id, member_id, account_number, opening_balance, closing_balance \
             FROM bank_accounts WHERE id = ?1",
            [id],
            bank_account_from_row,
        )
        .optional()?
        .ok_or_else(|| HomefinError::NotFound(format!("bank account {id}")))
    }

    fn list_bank_accounts_by_member(&self, member_id: i64) -> Result<Vec<BankAccount>> {
        let mut stmt = self.prepare_cached(
            "SELECT id, bank_id, member_id, account_number, opening_balance, closing_balance \
             FROM bank_accounts WHERE member_id = ?1 ORDER BY id",
        )?;
        let rows = stmt
            .query_map([member_id], bank_account_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn list_members_by_family(&self, family_id: i64) -> Result<Vec<i64>> {
        let mut stmt = self.prepare_cached("SELECT id FROM members WHERE family_id = ?1 ORDER BY id")?;
        let rows = stmt
            .query_map([family_id], |row| row.get(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
