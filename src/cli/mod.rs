pub mod accounts;
pub mod banks;
pub mod family;
pub mod import;
pub mod init;
pub mod member;
pub mod networth;

use clap::{ArgAction, Parser, Subcommand};
use rusqlite::Connection;

use crate::db::get_connection;
use crate::error::{HomefinError, Result};
use crate::settings::get_db_path;

/// Open the configured database, refusing to create one implicitly.
pub(crate) fn open_db() -> Result<Connection> {
    let path = get_db_path();
    if !path.exists() {
        return Err(HomefinError::Settings(format!(
            "database not found at {}. Run `homefin init` first.",
            path.display()
        )));
    }
    get_connection(&path)
}

#[derive(Parser)]
#[command(name = "homefin", about = "Import bank statements and track household net worth.")]
pub struct Cli {
    /// Increase log output (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and initialize the database.
    Init {
        /// Path for homefin data (default: ~/Documents/homefin)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
        /// Bank used by `import` when --bank is omitted
        #[arg(long = "default-bank")]
        default_bank: Option<String>,
    },
    /// Manage families.
    Family {
        #[command(subcommand)]
        command: FamilyCommands,
    },
    /// Manage family members.
    Member {
        #[command(subcommand)]
        command: MemberCommands,
    },
    /// List known banks and whether a statement reader handles them.
    Banks {
        #[command(subcommand)]
        command: Option<BanksCommands>,
    },
    /// List registered statement readers.
    Readers,
    /// Import a bank statement for a member.
    Import {
        /// Path to the statement file
        file: String,
        /// Member ID that owns the account
        #[arg(long)]
        member: i64,
        /// Bank name or ID (default: settings default_bank)
        #[arg(long)]
        bank: Option<String>,
    },
    /// List a member's imported bank accounts.
    Accounts {
        /// Member ID
        #[arg(long)]
        member: i64,
    },
    /// Show net worth.
    Networth {
        #[command(subcommand)]
        command: NetworthCommands,
    },
}

#[derive(Subcommand)]
pub enum FamilyCommands {
    /// Add a family.
    Add {
        /// Family name
        name: String,
    },
    /// List all families.
    List,
    /// Show a family and its members.
    Show {
        /// Family ID
        id: i64,
    },
    /// Rename a family.
    Rename {
        /// Family ID
        id: i64,
        /// New name
        name: String,
    },
    /// Delete a family with all its members and accounts.
    Delete {
        /// Family ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum MemberCommands {
    /// Add a member to a family.
    Add {
        /// Member name
        name: String,
        /// Family ID
        #[arg(long)]
        family: i64,
        /// Short name
        #[arg(long)]
        nickname: Option<String>,
    },
    /// List members of a family.
    List {
        /// Family ID
        #[arg(long)]
        family: i64,
    },
    /// Show one member.
    Show {
        /// Member ID
        id: i64,
    },
    /// Change a member's name and nickname.
    Update {
        /// Member ID
        id: i64,
        /// New name
        name: String,
        /// New short name (omit to clear)
        #[arg(long)]
        nickname: Option<String>,
    },
    /// Delete a member and their accounts.
    Delete {
        /// Member ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum BanksCommands {
    /// Add a bank.
    Add {
        /// Bank name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum NetworthCommands {
    /// Net worth of one member.
    Member {
        /// Member ID
        id: i64,
    },
    /// Net worth of a whole family.
    Family {
        /// Family ID
        id: i64,
    },
}
