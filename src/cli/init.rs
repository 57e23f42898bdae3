use std::path::PathBuf;

use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::settings::{get_data_dir, load_settings, save_settings, shellexpand_path, DB_FILE};

pub fn run(data_dir: Option<String>, default_bank: Option<String>) -> Result<()> {
    let mut settings = load_settings();

    let resolved = match data_dir {
        Some(dir) => {
            settings.data_dir = shellexpand_path(&dir);
            PathBuf::from(&settings.data_dir)
        }
        None => get_data_dir(),
    };
    if default_bank.is_some() {
        settings.default_bank = default_bank;
    }

    save_settings(&settings)?;

    std::fs::create_dir_all(&resolved)?;
    std::fs::create_dir_all(resolved.join("statements"))?;

    let conn = get_connection(&resolved.join(DB_FILE))?;
    init_db(&conn)?;

    println!("Initialized homefin at {}", resolved.display());
    Ok(())
}
