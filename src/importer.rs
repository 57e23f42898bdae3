use std::io::Read;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{HomefinError, Result};
use crate::models::{BankAccount, BankSelector};
use crate::reader::{parse_file, StatementReader};
use crate::registry::ReaderRegistry;
use crate::storage::Storage;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn resolve_bank_id<S: Storage + ?Sized>(storage: &S, bank: &BankSelector) -> Result<i64> {
    match bank {
        BankSelector::Id(id) => {
            if storage.bank_exists(*id)? {
                Ok(*id)
            } else {
                Err(HomefinError::NotFound(format!("bank {id}")))
            }
        }
        BankSelector::Name(name) => storage.bank_id_by_name(name),
    }
}

fn reader_for<S: Storage + ?Sized>(
    storage: &S,
    registry: &ReaderRegistry,
    bank: &BankSelector,
) -> Result<Box<dyn StatementReader>> {
    let reader = match bank {
        BankSelector::Id(id) => {
            if !storage.bank_exists(*id)? {
                return Err(HomefinError::NotFound(format!("bank {id}")));
            }
            registry.create_by_id(storage, *id)
        }
        BankSelector::Name(name) => registry.create_by_name(name),
    };
    reader.ok_or_else(|| HomefinError::NotFound(format!("statement reader for {bank}")))
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Parse `source` with `reader` and store the result as a new bank account
/// owned by `member_id`. Returns the new account id.
///
/// Nothing is written unless the statement parses and both the bank and the
/// member exist. Importing the same statement twice stores two accounts;
/// use [`find_matching_accounts`] beforehand to detect repeats.
pub fn import_statement<S: Storage + ?Sized>(
    storage: &S,
    reader: &mut dyn StatementReader,
    source: &mut dyn Read,
    member_id: i64,
    bank: &BankSelector,
) -> Result<i64> {
    reader.parse(source)?;
    store_parsed(storage, reader, member_id, bank)
}

/// Validate what `reader` extracted and insert it. Runs only after a
/// successful parse.
fn store_parsed<S: Storage + ?Sized>(
    storage: &S,
    reader: &dyn StatementReader,
    member_id: i64,
    bank: &BankSelector,
) -> Result<i64> {
    let info = reader.extract_account_info().ok_or_else(|| {
        HomefinError::InvalidInput(format!(
            "{} reader parsed the statement but extracted no account",
            reader.bank_id()
        ))
    })?;
    if info.account_number.trim().is_empty() {
        return Err(HomefinError::InvalidInput("statement has an empty account number".into()));
    }

    let bank_id = resolve_bank_id(storage, bank).inspect_err(|e| {
        warn!(%bank, error = %e, "import rejected");
    })?;
    if !storage.member_exists(member_id)? {
        warn!(member_id, "import rejected: unknown member");
        return Err(HomefinError::NotFound(format!("member {member_id}")));
    }

    let id = storage.insert_bank_account(
        bank_id,
        member_id,
        &info.account_number,
        info.opening_balance,
        info.closing_balance,
    )?;
    info!(
        account_id = id,
        bank_id,
        member_id,
        reader = reader.bank_id(),
        "imported bank statement"
    );
    Ok(id)
}

/// Like [`import_statement`], reading the statement from `file_path`.
pub fn import_file_with_reader<S: Storage + ?Sized>(
    storage: &S,
    reader: &mut dyn StatementReader,
    file_path: &Path,
    member_id: i64,
    bank: &BankSelector,
) -> Result<i64> {
    parse_file(reader, file_path)?;
    store_parsed(storage, reader, member_id, bank)
}

/// Import `file_path` with the reader `registry` holds for `bank`.
pub fn import_file<S: Storage + ?Sized>(
    storage: &S,
    registry: &ReaderRegistry,
    file_path: &Path,
    member_id: i64,
    bank: &BankSelector,
) -> Result<i64> {
    let mut reader = reader_for(storage, registry, bank)?;
    import_file_with_reader(storage, reader.as_mut(), file_path, member_id, bank)
}

/// Stored accounts of `candidate.member_id` equal to `candidate`
/// (same bank, same balances, same normalized account number).
pub fn find_matching_accounts<S: Storage + ?Sized>(
    storage: &S,
    candidate: &BankAccount,
) -> Result<Vec<BankAccount>> {
    let matches: Vec<BankAccount> = storage
        .list_bank_accounts_by_member(candidate.member_id)?
        .into_iter()
        .filter(|acct| acct == candidate)
        .collect();
    debug!(%candidate, matches = matches.len(), "looked up matching accounts");
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use rusqlite::Connection;

    use super::*;
    use crate::db::{add_family, add_member, get_connection, init_db};
    use crate::models::ExtractedStatement;
    use crate::money::Paise;
    use crate::reader::{register_builtin_readers, CanaraReader};

    const CANARA_CSV: &str = "\
Account Number,=\"500012456\"
Opening Balance,\"Rs.7,43,483.09\"
Closing Balance,\"Rs.9,99,999.00\"
";

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    fn add_test_member(conn: &Connection) -> i64 {
        let family = add_family(conn, "Rao").unwrap();
        add_member(conn, family, "Daisy", Some("D")).unwrap()
    }

    fn write_statement(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn registry() -> ReaderRegistry {
        let registry = ReaderRegistry::new();
        register_builtin_readers(&registry);
        registry
    }

    fn canara() -> BankSelector {
        BankSelector::Name("Canara".into())
    }

    fn count_accounts(conn: &Connection) -> i64 {
        conn.query_row("SELECT count(*) FROM bank_accounts", [], |r| r.get(0)).unwrap()
    }

    #[test]
    fn test_import_by_name_persists_raw_account() {
        let (dir, conn) = test_db();
        let member = add_test_member(&conn);
        let path = write_statement(dir.path(), "canara.csv", CANARA_CSV);

        let id = import_file(&conn, &registry(), &path, member, &canara()).unwrap();
        assert!(id > 0);
        let acct = conn.fetch_bank_account(id).unwrap();
        assert_eq!(acct.account_number, "500012456");
        assert_eq!(acct.opening_balance, 74348309);
        assert_eq!(acct.closing_balance, 99999900);
        assert_eq!(acct.member_id, member);
        assert_eq!(acct.bank_id, conn.bank_id_by_name("canara").unwrap());
    }

    #[test]
    fn test_import_by_id() {
        let (dir, conn) = test_db();
        let member = add_test_member(&conn);
        let path = write_statement(dir.path(), "canara.csv", CANARA_CSV);
        let bank_id = conn.bank_id_by_name("Canara").unwrap();

        let id = import_file(&conn, &registry(), &path, member, &BankSelector::Id(bank_id)).unwrap();
        assert_eq!(conn.fetch_bank_account(id).unwrap().bank_id, bank_id);
    }

    #[test]
    fn test_import_with_supplied_reader_from_stream() {
        let (_dir, conn) = test_db();
        let member = add_test_member(&conn);
        let mut reader = CanaraReader::default();
        let id = import_statement(
            &conn,
            &mut reader,
            &mut CANARA_CSV.as_bytes(),
            member,
            &canara(),
        )
        .unwrap();
        assert_eq!(conn.fetch_bank_account(id).unwrap().closing_balance, 99999900);
    }

    #[test]
    fn test_reimport_creates_second_row() {
        let (dir, conn) = test_db();
        let member = add_test_member(&conn);
        let path = write_statement(dir.path(), "canara.csv", CANARA_CSV);
        let registry = registry();

        let first = import_file(&conn, &registry, &path, member, &canara()).unwrap();
        let second = import_file(&conn, &registry, &path, member, &canara()).unwrap();
        assert_ne!(first, second);
        assert_eq!(count_accounts(&conn), 2);

        let a = conn.fetch_bank_account(first).unwrap();
        let b = conn.fetch_bank_account(second).unwrap();
        assert_eq!(a, b);
        assert_eq!(find_matching_accounts(&conn, &a).unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_statement_writes_nothing() {
        let (dir, conn) = test_db();
        let member = add_test_member(&conn);
        let path = write_statement(dir.path(), "bad.csv", "Account Number,123\nOpening Balance,1.00\n");
        let err = import_file(&conn, &registry(), &path, member, &canara()).unwrap_err();
        assert!(matches!(err, HomefinError::InvalidInput(_)));
        assert_eq!(count_accounts(&conn), 0);
    }

    #[test]
    fn test_unknown_member_is_not_found() {
        let (dir, conn) = test_db();
        let path = write_statement(dir.path(), "canara.csv", CANARA_CSV);
        let err = import_file(&conn, &registry(), &path, 404, &canara()).unwrap_err();
        assert!(matches!(err, HomefinError::NotFound(_)));
        assert_eq!(count_accounts(&conn), 0);
    }

    #[test]
    fn test_unknown_bank_id_is_not_found() {
        let (dir, conn) = test_db();
        let member = add_test_member(&conn);
        let path = write_statement(dir.path(), "canara.csv", CANARA_CSV);
        let err = import_file(&conn, &registry(), &path, member, &BankSelector::Id(999)).unwrap_err();
        assert!(matches!(err, HomefinError::NotFound(_)));

        let mut reader = CanaraReader::default();
        let err = import_file_with_reader(&conn, &mut reader, &path, member, &BankSelector::Id(999))
            .unwrap_err();
        assert!(matches!(err, HomefinError::NotFound(_)));
        assert_eq!(count_accounts(&conn), 0);
    }

    #[test]
    fn test_bank_without_reader_is_not_found() {
        let (dir, conn) = test_db();
        let member = add_test_member(&conn);
        let path = write_statement(dir.path(), "canara.csv", CANARA_CSV);
        let err = import_file(&conn, &registry(), &path, member, &BankSelector::Name("HDFC".into()))
            .unwrap_err();
        assert!(matches!(err, HomefinError::NotFound(_)));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let (dir, conn) = test_db();
        let member = add_test_member(&conn);
        let err = import_file(&conn, &registry(), &dir.path().join("nope.csv"), member, &canara())
            .unwrap_err();
        assert!(matches!(err, HomefinError::NotFound(_)));
    }

    // -- Test doubles -------------------------------------------------------

    /// A reader that claims success but never yields an account.
    struct HollowReader;

    impl StatementReader for HollowReader {
        fn bank_id(&self) -> &str {
            "hollow"
        }
        fn parse(&mut self, _input: &mut dyn Read) -> Result<()> {
            Ok(())
        }
        fn extract_account_info(&self) -> Option<ExtractedStatement> {
            None
        }
    }

    /// Storage where every reference exists and inserts can be made to fail.
    #[derive(Default)]
    struct FakeStorage {
        fail_insert: bool,
        calls: Cell<usize>,
    }

    impl FakeStorage {
        fn touch(&self) {
            self.calls.set(self.calls.get() + 1);
        }
    }

    impl Storage for FakeStorage {
        fn bank_exists(&self, _bank_id: i64) -> Result<bool> {
            self.touch();
            Ok(true)
        }
        fn member_exists(&self, _member_id: i64) -> Result<bool> {
            self.touch();
            Ok(true)
        }
        fn family_exists(&self, _family_id: i64) -> Result<bool> {
            self.touch();
            Ok(true)
        }
        fn bank_name_by_id(&self, _bank_id: i64) -> Result<String> {
            self.touch();
            Ok("canara".into())
        }
        fn bank_id_by_name(&self, _bank_name: &str) -> Result<i64> {
            self.touch();
            Ok(1)
        }
        fn insert_bank_account(&self, _: i64, _: i64, _: &str, _: Paise, _: Paise) -> Result<i64> {
            self.touch();
            if self.fail_insert {
                Err(HomefinError::Db(rusqlite::Error::QueryReturnedNoRows))
            } else {
                Ok(7)
            }
        }
        fn fetch_bank_account(&self, id: i64) -> Result<BankAccount> {
            Err(HomefinError::NotFound(format!("bank account {id}")))
        }
        fn list_bank_accounts_by_member(&self, _member_id: i64) -> Result<Vec<BankAccount>> {
            Ok(Vec::new())
        }
        fn list_members_by_family(&self, _family_id: i64) -> Result<Vec<i64>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_parse_failure_never_touches_storage() {
        let storage = FakeStorage::default();
        let mut reader = CanaraReader::default();
        let err = import_statement(&storage, &mut reader, &mut "".as_bytes(), 1, &canara())
            .unwrap_err();
        assert!(matches!(err, HomefinError::InvalidInput(_)));
        assert_eq!(storage.calls.get(), 0);
    }

    #[test]
    fn test_missing_extraction_is_invalid_input() {
        let storage = FakeStorage::default();
        let err = import_statement(&storage, &mut HollowReader, &mut "x".as_bytes(), 1, &canara())
            .unwrap_err();
        assert!(matches!(err, HomefinError::InvalidInput(_)));
        assert_eq!(storage.calls.get(), 0);
    }

    #[test]
    fn test_storage_failure_is_db_error() {
        let storage = FakeStorage {
            fail_insert: true,
            ..Default::default()
        };
        let mut reader = CanaraReader::default();
        let err = import_statement(&storage, &mut reader, &mut CANARA_CSV.as_bytes(), 1, &canara())
            .unwrap_err();
        assert!(matches!(err, HomefinError::Db(_)));
    }

    #[test]
    fn test_fake_storage_returns_assigned_id() {
        let storage = FakeStorage::default();
        let mut reader = CanaraReader::default();
        let id = import_statement(&storage, &mut reader, &mut CANARA_CSV.as_bytes(), 1, &canara())
            .unwrap();
        assert_eq!(id, 7);
    }
}
