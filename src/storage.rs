use crate::error::Result;
use crate::models::BankAccount;
use crate::money::Paise;

/// Persistence operations the importer and net worth calculations rely on.
///
/// Every call is synchronous and atomic on its own; callers never get a
/// transaction spanning several calls.
pub trait Storage {
    fn bank_exists(&self, bank_id: i64) -> Result<bool>;
    fn member_exists(&self, member_id: i64) -> Result<bool>;
    fn family_exists(&self, family_id: i64) -> Result<bool>;

    /// `NotFound` when no bank has this id.
    fn bank_name_by_id(&self, bank_id: i64) -> Result<String>;
    /// Case-insensitive. `NotFound` when no bank has this name.
    fn bank_id_by_name(&self, bank_name: &str) -> Result<i64>;

    fn insert_bank_account(
        &self,
        bank_id: i64,
        member_id: i64,
        account_number: &str,
        opening: Paise,
        closing: Paise,
    ) -> Result<i64>;

    /// `NotFound` when no account has this id.
    fn fetch_bank_account(&self, id: i64) -> Result<BankAccount>;
    /// Empty when the member holds no accounts.
    fn list_bank_accounts_by_member(&self, member_id: i64) -> Result<Vec<BankAccount>>;
    fn list_members_by_family(&self, family_id: i64) -> Result<Vec<i64>>;
}
