use crate::error::{HomefinError, Result};
use crate::money::Paise;
use crate::storage::Storage;

fn sum_closing_balances<S: Storage + ?Sized>(storage: &S, member_id: i64, total: Paise) -> Result<Paise> {
    storage
        .list_bank_accounts_by_member(member_id)?
        .iter()
        .try_fold(total, |acc, acct| {
            acc.checked_add(acct.closing_balance).ok_or_else(|| {
                HomefinError::InvalidInput(format!("net worth of member {member_id} overflows"))
            })
        })
}

/// Sum of closing balances over every account `member_id` holds.
pub fn member_net_worth<S: Storage + ?Sized>(storage: &S, member_id: i64) -> Result<Paise> {
    if !storage.member_exists(member_id)? {
        return Err(HomefinError::NotFound(format!("member {member_id}")));
    }
    sum_closing_balances(storage, member_id, 0)
}

/// Sum of closing balances over every account held by any member of `family_id`.
/// A family without members is worth zero.
pub fn family_net_worth<S: Storage + ?Sized>(storage: &S, family_id: i64) -> Result<Paise> {
    if !storage.family_exists(family_id)? {
        return Err(HomefinError::NotFound(format!("family {family_id}")));
    }
    storage
        .list_members_by_family(family_id)?
        .into_iter()
        .try_fold(0, |total, member_id| sum_closing_balances(storage, member_id, total))
}
