use crate::data::{Account, AccountId};

/// This is where accounts are stored, in insertion order. Names are not unique, so
/// every account is paired with an `AccountId` that tells identical records apart.
/// Single-threaded: the session owns it exclusively while it runs.
#[derive(Debug, Default)]
pub struct Accounts {
    slots: Vec<(AccountId, Account)>,
    next_id: u64,
}

impl Accounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Appends `account` and returns the handle it can be found with later.
    pub fn push(&mut self, account: Account) -> AccountId {
        let id = AccountId(self.next_id);
        self.next_id += 1;
        self.slots.push((id, account));
        id
    }

    /// Every account whose name matches `name` exactly, ignoring case, in registry order.
    pub fn find_by_name(&self, name: &str) -> Vec<AccountId> {
        let wanted = name.to_lowercase();
        self.slots
            .iter()
            .filter(|(_, account)| account.name.to_lowercase() == wanted)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Position of the account behind `id`, if it is still here.
    pub fn index_of(&self, id: AccountId) -> Option<usize> {
        self.slots.iter().position(|(slot, _)| *slot == id)
    }

    /// Removes the account at `index`, shifting the following ones down.
    ///
    /// # Panics
    /// If `index` is out of bounds. Callers resolve positions with `index_of` first, so
    /// this only fires on a bug.
    pub fn remove_at(&mut self, index: usize) -> Account {
        self.slots.remove(index).1
    }

    pub fn get(&self, id: AccountId) -> Option<&Account> {
        self.slots
            .iter()
            .find(|(slot, _)| *slot == id)
            .map(|(_, account)| account)
    }

    pub fn get_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        self.slots
            .iter_mut()
            .find(|(slot, _)| *slot == id)
            .map(|(_, account)| account)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.slots.iter().map(|(_, account)| account)
    }
}

impl FromIterator<Account> for Accounts {
    fn from_iter<I: IntoIterator<Item = Account>>(iter: I) -> Self {
        let mut accounts = Accounts::new();
        for account in iter {
            accounts.push(account);
        }
        accounts
    }
}
