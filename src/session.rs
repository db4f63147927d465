use crate::{
    data::{Account, AccountId, Error},
    prompt::Console,
    registry::Accounts,
};
use rust_decimal::Decimal;
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

const LOGIN_MENU: &str = "
Hello, to get started, please enter an option from below. (0-2)

[1] - Search and login
[2] - Open account

[0] - Close program

>";

const INVALID_INPUT: &str = "\nInvalid input, please try again.\n";
const INVALID_AMOUNT: &str = "\nPlease enter an amount such as 25.00.\n";

fn account_menu(account: &Account) -> String {
    format!(
        "
Hello {}! You currently have ${:.2}.
Please enter an option from below. (0-5)

Fund Management
[1] - Deposit funds
[2] - Withdraw funds

Account Settings
[3] - Account information
[4] - Log-out
[5] - Close this account

[0] - Close program

>",
        account.name, account.balance
    )
}

/// What the session is currently doing. Login modes run without a current account,
/// account modes with one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Main menu: search, open an account or quit.
    LoginIdle,
    /// Look up accounts by full name and pick one of the matches.
    LoginSearch,
    /// Walk through opening an account, then log into it.
    LoginOpenAccount,
    /// Account menu.
    AccountIdle,
    AccountDeposit,
    AccountWithdraw,
    AccountInfo,
    AccountLogout,
    /// Remove the current account from the registry.
    AccountClose,
    ExitProgram,
}

/// Result of one `Session::advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Continue,
    Terminate,
}

/// The interactive session: the registry, the account the user is logged into, and the
/// mode. Each call to `advance` runs one prompt/response cycle.
pub struct Session<R, W> {
    accounts: Accounts,
    current: Option<AccountId>,
    mode: AccessMode,
    console: Console<R, W>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(accounts: Accounts, console: Console<R, W>) -> Self {
        Self {
            accounts,
            current: None,
            mode: AccessMode::LoginIdle,
            console,
        }
    }

    /// Runs the handler of the current mode and moves to the mode it picks.
    /// Returns `Status::Terminate` once the session reaches `AccessMode::ExitProgram`,
    /// which also happens when the input runs out.
    pub fn advance(&mut self) -> Result<Status, Error> {
        let next = match self.step() {
            Ok(next) => next,
            Err(Error::InputClosed) => {
                warn!(mode = ?self.mode, "input closed, ending session");
                AccessMode::ExitProgram
            }
            Err(e) => return Err(e),
        };
        if next != self.mode {
            debug!(from = ?self.mode, to = ?next, "mode change");
            self.mode = next;
        }
        Ok(match self.mode {
            AccessMode::ExitProgram => Status::Terminate,
            _ => Status::Continue,
        })
    }

    /// Hands back the registry and the output stream once the session is over.
    pub fn into_inner(self) -> (Accounts, W) {
        (self.accounts, self.console.into_output())
    }

    fn step(&mut self) -> Result<AccessMode, Error> {
        use AccessMode::*;
        match self.mode {
            LoginIdle => self.login_idle(),
            LoginSearch => self.login_search(),
            LoginOpenAccount => self.login_open_account(),
            AccountIdle => self.account_idle(),
            AccountDeposit => self.account_deposit(),
            AccountWithdraw => self.account_withdraw(),
            AccountInfo => self.account_info(),
            AccountLogout => self.account_logout(),
            AccountClose => self.account_close(),
            ExitProgram => Ok(ExitProgram),
        }
    }

    fn account(&self, id: AccountId) -> Result<&Account, Error> {
        self.accounts.get(id).ok_or(Error::Dangling(id))
    }

    fn account_mut(&mut self, id: AccountId) -> Result<&mut Account, Error> {
        self.accounts.get_mut(id).ok_or(Error::Dangling(id))
    }

    fn login_idle(&mut self) -> Result<AccessMode, Error> {
        if self.current.is_some() {
            return Ok(AccessMode::AccountIdle);
        }
        Ok(match self.console.integer(LOGIN_MENU)? {
            Some(0) => AccessMode::ExitProgram,
            Some(1) => AccessMode::LoginSearch,
            Some(2) => AccessMode::LoginOpenAccount,
            _ => {
                self.console.say(INVALID_INPUT)?;
                AccessMode::LoginIdle
            }
        })
    }

    fn login_search(&mut self) -> Result<AccessMode, Error> {
        let name = self
            .console
            .line("\nPlease input your full name here.\n>")?;
        let found = self.accounts.find_by_name(&name);
        if found.is_empty() {
            self.console.say("\nNo accounts were found under that name.")?;
            return Ok(AccessMode::LoginIdle);
        }

        self.console
            .say("Here is the list of accounts that we found:\n")?;
        for (i, id) in found.iter().enumerate() {
            let account = self.account(*id)?;
            let row = format!("[{}] - {:<30} {:>30}", i + 1, account.name, account.address);
            self.console.say(&row)?;
        }
        let choice = self
            .console
            .integer("[0] - Exit\n\nSelect one from the list to proceed.\n>")?;

        // Anything but a listed number means no selection.
        if let Some(n) = choice {
            if let Some(id) = usize::try_from(n)
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| found.get(i))
            {
                self.current = Some(*id);
                info!(account = %id, "logged in");
            }
        }
        Ok(AccessMode::LoginIdle)
    }

    fn login_open_account(&mut self) -> Result<AccessMode, Error> {
        let account = self.open_and_confirm_account()?;
        let id = self.accounts.push(account);
        info!(account = %id, "account opened");
        self.current = Some(id);
        Ok(AccessMode::AccountIdle)
    }

    /// Asks for the three fields until they are well formed, then for a confirmation.
    /// A refusal starts over from the name.
    fn open_and_confirm_account(&mut self) -> Result<Account, Error> {
        loop {
            let name = self.non_empty_line("\nWhat is your first and last name?\n>")?;
            let address = self.non_empty_line("\nWhat is your address?\n>")?;
            let balance = loop {
                match self.console.amount(
                    "\nHow many funds would you like to put in for your initial deposit?\n$",
                )? {
                    Some(amount) if amount < Decimal::ZERO => {
                        self.console.say(&Error::NegativeAmount.to_string())?
                    }
                    Some(amount) => break amount,
                    None => self.console.say(INVALID_AMOUNT)?,
                }
            };

            let account = Account::new(name, address, balance);
            let summary = format!(
                "Name provided : {}\nAddress provided : {}\nBalance deposited : ${:.2}\n",
                account.name, account.address, account.balance
            );
            self.console.say(&summary)?;
            if self.console.confirm("Is this information correct? (Y/N)\n>")? {
                return Ok(account);
            }
        }
    }

    fn non_empty_line(&mut self, prompt: &str) -> Result<String, Error> {
        loop {
            let line = self.console.line(prompt)?;
            if !line.is_empty() {
                return Ok(line);
            }
        }
    }

    fn account_idle(&mut self) -> Result<AccessMode, Error> {
        let Some(id) = self.current else {
            return Ok(AccessMode::LoginIdle);
        };
        let menu = account_menu(self.account(id)?);
        Ok(match self.console.integer(&menu)? {
            Some(0) => AccessMode::ExitProgram,
            Some(1) => AccessMode::AccountDeposit,
            Some(2) => AccessMode::AccountWithdraw,
            Some(3) => AccessMode::AccountInfo,
            Some(4) => AccessMode::AccountLogout,
            Some(5) => AccessMode::AccountClose,
            _ => {
                self.console.say(INVALID_INPUT)?;
                AccessMode::AccountIdle
            }
        })
    }

    fn account_deposit(&mut self) -> Result<AccessMode, Error> {
        let Some(id) = self.current else {
            return Ok(AccessMode::LoginIdle);
        };
        let Some(amount) = self
            .console
            .amount("\nHow much would you like to deposit?\n$")?
        else {
            self.console.say(INVALID_AMOUNT)?;
            return Ok(AccessMode::AccountDeposit);
        };
        match self.account_mut(id)?.deposit(amount) {
            Ok(()) => Ok(AccessMode::AccountIdle),
            Err(e @ (Error::NegativeAmount | Error::Overflow)) => {
                self.console.say(&e.to_string())?;
                Ok(AccessMode::AccountDeposit)
            }
            Err(e) => Err(e),
        }
    }

    fn account_withdraw(&mut self) -> Result<AccessMode, Error> {
        let Some(id) = self.current else {
            return Ok(AccessMode::LoginIdle);
        };
        let Some(amount) = self
            .console
            .amount("\nHow much would you like to withdraw?\n$")?
        else {
            self.console.say(INVALID_AMOUNT)?;
            return Ok(AccessMode::AccountWithdraw);
        };
        let target = match self.account(id)?.withdrawal_target(amount) {
            Ok(target) => target,
            Err(e @ (Error::NegativeAmount | Error::Overflow)) => {
                self.console.say(&e.to_string())?;
                return Ok(AccessMode::AccountWithdraw);
            }
            Err(e) => return Err(e),
        };

        if target < Decimal::ZERO {
            let question = format!(
                "Are you sure you wish to withdraw ${amount:.2}?\n\
                 This transaction can put your account into the negatives. (Y/N)\n>"
            );
            if !self.console.confirm(&question)? {
                return Ok(AccessMode::AccountIdle);
            }
        }
        self.account_mut(id)?.balance = target;
        Ok(AccessMode::AccountIdle)
    }

    fn account_info(&mut self) -> Result<AccessMode, Error> {
        let Some(id) = self.current else {
            return Ok(AccessMode::LoginIdle);
        };
        let account = self.account(id)?;
        let info = format!(
            "\nName : {}\nAddress : {}\nBalance : ${:.2}",
            account.name, account.address, account.balance
        );
        self.console.say(&info)?;
        Ok(AccessMode::AccountIdle)
    }

    fn account_logout(&mut self) -> Result<AccessMode, Error> {
        if self
            .console
            .confirm("Are you sure you wish to log out? (Y/N)\n>")?
        {
            self.current = None;
            return Ok(AccessMode::LoginIdle);
        }
        Ok(AccessMode::AccountIdle)
    }

    fn account_close(&mut self) -> Result<AccessMode, Error> {
        let Some(id) = self.current else {
            return Ok(AccessMode::LoginIdle);
        };
        if !self
            .console
            .confirm("Are you SURE you wish to close your account? (Y/N)\n>")?
        {
            return Ok(AccessMode::AccountIdle);
        }
        let index = self.accounts.index_of(id).ok_or(Error::Dangling(id))?;
        self.accounts.remove_at(index);
        self.current = None;
        info!(account = %id, "account closed");
        Ok(AccessMode::LoginIdle)
    }
}

#[cfg(test)]
impl<R: BufRead, W: Write> Session<R, W> {
    fn mode(&self) -> AccessMode {
        self.mode
    }

    fn current(&self) -> Option<&Account> {
        self.current.and_then(|id| self.accounts.get(id))
    }
}
