use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ledgerkit_core::{Aggregate, AggregateRoot, DomainError, DomainResult, Money};
use ledgerkit_events::Event;

/// Account number. Only the last four digits ever leave this type.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AccountNumber(String);

impl AccountNumber {
    /// Parse a card-style account number; spaces are ignored.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let digits: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        if digits.len() < 4 {
            return Err(DomainError::validation(
                "account number must have at least 4 digits",
            ));
        }
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::validation(
                "account number must contain digits only",
            ));
        }
        Ok(Self(digits))
    }

    pub fn last_four(&self) -> &str {
        &self.0[self.0.len() - 4..]
    }

    /// `**** **** **** 3456`
    pub fn masked(&self) -> String {
        format!("**** **** **** {}", self.last_four())
    }
}

impl core::fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.masked())
    }
}

// Debug output ends up in logs; keep it masked too.
impl core::fmt::Debug for AccountNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "AccountNumber({})", self.masked())
    }
}

/// Aggregate root: Account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    owner: String,
    number: AccountNumber,
    balance: Money,
    version: u64,
}

impl Account {
    /// Open an account with a validated initial balance.
    pub fn open(
        owner: impl Into<String>,
        account_number: &str,
        initial_balance: Money,
    ) -> DomainResult<Self> {
        let owner = owner.into();
        if owner.trim().is_empty() {
            return Err(DomainError::validation("owner cannot be empty"));
        }
        let number = AccountNumber::parse(account_number)?;
        if initial_balance.is_negative() {
            return Err(DomainError::validation(format!(
                "balance cannot be negative ({initial_balance})"
            )));
        }

        Ok(Self {
            owner,
            number,
            balance: initial_balance,
            version: 0,
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn account_number(&self) -> &AccountNumber {
        &self.number
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Replace the balance. Negative amounts are rejected and the balance kept.
    pub fn set_balance(&mut self, amount: Money) -> DomainResult<Vec<AccountEvent>> {
        self.run(
            "set_balance",
            AccountCommand::SetBalance(SetBalance {
                amount,
                occurred_at: Utc::now(),
            }),
        )
    }

    pub fn deposit(&mut self, amount: Money) -> DomainResult<Vec<AccountEvent>> {
        self.run(
            "deposit",
            AccountCommand::Deposit(Deposit {
                amount,
                occurred_at: Utc::now(),
            }),
        )
    }

    pub fn withdraw(&mut self, amount: Money) -> DomainResult<Vec<AccountEvent>> {
        self.run(
            "withdraw",
            AccountCommand::Withdraw(Withdraw {
                amount,
                occurred_at: Utc::now(),
            }),
        )
    }

    fn run(&mut self, op: &'static str, command: AccountCommand) -> DomainResult<Vec<AccountEvent>> {
        match self.execute(&command) {
            Ok(events) => {
                tracing::info!(account = %self.number, op, balance = %self.balance, "account updated");
                Ok(events)
            }
            Err(e) => {
                tracing::warn!(account = %self.number, op, balance = %self.balance, error = %e, "account operation rejected");
                Err(e)
            }
        }
    }
}

impl AggregateRoot for Account {
    type Id = AccountNumber;

    fn id(&self) -> &Self::Id {
        &self.number
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl core::fmt::Display for Account {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Account(owner='{}', account='{}', balance={})",
            self.owner, self.number, self.balance
        )
    }
}

/// Command: SetBalance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetBalance {
    pub amount: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Command: Deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    pub amount: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Command: Withdraw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdraw {
    pub amount: Money,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountCommand {
    SetBalance(SetBalance),
    Deposit(Deposit),
    Withdraw(Withdraw),
}

/// Event: BalanceSet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSet {
    pub previous: Money,
    pub balance: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Event: Deposited. `balance` is the balance after the deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposited {
    pub amount: Money,
    pub balance: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Event: Withdrawn. `balance` is the balance after the withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawn {
    pub amount: Money,
    pub balance: Money,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountEvent {
    BalanceSet(BalanceSet),
    Deposited(Deposited),
    Withdrawn(Withdrawn),
}

impl Event for AccountEvent {
    fn event_type(&self) -> &'static str {
        match self {
            AccountEvent::BalanceSet(_) => "banking.account.balance_set",
            AccountEvent::Deposited(_) => "banking.account.deposited",
            AccountEvent::Withdrawn(_) => "banking.account.withdrawn",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            AccountEvent::BalanceSet(e) => e.occurred_at,
            AccountEvent::Deposited(e) => e.occurred_at,
            AccountEvent::Withdrawn(e) => e.occurred_at,
        }
    }
}

impl core::fmt::Display for AccountEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AccountEvent::BalanceSet(e) => {
                write!(f, "balance set from {} to {}", e.previous, e.balance)
            }
            AccountEvent::Deposited(e) => {
                write!(f, "deposited {}, new balance {}", e.amount, e.balance)
            }
            AccountEvent::Withdrawn(e) => {
                write!(f, "withdrew {}, remaining balance {}", e.amount, e.balance)
            }
        }
    }
}

impl Aggregate for Account {
    type Command = AccountCommand;
    type Event = AccountEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            AccountEvent::BalanceSet(e) => self.balance = e.balance,
            AccountEvent::Deposited(e) => self.balance = e.balance,
            AccountEvent::Withdrawn(e) => self.balance = e.balance,
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            AccountCommand::SetBalance(cmd) => self.handle_set_balance(cmd),
            AccountCommand::Deposit(cmd) => {
                Ok(vec![AccountEvent::Deposited(self.decide_deposit(cmd)?)])
            }
            AccountCommand::Withdraw(cmd) => self.handle_withdraw(cmd),
        }
    }
}

impl Account {
    fn handle_set_balance(&self, cmd: &SetBalance) -> Result<Vec<AccountEvent>, DomainError> {
        if cmd.amount.is_negative() {
            return Err(DomainError::validation(format!(
                "balance cannot be negative ({})",
                cmd.amount
            )));
        }

        Ok(vec![AccountEvent::BalanceSet(BalanceSet {
            previous: self.balance,
            balance: cmd.amount,
            occurred_at: cmd.occurred_at,
        })])
    }

    /// Deposit validation, shared with interest accrual.
    pub(crate) fn decide_deposit(&self, cmd: &Deposit) -> Result<Deposited, DomainError> {
        if !cmd.amount.is_positive() {
            return Err(DomainError::validation(format!(
                "deposit amount must be positive ({})",
                cmd.amount
            )));
        }

        let balance = self
            .balance
            .checked_add(cmd.amount)
            .ok_or_else(|| DomainError::validation("balance overflow"))?;

        Ok(Deposited {
            amount: cmd.amount,
            balance,
            occurred_at: cmd.occurred_at,
        })
    }

    fn handle_withdraw(&self, cmd: &Withdraw) -> Result<Vec<AccountEvent>, DomainError> {
        if !cmd.amount.is_positive() {
            return Err(DomainError::validation(format!(
                "withdrawal amount must be positive ({})",
                cmd.amount
            )));
        }
        if cmd.amount > self.balance {
            return Err(DomainError::insufficient_funds(cmd.amount, self.balance));
        }

        let balance = self
            .balance
            .checked_sub(cmd.amount)
            .ok_or_else(|| DomainError::validation("balance underflow"))?;

        Ok(vec![AccountEvent::Withdrawn(Withdrawn {
            amount: cmd.amount,
            balance,
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn kzt(amount: i64) -> Money {
        Money::from_major(amount)
    }

    fn test_account(balance: i64) -> Account {
        Account::open("Nurlan Koyanbayev", "1234567890123456", kzt(balance)).unwrap()
    }

    #[test]
    fn deposit_withdraw_and_rejected_negative_balance() {
        let mut account = test_account(1000);

        account.deposit(kzt(500)).unwrap();
        assert_eq!(account.balance(), kzt(1500));

        account.withdraw(kzt(300)).unwrap();
        assert_eq!(account.balance(), kzt(1200));

        let err = account.set_balance(kzt(-200)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(account.balance(), kzt(1200));
    }

    #[test]
    fn withdraw_more_than_balance_is_insufficient_funds() {
        let mut account = test_account(1200);

        let err = account.withdraw(kzt(5000)).unwrap_err();
        assert_eq!(err, DomainError::insufficient_funds(kzt(5000), kzt(1200)));
        assert_eq!(account.balance(), kzt(1200));
        assert_eq!(account.version(), 0);
    }

    #[test]
    fn withdraw_entire_balance_is_allowed() {
        let mut account = test_account(1200);
        account.withdraw(kzt(1200)).unwrap();
        assert_eq!(account.balance(), Money::zero());
    }

    #[test]
    fn non_positive_amounts_are_validation_errors() {
        let mut account = test_account(100);

        for amount in [0, -5] {
            assert!(matches!(account.deposit(kzt(amount)), Err(DomainError::Validation(_))));
            assert!(matches!(account.withdraw(kzt(amount)), Err(DomainError::Validation(_))));
        }
        assert_eq!(account.balance(), kzt(100));
    }

    #[test]
    fn set_balance_to_zero_is_allowed() {
        let mut account = test_account(100);
        let events = account.set_balance(Money::zero()).unwrap();
        assert_eq!(
            events,
            vec![AccountEvent::BalanceSet(BalanceSet {
                previous: kzt(100),
                balance: Money::zero(),
                occurred_at: events[0].occurred_at(),
            })]
        );
        assert_eq!(account.balance(), Money::zero());
    }

    #[test]
    fn open_rejects_invalid_input() {
        assert!(Account::open(" ", "1234", kzt(0)).is_err());
        assert!(Account::open("Alikhan", "123", kzt(0)).is_err());
        assert!(Account::open("Alikhan", "12ab5678", kzt(0)).is_err());
        assert!(Account::open("Alikhan", "1234", kzt(-1)).is_err());
        assert!(Account::open("Alikhan", "9876 5432 1098 7654", kzt(0)).is_ok());
    }

    #[test]
    fn account_number_is_masked_everywhere() {
        let account = test_account(1000);

        assert_eq!(account.account_number().masked(), "**** **** **** 3456");
        assert_eq!(
            account.to_string(),
            "Account(owner='Nurlan Koyanbayev', account='**** **** **** 3456', balance=1000.00 KZT)"
        );
        assert!(!format!("{account:?}").contains("1234567890"));
    }

    #[test]
    fn handle_does_not_mutate_state() {
        let account = test_account(1000);
        let before = account.clone();

        let cmd = AccountCommand::Deposit(Deposit {
            amount: kzt(10),
            occurred_at: Utc::now(),
        });
        let events = account.handle(&cmd).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(account, before);
    }

    #[test]
    fn version_increments_on_apply() {
        let mut account = test_account(0);
        account.deposit(kzt(10)).unwrap();
        account.withdraw(kzt(5)).unwrap();
        let _ = account.withdraw(kzt(50));
        assert_eq!(account.version(), 2);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Deposit(i64),
        Withdraw(i64),
        Set(i64),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (-1_000i64..10_000).prop_map(Op::Deposit),
            (-1_000i64..10_000).prop_map(Op::Withdraw),
            (-10_000i64..10_000).prop_map(Op::Set),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        #[test]
        fn balance_never_goes_negative(
            initial in 0i64..10_000,
            ops in prop::collection::vec(op_strategy(), 0..50)
        ) {
            let mut account = test_account(initial);

            for op in ops {
                let before = account.balance();
                let result = match op {
                    Op::Deposit(a) => account.deposit(kzt(a)),
                    Op::Withdraw(a) => account.withdraw(kzt(a)),
                    Op::Set(a) => account.set_balance(kzt(a)),
                };

                if result.is_err() {
                    prop_assert_eq!(account.balance(), before);
                }
                prop_assert!(!account.balance().is_negative());
            }
        }
    }
}
