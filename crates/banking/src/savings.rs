//! Savings accounts: an [`Account`] plus a bounded interest rate.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgerkit_core::{Aggregate, AggregateRoot, DomainError, DomainResult, Money};
use ledgerkit_events::Event;

use crate::account::{
    Account, AccountCommand, AccountEvent, AccountNumber, Deposit, Deposited, SetBalance, Withdraw,
};

/// Interest rate as a fraction, within `[0.0, 0.5]`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterestRate(Decimal);

impl InterestRate {
    pub const MAX: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

    pub fn new(rate: Decimal) -> DomainResult<Self> {
        if rate < Decimal::ZERO || rate > Self::MAX {
            return Err(DomainError::validation(format!(
                "interest rate ({rate}) must be between 0 and {}",
                Self::MAX
            )));
        }
        Ok(Self(rate))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl core::fmt::Display for InterestRate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.2}%", (self.0 * Decimal::ONE_HUNDRED).round_dp(2))
    }
}

/// Aggregate root: SavingsAccount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavingsAccount {
    account: Account,
    interest_rate: InterestRate,
    version: u64,
}

impl SavingsAccount {
    pub fn open(
        owner: impl Into<String>,
        account_number: &str,
        initial_balance: Money,
        interest_rate: Decimal,
    ) -> DomainResult<Self> {
        let interest_rate = InterestRate::new(interest_rate)?;
        let account = Account::open(owner, account_number, initial_balance)?;

        Ok(Self {
            account,
            interest_rate,
            version: 0,
        })
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn owner(&self) -> &str {
        self.account.owner()
    }

    pub fn account_number(&self) -> &AccountNumber {
        self.account.account_number()
    }

    pub fn balance(&self) -> Money {
        self.account.balance()
    }

    pub fn interest_rate(&self) -> InterestRate {
        self.interest_rate
    }

    /// Change the rate. Out-of-range rates are rejected and the prior rate kept.
    pub fn set_interest_rate(&mut self, rate: Decimal) -> DomainResult<Vec<SavingsEvent>> {
        self.run(
            "set_interest_rate",
            SavingsCommand::SetInterestRate(SetInterestRate {
                rate,
                occurred_at: Utc::now(),
            }),
        )
    }

    /// Deposit `balance * rate` (rounded to tiyn).
    pub fn add_interest(&mut self) -> DomainResult<Vec<SavingsEvent>> {
        self.run(
            "add_interest",
            SavingsCommand::AddInterest(AddInterest {
                occurred_at: Utc::now(),
            }),
        )
    }

    pub fn deposit(&mut self, amount: Money) -> DomainResult<Vec<SavingsEvent>> {
        self.run_account(
            "deposit",
            AccountCommand::Deposit(Deposit {
                amount,
                occurred_at: Utc::now(),
            }),
        )
    }

    pub fn withdraw(&mut self, amount: Money) -> DomainResult<Vec<SavingsEvent>> {
        self.run_account(
            "withdraw",
            AccountCommand::Withdraw(Withdraw {
                amount,
                occurred_at: Utc::now(),
            }),
        )
    }

    pub fn set_balance(&mut self, amount: Money) -> DomainResult<Vec<SavingsEvent>> {
        self.run_account(
            "set_balance",
            AccountCommand::SetBalance(SetBalance {
                amount,
                occurred_at: Utc::now(),
            }),
        )
    }

    fn run_account(
        &mut self,
        op: &'static str,
        command: AccountCommand,
    ) -> DomainResult<Vec<SavingsEvent>> {
        self.run(op, SavingsCommand::Account(command))
    }

    fn run(&mut self, op: &'static str, command: SavingsCommand) -> DomainResult<Vec<SavingsEvent>> {
        match self.execute(&command) {
            Ok(events) => {
                tracing::info!(
                    account = %self.account.account_number(),
                    op,
                    balance = %self.balance(),
                    rate = %self.interest_rate,
                    "savings account updated"
                );
                Ok(events)
            }
            Err(e) => {
                tracing::warn!(
                    account = %self.account.account_number(),
                    op,
                    error = %e,
                    "savings account operation rejected"
                );
                Err(e)
            }
        }
    }
}

impl AggregateRoot for SavingsAccount {
    type Id = AccountNumber;

    fn id(&self) -> &Self::Id {
        self.account.account_number()
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl core::fmt::Display for SavingsAccount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "SavingsAccount(owner='{}', account='{}', balance={}, rate={})",
            self.owner(),
            self.account_number(),
            self.balance(),
            self.interest_rate
        )
    }
}

/// Command: SetInterestRate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetInterestRate {
    pub rate: Decimal,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddInterest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddInterest {
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SavingsCommand {
    Account(AccountCommand),
    SetInterestRate(SetInterestRate),
    AddInterest(AddInterest),
}

/// Event: InterestRateChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestRateChanged {
    pub previous: InterestRate,
    pub rate: InterestRate,
    pub occurred_at: DateTime<Utc>,
}

/// Event: InterestAccrued. Applied exactly like the wrapped deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestAccrued {
    pub rate: InterestRate,
    pub deposit: Deposited,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SavingsEvent {
    Account(AccountEvent),
    InterestRateChanged(InterestRateChanged),
    InterestAccrued(InterestAccrued),
}

impl Event for SavingsEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SavingsEvent::Account(e) => e.event_type(),
            SavingsEvent::InterestRateChanged(_) => "banking.savings.interest_rate_changed",
            SavingsEvent::InterestAccrued(_) => "banking.savings.interest_accrued",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            SavingsEvent::Account(e) => e.occurred_at(),
            SavingsEvent::InterestRateChanged(e) => e.occurred_at,
            SavingsEvent::InterestAccrued(e) => e.deposit.occurred_at,
        }
    }
}

impl core::fmt::Display for SavingsEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SavingsEvent::Account(e) => core::fmt::Display::fmt(e, f),
            SavingsEvent::InterestRateChanged(e) => {
                write!(f, "interest rate changed from {} to {}", e.previous, e.rate)
            }
            SavingsEvent::InterestAccrued(e) => write!(
                f,
                "interest of {} at {} deposited, new balance {}",
                e.deposit.amount, e.rate, e.deposit.balance
            ),
        }
    }
}

impl Aggregate for SavingsAccount {
    type Command = SavingsCommand;
    type Event = SavingsEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            SavingsEvent::Account(e) => self.account.apply(e),
            SavingsEvent::InterestRateChanged(e) => self.interest_rate = e.rate,
            SavingsEvent::InterestAccrued(e) => self
                .account
                .apply(&AccountEvent::Deposited(e.deposit.clone())),
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            SavingsCommand::Account(cmd) => Ok(self
                .account
                .handle(cmd)?
                .into_iter()
                .map(SavingsEvent::Account)
                .collect()),
            SavingsCommand::SetInterestRate(cmd) => self.handle_set_rate(cmd),
            SavingsCommand::AddInterest(cmd) => self.handle_add_interest(cmd),
        }
    }
}

impl SavingsAccount {
    fn handle_set_rate(&self, cmd: &SetInterestRate) -> Result<Vec<SavingsEvent>, DomainError> {
        let rate = InterestRate::new(cmd.rate)?;

        Ok(vec![SavingsEvent::InterestRateChanged(InterestRateChanged {
            previous: self.interest_rate,
            rate,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_add_interest(&self, cmd: &AddInterest) -> Result<Vec<SavingsEvent>, DomainError> {
        let interest = self
            .balance()
            .checked_scale(self.interest_rate.value())
            .ok_or_else(|| DomainError::validation("interest overflow"))?;

        tracing::debug!(interest = %interest, rate = %self.interest_rate, "interest computed");

        let deposit = self.account.decide_deposit(&Deposit {
            amount: interest,
            occurred_at: cmd.occurred_at,
        })?;

        Ok(vec![SavingsEvent::InterestAccrued(InterestAccrued {
            rate: self.interest_rate,
            deposit,
        })])
    }
}
