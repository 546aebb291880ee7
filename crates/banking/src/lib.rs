//! Banking module: accounts with a guarded, never-negative balance.
//!
//! Pure domain logic only: no IO, no persistence concerns.

pub mod account;
pub mod savings;

pub use account::{
    Account, AccountCommand, AccountEvent, AccountNumber, BalanceSet, Deposit, Deposited,
    SetBalance, Withdraw, Withdrawn,
};
pub use savings::{
    AddInterest, InterestAccrued, InterestRate, InterestRateChanged, SavingsAccount,
    SavingsCommand, SavingsEvent, SetInterestRate,
};
