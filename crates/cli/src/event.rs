use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ledgerkit_banking::{AccountEvent, SavingsEvent};
use ledgerkit_dealership::{CarsSold, DealershipEvent, StockAdded};
use ledgerkit_events::Event;

/// Any event recorded by the demo, so one audit trail can hold them all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    Account(AccountEvent),
    Savings(SavingsEvent),
    Dealership(DealershipEvent),
}

impl From<AccountEvent> for LedgerEvent {
    fn from(value: AccountEvent) -> Self {
        LedgerEvent::Account(value)
    }
}

impl From<SavingsEvent> for LedgerEvent {
    fn from(value: SavingsEvent) -> Self {
        LedgerEvent::Savings(value)
    }
}

impl From<DealershipEvent> for LedgerEvent {
    fn from(value: DealershipEvent) -> Self {
        LedgerEvent::Dealership(value)
    }
}

impl From<StockAdded> for LedgerEvent {
    fn from(value: StockAdded) -> Self {
        LedgerEvent::Dealership(value.into())
    }
}

impl From<CarsSold> for LedgerEvent {
    fn from(value: CarsSold) -> Self {
        LedgerEvent::Dealership(value.into())
    }
}

impl Event for LedgerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::Account(e) => e.event_type(),
            LedgerEvent::Savings(e) => e.event_type(),
            LedgerEvent::Dealership(e) => e.event_type(),
        }
    }

    fn version(&self) -> u32 {
        match self {
            LedgerEvent::Account(e) => e.version(),
            LedgerEvent::Savings(e) => e.version(),
            LedgerEvent::Dealership(e) => e.version(),
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            LedgerEvent::Account(e) => e.occurred_at(),
            LedgerEvent::Savings(e) => e.occurred_at(),
            LedgerEvent::Dealership(e) => e.occurred_at(),
        }
    }
}

impl core::fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LedgerEvent::Account(e) => core::fmt::Display::fmt(e, f),
            LedgerEvent::Savings(e) => core::fmt::Display::fmt(e, f),
            LedgerEvent::Dealership(e) => core::fmt::Display::fmt(e, f),
        }
    }
}
