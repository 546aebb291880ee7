//! The demonstration scenarios.
//!
//! Every rejected operation is reported inline and the scenario continues.

use std::io::{self, Write};

use rust_decimal::Decimal;

use ledgerkit_banking::{Account, SavingsAccount};
use ledgerkit_core::{DomainResult, Money};
use ledgerkit_dealership::{Car, Dealership};

use crate::transcript::Transcript;

fn kzt(amount: i64) -> Money {
    Money::from_major(amount)
}

// Audit stream ids. Account numbers stay out of the trail.
const ACCOUNT_ID: &str = "acc-1";
const SAVINGS_ID: &str = "acc-2";

/// Account and savings account walkthrough.
pub fn run_bank<W: Write>(t: &mut Transcript<W>) -> io::Result<()> {
    t.heading("1. Account")?;
    let mut account = match Account::open("Nurlan Koyanbayev", "1234567890123456", kzt(1000)) {
        Ok(account) => account,
        Err(e) => return t.line(format!("error: {e}")),
    };
    let id = ACCOUNT_ID;
    t.line(&account)?;

    t.outcome("account", id, account.deposit(kzt(500)))?;
    t.outcome("account", id, account.withdraw(kzt(300)))?;

    t.blank()?;
    t.line("[check] setting a negative balance:")?;
    t.outcome("account", id, account.set_balance(kzt(-200)))?;
    t.line(format!("balance (unchanged): {}", account.balance()))?;

    t.blank()?;
    t.line("[check] withdrawing more than the balance:")?;
    t.outcome("account", id, account.withdraw(kzt(5000)))?;
    t.line(&account)?;

    t.heading("2. SavingsAccount")?;
    let mut savings = match SavingsAccount::open(
        "Alikhan Smailov",
        "9876543210987654",
        kzt(10_000),
        Decimal::new(5, 2),
    ) {
        Ok(savings) => savings,
        Err(e) => return t.line(format!("error: {e}")),
    };
    let id = SAVINGS_ID;
    t.line(&savings)?;

    t.outcome("savings", id, savings.add_interest())?;
    t.line(&savings)?;

    t.blank()?;
    t.line("[check] setting an invalid interest rate:")?;
    t.outcome("savings", id, savings.set_interest_rate(Decimal::from(2)))?;
    t.line(format!("rate (unchanged): {}", savings.interest_rate()))
}

fn showroom() -> DomainResult<[Car; 4]> {
    Ok([
        Car::new("Toyota", "Camry 75", 2024, 18_000_000)?,
        Car::new("Hyundai", "Elantra", 2023, 11_500_000)?,
        Car::new("BMW", "X7", 2024, 45_000_000)?,
        Car::new("Audi", "A8", 2024, 35_000_000)?,
    ])
}

/// Dealership stock and sales walkthrough.
pub fn run_dealership<W: Write>(t: &mut Transcript<W>) -> io::Result<()> {
    t.heading("3. Dealership")?;
    let [camry, elantra, x7, audi] = match showroom() {
        Ok(cars) => cars,
        Err(e) => return t.line(format!("error: {e}")),
    };
    let mut dealership = Dealership::new("Astana Motors LUX");
    let id = dealership.name().to_string();

    t.single("dealership", &id, dealership.add_stock(&camry, 5))?;
    t.single("dealership", &id, dealership.add_stock(&elantra, 10))?;
    t.single("dealership", &id, dealership.add_stock(&x7, 2))?;
    t.single("dealership", &id, dealership.add_stock(&camry, 3))?;
    t.line(&dealership)?;

    if let Some(sale) = t.single("dealership", &id, dealership.sell(&elantra, 4))? {
        t.line(format!("total: {} KZT", sale.total_price))?;
    }
    t.line(&dealership)?;

    t.line("[check] selling more than in stock:")?;
    t.single("dealership", &id, dealership.sell(&x7, 5))?;

    t.blank()?;
    t.line("[check] selling a car that was never stocked:")?;
    t.single("dealership", &id, dealership.sell(&audi, 1))?;

    t.blank()?;
    t.line(&dealership)
}

/// Both walkthroughs followed by the audit trail.
pub fn run_all<W: Write>(t: &mut Transcript<W>) -> io::Result<()> {
    run_bank(t)?;
    run_dealership(t)?;

    t.heading("audit trail")?;
    let rendered = t.trail().to_string();
    t.line(rendered.trim_end())
}
