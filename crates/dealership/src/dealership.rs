use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ledgerkit_core::{Aggregate, AggregateRoot, DomainError, DomainResult, StockError};
use ledgerkit_events::Event;

use crate::car::Car;

/// Aggregate root: Dealership.
///
/// Invariant: every inventory entry has a quantity of at least one. Entries
/// drained by a sale are removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dealership {
    name: String,
    inventory: BTreeMap<Car, u32>,
    version: u64,
}

impl Dealership {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inventory: BTreeMap::new(),
            version: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Units on hand; 0 when the car is not stocked.
    pub fn quantity(&self, car: &Car) -> u32 {
        self.inventory.get(car).copied().unwrap_or(0)
    }

    pub fn inventory(&self) -> impl Iterator<Item = (&Car, u32)> {
        self.inventory.iter().map(|(car, qty)| (car, *qty))
    }

    pub fn is_empty(&self) -> bool {
        self.inventory.is_empty()
    }

    pub fn total_units(&self) -> u64 {
        self.inventory.values().map(|q| u64::from(*q)).sum()
    }

    pub fn add_stock(&mut self, car: &Car, quantity: u32) -> DomainResult<StockAdded> {
        let decided = self.decide_add_stock(&AddStock {
            car: car.clone(),
            quantity,
            occurred_at: Utc::now(),
        });
        self.run(car, "add_stock", decided)
    }

    /// Sell `quantity` units; the returned event carries the total price.
    pub fn sell(&mut self, car: &Car, quantity: u32) -> DomainResult<CarsSold> {
        let decided = self.decide_sell(&Sell {
            car: car.clone(),
            quantity,
            occurred_at: Utc::now(),
        });
        self.run(car, "sell", decided)
    }

    /// Apply an accepted decision and log the outcome either way.
    fn run<T>(&mut self, car: &Car, op: &'static str, decided: DomainResult<T>) -> DomainResult<T>
    where
        T: Clone + Into<DealershipEvent>,
    {
        match decided {
            Ok(event) => {
                self.apply(&event.clone().into());
                tracing::info!(
                    dealership = %self.name,
                    op,
                    car = %car.label(),
                    on_hand = self.quantity(car),
                    "inventory updated"
                );
                Ok(event)
            }
            Err(e) => {
                tracing::warn!(
                    dealership = %self.name,
                    op,
                    car = %car.label(),
                    error = %e,
                    "inventory operation rejected"
                );
                Err(e)
            }
        }
    }
}

impl AggregateRoot for Dealership {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.name
    }

    fn version(&self) -> u64 {
        self.version
    }
}

const RULE: &str = "======================================";

impl core::fmt::Display for Dealership {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "Dealership inventory: {}", self.name)?;
        writeln!(f, "{RULE}")?;

        if self.inventory.is_empty() {
            return writeln!(f, "inventory is empty");
        }

        for (car, quantity) in &self.inventory {
            writeln!(f, "[{quantity} pcs] | {car}")?;
        }
        writeln!(f, "{RULE}")
    }
}

/// Command: AddStock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddStock {
    pub car: Car,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Command: Sell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sell {
    pub car: Car,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DealershipCommand {
    AddStock(AddStock),
    Sell(Sell),
}

/// Event: StockAdded. `on_hand` is the quantity after the addition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdded {
    pub car: Car,
    pub quantity: u32,
    pub on_hand: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CarsSold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarsSold {
    pub car: Car,
    pub quantity: u32,
    pub unit_price: u64,
    /// `unit_price * quantity`, whole tenge.
    pub total_price: u64,
    pub remaining: u32,
    pub occurred_at: DateTime<Utc>,
}

impl CarsSold {
    /// The sale emptied the inventory entry.
    pub fn depleted(&self) -> bool {
        self.remaining == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DealershipEvent {
    StockAdded(StockAdded),
    CarsSold(CarsSold),
}

impl From<StockAdded> for DealershipEvent {
    fn from(value: StockAdded) -> Self {
        DealershipEvent::StockAdded(value)
    }
}

impl From<CarsSold> for DealershipEvent {
    fn from(value: CarsSold) -> Self {
        DealershipEvent::CarsSold(value)
    }
}

impl Event for DealershipEvent {
    fn event_type(&self) -> &'static str {
        match self {
            DealershipEvent::StockAdded(_) => "dealership.inventory.stock_added",
            DealershipEvent::CarsSold(_) => "dealership.inventory.cars_sold",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            DealershipEvent::StockAdded(e) => e.occurred_at,
            DealershipEvent::CarsSold(e) => e.occurred_at,
        }
    }
}

impl core::fmt::Display for DealershipEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DealershipEvent::StockAdded(e) => write!(
                f,
                "added {} x {}, {} on hand",
                e.quantity,
                e.car.label(),
                e.on_hand
            ),
            DealershipEvent::CarsSold(e) => {
                write!(
                    f,
                    "sold {} x {} for {} KZT",
                    e.quantity,
                    e.car.label(),
                    e.total_price
                )?;
                if e.depleted() {
                    write!(f, ", out of stock")
                } else {
                    write!(f, ", {} left", e.remaining)
                }
            }
        }
    }
}

impl Aggregate for Dealership {
    type Command = DealershipCommand;
    type Event = DealershipEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            DealershipEvent::StockAdded(e) => {
                self.inventory.insert(e.car.clone(), e.on_hand);
            }
            DealershipEvent::CarsSold(e) => {
                if e.remaining == 0 {
                    self.inventory.remove(&e.car);
                } else {
                    self.inventory.insert(e.car.clone(), e.remaining);
                }
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            DealershipCommand::AddStock(cmd) => Ok(vec![self.decide_add_stock(cmd)?.into()]),
            DealershipCommand::Sell(cmd) => Ok(vec![self.decide_sell(cmd)?.into()]),
        }
    }
}

impl Dealership {
    fn decide_add_stock(&self, cmd: &AddStock) -> Result<StockAdded, DomainError> {
        if cmd.quantity == 0 {
            return Err(DomainError::validation("quantity to add must be positive"));
        }

        let on_hand = self
            .quantity(&cmd.car)
            .checked_add(cmd.quantity)
            .ok_or_else(|| DomainError::validation("stock quantity overflow"))?;

        Ok(StockAdded {
            car: cmd.car.clone(),
            quantity: cmd.quantity,
            on_hand,
            occurred_at: cmd.occurred_at,
        })
    }

    fn decide_sell(&self, cmd: &Sell) -> Result<CarsSold, DomainError> {
        if cmd.quantity == 0 {
            return Err(DomainError::validation("quantity to sell must be positive"));
        }

        let available = *self.inventory.get(&cmd.car).ok_or_else(|| StockError::NotFound {
            item: cmd.car.label(),
        })?;

        if available < cmd.quantity {
            return Err(StockError::Insufficient {
                item: cmd.car.label(),
                requested: cmd.quantity,
                available,
            }
            .into());
        }

        let total_price = cmd
            .car
            .price()
            .checked_mul(u64::from(cmd.quantity))
            .ok_or_else(|| DomainError::validation("total price overflow"))?;

        Ok(CarsSold {
            car: cmd.car.clone(),
            quantity: cmd.quantity,
            unit_price: cmd.car.price(),
            total_price,
            remaining: available - cmd.quantity,
            occurred_at: cmd.occurred_at,
        })
    }
}
