//! Dealership module: car inventory with guarded stock counts.
//!
//! This crate contains business rules for the dealership, implemented purely as
//! deterministic domain logic (no IO, no storage).

pub mod car;
pub mod dealership;

pub use car::Car;
pub use dealership::{
    AddStock, CarsSold, Dealership, DealershipCommand, DealershipEvent, Sell, StockAdded,
};
