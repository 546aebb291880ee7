//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. A `Car` with the
/// same brand, model, year and price as another is the same inventory key;
/// `Money` of 1500 is equal to any other `Money` of 1500.
///
/// To "modify" a value object, build a new one.
///
/// ```ignore
/// let a = Money::from_major(1500);
/// let b = Money::from_major(1000).checked_add(Money::from_major(500)).unwrap();
/// assert_eq!(a, b);
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
