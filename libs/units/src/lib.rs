//! Dimension and unit algebra.
//!
//! Dimensions are reduced products of named base dimensions; units are named
//! scale points on a dimension. A [`Registry`] owns the name tables and interns
//! compound units built by multiplying, dividing or exponentiating units, and
//! [`convert`] derives exact (rational) or approximate (float) factors between
//! units of one dimension.
//!
//! ```
//! use gauge_units::{catalog, convert, Number};
//!
//! let registry = catalog::standard();
//! let meter = registry.unit("meter").unwrap();
//! let centimeter = registry.unit("centimeter").unwrap();
//! let value = convert::convert(&Number::integer(12), &meter, &centimeter).unwrap();
//! assert_eq!(value, Number::integer(1200));
//! ```

#![forbid(unsafe_code)]

mod compound;
mod config;
pub mod convert;
mod dimension;
mod error;
pub mod expr;
mod number;
mod quantity;
mod registry;
mod unit;

#[cfg(feature = "catalog")]
pub mod catalog;

pub use compound::{ComponentMap, Product, UnitPower};
pub use config::{AliasPolicy, RegistryOptions};
pub use convert::{Conversion, Direction};
pub use dimension::{Component, Dimension, DimensionVector};
pub use error::{Error, Result};
pub use number::Number;
pub use quantity::Quantity;
pub use registry::Registry;
pub use unit::Unit;
