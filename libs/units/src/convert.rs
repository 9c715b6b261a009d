//! Scale-factor arithmetic between units.
//!
//! Factors are `from.scale / to.scale`. When both scales are exact the factor
//! stays an exact rational; a float scale on either side makes it a float.

use crate::error::{Error, Result};
use crate::number::Number;
use crate::registry::Registry;
use crate::unit::Unit;
use std::cmp::Ordering;

/// Which way a conversion moves along the dimension's scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Identity,
    /// The target unit is smaller, so values grow (`meter -> centimeter`).
    ToSmaller,
    /// The target unit is larger, so values shrink.
    ToLarger,
}

#[derive(Clone, Debug)]
pub struct Conversion {
    pub target: Unit,
    pub factor: Number,
}

impl Conversion {
    pub fn direction(&self) -> Direction {
        match self.factor.total_cmp(&Number::one()) {
            Ordering::Equal => Direction::Identity,
            Ordering::Greater => Direction::ToSmaller,
            Ordering::Less => Direction::ToLarger,
        }
    }

    pub fn apply(&self, value: &Number) -> Number {
        value * &self.factor
    }
}

pub fn factor(from: &Unit, to: &Unit) -> Result<Number> {
    if from.dimension() != to.dimension() {
        return Err(incompatible(from, to));
    }
    if from.ptr_eq(to) {
        return Ok(Number::one());
    }
    from.scale().checked_div(to.scale())
}

/// `value` expressed in `to`. No rounding is applied.
pub fn convert(value: &Number, from: &Unit, to: &Unit) -> Result<Number> {
    Ok(value * &factor(from, to)?)
}

pub fn convertible(from: &Unit, to: &Unit) -> bool {
    from.dimension() == to.dimension()
}

/// Full conversion including component substitution for compound `from` units.
pub(crate) fn resolve(registry: &Registry, from: &Unit, to: &Unit) -> Result<Conversion> {
    if convertible(from, to) {
        return Ok(Conversion {
            target: to.clone(),
            factor: factor(from, to)?,
        });
    }

    let Some(components) = from.components() else {
        return Err(incompatible(from, to));
    };
    let substituted = components
        .substitute(to)
        .ok_or_else(|| Error::AmbiguousComponentConversion {
            from: from.name().to_string(),
            to: to.name().to_string(),
        })?;
    let target = registry.materialize(substituted)?;
    let factor = factor(from, &target)?;
    Ok(Conversion { target, factor })
}

fn incompatible(from: &Unit, to: &Unit) -> Error {
    Error::IncompatibleDimensions {
        from: from.dimension().string_form(),
        to: to.dimension().string_form(),
    }
}
