use crate::convert;
use crate::error::{Error, Result};
use crate::number::Number;
use crate::registry::Registry;
use crate::unit::Unit;
use std::cmp::Ordering;
use std::fmt;

/// A value paired with the unit it is expressed in.
///
/// Values are never rounded implicitly: exact inputs stay exact through
/// conversion and arithmetic unless a float-scaled unit is involved.
#[derive(Clone, Debug, PartialEq)]
pub struct Quantity {
    pub value: Number,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(value: impl Into<Number>, unit: Unit) -> Self {
        Self {
            value: value.into(),
            unit,
        }
    }

    /// The value expressed in the dimension's reference unit.
    pub fn reference_value(&self) -> Number {
        &self.value * self.unit.scale()
    }

    /// Convert into a unit of the same dimension.
    pub fn in_unit(&self, unit: &Unit) -> Result<Quantity> {
        Ok(Quantity {
            value: convert::convert(&self.value, &self.unit, unit)?,
            unit: unit.clone(),
        })
    }

    /// Convert into `unit`, or into the compound obtained by substituting
    /// `unit` for one component (`10 meter/second` to `foot` gives `foot/second`).
    pub fn convert_to(&self, registry: &Registry, unit: &Unit) -> Result<Quantity> {
        let conversion = registry.conversion(&self.unit, unit)?;
        Ok(Quantity {
            value: conversion.apply(&self.value),
            unit: conversion.target,
        })
    }

    /// Same quantity expressed in the reference unit of its dimension, when
    /// the registry has one; otherwise unchanged.
    pub fn normalize(&self, registry: &Registry) -> Result<Quantity> {
        match registry.reference_unit(self.unit.dimension()) {
            Some(reference) => self.in_unit(&reference),
            None => Ok(self.clone()),
        }
    }

    /// Sum expressed in `self`'s unit.
    pub fn add(&self, other: &Quantity) -> Result<Quantity> {
        let other = other.in_unit(&self.unit)?;
        Ok(Quantity {
            value: &self.value + &other.value,
            unit: self.unit.clone(),
        })
    }

    /// Difference expressed in `self`'s unit.
    pub fn sub(&self, other: &Quantity) -> Result<Quantity> {
        let other = other.in_unit(&self.unit)?;
        Ok(Quantity {
            value: &self.value - &other.value,
            unit: self.unit.clone(),
        })
    }

    /// Order by reference value; quantities must share a dimension.
    pub fn compare(&self, other: &Quantity) -> Result<Ordering> {
        if !convert::convertible(&self.unit, &other.unit) {
            return Err(Error::IncompatibleDimensions {
                from: self.unit.dimension().string_form(),
                to: other.unit.dimension().string_form(),
            });
        }
        Ok(self.reference_value().total_cmp(&other.reference_value()))
    }

    pub fn multiply(&self, registry: &Registry, other: &Quantity) -> Result<Quantity> {
        let product = registry.multiply_units(&self.unit, &other.unit)?;
        Ok(Quantity {
            value: &(&self.value * &other.value) * &product.factor,
            unit: product.unit,
        })
    }

    pub fn divide(&self, registry: &Registry, other: &Quantity) -> Result<Quantity> {
        let quotient = registry.divide_units(&self.unit, &other.unit)?;
        let value = self.value.checked_div(&other.value)?;
        Ok(Quantity {
            value: &value * &quotient.factor,
            unit: quotient.unit,
        })
    }

    pub fn pow(&self, registry: &Registry, n: i64) -> Result<Quantity> {
        let power = registry.power_unit(&self.unit, n)?;
        let exponent = u32::try_from(n).map_err(|_| Error::InvalidExponent(n))?;
        Ok(Quantity {
            value: &self.value.pow(exponent) * &power.factor,
            unit: power.unit,
        })
    }

    /// Multiply the value by a plain number, keeping the unit.
    pub fn scale(&self, factor: impl Into<Number>) -> Quantity {
        Quantity {
            value: &self.value * &factor.into(),
            unit: self.unit.clone(),
        }
    }

    pub fn round_dp(&self, dp: u32) -> Quantity {
        Quantity {
            value: self.value.round_dp(dp),
            unit: self.unit.clone(),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        let registry = Registry::new();
        registry.register_dimension("length", &[]).unwrap();
        registry.register_dimension("time", &[]).unwrap();
        registry.register_unit("millimeter", "length", 1, &["mm"]).unwrap();
        registry.register_unit("meter", "length", 1000, &["m"]).unwrap();
        registry.register_unit("centimeter", "length", 10, &["cm"]).unwrap();
        registry.register_unit("foot", "length", 304.8, &["ft"]).unwrap();
        registry.register_unit("second", "time", 1000, &["s"]).unwrap();
        registry.register_unit("minute", "time", 60_000, &["min"]).unwrap();
        registry
    }

    fn q(registry: &Registry, value: i64, unit: &str) -> Quantity {
        Quantity::new(value, registry.unit(unit).unwrap())
    }

    #[test]
    fn converts_exactly() {
        let registry = registry();
        let twelve = q(&registry, 12, "meter");
        let cm = twelve.in_unit(&registry.unit("cm").unwrap()).unwrap();
        assert_eq!(cm.value, Number::integer(1200));
        assert!(cm.value.is_exact());
        assert_eq!(cm.to_string(), "1200 centimeter");
    }

    #[test]
    fn adds_in_the_left_unit() {
        let registry = registry();
        let sum = q(&registry, 1, "meter").add(&q(&registry, 50, "cm")).unwrap();
        assert_eq!(sum.unit.name(), "meter");
        assert_eq!(sum.value, Number::ratio(3, 2).unwrap());

        let diff = q(&registry, 1, "meter").sub(&q(&registry, 50, "cm")).unwrap();
        assert_eq!(diff.value, Number::ratio(1, 2).unwrap());

        assert!(q(&registry, 1, "meter").add(&q(&registry, 1, "second")).is_err());
    }

    #[test]
    fn compares_across_units() {
        let registry = registry();
        let meter = q(&registry, 1, "meter");
        assert_eq!(meter.compare(&q(&registry, 99, "cm")).unwrap(), Ordering::Greater);
        assert_eq!(meter.compare(&q(&registry, 100, "cm")).unwrap(), Ordering::Equal);
        assert!(meter.compare(&q(&registry, 1, "second")).is_err());
    }

    #[test]
    fn multiplies_into_compound_units() {
        let registry = registry();
        let area = q(&registry, 3, "meter").multiply(&registry, &q(&registry, 4, "meter")).unwrap();
        assert_eq!(area.unit.name(), "meter^2");
        assert_eq!(area.value, Number::integer(12));

        let speed = q(&registry, 100, "meter").divide(&registry, &q(&registry, 20, "second")).unwrap();
        assert_eq!(speed.to_string(), "5 meter/second");

        let mixed = q(&registry, 2, "meter").multiply(&registry, &q(&registry, 50, "cm")).unwrap();
        assert_eq!(mixed.unit.name(), "meter^2");
        assert_eq!(mixed.value, Number::integer(1));
    }

    #[test]
    fn scaling_keeps_the_unit() {
        let registry = registry();
        let doubled = q(&registry, 3, "meter").scale(2);
        assert_eq!(doubled.to_string(), "6 meter");
        let halved = q(&registry, 3, "meter").scale(Number::ratio(1, 2).unwrap());
        assert_eq!(halved.value, Number::ratio(3, 2).unwrap());
        assert!(halved.value.is_exact());
    }

    #[test]
    fn division_by_zero_value_fails() {
        let registry = registry();
        let err = q(&registry, 1, "meter")
            .divide(&registry, &q(&registry, 0, "second"))
            .unwrap_err();
        assert_eq!(err, Error::DivisionByZero);
    }

    #[test]
    fn converts_one_component_of_a_compound() {
        let registry = registry();
        let speed = q(&registry, 10, "meter").divide(&registry, &q(&registry, 1, "second")).unwrap();
        let per_minute = speed.convert_to(&registry, &registry.unit("minute").unwrap()).unwrap();
        assert_eq!(per_minute.unit.name(), "meter/minute");
        assert_eq!(per_minute.value, Number::integer(600));
    }

    #[test]
    fn normalizes_to_the_reference_unit() {
        let registry = registry();
        let normalized = q(&registry, 2, "meter").normalize(&registry).unwrap();
        assert_eq!(normalized.unit.name(), "millimeter");
        assert_eq!(normalized.value, Number::integer(2000));

        // no scale-1 unit of time registered
        let seconds = q(&registry, 2, "second");
        assert_eq!(seconds.normalize(&registry).unwrap(), seconds);
    }

    #[test]
    fn squares_values_and_units() {
        let registry = registry();
        let square = q(&registry, 3, "foot").pow(&registry, 2).unwrap();
        assert_eq!(square.unit.name(), "foot^2");
        assert_eq!(square.value, Number::integer(9));
        assert!(q(&registry, 3, "foot").pow(&registry, 0).is_err());
    }
}
