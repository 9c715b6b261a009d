//! Compound unit construction.
//!
//! A compound unit is described by a [`ComponentMap`]: for each dimension it
//! touches, the plain unit standing in for that dimension and its signed
//! power. Products and quotients merge maps, and the result is rendered into a
//! canonical name (`foot/second`, `foot^2/second^2`) that the registry uses as
//! the interning key.
//!
//! Plain units contribute themselves keyed by their own dimension, which is a
//! compound dimension for units such as `liter` (`length^3`). When both sides
//! of a product bring different units for the same dimension (`meter * foot`),
//! the left unit is kept and the right one's scale ratio is returned as a
//! value factor, so `1 meter * 1 foot = 0.3048 meter^2`.

use crate::dimension::Dimension;
use crate::error::{Error, Result};
use crate::number::Number;
use crate::unit::Unit;
use std::collections::BTreeMap;

/// Largest numerator or denominator, in bits, of one exact component scale.
const MAX_SCALE_BITS: u64 = 1 << 20;

#[derive(Clone, Debug, PartialEq)]
pub struct UnitPower {
    pub unit: Unit,
    pub power: i32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComponentMap {
    entries: BTreeMap<Dimension, UnitPower>,
}

impl ComponentMap {
    /// The components a unit brings into a product.
    pub fn of(unit: &Unit) -> Self {
        if let Some(components) = unit.components() {
            return components.clone();
        }
        let mut entries = BTreeMap::new();
        if !(unit.is_dimensionless() && unit.scale().is_one()) {
            entries.insert(
                unit.dimension().clone(),
                UnitPower {
                    unit: unit.clone(),
                    power: 1,
                },
            );
        }
        Self { entries }
    }

    pub fn get(&self, dimension: &Dimension) -> Option<&UnitPower> {
        self.entries.get(dimension)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Dimension, &UnitPower)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn reciprocal(&self) -> Self {
        let entries = self
            .entries
            .iter()
            .map(|(dim, entry)| {
                (
                    dim.clone(),
                    UnitPower {
                        unit: entry.unit.clone(),
                        power: -entry.power,
                    },
                )
            })
            .collect();
        Self { entries }
    }

    /// Fold `other` into `self`, returning the value factor picked up when a
    /// dimension is already represented by a different unit.
    pub fn merge(&mut self, other: &ComponentMap) -> Result<Number> {
        let mut factor = Number::one();
        for (dim, incoming) in &other.entries {
            match self.entries.get_mut(dim) {
                Some(existing) => {
                    if !existing.unit.ptr_eq(&incoming.unit) {
                        let ratio = incoming.unit.scale().checked_div(existing.unit.scale())?;
                        factor = factor * ratio.powi(incoming.power)?;
                    }
                    existing.power = existing
                        .power
                        .checked_add(incoming.power)
                        .ok_or_else(|| Error::PowerOverflow(dim.string_form()))?;
                }
                None => {
                    self.entries.insert(dim.clone(), incoming.clone());
                }
            }
        }
        self.entries.retain(|_, entry| entry.power != 0);
        Ok(factor)
    }

    /// `self^n` for a positive `n`. Every entry already has its own
    /// dimension, so this is repeated merging with powers scaled directly and
    /// a value factor of one.
    pub fn power(&self, n: i64) -> Result<(ComponentMap, Number)> {
        let exponent = i32::try_from(n)
            .ok()
            .filter(|exponent| *exponent >= 1)
            .ok_or(Error::InvalidExponent(n))?;
        let entries = self
            .entries
            .iter()
            .map(|(dim, entry)| {
                let power = entry
                    .power
                    .checked_mul(exponent)
                    .ok_or(Error::InvalidExponent(n))?;
                Ok((
                    dim.clone(),
                    UnitPower {
                        unit: entry.unit.clone(),
                        power,
                    },
                ))
            })
            .collect::<Result<_>>()?;
        Ok((Self { entries }, Number::one()))
    }

    /// Swap the unit standing in for `target`'s dimension, keeping its power.
    pub fn substitute(&self, target: &Unit) -> Option<ComponentMap> {
        if target.is_compound() {
            return None;
        }
        let entry = self.entries.get(target.dimension())?;
        let mut entries = self.entries.clone();
        entries.insert(
            target.dimension().clone(),
            UnitPower {
                unit: target.clone(),
                power: entry.power,
            },
        );
        Some(Self { entries })
    }

    pub fn dimension(&self) -> Result<Dimension> {
        self.entries
            .iter()
            .try_fold(Dimension::dimensionless(), |acc, (dim, entry)| {
                acc.checked_multiply(&dim.signed_power(entry.power)?)
            })
    }

    /// `Π numerator scale^power / Π denominator scale^power`.
    ///
    /// Fails with [`Error::InvalidScale`] when an exact scale would exceed
    /// `MAX_SCALE_BITS` or a float scale leaves the finite positive range.
    pub fn scale(&self) -> Result<Number> {
        let out_of_range = || Error::InvalidScale(self.canonical_name());
        let mut numerator = Number::one();
        let mut denominator = Number::one();
        for entry in self.entries.values() {
            let exponent = entry.power.unsigned_abs();
            if let Some(exact) = entry.unit.scale().as_rational() {
                let bits = exact.numer().bits().max(exact.denom().bits());
                if bits.saturating_mul(u64::from(exponent)) > MAX_SCALE_BITS {
                    return Err(out_of_range());
                }
            }
            let magnitude = entry.unit.scale().pow(exponent);
            if entry.power > 0 {
                numerator = numerator * magnitude;
            } else {
                denominator = denominator * magnitude;
            }
        }
        let scale = numerator.checked_div(&denominator)?;
        if !scale.is_finite() || !scale.is_positive() {
            return Err(out_of_range());
        }
        Ok(scale)
    }

    /// Dimension-ordered rendering with each component replaced by its unit's name.
    pub fn canonical_name(&self) -> String {
        let render = |entries: Vec<&UnitPower>| {
            entries
                .iter()
                .map(|entry| match entry.power.unsigned_abs() {
                    1 => entry.unit.name().to_string(),
                    power => format!("{}^{}", entry.unit.name(), power),
                })
                .collect::<Vec<_>>()
                .join("*")
        };
        let (top, bottom): (Vec<&UnitPower>, Vec<&UnitPower>) =
            self.entries.values().partition(|entry| entry.power > 0);

        if top.is_empty() && bottom.is_empty() {
            return "1".to_string();
        }
        let mut name = if top.is_empty() {
            "1".to_string()
        } else {
            render(top)
        };
        if !bottom.is_empty() {
            name.push('/');
            name.push_str(&render(bottom));
        }
        name
    }
}

/// Result of unit arithmetic: the canonical unit plus the value factor picked
/// up when mixed units of one dimension were folded together.
#[derive(Clone, Debug)]
pub struct Product {
    pub unit: Unit,
    pub factor: Number,
}

/// The unit a component map collapses to.
pub(crate) enum Shape {
    Dimensionless,
    Plain(Unit),
    Compound(CompoundParts),
}

pub(crate) struct CompoundParts {
    pub name: String,
    pub dimension: Dimension,
    pub scale: Number,
    pub components: ComponentMap,
}

pub(crate) fn shape(components: ComponentMap) -> Result<Shape> {
    if components.is_empty() {
        return Ok(Shape::Dimensionless);
    }
    if components.len() == 1 {
        if let Some((_, entry)) = components.iter().next() {
            if entry.power == 1 {
                return Ok(Shape::Plain(entry.unit.clone()));
            }
        }
    }
    Ok(Shape::Compound(CompoundParts {
        name: components.canonical_name(),
        dimension: components.dimension()?,
        scale: components.scale()?,
        components,
    }))
}

/// Components and value factor of `lhs * rhs`.
pub(crate) fn multiply(lhs: &Unit, rhs: &Unit) -> Result<(ComponentMap, Number)> {
    let mut components = ComponentMap::of(lhs);
    let factor = components.merge(&ComponentMap::of(rhs))?;
    Ok((components, factor))
}

/// Components and value factor of `lhs / rhs`.
pub(crate) fn divide(lhs: &Unit, rhs: &Unit) -> Result<(ComponentMap, Number)> {
    let mut components = ComponentMap::of(lhs);
    let factor = components.merge(&ComponentMap::of(rhs).reciprocal())?;
    Ok((components, factor))
}

/// Components of `unit^n`.
pub(crate) fn power(unit: &Unit, n: i64) -> Result<(ComponentMap, Number)> {
    ComponentMap::of(unit).power(n)
}
