//! The registry context: name tables for dimensions and units behind one lock.
//!
//! Lookups take the read lock. Anything that has to intern a new value
//! (a dimension seen for the first time, a synthesized compound unit) re-checks
//! under the write lock, so concurrent builders converge on one instance.

mod dimensions;
mod units;

use crate::compound::{self, ComponentMap, Product, Shape};
use crate::config::{AliasPolicy, RegistryOptions};
use crate::convert::{self, Conversion};
use crate::dimension::Dimension;
use crate::error::{Error, Result};
use crate::expr::{self, is_valid_name};
use crate::number::Number;
use crate::unit::Unit;
use dimensions::DimensionRegistry;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::warn;

#[derive(Debug, Default)]
struct Tables {
    dimensions: DimensionRegistry,
    units: units::UnitRegistry,
}

#[derive(Debug, Default)]
pub struct Registry {
    options: RegistryOptions,
    tables: RwLock<Tables>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: RegistryOptions) -> Self {
        Self {
            options,
            tables: RwLock::default(),
        }
    }

    pub fn options(&self) -> &RegistryOptions {
        &self.options
    }

    // Tables are only mutated through insert-only operations, so a writer that
    // panicked cannot leave them half-updated.
    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ---------------------------------------------------------------------
    // Dimensions
    // ---------------------------------------------------------------------

    /// Create (or return) the base dimension `name` and bind its aliases.
    pub fn register_dimension(&self, name: &str, aliases: &[&str]) -> Result<Dimension> {
        self.write()
            .dimensions
            .register_base(name, aliases, self.options.alias_policy)
    }

    /// Attach a display name to the dimension `expression` resolves to, e.g.
    /// `name_dimension("length^2", "area")`.
    pub fn name_dimension(&self, expression: &str, name: &str) -> Result<Dimension> {
        let mut tables = self.write();
        let dimension = tables
            .dimensions
            .lookup(expression)
            .ok_or_else(|| Error::UnknownDimension(expression.to_string()))?;
        tables
            .dimensions
            .name_compound(&dimension, name, self.options.alias_policy)?;
        Ok(dimension)
    }

    /// Resolve a name, alias or string form such as `length/time^2`.
    ///
    /// Returns `None` when any token is not a registered dimension name.
    pub fn dimension(&self, input: &str) -> Option<Dimension> {
        let (dimension, known) = {
            let tables = self.read();
            let dimension = tables.dimensions.lookup(input)?;
            let known = tables.dimensions.is_registered(&dimension);
            (dimension, known)
        };
        if !known {
            self.write().dimensions.intern(&dimension);
        }
        Some(dimension)
    }

    /// The canonical value for `dimension`, or `None` if it uses unregistered bases.
    pub fn resolve_dimension(&self, dimension: &Dimension) -> Option<Dimension> {
        let (resolved, known) = {
            let tables = self.read();
            let resolved = tables.dimensions.resolve(dimension)?;
            let known = tables.dimensions.is_registered(&resolved);
            (resolved, known)
        };
        if !known {
            self.write().dimensions.intern(&resolved);
        }
        Some(resolved)
    }

    pub fn display_name(&self, dimension: &Dimension) -> String {
        self.read().dimensions.display_name(dimension)
    }

    pub fn is_registered(&self, dimension: &Dimension) -> bool {
        self.read().dimensions.is_registered(dimension)
    }

    /// Every interned dimension, bases first.
    pub fn dimensions(&self) -> Vec<Dimension> {
        self.read().dimensions.all()
    }

    // ---------------------------------------------------------------------
    // Units
    // ---------------------------------------------------------------------

    /// Register a unit of the dimension named by `dimension` (a name, alias or
    /// string form). Re-registering an identical definition returns the
    /// existing unit.
    pub fn register_unit(
        &self,
        name: &str,
        dimension: &str,
        scale: impl Into<Number>,
        aliases: &[&str],
    ) -> Result<Unit> {
        let mut tables = self.write();
        let dimension = tables
            .dimensions
            .lookup(dimension)
            .ok_or_else(|| Error::UnknownDimension(dimension.to_string()))?;
        let unit = tables.units.register(
            name,
            dimension,
            scale.into(),
            aliases,
            self.options.alias_policy,
        )?;
        tables.dimensions.intern(unit.dimension());
        Ok(unit)
    }

    /// Resolve a unit name, alias or expression such as `ft/s` or `meter^2`.
    pub fn unit(&self, input: &str) -> Option<Unit> {
        self.try_unit(input).ok()
    }

    /// Like [`Registry::unit`], reporting why resolution failed.
    pub fn try_unit(&self, input: &str) -> Result<Unit> {
        let hit = self.read().units.lookup(input.trim());
        if let Some(unit) = hit {
            return Ok(unit);
        }

        let expr = expr::parse(input)?;
        let components = {
            let tables = self.read();
            let mut components = ComponentMap::default();
            let mut factor = Number::one();
            let terms = expr
                .numerator
                .iter()
                .map(|term| (term, false))
                .chain(expr.denominator.iter().map(|term| (term, true)));
            for (term, inverted) in terms {
                let unit = tables
                    .units
                    .plain(&term.symbol)
                    .ok_or_else(|| Error::UnknownUnit(term.symbol.clone()))?;
                let (mut part, _) = ComponentMap::of(unit).power(term.power.into())?;
                if inverted {
                    part = part.reciprocal();
                }
                factor = factor * components.merge(&part)?;
            }
            if !factor.is_one() {
                return Err(Error::expression(
                    input,
                    "mixes different units of the same dimension",
                ));
            }
            components
        };
        self.materialize(components)
    }

    pub fn reference_unit(&self, dimension: &Dimension) -> Option<Unit> {
        self.read().units.reference_unit(dimension)
    }

    pub fn units_of(&self, dimension: &Dimension) -> Vec<Unit> {
        self.read().units.units_of(dimension)
    }

    /// Registered units in registration order; synthesized compounds are not listed.
    pub fn units(&self) -> Vec<Unit> {
        self.read().units.all()
    }

    /// Every name bound to `unit`, primary name first.
    pub fn unit_names(&self, unit: &Unit) -> Vec<String> {
        self.read().units.names_of(unit)
    }

    // ---------------------------------------------------------------------
    // Unit arithmetic
    // ---------------------------------------------------------------------

    pub fn multiply_units(&self, lhs: &Unit, rhs: &Unit) -> Result<Product> {
        let (components, factor) = compound::multiply(lhs, rhs)?;
        let unit = self.materialize(components)?;
        Ok(Product { unit, factor })
    }

    pub fn divide_units(&self, lhs: &Unit, rhs: &Unit) -> Result<Product> {
        let (components, factor) = compound::divide(lhs, rhs)?;
        let unit = self.materialize(components)?;
        Ok(Product { unit, factor })
    }

    pub fn power_unit(&self, unit: &Unit, n: i64) -> Result<Product> {
        let (components, factor) = compound::power(unit, n)?;
        let unit = self.materialize(components)?;
        Ok(Product { unit, factor })
    }

    /// The canonical unit for `components`, which must measure `dimension`.
    pub fn synthesize_compound(
        &self,
        dimension: &Dimension,
        components: ComponentMap,
    ) -> Result<Unit> {
        let actual = components.dimension()?;
        if actual != *dimension {
            return Err(Error::IncompatibleDimensions {
                from: actual.string_form(),
                to: dimension.string_form(),
            });
        }
        self.materialize(components)
    }

    /// Conversion from `from` to `to`, substituting one component of a
    /// compound `from` when `to` measures only that component.
    pub fn conversion(&self, from: &Unit, to: &Unit) -> Result<Conversion> {
        convert::resolve(self, from, to)
    }

    pub(crate) fn materialize(&self, components: ComponentMap) -> Result<Unit> {
        match compound::shape(components)? {
            Shape::Dimensionless => Ok(self.read().units.dimensionless()),
            Shape::Plain(unit) => Ok(unit),
            Shape::Compound(parts) => {
                let hit = self.read().units.compound(&parts.name);
                if let Some(unit) = hit {
                    return Ok(unit);
                }
                let unit = Unit::compound(parts.name, parts.dimension, parts.scale, parts.components);
                let mut tables = self.write();
                tables.dimensions.intern(unit.dimension());
                Ok(tables.units.intern_compound(unit))
            }
        }
    }
}

/// Validate `name` and `aliases` and return the ones free to bind to `target`.
///
/// The primary name must be free (or already bound to `target`) under every
/// policy. Alias collisions fail the call under [`AliasPolicy::Reject`] and are
/// skipped with a warning under [`AliasPolicy::KeepExisting`]. Nothing is
/// inserted here, so a failed call leaves the table untouched.
pub(crate) fn claim_names<'a, T: PartialEq>(
    table: &HashMap<Arc<str>, T>,
    target: &T,
    name: &'a str,
    aliases: &[&'a str],
    policy: AliasPolicy,
    describe: fn(&T) -> String,
) -> Result<Vec<&'a str>> {
    if let Some(invalid) = std::iter::once(&name)
        .chain(aliases)
        .find(|candidate| !is_valid_name(candidate))
    {
        return Err(Error::InvalidName(invalid.to_string()));
    }

    let collision = |alias: &str, existing: &T| Error::DuplicateAlias {
        alias: alias.to_string(),
        existing: describe(existing),
        attempted: describe(target),
    };

    if let Some(existing) = table.get(name).filter(|existing| *existing != target) {
        return Err(collision(name, existing));
    }

    let mut free = vec![name];
    for &alias in aliases {
        match table.get(alias) {
            Some(existing) if existing != target => match policy {
                AliasPolicy::Reject => return Err(collision(alias, existing)),
                AliasPolicy::KeepExisting => warn!(
                    alias,
                    existing = %describe(existing),
                    attempted = %describe(target),
                    "alias already bound, keeping existing binding"
                ),
            },
            _ => free.push(alias),
        }
    }
    Ok(free)
}
