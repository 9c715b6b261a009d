use super::claim_names;
use crate::config::AliasPolicy;
use crate::dimension::Dimension;
use crate::error::{Error, Result};
use crate::number::Number;
use crate::unit::Unit;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Name and alias table for registered units, plus the interned compounds.
#[derive(Debug)]
pub(crate) struct UnitRegistry {
    by_name: HashMap<Arc<str>, Unit>,
    /// Registration order; the first scale-1 unit of a dimension is its reference.
    registered: Vec<Unit>,
    /// Synthesized compounds keyed by canonical name.
    compounds: HashMap<Arc<str>, Unit>,
    one: Unit,
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self {
            by_name: HashMap::new(),
            registered: Vec::new(),
            compounds: HashMap::new(),
            one: Unit::dimensionless(),
        }
    }
}

impl UnitRegistry {
    pub fn register(
        &mut self,
        name: &str,
        dimension: Dimension,
        scale: Number,
        aliases: &[&str],
        policy: AliasPolicy,
    ) -> Result<Unit> {
        if !scale.is_finite() || !scale.is_positive() {
            return Err(Error::InvalidScale(format!("{name} = {scale}")));
        }

        let existing = self
            .by_name
            .get(name)
            .filter(|unit| unit.name() == name && unit.same_definition(&dimension, &scale))
            .cloned();
        let fresh = existing.is_none();
        let unit = existing.unwrap_or_else(|| Unit::plain(name, dimension, scale));

        let names = claim_names(&self.by_name, &unit, name, aliases, policy, describe)?;
        if fresh {
            debug!(unit = name, dimension = %unit.dimension(), scale = %unit.scale(), "registered unit");
            self.registered.push(unit.clone());
        }
        for bound in names {
            self.by_name.insert(Arc::from(bound), unit.clone());
        }
        Ok(unit)
    }

    /// A registered name or alias, a synthesized compound's canonical name, or `1`.
    pub fn lookup(&self, name: &str) -> Option<Unit> {
        if name == "1" {
            return Some(self.one.clone());
        }
        self.by_name
            .get(name)
            .or_else(|| self.compounds.get(name))
            .cloned()
    }

    /// Registered (non-synthesized) units only.
    pub fn plain(&self, name: &str) -> Option<&Unit> {
        self.by_name.get(name)
    }

    pub fn compound(&self, canonical_name: &str) -> Option<Unit> {
        self.compounds.get(canonical_name).cloned()
    }

    /// Insert `unit` under its canonical name unless another thread got there
    /// first, returning whichever instance is now canonical.
    pub fn intern_compound(&mut self, unit: Unit) -> Unit {
        self.compounds
            .entry(Arc::from(unit.name()))
            .or_insert_with(|| {
                debug!(unit = unit.name(), dimension = %unit.dimension(), "synthesized compound unit");
                unit.clone()
            })
            .clone()
    }

    pub fn dimensionless(&self) -> Unit {
        self.one.clone()
    }

    pub fn reference_unit(&self, dimension: &Dimension) -> Option<Unit> {
        self.registered
            .iter()
            .find(|unit| unit.dimension() == dimension && unit.scale().is_one())
            .cloned()
    }

    pub fn units_of(&self, dimension: &Dimension) -> Vec<Unit> {
        self.registered
            .iter()
            .filter(|unit| unit.dimension() == dimension)
            .cloned()
            .collect()
    }

    pub fn all(&self) -> Vec<Unit> {
        self.registered.clone()
    }

    /// Every name bound to `unit`, primary name first.
    pub fn names_of(&self, unit: &Unit) -> Vec<String> {
        let mut aliases: Vec<String> = self
            .by_name
            .iter()
            .filter(|(name, bound)| bound.ptr_eq(unit) && &***name != unit.name())
            .map(|(name, _)| name.to_string())
            .collect();
        aliases.sort();
        let mut names = vec![unit.name().to_string()];
        names.extend(aliases);
        names
    }
}

fn describe(unit: &Unit) -> String {
    unit.name().to_string()
}
