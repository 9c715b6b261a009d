use super::claim_names;
use crate::config::AliasPolicy;
use crate::dimension::Dimension;
use crate::error::Result;
use crate::expr;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;

/// Name and alias table for dimensions, plus the set of interned values.
#[derive(Debug, Default)]
pub(crate) struct DimensionRegistry {
    by_name: HashMap<Arc<str>, Dimension>,
    display: HashMap<Dimension, Arc<str>>,
    interned: BTreeSet<Dimension>,
}

impl DimensionRegistry {
    pub fn register_base(
        &mut self,
        name: &str,
        aliases: &[&str],
        policy: AliasPolicy,
    ) -> Result<Dimension> {
        let dimension = Dimension::base(name);
        let names = claim_names(&self.by_name, &dimension, name, aliases, policy, describe)?;
        for bound in names {
            self.by_name.insert(Arc::from(bound), dimension.clone());
        }
        self.display
            .entry(dimension.clone())
            .or_insert_with(|| Arc::from(name));
        self.intern(&dimension);
        Ok(dimension)
    }

    /// Attach `name` to `dimension`. Compounds take it as their display name
    /// unless they already have one; bases only gain the alias.
    pub fn name_compound(
        &mut self,
        dimension: &Dimension,
        name: &str,
        policy: AliasPolicy,
    ) -> Result<()> {
        for bound in claim_names(&self.by_name, dimension, name, &[], policy, describe)? {
            self.by_name.insert(Arc::from(bound), dimension.clone());
        }
        if !dimension.is_base() {
            self.display
                .entry(dimension.clone())
                .or_insert_with(|| Arc::from(name));
        }
        self.intern(dimension);
        Ok(())
    }

    /// Resolve a name, alias or `a*b^2/c` expression whose tokens are names.
    pub fn lookup(&self, input: &str) -> Option<Dimension> {
        if let Some(dimension) = self.by_name.get(input.trim()) {
            return Some(dimension.clone());
        }
        let expr = expr::parse(input).ok()?;
        let mut result = Dimension::dimensionless();
        for term in &expr.numerator {
            let factor = self.by_name.get(term.symbol.as_str())?;
            result = result
                .checked_multiply(&factor.power(term.power.into()).ok()?)
                .ok()?;
        }
        for term in &expr.denominator {
            let factor = self.by_name.get(term.symbol.as_str())?;
            result = result
                .checked_divide(&factor.power(term.power.into()).ok()?)
                .ok()?;
        }
        Some(result)
    }

    /// `Some` when every base `dimension` is built from is registered.
    pub fn resolve(&self, dimension: &Dimension) -> Option<Dimension> {
        let vector = dimension.vector();
        let mut bases = vector.bases();
        let known = bases.all(|base| {
            matches!(self.by_name.get(base), Some(Dimension::Base(name)) if &**name == base)
        });
        known.then(|| dimension.clone())
    }

    /// Returns true when `dimension` was not interned before.
    pub fn intern(&mut self, dimension: &Dimension) -> bool {
        let inserted = self.interned.insert(dimension.clone());
        if inserted && !dimension.is_base() {
            debug!(dimension = %dimension, "interned compound dimension");
        }
        inserted
    }

    pub fn is_registered(&self, dimension: &Dimension) -> bool {
        self.interned.contains(dimension)
    }

    pub fn display_name(&self, dimension: &Dimension) -> String {
        self.display
            .get(dimension)
            .map(|name| name.to_string())
            .unwrap_or_else(|| dimension.string_form())
    }

    pub fn all(&self) -> Vec<Dimension> {
        self.interned.iter().cloned().collect()
    }
}

fn describe(dimension: &Dimension) -> String {
    dimension.string_form()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn physical() -> DimensionRegistry {
        let mut registry = DimensionRegistry::default();
        registry
            .register_base("length", &["width", "distance"], AliasPolicy::Reject)
            .unwrap();
        registry.register_base("time", &[], AliasPolicy::Reject).unwrap();
        registry.register_base("mass", &[], AliasPolicy::Reject).unwrap();
        registry
    }

    #[test]
    fn aliases_resolve_to_the_base() {
        let registry = physical();
        let length = registry.lookup("length").unwrap();
        assert_eq!(registry.lookup("width"), Some(length.clone()));
        assert_eq!(registry.lookup("distance"), Some(length));
    }

    #[test]
    fn expressions_resolve_through_aliases() {
        let registry = physical();
        let speed = registry.lookup("distance/time").unwrap();
        assert_eq!(speed.string_form(), "length/time");
        assert_eq!(registry.lookup("width/width"), Some(Dimension::dimensionless()));
    }

    #[test]
    fn unknown_tokens_resolve_to_none() {
        let registry = physical();
        assert_eq!(registry.lookup("charm"), None);
        assert_eq!(registry.lookup("length/charm"), None);
        assert_eq!(registry.lookup("length//time"), None);
    }

    #[test]
    fn huge_exponents_resolve_or_fail_cleanly() {
        let registry = physical();
        let d = registry.lookup("length^1000000").unwrap();
        assert_eq!(d.vector().exponent("length"), 1_000_000);
        assert_eq!(registry.lookup("length^4294967295*width"), None);
        let ratio = registry.lookup("length^4294967295/time^4294967295").unwrap();
        assert_eq!(ratio.vector().exponent("time"), -4_294_967_295);
    }

    #[test]
    fn named_compounds_keep_identity() {
        let mut registry = physical();
        let area = registry.lookup("length^2").unwrap();
        registry
            .name_compound(&area, "area", AliasPolicy::Reject)
            .unwrap();
        assert_eq!(registry.lookup("area"), Some(area.clone()));
        assert_eq!(registry.display_name(&area), "area");
        assert_eq!(area.string_form(), "length^2");

        let force = registry.lookup("length*mass/time^2").unwrap();
        registry
            .name_compound(&force, "force", AliasPolicy::Reject)
            .unwrap();
        assert_eq!(registry.lookup("force/area").unwrap().string_form(), "mass/length*time^2");
    }

    #[test]
    fn naming_a_base_only_adds_an_alias() {
        let mut registry = physical();
        let length = registry.lookup("length").unwrap();
        registry
            .name_compound(&length, "span", AliasPolicy::Reject)
            .unwrap();
        assert_eq!(registry.display_name(&length), "length");
        assert_eq!(registry.lookup("span"), Some(length));
    }

    #[test]
    fn a_base_name_is_never_rebound_to_a_compound() {
        let mut registry = physical();
        let area = registry.lookup("length^2").unwrap();
        for policy in [AliasPolicy::Reject, AliasPolicy::KeepExisting] {
            let err = registry.name_compound(&area, "length", policy).unwrap_err();
            assert!(matches!(err, Error::DuplicateAlias { .. }));
        }
        assert!(registry.lookup("length").unwrap().is_base());
    }

    #[test]
    fn alias_collisions_follow_policy() {
        let mut registry = physical();
        let err = registry
            .register_base("duration", &["time"], AliasPolicy::Reject)
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateAlias { ref alias, .. } if alias == "time"));
        // nothing from the failed call was bound
        assert_eq!(registry.lookup("duration"), None);

        let duration = registry
            .register_base("duration", &["time", "span"], AliasPolicy::KeepExisting)
            .unwrap();
        assert_eq!(registry.lookup("time"), Some(Dimension::base("time")));
        assert_eq!(registry.lookup("span"), Some(duration));
    }

    #[test]
    fn re_registering_a_base_is_idempotent() {
        let mut registry = physical();
        let again = registry
            .register_base("length", &["width"], AliasPolicy::Reject)
            .unwrap();
        assert_eq!(again, Dimension::base("length"));
    }

    #[test]
    fn resolve_requires_registered_bases() {
        let registry = physical();
        let speed = Dimension::parse("length/time").unwrap();
        assert_eq!(registry.resolve(&speed), Some(speed));
        assert_eq!(registry.resolve(&Dimension::base("width")), None);
        assert_eq!(registry.resolve(&Dimension::base("charm")), None);
    }

    #[test]
    fn all_is_sorted_bases_first() {
        let mut registry = physical();
        let speed = registry.lookup("length/time").unwrap();
        registry.intern(&speed);
        let names: Vec<String> = registry.all().iter().map(Dimension::string_form).collect();
        assert_eq!(names, vec!["length", "mass", "time", "length/time"]);
    }
}
