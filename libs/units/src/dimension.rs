//! Dimensions as reduced products of base dimensions.
//!
//! A [`DimensionVector`] holds the numerator and denominator components of a
//! dimension after reduction: components sharing a base are merged, bases
//! present on both sides are cancelled, and each side is sorted by base name.
//! [`Dimension`] tags a vector as either a single base dimension or a compound.
//!
//! ```text
//! length*mass/time^2      force
//! length/time             speed
//! length^2                area
//! 1                       dimensionless
//! ```

use crate::error::{Error, Result};
use crate::expr;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

/// One base dimension raised to a positive power.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Component {
    base: Arc<str>,
    power: u32,
}

impl Component {
    pub fn new(base: impl Into<Arc<str>>, power: u32) -> Self {
        Self {
            base: base.into(),
            power,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn power(&self) -> u32 {
        self.power
    }

    fn render(&self, out: &mut String) {
        out.push_str(&self.base);
        if self.power != 1 {
            out.push('^');
            out.push_str(&self.power.to_string());
        }
    }
}

/// Reduced numerator/denominator components.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DimensionVector {
    numerators: Vec<Component>,
    denominators: Vec<Component>,
}

impl DimensionVector {
    pub fn dimensionless() -> Self {
        Self::default()
    }

    /// Merge and cancel raw component lists into canonical form.
    ///
    /// Powers of a repeated base are summed per side; a base on both sides
    /// loses `min(num, den)` from each, and zero-power components are dropped.
    /// Sums past `u32::MAX` saturate; [`DimensionVector::try_reduce`] reports them.
    pub fn reduce(
        numerators: impl IntoIterator<Item = Component>,
        denominators: impl IntoIterator<Item = Component>,
    ) -> Self {
        let add = |a: u32, b: u32| Some(a.saturating_add(b));
        Self::cancel(merge(numerators, add), merge(denominators, add))
            .unwrap_or_default()
    }

    /// Like [`DimensionVector::reduce`], `None` when a summed power overflows.
    pub fn try_reduce(
        numerators: impl IntoIterator<Item = Component>,
        denominators: impl IntoIterator<Item = Component>,
    ) -> Option<Self> {
        Self::cancel(
            merge(numerators, u32::checked_add),
            merge(denominators, u32::checked_add),
        )
    }

    fn cancel(
        top: Option<BTreeMap<Arc<str>, u32>>,
        bottom: Option<BTreeMap<Arc<str>, u32>>,
    ) -> Option<Self> {
        let (mut top, mut bottom) = (top?, bottom?);
        for (base, num_power) in top.iter_mut() {
            if let Some(den_power) = bottom.get_mut(base) {
                let common = (*num_power).min(*den_power);
                *num_power -= common;
                *den_power -= common;
            }
        }
        top.retain(|_, power| *power > 0);
        bottom.retain(|_, power| *power > 0);

        Some(Self {
            numerators: into_components(top),
            denominators: into_components(bottom),
        })
    }

    pub fn numerators(&self) -> &[Component] {
        &self.numerators
    }

    pub fn denominators(&self) -> &[Component] {
        &self.denominators
    }

    pub fn is_dimensionless(&self) -> bool {
        self.numerators.is_empty() && self.denominators.is_empty()
    }

    /// Exactly one numerator component of power 1 and no denominators.
    pub fn is_base_form(&self) -> bool {
        self.denominators.is_empty() && self.numerators.len() == 1 && self.numerators[0].power == 1
    }

    pub fn reciprocal(&self) -> Self {
        Self {
            numerators: self.denominators.clone(),
            denominators: self.numerators.clone(),
        }
    }

    pub fn multiply(&self, other: &Self) -> Self {
        Self::reduce(
            self.numerators.iter().chain(&other.numerators).cloned(),
            self.denominators.iter().chain(&other.denominators).cloned(),
        )
    }

    pub fn divide(&self, other: &Self) -> Self {
        self.multiply(&other.reciprocal())
    }

    pub fn checked_multiply(&self, other: &Self) -> Option<Self> {
        Self::try_reduce(
            self.numerators.iter().chain(&other.numerators).cloned(),
            self.denominators.iter().chain(&other.denominators).cloned(),
        )
    }

    /// Every power scaled by `n`; `None` on overflow. A reduced vector stays
    /// reduced, so this equals `n` repeated multiplications.
    pub fn checked_power(&self, n: u32) -> Option<Self> {
        if n == 0 {
            return Some(Self::dimensionless());
        }
        let scale = |side: &[Component]| {
            side.iter()
                .map(|c| {
                    c.power.checked_mul(n).map(|power| Component {
                        base: c.base.clone(),
                        power,
                    })
                })
                .collect::<Option<Vec<_>>>()
        };
        Some(Self {
            numerators: scale(&self.numerators)?,
            denominators: scale(&self.denominators)?,
        })
    }

    /// Signed exponent of `base` (negative when it sits in the denominator).
    pub fn exponent(&self, base: &str) -> i64 {
        let find = |side: &[Component]| {
            side.iter()
                .find(|c| c.base() == base)
                .map_or(0, |c| c.power as i64)
        };
        find(self.numerators.as_slice()) - find(self.denominators.as_slice())
    }

    /// Every base dimension mentioned, in name order.
    pub fn bases(&self) -> impl Iterator<Item = &str> {
        let mut bases: Vec<&str> = self
            .numerators
            .iter()
            .chain(&self.denominators)
            .map(Component::base)
            .collect();
        bases.sort_unstable();
        bases.into_iter()
    }

    pub fn string_form(&self) -> String {
        if self.is_dimensionless() {
            return "1".to_string();
        }
        let mut out = String::new();
        if self.numerators.is_empty() {
            out.push('1');
        }
        render_side(&self.numerators, &mut out);
        if !self.denominators.is_empty() {
            out.push('/');
            render_side(&self.denominators, &mut out);
        }
        out
    }

    /// Parse a string form; the result is reduced, so non-normalized input
    /// such as `time*length/time` is accepted.
    pub fn parse(input: &str) -> Result<Self> {
        let parsed = expr::parse(input)?;
        let side = |terms: Vec<expr::Term>| {
            terms
                .into_iter()
                .map(|t| Component::new(t.symbol, t.power))
                .collect::<Vec<_>>()
        };
        Self::try_reduce(side(parsed.numerator), side(parsed.denominator))
            .ok_or_else(|| Error::expression(input, "power out of range"))
    }
}

fn merge(
    components: impl IntoIterator<Item = Component>,
    add: impl Fn(u32, u32) -> Option<u32>,
) -> Option<BTreeMap<Arc<str>, u32>> {
    let mut merged = BTreeMap::new();
    for c in components {
        let power = merged.entry(c.base).or_insert(0);
        *power = add(*power, c.power)?;
    }
    Some(merged)
}

fn into_components(map: BTreeMap<Arc<str>, u32>) -> Vec<Component> {
    map.into_iter()
        .map(|(base, power)| Component { base, power })
        .collect()
}

fn render_side(side: &[Component], out: &mut String) {
    for (i, component) in side.iter().enumerate() {
        if i > 0 {
            out.push('*');
        }
        component.render(out);
    }
}

/// A measurable: one named base dimension, or a reduced compound of bases.
#[derive(Clone, Debug)]
pub enum Dimension {
    Base(Arc<str>),
    Compound(DimensionVector),
}

impl Dimension {
    pub fn base(name: impl Into<Arc<str>>) -> Self {
        Dimension::Base(name.into())
    }

    pub fn dimensionless() -> Self {
        Dimension::Compound(DimensionVector::dimensionless())
    }

    /// Canonical dimension for a reduced vector: base forms become `Base`.
    pub fn from_vector(vector: DimensionVector) -> Self {
        if vector.is_base_form() {
            Dimension::Base(vector.numerators[0].base.clone())
        } else {
            Dimension::Compound(vector)
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        DimensionVector::parse(input).map(Self::from_vector)
    }

    pub fn vector(&self) -> DimensionVector {
        match self {
            Dimension::Base(name) => DimensionVector {
                numerators: vec![Component::new(name.clone(), 1)],
                denominators: vec![],
            },
            Dimension::Compound(vector) => vector.clone(),
        }
    }

    pub fn is_base(&self) -> bool {
        match self {
            Dimension::Base(_) => true,
            Dimension::Compound(vector) => vector.is_base_form(),
        }
    }

    /// Name of the single base this dimension is equivalent to, if any.
    pub fn base_name(&self) -> Option<&str> {
        match self {
            Dimension::Base(name) => Some(name),
            Dimension::Compound(vector) if vector.is_base_form() => Some(vector.numerators[0].base()),
            Dimension::Compound(_) => None,
        }
    }

    pub fn is_dimensionless(&self) -> bool {
        matches!(self, Dimension::Compound(vector) if vector.is_dimensionless())
    }

    pub fn multiply(&self, other: &Dimension) -> Dimension {
        Self::from_vector(self.vector().multiply(&other.vector()))
    }

    pub fn divide(&self, other: &Dimension) -> Dimension {
        self.multiply(&other.reciprocal())
    }

    pub fn reciprocal(&self) -> Dimension {
        Self::from_vector(self.vector().reciprocal())
    }

    /// `self^n` for a positive integer `n`. Equal to repeated multiplication;
    /// computed by scaling every power, so large `n` costs nothing extra.
    pub fn power(&self, n: i64) -> Result<Dimension> {
        let exponent = u32::try_from(n)
            .ok()
            .filter(|exponent| *exponent >= 1)
            .ok_or(Error::InvalidExponent(n))?;
        self.vector()
            .checked_power(exponent)
            .map(Self::from_vector)
            .ok_or(Error::InvalidExponent(n))
    }

    /// `self^n` for any integer `n`; negative powers invert, zero is dimensionless.
    pub(crate) fn signed_power(&self, n: i32) -> Result<Dimension> {
        let magnitude = self
            .vector()
            .checked_power(n.unsigned_abs())
            .map(Self::from_vector)
            .ok_or(Error::InvalidExponent(n.into()))?;
        Ok(if n < 0 { magnitude.reciprocal() } else { magnitude })
    }

    pub fn checked_multiply(&self, other: &Dimension) -> Result<Dimension> {
        self.vector()
            .checked_multiply(&other.vector())
            .map(Self::from_vector)
            .ok_or_else(|| Error::PowerOverflow(format!("{self} * {other}")))
    }

    pub fn checked_divide(&self, other: &Dimension) -> Result<Dimension> {
        self.checked_multiply(&other.reciprocal())
    }

    pub fn string_form(&self) -> String {
        match self {
            Dimension::Base(name) => name.to_string(),
            Dimension::Compound(vector) => vector.string_form(),
        }
    }

    fn with_parts<R>(&self, f: impl FnOnce(&[Component], &[Component]) -> R) -> R {
        match self {
            Dimension::Base(name) => f(&[Component::new(name.clone(), 1)], &[]),
            Dimension::Compound(vector) => f(&vector.numerators, &vector.denominators),
        }
    }
}

impl PartialEq for Dimension {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Dimension::Base(a), Dimension::Base(b)) => a == b,
            (Dimension::Compound(a), Dimension::Compound(b)) => a == b,
            _ => self.base_name().is_some() && self.base_name() == other.base_name(),
        }
    }
}

impl Eq for Dimension {}

impl Hash for Dimension {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.with_parts(|numerators, denominators| {
            numerators.hash(state);
            denominators.hash(state);
        });
    }
}

impl Ord for Dimension {
    /// Bases order by name and precede every compound; compounds order by
    /// string form.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.base_name(), other.base_name()) {
            (Some(a), Some(b)) => a.cmp(b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.string_form().cmp(&other.string_form()),
        }
    }
}

impl PartialOrd for Dimension {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.string_form())
    }
}

impl FromStr for Dimension {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Dimension::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn length() -> Dimension {
        Dimension::base("length")
    }

    fn time() -> Dimension {
        Dimension::base("time")
    }

    fn mass() -> Dimension {
        Dimension::base("mass")
    }

    #[test]
    fn reduce_merges_and_cancels() {
        let v = DimensionVector::reduce(
            vec![
                Component::new("time", 1),
                Component::new("length", 1),
                Component::new("length", 2),
            ],
            vec![Component::new("time", 3), Component::new("length", 1)],
        );
        assert_eq!(v.numerators(), &[Component::new("length", 2)]);
        assert_eq!(v.denominators(), &[Component::new("time", 2)]);
    }

    #[test]
    fn speed_and_force_string_forms() {
        let speed = length().divide(&time());
        assert_eq!(speed.string_form(), "length/time");
        let force = mass().multiply(&speed.divide(&time()));
        assert_eq!(force.string_form(), "length*mass/time^2");
    }

    #[test]
    fn reciprocal_only_string_form() {
        let frequency = time().reciprocal();
        assert_eq!(frequency.string_form(), "1/time");
        assert_eq!(Dimension::parse("1/time").unwrap(), frequency);
    }

    #[test]
    fn cancellation_yields_dimensionless() {
        let d = length().divide(&length());
        assert!(d.is_dimensionless());
        assert_eq!(d.string_form(), "1");
        assert_eq!(Dimension::parse("1").unwrap(), d);
    }

    #[test]
    fn base_form_compound_is_the_base() {
        let d = length().multiply(&time()).divide(&time());
        assert!(matches!(d, Dimension::Base(_)));
        assert_eq!(d, length());

        let raw = Dimension::Compound(DimensionVector::reduce(vec![Component::new("length", 1)], vec![]));
        assert!(raw.is_base());
        assert_eq!(raw, length());
        assert_eq!(raw.cmp(&length()), Ordering::Equal);
    }

    #[test]
    fn is_base_checks_power_equality() {
        let area = length().power(2).unwrap();
        assert!(!area.is_base());
        assert!(!length().divide(&time()).is_base());
        assert!(length().is_base());
    }

    #[test]
    fn power_rejects_non_positive() {
        assert_eq!(length().power(0), Err(Error::InvalidExponent(0)));
        assert_eq!(length().power(-2), Err(Error::InvalidExponent(-2)));
        assert_eq!(length().power(3).unwrap().string_form(), "length^3");
    }

    #[test]
    fn signed_power_inverts() {
        assert_eq!(time().signed_power(-2).unwrap().string_form(), "1/time^2");
        assert!(time().signed_power(0).unwrap().is_dimensionless());
    }

    #[test]
    fn large_powers_scale_directly() {
        let speed = length().divide(&time());
        let d = speed.power(1_000_000).unwrap();
        assert_eq!(d.string_form(), "length^1000000/time^1000000");
        assert_eq!(d, speed.power(999_999).unwrap().multiply(&speed));
        assert_eq!(
            length().power(i64::from(u32::MAX)).unwrap().vector().exponent("length"),
            i64::from(u32::MAX)
        );
    }

    #[test]
    fn overflowing_powers_are_errors() {
        let area = length().power(2).unwrap();
        let n = i64::from(u32::MAX);
        assert_eq!(area.power(n), Err(Error::InvalidExponent(n)));
        assert_eq!(length().power(n + 1), Err(Error::InvalidExponent(n + 1)));

        let huge = length().power(n).unwrap();
        assert!(matches!(huge.checked_multiply(&length()), Err(Error::PowerOverflow(_))));
        assert_eq!(huge.checked_divide(&length()).unwrap().vector().exponent("length"), n - 1);
        assert!(matches!(
            Dimension::parse("length^4294967295*length"),
            Err(Error::InvalidExpression { .. })
        ));
    }

    #[test]
    fn ordering_puts_bases_first() {
        let mut dims = vec![
            length().divide(&time()),
            time(),
            length().power(2).unwrap(),
            length(),
        ];
        dims.sort();
        let forms: Vec<_> = dims.iter().map(Dimension::string_form).collect();
        assert_eq!(forms, vec!["length", "time", "length/time", "length^2"]);
    }

    #[test]
    fn parse_normalizes_order() {
        let a = Dimension::parse("mass*length/time^2").unwrap();
        let b = Dimension::parse("length * mass / time^2").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.string_form(), "length*mass/time^2");
    }

    #[test]
    fn exponents_are_signed() {
        let v = Dimension::parse("length*mass/time^2").unwrap().vector();
        assert_eq!(v.exponent("time"), -2);
        assert_eq!(v.exponent("length"), 1);
        assert_eq!(v.exponent("current"), 0);
        assert_eq!(v.bases().collect::<Vec<_>>(), vec!["length", "mass", "time"]);
    }

    #[test]
    fn equal_dimensions_hash_equal() {
        use std::collections::HashSet;
        let raw = Dimension::Compound(DimensionVector::reduce(vec![Component::new("length", 1)], vec![]));
        let set: HashSet<_> = [length(), raw].into_iter().collect();
        assert_eq!(set.len(), 1);
    }
}
