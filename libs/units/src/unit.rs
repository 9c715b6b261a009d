use crate::compound::ComponentMap;
use crate::dimension::Dimension;
use crate::number::Number;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A named scale point on one dimension.
///
/// Units are canonical handles owned by a [`crate::Registry`]: two `Unit`s are
/// equal only when they are the same registry object, so a name and all of its
/// aliases resolve to one `Unit`.
#[derive(Clone)]
pub struct Unit(Arc<UnitData>);

struct UnitData {
    name: Arc<str>,
    dimension: Dimension,
    /// Multiplier taking one of this unit to the dimension's reference unit.
    scale: Number,
    /// Present for synthesized compound units only.
    components: Option<ComponentMap>,
}

impl Unit {
    pub(crate) fn plain(name: impl Into<Arc<str>>, dimension: Dimension, scale: Number) -> Self {
        Unit(Arc::new(UnitData {
            name: name.into(),
            dimension,
            scale,
            components: None,
        }))
    }

    pub(crate) fn compound(
        name: impl Into<Arc<str>>,
        dimension: Dimension,
        scale: Number,
        components: ComponentMap,
    ) -> Self {
        Unit(Arc::new(UnitData {
            name: name.into(),
            dimension,
            scale,
            components: Some(components),
        }))
    }

    pub(crate) fn dimensionless() -> Self {
        Self::plain("1", Dimension::dimensionless(), Number::one())
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn dimension(&self) -> &Dimension {
        &self.0.dimension
    }

    pub fn scale(&self) -> &Number {
        &self.0.scale
    }

    /// Representative sub-units of a compound unit, keyed by their dimension.
    pub fn components(&self) -> Option<&ComponentMap> {
        self.0.components.as_ref()
    }

    pub fn is_compound(&self) -> bool {
        self.0.components.is_some()
    }

    pub fn is_dimensionless(&self) -> bool {
        self.0.dimension.is_dimensionless()
    }

    /// Whether both handles are the same registry object.
    pub fn ptr_eq(&self, other: &Unit) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Same name, dimension and scale; used to make repeated registration idempotent.
    pub(crate) fn same_definition(&self, dimension: &Dimension, scale: &Number) -> bool {
        !self.is_compound() && self.dimension() == dimension && self.scale() == scale
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Unit {}

impl Hash for Unit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unit")
            .field("name", &self.name())
            .field("dimension", &self.dimension().string_form())
            .field("scale", &self.scale().to_string())
            .finish()
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
