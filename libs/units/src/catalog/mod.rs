//! Built-in dimension and unit tables.
//!
//! Every SI measurable uses its milli- unit as the reference (scale 1), so
//! integer-sized units such as `meter` (1000) or `mile` (1_609_344) keep exact
//! integer scales.

mod counting;
mod dimensions;
mod imperial;
mod information;
mod si;
mod time;
mod us;

use crate::config::RegistryOptions;
use crate::error::{Error, Result};
use crate::number::Number;
use crate::registry::Registry;
use once_cell::sync::Lazy;
use std::fmt;
use std::str::FromStr;
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Catalog {
    /// Metric base units with every prefix from yocto to yotta, plus liters.
    Si,
    Time,
    Us,
    Imperial,
    /// Bits and bytes, decimal and binary multiples.
    Information,
    /// Items, pairs, dozens.
    Counting,
}

impl Catalog {
    pub const ALL: [Catalog; 6] = [
        Catalog::Si,
        Catalog::Time,
        Catalog::Us,
        Catalog::Imperial,
        Catalog::Information,
        Catalog::Counting,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Catalog::Si => "si",
            Catalog::Time => "time",
            Catalog::Us => "us",
            Catalog::Imperial => "imperial",
            Catalog::Information => "information",
            Catalog::Counting => "counting",
        }
    }

    fn units(&self) -> Vec<UnitDef> {
        match self {
            Catalog::Si => si::units(),
            Catalog::Time => time::units(),
            Catalog::Us => us::units(),
            Catalog::Imperial => imperial::units(),
            Catalog::Information => information::units(),
            Catalog::Counting => counting::units(),
        }
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Catalog {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Catalog::ALL
            .into_iter()
            .find(|catalog| catalog.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidName(s.to_string()))
    }
}

/// One row of a catalog table.
struct UnitDef {
    name: String,
    dimension: &'static str,
    scale: Number,
    aliases: Vec<String>,
}

impl UnitDef {
    fn new(name: impl Into<String>, dimension: &'static str, scale: Number, aliases: &[&str]) -> Self {
        Self {
            name: name.into(),
            dimension,
            scale,
            aliases: aliases.iter().map(|alias| alias.to_string()).collect(),
        }
    }

    fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }
}

/// Register the base dimensions and the named derived dimensions.
pub fn load_dimensions(registry: &Registry) -> Result<()> {
    for (name, aliases) in dimensions::BASES {
        registry.register_dimension(name, aliases)?;
    }
    for (expression, names) in dimensions::NAMED {
        for name in *names {
            registry.name_dimension(expression, name)?;
        }
    }
    Ok(())
}

/// Register one catalog's units, returning how many rows were applied.
///
/// Dimensions are registered first, so a catalog can be loaded into an empty
/// registry. Loading the same catalog twice is a no-op.
pub fn load(registry: &Registry, catalog: Catalog) -> Result<usize> {
    load_dimensions(registry)?;
    let units = catalog.units();
    for def in &units {
        let aliases: Vec<&str> = def.aliases.iter().map(String::as_str).collect();
        registry.register_unit(&def.name, def.dimension, def.scale.clone(), &aliases)?;
    }
    info!(catalog = catalog.name(), units = units.len(), "loaded unit catalog");
    Ok(units.len())
}

/// A registry configured by `options` with its catalogs loaded.
pub fn build(options: RegistryOptions) -> Result<Registry> {
    let catalogs = options.catalogs.clone();
    let registry = Registry::with_options(options);
    load_dimensions(&registry)?;
    for catalog in catalogs {
        load(&registry, catalog)?;
    }
    Ok(registry)
}

static STANDARD: Lazy<Registry> = Lazy::new(|| {
    build(RegistryOptions::default()).expect("built-in unit catalogs must load without conflicts")
});

/// Process-wide registry with every built-in catalog loaded.
pub fn standard() -> &'static Registry {
    &STANDARD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_names_round_trip() {
        for catalog in Catalog::ALL {
            assert_eq!(catalog.name().parse::<Catalog>().unwrap(), catalog);
        }
        assert_eq!("SI".parse::<Catalog>().unwrap(), Catalog::Si);
        assert!("klingon".parse::<Catalog>().is_err());
    }

    #[test]
    fn every_catalog_loads_on_its_own() {
        for catalog in Catalog::ALL {
            let registry = Registry::new();
            let count = load(&registry, catalog).unwrap();
            assert!(count > 0, "{catalog} is empty");
        }
    }

    #[test]
    fn loading_twice_is_idempotent() {
        let registry = Registry::new();
        load(&registry, Catalog::Us).unwrap();
        let before = registry.units().len();
        load(&registry, Catalog::Us).unwrap();
        load(&registry, Catalog::Imperial).unwrap();
        assert_eq!(registry.units().len(), before);
    }

    #[test]
    fn named_dimensions_are_registered() {
        let registry = standard();
        let speed = registry.dimension("velocity").unwrap();
        assert_eq!(registry.display_name(&speed), "speed");
        assert_eq!(registry.dimension("force").unwrap().string_form(), "length*mass/time^2");
        assert_eq!(registry.dimension("money"), registry.dimension("currency"));
    }
}
