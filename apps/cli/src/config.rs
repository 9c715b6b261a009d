//! CLI configuration: an optional `gauge.toml`, then `GAUGE_*` environment
//! variables (after loading `.env`).

use anyhow::Context;
use gauge_units::catalog::{self, Catalog};
use gauge_units::{AliasPolicy, Number, Registry, RegistryOptions};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub log_level: String,
    pub alias_policy: AliasPolicy,
    pub catalogs: Vec<Catalog>,
    pub dimensions: Vec<CustomDimension>,
    pub units: Vec<CustomUnit>,
}

/// An extra base dimension.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomDimension {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// An extra unit, registered after the catalogs.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomUnit {
    pub name: String,
    pub dimension: String,
    /// Parsed as a number literal: `1609.344`, `1/3` or `2.5e-3`.
    pub scale: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            alias_policy: AliasPolicy::default(),
            catalogs: Catalog::ALL.to_vec(),
            dimensions: Vec::new(),
            units: Vec::new(),
        }
    }
}

impl CliConfig {
    /// Load from `path` (or `GAUGE_CONFIG`, or `./gauge.toml` if present) and the environment.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        // A missing .env file is fine.
        let _ = dotenvy::dotenv();

        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os("GAUGE_CONFIG").map(PathBuf::from));

        let builder = ::config::Config::builder();
        let builder = match &path {
            Some(path) => builder.add_source(::config::File::from(path.as_path()).required(true)),
            None => builder.add_source(::config::File::with_name("gauge").required(false)),
        };
        let settings = builder
            .add_source(
                ::config::Environment::with_prefix("GAUGE")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("catalogs"),
            )
            .build()
            .with_context(|| match &path {
                Some(path) => format!("Failed to read configuration from {}", path.display()),
                None => "Failed to read configuration".to_string(),
            })?;

        settings
            .try_deserialize()
            .context("Invalid gauge configuration")
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        ::config::Config::builder()
            .add_source(::config::File::from_str(text, ::config::FileFormat::Toml))
            .build()
            .context("Failed to parse configuration")?
            .try_deserialize()
            .context("Invalid gauge configuration")
    }

    pub fn registry_options(&self) -> RegistryOptions {
        RegistryOptions::default()
            .with_alias_policy(self.alias_policy)
            .with_catalogs(self.catalogs.iter().copied())
    }

    /// Catalogs first, then custom dimensions, then custom units.
    pub fn build_registry(&self) -> anyhow::Result<Registry> {
        let registry =
            catalog::build(self.registry_options()).context("Failed to load unit catalogs")?;

        for dimension in &self.dimensions {
            registry
                .register_dimension(&dimension.name, &borrowed(&dimension.aliases))
                .with_context(|| format!("Failed to register dimension '{}'", dimension.name))?;
        }

        for unit in &self.units {
            let scale: Number = unit
                .scale
                .parse()
                .with_context(|| format!("Invalid scale '{}' for unit '{}'", unit.scale, unit.name))?;
            registry
                .register_unit(&unit.name, &unit.dimension, scale, &borrowed(&unit.aliases))
                .with_context(|| format!("Failed to register unit '{}'", unit.name))?;
        }

        tracing::debug!(
            catalogs = self.catalogs.len(),
            dimensions = self.dimensions.len(),
            units = self.units.len(),
            "registry ready"
        );
        Ok(registry)
    }
}

fn borrowed(names: &[String]) -> Vec<&str> {
    names.iter().map(String::as_str).collect()
}
