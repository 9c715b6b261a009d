use anyhow::{Context, Result};
use gauge_units::{Direction, Number, Product, Registry, Unit};
use serde_json::{json, Value};
use std::fmt::Write as _;

/// Command output in both renderings; `main` prints one of them.
#[derive(Debug)]
pub struct Report {
    pub text: String,
    pub json: Value,
}

fn resolve_unit(registry: &Registry, name: &str) -> Result<Unit> {
    registry
        .try_unit(name)
        .with_context(|| format!("Cannot resolve unit '{name}'"))
}

fn exactness(number: &Number) -> &'static str {
    if number.is_exact() {
        "exact"
    } else {
        "approximate"
    }
}

fn direction_label(direction: Direction) -> &'static str {
    match direction {
        Direction::Identity => "identity",
        Direction::ToSmaller => "to_smaller",
        Direction::ToLarger => "to_larger",
    }
}

pub fn convert(
    registry: &Registry,
    value: &str,
    from: &str,
    to: &str,
    precision: Option<u32>,
) -> Result<Report> {
    let value: Number = value
        .parse()
        .with_context(|| format!("Invalid number '{value}'"))?;
    let from = resolve_unit(registry, from)?;
    let to = resolve_unit(registry, to)?;

    let conversion = registry
        .conversion(&from, &to)
        .with_context(|| format!("Cannot convert {from} to {to}"))?;
    let mut result = conversion.apply(&value);
    if let Some(dp) = precision {
        result = result.round_dp(dp);
    }
    tracing::debug!(from = %from, to = %conversion.target, factor = %conversion.factor, "converted");

    let text = format!(
        "{value} {from} = {result} {target}\nfactor: {factor} ({exactness})",
        target = conversion.target,
        factor = conversion.factor,
        exactness = exactness(&conversion.factor),
    );
    let json = json!({
        "value": value.to_string(),
        "from": from.name(),
        "to": conversion.target.name(),
        "result": result.to_string(),
        "result_f64": result.to_f64(),
        "factor": conversion.factor.to_string(),
        "exact": conversion.factor.is_exact(),
        "direction": direction_label(conversion.direction()),
    });
    Ok(Report { text, json })
}

pub fn dimension(registry: &Registry, expression: &str) -> Result<Report> {
    let dimension = registry
        .dimension(expression)
        .with_context(|| format!("Unknown dimension '{expression}'"))?;
    let name = registry.display_name(&dimension);
    let reference = registry.reference_unit(&dimension);

    let mut text = format!(
        "canonical: {}\nname: {}\nbase: {}",
        dimension.string_form(),
        name,
        dimension.is_base()
    );
    if let Some(reference) = &reference {
        let _ = write!(text, "\nreference unit: {reference}");
    }
    let json = json!({
        "canonical": dimension.string_form(),
        "name": name,
        "base": dimension.is_base(),
        "dimensionless": dimension.is_dimensionless(),
        "reference_unit": reference.as_ref().map(Unit::name),
    });
    Ok(Report { text, json })
}

pub fn dimensions(registry: &Registry) -> Result<Report> {
    let dimensions = registry.dimensions();
    let mut text = String::new();
    let mut rows = Vec::with_capacity(dimensions.len());
    for dimension in &dimensions {
        let name = registry.display_name(dimension);
        let canonical = dimension.string_form();
        if name == canonical {
            let _ = writeln!(text, "{canonical}");
        } else {
            let _ = writeln!(text, "{name} ({canonical})");
        }
        rows.push(json!({ "name": name, "canonical": canonical, "base": dimension.is_base() }));
    }
    Ok(Report {
        text: text.trim_end().to_string(),
        json: Value::Array(rows),
    })
}

pub fn units(registry: &Registry, dimension: Option<&str>) -> Result<Report> {
    let units = match dimension {
        Some(expression) => {
            let dimension = registry
                .dimension(expression)
                .with_context(|| format!("Unknown dimension '{expression}'"))?;
            registry.units_of(&dimension)
        }
        None => registry.units(),
    };

    let mut text = String::new();
    let mut rows = Vec::with_capacity(units.len());
    for unit in &units {
        let names = registry.unit_names(unit);
        let aliases = &names[1..];
        let dimension = registry.display_name(unit.dimension());
        if aliases.is_empty() {
            let _ = writeln!(text, "{unit}  [{dimension}]  scale {}", unit.scale());
        } else {
            let _ = writeln!(
                text,
                "{unit} ({})  [{dimension}]  scale {}",
                aliases.join(", "),
                unit.scale()
            );
        }
        rows.push(json!({
            "name": unit.name(),
            "aliases": aliases,
            "dimension": dimension,
            "scale": unit.scale().to_string(),
            "exact": unit.scale().is_exact(),
        }));
    }
    Ok(Report {
        text: text.trim_end().to_string(),
        json: Value::Array(rows),
    })
}

pub fn multiply(registry: &Registry, lhs: &str, rhs: &str) -> Result<Report> {
    let lhs = resolve_unit(registry, lhs)?;
    let rhs = resolve_unit(registry, rhs)?;
    let product = registry
        .multiply_units(&lhs, &rhs)
        .with_context(|| format!("Cannot multiply {lhs} by {rhs}"))?;
    Ok(describe_product(registry, &product))
}

pub fn divide(registry: &Registry, lhs: &str, rhs: &str) -> Result<Report> {
    let lhs = resolve_unit(registry, lhs)?;
    let rhs = resolve_unit(registry, rhs)?;
    let quotient = registry
        .divide_units(&lhs, &rhs)
        .with_context(|| format!("Cannot divide {lhs} by {rhs}"))?;
    Ok(describe_product(registry, &quotient))
}

fn describe_product(registry: &Registry, product: &Product) -> Report {
    let unit = &product.unit;
    let dimension = unit.dimension();
    let name = registry.display_name(dimension);

    let mut text = format!(
        "unit: {unit}\ndimension: {}\nscale: {} ({})",
        dimension.string_form(),
        unit.scale(),
        exactness(unit.scale())
    );
    if name != dimension.string_form() {
        let _ = write!(text, "\nname: {name}");
    }
    if !product.factor.is_one() {
        let _ = write!(text, "\nvalue factor: {}", product.factor);
    }
    let json = json!({
        "unit": unit.name(),
        "dimension": dimension.string_form(),
        "name": name,
        "scale": unit.scale().to_string(),
        "exact": unit.scale().is_exact(),
        "factor": product.factor.to_string(),
    });
    Report { text, json }
}
