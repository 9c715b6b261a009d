use super::UnitDef;
use crate::number::Number;

/// Prefix and its power of ten relative to milli-.
const PREFIXES: [(&str, i32); 21] = [
    ("yotta", 27),
    ("zetta", 24),
    ("exa", 21),
    ("peta", 18),
    ("tera", 15),
    ("giga", 12),
    ("mega", 9),
    ("kilo", 6),
    ("hecto", 5),
    ("deca", 4),
    ("", 3),
    ("deci", 2),
    ("centi", 1),
    ("milli", 0),
    ("micro", -3),
    ("nano", -6),
    ("pico", -9),
    ("femto", -12),
    ("atto", -15),
    ("zepto", -18),
    ("yocto", -21),
];

/// Unit, dimension, extra offset in powers of ten, aliases that take prefixes.
const MEASURES: [(&str, &str, i32, &[&str]); 8] = [
    ("meter", "length", 0, &[]),
    ("gram", "mass", 0, &[]),
    ("second", "time", 0, &[]),
    ("kelvin", "temperature", 0, &["K"]),
    ("candela", "luminosity", 0, &["cd"]),
    ("ampere", "current", 0, &["amp", "amps", "A"]),
    ("mole", "substance", 0, &["mol"]),
    // 1 milliliter = 1000 mm^3
    ("liter", "volume", 3, &["litre", "litres"]),
];

/// Symbols that only exist for one specific prefix.
const SYMBOLS: &[(&str, &[&str])] = &[
    ("meter", &["m"]),
    ("kilometer", &["km"]),
    ("millimeter", &["mm"]),
    ("nanometer", &["nm"]),
    ("gram", &["g"]),
    ("kilogram", &["kg"]),
    ("milligram", &["mg"]),
    ("megagram", &["tonne", "tonnes"]),
    ("second", &["s", "sec"]),
    ("millisecond", &["ms"]),
    ("liter", &["l"]),
];

pub(super) fn units() -> Vec<UnitDef> {
    let mut units = Vec::with_capacity(MEASURES.len() * PREFIXES.len() + 1);
    for (unit, dimension, offset, aliases) in MEASURES {
        for (prefix, exponent) in PREFIXES {
            let name = format!("{prefix}{unit}");
            let mut def = UnitDef::new(name.clone(), dimension, Number::pow10(exponent + offset), &[])
                .alias(format!("{name}s"));
            for alias in aliases {
                def = def.alias(format!("{prefix}{alias}"));
            }
            if let Some((_, symbols)) = SYMBOLS.iter().find(|(target, _)| *target == name) {
                for symbol in *symbols {
                    def = def.alias(*symbol);
                }
            }
            units.push(def);
        }
    }
    units.push(UnitDef::new(
        "angstrom",
        "length",
        Number::approximate(1e-7),
        &["angstroms"],
    ));
    units
}
