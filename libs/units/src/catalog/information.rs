use super::UnitDef;
use crate::number::Number;

const DECIMAL: [(&str, &[&str]); 8] = [
    ("kilobyte", &["kb"]),
    ("megabyte", &["mb"]),
    ("gigabyte", &["gb"]),
    ("terabyte", &["tb"]),
    ("petabyte", &["pb"]),
    ("exabyte", &[]),
    ("zettabyte", &[]),
    ("yottabyte", &[]),
];

const BINARY: [(&str, &str); 8] = [
    ("kibibyte", "KiB"),
    ("mebibyte", "MiB"),
    ("gibibyte", "GiB"),
    ("tebibyte", "TiB"),
    ("pebibyte", "PiB"),
    ("exbibyte", "EiB"),
    ("zebibyte", "ZiB"),
    ("yobibyte", "YiB"),
];

/// Bit is the reference unit.
pub(super) fn units() -> Vec<UnitDef> {
    let mut units = vec![
        UnitDef::new("bit", "data", Number::one(), &["bits"]),
        UnitDef::new("nibble", "data", Number::integer(4), &["nibbles", "nybble", "nybbles"]),
        UnitDef::new("byte", "data", Number::integer(8), &["bytes"]),
    ];
    for (step, (name, aliases)) in (1..).zip(DECIMAL) {
        let scale = Number::integer(8) * Number::pow10(3 * step);
        units.push(UnitDef::new(name, "data", scale, aliases).alias(format!("{name}s")));
    }
    for (step, (name, symbol)) in (1..).zip(BINARY) {
        let scale = Number::pow2(3 + 10 * step);
        units.push(
            UnitDef::new(name, "data", scale, &[symbol])
                .alias(format!("{name}s"))
                .alias(symbol.to_lowercase()),
        );
    }
    units
}
