use super::UnitDef;
use crate::number::Number;

/// US customary units. Length and mass rows are shared with the imperial
/// catalog and must stay identical to it.
pub(super) fn units() -> Vec<UnitDef> {
    let mut units = shared();
    units.extend([
        UnitDef::new("ton", "mass", Number::integer(907_184_740), &["tons"]),
        // volumes in cubic millimeters
        UnitDef::new("fluid_ounce", "volume", Number::approximate(29_570.0), &["floz", "ozfl"]),
        UnitDef::new("pint", "volume", Number::approximate(473_180.0), &["pints"]),
        UnitDef::new("quart", "volume", Number::approximate(946_350.0), &["qt", "quarts"]),
        UnitDef::new("gallon", "volume", Number::approximate(3_785_410.0), &["gallons", "gal"]),
    ]);
    units
}

pub(super) fn shared() -> Vec<UnitDef> {
    vec![
        UnitDef::new("foot", "length", Number::approximate(304.8), &["ft", "feet"]),
        UnitDef::new("inch", "width", Number::approximate(25.4), &["in", "inches"]),
        UnitDef::new("yard", "length", Number::approximate(914.4), &["yd", "yards"]),
        UnitDef::new("mile", "length", Number::integer(1_609_344), &["miles"]),
        UnitDef::new("pound", "mass", Number::approximate(453_592.37), &["pounds", "lb", "lbs"]),
        UnitDef::new("ounce", "mass", Number::approximate(28_349.5231), &["ounces", "oz"]),
    ]
}
