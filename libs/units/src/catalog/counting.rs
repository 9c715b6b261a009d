use super::UnitDef;
use crate::number::Number;

pub(super) fn units() -> Vec<UnitDef> {
    vec![
        UnitDef::new("item", "quantity", Number::one(), &["items"]),
        UnitDef::new("pair", "quantity", Number::integer(2), &["pairs"]),
        UnitDef::new("dozen", "quantity", Number::integer(12), &["dozens"]),
        UnitDef::new("score", "quantity", Number::integer(20), &["scores"]),
        UnitDef::new("gross", "quantity", Number::integer(144), &[]),
    ]
}
