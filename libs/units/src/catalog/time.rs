use super::UnitDef;
use crate::number::Number;

pub(super) fn units() -> Vec<UnitDef> {
    vec![
        UnitDef::new("minute", "time", Number::integer(60_000), &["minutes", "min"]),
        UnitDef::new("hour", "time", Number::integer(3_600_000), &["hours", "h"]),
        UnitDef::new("day", "time", Number::integer(86_400_000), &["days"]),
        UnitDef::new("week", "time", Number::integer(604_800_000), &["weeks"]),
    ]
}
