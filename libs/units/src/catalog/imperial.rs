use super::UnitDef;

/// Imperial length and mass. The definitions match the US rows, so loading
/// both catalogs binds each name once.
pub(super) fn units() -> Vec<UnitDef> {
    super::us::shared()
}
