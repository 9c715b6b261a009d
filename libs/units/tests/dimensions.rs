use gauge_units::{catalog, Dimension, Error};

#[test]
fn reduction_never_leaves_a_base_on_both_sides() {
    let registry = catalog::standard();
    let force = registry.dimension("force").unwrap();
    let area = registry.dimension("area").unwrap();
    let pressure = force.divide(&area);
    let vector = pressure.vector();
    for base in vector.numerators() {
        assert!(vector
            .denominators()
            .iter()
            .all(|other| other.base() != base.base()));
    }
    assert_eq!(pressure.string_form(), "mass/length*time^2");
}

#[test]
fn string_forms_round_trip() {
    let registry = catalog::standard();
    for dimension in registry.dimensions() {
        let text = dimension.string_form();
        assert_eq!(Dimension::parse(&text).unwrap(), dimension, "{text}");
        assert_eq!(registry.dimension(&text), Some(dimension));
    }
}

#[test]
fn speed_times_time_is_length() {
    let registry = catalog::standard();
    let speed = registry.dimension("velocity").unwrap();
    let time = registry.dimension("time").unwrap();
    let length = speed.multiply(&time);
    assert!(length.is_base());
    assert_eq!(length, registry.dimension("distance").unwrap());
}

#[test]
fn reciprocal_time_renders_with_one() {
    let registry = catalog::standard();
    let frequency = registry.dimension("1/time").unwrap();
    assert_eq!(frequency.string_form(), "1/time");
    assert_eq!(frequency, registry.dimension("time").unwrap().reciprocal());
}

#[test]
fn powers_are_positive_integers() {
    let registry = catalog::standard();
    let length = registry.dimension("length").unwrap();
    assert_eq!(length.power(3).unwrap(), registry.dimension("volume").unwrap());
    assert_eq!(length.power(1).unwrap(), length);
    assert_eq!(length.power(0).unwrap_err(), Error::InvalidExponent(0));
    assert_eq!(length.power(-2).unwrap_err(), Error::InvalidExponent(-2));
}

#[test]
fn dimensions_order_bases_before_compounds() {
    let registry = catalog::standard();
    let dimensions = registry.dimensions();
    let first_compound = dimensions
        .iter()
        .position(|dimension| !dimension.is_base())
        .unwrap();
    assert!(dimensions[..first_compound].iter().all(Dimension::is_base));
    assert!(dimensions[first_compound..].iter().all(|d| !d.is_base()));
    assert!(dimensions.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn unregistered_bases_do_not_resolve() {
    let registry = catalog::standard();
    assert!(registry.dimension("charm").is_none());
    assert!(registry.dimension("length*charm").is_none());
    assert!(registry
        .resolve_dimension(&Dimension::parse("length/charm").unwrap())
        .is_none());
}
