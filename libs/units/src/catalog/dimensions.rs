pub(super) const BASES: &[(&str, &[&str])] = &[
    ("length", &["width", "distance"]),
    ("time", &[]),
    ("mass", &[]),
    ("current", &[]),
    ("luminosity", &[]),
    ("substance", &[]),
    ("temperature", &[]),
    ("information", &["data"]),
    ("quantity", &["items", "enumerables"]),
    ("currency", &["money"]),
];

/// Derived dimensions and their names; the first name becomes the display name.
pub(super) const NAMED: &[(&str, &[&str])] = &[
    ("length^2", &["area"]),
    ("length^3", &["volume"]),
    ("length/time", &["speed", "velocity"]),
    ("length/time^2", &["acceleration"]),
    ("length*mass/time^2", &["force"]),
];
