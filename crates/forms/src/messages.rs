use core_types::MapMessages;

/// Built-in validation messages. Hosts overlay their own catalog with [`MapMessages::merge`].
pub fn default_messages() -> MapMessages {
    [
        ("required", "You must provide a value for %s."),
        (
            "minimum-string-length",
            "You must provide at least %s characters for %s.",
        ),
        (
            "maximum-string-length",
            "You may provide at most %s characters for %s.",
        ),
        ("min-integer", "%s must be at least %s."),
        ("max-integer", "%s may not be larger than %s."),
        ("integer-format", "You must provide an integer value for %s."),
        ("number-format", "You must provide a numeric value for %s."),
    ]
    .into_iter()
    .collect()
}
