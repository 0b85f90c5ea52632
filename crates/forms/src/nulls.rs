/// Decides what a missing value looks like on either side of the wire.
pub trait NullFieldStrategy {
    /// Client string rendered for a `None` value.
    fn replace_to_client(&self) -> String;

    /// Value substituted for blank client input; `None` keeps the field empty.
    fn replace_from_client(&self) -> Option<String>;
}

/// Blank in, `None` out.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultNullFieldStrategy;

impl NullFieldStrategy for DefaultNullFieldStrategy {
    fn replace_to_client(&self) -> String {
        String::new()
    }

    fn replace_from_client(&self) -> Option<String> {
        None
    }
}

/// Treats missing numbers as zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZeroNullFieldStrategy;

impl NullFieldStrategy for ZeroNullFieldStrategy {
    fn replace_to_client(&self) -> String {
        "0".to_string()
    }

    fn replace_from_client(&self) -> Option<String> {
        Some("0".to_string())
    }
}
