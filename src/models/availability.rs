//! Presence checks for optional catalog fields.
//!
//! The remote source reports unknown attributes either as `null` or as the
//! literal string `"n/a"`. Both count as "not available". Everything else is
//! data, including the empty string and numeric zero.

/// Sentinel the remote source uses for unknown values.
pub const NOT_AVAILABLE: &str = "n/a";

/// Placeholder rendered for unavailable values.
pub const PLACEHOLDER: &str = "-";

/// A value that may or may not carry real data.
pub trait Available {
    fn is_available(&self) -> bool;
}

impl Available for str {
    fn is_available(&self) -> bool {
        self != NOT_AVAILABLE
    }
}

impl Available for String {
    fn is_available(&self) -> bool {
        self.as_str().is_available()
    }
}

macro_rules! always_available {
    ($($ty:ty),*) => {
        $(
            impl Available for $ty {
                fn is_available(&self) -> bool {
                    true
                }
            }
        )*
    };
}

always_available!(u8, u16, u32, u64, i32, i64, f32, f64);

impl<T: Available + ?Sized> Available for &T {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}

impl<T: Available> Available for Option<T> {
    fn is_available(&self) -> bool {
        self.as_ref().is_some_and(|v| v.is_available())
    }
}

/// Returns false for absent values and for the `"n/a"` sentinel.
pub fn is_available<T: Available + ?Sized>(value: &T) -> bool {
    value.is_available()
}

/// Format a value for display, rendering unavailable values as `-`.
pub fn display_value<T>(value: Option<T>) -> String
where
    T: Available + ToString,
{
    match value {
        Some(v) if v.is_available() => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}
