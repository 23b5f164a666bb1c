//! Macro for implementing Display and FromStr for status enums
//!
//! Appointment lifecycle and payment states are persisted as lowercase
//! strings by the booking backend; this macro keeps the string mapping in one
//! place per enum.
//!
//! # Example
//!
//! ```rust
//! use chairside_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum ChairState {
//!     Free,
//!     Occupied,
//! }
//!
//! impl_domain_status_conversions!(ChairState {
//!     Free => "free",
//!     Occupied => "occupied",
//! });
//!
//! assert_eq!(ChairState::Free.to_string(), "free");
//! assert_eq!("OCCUPIED".parse::<ChairState>(), Ok(ChairState::Occupied));
//! ```

/// Implements Display and FromStr traits for status enums
///
/// This macro generates:
/// - Display trait: converts enum variants to their string form
/// - FromStr trait: parses case-insensitive strings to enum variants
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
