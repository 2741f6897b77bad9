//! Macro for implementing Display and FromStr for configuration enums
//!
//! Configuration values such as the store backend arrive as free-form strings
//! (environment variables, CLI flags). This macro gives an enum a single
//! lowercase string form and a case-insensitive parser.
//!
//! # Example
//!
//! ```rust
//! use keyward_domain::impl_domain_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Phase {
//!     Pending,
//!     Provisioned,
//! }
//!
//! impl_domain_enum_conversions!(Phase {
//!     Pending => "pending",
//!     Provisioned => "provisioned",
//! });
//!
//! assert_eq!(Phase::Provisioned.to_string(), "provisioned");
//! assert_eq!("PENDING".parse::<Phase>().ok(), Some(Phase::Pending));
//! ```

/// Implements Display and FromStr traits for fieldless enums
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their lowercase string
///   representations
///
/// Parse failures carry the enum name and the rejected input.
#[macro_export]
macro_rules! impl_domain_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
