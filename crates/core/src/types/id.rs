//! Newtype IDs for type-safe Shopify resource references.
//!
//! Shopify identifies every resource with a global ID (GID) of the form
//! `gid://shopify/<Kind>/<number>`. Use the `define_gid!` macro to create
//! wrappers that prevent mixing IDs from different resource kinds (passing a
//! product ID where a variant ID is expected, for example).

use thiserror::Error;

/// Prefix shared by every Shopify GID.
pub const GID_PREFIX: &str = "gid://shopify/";

/// Errors that can occur when parsing a GID.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GidError {
    /// The input string is empty.
    #[error("id cannot be empty")]
    Empty,
    /// The GID names a different resource kind.
    #[error("expected a {expected} id, got a {found} id")]
    WrongKind {
        /// Kind required by the target type.
        expected: &'static str,
        /// Kind found in the input.
        found: String,
    },
    /// The input is neither a GID nor a bare numeric id.
    #[error("malformed id: {0}")]
    Malformed(String),
}

/// Parse a GID (or bare numeric id) of the given kind into its canonical form.
///
/// # Errors
///
/// Returns `GidError` if the input is empty, malformed, or of another kind.
pub fn parse_gid(kind: &'static str, input: &str) -> Result<String, GidError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(GidError::Empty);
    }

    if is_numeric(input) {
        return Ok(format!("{GID_PREFIX}{kind}/{input}"));
    }

    let rest = input
        .strip_prefix(GID_PREFIX)
        .ok_or_else(|| GidError::Malformed(input.to_string()))?;
    let (found, id) = rest
        .split_once('/')
        .ok_or_else(|| GidError::Malformed(input.to_string()))?;

    if found != kind {
        return Err(GidError::WrongKind {
            expected: kind,
            found: found.to_string(),
        });
    }
    if !is_numeric(id) {
        return Err(GidError::Malformed(input.to_string()));
    }

    Ok(input.to_string())
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Macro to define a type-safe Shopify GID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` that validate the GID kind
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `parse()` accepting a full GID or a bare numeric id
/// - `as_str()`, `numeric_id()` and `Display`
///
/// # Example
///
/// ```rust
/// # use shopdesk_core::define_gid;
/// define_gid!(OrderId, "Order");
///
/// let id = OrderId::parse("42").unwrap();
/// assert_eq!(id.as_str(), "gid://shopify/Order/42");
/// assert!(OrderId::parse("gid://shopify/Customer/42").is_err());
/// ```
#[macro_export]
macro_rules! define_gid {
    ($name:ident, $kind:literal) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Shopify resource kind carried in the GID.
            pub const KIND: &'static str = $kind;

            /// Parse from a full GID or a bare numeric id.
            ///
            /// # Errors
            ///
            /// Returns `GidError` if the input is not an id of this kind.
            pub fn parse(input: &str) -> ::core::result::Result<Self, $crate::types::id::GidError> {
                $crate::types::id::parse_gid(Self::KIND, input).map(Self)
            }

            /// Returns the full GID.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the trailing numeric part of the GID.
            #[must_use]
            pub fn numeric_id(&self) -> &str {
                self.0.rsplit('/').next().unwrap_or(&self.0)
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::GidError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::types::id::GidError;

            fn try_from(value: String) -> ::core::result::Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_gid!(CustomerId, "Customer");
define_gid!(ProductId, "Product");
define_gid!(VariantId, "ProductVariant");
