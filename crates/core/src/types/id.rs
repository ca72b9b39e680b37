//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.
//!
//! The storefront backend is not consistent about ID encoding: the swipe
//! endpoints emit integers, the catalogue emits strings and some payloads
//! only carry an `external_id`. IDs are therefore opaque strings, and
//! integer forms are accepted on the wire and normalized to their decimal
//! text.

/// Errors that can occur when parsing an ID.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input string is empty or only whitespace.
    #[error("id cannot be empty")]
    Empty,
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize` as a plain string, `Deserialize` from a string or an integer
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `parse()`, `as_str()`
/// - `From<i64>`, `FromStr`, `Display` and `AsRef<str>` implementations
///
/// # Example
///
/// ```rust
/// # use swipey_core::define_id;
/// define_id!(BrandId);
/// define_id!(CartId);
///
/// let brand_id = BrandId::from(1);
/// let cart_id: CartId = "1".parse().unwrap();
///
/// // These are different types, so this won't compile:
/// // let _: BrandId = cart_id;
/// assert_eq!(brand_id.as_str(), cart_id.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, ::serde::Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Parse an ID from a string, trimming surrounding whitespace.
            ///
            /// # Errors
            ///
            /// Returns [`IdError::Empty`]($crate::types::id::IdError) if the
            /// input is blank.
            pub fn parse(s: &str) -> ::core::result::Result<Self, $crate::types::id::IdError> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err($crate::types::id::IdError::Empty);
                }
                Ok(Self(trimmed.to_owned()))
            }

            /// Returns the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::IdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id.to_string())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                #[derive(::serde::Deserialize)]
                #[serde(untagged)]
                enum Raw {
                    Int(i64),
                    Text(String),
                }

                match Raw::deserialize(deserializer)? {
                    Raw::Int(id) => Ok(Self::from(id)),
                    Raw::Text(s) => Self::parse(&s).map_err(::serde::de::Error::custom),
                }
            }
        }
    };
}

// Define standard entity IDs
define_id!(ProductId);
define_id!(OrderId);
