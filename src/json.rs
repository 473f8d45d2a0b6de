//! Serde adaptors: variant sets as single JSON scalar tokens.
//!
//! - [`EnumJson`] ties a Rust type to its static [`VariantSet`].
//! - [`impl_enum_json!`](crate::impl_enum_json) gives a type `Serialize` /
//!   `Deserialize` impls governed by the type-level config.
//! - [`site!`](crate::site) declares a module for `#[serde(with = "...")]`
//!   carrying a call-site config for one field of a containing struct.
//! - [`from_str`] / [`from_value`] / [`to_value`] handle unenclosed (root)
//!   documents.
use std::borrow::Cow;
use std::fmt;

use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::ser::{self, Serializer};
use serde_json::Value;

use crate::config::{resolve, Config};
use crate::error::{Error, Result};
use crate::matcher::{match_text_at, Nesting};
use crate::project::project;
use crate::variant::{render_float, Scalar, Variant, VariantSet};

pub trait EnumJson: Sized + 'static {
    fn variant_set() -> &'static VariantSet<Self>;
}

// ------------------------------- Serialize -------------------------------- //

pub fn serialize<T, S>(value: &T, site: Option<&Config>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: EnumJson + PartialEq,
    S: Serializer,
{
    let set = T::variant_set();
    let variant = set
        .variant_of(value)
        .ok_or_else(|| <S::Error as ser::Error>::custom(format!("value is not a declared variant of `{}`", set.type_name())))?;

    let effective = resolve(set.config(), site);
    match project(set, variant, &effective) {
        Some(Scalar::Text(s)) => serializer.serialize_str(&s),
        Some(Scalar::Integer(i)) => serializer.serialize_i64(i),
        Some(Scalar::Float(x)) => serializer.serialize_f64(x),
        Some(Scalar::Boolean(b)) => serializer.serialize_bool(b),
        Some(Scalar::Char(c)) => serializer.serialize_char(c),
        None => {
            // keep the containing structure well-formed
            tracing::warn!(
                type_name = set.type_name(),
                variant = variant.name(),
                projection = %effective.projection,
                "designated field has no value, writing null"
            );
            serializer.serialize_none()
        }
    }
}

pub fn serialize_option<T, S>(value: &Option<T>, site: Option<&Config>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: EnumJson + PartialEq,
    S: Serializer,
{
    match value {
        Some(value) => serialize(value, site, serializer),
        None => serializer.serialize_none(),
    }
}

/// Project `value` as an unenclosed document.
pub fn to_value<T>(value: &T, site: Option<&Config>) -> Result<Value>
where
    T: EnumJson + PartialEq,
{
    Ok(serialize(value, site, serde_json::value::Serializer)?)
}

// ------------------------------ Deserialize ------------------------------- //

/// An incoming scalar token in textual form.
///
/// Strings are taken verbatim; numbers and booleans are rendered the way they
/// were written (`2.0` stays `"2.0"`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token(pub String);

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TokenVisitor)
    }
}

struct TokenVisitor;

impl Visitor<'_> for TokenVisitor {
    type Value = Token;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or number token")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Token, E> {
        Ok(Token(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Token, E> {
        Ok(Token(v))
    }

    fn visit_char<E: de::Error>(self, v: char) -> Result<Token, E> {
        Ok(Token(v.to_string()))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Token, E> {
        Ok(Token(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Token, E> {
        Ok(Token(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Token, E> {
        Ok(Token(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Token, E> {
        Ok(Token(render_float(v)))
    }
}

fn lookup<T: EnumJson>(token: &str, nesting: Nesting, site: Option<&Config>) -> Option<&'static T> {
    let set = T::variant_set();
    let effective = resolve(set.config(), site);
    match_text_at(token, nesting, set, &effective).map(Variant::value)
}

/// Strict: a token matching no variant is a deserialization error.
pub fn deserialize<'de, T, D>(site: Option<&Config>, deserializer: D) -> Result<T, D::Error>
where
    T: EnumJson + Clone,
    D: Deserializer<'de>,
{
    let Token(token) = Token::deserialize(deserializer)?;
    match lookup::<T>(&token, Nesting::Nested, site) {
        Some(value) => Ok(value.clone()),
        None => Err(de::Error::custom(Error::NoMatch {
            type_name: T::variant_set().type_name().to_owned(),
            token,
        })),
    }
}

/// Lenient: `null` and tokens matching no variant both become `None`.
pub fn deserialize_option<'de, T, D>(site: Option<&Config>, deserializer: D) -> Result<Option<T>, D::Error>
where
    T: EnumJson + Clone,
    D: Deserializer<'de>,
{
    let token = Option::<Token>::deserialize(deserializer)?;
    Ok(token.and_then(|Token(token)| lookup::<T>(&token, Nesting::Nested, site).cloned()))
}

/// Read an unenclosed document. `Ok(None)` when it is `null` or matches no
/// variant; one layer of extra quoting inside a root string is ignored.
pub fn from_value<T>(value: &Value) -> Result<Option<T>>
where
    T: EnumJson + Clone,
{
    let token: Cow<'_, str> = match value {
        Value::Null => return Ok(None),
        Value::String(s) => Cow::Borrowed(s),
        Value::Number(n) => Cow::Owned(n.to_string()),
        Value::Bool(b) => Cow::Owned(b.to_string()),
        Value::Array(_) => return Err(not_scalar::<T>("an array")),
        Value::Object(_) => return Err(not_scalar::<T>("an object")),
    };
    Ok(lookup::<T>(&token, Nesting::Root, None).cloned())
}

pub fn from_str<T>(json: &str) -> Result<Option<T>>
where
    T: EnumJson + Clone,
{
    let value: Value = serde_json::from_str(json)?;
    from_value(&value)
}

fn not_scalar<T: EnumJson>(found: &'static str) -> Error {
    Error::NotScalar { type_name: T::variant_set().type_name().to_owned(), found }
}

// -------------------------------- Macros ---------------------------------- //

/// Implement `Serialize` and `Deserialize` for a type through its variant set.
///
/// `impl_enum_json!(Fish, FISH)` also implements [`EnumJson`] from a static
/// (typically a `once_cell::sync::Lazy<VariantSet<Fish>>`).
///
/// The generated `Deserialize` always reads the token as nested, so a string
/// wrapped in an extra layer of quotes does not match. Read unenclosed
/// documents through [`json::from_str`](crate::json::from_str) or
/// [`json::from_value`](crate::json::from_value), which strip that layer.
#[macro_export]
macro_rules! impl_enum_json {
    ($ty:ty, $set:path) => {
        impl $crate::json::EnumJson for $ty {
            fn variant_set() -> &'static $crate::VariantSet<Self> {
                &*$set
            }
        }
        $crate::impl_enum_json!($ty);
    };
    ($ty:ty) => {
        impl $crate::__private::serde::Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                $crate::json::serialize(self, ::core::option::Option::None, serializer)
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                $crate::json::deserialize(::core::option::Option::None, deserializer)
            }
        }
    };
}

/// Declare a call-site configuration module for `#[serde(with = "...")]`.
///
/// ```ignore
/// enum_json::site!(mod strict_fish = Config::new(ProjectionKind::Name));
///
/// #[derive(Serialize, Deserialize)]
/// struct Food {
///     #[serde(with = "strict_fish")]
///     fish: Fish,
///     #[serde(with = "strict_fish::option", default)]
///     maybe: Option<Fish>,
/// }
/// ```
#[macro_export]
macro_rules! site {
    ($(#[$meta:meta])* $vis:vis mod $name:ident = $config:expr $(;)?) => {
        $(#[$meta])*
        #[allow(dead_code)]
        $vis mod $name {
            #[allow(unused_imports)]
            use super::*;

            fn config() -> &'static $crate::Config {
                static CONFIG: $crate::__private::Lazy<$crate::Config> = $crate::__private::Lazy::new(|| $config);
                &CONFIG
            }

            pub fn serialize<T, S>(value: &T, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where
                T: $crate::json::EnumJson + ::core::cmp::PartialEq,
                S: $crate::__private::serde::Serializer,
            {
                $crate::json::serialize(value, ::core::option::Option::Some(config()), serializer)
            }

            pub fn deserialize<'de, T, D>(deserializer: D) -> ::core::result::Result<T, D::Error>
            where
                T: $crate::json::EnumJson + ::core::clone::Clone,
                D: $crate::__private::serde::Deserializer<'de>,
            {
                $crate::json::deserialize(::core::option::Option::Some(config()), deserializer)
            }

            pub mod option {
                pub fn serialize<T, S>(
                    value: &::core::option::Option<T>,
                    serializer: S,
                ) -> ::core::result::Result<S::Ok, S::Error>
                where
                    T: $crate::json::EnumJson + ::core::cmp::PartialEq,
                    S: $crate::__private::serde::Serializer,
                {
                    $crate::json::serialize_option(value, ::core::option::Option::Some(super::config()), serializer)
                }

                pub fn deserialize<'de, T, D>(deserializer: D) -> ::core::result::Result<::core::option::Option<T>, D::Error>
                where
                    T: $crate::json::EnumJson + ::core::clone::Clone,
                    D: $crate::__private::serde::Deserializer<'de>,
                {
                    $crate::json::deserialize_option(::core::option::Option::Some(super::config()), deserializer)
                }
            }
        }
    };
}

// ------------------------------- Tests ------------------------------------ //
