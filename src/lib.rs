//! Project closed enumerations to and from single JSON scalar tokens.
//!
//! A type declares its variants (and optionally per-variant data fields) once
//! as a [`VariantSet`]. A [`Config`] attached to the type, or supplied where a
//! value is serialized, picks how each variant is written: its alias, its
//! name, its ordinal, or its value. Reading accepts any of those spellings.
pub mod catalog;
pub mod check;
pub mod config;
pub mod error;
pub mod json;
pub mod locator;
pub mod matcher;
pub mod path_de;
pub mod project;
pub mod variant;

pub use config::{resolve, Config, ConfigSource, EffectiveConfig, ProjectionKind, Role};
pub use error::{Error, Result};
pub use json::EnumJson;
pub use locator::locate;
pub use matcher::{match_text_at, match_token, Nesting};
pub use project::project;
pub use variant::{FieldDescriptor, Scalar, ScalarType, Variant, VariantSet, VariantSetBuilder};

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
    pub use serde;
}
