//! Variant sets declared in JSON catalog files instead of Rust code.
//!
//! ```json
//! {
//!   "name": "SomeDays",
//!   "config": { "projection": "VALUE", "valueFieldName": "value" },
//!   "fields": [ { "name": "value", "type": "text" },
//!               { "name": "alias", "type": "text", "role": "ALIAS" } ],
//!   "variants": [ { "name": "MONDAY", "values": { "value": "Lunes", "alias": "Monday" } } ]
//! }
//! ```
//!
//! Variants carry no Rust value (`VariantSet<()>`); callers work with names
//! and ordinals.
use std::borrow::Cow;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::config::{Config, Role};
use crate::error::{Error, Result};
use crate::path_de::{from_slice_with_path, from_str_with_path};
use crate::variant::{FieldDescriptor, Scalar, ScalarType, VariantSet};

pub type Catalog = VariantSet<()>;

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogFile {
    pub name: String,
    #[serde(default)]
    pub config: Option<Config>,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
    pub variants: Vec<VariantDecl>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ScalarType,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariantDecl {
    pub name: String,
    /// Field values by field name; `null` or a missing entry is absent.
    #[serde(default)]
    pub values: IndexMap<String, Value>,
}

impl CatalogFile {
    pub fn into_catalog(self) -> Result<Catalog> {
        let type_name = self.name;
        let fail = |message: String| Error::Catalog { type_name: type_name.clone(), message };

        for variant in &self.variants {
            if let Some(key) = variant.values.keys().find(|key| !self.fields.iter().any(|f| f.name == **key)) {
                return Err(fail(format!("variant `{}` sets undeclared field `{key}`", variant.name)));
            }
        }

        let mut fields = Vec::with_capacity(self.fields.len());
        for decl in self.fields {
            let mut values = Vec::with_capacity(self.variants.len());
            for variant in &self.variants {
                let value = scalar_of(decl.ty, variant.values.get(&decl.name)).map_err(|message| {
                    fail(format!("variant `{}`, field `{}`: {message}", variant.name, decl.name))
                })?;
                values.push(value);
            }
            fields.push(FieldDescriptor::new(decl.name, decl.ty, decl.role, values));
        }

        let variants = self
            .variants
            .into_iter()
            .map(|variant| ((), Cow::Owned(variant.name)))
            .collect();
        VariantSet::from_parts(type_name, self.config, variants, fields)
    }
}

fn scalar_of(ty: ScalarType, value: Option<&Value>) -> std::result::Result<Option<Scalar>, String> {
    let value = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(value) => value,
    };
    let scalar = match (ty, value) {
        (ScalarType::Text, Value::String(s)) => Scalar::Text(s.clone()),
        (ScalarType::Integer, Value::Number(n)) => match n.as_i64() {
            Some(i) => Scalar::Integer(i),
            None => return Err(format!("{n} is not a 64-bit integer")),
        },
        (ScalarType::Float, Value::Number(n)) => match n.as_f64() {
            Some(x) => Scalar::Float(x),
            None => return Err(format!("{n} is not representable as a float")),
        },
        (ScalarType::Boolean, Value::Bool(b)) => Scalar::Boolean(*b),
        (ScalarType::Char, Value::String(s)) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Scalar::Char(c),
                _ => return Err(format!("{s:?} is not a single character")),
            }
        }
        (ty, other) => return Err(format!("expected {ty:?}, found {other}")),
    };
    Ok(Some(scalar))
}

pub fn parse(src: &str) -> Result<Catalog> {
    from_str_with_path::<CatalogFile>(src)?.into_catalog()
}

pub fn load(path: &Path) -> Result<Catalog> {
    let bytes = std::fs::read(path)?;
    let file: CatalogFile = from_slice_with_path(&bytes)?;
    tracing::debug!(path = %path.display(), type_name = %file.name, "loaded catalog");
    file.into_catalog()
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{resolve, ProjectionKind};
    use crate::matcher::match_token;
    use crate::project::project;
    use pretty_assertions::assert_eq;

    const MATCH_TYPE: &str = r#"{
        "name": "MatchType",
        "config": { "projection": "ALIAS", "valueFieldName": "value", "aliasFieldName": "type" },
        "fields": [
            { "name": "value", "type": "integer" },
            { "name": "type", "type": "text" }
        ],
        "variants": [
            { "name": "UNKNOWN", "values": { "value": 0, "type": "unknown" } },
            { "name": "EXACT", "values": { "value": 1, "type": "exact" } },
            { "name": "WILDCARD", "values": { "value": 2, "type": "wildcard" } }
        ]
    }"#;

    #[test]
    fn catalog_drives_projection_and_matching() {
        let set = parse(MATCH_TYPE).unwrap();
        assert_eq!(set.type_name(), "MatchType");
        assert_eq!(set.config().map(|c| c.projection), Some(ProjectionKind::Alias));

        let effective = resolve(set.config(), None);
        let exact = set.variant_named("EXACT").unwrap();
        assert_eq!(project(&set, exact, &effective), Some(Scalar::from("exact")));

        let by_value = Config::new(ProjectionKind::Value).with_value_field("value");
        let effective_value = resolve(set.config(), Some(&by_value));
        assert_eq!(project(&set, exact, &effective_value), Some(Scalar::Integer(1)));

        for token in ["wildcard", "2", "WILDCARD"] {
            let hit = match_token(token, &set, &effective).map(|v| v.name());
            assert_eq!(hit, Some("WILDCARD"), "token {token}");
        }
    }

    #[test]
    fn values_are_checked_against_declared_types() {
        let src = r#"{
            "name": "Bad",
            "fields": [ { "name": "value", "type": "integer" } ],
            "variants": [ { "name": "A", "values": { "value": "one" } } ]
        }"#;
        let err = parse(src).unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"catalog `Bad`: variant `A`, field `value`: expected Integer, found "one""#
        );

        let src = r#"{
            "name": "Chars",
            "fields": [ { "name": "value", "type": "char" } ],
            "variants": [ { "name": "A", "values": { "value": "ab" } } ]
        }"#;
        assert!(matches!(parse(src), Err(Error::Catalog { .. })));
    }

    #[test]
    fn missing_and_null_values_are_absent() {
        let src = r#"{
            "name": "Sparse",
            "fields": [ { "name": "value", "type": "text", "role": "VALUE" } ],
            "variants": [
                { "name": "A", "values": { "value": "a" } },
                { "name": "B", "values": { "value": null } },
                { "name": "C" }
            ]
        }"#;
        let set = parse(src).unwrap();
        let field = set.field("value").unwrap();
        assert_eq!(field.role(), Some(Role::Value));
        assert_eq!(field.value_at(0), Some(&Scalar::from("a")));
        assert_eq!(field.value_at(1), None);
        assert_eq!(field.value_at(2), None);
    }

    #[test]
    fn undeclared_fields_are_rejected() {
        let src = r#"{ "name": "X", "variants": [ { "name": "A", "values": { "label": "a" } } ] }"#;
        let err = parse(src).unwrap_err();
        assert!(err.to_string().contains("undeclared field `label`"), "{err}");
    }

    #[test]
    fn structural_errors_carry_the_json_path() {
        let src = r#"{ "name": "X", "fields": [ { "name": "v", "type": "txt" } ], "variants": [] }"#;
        match parse(src) {
            Err(Error::Path { path, .. }) => assert_eq!(path, "fields[0].type"),
            other => panic!("expected a path error, got {other:?}"),
        }
    }
}
