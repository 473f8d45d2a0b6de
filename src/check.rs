//! Round-trip verification: project every variant under every projection and
//! read the token back, reporting variants that do not survive.
//!
//! Each projection is checked as if requested at a call site that keeps the
//! type's case rule and explicit field names and swaps only the projection.
use serde::Serialize;
use serde_json::Value;

use crate::config::{resolve, Config, ProjectionKind};
use crate::matcher::match_token;
use crate::project::project;
use crate::variant::{Variant, VariantSet};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Finding {
    /// Projection produced no token, so the variant would be written as `null`.
    Absent { projection: ProjectionKind, variant: String },
    /// The token reads back as another variant, or as nothing.
    #[serde(rename_all = "camelCase")]
    Mismatch {
        projection: ProjectionKind,
        variant: String,
        token: Value,
        read_back: Option<String>,
    },
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub type_name: String,
    pub variants: usize,
    pub findings: Vec<Finding>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

pub fn check_set<T>(set: &VariantSet<T>) -> Report {
    let base = set.config().cloned().unwrap_or_default();
    let mut findings = Vec::new();

    for projection in ProjectionKind::ALL {
        let site = Config { projection, ..base.clone() };
        let effective = resolve(set.config(), Some(&site));
        for variant in set.variants() {
            let Some(token) = project(set, variant, &effective) else {
                findings.push(Finding::Absent { projection, variant: variant.name().to_owned() });
                continue;
            };
            // serialized tokens are always nested, so no root unquoting here
            let read_back = match_token(&token.to_string(), set, &effective);
            if read_back.map(Variant::ordinal) != Some(variant.ordinal()) {
                findings.push(Finding::Mismatch {
                    projection,
                    variant: variant.name().to_owned(),
                    token: token.to_json().unwrap_or(Value::Null),
                    read_back: read_back.map(|v| v.name().to_owned()),
                });
            }
        }
    }

    tracing::debug!(type_name = set.type_name(), findings = findings.len(), "checked variant set");
    Report {
        type_name: set.type_name().to_owned(),
        variants: set.len(),
        findings,
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Role;
    use crate::variant::{Scalar, ScalarType};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn distinct_text_fields_round_trip_under_every_projection() {
        let set = VariantSet::builder("RGB")
            .config(Config::new(ProjectionKind::Alias).with_case_insensitive(true))
            .variant(0, "RED")
            .variant(1, "GREEN")
            .variant(2, "BLUE")
            .field("alias", ScalarType::Text, |i: &i32| Some(["r", "g", "b"][*i as usize].into()))
            .field("value", ScalarType::Text, |i: &i32| Some(["Rojo", "Verde", "Azul"][*i as usize].into()))
            .build()
            .unwrap();
        let report = check_set(&set);
        assert!(report.is_clean(), "{:?}", report.findings);
        assert_eq!(report.variants, 3);
    }

    #[test]
    fn integer_values_shadow_ordinal_tokens() {
        let set = VariantSet::builder("SomeNums")
            .variant(1, "ONE")
            .variant(2, "TWO")
            .variant(3, "THREE")
            .annotated_field("value", ScalarType::Integer, Role::Value, |n: &i32| Some((*n).into()))
            .build()
            .unwrap();
        let report = check_set(&set);
        assert_eq!(
            report.findings,
            vec![
                Finding::Mismatch {
                    projection: ProjectionKind::Ordinal,
                    variant: "TWO".into(),
                    token: json!(1),
                    read_back: Some("ONE".into()),
                },
                Finding::Mismatch {
                    projection: ProjectionKind::Ordinal,
                    variant: "THREE".into(),
                    token: json!(2),
                    read_back: Some("TWO".into()),
                },
            ]
        );
    }

    #[test]
    fn absent_values_are_reported() {
        let set = VariantSet::builder("Sparse")
            .variant(0, "A")
            .variant(1, "B")
            .field("value", ScalarType::Text, |i: &i32| (*i == 0).then(|| Scalar::from("a")))
            .build()
            .unwrap();
        let report = check_set(&set);
        assert_eq!(
            report.findings,
            vec![Finding::Absent { projection: ProjectionKind::Value, variant: "B".into() }]
        );
    }

    #[test]
    fn non_finite_floats_are_reported_absent() {
        let set = VariantSet::builder("Ratio")
            .variant(0, "A")
            .variant(1, "B")
            .field("value", ScalarType::Float, |i: &i32| Some(Scalar::Float(if *i == 0 { f64::NAN } else { 1.5 })))
            .build()
            .unwrap();
        let report = check_set(&set);
        assert_eq!(
            report.findings,
            vec![Finding::Absent { projection: ProjectionKind::Value, variant: "A".into() }]
        );
    }

    #[test]
    fn shipped_catalogs() {
        let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("catalogs");
        for (file, findings) in [("some_days.json", 0), ("some_nums.json", 2), ("match_type.json", 0), ("fish.json", 0)] {
            let set = crate::catalog::load(&dir.join(file)).unwrap();
            assert_eq!(check_set(&set).findings.len(), findings, "{file}");
        }
    }

    #[test]
    fn report_serializes_with_tagged_findings() {
        let report = Report {
            type_name: "X".into(),
            variants: 1,
            findings: vec![Finding::Mismatch {
                projection: ProjectionKind::Value,
                variant: "A".into(),
                token: json!("a"),
                read_back: None,
            }],
        };
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "typeName": "X",
                "variants": 1,
                "findings": [
                    { "kind": "mismatch", "projection": "VALUE", "variant": "A", "token": "a", "readBack": null }
                ]
            })
        );
    }
}
