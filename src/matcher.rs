//! Deserialize path: one incoming token back to one variant.
//!
//! The search runs in fixed phases (name, alias, value, ordinal). Within a
//! phase variants are tried in declaration order and the first hit wins. An
//! all-digit token skips the name phase, skips field phases whose declared type
//! can never render as digits, and is the only kind of token that reaches the
//! ordinal phase. Nothing matching is not an error: the result is `None`.
use std::borrow::Cow;

use crate::config::{EffectiveConfig, Role};
use crate::locator::locate;
use crate::variant::{Scalar, Variant, VariantSet};

/// Where a token sits in the incoming document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Nesting {
    /// The token is the whole document.
    Root,
    /// The token is enclosed by an object or array.
    Nested,
}

/// Non-empty and made of ASCII digits only.
pub fn is_numeric(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

/// Remove exactly one layer of wrapping double quotes, if present.
pub fn strip_root_quotes(token: &str) -> &str {
    token
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(token)
}

/// [`match_token`] for a text token, unwrapping legacy double quoting at the
/// root only.
pub fn match_text_at<'s, T>(
    token: &str,
    nesting: Nesting,
    set: &'s VariantSet<T>,
    config: &EffectiveConfig<'_>,
) -> Option<&'s Variant<T>> {
    let token = match nesting {
        Nesting::Root => strip_root_quotes(token),
        Nesting::Nested => token,
    };
    match_token(token, set, config)
}

pub fn match_token<'s, T>(token: &str, set: &'s VariantSet<T>, config: &EffectiveConfig<'_>) -> Option<&'s Variant<T>> {
    let numeric = is_numeric(token);
    let case_insensitive = config.case_insensitive;

    if !numeric {
        if let Some(hit) = set.variants().iter().find(|v| text_eq(v.name(), token, case_insensitive)) {
            tracing::trace!(type_name = set.type_name(), token, variant = hit.name(), "matched by name");
            return Some(hit);
        }
    }

    for role in [Role::Alias, Role::Value] {
        if let Some(hit) = match_field(set, role, token, numeric, config) {
            tracing::trace!(type_name = set.type_name(), token, ?role, variant = hit.name(), "matched by field");
            return Some(hit);
        }
    }

    if numeric {
        // overflowing indices are simply out of range
        let hit = token.parse::<usize>().ok().and_then(|i| set.variant_at(i));
        if let Some(hit) = hit {
            tracing::trace!(type_name = set.type_name(), token, variant = hit.name(), "matched by ordinal");
            return Some(hit);
        }
    }

    tracing::debug!(type_name = set.type_name(), token, "no variant matches");
    None
}

fn match_field<'s, T>(
    set: &'s VariantSet<T>,
    role: Role,
    token: &str,
    numeric: bool,
    config: &EffectiveConfig<'_>,
) -> Option<&'s Variant<T>> {
    let field = locate(set, role, config)?;
    if numeric && !field.ty().can_hold_digits() {
        return None;
    }
    set.variants().iter().find(|v| {
        field
            .value_at(v.ordinal())
            .is_some_and(|value| text_eq(&render(value), token, config.case_insensitive))
    })
}

fn render(value: &Scalar) -> Cow<'_, str> {
    match value {
        Scalar::Text(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    }
}

fn text_eq(candidate: &str, token: &str, case_insensitive: bool) -> bool {
    candidate == token
        || (case_insensitive
            && (candidate.eq_ignore_ascii_case(token)
                || candidate
                    .chars()
                    .flat_map(char::to_lowercase)
                    .eq(token.chars().flat_map(char::to_lowercase))))
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{resolve, Config, ProjectionKind};
    use crate::project::project;
    use crate::variant::ScalarType;
    use pretty_assertions::assert_eq;

    fn name_of<T>(hit: Option<&Variant<T>>) -> Option<&str> {
        hit.map(Variant::name)
    }

    fn matched<'s, T>(set: &'s VariantSet<T>, token: &str, site: Option<&Config>) -> Option<&'s str> {
        name_of(match_token(token, set, &resolve(set.config(), site)))
    }

    fn some_days() -> VariantSet<&'static str> {
        let days = [("MONDAY", "Lunes", "Monday"), ("TUESDAY", "Martes", "Tuesday"), ("WEDNESDAY", "Miercoles", "Wednesday")];
        let mut builder = VariantSet::builder("SomeDays").config(
            Config::new(ProjectionKind::Value)
                .with_value_field("value")
                .with_alias_field("alias"),
        );
        for (name, _, _) in days {
            builder = builder.variant(name, name);
        }
        builder
            .field("value", ScalarType::Text, move |n: &&str| {
                days.iter().find(|d| d.0 == *n).map(|d| Scalar::from(d.1))
            })
            .field("alias", ScalarType::Text, move |n: &&str| {
                days.iter().find(|d| d.0 == *n).map(|d| Scalar::from(d.2))
            })
            .build()
            .unwrap()
    }

    #[test]
    fn value_alias_and_ordinal_scenario() {
        let set = some_days();
        let effective = resolve(set.config(), None);
        let tuesday = set.variant_named("TUESDAY").unwrap();
        assert_eq!(project(&set, tuesday, &effective), Some(Scalar::from("Martes")));

        assert_eq!(matched(&set, "Martes", None), Some("TUESDAY"));
        assert_eq!(matched(&set, "Tuesday", None), Some("TUESDAY"));
        assert_eq!(matched(&set, "TUESDAY", None), Some("TUESDAY"));
        assert_eq!(matched(&set, "1", None), Some("TUESDAY"));
        assert_eq!(matched(&set, "MAYO", None), None);
        assert_eq!(matched(&set, "3", None), None);
    }

    #[test]
    fn ordinal_scenario() {
        let set = VariantSet::builder("RYB")
            .config(Config::new(ProjectionKind::Ordinal))
            .variant(0u8, "RED")
            .variant(1, "YELLOW")
            .variant(2, "BLUE")
            .build()
            .unwrap();
        let effective = resolve(set.config(), None);
        let yellow = set.variant_named("YELLOW").unwrap();
        assert_eq!(project(&set, yellow, &effective), Some(Scalar::Integer(1)));

        for i in 0..set.len() {
            assert_eq!(matched(&set, &i.to_string(), None), Some(set.variant_at(i).unwrap().name()));
        }
        assert_eq!(matched(&set, "3", None), None);
        assert_eq!(matched(&set, "13", None), None);
        assert_eq!(matched(&set, "99999999999999999999999", None), None);
    }

    #[test]
    fn site_case_rule_overrides_type_case_rule() {
        let set = VariantSet::builder("Fish")
            .config(Config::new(ProjectionKind::Name).with_case_insensitive(true))
            .variant((), "TROUT")
            .variant((), "BASS")
            .build()
            .unwrap();
        assert_eq!(matched(&set, "trout", None), Some("TROUT"));
        assert_eq!(matched(&set, "bAsS", None), Some("BASS"));

        let strict = Config::new(ProjectionKind::Name);
        assert_eq!(matched(&set, "bAsS", Some(&strict)), None);
        assert_eq!(matched(&set, "BASS", Some(&strict)), Some("BASS"));
    }

    #[test]
    fn case_insensitive_names_match_both_cases() {
        let set = VariantSet::builder("Cars")
            .config(Config::new(ProjectionKind::Name).with_case_insensitive(true))
            .variant(0, "Corvette")
            .variant(1, "Camaro")
            .variant(2, "Ñandú")
            .build()
            .unwrap();
        for variant in set.variants() {
            assert_eq!(matched(&set, &variant.name().to_uppercase(), None), Some(variant.name()));
            assert_eq!(matched(&set, &variant.name().to_lowercase(), None), Some(variant.name()));
        }
    }

    #[test]
    fn integer_values_win_over_ordinals() {
        let set = VariantSet::builder("SomeNums")
            .config(Config::new(ProjectionKind::Value))
            .variant(1, "ONE")
            .variant(2, "TWO")
            .variant(3, "THREE")
            .annotated_field("value", ScalarType::Integer, Role::Value, |n: &i32| Some((*n).into()))
            .build()
            .unwrap();
        assert_eq!(matched(&set, "2", None), Some("TWO"));
        assert_eq!(matched(&set, "0", None), Some("ONE"));
        assert_eq!(matched(&set, "2.0", None), None);
    }

    #[test]
    fn fields_that_cannot_hold_digits_skip_numeric_tokens() {
        let set = VariantSet::builder("Flag")
            .variant(false, "OFF")
            .variant(true, "ON")
            .field("value", ScalarType::Boolean, |b: &bool| Some((*b).into()))
            .build()
            .unwrap();
        assert_eq!(matched(&set, "true", None), Some("ON"));
        assert_eq!(matched(&set, "1", None), Some("ON"));
    }

    #[test]
    fn numeric_looking_names_are_not_compared_by_name() {
        let set = VariantSet::builder("Odd").variant((), "1").variant((), "0").build().unwrap();
        // the ordinal phase answers, not the name phase
        assert_eq!(matched(&set, "1", None), Some("0"));
    }

    #[test]
    fn phases_run_in_order_across_all_variants() {
        let set = VariantSet::builder("Shadow")
            .variant(0, "FIRST")
            .variant(1, "SECOND")
            .field("alias", ScalarType::Text, |i: &i32| Some(if *i == 0 { "SECOND" } else { "first" }.into()))
            .build()
            .unwrap();
        // SECOND's name beats FIRST's alias even though FIRST is declared earlier
        assert_eq!(matched(&set, "SECOND", None), Some("SECOND"));
        assert_eq!(matched(&set, "first", None), Some("SECOND"));
    }

    #[test]
    fn first_declared_variant_wins_within_a_phase() {
        let set = VariantSet::builder("Dup")
            .variant(0, "A")
            .variant(1, "B")
            .field("value", ScalarType::Text, |_: &i32| Some("same".into()))
            .build()
            .unwrap();
        assert_eq!(matched(&set, "same", None), Some("A"));
    }

    #[test]
    fn empty_token_is_not_numeric() {
        assert!(!is_numeric(""));
        assert!(is_numeric("007"));
        assert!(!is_numeric("-1"));
        assert!(!is_numeric("١"));

        let set = VariantSet::builder("E").variant((), "A").build().unwrap();
        assert_eq!(matched(&set, "", None), None);
    }

    #[test]
    fn root_tokens_lose_one_layer_of_quotes() {
        let set = some_days();
        let effective = resolve(set.config(), None);
        let hit = match_text_at("\"Martes\"", Nesting::Root, &set, &effective);
        assert_eq!(name_of(hit), Some("TUESDAY"));

        let hit = match_text_at("\"Martes\"", Nesting::Nested, &set, &effective);
        assert_eq!(name_of(hit), None);

        assert_eq!(strip_root_quotes("\"\"x\"\""), "\"x\"");
        assert_eq!(strip_root_quotes("\""), "\"");
        assert_eq!(strip_root_quotes("plain"), "plain");
    }
}
