//! Variant sets: ordered, immutable enumeration metadata.
//!
//! Field values are read once, when the set is built, and stored per variant in
//! each [`FieldDescriptor`]. Nothing downstream inspects the enum type itself.
use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{Config, Role};
use crate::error::{Error, Result};
use crate::locator::ResolvedFields;

// -------------------------------- Scalars --------------------------------- //

/// Declared type of a data field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    Text,
    Integer,
    Float,
    Boolean,
    Char,
}

impl ScalarType {
    /// Whether a value of this type can ever render as all-digit text.
    pub fn can_hold_digits(self) -> bool {
        matches!(self, Self::Text | Self::Integer)
    }

    pub fn of(scalar: &Scalar) -> Self {
        match scalar {
            Scalar::Text(_) => Self::Text,
            Scalar::Integer(_) => Self::Integer,
            Scalar::Float(_) => Self::Float,
            Scalar::Boolean(_) => Self::Boolean,
            Scalar::Char(_) => Self::Char,
        }
    }
}

/// Run-time value of a data field for one variant.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Char(char),
}

impl Scalar {
    /// JSON form: numbers unquoted, text quoted. Non-finite floats have none.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            Self::Text(s) => Some(Value::String(s.clone())),
            Self::Integer(i) => Some(Value::from(*i)),
            Self::Float(f) => serde_json::Number::from_f64(*f).map(Value::Number),
            Self::Boolean(b) => Some(Value::Bool(*b)),
            Self::Char(c) => Some(Value::String(c.to_string())),
        }
    }
}

/// Textual rendering compared against incoming tokens.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => f.write_str(&render_float(*x)),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Char(c) => write!(f, "{c}"),
        }
    }
}

/// Shortest round-trip JSON form, so `2.0` stays `"2.0"` instead of `"2"`.
pub(crate) fn render_float(x: f64) -> String {
    match serde_json::Number::from_f64(x) {
        Some(n) => n.to_string(),
        None => x.to_string(),
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for Scalar {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<u32> for Scalar {
    fn from(i: u32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<f64> for Scalar {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<char> for Scalar {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

// -------------------------------- Variants -------------------------------- //

#[derive(Clone, Debug)]
pub struct Variant<T> {
    value: T,
    name: Cow<'static, str>,
    ordinal: usize,
}

impl<T> Variant<T> {
    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }
}

/// A per-variant data member with its values already read.
#[derive(Clone, Debug)]
pub struct FieldDescriptor {
    name: Cow<'static, str>,
    ty: ScalarType,
    role: Option<Role>,
    values: Vec<Option<Scalar>>,
}

impl FieldDescriptor {
    /// `values` is indexed by ordinal; `None` is an absent value.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        ty: ScalarType,
        role: Option<Role>,
        values: Vec<Option<Scalar>>,
    ) -> Self {
        Self { name: name.into(), ty, role, values }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> ScalarType {
        self.ty
    }

    /// Role carried by the field's own annotation, if any.
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn value_at(&self, ordinal: usize) -> Option<&Scalar> {
        self.values.get(ordinal).and_then(Option::as_ref)
    }
}

// ------------------------------- VariantSet ------------------------------- //

#[derive(Debug)]
pub struct VariantSet<T> {
    type_name: Cow<'static, str>,
    config: Option<Config>,
    variants: Vec<Variant<T>>,
    fields: Vec<FieldDescriptor>,
    resolved: ResolvedFields,
}

impl<T> VariantSet<T> {
    pub fn builder(type_name: impl Into<Cow<'static, str>>) -> VariantSetBuilder<T> {
        VariantSetBuilder {
            type_name: type_name.into(),
            config: None,
            variants: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Build from `(value, name)` pairs in declaration order and fully read
    /// field descriptors.
    pub fn from_parts(
        type_name: impl Into<Cow<'static, str>>,
        config: Option<Config>,
        variants: Vec<(T, Cow<'static, str>)>,
        fields: Vec<FieldDescriptor>,
    ) -> Result<Self> {
        let type_name = type_name.into();

        let mut out = Vec::<Variant<T>>::with_capacity(variants.len());
        for (ordinal, (value, name)) in variants.into_iter().enumerate() {
            if out.iter().any(|v| v.name == name) {
                return Err(Error::DuplicateVariant { type_name: type_name.into_owned(), name: name.into_owned() });
            }
            out.push(Variant { value, name, ordinal });
        }

        for (i, field) in fields.iter().enumerate() {
            if fields[..i].iter().any(|f| f.name == field.name) {
                return Err(Error::DuplicateField { type_name: type_name.into_owned(), name: field.name.to_string() });
            }
            if field.values.len() != out.len() {
                return Err(Error::FieldArity {
                    type_name: type_name.into_owned(),
                    field: field.name.to_string(),
                    found: field.values.len(),
                    expected: out.len(),
                });
            }
        }

        Ok(Self {
            type_name,
            config,
            variants: out,
            fields,
            resolved: ResolvedFields::default(),
        })
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Type-level configuration, if the set declares one.
    pub fn config(&self) -> Option<&Config> {
        self.config.as_ref()
    }

    pub fn variants(&self) -> &[Variant<T>] {
        &self.variants
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn variant_at(&self, ordinal: usize) -> Option<&Variant<T>> {
        self.variants.get(ordinal)
    }

    pub fn variant_named(&self, name: &str) -> Option<&Variant<T>> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// Declared fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub(crate) fn resolved(&self) -> &ResolvedFields {
        &self.resolved
    }
}

impl<T: PartialEq> VariantSet<T> {
    pub fn variant_of(&self, value: &T) -> Option<&Variant<T>> {
        self.variants.iter().find(|v| v.value == *value)
    }
}

// -------------------------------- Builder --------------------------------- //

type Reader<T> = Box<dyn Fn(&T) -> Option<Scalar>>;

/// Declares a [`VariantSet`] from Rust values.
///
/// ```
/// use enum_json::{Config, ProjectionKind, Role, ScalarType, VariantSet};
///
/// #[derive(Clone, Copy, PartialEq, Debug)]
/// enum Day { Monday, Tuesday }
///
/// impl Day {
///     fn spanish(self) -> &'static str {
///         match self { Day::Monday => "Lunes", Day::Tuesday => "Martes" }
///     }
/// }
///
/// let set = VariantSet::builder("Day")
///     .config(Config::new(ProjectionKind::Value))
///     .variant(Day::Monday, "MONDAY")
///     .variant(Day::Tuesday, "TUESDAY")
///     .annotated_field("spanish", ScalarType::Text, Role::Value, |d: &Day| Some(d.spanish().into()))
///     .build()
///     .unwrap();
///
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.variant_at(1).map(|v| v.name()), Some("TUESDAY"));
/// ```
pub struct VariantSetBuilder<T> {
    type_name: Cow<'static, str>,
    config: Option<Config>,
    variants: Vec<(T, Cow<'static, str>)>,
    fields: Vec<(Cow<'static, str>, ScalarType, Option<Role>, Reader<T>)>,
}

impl<T> VariantSetBuilder<T> {
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Variants are numbered in the order they are added.
    pub fn variant(mut self, value: T, name: impl Into<Cow<'static, str>>) -> Self {
        self.variants.push((value, name.into()));
        self
    }

    /// A data field without a role annotation.
    pub fn field<F>(mut self, name: impl Into<Cow<'static, str>>, ty: ScalarType, read: F) -> Self
    where
        F: Fn(&T) -> Option<Scalar> + 'static,
    {
        self.fields.push((name.into(), ty, None, Box::new(read)));
        self
    }

    pub fn annotated_field<F>(mut self, name: impl Into<Cow<'static, str>>, ty: ScalarType, role: Role, read: F) -> Self
    where
        F: Fn(&T) -> Option<Scalar> + 'static,
    {
        self.fields.push((name.into(), ty, Some(role), Box::new(read)));
        self
    }

    pub fn build(self) -> Result<VariantSet<T>> {
        let fields = self
            .fields
            .into_iter()
            .map(|(name, ty, role, read)| {
                let values = self.variants.iter().map(|(value, _)| read(value)).collect();
                FieldDescriptor { name, ty, role, values }
            })
            .collect();
        VariantSet::from_parts(self.type_name, self.config, self.variants, fields)
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Num {
        One,
        Two,
    }

    fn nums() -> VariantSet<Num> {
        VariantSet::builder("Num")
            .variant(Num::One, "ONE")
            .variant(Num::Two, "TWO")
            .annotated_field("value", ScalarType::Integer, Role::Value, |n: &Num| {
                Some(match n {
                    Num::One => Scalar::Integer(1),
                    Num::Two => Scalar::Integer(2),
                })
            })
            .field("label", ScalarType::Text, |n: &Num| match n {
                Num::One => Some("one".into()),
                Num::Two => None,
            })
            .build()
            .unwrap()
    }

    #[test]
    fn ordinals_follow_declaration_order() {
        let set = nums();
        let names: Vec<_> = set.variants().iter().map(|v| (v.ordinal(), v.name())).collect();
        assert_eq!(names, vec![(0, "ONE"), (1, "TWO")]);
        assert_eq!(set.variant_of(&Num::Two).map(Variant::ordinal), Some(1));
        assert_eq!(set.variant_named("ONE").map(|v| *v.value()), Some(Num::One));
        assert!(set.variant_at(2).is_none());
    }

    #[test]
    fn field_values_are_read_once_per_variant() {
        let set = nums();
        let value = set.field("value").unwrap();
        assert_eq!(value.role(), Some(Role::Value));
        assert_eq!(value.value_at(1), Some(&Scalar::Integer(2)));

        let label = set.field("label").unwrap();
        assert_eq!(label.role(), None);
        assert_eq!(label.value_at(0), Some(&Scalar::Text("one".into())));
        assert_eq!(label.value_at(1), None);
    }

    #[test]
    fn duplicate_declarations_are_rejected() {
        let err = VariantSet::builder("Dup")
            .variant(1, "A")
            .variant(2, "A")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateVariant { ref name, .. } if name == "A"));

        let err = VariantSet::builder("Dup")
            .variant(1, "A")
            .field("x", ScalarType::Integer, |i: &i32| Some((*i).into()))
            .field("x", ScalarType::Integer, |i: &i32| Some((*i).into()))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateField { .. }));

        let err = VariantSet::<()>::from_parts(
            "Short",
            None,
            vec![((), "A".into()), ((), "B".into())],
            vec![FieldDescriptor::new("value", ScalarType::Text, None, vec![None])],
        )
        .unwrap_err();
        assert!(matches!(err, Error::FieldArity { found: 1, expected: 2, .. }));
    }

    #[test]
    fn scalars_render_like_json_text() {
        assert_eq!(Scalar::Float(2.0).to_string(), "2.0");
        assert_eq!(Scalar::Float(2.5).to_string(), "2.5");
        assert_eq!(Scalar::Integer(-7).to_string(), "-7");
        assert_eq!(Scalar::Char('x').to_json(), Some(Value::String("x".into())));
        assert_eq!(Scalar::Float(f64::NAN).to_json(), None);
        assert!(ScalarType::Integer.can_hold_digits());
        assert!(!ScalarType::Boolean.can_hold_digits());
        assert_eq!(ScalarType::of(&Scalar::Boolean(true)), ScalarType::Boolean);
    }
}
