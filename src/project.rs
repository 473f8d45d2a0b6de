//! Serialize path: one variant to one external scalar token.
use crate::config::{EffectiveConfig, ProjectionKind};
use crate::locator::locate;
use crate::variant::{Scalar, Variant, VariantSet};

/// Render `variant` under `config`.
///
/// `None` means the designated field exists but holds no value for this
/// variant, or a value JSON cannot carry; the caller decides what to emit in that position. A field that
/// cannot be located falls back to the variant's name.
pub fn project<T>(set: &VariantSet<T>, variant: &Variant<T>, config: &EffectiveConfig<'_>) -> Option<Scalar> {
    match config.projection {
        ProjectionKind::Ordinal => Some(Scalar::Integer(variant.ordinal() as i64)),
        ProjectionKind::Name => Some(Scalar::from(variant.name())),
        kind @ (ProjectionKind::Alias | ProjectionKind::Value) => {
            // `role()` is always Some for these two kinds
            let field = kind.role().and_then(|role| locate(set, role, config));
            match field {
                // non-finite floats have no JSON form and count as absent
                Some(field) => field
                    .value_at(variant.ordinal())
                    .filter(|value| value.to_json().is_some())
                    .cloned(),
                None => {
                    tracing::trace!(
                        type_name = set.type_name(),
                        projection = %kind,
                        "no representative field, projecting by name"
                    );
                    Some(Scalar::from(variant.name()))
                }
            }
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
