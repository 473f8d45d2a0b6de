//! Locates the data field that represents a variant for the ALIAS or VALUE role.
//!
//! Resolution order, first success wins:
//! 1. the field explicitly named by the effective config,
//! 2. the first declared field annotated with the role,
//! 3. a field named after the role by convention (`alias` / `value`).
//!
//! Results resolved under the type-level config are published once per
//! (variant set, role) and read lock-free afterwards.
use once_cell::sync::OnceCell;

use crate::config::{EffectiveConfig, Role};
use crate::variant::{FieldDescriptor, VariantSet};

/// Per-set cache of located field indices, one slot per [`Role`].
#[derive(Debug, Default)]
pub(crate) struct ResolvedFields {
    slots: [OnceCell<Option<usize>>; 2],
}

impl ResolvedFields {
    fn slot(&self, role: Role) -> &OnceCell<Option<usize>> {
        &self.slots[role.index()]
    }

    /// Published entry for `role`, if any call has populated it yet.
    pub(crate) fn get(&self, role: Role) -> Option<Option<usize>> {
        self.slot(role).get().copied()
    }
}

pub fn locate<'s, T>(set: &'s VariantSet<T>, role: Role, config: &EffectiveConfig<'_>) -> Option<&'s FieldDescriptor> {
    let requested = config.field_name(role);
    let declared = set.config().and_then(|c| c.field_name(role));

    if requested != declared {
        // call site shadows the type's field designation; never cached
        let index = find_field(set, role, requested);
        tracing::trace!(
            type_name = set.type_name(),
            ?role,
            ?requested,
            field = ?index.map(|i| set.fields()[i].name()),
            "resolved call-site field"
        );
        return index.map(|i| &set.fields()[i]);
    }

    let index = *set.resolved().slot(role).get_or_init(|| {
        let index = find_field(set, role, declared);
        tracing::debug!(
            type_name = set.type_name(),
            ?role,
            field = ?index.map(|i| set.fields()[i].name()),
            "resolved representative field"
        );
        index
    });
    index.map(|i| &set.fields()[i])
}

fn find_field<T>(set: &VariantSet<T>, role: Role, explicit: Option<&str>) -> Option<usize> {
    let fields = set.fields();
    explicit
        .and_then(|name| fields.iter().position(|f| f.name() == name))
        .or_else(|| fields.iter().position(|f| f.role() == Some(role)))
        .or_else(|| fields.iter().position(|f| f.name() == role.conventional_field_name()))
}

// ------------------------------- Tests ------------------------------------ //
