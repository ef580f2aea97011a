use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::diag::Diagnostics;
use crate::method::Method;
use crate::named_type::{NamedType, TypeCategory};
use crate::record::Record;

/// Outcome of a registration attempt. Registration never fails hard; a
/// duplicate name is rejected and diagnosed, and the first entry stays.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Registration {
    Accepted,
    Rejected,
}

/// Append-only store for everything a document declares, keyed by name.
///
/// Each successful registration is stored under both the namespace-qualified
/// name (`Gtk.Window`) and the bare name (`Window`), so documents that refer
/// to a dependency's types by their short form still resolve. When two
/// namespaces declare the same short name, the first keeps the bare binding;
/// the qualified forms never collide.
///
/// The registry is mutable only while documents are being read. [`freeze`]
/// converts it into a [`RegistrySnapshot`] whose API is read-only, which is
/// what emission tasks share.
///
/// [`freeze`]: Registry::freeze
#[derive(Default)]
pub struct Registry {
    types: HashMap<String, NamedType>,
    records: HashMap<String, Arc<Record>>,
    functions: HashMap<String, Arc<Method>>,
}

fn insert_both_forms<V: Clone>(
    map: &mut HashMap<String, V>,
    qualified: String,
    bare: Option<String>,
    value: V,
) -> Registration {
    if map.contains_key(&qualified) {
        return Registration::Rejected;
    }
    if let Some(bare) = bare {
        if !map.contains_key(&bare) {
            map.insert(bare, value.clone());
        } else {
            debug!(name = %qualified, "short form already bound, keeping first");
        }
    }
    map.insert(qualified, value);
    Registration::Accepted
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_type(&mut self, ty: NamedType, diags: &Diagnostics) -> Registration {
        let qualified = ty.name.to_string();
        let bare = ty.name.namespace.is_some().then(|| ty.name.local.clone());
        let outcome = insert_both_forms(&mut self.types, qualified.clone(), bare, ty);
        if outcome == Registration::Rejected {
            diags.report(qualified, "ignored duplicate type registration");
        }
        outcome
    }

    pub fn register_record(&mut self, record: Arc<Record>, diags: &Diagnostics) -> Registration {
        let name = record.type_name();
        let qualified = name.to_string();
        let bare = name.namespace.is_some().then(|| name.local.clone());
        let outcome = insert_both_forms(&mut self.records, qualified.clone(), bare, record);
        if outcome == Registration::Rejected {
            diags.report(qualified, "ignored duplicate record registration");
        }
        outcome
    }

    pub fn register_function(&mut self, function: Arc<Method>, diags: &Diagnostics) -> Registration {
        let key = function.c_symbol.clone();
        if self.functions.contains_key(&key) {
            diags.report(key, "ignored duplicate function registration");
            return Registration::Rejected;
        }
        self.functions.insert(key, function);
        Registration::Accepted
    }

    pub fn lookup_type(&self, name: &str) -> Option<&NamedType> {
        self.types.get(name)
    }

    pub fn lookup_record(&self, name: &str) -> Option<&Arc<Record>> {
        self.records.get(name)
    }

    pub fn lookup_function(&self, c_symbol: &str) -> Option<&Arc<Method>> {
        self.functions.get(c_symbol)
    }

    /// Follows alias links until a non-alias type (or a dangling name) is
    /// reached. Cycles terminate at the repeated name.
    pub fn resolve_alias<'a>(&'a self, name: &str) -> Option<&'a NamedType> {
        let mut seen = Vec::new();
        let mut current = self.lookup_type(name)?;
        while current.category == TypeCategory::Alias {
            let target = current.parent.as_ref()?;
            let key = target.to_string();
            if seen.contains(&key) {
                break;
            }
            seen.push(key.clone());
            match self.lookup_type(&key) {
                Some(next) => current = next,
                None => break,
            }
        }
        Some(current)
    }

    /// The preload barrier: after every document is read, the registry is
    /// handed to emission as a read-only snapshot.
    pub fn freeze(self) -> RegistrySnapshot {
        RegistrySnapshot { inner: self }
    }
}

/// Read-only view over a populated [`Registry`]. This is the only form
/// emission tasks ever see, so concurrent readers need no locking.
pub struct RegistrySnapshot {
    inner: Registry,
}

impl RegistrySnapshot {
    pub fn lookup_type(&self, name: &str) -> Option<&NamedType> {
        self.inner.lookup_type(name)
    }

    pub fn lookup_record(&self, name: &str) -> Option<&Arc<Record>> {
        self.inner.lookup_record(name)
    }

    pub fn lookup_function(&self, c_symbol: &str) -> Option<&Arc<Method>> {
        self.inner.lookup_function(c_symbol)
    }

    pub fn resolve_alias<'a>(&'a self, name: &str) -> Option<&'a NamedType> {
        self.inner.resolve_alias(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gname::GName;
    use crate::named_type::{NamedType, TypeCategory};

    fn scalar(namespace: &str, local: &str, c_name: &str) -> NamedType {
        NamedType::new(
            GName::with_namespace(namespace, local),
            c_name,
            TypeCategory::Scalar,
        )
    }

    #[test]
    fn duplicate_registration_is_rejected_and_first_wins() {
        let diags = Diagnostics::new();
        let mut registry = Registry::new();

        let first = scalar("Gtk", "Widget", "GtkWidget");
        let second = scalar("Gtk", "Widget", "SomethingElse");

        assert_eq!(registry.register_type(first, &diags), Registration::Accepted);
        assert_eq!(registry.register_type(second, &diags), Registration::Rejected);

        let found = registry.lookup_type("Gtk.Widget").unwrap();
        assert_eq!(found.c_name, "GtkWidget");
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn registration_binds_both_name_forms() {
        let diags = Diagnostics::new();
        let mut registry = Registry::new();
        registry.register_type(scalar("Gtk", "Widget", "GtkWidget"), &diags);

        assert!(registry.lookup_type("Widget").is_some());
        assert!(registry.lookup_type("Gtk.Widget").is_some());
        assert!(registry.lookup_type("Gdk.Widget").is_none());
    }

    #[test]
    fn alias_resolution_follows_parent_links() {
        let diags = Diagnostics::new();
        let mut registry = Registry::new();
        registry.register_type(scalar("GLib", "Int", "gint"), &diags);
        registry.register_type(
            NamedType::alias(
                GName::with_namespace("Gtk", "Unit"),
                "GtkUnit",
                GName::with_namespace("GLib", "Int"),
            ),
            &diags,
        );

        let resolved = registry.resolve_alias("Gtk.Unit").unwrap();
        assert_eq!(resolved.c_name, "gint");
    }

    #[test]
    fn frozen_registry_still_resolves() {
        let diags = Diagnostics::new();
        let mut registry = Registry::new();
        registry.register_type(scalar("Gtk", "Widget", "GtkWidget"), &diags);
        let snapshot = registry.freeze();
        assert!(snapshot.lookup_type("Widget").is_some());
    }
}
