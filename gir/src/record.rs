use std::sync::Arc;

use roxmltree::Node;

use crate::context::ParseContext;
use crate::ctype::{is_nullable, CType, C_NS, GLIB_NS};
use crate::gname::GName;
use crate::method::{Method, MethodRole};
use crate::registry::RegistrySnapshot;
use crate::thing::Thing;
use crate::typeref::TypeReference;

/// Which GIR element a record came from. Plain records are C structs;
/// classes and interfaces participate in the GObject type system.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RecordKind {
    Plain,
    Class,
    Interface,
}

/// A GObject-style property declaration.
#[derive(Clone, Debug)]
pub struct Property {
    pub thing: Thing,
    pub type_ref: TypeReference,
    pub writable: bool,
}

impl Property {
    fn from_xml(context: &mut ParseContext, node: Node) -> Self {
        let name = context.name_of(node, "property");
        let mut type_ref = node
            .children()
            .find(|c| c.is_element() && matches!(c.tag_name().name(), "type" | "array"))
            .map(|t| TypeReference::from_xml(t, Some(&name), &context.diags))
            .unwrap_or_else(TypeReference::void);
        if is_nullable(node) {
            type_ref.is_optional = true;
        }
        Self {
            thing: Thing::from_xml(node, name),
            type_ref,
            writable: node.attribute("writable") == Some("1"),
        }
    }
}

/// A struct field. Private and callback-typed fields are kept in the model
/// for layout fidelity but never surface in emitted declarations.
#[derive(Clone, Debug)]
pub struct Field {
    pub thing: Thing,
    pub type_ref: TypeReference,
    pub readable: bool,
    pub writable: bool,
    pub private: bool,
}

impl Field {
    fn from_xml(context: &mut ParseContext, node: Node) -> Self {
        let name = context.name_of(node, "field");
        let type_ref = node
            .children()
            .find(|c| c.is_element() && matches!(c.tag_name().name(), "type" | "array"))
            .map(|t| TypeReference::from_xml(t, Some(&name), &context.diags))
            .unwrap_or_else(TypeReference::void);
        Self {
            thing: Thing::from_xml(node, name),
            type_ref,
            readable: node.attribute("readable") != Some("0"),
            writable: node.attribute("writable") == Some("1"),
            private: node.attribute("private") == Some("1"),
        }
    }
}

/// A struct-like native type with its methods, properties and signals.
///
/// The parent is kept as a name, not a reference: the parent record may live
/// in a dependency document that is not loaded yet when this record is
/// constructed, so [`parent_type`] resolves through the registry on each
/// access.
///
/// [`parent_type`]: Record::parent_type
#[derive(Clone, Debug)]
pub struct Record {
    pub ctype: CType,
    pub namespace: String,
    pub kind: RecordKind,
    /// Prefix shared by this record's symbols (`gtk_window`).
    pub symbol_prefix: String,
    /// The type-identifier accessor (`gtk_window_get_type`), empty for
    /// plain C structs.
    pub type_getter: String,
    pub parent_name: Option<GName>,
    pub constructors: Vec<Method>,
    pub methods: Vec<Method>,
    pub functions: Vec<Method>,
    pub properties: Vec<Property>,
    pub signals: Vec<Method>,
    pub fields: Vec<Field>,
}

impl Record {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        c_name: impl Into<String>,
        kind: RecordKind,
    ) -> Self {
        let name = name.into();
        Self {
            ctype: CType {
                thing: Thing {
                    name: name.clone(),
                    introspectable: true,
                    ..Thing::default()
                },
                c_name: c_name.into(),
                ..CType::default()
            },
            namespace: namespace.into(),
            kind,
            symbol_prefix: String::new(),
            type_getter: String::new(),
            parent_name: None,
            constructors: Vec::new(),
            methods: Vec::new(),
            functions: Vec::new(),
            properties: Vec::new(),
            signals: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn from_xml(context: &mut ParseContext, node: Node, kind: RecordKind) -> Self {
        let name = context.name_of(node, "record");
        let mut record = Self::new(
            context.namespace.clone(),
            name.clone(),
            node.attribute((C_NS, "type"))
                .or_else(|| node.attribute((GLIB_NS, "type-name")))
                .unwrap_or(name.as_str())
                .to_string(),
            kind,
        );
        record.ctype.thing = Thing::from_xml(node, name);
        record.symbol_prefix = node
            .attribute((C_NS, "symbol-prefix"))
            .map(str::to_string)
            .unwrap_or_default();
        record.type_getter = node
            .attribute((GLIB_NS, "get-type"))
            .map(str::to_string)
            .unwrap_or_default();
        record.parent_name = node.attribute("parent").map(GName::parse);

        for child in node.children().filter(|c| c.is_element()) {
            match child.tag_name().name() {
                "constructor" => record.constructors.push(Method::from_xml(
                    child,
                    MethodRole::Constructor,
                    &context.diags,
                )),
                "method" => {
                    record
                        .methods
                        .push(Method::from_xml(child, MethodRole::Method, &context.diags))
                }
                "function" => record.functions.push(Method::from_xml(
                    child,
                    MethodRole::Function,
                    &context.diags,
                )),
                "signal" => {
                    record
                        .signals
                        .push(Method::from_xml(child, MethodRole::Signal, &context.diags))
                }
                "property" => record.properties.push(Property::from_xml(context, child)),
                "field" => record.fields.push(Field::from_xml(context, child)),
                // Virtual method tables and prerequisites contribute nothing
                // to the wrapper surface.
                "virtual-method" | "prerequisite" | "implements" | "doc" | "doc-deprecated"
                | "source-position" | "attribute" => {}
                other => context.diags.report(
                    record.ctype.name().to_string(),
                    format!("skipping unsupported child element <{other}>"),
                ),
            }
        }
        record
    }

    pub fn name(&self) -> &str {
        self.ctype.name()
    }

    pub fn type_name(&self) -> GName {
        GName::with_namespace(self.namespace.clone(), self.name())
    }

    /// Resolves the parent by name in the registry at call time.
    pub fn parent_type(&self, snapshot: &RegistrySnapshot) -> Option<Arc<Record>> {
        let parent = self.parent_name.as_ref()?;
        snapshot
            .lookup_record(&parent.qualified_in(&self.namespace))
            .cloned()
    }

    /// Every ancestor from the immediate parent up to the root, resolved
    /// through the registry. A dangling or cyclic parent chain ends the walk.
    pub fn ancestry(&self, snapshot: &RegistrySnapshot) -> Vec<Arc<Record>> {
        let mut seen = vec![self.type_name().to_string()];
        let mut out = Vec::new();
        let mut current = self.parent_type(snapshot);
        while let Some(record) = current {
            let key = record.type_name().to_string();
            if seen.contains(&key) {
                break;
            }
            seen.push(key);
            current = record.parent_type(snapshot);
            out.push(record);
        }
        out
    }

    /// The furthest ancestor, or the record itself if it has no parent.
    pub fn root_type(&self, snapshot: &RegistrySnapshot) -> GName {
        self.ancestry(snapshot)
            .last()
            .map(|r| r.type_name())
            .unwrap_or_else(|| self.type_name())
    }

    /// Retain function discovered by scanning this record's own methods.
    pub fn ref_function(&self) -> Option<&Method> {
        self.methods.iter().find(|m| m.is_ref())
    }

    /// Release function discovered by scanning this record's own methods.
    pub fn unref_function(&self) -> Option<&Method> {
        self.methods.iter().find(|m| m.is_unref())
    }

    pub fn derives_from_gobject(&self, snapshot: &RegistrySnapshot) -> bool {
        let gobject = |name: &GName| name.to_string() == "GObject.Object";
        gobject(&self.type_name())
            || self
                .ancestry(snapshot)
                .iter()
                .any(|r| gobject(&r.type_name()))
            || self
                .parent_name
                .as_ref()
                .map(|p| p.qualified_in(&self.namespace) == "GObject.Object")
                .unwrap_or(false)
    }

    /// Whether the record participates in reference counting at all, via its
    /// own ref/unref pair or the GObject root.
    pub fn is_reference_counted(&self, snapshot: &RegistrySnapshot) -> bool {
        self.unref_function().is_some() || self.derives_from_gobject(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::Diagnostics;
    use crate::registry::Registry;

    #[test]
    fn parent_is_resolved_by_name_at_call_time() {
        let diags = Diagnostics::new();
        let mut registry = Registry::new();

        let mut child = Record::new("Gtk", "Window", "GtkWindow", RecordKind::Class);
        child.parent_name = Some(GName::bare("Widget"));

        // The child exists before its parent is registered; resolution only
        // happens against the snapshot.
        let parent = Record::new("Gtk", "Widget", "GtkWidget", RecordKind::Class);
        registry.register_record(Arc::new(parent), &diags);
        let snapshot = registry.freeze();

        let resolved = child.parent_type(&snapshot).unwrap();
        assert_eq!(resolved.name(), "Widget");
    }

    #[test]
    fn ancestry_walks_to_the_root() {
        let diags = Diagnostics::new();
        let mut registry = Registry::new();

        let object = Record::new("GObject", "Object", "GObject", RecordKind::Class);
        let mut widget = Record::new("Gtk", "Widget", "GtkWidget", RecordKind::Class);
        widget.parent_name = Some(GName::with_namespace("GObject", "Object"));
        let mut window = Record::new("Gtk", "Window", "GtkWindow", RecordKind::Class);
        window.parent_name = Some(GName::bare("Widget"));

        registry.register_record(Arc::new(object), &diags);
        registry.register_record(Arc::new(widget), &diags);
        let window = Arc::new(window);
        registry.register_record(window.clone(), &diags);
        let snapshot = registry.freeze();

        let names: Vec<String> = window
            .ancestry(&snapshot)
            .iter()
            .map(|r| r.type_name().to_string())
            .collect();
        assert_eq!(names, vec!["Gtk.Widget", "GObject.Object"]);
        assert_eq!(window.root_type(&snapshot).to_string(), "GObject.Object");
        assert!(window.is_reference_counted(&snapshot));
    }

    #[test]
    fn cyclic_parent_chain_terminates() {
        let diags = Diagnostics::new();
        let mut registry = Registry::new();

        let mut a = Record::new("Ns", "A", "NsA", RecordKind::Class);
        a.parent_name = Some(GName::bare("B"));
        let mut b = Record::new("Ns", "B", "NsB", RecordKind::Class);
        b.parent_name = Some(GName::bare("A"));

        let a = Arc::new(a);
        registry.register_record(a.clone(), &diags);
        registry.register_record(Arc::new(b), &diags);
        let snapshot = registry.freeze();

        assert_eq!(a.ancestry(&snapshot).len(), 1);
    }
}
