use roxmltree::Node;

use crate::thing::Thing;
use crate::typeref::TypeReference;

/// Namespace URI of GIR's C-attribute vocabulary (`c:type`, `c:identifier`).
pub const C_NS: &str = "http://www.gtk.org/introspection/c/1.0";

/// Namespace URI of GIR's GLib vocabulary (`glib:get-type`, `glib:signal`).
pub const GLIB_NS: &str = "http://www.gtk.org/introspection/glib/1.0";

/// A model node backed by a native C type.
#[derive(Clone, Debug, Default)]
pub struct CType {
    pub thing: Thing,
    /// The native representation (`GtkWindow`, `gint`).
    pub c_name: String,
    /// Element types, nonempty only for arrays and tuple-like containers.
    /// Owned by this node; never shared.
    pub contained: Vec<TypeReference>,
    pub nullable: bool,
    /// Binding scope annotation for callback-typed values
    /// (`call`, `async`, `notified`).
    pub scope: Option<String>,
}

impl CType {
    pub fn from_xml(node: Node, name: String) -> Self {
        Self {
            thing: Thing::from_xml(node, name),
            c_name: node
                .attribute((C_NS, "type"))
                .or_else(|| node.attribute((GLIB_NS, "type-name")))
                .unwrap_or_default()
                .to_string(),
            contained: Vec::new(),
            nullable: is_nullable(node),
            scope: node.attribute("scope").map(str::to_string),
        }
    }

    pub fn name(&self) -> &str {
        &self.thing.name
    }
}

/// Either spelling of the nullability annotation marks the value nullable.
pub fn is_nullable(node: Node) -> bool {
    node.attribute("nullable") == Some("1") || node.attribute("allow-none") == Some("1")
}
