use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;

use crate::diag::Diagnostics;
use crate::gname::GName;
use crate::named_type::{NamedType, TypeCategory};
use crate::registry::Registry;

/// GLib scalar C types and their idiomatic Swift spellings.
///
/// Pointer-shaped and string-shaped names are handled by the type reference
/// model; this table only covers value types.
lazy_static! {
    static ref SWIFT_SCALARS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("gboolean", "Bool");
        m.insert("gchar", "CChar");
        m.insert("guchar", "CUnsignedChar");
        m.insert("gint", "CInt");
        m.insert("guint", "CUnsignedInt");
        m.insert("gshort", "CShort");
        m.insert("gushort", "CUnsignedShort");
        m.insert("glong", "CLong");
        m.insert("gulong", "CUnsignedLong");
        m.insert("gint8", "Int8");
        m.insert("guint8", "UInt8");
        m.insert("gint16", "Int16");
        m.insert("guint16", "UInt16");
        m.insert("gint32", "Int32");
        m.insert("guint32", "UInt32");
        m.insert("gint64", "Int64");
        m.insert("guint64", "UInt64");
        m.insert("gsize", "Int");
        m.insert("gssize", "Int");
        m.insert("goffset", "Int64");
        m.insert("gfloat", "Float");
        m.insert("gdouble", "Double");
        m.insert("gunichar", "UInt32");
        m.insert("gunichar2", "UInt16");
        // Plain C spellings occur in older documents.
        m.insert("char", "CChar");
        m.insert("int", "CInt");
        m.insert("unsigned int", "CUnsignedInt");
        m.insert("long", "CLong");
        m.insert("unsigned long", "CUnsignedLong");
        m.insert("short", "CShort");
        m.insert("float", "Float");
        m.insert("double", "Double");
        m.insert("size_t", "Int");
        m.insert("ssize_t", "Int");
        m
    };

    /// Every name on either side of [`SWIFT_SCALARS`] supports the
    /// constructor-call cast form (`CInt(x)`, `guint(x)`).
    static ref CASTABLE_SCALARS: HashSet<&'static str> = {
        let mut s = HashSet::new();
        for (native, swift) in SWIFT_SCALARS.iter() {
            s.insert(*native);
            s.insert(*swift);
        }
        s
    };
}

/// Registers the GLib scalar types so use-sites can resolve them like any
/// other named type. Runs once, before any document is read.
pub fn register_builtins(registry: &mut Registry, diags: &Diagnostics) {
    for native in SWIFT_SCALARS.keys() {
        registry.register_type(
            NamedType::new(GName::bare(*native), *native, TypeCategory::Scalar),
            diags,
        );
    }
    registry.register_type(
        NamedType::new(GName::bare("none"), "void", TypeCategory::Void),
        diags,
    );
}

pub fn swift_scalar(name: &str) -> Option<&'static str> {
    SWIFT_SCALARS.get(name).copied()
}

pub fn is_castable_scalar(name: &str) -> bool {
    CASTABLE_SCALARS.contains(name)
}

/// Boolean bridging is explicit on both sides of the C boundary.
pub fn is_boolean(name: &str) -> bool {
    name == "gboolean" || name == "Bool"
}

/// Untyped pointer names; these never get a typed wrapper.
pub fn is_raw_pointer(name: &str) -> bool {
    matches!(name, "gpointer" | "gconstpointer" | "void")
}

/// Character inner types: one level of indirection over these is a C string.
pub fn is_char(name: &str) -> bool {
    matches!(name, "gchar" | "guchar" | "char")
}

/// GIR-side names that stand for strings regardless of the C declaration.
pub fn is_string_name(name: &str) -> bool {
    matches!(name, "utf8" | "filename")
}

pub fn is_void(name: &str) -> bool {
    matches!(name, "none" | "void")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_table_is_symmetric_for_casts() {
        assert!(is_castable_scalar("guint"));
        assert!(is_castable_scalar("CInt"));
        assert!(is_castable_scalar("UInt64"));
        assert!(!is_castable_scalar("GtkWindow"));
    }

    #[test]
    fn booleans_are_not_plain_scalars_for_bridging() {
        assert!(is_boolean("gboolean"));
        assert!(is_boolean("Bool"));
        assert!(!is_boolean("gint"));
    }
}
