use roxmltree::Node;
use tracing::debug;

use crate::builtins;
use crate::ctype::C_NS;
use crate::diag::Diagnostics;
use crate::gname::GName;
use crate::named_type::TypeCategory;
use crate::registry::RegistrySnapshot;

/// A use-site of a named type.
///
/// The same underlying type occurs with different indirection, constness and
/// nullability at different use-sites; this struct captures one such site and
/// computes its native and idiomatic renderings.
///
/// Invariant: `const_levels.len() == indirection`, one bit per pointer hop,
/// innermost hop first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeReference {
    /// GIR-side name of the inner type (`Gtk.Window`, `gint`, `utf8`).
    pub name: GName,
    /// Inner native representation without pointer markers (`GtkWindow`).
    pub c_repr: String,
    pub indirection: usize,
    pub const_levels: Vec<bool>,
    /// Constness of the innermost value itself.
    pub is_const: bool,
    pub is_optional: bool,
    /// An array of the inner type, as opposed to a pointer to it.
    pub is_array: bool,
    /// The identifier this use-site originated from, if any.
    pub identifier: Option<String>,
}

impl TypeReference {
    pub fn value(name: GName, c_repr: impl Into<String>) -> Self {
        Self {
            name,
            c_repr: c_repr.into(),
            indirection: 0,
            const_levels: Vec::new(),
            is_const: false,
            is_optional: false,
            is_array: false,
            identifier: None,
        }
    }

    pub fn pointer(name: GName, c_repr: impl Into<String>, const_levels: Vec<bool>) -> Self {
        Self {
            indirection: const_levels.len(),
            const_levels,
            ..Self::value(name, c_repr)
        }
    }

    pub fn void() -> Self {
        Self::value(GName::bare("none"), "void")
    }

    /// Builds a reference from a native declaration such as
    /// `const gchar* const*`, deriving indirection and per-level constness.
    pub fn from_c_declaration(name: GName, declaration: &str) -> Self {
        let (inner, is_const, const_levels) = decode_indirection(declaration);
        Self {
            name,
            c_repr: inner,
            indirection: const_levels.len(),
            const_levels,
            is_const,
            is_optional: false,
            is_array: false,
            identifier: None,
        }
    }

    /// Maps a `<type>` or `<array>` element to a reference. A missing name
    /// falls back to the native declaration, then to an indexed placeholder,
    /// so the parse itself never fails.
    pub fn from_xml(node: Node, identifier: Option<&str>, diags: &Diagnostics) -> Self {
        let is_array = node.tag_name().name() == "array";
        let (type_node, array_c_type) = if is_array {
            let inner = node
                .children()
                .find(|c| c.is_element() && c.tag_name().name() == "type");
            (inner, node.attribute((C_NS, "type")))
        } else {
            (Some(node), None)
        };

        let name_attr = type_node.and_then(|n| n.attribute("name"));
        let c_type = type_node
            .and_then(|n| n.attribute((C_NS, "type")))
            .or(array_c_type);

        let name = match (name_attr, c_type) {
            (Some(name), _) => GName::parse(name),
            (None, Some(c_type)) => {
                let (inner, _, _) = decode_indirection(c_type);
                GName::bare(inner)
            }
            (None, None) => {
                diags.report(
                    identifier.unwrap_or("<anonymous>"),
                    "type element carries neither a name nor a native declaration",
                );
                GName::bare("gpointer")
            }
        };

        // An array's own declaration carries the indirection; its inner
        // element only names the base type.
        let decl_source = if is_array { array_c_type.or(c_type) } else { c_type };
        let mut reference = match decl_source {
            Some(declaration) => Self::from_c_declaration(name, declaration),
            None => Self::value(name, String::new()),
        };
        if reference.c_repr.is_empty() {
            reference.c_repr = reference.name.local.clone();
        }
        reference.is_array = is_array;
        reference.identifier = identifier.map(str::to_string);
        reference
    }

    /// The literal native declaration for this use-site. Canonical form:
    /// optional leading `const `, the inner name, then one `*` per level with
    /// an optional trailing ` const` each. [`decode_indirection`] is the
    /// exact inverse.
    pub fn render_native(&self) -> String {
        let mut out = String::new();
        if self.is_const {
            out.push_str("const ");
        }
        out.push_str(&self.c_repr);
        for &level_const in &self.const_levels {
            out.push('*');
            if level_const {
                out.push_str(" const");
            }
        }
        out
    }

    /// Whether a plain scalar mapping exists at zero indirection.
    fn scalar_name(&self) -> &str {
        if self.c_repr.is_empty() {
            &self.name.local
        } else {
            &self.c_repr
        }
    }

    pub fn is_void(&self) -> bool {
        self.indirection == 0
            && (builtins::is_void(&self.name.local) || builtins::is_void(&self.c_repr))
    }

    /// C strings: one pointer hop over a character type, or a GIR string name.
    pub fn is_string(&self) -> bool {
        builtins::is_string_name(&self.name.local)
            || (self.indirection == 1 && builtins::is_char(&self.c_repr))
    }

    /// An untyped pointer at any indirection: `gpointer`, `gconstpointer`,
    /// or a bare `void*` declaration. A plain void value is not a pointer.
    pub fn is_raw_pointer(&self) -> bool {
        if self.is_void() {
            return false;
        }
        builtins::is_raw_pointer(&self.c_repr) || builtins::is_raw_pointer(&self.name.local)
    }

    fn category(&self, snapshot: &RegistrySnapshot) -> Option<TypeCategory> {
        snapshot
            .lookup_type(&self.name.to_string())
            .map(|t| t.category)
    }

    pub fn is_record(&self, snapshot: &RegistrySnapshot) -> bool {
        self.category(snapshot) == Some(TypeCategory::Record)
    }

    pub fn is_enumeration(&self, snapshot: &RegistrySnapshot) -> bool {
        self.category(snapshot) == Some(TypeCategory::Enumeration)
    }

    pub fn is_bitfield(&self, snapshot: &RegistrySnapshot) -> bool {
        self.category(snapshot) == Some(TypeCategory::Bitfield)
    }

    pub fn is_alias(&self, snapshot: &RegistrySnapshot) -> bool {
        self.category(snapshot) == Some(TypeCategory::Alias)
    }

    /// Optional-wrapper inference: a pointer to a record or bitfield-wrapped
    /// type needs an optional rendering unless the use-site is proven
    /// non-null. The conventional proven case is a method's receiver.
    pub fn infer_optional(&self, snapshot: &RegistrySnapshot, is_receiver: bool) -> bool {
        if is_receiver || self.indirection == 0 {
            return false;
        }
        if self.is_optional {
            return true;
        }
        matches!(
            self.category(snapshot),
            Some(TypeCategory::Record) | Some(TypeCategory::Bitfield)
        )
    }

    /// The idiomatic Swift rendering for this use-site.
    pub fn render_idiomatic(&self, snapshot: &RegistrySnapshot) -> String {
        let base = self.idiomatic_base(snapshot);
        if self.is_optional && !self.is_void() {
            format!("{base}?")
        } else {
            base
        }
    }

    fn idiomatic_base(&self, snapshot: &RegistrySnapshot) -> String {
        if self.is_void() {
            return "Void".to_string();
        }
        if self.is_string() {
            return "String".to_string();
        }
        if self.is_raw_pointer() {
            return if self.is_const || self.const_levels.last().copied().unwrap_or(false) {
                "UnsafeRawPointer".to_string()
            } else {
                "UnsafeMutableRawPointer".to_string()
            };
        }
        if self.indirection == 0 {
            if let Some(scalar) = builtins::swift_scalar(self.scalar_name()) {
                return scalar.to_string();
            }
            if let Some(named) = snapshot.lookup_type(&self.name.to_string()) {
                return named.name.local.clone();
            }
            return self.scalar_name().to_string();
        }
        match self.category(snapshot) {
            Some(TypeCategory::Record) => {
                let local = &self.name.local;
                let mut rendered = format!("{local}Ref");
                // Extra hops over a record pointer stay raw typed pointers.
                for _ in 1..self.indirection {
                    rendered = format!("UnsafeMutablePointer<{rendered}>");
                }
                rendered
            }
            _ => {
                let mut rendered = builtins::swift_scalar(self.scalar_name())
                    .map(str::to_string)
                    .unwrap_or_else(|| self.c_repr.clone());
                for &level_const in &self.const_levels {
                    rendered = if level_const || self.is_const {
                        format!("UnsafePointer<{rendered}>")
                    } else {
                        format!("UnsafeMutablePointer<{rendered}>")
                    };
                }
                rendered
            }
        }
    }
}

/// Parses trailing pointer markers and `const` qualifiers off a native
/// declaration, right to left, producing one constness bit per pointer
/// level (innermost first). Mutual inverse of
/// [`TypeReference::render_native`].
pub fn decode_indirection(declaration: &str) -> (String, bool, Vec<bool>) {
    let mut rest = declaration.trim();
    let mut outer_first: Vec<bool> = Vec::new();
    let mut pending_const = false;

    loop {
        rest = rest.trim_end();
        if let Some(stripped) = rest.strip_suffix("const") {
            // A trailing `const` with a star to its left qualifies that
            // pointer level; otherwise it belongs to the inner type.
            if stripped.trim_end().ends_with('*') {
                pending_const = true;
                rest = stripped;
                continue;
            }
            break;
        }
        if let Some(stripped) = rest.strip_suffix('*') {
            outer_first.push(pending_const);
            pending_const = false;
            rest = stripped;
            continue;
        }
        break;
    }

    let mut inner = rest.trim();
    let mut is_const = false;
    if let Some(stripped) = inner.strip_prefix("const ") {
        is_const = true;
        inner = stripped.trim();
    } else if let Some(stripped) = inner.strip_suffix(" const") {
        is_const = true;
        inner = stripped.trim();
    }

    outer_first.reverse();
    (inner.to_string(), is_const, outer_first)
}

/// Produces an expression converting `expression` between the renderings of
/// two use-sites. Rules, in priority order: identical renderings pass the
/// expression through; known scalars use the target's constructor-call form
/// with explicit boolean bridging; raw pointers adopt into record wrappers
/// and wrappers hand back their pointer; anything else passes through
/// unchanged and is logged for review.
pub fn cast(
    expression: &str,
    from: &TypeReference,
    to: &TypeReference,
    snapshot: &RegistrySnapshot,
) -> String {
    if from.render_native() == to.render_native() {
        return expression.to_string();
    }

    if from.indirection == 0 && to.indirection == 0 {
        let from_name = from.scalar_name();
        let to_name = to.scalar_name();
        let from_boolean = builtins::is_boolean(from_name);
        let to_boolean = builtins::is_boolean(to_name);
        if from_boolean && to_name == "Bool" {
            return format!("(({expression}) != 0)");
        }
        if to_boolean && to_name != "Bool" {
            return format!("{to_name}(({expression}) ? 1 : 0)");
        }
        if from_name == "Bool" && builtins::is_castable_scalar(to_name) {
            return format!("{to_name}(({expression}) ? 1 : 0)");
        }
        if builtins::is_castable_scalar(from_name) && builtins::is_castable_scalar(to_name) {
            return format!("{to_name}({expression})");
        }
    }

    if to.is_record(snapshot) && to.indirection > 0 && !from.is_record(snapshot) {
        return format!("{}Ref(raw: {expression})", to.name.local);
    }
    if from.is_record(snapshot) && from.indirection > 0 && !to.is_record(snapshot) {
        if to.is_raw_pointer() {
            return format!("{expression}.ptr");
        }
        if to.indirection > 0 {
            return format!(
                "{expression}.ptr.assumingMemoryBound(to: {}.self)",
                to.c_repr
            );
        }
    }

    debug!(
        from = %from.render_native(),
        to = %to.render_native(),
        "no cast rule applies, passing expression through"
    );
    expression.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::Diagnostics;
    use crate::named_type::NamedType;
    use crate::registry::Registry;

    fn empty_snapshot() -> RegistrySnapshot {
        Registry::new().freeze()
    }

    fn snapshot_with_record() -> RegistrySnapshot {
        let diags = Diagnostics::new();
        let mut registry = Registry::new();
        registry.register_type(
            NamedType::new(
                GName::with_namespace("Gtk", "Window"),
                "GtkWindow",
                TypeCategory::Record,
            ),
            &diags,
        );
        registry.freeze()
    }

    #[test]
    fn render_and_decode_round_trip() {
        let cases = [
            (false, vec![]),
            (true, vec![]),
            (false, vec![false]),
            (true, vec![true]),
            (false, vec![true, false]),
            (true, vec![false, true]),
            (false, vec![true, false, true]),
            (true, vec![true, true, true]),
        ];
        for (is_const, levels) in cases {
            let mut reference =
                TypeReference::pointer(GName::bare("gchar"), "gchar", levels.clone());
            reference.is_const = is_const;
            let rendered = reference.render_native();
            let (inner, decoded_const, decoded_levels) = decode_indirection(&rendered);
            assert_eq!(inner, "gchar", "inner for {rendered:?}");
            assert_eq!(decoded_const, is_const, "constness for {rendered:?}");
            assert_eq!(decoded_levels, levels, "levels for {rendered:?}");
        }
    }

    #[test]
    fn decode_reads_levels_right_to_left() {
        let (inner, is_const, levels) = decode_indirection("const gchar* const*");
        assert_eq!(inner, "gchar");
        assert!(is_const);
        assert_eq!(levels, vec![true, false]);
    }

    #[test]
    fn decode_handles_value_types() {
        let (inner, is_const, levels) = decode_indirection("guint");
        assert_eq!(inner, "guint");
        assert!(!is_const);
        assert!(levels.is_empty());
    }

    #[test]
    fn scalar_casts_are_textual_inverses() {
        let snapshot = empty_snapshot();
        let native = TypeReference::value(GName::bare("guint"), "guint");
        let idiomatic = TypeReference::value(GName::bare("CInt"), "CInt");

        let forward = cast("some_expression", &idiomatic, &native, &snapshot);
        let reverse = cast("some_expression", &native, &idiomatic, &snapshot);
        assert_eq!(forward, "guint(some_expression)");
        assert_eq!(reverse, "CInt(some_expression)");
    }

    #[test]
    fn boolean_bridging_is_explicit() {
        let snapshot = empty_snapshot();
        let native = TypeReference::value(GName::bare("gboolean"), "gboolean");
        let idiomatic = TypeReference::value(GName::bare("Bool"), "Bool");

        let forward = cast("bool_expression", &idiomatic, &native, &snapshot);
        let reverse = cast("bool_expression", &native, &idiomatic, &snapshot);
        assert_eq!(forward, "gboolean((bool_expression) ? 1 : 0)");
        assert_eq!(reverse, "((bool_expression) != 0)");
    }

    #[test]
    fn identical_renderings_pass_through() {
        let snapshot = empty_snapshot();
        let reference = TypeReference::pointer(GName::bare("gchar"), "gchar", vec![false]);
        assert_eq!(cast("value", &reference, &reference, &snapshot), "value");
    }

    #[test]
    fn record_pointers_render_as_wrapper_references() {
        let snapshot = snapshot_with_record();
        let mut reference = TypeReference::pointer(
            GName::with_namespace("Gtk", "Window"),
            "GtkWindow",
            vec![false],
        );
        assert_eq!(reference.render_idiomatic(&snapshot), "WindowRef");
        reference.is_optional = true;
        assert_eq!(reference.render_idiomatic(&snapshot), "WindowRef?");
    }

    #[test]
    fn raw_pointer_adopts_into_wrapper() {
        let snapshot = snapshot_with_record();
        let raw = TypeReference::pointer(GName::bare("gpointer"), "gpointer", vec![false]);
        let wrapper = TypeReference::pointer(
            GName::with_namespace("Gtk", "Window"),
            "GtkWindow",
            vec![false],
        );
        assert_eq!(
            cast("ptr", &raw, &wrapper, &snapshot),
            "WindowRef(raw: ptr)"
        );
        assert_eq!(cast("window", &wrapper, &raw, &snapshot), "window.ptr");
    }

    #[test]
    fn receiver_is_proven_non_null() {
        let snapshot = snapshot_with_record();
        let reference = TypeReference::pointer(
            GName::with_namespace("Gtk", "Window"),
            "GtkWindow",
            vec![false],
        );
        assert!(reference.infer_optional(&snapshot, false));
        assert!(!reference.infer_optional(&snapshot, true));
    }

    #[test]
    fn strings_render_idiomatically() {
        let snapshot = empty_snapshot();
        let reference = TypeReference::from_c_declaration(GName::bare("utf8"), "const gchar*");
        assert!(reference.is_string());
        assert_eq!(reference.render_idiomatic(&snapshot), "String");
    }
}
