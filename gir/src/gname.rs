use std::fmt;

/// A GIR type name, optionally qualified with the namespace that declares it.
///
/// Names referring to types from other documents appear in their dotted form
/// (`Gtk.Widget`); names local to the document being parsed usually appear
/// bare (`Widget`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GName {
    pub namespace: Option<String>,
    pub local: String,
}

impl fmt::Display for GName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(namespace) = self.namespace.as_ref() {
            write!(f, "{}.{}", namespace, self.local)
        } else {
            write!(f, "{}", self.local)
        }
    }
}

impl GName {
    pub fn with_namespace(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local: local.into(),
        }
    }

    pub fn bare(local: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local: local.into(),
        }
    }

    /// Splits a dotted name (`GLib.Variant`) into namespace and local parts.
    /// Names without a dot stay unqualified.
    pub fn parse(source: &str) -> Self {
        if let Some((namespace, local)) = source.rsplit_once('.') {
            Self::with_namespace(namespace, local)
        } else {
            Self::bare(source)
        }
    }

    /// The namespace-qualified form, falling back to `default_namespace` for
    /// bare names. Registry keys use this form.
    pub fn qualified_in(&self, default_namespace: &str) -> String {
        match self.namespace.as_deref() {
            Some(namespace) => format!("{}.{}", namespace, self.local),
            None => format!("{}.{}", default_namespace, self.local),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_on_last_dot() {
        let name = GName::parse("GLib.Variant");
        assert_eq!(name.namespace.as_deref(), Some("GLib"));
        assert_eq!(name.local, "Variant");
    }

    #[test]
    fn parse_keeps_bare_names_unqualified() {
        let name = GName::parse("Widget");
        assert_eq!(name.namespace, None);
        assert_eq!(name.local, "Widget");
    }

    #[test]
    fn qualified_in_uses_default_for_bare_names() {
        assert_eq!(GName::parse("Widget").qualified_in("Gtk"), "Gtk.Widget");
        assert_eq!(
            GName::parse("GLib.Variant").qualified_in("Gtk"),
            "GLib.Variant"
        );
    }
}
