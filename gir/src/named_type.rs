use crate::gname::GName;

/// What kind of declaration a registered name stands for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TypeCategory {
    Scalar,
    Record,
    Enumeration,
    Bitfield,
    Alias,
    Callback,
    Void,
}

/// Registry descriptor for a named type.
///
/// Created once while a document is read and immutable afterwards; the
/// registry never overwrites an existing entry (first registration wins).
#[derive(Clone, Debug)]
pub struct NamedType {
    pub name: GName,
    /// The underlying native representation (`GtkWindow`, `gint`).
    pub c_name: String,
    pub category: TypeCategory,
    /// For aliases: the name this type stands for.
    pub parent: Option<GName>,
}

impl NamedType {
    pub fn new(name: GName, c_name: impl Into<String>, category: TypeCategory) -> Self {
        Self {
            name,
            c_name: c_name.into(),
            category,
            parent: None,
        }
    }

    pub fn alias(name: GName, c_name: impl Into<String>, target: GName) -> Self {
        Self {
            name,
            c_name: c_name.into(),
            category: TypeCategory::Alias,
            parent: Some(target),
        }
    }
}
