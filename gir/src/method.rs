use roxmltree::Node;

use crate::ctype::{is_nullable, CType, C_NS};
use crate::diag::Diagnostics;
use crate::gname::GName;
use crate::record::Record;
use crate::registry::RegistrySnapshot;
use crate::thing::Thing;
use crate::typeref::TypeReference;

/// Where a method-shaped declaration came from. Free functions, class
/// methods, constructors, callbacks and signals all share one shape; the
/// role tag is orthogonal to it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MethodRole {
    Function,
    Method,
    Constructor,
    Callback,
    Signal,
}

/// Whether the callee acquires responsibility for releasing a value.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Ownership {
    #[default]
    None,
    Full,
    Container,
}

impl Ownership {
    fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some("full") => Self::Full,
            Some("container") => Self::Container,
            _ => Self::None,
        }
    }

    pub fn transfers(self) -> bool {
        self != Self::None
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    In,
    Out,
    InOut,
}

impl Direction {
    fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some("out") => Self::Out,
            Some("inout") => Self::InOut,
            _ => Self::In,
        }
    }
}

/// One parameter or return slot of a [`Method`].
#[derive(Clone, Debug)]
pub struct Argument {
    pub ctype: CType,
    pub type_ref: TypeReference,
    /// Marks the implicit receiver parameter.
    pub instance: bool,
    pub varargs: bool,
    pub ownership: Ownership,
    pub direction: Direction,
}

impl Argument {
    /// Maps a `<parameter>`, `<instance-parameter>` or `<return-value>`
    /// element. Varargs slots carry no type; they keep a void reference.
    pub fn from_xml(node: Node, instance: bool, diags: &Diagnostics) -> Self {
        let identifier = node.attribute("name").map(str::to_string);
        let varargs = node
            .children()
            .any(|c| c.is_element() && c.tag_name().name() == "varargs");

        let mut type_ref = node
            .children()
            .find(|c| {
                c.is_element() && matches!(c.tag_name().name(), "type" | "array")
            })
            .map(|type_node| TypeReference::from_xml(type_node, identifier.as_deref(), diags))
            .unwrap_or_else(TypeReference::void);
        if is_nullable(node) {
            type_ref.is_optional = true;
        }

        Self {
            ctype: CType::from_xml(node, identifier.unwrap_or_default()),
            type_ref,
            instance,
            varargs,
            ownership: Ownership::from_attr(node.attribute("transfer-ownership")),
            direction: Direction::from_attr(node.attribute("direction")),
        }
    }

    pub fn name(&self) -> &str {
        self.ctype.name()
    }
}

/// Getter prefix, setter prefix, and the boolean-query prefixes, shared by
/// the classification predicates and the accessor-pairing walk.
pub const GETTER_PREFIX: &str = "get_";
pub const SETTER_PREFIX: &str = "set_";
pub const QUERY_PREFIXES: &[&str] = &["is_", "has_", "can_", "should_"];

/// A method-shaped declaration: free function, class method, constructor,
/// callback or signal, distinguished only by [`MethodRole`].
///
/// All classification below is derived from name and shape on demand;
/// nothing is stored.
#[derive(Clone, Debug)]
pub struct Method {
    pub thing: Thing,
    /// The native symbol (`gtk_window_new`). Calls always use this.
    pub c_symbol: String,
    /// The declared short name; may be empty, in which case the symbol
    /// name stands in.
    pub declared_name: String,
    pub returns: Argument,
    pub args: Vec<Argument>,
    pub throws: bool,
    pub role: MethodRole,
}

impl Method {
    pub fn from_xml(node: Node, role: MethodRole, diags: &Diagnostics) -> Self {
        let declared_name = node.attribute("name").unwrap_or_default().to_string();
        let c_symbol = node
            .attribute((C_NS, "identifier"))
            .map(str::to_string)
            .unwrap_or_else(|| declared_name.clone());
        if c_symbol.is_empty() {
            diags.report("<anonymous>", "method element carries no usable name");
        }

        let returns = node
            .children()
            .find(|c| c.is_element() && c.tag_name().name() == "return-value")
            .map(|r| Argument::from_xml(r, false, diags))
            .unwrap_or_else(|| Argument {
                ctype: CType::default(),
                type_ref: TypeReference::void(),
                instance: false,
                varargs: false,
                ownership: Ownership::None,
                direction: Direction::In,
            });

        let mut args = Vec::new();
        if let Some(parameters) = node
            .children()
            .find(|c| c.is_element() && c.tag_name().name() == "parameters")
        {
            for parameter in parameters.children().filter(|c| c.is_element()) {
                match parameter.tag_name().name() {
                    "instance-parameter" => args.push(Argument::from_xml(parameter, true, diags)),
                    "parameter" => args.push(Argument::from_xml(parameter, false, diags)),
                    _ => {}
                }
            }
        }

        Self {
            thing: Thing::from_xml(node, declared_name.clone()),
            c_symbol,
            declared_name,
            returns,
            args,
            throws: node.attribute("throws") == Some("1"),
            role,
        }
    }

    /// The declared name, falling back to the native symbol.
    pub fn name(&self) -> &str {
        if self.declared_name.is_empty() {
            &self.c_symbol
        } else {
            &self.declared_name
        }
    }

    pub fn is_varargs(&self) -> bool {
        self.args.iter().any(|a| a.varargs)
    }

    pub fn instance_arg(&self) -> Option<&Argument> {
        self.args.iter().find(|a| a.instance)
    }

    pub fn non_instance_args(&self) -> impl Iterator<Item = &Argument> {
        self.args.iter().filter(|a| !a.instance)
    }

    fn is_unary(&self) -> bool {
        self.args.len() == 1 && self.args[0].instance
    }

    /// A unary method whose name carries a get or boolean-query prefix and
    /// which produces a value.
    pub fn is_getter(&self) -> bool {
        if !self.is_unary() || self.returns.type_ref.is_void() {
            return false;
        }
        let name = self.name();
        name.starts_with(GETTER_PREFIX) || QUERY_PREFIXES.iter().any(|p| name.starts_with(p))
    }

    /// A binary method (receiver plus one value) carrying the set prefix.
    pub fn is_setter(&self) -> bool {
        self.args.len() == 2
            && self.args[0].instance
            && self.name().starts_with(SETTER_PREFIX)
    }

    /// Retain candidate: unary and literally named `ref`.
    pub fn is_ref(&self) -> bool {
        self.is_unary() && self.name() == "ref"
    }

    /// Release candidate: unary and literally named `unref`.
    pub fn is_unref(&self) -> bool {
        self.is_unary() && self.name() == "unref"
    }

    /// Whether the return type is (optionally) an instance of `record` or of
    /// one of its ancestors.
    pub fn returns_instance_of(&self, record: &Record, snapshot: &RegistrySnapshot) -> bool {
        let returned = &self.returns.type_ref.name;
        if names_record(returned, record) {
            return true;
        }
        record
            .ancestry(snapshot)
            .iter()
            .any(|ancestor| names_record(returned, ancestor))
    }

    /// Constructor-candidate test: produces an instance of `record` (or an
    /// ancestor) and does not itself consume an instance of `record` as its
    /// first argument (which would make it a clone-style method).
    pub fn is_constructor_of(&self, record: &Record, snapshot: &RegistrySnapshot) -> bool {
        if !self.returns_instance_of(record, snapshot) {
            return false;
        }
        match self.args.first() {
            Some(first) => !names_record(&first.type_ref.name, record),
            None => true,
        }
    }

    /// The canonical `new` constructor.
    pub fn is_designated_constructor_of(
        &self,
        record: &Record,
        snapshot: &RegistrySnapshot,
    ) -> bool {
        self.is_constructor_of(record, snapshot) && self.name() == "new"
    }

    /// A zero-argument constructor-candidate not named `new`; excluded from
    /// ordinary constructor emission but kept as a named static factory.
    pub fn is_bare_factory_of(&self, record: &Record, snapshot: &RegistrySnapshot) -> bool {
        self.is_constructor_of(record, snapshot)
            && self.name() != "new"
            && self.non_instance_args().count() == 0
    }

    /// Every constructor-candidate except the designated one.
    pub fn is_factory_of(&self, record: &Record, snapshot: &RegistrySnapshot) -> bool {
        self.is_constructor_of(record, snapshot)
            && !self.is_designated_constructor_of(record, snapshot)
    }
}

fn names_record(name: &GName, record: &Record) -> bool {
    name.local == record.name()
        && name
            .namespace
            .as_deref()
            .map(|ns| ns == record.namespace)
            .unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Record, RecordKind};

    fn window_record() -> Record {
        Record::new("Gtk", "Window", "GtkWindow", RecordKind::Class)
    }

    fn snapshot() -> RegistrySnapshot {
        crate::registry::Registry::new().freeze()
    }

    fn returning(record: &Record, name: &str, args: Vec<Argument>) -> Method {
        Method {
            thing: Thing::default(),
            c_symbol: format!("gtk_window_{name}"),
            declared_name: name.to_string(),
            returns: Argument {
                ctype: CType::default(),
                type_ref: TypeReference::pointer(
                    GName::with_namespace("Gtk", record.name()),
                    "GtkWindow",
                    vec![false],
                ),
                instance: false,
                varargs: false,
                ownership: Ownership::Full,
                direction: Direction::In,
            },
            args,
            throws: false,
            role: MethodRole::Constructor,
        }
    }

    fn plain_argument(name: &str, type_name: GName) -> Argument {
        Argument {
            ctype: CType {
                thing: Thing {
                    name: name.to_string(),
                    ..Thing::default()
                },
                ..CType::default()
            },
            type_ref: TypeReference::value(type_name, ""),
            instance: false,
            varargs: false,
            ownership: Ownership::None,
            direction: Direction::In,
        }
    }

    #[test]
    fn new_with_no_arguments_is_designated() {
        let record = window_record();
        let snapshot = snapshot();
        let method = returning(&record, "new", vec![]);
        assert!(method.is_designated_constructor_of(&record, &snapshot));
        assert!(!method.is_bare_factory_of(&record, &snapshot));
    }

    #[test]
    fn named_candidate_with_argument_is_factory() {
        let record = window_record();
        let snapshot = snapshot();
        let method = returning(
            &record,
            "new_from_file",
            vec![plain_argument("filename", GName::bare("utf8"))],
        );
        assert!(method.is_factory_of(&record, &snapshot));
        assert!(!method.is_designated_constructor_of(&record, &snapshot));
        assert!(!method.is_bare_factory_of(&record, &snapshot));
    }

    #[test]
    fn zero_argument_candidate_with_other_name_is_bare_factory() {
        let record = window_record();
        let snapshot = snapshot();
        let method = returning(&record, "try_new", vec![]);
        assert!(method.is_bare_factory_of(&record, &snapshot));
        assert!(method.is_factory_of(&record, &snapshot));
    }

    #[test]
    fn clone_style_method_is_not_a_constructor() {
        let record = window_record();
        let snapshot = snapshot();
        let method = returning(
            &record,
            "copy",
            vec![plain_argument("self", GName::with_namespace("Gtk", "Window"))],
        );
        assert!(!method.is_constructor_of(&record, &snapshot));
    }

    #[test]
    fn accessor_predicates_follow_name_and_shape() {
        let record = window_record();
        let receiver = Argument {
            instance: true,
            ..plain_argument("self", GName::with_namespace("Gtk", "Window"))
        };

        let mut getter = returning(&record, "get_title", vec![receiver.clone()]);
        getter.returns.type_ref = TypeReference::value(GName::bare("utf8"), "gchar");
        assert!(getter.is_getter());
        assert!(!getter.is_setter());

        let query = {
            let mut m = getter.clone();
            m.declared_name = "is_active".to_string();
            m
        };
        assert!(query.is_getter());

        let setter = returning(
            &record,
            "set_title",
            vec![receiver, plain_argument("title", GName::bare("utf8"))],
        );
        assert!(setter.is_setter());
        assert!(!setter.is_getter());
    }

    #[test]
    fn ref_and_unref_are_unary_by_name() {
        let record = window_record();
        let receiver = Argument {
            instance: true,
            ..plain_argument("self", GName::with_namespace("Gtk", "Window"))
        };
        let method = returning(&record, "ref", vec![receiver.clone()]);
        assert!(method.is_ref());
        let method = returning(&record, "unref", vec![receiver]);
        assert!(method.is_unref());
    }
}
