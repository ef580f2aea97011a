use std::sync::Arc;

use roxmltree::Node;

use crate::alias::Alias;
use crate::constant::Constant;
use crate::context::ParseContext;
use crate::ctype::C_NS;
use crate::diag::Diagnostics;
use crate::enumeration::Enumeration;
use crate::error::GirError;
use crate::method::{Method, MethodRole};
use crate::named_type::{NamedType, TypeCategory};
use crate::record::{Record, RecordKind};
use crate::registry::Registry;

/// Everything one GIR `<namespace>` declares, grouped by declaration kind.
#[derive(Debug, Default)]
pub struct Namespace {
    pub name: String,
    pub version: String,
    pub shared_library: Option<String>,
    pub identifier_prefix: String,
    pub symbol_prefix: String,
    pub aliases: Vec<Alias>,
    pub constants: Vec<Constant>,
    pub enumerations: Vec<Enumeration>,
    pub bitfields: Vec<Enumeration>,
    pub records: Vec<Arc<Record>>,
    pub classes: Vec<Arc<Record>>,
    pub interfaces: Vec<Arc<Record>>,
    pub callbacks: Vec<Method>,
    pub functions: Vec<Arc<Method>>,
}

/// Reads one parsed GIR document into the entity model, registering every
/// declared type as it goes. Parsing is strictly single-threaded; the
/// registry must be frozen before any emission starts.
pub fn read_document(
    document: &roxmltree::Document,
    registry: &mut Registry,
    diags: &Diagnostics,
) -> Result<Namespace, GirError> {
    let repository = document.root_element();
    if repository.tag_name().name() != "repository" {
        return Err(GirError::MissingRepository);
    }
    let namespace_node = repository
        .children()
        .find(|c| c.is_element() && c.tag_name().name() == "namespace")
        .ok_or(GirError::MissingNamespace)?;

    let name = namespace_node.attribute("name").unwrap_or_default();
    let symbol_prefix = namespace_node
        .attribute((C_NS, "symbol-prefixes"))
        .unwrap_or_default();
    let mut context = ParseContext::new(registry, diags.clone(), name, symbol_prefix);

    let mut namespace = Namespace {
        name: name.to_string(),
        version: namespace_node
            .attribute("version")
            .unwrap_or_default()
            .to_string(),
        shared_library: namespace_node
            .attribute("shared-library")
            .map(str::to_string),
        identifier_prefix: namespace_node
            .attribute((C_NS, "identifier-prefixes"))
            .unwrap_or_default()
            .to_string(),
        symbol_prefix: context.symbol_prefix.clone(),
        ..Namespace::default()
    };

    for child in namespace_node.children().filter(|c| c.is_element()) {
        match child.tag_name().name() {
            "alias" => read_alias(&mut context, child, &mut namespace),
            "constant" => {
                let constant = Constant::from_xml(&mut context, child);
                namespace.constants.push(constant);
            }
            "enumeration" => read_enumeration(&mut context, child, &mut namespace, false),
            "bitfield" => read_enumeration(&mut context, child, &mut namespace, true),
            "record" | "union" => read_record(&mut context, child, &mut namespace, RecordKind::Plain),
            "class" => read_record(&mut context, child, &mut namespace, RecordKind::Class),
            "interface" => read_record(&mut context, child, &mut namespace, RecordKind::Interface),
            "callback" => read_callback(&mut context, child, &mut namespace),
            "function" => {
                let function = Arc::new(Method::from_xml(child, MethodRole::Function, diags));
                context.registry.register_function(function.clone(), diags);
                namespace.functions.push(function);
            }
            // Documentation-only and build-metadata elements.
            "doc" | "docsection" | "package" | "include" | "annotation" => {}
            other => diags.report(
                namespace.name.clone(),
                format!("skipping unsupported namespace child <{other}>"),
            ),
        }
    }

    Ok(namespace)
}

fn read_alias(context: &mut ParseContext, node: Node, namespace: &mut Namespace) {
    let alias = Alias::from_xml(context, node);
    let named = NamedType::alias(
        context.qualify(alias.name()),
        alias.ctype.c_name.clone(),
        alias.target.name.clone(),
    );
    context.registry.register_type(named, &context.diags);
    namespace.aliases.push(alias);
}

fn read_enumeration(
    context: &mut ParseContext,
    node: Node,
    namespace: &mut Namespace,
    is_bitfield: bool,
) {
    let enumeration = Enumeration::from_xml(context, node, is_bitfield);
    let category = if is_bitfield {
        TypeCategory::Bitfield
    } else {
        TypeCategory::Enumeration
    };
    let named = NamedType::new(
        context.qualify(enumeration.name()),
        enumeration.ctype.c_name.clone(),
        category,
    );
    context.registry.register_type(named, &context.diags);
    if is_bitfield {
        namespace.bitfields.push(enumeration);
    } else {
        namespace.enumerations.push(enumeration);
    }
}

fn read_record(context: &mut ParseContext, node: Node, namespace: &mut Namespace, kind: RecordKind) {
    let record = Arc::new(Record::from_xml(context, node, kind));
    let named = NamedType::new(
        record.type_name(),
        record.ctype.c_name.clone(),
        TypeCategory::Record,
    );
    let diags = context.diags.clone();
    context.registry.register_type(named, &diags);
    context.registry.register_record(record.clone(), &diags);
    match kind {
        RecordKind::Plain => namespace.records.push(record),
        RecordKind::Class => namespace.classes.push(record),
        RecordKind::Interface => namespace.interfaces.push(record),
    }
}

fn read_callback(context: &mut ParseContext, node: Node, namespace: &mut Namespace) {
    let callback = Method::from_xml(node, MethodRole::Callback, &context.diags);
    let c_name = node
        .attribute((C_NS, "type"))
        .unwrap_or(&callback.c_symbol)
        .to_string();
    let named = NamedType::new(
        context.qualify(callback.name()),
        c_name,
        TypeCategory::Callback,
    );
    context.registry.register_type(named, &context.diags);
    namespace.callbacks.push(callback);
}
