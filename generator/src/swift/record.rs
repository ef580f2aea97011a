use sg_gir::{Record, RecordKind};

use super::{accessors, constructors, functions, signal, GeneratorContext};

/// How the owning class tears an instance down.
enum Teardown {
    Call(String),
    None,
}

fn retain_statement(ctx: &GeneratorContext, record: &Record, accessor: &str) -> Option<String> {
    if let Some(retain) = record.ref_function() {
        return Some(format!("{}({accessor})", retain.c_symbol));
    }
    if record.derives_from_gobject(ctx.snapshot) {
        return Some("g_object_ref(ptr)".to_string());
    }
    None
}

fn release_statement(ctx: &GeneratorContext, record: &Record, accessor: &str) -> Teardown {
    if let Some(release) = record.unref_function() {
        return Teardown::Call(format!("{}({accessor})", release.c_symbol));
    }
    if record.derives_from_gobject(ctx.snapshot) {
        return Teardown::Call("g_object_unref(ptr)".to_string());
    }
    Teardown::None
}

/// Whether the record participates in retain/release and therefore gets an
/// owning reference type at all.
fn has_owning_class(ctx: &GeneratorContext, record: &Record) -> bool {
    match record.kind {
        RecordKind::Interface => false,
        RecordKind::Class => true,
        RecordKind::Plain => {
            record.ref_function().is_some() || record.unref_function().is_some()
        }
    }
}

fn protocol_declaration(ctx: &GeneratorContext, record: &Record) -> String {
    let name = record.name();
    let parent_protocol = record.parent_name.as_ref().and_then(|parent| {
        let key = parent.qualified_in(&record.namespace);
        let resolved = ctx.snapshot.lookup_record(&key);
        if resolved.is_none() {
            ctx.diags.report(
                record.type_name().to_string(),
                format!("parent type {key} is not registered, treating the record as a root"),
            );
        }
        resolved.map(|r| format!("{}Protocol", r.name()))
    });

    let mut out = ctx.documentation(&record.ctype.thing, "");
    match parent_protocol {
        Some(parent) => {
            out.push_str(&format!("public protocol {name}Protocol: {parent} {{}}\n\n"));
        }
        None => {
            out.push_str(&format!("public protocol {name}Protocol {{\n"));
            out.push_str("    /// Untyped pointer to the underlying instance.\n");
            out.push_str("    var ptr: UnsafeMutableRawPointer! { get }\n");
            out.push_str("}\n\n");
        }
    }
    out
}

fn capability_extension(ctx: &GeneratorContext, record: &Record) -> String {
    let name = record.name();
    let c_name = &record.ctype.c_name;
    let accessor = functions::ptr_accessor(record);

    let mut out = format!("extension {name}Protocol {{\n");
    out.push_str(&format!(
        "    /// Typed pointer to the underlying `{c_name}` instance.\n"
    ));
    out.push_str(&format!(
        "    public var {accessor}: UnsafeMutablePointer<{c_name}>! {{\n"
    ));
    out.push_str(&format!(
        "        ptr?.assumingMemoryBound(to: {c_name}.self)\n"
    ));
    out.push_str("    }\n\n");

    let pairs = accessors::pair_accessors(record);
    let consumed = accessors::consumed_symbols(&pairs);
    out.push_str(&accessors::emit_accessors(ctx, record, "    "));

    for method in &record.methods {
        if consumed.contains(&method.c_symbol) {
            continue;
        }
        out.push_str(&functions::emit_method(ctx, Some(record), method, "    "));
        out.push('\n');
    }
    for function in &record.functions {
        out.push_str(&functions::emit_method(ctx, Some(record), function, "    "));
        out.push('\n');
    }
    for event in &record.signals {
        out.push_str(&signal::emit_signal(ctx, record, event, "    "));
    }
    out.push_str("}\n\n");
    out
}

fn reference_struct(ctx: &GeneratorContext, record: &Record) -> String {
    let name = record.name();
    let c_name = &record.ctype.c_name;

    let mut out = format!(
        "/// A lightweight, non-owning reference to `{c_name}`. It neither\n/// retains nor releases the underlying instance; use it to borrow an\n/// instance someone else keeps alive.\n"
    );
    out.push_str(&format!("public struct {name}Ref: {name}Protocol {{\n"));
    out.push_str("    public let ptr: UnsafeMutableRawPointer!\n\n");
    out.push_str("    /// Borrows an existing raw pointer.\n");
    out.push_str("    public init(raw: UnsafeMutableRawPointer) { ptr = raw }\n\n");
    out.push_str(&format!(
        "    /// Borrows an existing typed pointer.\n    public init(_ pointer: UnsafeMutablePointer<{c_name}>) {{ ptr = UnsafeMutableRawPointer(pointer) }}\n\n"
    ));
    out.push_str(&format!(
        "    /// Borrows the instance of any other wrapper variant.\n    public init<T: {name}Protocol>(_ other: T) {{ ptr = other.ptr }}\n"
    ));
    if !has_owning_class(ctx, record) && !record.constructors.is_empty() {
        out.push('\n');
        out.push_str(&constructors::emit_ref_constructors(ctx, record, "    "));
    }
    out.push_str("}\n\n");
    out
}

fn owning_class(ctx: &GeneratorContext, record: &Record) -> String {
    let name = record.name();
    let c_name = &record.ctype.c_name;
    let typed = format!("ptr.assumingMemoryBound(to: {c_name}.self)");

    let mut out = format!(
        "/// An owning reference to `{c_name}`. Initializers either adopt an\n/// instance (taking over an existing reference) or share one (acquiring\n/// a reference of their own); deinitialization releases exactly once.\n"
    );
    out.push_str(&format!("open class {name}: {name}Protocol {{\n"));
    out.push_str("    public let ptr: UnsafeMutableRawPointer!\n\n");

    out.push_str("    /// Adopts ownership of `raw`; no retain is performed.\n");
    out.push_str("    public init(adopting raw: UnsafeMutableRawPointer) { ptr = raw }\n\n");

    out.push_str("    /// Shares ownership of `raw`; performs exactly one retain.\n");
    out.push_str("    public init(sharing raw: UnsafeMutableRawPointer) {\n");
    out.push_str("        ptr = raw\n");
    match retain_statement(ctx, record, &typed) {
        Some(statement) => out.push_str(&format!("        {statement}\n")),
        None => out.push_str("        // no retain function is known for this record\n"),
    }
    out.push_str("    }\n\n");

    out.push_str("    deinit {\n");
    match release_statement(ctx, record, &typed) {
        Teardown::Call(statement) => out.push_str(&format!("        {statement}\n")),
        Teardown::None => {
            ctx.diags.report(
                record.type_name().to_string(),
                "no release function was discovered; the owning class tears down as a no-op",
            );
            out.push_str("        // no release function is known for this record\n");
        }
    }
    out.push_str("    }\n\n");

    out.push_str(&constructors::emit_class_constructors(ctx, record, "    "));
    out.push_str("}\n\n");
    out
}

/// Emits the cooperating declarations for one record: the capability set,
/// the non-owning reference wrapper, and (for reference-counted records)
/// the owning class.
pub fn emit_record(ctx: &GeneratorContext, record: &Record) -> String {
    if ctx.is_excluded(record.name()) {
        return format!("// {} is excluded from generation\n", record.name());
    }
    let mut out = format!("// MARK: - {}\n\n", record.name());
    out.push_str(&protocol_declaration(ctx, record));
    out.push_str(&capability_extension(ctx, record));
    out.push_str(&reference_struct(ctx, record));
    if has_owning_class(ctx, record) {
        out.push_str(&owning_class(ctx, record));
    }
    out
}

pub fn emit_records(ctx: &GeneratorContext) -> String {
    ctx.namespace
        .records
        .iter()
        .map(|r| emit_record(ctx, r))
        .collect()
}

pub fn emit_classes(ctx: &GeneratorContext) -> String {
    ctx.namespace
        .classes
        .iter()
        .map(|r| emit_record(ctx, r))
        .collect()
}

pub fn emit_interfaces(ctx: &GeneratorContext) -> String {
    ctx.namespace
        .interfaces
        .iter()
        .map(|r| emit_record(ctx, r))
        .collect()
}
