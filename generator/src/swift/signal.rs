use std::fmt;

use heck::ToUpperCamelCase;

use sg_gir::{Method, Record, RegistrySnapshot, TypeReference};

use super::{functions, GeneratorContext};

/// One reason a typed subscription cannot be generated for an event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SignalViolation {
    OwnershipTransfer,
    OutDirection,
    VoidTyped,
    RawPointer,
    AliasType,
    OptionalReturn,
    ArrayInvolved,
    NullableReturn,
    RecordReturn,
}

impl fmt::Display for SignalViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::OwnershipTransfer => "an argument requires ownership transfer",
            Self::OutDirection => "an argument uses an out or inout direction",
            Self::VoidTyped => "an argument or return is void-typed",
            Self::RawPointer => "an argument or return is an untyped pointer",
            Self::AliasType => "an argument or return is an alias type",
            Self::OptionalReturn => "the return value would need an optional wrapper",
            Self::ArrayInvolved => "an argument or return is an array",
            Self::NullableReturn => "the return value is nullable",
            Self::RecordReturn => "the return value is a record",
        };
        f.write_str(text)
    }
}

/// A void return is declared as `none` and is fine; a value slot whose
/// native declaration collapsed to bare `void` is not.
fn is_untyped_void(reference: &TypeReference) -> bool {
    reference.c_repr == "void" && reference.name.local != "none" && reference.indirection == 0
}

/// Evaluates all nine safety conditions independently and reports every
/// failure, not just the first.
pub fn violations(signal: &Method, snapshot: &RegistrySnapshot) -> Vec<SignalViolation> {
    let mut found = Vec::new();
    let arguments: Vec<_> = signal.non_instance_args().collect();
    let returns = &signal.returns;

    if arguments.iter().any(|a| a.ownership.transfers()) {
        found.push(SignalViolation::OwnershipTransfer);
    }
    if arguments
        .iter()
        .any(|a| a.direction != sg_gir::Direction::In)
    {
        found.push(SignalViolation::OutDirection);
    }
    if arguments.iter().any(|a| a.type_ref.is_void())
        || is_untyped_void(&returns.type_ref)
    {
        found.push(SignalViolation::VoidTyped);
    }
    if arguments.iter().any(|a| a.type_ref.is_raw_pointer())
        || returns.type_ref.is_raw_pointer()
    {
        found.push(SignalViolation::RawPointer);
    }
    if arguments.iter().any(|a| a.type_ref.is_alias(snapshot))
        || returns.type_ref.is_alias(snapshot)
    {
        found.push(SignalViolation::AliasType);
    }
    if returns.type_ref.infer_optional(snapshot, false) {
        found.push(SignalViolation::OptionalReturn);
    }
    if arguments.iter().any(|a| a.type_ref.is_array) || returns.type_ref.is_array {
        found.push(SignalViolation::ArrayInvolved);
    }
    if returns.ctype.nullable || returns.type_ref.is_optional {
        found.push(SignalViolation::NullableReturn);
    }
    if returns.type_ref.is_record(snapshot) {
        found.push(SignalViolation::RecordReturn);
    }
    found
}

fn subscribe_name(signal: &Method) -> String {
    format!("on{}", signal.name().replace('-', "_").to_upper_camel_case())
}

/// Enumerations and bitfields cross the native-callback boundary as
/// fixed-width integers, never as their wrapper type.
fn trampoline_native_type(reference: &TypeReference, snapshot: &RegistrySnapshot) -> String {
    if reference.is_enumeration(snapshot) {
        return "Int32".to_string();
    }
    if reference.is_bitfield(snapshot) {
        return "UInt32".to_string();
    }
    if reference.is_string() {
        return "UnsafePointer<CChar>".to_string();
    }
    if reference.is_record(snapshot) && reference.indirection > 0 {
        return format!("UnsafeMutablePointer<{}>", reference.c_repr);
    }
    if reference.indirection == 0 {
        if let Some(swift) = sg_gir::builtins::swift_scalar(&reference.c_repr) {
            return swift.to_string();
        }
    }
    reference.render_idiomatic(snapshot)
}

fn trampoline_argument(
    expression: &str,
    reference: &TypeReference,
    snapshot: &RegistrySnapshot,
) -> String {
    if reference.is_enumeration(snapshot) || reference.is_bitfield(snapshot) {
        return format!("{}(rawValue: numericCast({expression}))", reference.name.local);
    }
    if reference.is_string() {
        return format!("String(cString: {expression})");
    }
    if reference.is_record(snapshot) && reference.indirection > 0 {
        return format!("{}Ref(raw: {expression})", reference.name.local);
    }
    if reference.c_repr == "gboolean" {
        return format!("(({expression}) != 0)");
    }
    expression.to_string()
}

/// Marshals the closure result back across the callback boundary. String
/// results transfer ownership to the native side, so they allocate
/// native-owned storage.
fn trampoline_result(
    expression: &str,
    signal: &Method,
    snapshot: &RegistrySnapshot,
) -> Option<String> {
    let returns = &signal.returns.type_ref;
    if returns.is_void() {
        return None;
    }
    if returns.is_string() {
        return Some(format!("g_strdup({expression})"));
    }
    if returns.is_enumeration(snapshot) {
        return Some(format!("numericCast({expression}.rawValue)"));
    }
    if returns.is_bitfield(snapshot) {
        return Some(format!("numericCast({expression}.rawValue)"));
    }
    if returns.c_repr == "gboolean" {
        return Some(format!("gboolean(({expression}) ? 1 : 0)"));
    }
    Some(expression.to_string())
}

/// Emits the declaration that takes a typed subscription's place when any
/// safety condition fails: unavailable, with every failed condition listed
/// and the generic subscribe operation named as the fallback.
fn emit_unavailable(
    ctx: &GeneratorContext,
    signal: &Method,
    failed: &[SignalViolation],
    indent: &str,
) -> String {
    let mut out = ctx.documentation(&signal.thing, indent);
    out.push_str(&format!(
        "{indent}/// No typed subscription is generated for `{}`:\n",
        signal.name()
    ));
    for violation in failed {
        out.push_str(&format!("{indent}/// - {violation}\n"));
    }
    out.push_str(&format!(
        "{indent}/// Subscribe through `connectSignal(named:pointer:handler:data:destroy:)` instead.\n"
    ));
    let reasons = failed
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    out.push_str(&format!(
        "{indent}@available(*, unavailable, message: \"{reasons}\")\n"
    ));
    out.push_str(&format!(
        "{indent}public func {}(handler: Any) {{}}\n\n",
        subscribe_name(signal)
    ));
    out
}

/// Emits one event subscription: either the typed wrapper with its closure
/// holder and native trampoline, or the unavailable stub.
pub fn emit_signal(ctx: &GeneratorContext, record: &Record, signal: &Method, indent: &str) -> String {
    let snapshot = ctx.snapshot;
    let failed = violations(signal, snapshot);
    if !failed.is_empty() {
        return emit_unavailable(ctx, signal, &failed, indent);
    }

    let arguments: Vec<_> = signal.non_instance_args().collect();
    let record_name = record.name();

    let mut closure_params = vec![format!("{record_name}Ref")];
    closure_params.extend(
        arguments
            .iter()
            .map(|a| functions::parameter_type(ctx, a)),
    );
    let closure_return = if signal.returns.type_ref.is_void() {
        "Void".to_string()
    } else {
        signal.returns.type_ref.render_idiomatic(snapshot)
    };
    let closure_type = format!("({}) -> {closure_return}", closure_params.join(", "));

    let mut native_params = vec!["gpointer".to_string()];
    native_params.extend(
        arguments
            .iter()
            .map(|a| trampoline_native_type(&a.type_ref, snapshot)),
    );
    native_params.push("gpointer".to_string());
    let native_return = if signal.returns.type_ref.is_void() {
        "Void".to_string()
    } else {
        trampoline_native_type(&signal.returns.type_ref, snapshot)
    };

    let mut trampoline_args = vec![format!("{record_name}Ref(raw: unownedSelf)")];
    for (index, argument) in arguments.iter().enumerate() {
        trampoline_args.push(trampoline_argument(
            &format!("arg{}", index + 1),
            &argument.type_ref,
            snapshot,
        ));
    }

    let mut out = ctx.documentation(&signal.thing, indent);
    out.push_str(&format!(
        "{indent}/// Subscribes `handler` to the `{}` event.\n",
        signal.name()
    ));
    out.push_str(&format!("{indent}@discardableResult\n"));
    out.push_str(&format!(
        "{indent}public func {name}(handler: @escaping {closure_type}) -> Int {{\n",
        name = subscribe_name(signal)
    ));
    let body = format!("{indent}    ");
    out.push_str(&format!(
        "{body}let holder = SignalClosureHolder<{closure_type}, {closure_return}>(handler)\n"
    ));

    let lambda_params: Vec<String> = std::iter::once("unownedSelf".to_string())
        .chain((1..=arguments.len()).map(|i| format!("arg{i}")))
        .chain(std::iter::once("userData".to_string()))
        .collect();
    out.push_str(&format!(
        "{body}let callback: @convention(c) ({}) -> {native_return} = {{ {} in\n",
        native_params.join(", "),
        lambda_params.join(", "),
    ));
    out.push_str(&format!(
        "{body}    let holder = Unmanaged<SignalClosureHolder<{closure_type}, {closure_return}>>.fromOpaque(userData).takeUnretainedValue()\n"
    ));
    let invoke = format!("holder.call({})", trampoline_args.join(", "));
    match trampoline_result("result", signal, snapshot) {
        None => out.push_str(&format!("{body}    {invoke}\n")),
        Some(marshal) => {
            out.push_str(&format!("{body}    let result = {invoke}\n"));
            out.push_str(&format!("{body}    return {marshal}\n"));
        }
    }
    out.push_str(&format!("{body}}}\n"));
    out.push_str(&format!(
        "{body}return connectSignal(named: \"{signal_name}\", pointer: ptr, handler: unsafeBitCast(callback, to: GCallback.self), data: holder.opaque, destroy: {{ data, _ in\n",
        signal_name = signal.name()
    ));
    out.push_str(&format!(
        "{body}    Unmanaged<SignalClosureHolder<{closure_type}, {closure_return}>>.fromOpaque(data!).release()\n"
    ));
    out.push_str(&format!("{body}}})\n"));
    out.push_str(&format!("{indent}}}\n\n"));
    out
}
