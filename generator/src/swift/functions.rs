use sg_gir::{cast, Argument, GName, Method, Record, TypeReference};

use super::{names, GeneratorContext};

/// Name of the typed-pointer accessor a record's capability set exposes.
pub fn ptr_accessor(record: &Record) -> String {
    use heck::ToSnakeCase;
    let stem = if record.symbol_prefix.is_empty() {
        record.name().to_snake_case()
    } else {
        record.symbol_prefix.clone()
    };
    format!("{stem}_ptr")
}

fn swift_counterpart(name: &str) -> TypeReference {
    TypeReference::value(GName::bare(name), name)
}

/// Converts a native expression into its idiomatic rendering.
pub fn to_idiomatic(ctx: &GeneratorContext, expression: &str, reference: &TypeReference) -> String {
    let snapshot = ctx.snapshot;
    if reference.is_void() {
        return expression.to_string();
    }
    if reference.is_string() {
        return if reference.is_optional {
            format!("{expression}.map {{ String(cString: $0) }}")
        } else {
            format!("String(cString: {expression})")
        };
    }
    if reference.is_record(snapshot) && reference.indirection > 0 {
        let local = &reference.name.local;
        return if reference.infer_optional(snapshot, false) {
            format!("{expression}.map {{ {local}Ref(raw: $0) }}")
        } else {
            format!("{local}Ref(raw: {expression})")
        };
    }
    if reference.is_enumeration(snapshot) || reference.is_bitfield(snapshot) {
        let local = &reference.name.local;
        return format!("{local}(rawValue: numericCast({expression}.rawValue))");
    }
    if reference.indirection == 0 {
        if let Some(swift) = sg_gir::builtins::swift_scalar(&reference.c_repr) {
            return cast(expression, reference, &swift_counterpart(swift), snapshot);
        }
    }
    expression.to_string()
}

/// Converts an idiomatic expression into the native rendering a call expects.
pub fn to_native(ctx: &GeneratorContext, expression: &str, reference: &TypeReference) -> String {
    let snapshot = ctx.snapshot;
    if reference.is_void() || reference.is_string() {
        return expression.to_string();
    }
    if reference.is_record(snapshot) && reference.indirection > 0 {
        let accessor = snapshot
            .lookup_record(&reference.name.to_string())
            .map(|record| ptr_accessor(record))
            .unwrap_or_else(|| "ptr".to_string());
        return if reference.infer_optional(snapshot, false) {
            format!("{expression}?.{accessor}")
        } else {
            format!("{expression}.{accessor}")
        };
    }
    if reference.is_enumeration(snapshot) || reference.is_bitfield(snapshot) {
        return format!(
            "{}(rawValue: numericCast({expression}.rawValue))",
            reference.c_repr
        );
    }
    if reference.indirection == 0 {
        if let Some(swift) = sg_gir::builtins::swift_scalar(&reference.c_repr) {
            return cast(expression, &swift_counterpart(swift), reference, snapshot);
        }
    }
    expression.to_string()
}

/// The idiomatic parameter type for one argument, optionality applied.
/// An unresolvable reference keeps its raw pointer form and is diagnosed
/// instead of failing the record.
pub fn parameter_type(ctx: &GeneratorContext, argument: &Argument) -> String {
    let mut reference = argument.type_ref.clone();
    if reference.indirection > 0
        && !reference.is_string()
        && !reference.is_raw_pointer()
        && ctx.snapshot.lookup_type(&reference.name.to_string()).is_none()
    {
        ctx.diags.report(
            reference.name.to_string(),
            "type reference is not registered, rendering it as a raw pointer",
        );
    }
    if reference.infer_optional(ctx.snapshot, argument.instance) {
        reference.is_optional = true;
    }
    reference.render_idiomatic(ctx.snapshot)
}

/// Renders one parameter list entry, deriving the label from the
/// originating identifier.
fn parameter(ctx: &GeneratorContext, argument: &Argument) -> String {
    let label = names::camel(argument.name());
    format!("{label}: {}", parameter_type(ctx, argument))
}

/// Emits a wrapper for a free function or record method. `receiver` carries
/// the record when the method has an instance parameter.
pub fn emit_method(
    ctx: &GeneratorContext,
    receiver: Option<&Record>,
    method: &Method,
    indent: &str,
) -> String {
    let symbol = &method.c_symbol;
    if ctx.is_excluded(method.name()) || ctx.is_excluded(symbol) {
        return format!("{indent}// {symbol} is excluded from generation\n");
    }
    if !method.thing.introspectable {
        return format!("{indent}// {symbol} is not exposed to introspection\n");
    }
    if method.is_varargs() {
        return format!(
            "{indent}// {symbol} is not available because variadic functions cannot be bridged\n"
        );
    }

    let mut out = ctx.documentation(&method.thing, indent);

    let params: Vec<String> = method
        .non_instance_args()
        .map(|argument| parameter(ctx, argument))
        .collect();
    let throws = if method.throws { " throws" } else { "" };
    let returns = &method.returns.type_ref;
    let return_clause = if returns.is_void() {
        String::new()
    } else {
        let mut reference = returns.clone();
        if reference.infer_optional(ctx.snapshot, false) {
            reference.is_optional = true;
        }
        format!(" -> {}", reference.render_idiomatic(ctx.snapshot))
    };

    // A record-scoped function without a receiver parameter surfaces as a
    // static member of the capability set.
    let statically = if receiver.is_some() && method.instance_arg().is_none() {
        "static "
    } else {
        ""
    };
    out.push_str(&format!(
        "{indent}public {statically}func {name}({params}){throws}{return_clause} {{\n",
        name = names::camel(method.name()),
        params = params.join(", "),
    ));

    let mut call_args: Vec<String> = Vec::new();
    for argument in &method.args {
        if argument.instance {
            let accessor = receiver
                .map(ptr_accessor)
                .unwrap_or_else(|| "ptr".to_string());
            call_args.push(accessor);
        } else {
            call_args.push(to_native(
                ctx,
                &names::camel(argument.name()),
                &argument.type_ref,
            ));
        }
    }

    let body_indent = format!("{indent}    ");
    if method.throws {
        call_args.push("&error".to_string());
        out.push_str(&format!(
            "{body_indent}var error: UnsafeMutablePointer<GError>?\n"
        ));
    }
    let call = format!("{symbol}({})", call_args.join(", "));

    if returns.is_void() {
        out.push_str(&format!("{body_indent}{call}\n"));
        if method.throws {
            out.push_str(&format!(
                "{body_indent}if let error = error {{ throw {ns}Error(error) }}\n",
                ns = ctx.namespace.name
            ));
        }
    } else {
        out.push_str(&format!("{body_indent}let rv = {call}\n"));
        if method.throws {
            out.push_str(&format!(
                "{body_indent}if let error = error {{ throw {ns}Error(error) }}\n",
                ns = ctx.namespace.name
            ));
        }
        let mut converted_ref = returns.clone();
        if converted_ref.infer_optional(ctx.snapshot, false) {
            converted_ref.is_optional = true;
        }
        out.push_str(&format!(
            "{body_indent}return {}\n",
            to_idiomatic(ctx, "rv", &converted_ref)
        ));
    }
    out.push_str(&format!("{indent}}}\n"));
    out
}

/// Emits the free-function section of a namespace.
pub fn emit_functions(ctx: &GeneratorContext) -> String {
    let mut out = String::new();
    for function in &ctx.namespace.functions {
        out.push_str(&emit_method(ctx, None, function, ""));
        out.push('\n');
    }
    out
}
