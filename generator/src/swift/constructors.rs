use sg_gir::{Method, Record};

use super::{functions, names, GeneratorContext};

fn factory_name(method: &Method) -> String {
    names::camel(method.name())
}

/// Renders the parameter list for a constructor-candidate. The first
/// parameter carries the cosmetic label derived from the native symbol;
/// the call itself always uses the native symbol.
fn parameters(ctx: &GeneratorContext, method: &Method) -> String {
    let label = names::constructor_label(method);
    method
        .non_instance_args()
        .enumerate()
        .map(|(index, argument)| {
            let name = names::camel(argument.name());
            let ty = functions::parameter_type(ctx, argument);
            match (index, label.as_deref()) {
                (0, Some(label)) if label != name => format!("{label} {name}: {ty}"),
                _ => format!("{name}: {ty}"),
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn call_arguments(ctx: &GeneratorContext, method: &Method) -> String {
    method
        .non_instance_args()
        .map(|argument| {
            functions::to_native(ctx, &names::camel(argument.name()), &argument.type_ref)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Emits the owning class's initializers: the designated constructor as a
/// convenience initializer adopting the freshly created instance, and every
/// other candidate as a named static factory. Bare factories (zero
/// arguments, name other than `new`) only appear as static factories.
pub fn emit_class_constructors(ctx: &GeneratorContext, record: &Record, indent: &str) -> String {
    let mut out = String::new();
    let snapshot = ctx.snapshot;
    for method in &record.constructors {
        if !method.is_constructor_of(record, snapshot) {
            ctx.diags.report(
                method.c_symbol.clone(),
                "declared constructor does not produce an instance of its record",
            );
            continue;
        }
        if method.is_varargs() {
            out.push_str(&format!(
                "{indent}// {} is not available because variadic functions cannot be bridged\n",
                method.c_symbol
            ));
            continue;
        }
        out.push_str(&ctx.documentation(&method.thing, indent));
        if method.is_designated_constructor_of(record, snapshot) {
            out.push_str(&format!(
                "{indent}public convenience init({}) {{\n",
                parameters(ctx, method)
            ));
            out.push_str(&format!(
                "{indent}    self.init(adopting: UnsafeMutableRawPointer({}({})))\n",
                method.c_symbol,
                call_arguments(ctx, method)
            ));
            out.push_str(&format!("{indent}}}\n\n"));
        } else {
            out.push_str(&format!(
                "{indent}public static func {name}({params}) -> {record_name} {{\n",
                name = factory_name(method),
                params = parameters(ctx, method),
                record_name = record.name(),
            ));
            out.push_str(&format!(
                "{indent}    {record_name}(adopting: UnsafeMutableRawPointer({symbol}({args})))\n",
                record_name = record.name(),
                symbol = method.c_symbol,
                args = call_arguments(ctx, method),
            ));
            out.push_str(&format!("{indent}}}\n\n"));
        }
    }
    out
}

/// Emits borrowing factories on the non-owning reference wrapper. These
/// exist for records that never grow an owning class; the caller becomes
/// responsible for the instance's lifetime.
pub fn emit_ref_constructors(ctx: &GeneratorContext, record: &Record, indent: &str) -> String {
    let mut out = String::new();
    let snapshot = ctx.snapshot;
    for method in &record.constructors {
        if !method.is_constructor_of(record, snapshot) || method.is_varargs() {
            continue;
        }
        out.push_str(&ctx.documentation(&method.thing, indent));
        let name = if method.is_designated_constructor_of(record, snapshot) {
            "new".to_string()
        } else {
            factory_name(method)
        };
        out.push_str(&format!(
            "{indent}public static func {name}({params}) -> {record_name}Ref {{\n",
            params = parameters(ctx, method),
            record_name = record.name(),
        ));
        out.push_str(&format!(
            "{indent}    {record_name}Ref(raw: UnsafeMutableRawPointer({symbol}({args})))\n",
            record_name = record.name(),
            symbol = method.c_symbol,
            args = call_arguments(ctx, method),
        ));
        out.push_str(&format!("{indent}}}\n\n"));
    }
    out
}
