use sg_gir::{Alias, Constant, Enumeration};

use super::{names, GeneratorContext};

/// Enumerations become raw-representable value types rather than Swift
/// enums: C enumerations may repeat numeric values, which `enum` cases
/// cannot express.
pub fn emit_enumeration(ctx: &GeneratorContext, enumeration: &Enumeration) -> String {
    if ctx.is_excluded(enumeration.name()) {
        return format!("// {} is excluded from generation\n", enumeration.name());
    }
    let name = names::pascal(enumeration.name());
    let raw = if enumeration.is_bitfield { "UInt32" } else { "Int32" };
    let conformance = if enumeration.is_bitfield {
        "OptionSet"
    } else {
        "RawRepresentable, Equatable, Hashable"
    };

    let mut out = ctx.documentation(&enumeration.ctype.thing, "");
    out.push_str(&format!("public struct {name}: {conformance} {{\n"));
    out.push_str(&format!("    public var rawValue: {raw}\n"));
    out.push_str(&format!(
        "    public init(rawValue: {raw}) {{ self.rawValue = rawValue }}\n\n"
    ));
    for member in &enumeration.members {
        out.push_str(&ctx.documentation(&member.thing, "    "));
        if let Some(identifier) = member.c_identifier.as_deref() {
            out.push_str(&format!("    /// Native identifier: `{identifier}`.\n"));
        }
        out.push_str(&format!(
            "    public static let {member_name} = {name}(rawValue: {value})\n",
            member_name = names::camel(&member.thing.name),
            value = member.value,
        ));
    }
    out.push_str("}\n\n");
    out
}

pub fn emit_enumerations(ctx: &GeneratorContext) -> String {
    ctx.namespace
        .enumerations
        .iter()
        .map(|e| emit_enumeration(ctx, e))
        .collect()
}

pub fn emit_bitfields(ctx: &GeneratorContext) -> String {
    ctx.namespace
        .bitfields
        .iter()
        .map(|e| emit_enumeration(ctx, e))
        .collect()
}

pub fn emit_constant(ctx: &GeneratorContext, constant: &Constant) -> String {
    if ctx.is_excluded(constant.name()) {
        return format!("// {} is excluded from generation\n", constant.name());
    }
    let mut out = ctx.documentation(&constant.ctype.thing, "");
    let name = names::escape(constant.name());
    if ctx.verbatim_constants.contains(constant.name()) {
        out.push_str(&format!("public let {name} = {}\n\n", constant.value));
        return out;
    }
    let rendered_type = constant.type_ref.render_idiomatic(ctx.snapshot);
    let value = if constant.type_ref.is_string() {
        format!("\"{}\"", constant.value.replace('"', "\\\""))
    } else if rendered_type == "Bool" {
        match constant.value.as_str() {
            "0" | "false" => "false".to_string(),
            _ => "true".to_string(),
        }
    } else {
        format!("{rendered_type}({})", constant.value)
    };
    out.push_str(&format!("public let {name}: {rendered_type} = {value}\n\n"));
    out
}

pub fn emit_constants(ctx: &GeneratorContext) -> String {
    ctx.namespace
        .constants
        .iter()
        .map(|c| emit_constant(ctx, c))
        .collect()
}

pub fn emit_alias(ctx: &GeneratorContext, alias: &Alias) -> String {
    if ctx.is_excluded(alias.name()) {
        return format!("// {} is excluded from generation\n", alias.name());
    }
    let mut out = ctx.documentation(&alias.ctype.thing, "");
    out.push_str(&format!(
        "public typealias {} = {}\n\n",
        names::pascal(alias.name()),
        alias.target.render_idiomatic(ctx.snapshot),
    ));
    out
}

pub fn emit_aliases(ctx: &GeneratorContext) -> String {
    ctx.namespace
        .aliases
        .iter()
        .map(|a| emit_alias(ctx, a))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use sg_gir::{CType, Diagnostics, GName, Namespace, Registry, Thing, TypeReference};

    fn context_fixture() -> (Namespace, sg_gir::RegistrySnapshot, Diagnostics) {
        (Namespace::default(), Registry::new().freeze(), Diagnostics::new())
    }

    fn constant(name: &str, value: &str, type_name: &str) -> Constant {
        Constant {
            ctype: CType {
                thing: Thing {
                    name: name.to_string(),
                    introspectable: true,
                    ..Thing::default()
                },
                ..CType::default()
            },
            type_ref: TypeReference::value(GName::bare(type_name), type_name),
            value: value.to_string(),
        }
    }

    #[test]
    fn verbatim_constants_skip_conversion() {
        let (namespace, snapshot, diags) = context_fixture();
        let exclusions = HashSet::new();
        let mut verbatim = HashSet::new();
        verbatim.insert("MAX_DEPTH".to_string());
        let ctx = GeneratorContext {
            snapshot: &snapshot,
            namespace: &namespace,
            diags: &diags,
            exclusions: &exclusions,
            verbatim_constants: &verbatim,
        };

        let verbatim_out = emit_constant(&ctx, &constant("MAX_DEPTH", "64", "gint"));
        assert!(verbatim_out.contains("public let MAX_DEPTH = 64"));

        let converted = emit_constant(&ctx, &constant("MAX_WIDTH", "128", "gint"));
        assert!(converted.contains("public let MAX_WIDTH: CInt = CInt(128)"));
    }

    #[test]
    fn excluded_names_leave_a_marker() {
        let (namespace, snapshot, diags) = context_fixture();
        let mut exclusions = HashSet::new();
        exclusions.insert("Hidden".to_string());
        let verbatim = HashSet::new();
        let ctx = GeneratorContext {
            snapshot: &snapshot,
            namespace: &namespace,
            diags: &diags,
            exclusions: &exclusions,
            verbatim_constants: &verbatim,
        };

        let enumeration = Enumeration {
            ctype: CType {
                thing: Thing {
                    name: "Hidden".to_string(),
                    ..Thing::default()
                },
                ..CType::default()
            },
            members: Vec::new(),
            is_bitfield: false,
        };
        let out = emit_enumeration(&ctx, &enumeration);
        assert_eq!(out, "// Hidden is excluded from generation\n");
    }
}
