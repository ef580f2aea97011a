use std::collections::HashSet;

use sg_gir::method::{GETTER_PREFIX, QUERY_PREFIXES, SETTER_PREFIX};
use sg_gir::{Method, Record};

use super::{functions, names, GeneratorContext};

/// A getter with its optional write counterpart. Derived on demand from a
/// record's method list; never stored on the model.
pub struct GetterSetterPair<'a> {
    pub getter: &'a Method,
    pub setter: Option<&'a Method>,
}

impl GetterSetterPair<'_> {
    /// The accessor's Swift name. Boolean-query getters keep their full
    /// name (`isActive`); plain getters drop the `get` token (`name`).
    pub fn property_name(&self) -> String {
        let name = self.getter.name();
        match name.strip_prefix(GETTER_PREFIX) {
            Some(stem) => names::camel(stem),
            None => names::camel(name),
        }
    }
}

/// The pairing key: the accessor name with its get/set/query prefix
/// removed, so matching getters and setters sort next to each other.
fn pairing_key(method: &Method) -> String {
    let name = method.name();
    if let Some(stem) = name.strip_prefix(GETTER_PREFIX) {
        return stem.to_string();
    }
    if let Some(stem) = name.strip_prefix(SETTER_PREFIX) {
        return stem.to_string();
    }
    for prefix in QUERY_PREFIXES {
        if let Some(stem) = name.strip_prefix(prefix) {
            return stem.to_string();
        }
    }
    name.to_string()
}

/// Collects both accessor pools, sorts them together by de-prefixed name
/// (getter before setter on ties), and walks the sequence pairwise. An
/// unmatched getter yields a read-only accessor; an unmatched setter stays
/// a plain method, since a write-only accessor has no type to borrow.
pub fn pair_accessors(record: &Record) -> Vec<GetterSetterPair<'_>> {
    let mut pool: Vec<&Method> = record
        .methods
        .iter()
        .filter(|m| m.is_getter() || m.is_setter())
        .collect();
    pool.sort_by(|a, b| {
        (pairing_key(a), a.is_setter()).cmp(&(pairing_key(b), b.is_setter()))
    });

    let mut pairs = Vec::new();
    let mut index = 0;
    while index < pool.len() {
        let current = pool[index];
        if current.is_getter() {
            let next = pool.get(index + 1).copied();
            let matching = next
                .filter(|candidate| {
                    candidate.is_setter() && pairing_key(candidate) == pairing_key(current)
                });
            if let Some(setter) = matching {
                pairs.push(GetterSetterPair {
                    getter: current,
                    setter: Some(setter),
                });
                index += 2;
            } else {
                pairs.push(GetterSetterPair {
                    getter: current,
                    setter: None,
                });
                index += 1;
            }
        } else {
            // Unmatched setter: left to plain-method emission.
            index += 1;
        }
    }
    pairs
}

/// Native symbols consumed into accessors; plain-method emission skips
/// these so each method appears in exactly one place.
pub fn consumed_symbols(pairs: &[GetterSetterPair]) -> HashSet<String> {
    let mut consumed = HashSet::new();
    for pair in pairs {
        consumed.insert(pair.getter.c_symbol.clone());
        if let Some(setter) = pair.setter {
            consumed.insert(setter.c_symbol.clone());
        }
    }
    consumed
}

/// Emits the computed properties for a record's accessor pairs.
pub fn emit_accessors(ctx: &GeneratorContext, record: &Record, indent: &str) -> String {
    let mut out = String::new();
    let accessor = functions::ptr_accessor(record);
    for pair in pair_accessors(record) {
        let getter = pair.getter;
        let returns = &getter.returns.type_ref;
        let mut rendered_ref = returns.clone();
        if rendered_ref.infer_optional(ctx.snapshot, false) {
            rendered_ref.is_optional = true;
        }

        out.push_str(&ctx.documentation(&getter.thing, indent));
        out.push_str(&format!(
            "{indent}public var {name}: {ty} {{\n",
            name = pair.property_name(),
            ty = rendered_ref.render_idiomatic(ctx.snapshot),
        ));
        let call = format!("{}({accessor})", getter.c_symbol);
        out.push_str(&format!(
            "{indent}    get {{ {} }}\n",
            functions::to_idiomatic(ctx, &call, &rendered_ref)
        ));
        if let Some(setter) = pair.setter {
            if let Some(value) = setter.non_instance_args().next() {
                out.push_str(&format!(
                    "{indent}    nonmutating set {{ {}({accessor}, {}) }}\n",
                    setter.c_symbol,
                    functions::to_native(ctx, "newValue", &value.type_ref),
                ));
            }
        }
        out.push_str(&format!("{indent}}}\n\n"));
    }
    out
}
