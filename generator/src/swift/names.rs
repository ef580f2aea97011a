use heck::{ToLowerCamelCase, ToUpperCamelCase};

use sg_gir::Method;

/// Keywords that must be escaped with backticks when used as identifiers.
const SWIFT_KEYWORDS: &[&str] = &[
    "associatedtype", "class", "deinit", "enum", "extension", "fileprivate", "func", "import",
    "init", "inout", "internal", "let", "open", "operator", "private", "protocol", "public",
    "rethrows", "static", "struct", "subscript", "typealias", "var", "break", "case", "continue",
    "default", "defer", "do", "else", "fallthrough", "for", "guard", "if", "in", "repeat",
    "return", "switch", "where", "while", "as", "catch", "false", "is", "nil", "super", "self",
    "Self", "throw", "throws", "true", "try",
];

pub fn escape(name: &str) -> String {
    if SWIFT_KEYWORDS.contains(&name) {
        format!("`{name}`")
    } else {
        name.to_string()
    }
}

pub fn camel(name: &str) -> String {
    escape(&name.to_lower_camel_case())
}

pub fn pascal(name: &str) -> String {
    name.to_upper_camel_case()
}

/// Linking tokens in native symbols that introduce a factory's parameter
/// label (`gtk_window_new_from_file` → `fromFile`'s tail `file`).
const LINKING_TOKENS: &[&str] = &["from", "for", "with"];

/// Derives the cosmetic argument label for a constructor-candidate.
///
/// The native symbol is split on underscores; everything after the first
/// linking token becomes the label. When no linking token occurs, the
/// declared name with leading/trailing `new` tokens stripped is used.
/// The underlying call always uses the native symbol, label or not.
pub fn constructor_label(method: &Method) -> Option<String> {
    let tokens: Vec<&str> = method.c_symbol.split('_').collect();
    if let Some(position) = tokens.iter().position(|t| LINKING_TOKENS.contains(t)) {
        let tail = &tokens[position + 1..];
        if !tail.is_empty() {
            return Some(camel(&tail.join("_")));
        }
    }

    let declared: Vec<&str> = method
        .name()
        .split('_')
        .filter(|t| !t.is_empty() && *t != "new")
        .collect();
    if declared.is_empty() {
        None
    } else {
        Some(camel(&declared.join("_")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sg_gir::{Argument, CType, Direction, GName, MethodRole, Ownership, Thing, TypeReference};

    fn method(declared: &str, symbol: &str) -> Method {
        Method {
            thing: Thing::default(),
            c_symbol: symbol.to_string(),
            declared_name: declared.to_string(),
            returns: Argument {
                ctype: CType::default(),
                type_ref: TypeReference::value(GName::bare("none"), "void"),
                instance: false,
                varargs: false,
                ownership: Ownership::None,
                direction: Direction::In,
            },
            args: Vec::new(),
            throws: false,
            role: MethodRole::Constructor,
        }
    }

    #[test]
    fn linking_token_takes_the_tail() {
        let m = method("new_from_file", "gtk_image_new_from_file");
        assert_eq!(constructor_label(&m).as_deref(), Some("file"));

        let m = method("new_with_label", "gtk_button_new_with_label");
        assert_eq!(constructor_label(&m).as_deref(), Some("label"));

        let m = method("new_from_icon_name", "gtk_image_new_from_icon_name");
        assert_eq!(constructor_label(&m).as_deref(), Some("iconName"));
    }

    #[test]
    fn without_linking_token_new_is_stripped() {
        let m = method("new", "gtk_window_new");
        assert_eq!(constructor_label(&m), None);

        let m = method("new_abbreviated", "gtk_thing_new_abbreviated");
        assert_eq!(constructor_label(&m).as_deref(), Some("abbreviated"));
    }

    #[test]
    fn keywords_are_escaped() {
        assert_eq!(escape("class"), "`class`");
        assert_eq!(camel("in"), "`in`");
        assert_eq!(camel("icon_name"), "iconName");
    }
}
