use roxmltree::Node;

use crate::diag::Diagnostics;
use crate::gname::GName;
use crate::registry::Registry;

/// Mutable state threaded through one document's parse. The registry borrow
/// ends with the parse; emission only ever sees the frozen snapshot.
pub struct ParseContext<'a> {
    pub registry: &'a mut Registry,
    pub diags: Diagnostics,
    pub namespace: String,
    pub symbol_prefix: String,
    unnamed: u32,
}

impl<'a> ParseContext<'a> {
    pub fn new(
        registry: &'a mut Registry,
        diags: Diagnostics,
        namespace: impl Into<String>,
        symbol_prefix: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            diags,
            namespace: namespace.into(),
            symbol_prefix: symbol_prefix.into(),
            unnamed: 0,
        }
    }

    /// Qualifies a bare local name with the document's namespace.
    pub fn qualify(&self, local: &str) -> GName {
        GName::with_namespace(self.namespace.clone(), local)
    }

    /// Synthesizes an indexed placeholder name so a malformed element still
    /// yields a compileable stub instead of failing the parse.
    pub fn placeholder(&mut self, kind: &str) -> String {
        self.unnamed += 1;
        format!("unknown_{kind}_{}", self.unnamed)
    }

    /// The element's `name` attribute, or a diagnosed placeholder.
    pub fn name_of(&mut self, node: Node, kind: &str) -> String {
        match node.attribute("name") {
            Some(name) => name.to_string(),
            None => {
                let placeholder = self.placeholder(kind);
                self.diags.report(
                    placeholder.clone(),
                    format!("<{kind}> element has no name, synthesized a placeholder"),
                );
                placeholder
            }
        }
    }
}
