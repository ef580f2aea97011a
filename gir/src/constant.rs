use roxmltree::Node;

use crate::context::ParseContext;
use crate::ctype::CType;
use crate::typeref::TypeReference;

/// A namespace-level constant with its literal value as written.
#[derive(Clone, Debug)]
pub struct Constant {
    pub ctype: CType,
    pub type_ref: TypeReference,
    pub value: String,
}

impl Constant {
    pub fn from_xml(context: &mut ParseContext, node: Node) -> Self {
        let name = context.name_of(node, "constant");
        let type_ref = node
            .children()
            .find(|c| c.is_element() && matches!(c.tag_name().name(), "type" | "array"))
            .map(|t| TypeReference::from_xml(t, Some(&name), &context.diags))
            .unwrap_or_else(TypeReference::void);
        Self {
            ctype: CType::from_xml(node, name),
            type_ref,
            value: node.attribute("value").unwrap_or_default().to_string(),
        }
    }

    pub fn name(&self) -> &str {
        self.ctype.name()
    }
}
