use roxmltree::Node;

use crate::context::ParseContext;
use crate::ctype::CType;
use crate::typeref::TypeReference;

/// A named stand-in for another type.
#[derive(Clone, Debug)]
pub struct Alias {
    pub ctype: CType,
    pub target: TypeReference,
}

impl Alias {
    pub fn from_xml(context: &mut ParseContext, node: Node) -> Self {
        let name = context.name_of(node, "alias");
        let target = node
            .children()
            .find(|c| c.is_element() && c.tag_name().name() == "type")
            .map(|t| TypeReference::from_xml(t, Some(&name), &context.diags))
            .unwrap_or_else(TypeReference::void);
        Self {
            ctype: CType::from_xml(node, name),
            target,
        }
    }

    pub fn name(&self) -> &str {
        self.ctype.name()
    }
}
