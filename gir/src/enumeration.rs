use roxmltree::Node;

use crate::context::ParseContext;
use crate::ctype::{CType, C_NS};
use crate::thing::Thing;

/// One named integer member of an enumeration or bitfield.
#[derive(Clone, Debug)]
pub struct Member {
    pub thing: Thing,
    pub value: i64,
    /// The native symbolic identifier (`GTK_ALIGN_START`), kept for
    /// documentation.
    pub c_identifier: Option<String>,
}

/// A C enumeration or bitfield with its ordered member list.
#[derive(Clone, Debug)]
pub struct Enumeration {
    pub ctype: CType,
    pub members: Vec<Member>,
    pub is_bitfield: bool,
}

impl Enumeration {
    pub fn from_xml(context: &mut ParseContext, node: Node, is_bitfield: bool) -> Self {
        let name = context.name_of(node, if is_bitfield { "bitfield" } else { "enumeration" });
        let mut members = Vec::new();
        for child in node
            .children()
            .filter(|c| c.is_element() && c.tag_name().name() == "member")
        {
            let member_name = context.name_of(child, "member");
            let value = match child.attribute("value").map(str::parse::<i64>) {
                Some(Ok(value)) => value,
                _ => {
                    context.diags.report(
                        member_name.clone(),
                        "member has a missing or non-numeric value, using 0",
                    );
                    0
                }
            };
            members.push(Member {
                thing: Thing::from_xml(child, member_name),
                value,
                c_identifier: child.attribute((C_NS, "identifier")).map(str::to_string),
            });
        }
        Self {
            ctype: CType::from_xml(node, name),
            members,
            is_bitfield,
        }
    }

    pub fn name(&self) -> &str {
        self.ctype.name()
    }
}
