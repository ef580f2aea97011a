use roxmltree::Node;

/// Base properties shared by every model node. Immutable after construction.
#[derive(Clone, Debug, Default)]
pub struct Thing {
    pub name: String,
    pub doc: String,
    pub introspectable: bool,
    pub deprecated: Option<String>,
    pub version: Option<String>,
}

/// Text content of the first child element with the given tag name.
pub fn child_text(node: Node, tag: &str) -> Option<String> {
    node.children()
        .find(|c| c.is_element() && c.tag_name().name() == tag)
        .and_then(|c| c.text())
        .map(str::to_string)
}

impl Thing {
    pub fn from_xml(node: Node, name: String) -> Self {
        let deprecated = if node.attribute("deprecated") == Some("1") {
            Some(
                child_text(node, "doc-deprecated")
                    .unwrap_or_else(|| "deprecated upstream".to_string()),
            )
        } else {
            None
        };
        Self {
            name,
            doc: child_text(node, "doc").unwrap_or_default(),
            introspectable: node.attribute("introspectable") != Some("0"),
            deprecated,
            version: node.attribute("version").map(str::to_string),
        }
    }
}
