//! The document tree consumed by the renderer.
//!
//! The markdown parser is an external collaborator; whatever produces the
//! tree, the renderer only ever sees [`DocumentNode`]. The shape is
//! deliberately small: a tag, optional leading text, ordered children and a
//! flat attribute list. Attribute lookup never fails; a missing key reads
//! as the empty string.

/// Closed set of node tags the renderer dispatches on.
///
/// Anything a parser emits that has no dedicated variant goes through
/// [`Tag::Other`] and renders as plain text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tag {
    Document,
    /// Heading level 1–8. Levels 6–8 share the deepest theme color.
    Heading(u8),
    Paragraph,
    BulletList,
    OrderedList,
    ListItem,
    BlockQuote,
    /// Container for a code block, mirroring `<pre><code>`.
    Pre,
    /// Code: a block when under [`Tag::Pre`], inline otherwise.
    Code,
    Emphasis,
    Strong,
    Link,
    Image,
    Table,
    TableHead,
    TableBody,
    TableRow,
    TableCell,
    Rule,
    /// A plain text run between inline siblings.
    Text,
    Other(String),
}

impl Tag {
    /// The three inline tags the marker codec encodes.
    pub fn is_inline_markup(&self) -> bool {
        matches!(self, Tag::Emphasis | Tag::Strong | Tag::Code)
    }

    pub fn is_list_container(&self) -> bool {
        matches!(self, Tag::BulletList | Tag::OrderedList)
    }

    pub fn heading_level(&self) -> Option<u8> {
        match self {
            Tag::Heading(level) => Some(*level),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentNode {
    pub tag: Tag,
    pub text: Option<String>,
    pub children: Vec<DocumentNode>,
    pub attrs: Vec<(String, String)>,
}

impl Default for Tag {
    fn default() -> Self {
        Tag::Document
    }
}

impl DocumentNode {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            text: None,
            children: Vec::new(),
            attrs: Vec::new(),
        }
    }

    pub fn with_text(tag: Tag, text: impl Into<String>) -> Self {
        Self {
            tag,
            text: Some(text.into()),
            children: Vec::new(),
            attrs: Vec::new(),
        }
    }

    pub fn text_run(text: impl Into<String>) -> Self {
        Self::with_text(Tag::Text, text)
    }

    /// Attribute lookup; unknown keys read as `""`.
    pub fn attr(&self, name: &str) -> &str {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.attrs.iter_mut().find(|(k, _)| *k == name) {
            slot.1 = value;
        } else {
            self.attrs.push((name, value));
        }
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(k, _)| k == name)
    }

    pub fn push(&mut self, child: DocumentNode) {
        self.children.push(child);
    }

    /// Direct text, trimmed view. `None` and `Some("")` are equivalent for
    /// the renderer.
    pub fn own_text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attr_lookup_defaults_to_empty() {
        let mut node = DocumentNode::new(Tag::Link);
        assert_eq!(node.attr("href"), "");
        node.set_attr("href", "https://example.org");
        assert_eq!(node.attr("href"), "https://example.org");
        node.set_attr("href", "https://example.com");
        assert_eq!(node.attr("href"), "https://example.com");
        assert_eq!(node.attrs.len(), 1);
    }

    #[test]
    fn heading_levels() {
        assert_eq!(Tag::Heading(3).heading_level(), Some(3));
        assert_eq!(Tag::Paragraph.heading_level(), None);
    }
}
