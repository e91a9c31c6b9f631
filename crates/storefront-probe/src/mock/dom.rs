//! A minimal virtual DOM and a [`Selector`] evaluator over it.
//!
//! Matching follows the same rules as the JavaScript rendering of a selector:
//! every query searches the descendants of its root, never the root itself.

use std::collections::BTreeMap;

use crate::locator::Selector;

/// One element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Tag name
    pub tag: String,
    /// `id` attribute
    pub id: Option<String>,
    /// `class` list
    pub classes: Vec<String>,
    /// Other attributes
    pub attributes: BTreeMap<String, String>,
    /// Own text, before children
    pub text: String,
    /// Form value for inputs and selects
    pub value: Option<String>,
    /// Rendered
    pub visible: bool,
    /// Accepts input
    pub enabled: bool,
    /// Child elements
    pub children: Vec<Node>,
}

impl Node {
    /// A visible, enabled element with no content
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            text: String::new(),
            value: None,
            visible: true,
            enabled: true,
            children: Vec::new(),
        }
    }

    /// Add a class
    #[must_use]
    pub fn class(mut self, name: impl Into<String>) -> Self {
        self.classes.push(name.into());
        self
    }

    /// Set the id
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Set the `data-test` attribute
    #[must_use]
    pub fn test_id(self, value: impl Into<String>) -> Self {
        self.attr(crate::locator::TEST_ATTRIBUTE, value)
    }

    /// Set own text
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the form value
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Mark as not rendered
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Mark as not accepting input
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Set visibility
    #[must_use]
    pub fn visible_if(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Append a child
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }

    /// Attribute lookup, including `id` and `class`
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<String> {
        match key {
            "id" => self.id.clone(),
            "class" if !self.classes.is_empty() => Some(self.classes.join(" ")),
            _ => self.attributes.get(key).cloned(),
        }
    }

    /// Own text followed by every descendant's text, like `textContent`
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }

    fn descendants(&self) -> Vec<&Self> {
        let mut out = Vec::new();
        for child in &self.children {
            out.push(child);
            out.extend(child.descendants());
        }
        out
    }

    fn has_class(&self, name: &str) -> bool {
        self.classes.iter().any(|c| c == name)
    }
}

/// Every descendant of `root` matching `selector`, in document order.
#[must_use]
pub fn select<'a>(root: &'a Node, selector: &Selector) -> Vec<&'a Node> {
    match selector {
        Selector::Attribute { key, value } => root
            .descendants()
            .into_iter()
            .filter(|n| n.attribute(key).as_deref() == Some(value.as_str()))
            .collect(),
        Selector::Class(name) => root
            .descendants()
            .into_iter()
            .filter(|n| n.has_class(name))
            .collect(),
        Selector::Id(id) => root
            .descendants()
            .into_iter()
            .filter(|n| n.id.as_deref() == Some(id.as_str()))
            .collect(),
        Selector::Text {
            within,
            text,
            exact,
        } => select(root, within)
            .into_iter()
            .filter(|n| {
                let content = n.text_content();
                let trimmed = content.trim();
                if *exact {
                    trimmed == text
                } else {
                    trimmed.contains(text.as_str())
                }
            })
            .collect(),
        Selector::Has { base, has } => select(root, base)
            .into_iter()
            .filter(|n| !select(n, has).is_empty())
            .collect(),
        Selector::Descendant { ancestor, target } => {
            let mut out: Vec<&Node> = Vec::new();
            for scope in select(root, ancestor) {
                for node in select(scope, target) {
                    if !out.iter().any(|seen| std::ptr::eq(*seen, node)) {
                        out.push(node);
                    }
                }
            }
            // Nested scopes can yield matches out of order.
            let order = root.descendants();
            out.sort_by_key(|n| order.iter().position(|o| std::ptr::eq(*o, *n)));
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, price: &str) -> Node {
        Node::new("div")
            .class("inventory_item")
            .child(Node::new("div").class("inventory_item_name").text(name))
            .child(Node::new("div").class("inventory_item_price").text(price))
    }

    fn page() -> Node {
        Node::new("body").child(
            Node::new("div")
                .class("inventory_list")
                .child(item("Sauce Labs Backpack", "$29.99"))
                .child(item("Sauce Labs Onesie", "$7.99")),
        )
    }

    #[test]
    fn test_class_and_attribute() {
        let root = Node::new("body")
            .child(Node::new("button").test_id("checkout").class("btn"))
            .child(Node::new("a").id("logout_sidebar_link"));
        assert_eq!(select(&root, &Selector::test_id("checkout")).len(), 1);
        assert_eq!(select(&root, &Selector::class("btn")).len(), 1);
        assert_eq!(select(&root, &Selector::id("logout_sidebar_link")).len(), 1);
        assert!(select(&root, &Selector::class("missing")).is_empty());
    }

    #[test]
    fn test_root_is_not_matched() {
        let root = Node::new("div").class("title");
        assert!(select(&root, &Selector::class("title")).is_empty());
    }

    #[test]
    fn test_exact_text_is_trimmed_and_verbatim() {
        let root = Node::new("body")
            .child(Node::new("span").class("n").text(" Sauce Labs Onesie "))
            .child(Node::new("span").class("n").text("Sauce Labs Onesie XL"));
        let exact = Selector::class("n").with_text("Sauce Labs Onesie");
        assert_eq!(select(&root, &exact).len(), 1);
        let contains = Selector::class("n").containing_text("Onesie");
        assert_eq!(select(&root, &contains).len(), 2);
    }

    #[test]
    fn test_containment_relation() {
        let root = page();
        let selector = Selector::class("inventory_item")
            .has(Selector::class("inventory_item_name").with_text("Sauce Labs Onesie"))
            .descendant(Selector::class("inventory_item_price"));
        let matches = select(&root, &selector);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text_content(), "$7.99");
    }

    #[test]
    fn test_descendant_keeps_document_order_without_duplicates() {
        let root = page();
        let selector = Selector::class("inventory_list")
            .descendant(Selector::class("inventory_item_name"));
        let names: Vec<String> = select(&root, &selector)
            .into_iter()
            .map(Node::text_content)
            .collect();
        assert_eq!(names, vec!["Sauce Labs Backpack", "Sauce Labs Onesie"]);
    }

    #[test]
    fn test_text_content_concatenates_children() {
        let node = Node::new("div")
            .text("Total: ")
            .child(Node::new("span").text("$1.00"));
        assert_eq!(node.text_content(), "Total: $1.00");
    }
}
