use std::collections::{BTreeMap, BTreeSet};

use scraper::{ElementRef, Html};

/// An element of an already-parsed document. Validators only ever read it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    pub tag: String,
    pub id: Option<String>,
    pub classes: BTreeSet<String>,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<Node>,
    pub text: Option<String>,
}

impl Node {
    pub fn element(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self.attributes.insert("id".to_string(), id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.insert(class.to_string());
        let joined = self.classes.iter().cloned().collect::<Vec<String>>().join(" ");
        self.attributes.insert("class".to_string(), joined);
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        match name {
            "id" => return self.with_id(value),
            "class" => {
                self.classes.clear();
                for class in value.split_whitespace() {
                    self.classes.insert(class.to_string());
                }
            }
            _ => {}
        }
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Attribute value, treating an empty string as absent.
    pub fn non_empty_attr(&self, name: &str) -> Option<&str> {
        self.attr(name).filter(|value| !value.is_empty())
    }

    pub fn text_content(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    pub fn has_element_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn first_child(&self) -> Option<&Node> {
        self.children.first()
    }

    /// Element descendants in document order, excluding `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// Id if present, else the tag name.
    pub fn label(&self) -> &str {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => &self.tag,
        }
    }

    /// `<tag id="..">` form used in content-model diagnostics.
    pub fn describe(&self) -> String {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => format!("<{} id=\"{}\">", self.tag, id),
            _ => format!("<{}>", self.tag),
        }
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub title: Option<String>,
    pub head: Node,
    pub body: Node,
}

impl Document {
    pub fn new(title: Option<&str>, head: Node, body: Node) -> Self {
        Self {
            title: title
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(ToOwned::to_owned),
            head,
            body,
        }
    }

    /// Builds a document tree from HTML5 markup. Parsing never fails; a missing
    /// `head` or `body` is synthesized by the HTML5 tree construction rules.
    pub fn parse_html(source: &str) -> Self {
        let html = Html::parse_document(source);
        let root = html.root_element();

        let mut head = Node::element("head");
        let mut body = Node::element("body");
        for child in root.children().filter_map(ElementRef::wrap) {
            match child.value().name() {
                "head" => head = convert_element(child),
                "body" => body = convert_element(child),
                _ => {}
            }
        }

        let title = head
            .descendants()
            .find(|node| node.is("title"))
            .map(|node| node.text_content().to_string());

        Self::new(title.as_deref(), head, body)
    }

    /// Every id carried by an element of the head or body.
    pub fn ids(&self) -> BTreeSet<&str> {
        self.head
            .descendants()
            .chain(self.body.descendants())
            .filter_map(|node| node.id.as_deref())
            .filter(|id| !id.is_empty())
            .collect()
    }
}

fn convert_element(element: ElementRef<'_>) -> Node {
    let value = element.value();

    let attributes = value
        .attrs()
        .map(|(name, content)| (name.to_string(), content.to_string()))
        .collect::<BTreeMap<String, String>>();
    let classes = value
        .classes()
        .map(ToOwned::to_owned)
        .collect::<BTreeSet<String>>();
    let children = element
        .children()
        .filter_map(ElementRef::wrap)
        .map(convert_element)
        .collect::<Vec<Node>>();

    Node {
        tag: value.name().to_ascii_lowercase(),
        id: value.id().map(ToOwned::to_owned),
        classes,
        attributes,
        children,
        text: Some(element.text().collect::<String>()),
    }
}
