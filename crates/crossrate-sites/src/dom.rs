//! Owned, mutable HTML document.
//!
//! Pages are parsed with `scraper` and copied into a plain element tree so
//! adapters can graft rating blocks into them and serialize the result.
//! Selector-based reads go through `scraper` again on the serialized HTML,
//! which keeps the non-`Send` parser types out of async code.

use scraper::{ElementRef, Html, Node as ParsedNode};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_id(self, id: &str) -> Self {
        self.with_attr("id", id)
    }

    /// Adds to the class list instead of replacing it
    pub fn with_class(mut self, class: &str) -> Self {
        let class = class.trim();
        if class.is_empty() || self.has_class(class) {
            return self;
        }
        let classes = match self.attr("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
            _ => class.to_string(),
        };
        self.set_attr("class", classes);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children.into_iter().map(Node::Element));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn append(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    pub fn prepend(&mut self, node: impl Into<Node>) {
        self.children.insert(0, node.into());
    }

    /// Concatenated descendant text
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_element(self, &mut out);
        out
    }
}

/// Element predicate used to locate anchors.
pub fn by_id(id: &str) -> impl Fn(&Element) -> bool + '_ {
    move |e| e.id() == Some(id)
}

pub fn by_class(class: &str) -> impl Fn(&Element) -> bool + '_ {
    move |e| e.has_class(class)
}

pub fn by_tag(name: &str) -> impl Fn(&Element) -> bool + '_ {
    move |e| e.name().eq_ignore_ascii_case(name)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Element,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        let parsed = Html::parse_document(html);
        Self {
            root: convert_element(parsed.root_element()),
        }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn to_html(&self) -> String {
        let mut out = String::from("<!DOCTYPE html>");
        write_element(&self.root, &mut out);
        out
    }

    /// First element in document order matching `pred`
    pub fn find(&self, pred: impl Fn(&Element) -> bool) -> Option<&Element> {
        find_in(&self.root, &pred)
    }

    pub fn find_mut(&mut self, pred: impl Fn(&Element) -> bool) -> Option<&mut Element> {
        find_mut_in(&mut self.root, &pred)
    }

    pub fn find_all(&self, pred: impl Fn(&Element) -> bool) -> Vec<&Element> {
        let mut found = Vec::new();
        find_all_in(&self.root, &pred, &mut found);
        found
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        self.find(by_id(id))
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.find_by_id(id).is_some()
    }

    /// Inserts `node` as the next sibling of the first element matching
    /// `pred`. Returns false when nothing matches or the match is the root.
    pub fn insert_after(&mut self, pred: impl Fn(&Element) -> bool, node: impl Into<Node>) -> bool {
        self.insert_sibling(&pred, node.into(), 1)
    }

    pub fn insert_before(&mut self, pred: impl Fn(&Element) -> bool, node: impl Into<Node>) -> bool {
        self.insert_sibling(&pred, node.into(), 0)
    }

    /// Appends `node` as the last child of the first element matching `pred`
    pub fn append_to(&mut self, pred: impl Fn(&Element) -> bool, node: impl Into<Node>) -> bool {
        match self.find_mut(pred) {
            Some(parent) => {
                parent.append(node);
                true
            }
            None => false,
        }
    }

    pub fn prepend_to(&mut self, pred: impl Fn(&Element) -> bool, node: impl Into<Node>) -> bool {
        match self.find_mut(pred) {
            Some(parent) => {
                parent.prepend(node);
                true
            }
            None => false,
        }
    }

    fn insert_sibling(&mut self, pred: &dyn Fn(&Element) -> bool, node: Node, offset: usize) -> bool {
        let mut path = Vec::new();
        if !find_path(&self.root, pred, &mut path) {
            return false;
        }
        let Some(index) = path.pop() else {
            return false;
        };
        match self.element_at_mut(&path) {
            Some(parent) => {
                parent.children.insert(index + offset, node);
                true
            }
            None => false,
        }
    }

    fn element_at_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        let mut current = &mut self.root;
        for &index in path {
            current = match current.children.get_mut(index) {
                Some(Node::Element(child)) => child,
                _ => return None,
            };
        }
        Some(current)
    }
}

fn convert_element(element: ElementRef<'_>) -> Element {
    let value = element.value();
    let mut out = Element {
        name: value.name().to_string(),
        attrs: value
            .attrs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        children: Vec::new(),
    };

    for child in element.children() {
        match child.value() {
            ParsedNode::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    out.children.push(Node::Element(convert_element(child_element)));
                }
            }
            ParsedNode::Text(text) => {
                let text: &str = text;
                out.children.push(Node::Text(text.to_owned()));
            }
            ParsedNode::Comment(comment) => {
                let comment: &str = comment;
                out.children.push(Node::Comment(comment.to_owned()));
            }
            _ => {}
        }
    }
    out
}

fn find_in<'a>(element: &'a Element, pred: &dyn Fn(&Element) -> bool) -> Option<&'a Element> {
    if pred(element) {
        return Some(element);
    }
    element.child_elements().find_map(|child| find_in(child, pred))
}

fn find_mut_in<'a>(element: &'a mut Element, pred: &dyn Fn(&Element) -> bool) -> Option<&'a mut Element> {
    if pred(element) {
        return Some(element);
    }
    for child in element.children.iter_mut() {
        if let Node::Element(child) = child {
            if let Some(found) = find_mut_in(child, pred) {
                return Some(found);
            }
        }
    }
    None
}

fn find_all_in<'a>(element: &'a Element, pred: &dyn Fn(&Element) -> bool, found: &mut Vec<&'a Element>) {
    if pred(element) {
        found.push(element);
    }
    for child in element.child_elements() {
        find_all_in(child, pred, found);
    }
}

fn find_path(element: &Element, pred: &dyn Fn(&Element) -> bool, path: &mut Vec<usize>) -> bool {
    if pred(element) {
        return true;
    }
    for (index, child) in element.children.iter().enumerate() {
        if let Node::Element(child) = child {
            path.push(index);
            if find_path(child, pred, path) {
                return true;
            }
            path.pop();
        }
    }
    false
}

fn collect_text(element: &Element, out: &mut String) {
    for child in &element.children {
        match child {
            Node::Text(text) => out.push_str(text),
            Node::Element(e) => collect_text(e, out),
            Node::Comment(_) => {}
        }
    }
}

fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.name);
    for (name, value) in &element.attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&element.name.as_str()) {
        return;
    }

    let raw = RAW_TEXT_ELEMENTS.contains(&element.name.as_str());
    for child in &element.children {
        match child {
            Node::Text(text) if raw => out.push_str(text),
            Node::Text(text) => out.push_str(&escape_text(text)),
            Node::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
            Node::Element(child) => write_element(child, out),
        }
    }

    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\u{a0}', "&nbsp;")
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('\u{a0}', "&nbsp;")
}
