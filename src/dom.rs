//! A small detached document tree. Elements are addressed by id the way the
//! admin pages address them in the browser.

use std::collections::BTreeMap;

use handlebars::html_escape;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Element(Element),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag :      &'static str,
    pub id :       Option<String>,
    pub attrs :    BTreeMap<&'static str, String>,
    pub children : Vec<Node>,
}

impl Element {
    pub fn new(tag : &'static str) -> Self {
        Self {
            tag,
            id : None,
            attrs : BTreeMap::new(),
            children : Vec::new(),
        }
    }

    pub fn with_id(mut self, id : impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn attr(mut self, name : &'static str, value : impl Into<String>) -> Self {
        self.attrs.insert(name, value.into());
        self
    }

    pub fn child(mut self, node : impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn text(self, text : impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    pub fn has_attr(&self, name : &str) -> bool {
        self.attrs.contains_key(name)
    }

    pub fn set_flag(&mut self, name : &'static str, on : bool) {
        if on {
            self.attrs.insert(name, String::new());
        } else {
            self.attrs.remove(name);
        }
    }

    /// Current value of an input element.
    pub fn value(&self) -> &str {
        self.attrs.get("value").map(String::as_str).unwrap_or("")
    }

    pub fn set_value(&mut self, value : impl Into<String>) {
        self.attrs.insert("value", value.into());
    }

    pub fn is_checked(&self) -> bool {
        self.has_attr("checked")
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }

    pub fn set_text(&mut self, text : impl Into<String>) {
        self.children = vec![Node::Text(text.into())];
    }

    /// Child elements with the given tag, skipping text nodes.
    pub fn elements<'a>(
        &'a self,
        tag : &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter_map(move |c| match c {
            Node::Element(el) if el.tag == tag => Some(el),
            _ => None,
        })
    }
}

impl From<Element> for Node {
    fn from(el : Element) -> Node {
        Node::Element(el)
    }
}

pub fn span(id : impl Into<String>, text : impl Into<String>) -> Element {
    Element::new("span").with_id(id).text(text)
}

pub fn button(id : impl Into<String>, label : impl Into<String>) -> Element {
    Element::new("button").with_id(id).text(label)
}

pub fn input(id : impl Into<String>, value : impl Into<String>) -> Element {
    Element::new("input")
        .with_id(id)
        .attr("type", "text")
        .attr("value", value)
}

pub fn checkbox(id : impl Into<String>, checked : bool) -> Element {
    let mut el = Element::new("input").with_id(id).attr("type", "checkbox");
    el.set_flag("checked", checked);
    el
}

impl Node {
    pub fn text(text : impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out : &mut String) {
        match self {
            Node::Text(s) => out.push_str(s),
            Node::Element(el) => {
                for child in &el.children {
                    child.collect_text(out);
                }
            },
        }
    }

    pub fn find(&self, id : &str) -> Option<&Element> {
        match self {
            Node::Text(_) => None,
            Node::Element(el) => {
                if el.id.as_deref() == Some(id) {
                    return Some(el);
                }
                el.children.iter().find_map(|c| c.find(id))
            },
        }
    }

    pub fn find_mut(&mut self, id : &str) -> Option<&mut Element> {
        match self {
            Node::Text(_) => None,
            Node::Element(el) => {
                if el.id.as_deref() == Some(id) {
                    return Some(el);
                }
                el.children.iter_mut().find_map(|c| c.find_mut(id))
            },
        }
    }

    /// Swaps the element carrying `id` for `node`. The root can't be
    /// replaced.
    pub fn replace(&mut self, id : &str, node : Node) -> bool {
        let el = match self {
            Node::Element(el) => el,
            Node::Text(_) => return false,
        };

        let hit = el.children.iter().position(|c| {
            matches!(c, Node::Element(child) if child.id.as_deref() == Some(id))
        });

        match hit {
            Some(i) => {
                el.children[i] = node;
                true
            },
            None => el
                .children
                .iter_mut()
                .any(|c| c.replace(id, node.clone())),
        }
    }

    pub fn remove(&mut self, id : &str) -> bool {
        let el = match self {
            Node::Element(el) => el,
            Node::Text(_) => return false,
        };

        let before = el.children.len();
        el.children.retain(|c| {
            !matches!(c, Node::Element(child) if child.id.as_deref() == Some(id))
        });

        before != el.children.len() || el.children.iter_mut().any(|c| c.remove(id))
    }

    /// Sets the text of the element carrying `id`, returns false when absent.
    pub fn set_text(&mut self, id : &str, text : impl Into<String>) -> bool {
        match self.find_mut(id) {
            Some(el) => {
                el.set_text(text);
                true
            },
            None => false,
        }
    }

    pub fn set_children(&mut self, id : &str, children : Vec<Node>) -> bool {
        match self.find_mut(id) {
            Some(el) => {
                el.children = children;
                true
            },
            None => false,
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out : &mut String) {
        match self {
            Node::Text(s) => out.push_str(&html_escape(s)),
            Node::Element(el) => {
                out.push('<');
                out.push_str(el.tag);
                if let Some(id) = &el.id {
                    out.push_str(&format!(" id=\"{}\"", html_escape(id)));
                }
                for (name, value) in &el.attrs {
                    if value.is_empty() && *name != "value" {
                        out.push_str(&format!(" {}", name));
                    } else {
                        out.push_str(&format!(
                            " {}=\"{}\"",
                            name,
                            html_escape(value)
                        ));
                    }
                }
                out.push('>');

                if el.tag == "input" {
                    return;
                }

                for child in &el.children {
                    child.write_html(out);
                }
                out.push_str(&format!("</{}>", el.tag));
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        Element::new("div")
            .with_id("root")
            .child(span("1-long", "http://a.example"))
            .child(Element::new("p").child(button("1-update", "Edit")))
            .into()
    }

    #[test]
    fn finds_nested_elements_by_id() {
        let doc = sample();

        assert_eq!(doc.find("1-update").unwrap().text_content(), "Edit");
        assert!(doc.find("missing").is_none());
    }

    #[test]
    fn replace_keeps_position() {
        let mut doc = sample();

        assert!(doc.replace("1-long", input("1-long", "x").into()));

        let root = doc.as_element().unwrap();
        assert_eq!(root.children[0].as_element().unwrap().tag, "input");
        assert_eq!(doc.find("1-long").unwrap().value(), "x");
    }

    #[test]
    fn remove_reports_whether_anything_went() {
        let mut doc = sample();

        assert!(doc.remove("1-update"));
        assert!(!doc.remove("1-update"));
        assert!(doc.find("1-long").is_some());
    }

    #[test]
    fn html_escapes_text_and_attributes() {
        let node : Node = Element::new("td")
            .child(span("a-long", "<b>&"))
            .child(checkbox("a-permission-users", true))
            .into();

        assert_eq!(
            node.to_html(),
            "<td><span id=\"a-long\">&lt;b&gt;&amp;</span>\
             <input id=\"a-permission-users\" checked type=\"checkbox\"></td>"
        );
    }
}
