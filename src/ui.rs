use handlebars::Handlebars;
use serde::Serialize;

use crate::dom::{Element, Node};
use crate::page::Page;
use crate::Result;

pub struct Renderer(Handlebars<'static>);

impl Renderer {
    pub fn new() -> Result<Self> {
        let mut t = Handlebars::new();
        t.set_strict_mode(true);

        t.register_template_string("page", include_str!("../ui/page.html"))?;

        Ok(Self(t))
    }

    /// The page as a standalone HTML document.
    pub fn html(&self, page : &impl Page) -> Result<String> {
        #[derive(Serialize)]
        struct Ctx<'a> {
            title : &'a str,
            body :  String,
        }

        Ok(self.0.render("page", &Ctx {
            title : page.title(),
            body :  page.document().to_html(),
        })?)
    }

    /// Status lines followed by the table, columns padded to line up.
    pub fn text(&self, page : &impl Page) -> String {
        let mut out = String::new();
        write_text(page.document(), &mut out);
        out
    }
}

fn push_line(out : &mut String, line : &str) {
    out.push_str(line.trim_end());
    out.push('\n');
}

fn write_text(node : &Node, out : &mut String) {
    match node {
        Node::Text(s) if !s.is_empty() => push_line(out, s),
        Node::Text(_) => {},
        Node::Element(el) => match el.tag {
            "table" => write_table(el, out),
            "input" | "button" => {},
            "p" => {
                let text = el.text_content();
                if !text.is_empty() {
                    push_line(out, &text);
                }
            },
            _ => {
                for child in &el.children {
                    write_text(child, out);
                }
            },
        },
    }
}

fn cell_text(node : &Node) -> String {
    match node {
        Node::Text(s) => s.clone(),
        Node::Element(el) => match (el.tag, el.attrs.get("type").map(String::as_str)) {
            ("input", Some("checkbox")) if el.is_checked() => "[x]".to_string(),
            ("input", Some("checkbox")) => "[ ]".to_string(),
            ("input", _) => format!("[{}]", el.value()),
            ("button", _) => String::new(),
            _ => el.children.iter().map(cell_text).collect(),
        },
    }
}

fn write_table(table : &Element, out : &mut String) {
    let rows : Vec<Vec<String>> = table
        .elements("tr")
        .map(|tr| {
            tr.children
                .iter()
                .filter(|c| matches!(c, Node::Element(_)))
                .map(cell_text)
                .collect()
        })
        .collect();

    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths : Vec<usize> = (0..columns)
        .map(|i| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    for row in &rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ");
        push_line(out, &line);
    }
}
