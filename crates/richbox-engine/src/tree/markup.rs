//! Markup serialization of the content tree.
//!
//! Produces the region's inner markup, the string a host persists as the
//! editor content. Text and attribute values are escaped with `html-escape`.

use super::{ContentTree, NodeId};

/// Markup of every child of `node`, without the node's own tag.
pub fn inner_markup<T: ContentTree + ?Sized>(tree: &T, node: NodeId) -> String {
    let mut out = String::new();
    for child in tree.children(node) {
        write_node(tree, *child, &mut out);
    }
    out
}

/// Markup of `node` itself, including its tag.
pub fn outer_markup<T: ContentTree + ?Sized>(tree: &T, node: NodeId) -> String {
    let mut out = String::new();
    write_node(tree, node, &mut out);
    out
}

fn write_node<T: ContentTree + ?Sized>(tree: &T, node: NodeId, out: &mut String) {
    if let Some(text) = tree.text(node) {
        out.push_str(&html_escape::encode_text(text));
        return;
    }

    let Some(element) = tree.element(node) else {
        out.push_str(&inner_markup(tree, node));
        return;
    };

    let name = element.tag.name();
    out.push('<');
    out.push_str(name);
    for (attr, value) in element.attrs() {
        push_attr(out, attr, value);
    }
    if !element.style.is_empty() {
        push_attr(out, "style", &element.style.to_string());
    }
    out.push('>');
    for child in tree.children(node) {
        write_node(tree, *child, out);
    }
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&html_escape::encode_double_quoted_attribute(value));
    out.push('"');
}
