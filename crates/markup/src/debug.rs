use std::fmt::Write;

use crate::tree::MarkupTree;
use crate::types::{NodeData, NodeId};

const PREVIEW_CHARS: usize = 40;

impl MarkupTree {
    /// Indented one-line-per-node view of the tree, capped at `cap` lines. Used in diagnostics
    /// when a render pass fails half way.
    pub fn outline(&self, cap: usize) -> Vec<String> {
        let mut out = Vec::new();
        let mut stack = vec![(NodeId::DOCUMENT, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            if out.len() == cap {
                break;
            }
            let data = &self.arena_node(id).data;
            if let Some(label) = self.outline_label(id, data) {
                out.push(format!("{:width$}{label}", "", width = depth * 2));
            }
            if let Some(children) = data.children() {
                stack.extend(children.iter().rev().map(|&child| (child, depth + 1)));
            }
        }
        out
    }

    fn outline_label(&self, id: NodeId, data: &NodeData) -> Option<String> {
        let label = match data {
            NodeData::Document { doctype, .. } => match doctype {
                Some(doctype) => format!("<!DOCTYPE {doctype}>"),
                None => "#document".to_string(),
            },
            NodeData::Element(element) => {
                let mut label = format!("<{}", element.name);
                let shown = element
                    .attributes
                    .iter()
                    .filter(|a| a.namespace.is_none() && (a.name == "id" || a.name == "class"));
                for attr in shown {
                    let _ = write!(label, " {}=\"{}\"", attr.name, attr.value);
                }
                label.push('>');
                if self.current() == Some(id) {
                    label.push_str("  <- current");
                }
                label
            }
            NodeData::Text(text) | NodeData::CData(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return None;
                }
                format!("\"{}\"", preview(text))
            }
            NodeData::Raw(markup) => format!("raw({})", preview(markup)),
            NodeData::Comment(comment) => format!("<!-- {} -->", preview(comment)),
        };
        Some(label)
    }
}

fn preview(s: &str) -> String {
    let mut out: String = s
        .chars()
        .take(PREVIEW_CHARS)
        .map(|ch| if ch == '\n' { ' ' } else { ch })
        .collect();
    if s.chars().nth(PREVIEW_CHARS).is_some() {
        out.push('…');
    }
    out
}
