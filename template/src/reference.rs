//! Reference path resolution.
//!
//! A path is a dot-separated list of segments. Keyword segments move a
//! cursor (or return a request-derived value directly); the last segment
//! names the property read off the node the cursor ends on.

use crate::config::TemplateConfig;
use crate::context::RenderContext;
use crate::search::{result_pages, SearchProvider};
use crate::TemplateResult;
use arbor_core::{NodeId, Value};
use arbor_dom::{owner_of, DomView, NodeKind};
use tracing::debug;

/// Virtual property yielding the node identifier.
pub const ID_PROPERTY: &str = "id";

/// Position of the cursor while walking a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    /// No keyword seen yet; relations start at the evaluating node.
    Start,
    At(NodeId),
    /// A keyword pointed nowhere.
    Lost,
}

impl Cursor {
    fn from_option(node: Option<NodeId>) -> Self {
        node.map_or(Cursor::Lost, Cursor::At)
    }
}

/// Resolves reference paths for one evaluating node.
pub struct ReferenceResolver<'a> {
    pub view: DomView<'a>,
    pub node: NodeId,
    pub ctx: &'a RenderContext<'a>,
    pub config: &'a TemplateConfig,
    pub search: &'a dyn SearchProvider,
}

impl<'a> ReferenceResolver<'a> {
    /// Resolve `path`. Unknown segments are ignored; a path that never
    /// positions the cursor resolves to None.
    pub fn resolve(&self, path: &str) -> TemplateResult<Option<String>> {
        let parts: Vec<&str> = path.split('.').filter(|p| !p.is_empty()).collect();
        let Some(key) = parts.last().copied() else {
            return Ok(None);
        };

        let mut cursor = Cursor::Start;
        for part in &parts {
            let base = match cursor {
                Cursor::Start => Some(self.node),
                Cursor::At(node) => Some(node),
                Cursor::Lost => None,
            };

            match part.to_ascii_lowercase().as_str() {
                "request" => {
                    if let Some(request) = self.ctx.request {
                        return Ok(Some(request.parameter(key).unwrap_or_default().to_string()));
                    }
                }
                "component" => cursor = Cursor::from_option(self.existing(self.ctx.component)),
                "resource" => cursor = Cursor::from_option(self.existing(self.ctx.page_id)),
                "page" => cursor = Cursor::from_option(self.existing(self.ctx.page)),
                "data" => cursor = Cursor::from_option(self.existing(self.ctx.view_component)),
                "link" => cursor = Cursor::from_option(base.and_then(|n| self.view.linked_node(n))),
                "parent" => cursor = Cursor::from_option(base.and_then(|n| self.parent_in_page(n))),
                "owner" => {
                    cursor = Cursor::from_option(base.and_then(|n| owner_of(self.view.graph(), n)))
                }
                "root" => {
                    let start = self.ctx.view_component.unwrap_or(self.node);
                    cursor = Cursor::from_option(self.enclosing_document(start));
                }
                "result_size" => {
                    let pages = result_pages(
                        self.search,
                        self.view,
                        self.ctx,
                        &self.config.search_parameter,
                    );
                    return Ok(Some(pages.len().to_string()));
                }
                "rest_result" => {
                    return Ok(Some(match self.ctx.request {
                        Some(request) => {
                            let raw = request
                                .attribute(&self.config.rest_response_attribute)
                                .unwrap_or_default();
                            escape_javascript(&raw.replace('\n', ""))
                        }
                        None => "0".to_string(),
                    }));
                }
                _ => {}
            }
        }

        match cursor {
            Cursor::At(node) => self.property(node, key),
            Cursor::Start | Cursor::Lost => {
                debug!(path, "reference path did not reach a node");
                Ok(None)
            }
        }
    }

    fn existing(&self, node: Option<NodeId>) -> Option<NodeId> {
        node.filter(|n| self.view.graph().contains_node(*n))
    }

    fn property(&self, node: NodeId, key: &str) -> TemplateResult<Option<String>> {
        let record = self.view.record(node)?;
        if key == ID_PROPERTY {
            return Ok(Some(node.raw().to_string()));
        }
        Ok(record.get_attr(key).and_then(Value::to_text))
    }

    /// The parent of `node` when it belongs to the page being rendered.
    /// Without a page every parent qualifies.
    fn parent_in_page(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.view.parent_node(node)?;
        match self.ctx.page {
            None => Some(parent),
            Some(page) if parent == page || self.view.owner_document(parent) == Some(page) => {
                Some(parent)
            }
            Some(_) => None,
        }
    }

    fn enclosing_document(&self, start: NodeId) -> Option<NodeId> {
        std::iter::once(start)
            .chain(self.view.ancestors(start))
            .find(|n| matches!(self.view.kind(*n), Ok(NodeKind::Document)))
    }
}

/// Escape a string for embedding in a JavaScript string literal.
pub fn escape_javascript(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '/' => out.push_str("\\/"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || (c as u32) > 0x7f => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{:04X}", unit));
                }
            }
            c => out.push(c),
        }
    }
    out
}
