//! Render and request context passed into every evaluation.

use arbor_core::NodeId;
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

/// Memoized search result pages for one request.
///
/// Interior mutability keeps the cache usable through a shared request
/// reference; it is `!Sync`, so a cache never crosses threads.
#[derive(Debug, Default)]
pub struct ResultCache {
    pages: RefCell<Option<BTreeSet<NodeId>>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached pages, computing them on first use.
    pub fn get_or_compute(&self, compute: impl FnOnce() -> BTreeSet<NodeId>) -> BTreeSet<NodeId> {
        if let Some(pages) = self.pages.borrow().as_ref() {
            return pages.clone();
        }
        let pages = compute();
        *self.pages.borrow_mut() = Some(pages.clone());
        pages
    }

    pub fn is_populated(&self) -> bool {
        self.pages.borrow().is_some()
    }

    pub fn clear(&self) {
        self.pages.borrow_mut().take();
    }
}

/// Parameters and attributes of the request being served.
#[derive(Debug, Default)]
pub struct RequestContext {
    parameters: HashMap<String, String>,
    attributes: HashMap<String, String>,
    results: ResultCache,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Search result cache scoped to this request.
    pub fn results(&self) -> &ResultCache {
        &self.results
    }
}

/// What is being rendered: page, addressed resource, component and
/// data record, plus the request.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderContext<'r> {
    /// Document being rendered.
    pub page: Option<NodeId>,
    /// Resource addressed by the request.
    pub page_id: Option<NodeId>,
    pub component: Option<NodeId>,
    /// Data record bound to the component being rendered.
    pub view_component: Option<NodeId>,
    pub request: Option<&'r RequestContext>,
}

impl<'r> RenderContext<'r> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: NodeId) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_page_id(mut self, page_id: NodeId) -> Self {
        self.page_id = Some(page_id);
        self
    }

    pub fn with_component(mut self, component: NodeId) -> Self {
        self.component = Some(component);
        self
    }

    pub fn with_view_component(mut self, view_component: NodeId) -> Self {
        self.view_component = Some(view_component);
        self
    }

    pub fn with_request(mut self, request: &'r RequestContext) -> Self {
        self.request = Some(request);
        self
    }
}
