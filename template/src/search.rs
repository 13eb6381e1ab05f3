//! Search collaborator behind the `result_size` keyword.

use crate::context::RenderContext;
use crate::TemplateResult;
use arbor_core::{NodeId, Value};
use arbor_dom::{props, DomView, CONTENT_TYPE};
use arbor_graph::Graph;
use std::collections::BTreeSet;
use tracing::warn;

/// Finds content records matching a query.
pub trait SearchProvider: Send + Sync {
    fn search(&self, graph: &Graph, query: &str) -> TemplateResult<Vec<NodeId>>;
}

/// Case-insensitive substring search over the `content` property of
/// content records.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentSearch;

impl SearchProvider for ContentSearch {
    fn search(&self, graph: &Graph, query: &str) -> TemplateResult<Vec<NodeId>> {
        let needle = query.to_lowercase();
        Ok(graph
            .nodes_by_type(CONTENT_TYPE)
            .filter(|id| {
                graph
                    .get_node(*id)
                    .and_then(|n| n.get_attr(props::CONTENT))
                    .and_then(Value::as_str)
                    .is_some_and(|text| text.to_lowercase().contains(&needle))
            })
            .collect())
    }
}

/// Documents containing content that matches the request's search query,
/// excluding the page being rendered. The unfiltered set is memoized in
/// the request's cache, so every page rendered for the request shares it.
pub fn result_pages(
    search: &dyn SearchProvider,
    view: DomView<'_>,
    ctx: &RenderContext<'_>,
    search_parameter: &str,
) -> BTreeSet<NodeId> {
    let Some(request) = ctx.request else {
        return BTreeSet::new();
    };
    let query = request.parameter(search_parameter).unwrap_or_default();
    if query.is_empty() {
        return BTreeSet::new();
    }

    let mut pages = request
        .results()
        .get_or_compute(|| match search.search(view.graph(), query) {
            Ok(hits) => hits
                .into_iter()
                .filter_map(|hit| view.owner_document(hit))
                .collect(),
            Err(e) => {
                warn!(error = %e, query, "error while searching in content");
                BTreeSet::new()
            }
        });
    if let Some(page) = ctx.page {
        pages.remove(&page);
    }
    pages
}
