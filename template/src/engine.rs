//! The `${...}` template engine.

use crate::config::TemplateConfig;
use crate::context::RenderContext;
use crate::functions::{FunctionContext, FunctionRegistry};
use crate::reference::ReferenceResolver;
use crate::search::{ContentSearch, SearchProvider};
use crate::split::split_arguments;
use crate::TemplateResult;
use arbor_core::{NodeId, Value};
use arbor_dom::{DomView, TreeManager};
use arbor_graph::Graph;
use regex_lite::Regex;
use tracing::{debug, instrument, warn};

/// A `${...}` span; the first `}` closes it.
const TEMPLATE_PATTERN: &str = r"\$\{[^}]*\}";

/// `name(arguments)` covering the whole expression.
const FUNCTION_PATTERN: &str = r"^([a-zA-Z0-9_]+)\((.*)\)$";

/// Resolves `${...}` spans against the document tree.
///
/// The engine is `Send + Sync`: one instance may serve evaluations on any
/// number of threads. Per-request state lives in the `RenderContext`.
pub struct TemplateEngine {
    config: TemplateConfig,
    registry: FunctionRegistry,
    search: Box<dyn SearchProvider>,
    tree: TreeManager,
    template_pattern: Regex,
    function_pattern: Regex,
}

impl std::fmt::Debug for TemplateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateEngine")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish()
    }
}

impl TemplateEngine {
    /// Create an engine with the default configuration and built-in
    /// functions.
    pub fn new() -> TemplateResult<Self> {
        Self::with_config(TemplateConfig::default())
    }

    pub fn with_config(config: TemplateConfig) -> TemplateResult<Self> {
        Ok(Self {
            config,
            registry: FunctionRegistry::with_builtins(),
            search: Box::new(ContentSearch),
            tree: TreeManager::default(),
            template_pattern: Regex::new(TEMPLATE_PATTERN)?,
            function_pattern: Regex::new(FUNCTION_PATTERN)?,
        })
    }

    pub fn with_registry(mut self, registry: FunctionRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_search(mut self, search: impl SearchProvider + 'static) -> Self {
        self.search = Box::new(search);
        self
    }

    pub fn with_tree_manager(mut self, tree: TreeManager) -> Self {
        self.tree = tree;
        self
    }

    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.registry
    }

    /// Read property `key` of `node` and resolve the spans it contains.
    pub fn render_property(
        &self,
        graph: &Graph,
        node: NodeId,
        ctx: &RenderContext<'_>,
        key: &str,
    ) -> TemplateResult<Option<String>> {
        let view = DomView::new(graph, self.tree);
        let raw = view.record(node)?.get_attr(key).and_then(Value::to_text);
        match raw {
            Some(raw) => Ok(Some(self.replace_variables(graph, node, ctx, &raw)?)),
            None => Ok(None),
        }
    }

    /// Replace every `${...}` span in `raw` with its resolved value. Spans
    /// that resolve to null are left as they are.
    #[instrument(skip_all, fields(node = %node, len = raw.len()))]
    pub fn replace_variables(
        &self,
        graph: &Graph,
        node: NodeId,
        ctx: &RenderContext<'_>,
        raw: &str,
    ) -> TemplateResult<String> {
        let mut out = String::with_capacity(raw.len());
        let mut last = 0;
        for span in self.template_pattern.find_iter(raw) {
            let text = span.as_str();
            let source = &text[2..text.len() - 1];
            out.push_str(&raw[last..span.start()]);
            match self.extract_functions(graph, node, ctx, source)? {
                Some(value) => out.push_str(&value),
                None => {
                    debug!(span = text, "span left unresolved");
                    out.push_str(text);
                }
            }
            last = span.end();
        }
        out.push_str(&raw[last..]);
        Ok(out)
    }

    /// Resolve one span body: a function call, a literal or a reference path.
    pub fn extract_functions(
        &self,
        graph: &Graph,
        node: NodeId,
        ctx: &RenderContext<'_>,
        source: &str,
    ) -> TemplateResult<Option<String>> {
        self.resolve(graph, node, ctx, source, 0)
    }

    fn resolve(
        &self,
        graph: &Graph,
        node: NodeId,
        ctx: &RenderContext<'_>,
        source: &str,
        depth: usize,
    ) -> TemplateResult<Option<String>> {
        if depth > self.config.max_depth {
            warn!(depth, source, "template nesting too deep, giving up");
            return Ok(None);
        }

        if let Some(caps) = self.function_pattern.captures(source) {
            let name = caps.get(1).map_or("", |m| m.as_str());
            let parameters = caps.get(2).map_or("", |m| m.as_str());
            if let Some(function) = self.registry.get(name) {
                let mut args = Vec::new();
                for argument in split_arguments(parameters) {
                    let argument = argument.trim();
                    let value = self.resolve(graph, node, ctx, argument, depth + 1)?;
                    args.push(value.unwrap_or_else(|| argument.to_string()));
                }
                let fctx = FunctionContext {
                    data_id: ctx.view_component,
                    page_id: ctx.page_id,
                };
                return Ok(function.call(&fctx, &args));
            }
        }

        if is_numeric(source) {
            return Ok(Some(source.to_string()));
        }
        if let Some(unquoted) = unquote(source) {
            return Ok(Some(unquoted.to_string()));
        }

        let resolver = ReferenceResolver {
            view: DomView::new(graph, self.tree),
            node,
            ctx,
            config: &self.config,
            search: self.search.as_ref(),
        };
        resolver.resolve(source)
    }
}

fn is_numeric(source: &str) -> bool {
    !source.trim().is_empty() && source.chars().all(|c| c.is_ascii_digit())
}

fn unquote(source: &str) -> Option<&str> {
    if source.len() < 2 {
        return None;
    }
    ['"', '\'']
        .into_iter()
        .find_map(|q| source.strip_prefix(q)?.strip_suffix(q))
}
