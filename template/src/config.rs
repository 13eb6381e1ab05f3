//! Engine configuration.

/// Default bound on nested span/function/argument resolution.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Request parameter holding the search query for `result_size`.
pub const DEFAULT_SEARCH_PARAMETER: &str = "search";

/// Request attribute holding the REST payload for `rest_result`.
pub const DEFAULT_REST_RESPONSE_ATTRIBUTE: &str = "restResponse";

/// Configuration for a `TemplateEngine`.
#[derive(Debug, Clone)]
pub struct TemplateConfig {
    /// Maximum nesting of function calls and arguments before resolution
    /// gives up and yields null.
    pub max_depth: usize,
    pub search_parameter: String,
    pub rest_response_attribute: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            search_parameter: DEFAULT_SEARCH_PARAMETER.to_string(),
            rest_response_attribute: DEFAULT_REST_RESPONSE_ATTRIBUTE.to_string(),
        }
    }
}

impl TemplateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_search_parameter(mut self, name: impl Into<String>) -> Self {
        self.search_parameter = name.into();
        self
    }

    pub fn with_rest_response_attribute(mut self, name: impl Into<String>) -> Self {
        self.rest_response_attribute = name.into();
        self
    }
}
