//! Arbor Template
//!
//! Resolves `${...}` spans embedded in node properties. A span holds a
//! function call (`name(arg, ...)`), a numeric or quoted literal, or a
//! reference path such as `page.name` or `parent.parent.tag`.

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod functions;
pub mod reference;
pub mod search;
pub mod split;

pub use config::TemplateConfig;
pub use context::{RenderContext, RequestContext, ResultCache};
pub use engine::TemplateEngine;
pub use error::{TemplateError, TemplateResult};
pub use functions::{FunctionContext, FunctionRegistry, TemplateFunction};
pub use reference::{escape_javascript, ReferenceResolver};
pub use search::{result_pages, ContentSearch, SearchProvider};
pub use split::split_arguments;
