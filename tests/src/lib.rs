//! Integration test framework for Arbor.
//!
//! `Site` builds a page to edit and render; `TreeAssertion` and
//! `check_chain` verify the resulting tree.

pub mod error;

pub mod prelude {
    pub use crate::assertion::{check_chain, TreeAssertion};
    pub use crate::error::{FixtureError, FixtureResult};
    pub use crate::fixture::{labels, Site};
    pub use arbor_core::{attrs, NodeId, Value};
    pub use arbor_dom::{
        create_principal, props, AttachmentState, Dom, DomError, DomResult, DomView, NodeKind,
        RelType, SecurityContext, CONTENT_TYPE,
    };
    pub use arbor_graph::Graph;
    pub use arbor_template::{
        FunctionContext, RenderContext, RequestContext, TemplateConfig, TemplateEngine,
    };
    pub use arbor_transaction::{run_in_transaction, Transaction};
}
