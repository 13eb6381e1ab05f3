//! Template function registry.
//!
//! Functions map an argument array to a string. They never fail: missing
//! or malformed arguments produce an empty or best-effort result.

use arbor_core::NodeId;
use md5::{Digest, Md5};
use std::collections::HashMap;
use std::fmt;

/// Per-call state handed to functions alongside their arguments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FunctionContext {
    /// Data record bound to the component being rendered.
    pub data_id: Option<NodeId>,
    /// Resource addressed by the request.
    pub page_id: Option<NodeId>,
}

/// A named transform callable as `name(arg, ...)` inside a span.
///
/// Functions are shared by every thread rendering through one engine.
pub trait TemplateFunction: Send + Sync {
    fn call(&self, ctx: &FunctionContext, args: &[String]) -> Option<String>;
}

impl<F> TemplateFunction for F
where
    F: Fn(&FunctionContext, &[String]) -> Option<String> + Send + Sync,
{
    fn call(&self, ctx: &FunctionContext, args: &[String]) -> Option<String> {
        self(ctx, args)
    }
}

/// Name -> function table. Lookups are by exact name.
pub struct FunctionRegistry {
    functions: HashMap<String, Box<dyn TemplateFunction>>,
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = self.names();
        names.sort_unstable();
        f.debug_struct("FunctionRegistry").field("functions", &names).finish()
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl FunctionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// A registry holding `md5`, `upper`, `lower`, `capitalize`, `if`,
    /// `equal`, `add` and `active`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("md5", md5_hex);
        registry.register("upper", upper);
        registry.register("lower", lower);
        registry.register("capitalize", capitalize);
        registry.register("if", if_then_else);
        registry.register("equal", equal);
        registry.register("add", add);
        registry.register("active", active);
        registry
    }

    /// Register `function` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, function: impl TemplateFunction + 'static) {
        self.functions.insert(name.into(), Box::new(function));
    }

    pub fn get(&self, name: &str) -> Option<&dyn TemplateFunction> {
        self.functions.get(name).map(Box::as_ref)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.functions.keys().map(String::as_str).collect()
    }
}

// ========== Built-ins ==========

fn md5_hex(_: &FunctionContext, args: &[String]) -> Option<String> {
    let input = args.first()?;
    Some(hex::encode(Md5::digest(input.as_bytes())))
}

fn upper(_: &FunctionContext, args: &[String]) -> Option<String> {
    args.first().map(|s| s.to_uppercase())
}

fn lower(_: &FunctionContext, args: &[String]) -> Option<String> {
    args.first().map(|s| s.to_lowercase())
}

fn capitalize(_: &FunctionContext, args: &[String]) -> Option<String> {
    let input = args.first()?;
    let mut chars = input.chars();
    Some(match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    })
}

fn if_then_else(_: &FunctionContext, args: &[String]) -> Option<String> {
    match args {
        [condition, then, otherwise, ..] => Some(if condition == "true" {
            then.clone()
        } else {
            otherwise.clone()
        }),
        _ => Some(String::new()),
    }
}

fn equal(_: &FunctionContext, args: &[String]) -> Option<String> {
    let result = match args {
        [a, b, ..] => a == b,
        _ => true,
    };
    Some(result.to_string())
}

/// Sum of the integer arguments; anything unparseable is skipped.
fn add(_: &FunctionContext, args: &[String]) -> Option<String> {
    let sum = args
        .iter()
        .filter_map(|arg| arg.parse::<i64>().ok())
        .fold(0i64, i64::wrapping_add);
    Some(sum.to_string())
}

/// First argument when the bound data record is the addressed resource,
/// else the second (or empty).
fn active(ctx: &FunctionContext, args: &[String]) -> Option<String> {
    if args.is_empty() {
        return Some(String::new());
    }
    match (ctx.data_id, ctx.page_id) {
        (Some(data), Some(page)) if data == page => Some(args[0].clone()),
        (Some(_), Some(_)) => Some(args.get(1).cloned().unwrap_or_default()),
        _ => Some(String::new()),
    }
}
