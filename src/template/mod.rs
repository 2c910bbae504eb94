//! Key/value HTML template engine.
//!
//! Implements the small tag language the report templates are written in.
//! A [`Context`] maps names to text values or loops of flat rows; [`render`]
//! parses the template and substitutes. Inside a loop, variables resolve
//! against the current row first, then the global context, and the sentinels
//! `__FIRST__`, `__LAST__` and `__COUNTER__` describe the row position.

pub mod parser;

pub use parser::parse;

use crate::domain::error::SyntaxError;
use parser::Node;
use std::collections::HashMap;

/// One loop iteration: a flat map of column name to rendered text.
#[derive(Debug, Clone, Default)]
pub struct Row {
    values: HashMap<String, String>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Text(String),
    Loop(Vec<Row>),
}

/// Template context. Unset variables render as empty text.
#[derive(Debug, Clone, Default)]
pub struct Context {
    values: HashMap<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), Value::Text(value.into()));
        self
    }

    pub fn set_loop(&mut self, key: impl Into<String>, rows: Vec<Row>) -> &mut Self {
        self.values.insert(key.into(), Value::Loop(rows));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}

/// Position of the row being rendered within its loop.
struct LoopScope<'a> {
    row: &'a Row,
    index: usize,
    len: usize,
}

impl LoopScope<'_> {
    fn is_first(&self) -> bool {
        self.index == 0
    }

    fn is_last(&self) -> bool {
        self.index + 1 == self.len
    }
}

/// Render `template` against `ctx`.
pub fn render(template: &str, ctx: &Context) -> Result<String, SyntaxError> {
    let nodes = parser::parse(template)?;
    let mut out = String::with_capacity(template.len());
    render_nodes(&nodes, ctx, None, &mut out);
    Ok(out)
}

fn render_nodes(nodes: &[Node], ctx: &Context, scope: Option<&LoopScope>, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Var(name) => out.push_str(&lookup(name, ctx, scope)),
            Node::Loop { name, body } => {
                let Some(Value::Loop(rows)) = ctx.get(name) else {
                    continue;
                };
                let len = rows.len();
                for (index, row) in rows.iter().enumerate() {
                    let inner = LoopScope { row, index, len };
                    render_nodes(body, ctx, Some(&inner), out);
                }
            }
            Node::If {
                name,
                then,
                otherwise,
            } => {
                let branch = if truthy(name, ctx, scope) { then } else { otherwise };
                render_nodes(branch, ctx, scope, out);
            }
        }
    }
}

fn lookup(name: &str, ctx: &Context, scope: Option<&LoopScope>) -> String {
    if let Some(scope) = scope {
        match name {
            "__FIRST__" => return if scope.is_first() { "1" } else { "" }.to_string(),
            "__LAST__" => return if scope.is_last() { "1" } else { "" }.to_string(),
            "__COUNTER__" => return (scope.index + 1).to_string(),
            _ => {}
        }
        if let Some(value) = scope.row.get(name) {
            return value.to_string();
        }
    }
    match ctx.get(name) {
        Some(Value::Text(text)) => text.clone(),
        _ => String::new(),
    }
}

fn truthy(name: &str, ctx: &Context, scope: Option<&LoopScope>) -> bool {
    if let Some(scope) = scope {
        match name {
            "__FIRST__" => return scope.is_first(),
            "__LAST__" => return scope.is_last(),
            _ => {}
        }
        if let Some(value) = scope.row.get(name) {
            return !value.is_empty() && value != "0";
        }
    }
    match ctx.get(name) {
        Some(Value::Text(text)) => !text.is_empty() && text != "0",
        Some(Value::Loop(rows)) => !rows.is_empty(),
        None => false,
    }
}
