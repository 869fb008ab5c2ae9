// ABOUTME: Function registry exposed to templates: val, toYAML, ENDL, K8sAnnotation/K8sLabel, include
// ABOUTME: Built fresh per engine from that invocation's variable map, layered over the helper library

use handlebars::{Context, Handlebars, Helper, HelperDef, RenderContext, RenderError, ScopedJson};
use serde_json::Value as JsonValue;
use std::cell::Cell;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use super::error::{Result, TemplateError};
use super::library;
use super::value::{is_zero, stringify};
use crate::values::VariableMap;

/// Nested `include` calls allowed before rendering is aborted.
pub const MAX_INCLUDE_DEPTH: usize = 64;

type FunctionBody = dyn Fn(&[&JsonValue]) -> Result<JsonValue> + Send + Sync;

/// A named callable over positional template arguments.
pub struct FunctionEntry {
    name: &'static str,
    body: Box<FunctionBody>,
}

impl FunctionEntry {
    pub fn new<F>(name: &'static str, body: F) -> Self
    where
        F: Fn(&[&JsonValue]) -> Result<JsonValue> + Send + Sync + 'static,
    {
        Self {
            name,
            body: Box::new(body),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn call(&self, args: &[&JsonValue]) -> Result<JsonValue> {
        (self.body)(args)
    }
}

impl HelperDef for FunctionEntry {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'reg, 'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> std::result::Result<ScopedJson<'reg, 'rc>, RenderError> {
        let args: Vec<&JsonValue> = h.params().iter().map(|p| p.value()).collect();
        self.call(&args)
            .map(ScopedJson::Derived)
            .map_err(into_render_error)
    }
}

pub(crate) fn into_render_error(err: TemplateError) -> RenderError {
    RenderError::from_error(&err.to_string(), err)
}

/// Name to function mapping. Inserting an existing name replaces it.
pub struct FunctionRegistry {
    entries: BTreeMap<String, Box<dyn HelperDef + Send + Sync>>,
}

impl FunctionRegistry {
    /// The complete function set for one invocation: helper library first, then
    /// the custom functions closing over `values`.
    pub fn new(values: VariableMap) -> Self {
        let mut registry = Self::empty();
        library::install(&mut registry);
        install_custom_functions(&mut registry, Arc::new(values));
        debug!("Function registry assembled with {} entries", registry.len());
        registry
    }

    pub(crate) fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, entry: FunctionEntry) {
        self.insert_helper(entry.name(), Box::new(entry));
    }

    pub(crate) fn insert_helper(&mut self, name: &str, helper: Box<dyn HelperDef + Send + Sync>) {
        if self.entries.insert(name.to_string(), helper).is_some() {
            debug!("Function {} replaced by a later registration", name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Move every function into a handlebars registry.
    pub(crate) fn install(self, handlebars: &mut Handlebars<'static>) {
        for (name, helper) in self.entries {
            handlebars.register_helper(&name, helper);
        }
    }
}

fn install_custom_functions(registry: &mut FunctionRegistry, values: Arc<VariableMap>) {
    registry.insert(FunctionEntry::new("val", move |args| {
        lookup_value(&values, args)
    }));
    registry.insert(FunctionEntry::new("toYAML", |args| match args {
        [value] => to_yaml(value).map(JsonValue::String),
        _ => Err(arity_error("toYAML", "exactly one value", args.len())),
    }));
    registry.insert(FunctionEntry::new("ENDL", |args| {
        if args.is_empty() {
            Ok(JsonValue::String("\n".to_string()))
        } else {
            Err(arity_error("ENDL", "no arguments", args.len()))
        }
    }));
    registry.insert(k8s_field_entry("K8sAnnotation"));
    registry.insert(k8s_field_entry("K8sLabel"));
    registry.insert_helper("include", Box::new(IncludeFunction::default()));
}

fn arity_error(function: &'static str, expected: &str, given: usize) -> TemplateError {
    TemplateError::invalid_argument(
        function,
        format!("expected {}, got {} arguments", expected, given),
    )
}

/// `val KEY [DEFAULT]`: the variable when set, otherwise the default.
pub fn lookup_value(values: &VariableMap, args: &[&JsonValue]) -> Result<JsonValue> {
    let key = match args {
        [key] | [key, _] => key
            .as_str()
            .ok_or_else(|| TemplateError::invalid_argument("val", "key must be a string"))?,
        _ => return Err(arity_error("val", "a key and an optional default", args.len())),
    };

    if let Some(value) = values.get(key) {
        return Ok(JsonValue::String(value.clone()));
    }

    match args.get(1) {
        Some(default) => Ok((*default).clone()),
        None => Err(TemplateError::MissingValueNoDefault {
            key: key.to_string(),
        }),
    }
}

/// YAML text of any template value.
pub fn to_yaml(value: &JsonValue) -> Result<String> {
    serde_yaml::to_string(value).map_err(|e| TemplateError::Serialization(e.to_string()))
}

/// `key: "value"` unless `condition` is the zero value of its own type.
pub fn k8s_field(condition: &JsonValue, key: &str, value: &JsonValue) -> String {
    if is_zero(condition) {
        String::new()
    } else {
        format!("{}: \"{}\"", key, stringify(value))
    }
}

fn k8s_field_entry(name: &'static str) -> FunctionEntry {
    FunctionEntry::new(name, move |args| match args {
        [condition, key, value] => {
            let key = key
                .as_str()
                .ok_or_else(|| TemplateError::invalid_argument(name, "key must be a string"))?;
            Ok(JsonValue::String(k8s_field(condition, key, value)))
        }
        _ => Err(arity_error(name, "condition, key and value", args.len())),
    })
}

thread_local! {
    // A render and all of its nested includes run on one thread, so the nesting
    // depth is tracked per thread rather than per helper instance.
    static INCLUDE_DEPTH: Cell<usize> = Cell::new(0);
}

struct DepthGuard;

impl Drop for DepthGuard {
    fn drop(&mut self) {
        INCLUDE_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

fn include_depth() -> usize {
    INCLUDE_DEPTH.with(Cell::get)
}

fn enter_include(name: &str) -> Result<DepthGuard> {
    let depth = INCLUDE_DEPTH.with(|depth| {
        let next = depth.get() + 1;
        depth.set(next);
        next
    });
    let guard = DepthGuard;
    if depth > MAX_INCLUDE_DEPTH {
        return Err(TemplateError::IncludeDepthExceeded {
            name: name.to_string(),
            limit: MAX_INCLUDE_DEPTH,
        });
    }
    Ok(guard)
}

/// `include NAME DATA`: render a registered template or a visible inline partial to a string.
#[derive(Default)]
pub struct IncludeFunction;

impl HelperDef for IncludeFunction {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'reg, 'rc>,
        r: &'reg Handlebars<'reg>,
        _: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
    ) -> std::result::Result<ScopedJson<'reg, 'rc>, RenderError> {
        if h.params().len() != 2 {
            return Err(into_render_error(arity_error(
                "include",
                "a template name and data",
                h.params().len(),
            )));
        }
        let name = h
            .param(0)
            .and_then(|p| p.value().as_str())
            .ok_or_else(|| {
                into_render_error(TemplateError::invalid_argument(
                    "include",
                    "template name must be a string",
                ))
            })?;
        let data = h
            .param(1)
            .map(|p| p.value().clone())
            .unwrap_or(JsonValue::Null);
        let from = rc
            .get_current_template_name()
            .cloned()
            .unwrap_or_else(|| "<inline>".to_string());

        let _guard = enter_include(name).map_err(into_render_error)?;
        debug!("Including template {} from {}", name, from);

        let rendered = if r.has_template(name) {
            r.render(name, &data)
        } else if let Some(partial) = rc.get_partial(name) {
            // Inline partials live in the render context, so render them from a private copy.
            let mut scoped = r.clone();
            scoped.register_template(name, partial.clone());
            scoped.render(name, &data)
        } else {
            return Err(into_render_error(TemplateError::TemplateNotFound {
                name: name.to_string(),
                from,
            }));
        };

        rendered
            .map(|text| ScopedJson::Derived(JsonValue::String(text)))
            .map_err(|e| {
                RenderError::from_error(
                    &format!(
                        "error calling include: template '{}' included from '{}': {}",
                        name, from, e
                    ),
                    e,
                )
            })
    }
}
