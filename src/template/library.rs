// ABOUTME: General-purpose helper library available to every template
// ABOUTME: String, encoding, JSON, and time helpers using the familiar sprig argument order

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use serde_json::Value as JsonValue;
use std::env;
use std::fmt::Write as _;
use uuid::Uuid;

use super::error::{Result, TemplateError};
use super::functions::{FunctionEntry, FunctionRegistry};
use super::value::{is_empty, stringify};

/// Register every library helper. Custom functions registered later override these.
pub(crate) fn install(registry: &mut FunctionRegistry) {
    registry.insert(FunctionEntry::new("upper", upper));
    registry.insert(FunctionEntry::new("lower", lower));
    registry.insert(FunctionEntry::new("trim", trim));
    registry.insert(FunctionEntry::new("quote", quote));
    registry.insert(FunctionEntry::new("squote", squote));
    registry.insert(FunctionEntry::new("indent", indent));
    registry.insert(FunctionEntry::new("nindent", nindent));
    registry.insert(FunctionEntry::new("replace", replace));
    registry.insert(FunctionEntry::new("join", join));
    registry.insert(FunctionEntry::new("default", default));
    registry.insert(FunctionEntry::new("required", required));
    registry.insert(FunctionEntry::new("b64enc", base64_encode));
    registry.insert(FunctionEntry::new("b64dec", base64_decode));
    registry.insert(FunctionEntry::new("toJson", to_json));
    registry.insert(FunctionEntry::new("toPrettyJson", to_pretty_json));
    registry.insert(FunctionEntry::new("uuidv4", uuid_v4));
    registry.insert(FunctionEntry::new("now", now));
    registry.insert(FunctionEntry::new("env", env_var));
}

fn expect_args<'a, const N: usize>(
    function: &'static str,
    args: &[&'a JsonValue],
) -> Result<[&'a JsonValue; N]> {
    <[&JsonValue; N]>::try_from(args).map_err(|_| {
        TemplateError::invalid_argument(
            function,
            format!("expected {} arguments, got {}", N, args.len()),
        )
    })
}

fn text(value: String) -> Result<JsonValue> {
    Ok(JsonValue::String(value))
}

fn upper(args: &[&JsonValue]) -> Result<JsonValue> {
    let [input] = expect_args::<1>("upper", args)?;
    text(stringify(input).to_uppercase())
}

fn lower(args: &[&JsonValue]) -> Result<JsonValue> {
    let [input] = expect_args::<1>("lower", args)?;
    text(stringify(input).to_lowercase())
}

fn trim(args: &[&JsonValue]) -> Result<JsonValue> {
    let [input] = expect_args::<1>("trim", args)?;
    text(stringify(input).trim().to_string())
}

fn quote(args: &[&JsonValue]) -> Result<JsonValue> {
    let [input] = expect_args::<1>("quote", args)?;
    text(serde_json::to_string(&stringify(input))?)
}

fn squote(args: &[&JsonValue]) -> Result<JsonValue> {
    let [input] = expect_args::<1>("squote", args)?;
    text(format!("'{}'", stringify(input)))
}

fn width(function: &'static str, value: &JsonValue) -> Result<usize> {
    let parsed = match value {
        JsonValue::Number(n) => n.as_u64(),
        JsonValue::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed
        .and_then(|w| usize::try_from(w).ok())
        .ok_or_else(|| TemplateError::invalid_argument(function, "width must be a non-negative integer"))
}

fn indent_lines(spaces: usize, input: &str) -> String {
    let pad = " ".repeat(spaces);
    format!("{}{}", pad, input.replace('\n', &format!("\n{}", pad)))
}

/// `indent N TEXT`: prefix every line with N spaces.
fn indent(args: &[&JsonValue]) -> Result<JsonValue> {
    let [spaces, input] = expect_args::<2>("indent", args)?;
    text(indent_lines(width("indent", spaces)?, &stringify(input)))
}

/// `nindent N TEXT`: like indent, with a leading newline.
fn nindent(args: &[&JsonValue]) -> Result<JsonValue> {
    let [spaces, input] = expect_args::<2>("nindent", args)?;
    text(format!(
        "\n{}",
        indent_lines(width("nindent", spaces)?, &stringify(input))
    ))
}

/// `replace OLD NEW TEXT`
fn replace(args: &[&JsonValue]) -> Result<JsonValue> {
    let [old, new, input] = expect_args::<3>("replace", args)?;
    text(stringify(input).replace(&stringify(old), &stringify(new)))
}

/// `join SEP LIST`
fn join(args: &[&JsonValue]) -> Result<JsonValue> {
    let [separator, list] = expect_args::<2>("join", args)?;
    let items = list
        .as_array()
        .ok_or_else(|| TemplateError::invalid_argument("join", "second argument must be a list"))?;
    let joined = items
        .iter()
        .map(stringify)
        .collect::<Vec<_>>()
        .join(&stringify(separator));
    text(joined)
}

/// `default DEFAULT VALUE`: VALUE unless it is empty.
fn default(args: &[&JsonValue]) -> Result<JsonValue> {
    match args {
        [fallback] => Ok((*fallback).clone()),
        [fallback, value] if is_empty(value) => Ok((*fallback).clone()),
        [_, value] => Ok((*value).clone()),
        _ => Err(TemplateError::invalid_argument(
            "default",
            format!("expected 1 or 2 arguments, got {}", args.len()),
        )),
    }
}

/// `required MESSAGE VALUE`: VALUE, or an error carrying MESSAGE when it is empty.
fn required(args: &[&JsonValue]) -> Result<JsonValue> {
    let [message, value] = expect_args::<2>("required", args)?;
    if is_empty(value) {
        return Err(TemplateError::helper_failed("required", stringify(message)));
    }
    Ok(value.clone())
}

fn base64_encode(args: &[&JsonValue]) -> Result<JsonValue> {
    let [input] = expect_args::<1>("b64enc", args)?;
    text(BASE64.encode(stringify(input).as_bytes()))
}

fn base64_decode(args: &[&JsonValue]) -> Result<JsonValue> {
    let [input] = expect_args::<1>("b64dec", args)?;
    let decoded_bytes = BASE64
        .decode(stringify(input))
        .map_err(|e| TemplateError::helper_failed("b64dec", format!("Base64 decode error: {}", e)))?;
    let decoded = String::from_utf8(decoded_bytes)
        .map_err(|e| TemplateError::helper_failed("b64dec", format!("UTF-8 decode error: {}", e)))?;
    text(decoded)
}

fn to_json(args: &[&JsonValue]) -> Result<JsonValue> {
    let [value] = expect_args::<1>("toJson", args)?;
    text(serde_json::to_string(value)?)
}

fn to_pretty_json(args: &[&JsonValue]) -> Result<JsonValue> {
    let [value] = expect_args::<1>("toPrettyJson", args)?;
    text(serde_json::to_string_pretty(value)?)
}

fn uuid_v4(args: &[&JsonValue]) -> Result<JsonValue> {
    expect_args::<0>("uuidv4", args)?;
    text(Uuid::new_v4().to_string())
}

/// `now [FORMAT]`: current UTC time, RFC 3339 unless a strftime format is given.
fn now(args: &[&JsonValue]) -> Result<JsonValue> {
    let now = Utc::now();
    match args {
        [] => text(now.to_rfc3339()),
        [format] => {
            let mut formatted = String::new();
            write!(formatted, "{}", now.format(&stringify(format))).map_err(|_| {
                TemplateError::helper_failed("now", format!("invalid time format {}", format))
            })?;
            text(formatted)
        }
        _ => Err(TemplateError::invalid_argument(
            "now",
            format!("expected at most 1 argument, got {}", args.len()),
        )),
    }
}

/// `env NAME`: process environment variable, empty when unset.
fn env_var(args: &[&JsonValue]) -> Result<JsonValue> {
    let [name] = expect_args::<1>("env", args)?;
    text(env::var(stringify(name)).unwrap_or_default())
}
