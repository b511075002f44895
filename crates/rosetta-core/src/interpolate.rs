//! `{{ path }}` placeholder substitution with parameter accounting.

use crate::Params;
use crate::error::TranslateError;
use serde_json::Value;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const PATH_SEPARATOR: char = '.';

/// The result of [`interpolate`].
#[derive(Clone, Debug, PartialEq)]
pub struct Interpolated {
    pub text: String,
    /// The parameters the template consumed, nested like the supplied ones.
    pub used: Params,
}

/// Replaces every `{{ path }}` placeholder with the parameter at the dotted
/// `path`.
///
/// An unterminated `{{` is kept as literal text.
pub fn interpolate(template: &str, params: &Params) -> Result<Interpolated, TranslateError> {
    let mut text = String::with_capacity(template.len());
    let mut used = Params::new();
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        let inner = &rest[start + OPEN.len()..];
        let Some(end) = inner.find(CLOSE) else {
            break;
        };

        text.push_str(&rest[..start]);

        let path = inner[..end].trim();
        let value = lookup(params, path)?;
        push_value(&mut text, value);
        mark_used(&mut used, path, value);

        rest = &inner[end + CLOSE.len()..];
    }
    text.push_str(rest);

    Ok(Interpolated { text, used })
}

/// Returns the dotted paths of every supplied parameter missing from `used`.
pub fn unused_parameters(params: &Params, used: &Params) -> Vec<String> {
    let mut unused = Vec::new();
    collect_unused(params, used, "", &mut unused);
    unused
}

fn collect_unused(params: &Params, used: &Params, prefix: &str, unused: &mut Vec<String>) {
    for (name, value) in params {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}{PATH_SEPARATOR}{name}")
        };

        match (value, used.get(name)) {
            (_, None) => unused.push(path),
            (Value::Object(nested), Some(Value::Object(nested_used))) => {
                collect_unused(nested, nested_used, &path, unused);
            },
            _ => {},
        }
    }
}

fn lookup<'a>(params: &'a Params, path: &str) -> Result<&'a Value, TranslateError> {
    let missing = || TranslateError::MissingParameter {
        path: path.to_owned(),
    };

    let mut segments = path.split(PATH_SEPARATOR);
    let mut value = segments
        .next()
        .and_then(|first| params.get(first))
        .ok_or_else(missing)?;

    for segment in segments {
        value = value
            .as_object()
            .and_then(|object| object.get(segment))
            .ok_or_else(missing)?;
    }

    match value {
        Value::String(_) | Value::Number(_) => Ok(value),
        Value::Null => Err(missing()),
        other => Err(TranslateError::InvalidParameterType {
            path: path.to_owned(),
            found: json_type_name(other),
        }),
    }
}

fn push_value(text: &mut String, value: &Value) {
    match value {
        Value::String(string) => text.push_str(string),
        Value::Number(number) => text.push_str(&format_number(number)),
        _ => {},
    }
}

/// Integral numbers print without a fractional part, `5.0` renders as `5`.
fn format_number(number: &serde_json::Number) -> String {
    if number.is_f64()
        && let Some(float) = number.as_f64()
    {
        return float.to_string();
    }
    number.to_string()
}

fn mark_used(used: &mut Params, path: &str, value: &Value) {
    let mut segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
    let Some(leaf) = segments.pop() else {
        return;
    };

    let mut node = used;
    for segment in segments {
        let entry = node
            .entry(segment)
            .or_insert_with(|| Value::Object(Params::new()));
        let Value::Object(child) = entry else {
            return;
        };
        node = child;
    }
    node.insert(leaf.to_owned(), value.clone());
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
