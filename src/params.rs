//! Parameter filtering, path building and query serialisation.
//!
//! Endpoint calls take a loose bag of named arguments. Only the names an
//! endpoint declares are forwarded; anything else is dropped silently.

use serde_json::{Map, Value};

use crate::{Error, Result};

/// Named arguments of a call, and the filtered query/body maps built from them.
pub type Params = Map<String, Value>;

/// Keeps only the arguments whose names are in `allow`.
///
/// # Examples
///
/// ```
/// use meraki::params::filter_params;
/// use serde_json::json;
///
/// let args = json!({"perPage": 10, "color": "blue"});
/// let query = filter_params(args.as_object().unwrap(), &["perPage", "startingAfter"]);
/// assert_eq!(query.len(), 1);
/// assert_eq!(query["perPage"], 10);
/// ```
pub fn filter_params(args: &Params, allow: &[&str]) -> Params {
    args.iter()
        .filter(|(key, _)| allow.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Substitutes `{name}` placeholders in `template` with percent-encoded values.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if a placeholder has no value or is
/// unterminated.
pub fn resource_path(template: &str, path_args: &[(&str, &str)]) -> Result<String> {
    let mut path = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        path.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| Error::InvalidInput(format!("unterminated placeholder in {template}")))?;
        let name = &after[..close];
        let value = path_args
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
            .ok_or_else(|| Error::InvalidInput(format!("missing path parameter {name}")))?;
        path.push_str(&urlencoding::encode(value));
        rest = &after[close + 1..];
    }
    path.push_str(rest);

    Ok(path)
}

/// Flattens query parameters into `key=value` pairs.
///
/// Arrays become repeated `key[]` pairs, objects become `key[field]` pairs and
/// arrays of objects become `key[][field]` pairs. `null` values are omitted.
///
/// # Examples
///
/// ```
/// use meraki::params::encode_query;
/// use serde_json::json;
///
/// let params = json!({"serials": ["Q1", "Q2"]});
/// assert_eq!(
///     encode_query(params.as_object().unwrap()),
///     vec![
///         ("serials[]".to_string(), "Q1".to_string()),
///         ("serials[]".to_string(), "Q2".to_string()),
///     ]
/// );
/// ```
pub fn encode_query(params: &Params) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in params {
        match value {
            Value::Array(entries) => {
                let array_key = format!("{key}[]");
                for entry in entries {
                    match entry {
                        Value::Object(fields) => push_object(&mut pairs, &array_key, fields),
                        other => push_scalar(&mut pairs, &array_key, other),
                    }
                }
            }
            Value::Object(fields) => push_object(&mut pairs, key, fields),
            other => push_scalar(&mut pairs, key, other),
        }
    }
    pairs
}

fn push_object(pairs: &mut Vec<(String, String)>, prefix: &str, fields: &Params) {
    for (field, value) in fields {
        push_scalar(pairs, &format!("{prefix}[{field}]"), value);
    }
}

fn push_scalar(pairs: &mut Vec<(String, String)>, key: &str, value: &Value) {
    let rendered = match value {
        Value::Null => return,
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    pairs.push((key.to_string(), rendered));
}
