use std::fmt;

use serde_json::Value;

/// Canonical identity of a `(method, params)` pair.
///
/// Rendered as the compact JSON array `["<method>",[<params>...]]`. Params
/// keep the order they were supplied in; object members render sorted by
/// key regardless of how the map stores them, so two calls built from equal
/// values always produce equal keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey(String);

impl RequestKey {
    pub fn new(method: &str, params: &[Value]) -> Self {
        // Method and params live in separate array slots, so no method name
        // can collide with a different method's params.
        let mut out = String::with_capacity(method.len() + 16);
        out.push('[');
        out.push_str(&Value::from(method).to_string());
        out.push_str(",[");
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            write_canonical(param, &mut out);
        }
        out.push_str("]]");
        Self(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut members: Vec<_> = map.iter().collect();
            members.sort_unstable_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (name, member)) in members.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::from(name.as_str()).to_string());
                out.push(':');
                write_canonical(member, out);
            }
            out.push('}');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
