// ABOUTME: Encoders from host values to the string form written into the registry.
// ABOUTME: Covers xrdb-style booleans, decimal integers, printed objects, and window geometry.

use regprefs_host::{Host, SourceError, Value};

pub const ON: &str = "on";
pub const OFF: &str = "off";

pub fn encode_bool(v: bool) -> &'static str {
    if v { ON } else { OFF }
}

/// Inverse of `encode_bool` for the restore side.
pub fn decode_bool(s: &str) -> Option<bool> {
    match s {
        ON => Some(true),
        OFF => Some(false),
        _ => None,
    }
}

/// Decimal text for integers; any other shape has no encoding.
pub fn encode_int(v: &Value) -> Option<String> {
    v.as_int().map(|i| i.to_string())
}

/// Printed form of any non-nil value.
pub fn encode_object(v: &Value) -> Option<String> {
    if v.is_nil() {
        return None;
    }
    Some(print_object(v))
}

/// Render a value so a Lisp reader gets the same value back.
pub fn print_object(v: &Value) -> String {
    let mut out = String::new();
    write_object(&mut out, v);
    out
}

fn write_object(out: &mut String, v: &Value) {
    match v {
        Value::Nil | Value::Bool(false) => out.push_str("nil"),
        Value::Bool(true) => out.push('t'),
        Value::Int(i) => out.push_str(&i.to_string()),
        Value::Float(f) => out.push_str(&print_float(*f)),
        Value::Str(s) => {
            out.push('"');
            for ch in s.chars() {
                if ch == '"' || ch == '\\' {
                    out.push('\\');
                }
                out.push(ch);
            }
            out.push('"');
        }
        Value::Symbol(name) => out.push_str(name),
        Value::List(items) => {
            out.push('(');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                write_object(out, item);
            }
            out.push(')');
        }
    }
}

fn print_float(f: f64) -> String {
    if f.is_nan() {
        return "0.0e+NaN".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "1.0e+INF" } else { "-1.0e+INF" }.to_string();
    }
    let s = f.to_string();
    if s.contains('.') { s } else { format!("{s}.0") }
}

/// Current window size and position as `<w>x<h>+<left>+<top>`.
pub fn encode_geometry(host: &dyn Host) -> Result<String, SourceError> {
    let width = dimension(host, "width")?;
    let height = dimension(host, "height")?;
    let left = dimension(host, "left")?;
    let top = dimension(host, "top")?;
    Ok(format!("{width}x{height}+{left}+{top}"))
}

/// A non-negative integer frame parameter. Offsets may also arrive as `(+ N)`.
///
/// Negative offsets (a window on a monitor left of or above the primary one) are
/// rejected: the stored geometry is always `WxH+L+T` with unsigned fields, so such
/// a window gets no geometry entry and restores at the default position.
fn dimension(host: &dyn Host, name: &str) -> Result<u64, SourceError> {
    let value = host.frame_parameter(name)?;
    let n = match &value {
        Value::Int(n) => Some(*n),
        Value::List(items) => match items.as_slice() {
            [Value::Symbol(sign), Value::Int(n)] if sign == "+" => Some(*n),
            _ => None,
        },
        _ => None,
    };
    n.and_then(|n| u64::try_from(n).ok())
        .ok_or_else(|| SourceError::Failed(format!("frame parameter {name} is not a position: {value:?}")))
}
