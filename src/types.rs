//! Domain types shared by the hub, its modules and the form layer

use std::fmt;

/// Declared type of a function parameter, drives widget choice and coercion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Bool,
    Int,
    Float,
    Str,
}

impl ParamKind {
    /// Map a type annotation to a kind. Unknown annotations fall back to `Str`.
    pub fn from_annotation(annotation: Option<&str>) -> Self {
        match annotation.map(str::trim) {
            Some("bool") => Self::Bool,
            Some("int") => Self::Int,
            Some("float") => Self::Float,
            _ => Self::Str,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
        }
    }
}

/// A value passed into or returned from a utility function
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    /// Ordered key/value pairs
    Map(Vec<(String, Value)>),
}

impl Value {
    #[cfg(test)]
    pub fn str(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    /// Text used when the value is substituted into a command line
    pub fn to_arg(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Str(s) => s.clone(),
            other => other.to_string(),
        }
    }

    fn fmt_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => f.write_str(&format_float(*x)),
            Self::Str(s) => write!(f, "'{s}'"),
            Self::List(items) => {
                f.write_str("[")?;
                fmt_items(items, f)?;
                f.write_str("]")
            }
            Self::Tuple(items) => {
                f.write_str("(")?;
                fmt_items(items, f)?;
                f.write_str(")")
            }
            Self::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "'{key}': ")?;
                    value.fmt_repr(f)?;
                }
                f.write_str("}")
            }
        }
    }
}

fn fmt_items(items: &[Value], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        item.fmt_repr(f)?;
    }
    Ok(())
}

/// Top-level strings print bare, nested ones quoted
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            other => other.fmt_repr(f),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

/// Floats always keep a fractional part so `212` prints as `212.0`.
/// Very large and very small magnitudes use `1e+16` / `1e-05` notation.
pub fn format_float(x: f64) -> String {
    if x.is_nan() {
        "nan".to_string()
    } else if x.is_infinite() {
        if x > 0.0 { "inf".to_string() } else { "-inf".to_string() }
    } else if x != 0.0 && (x.abs() >= 1e16 || x.abs() < 1e-4) {
        format_exponent(x)
    } else if x.fract() == 0.0 {
        format!("{x:.1}")
    } else {
        format!("{x}")
    }
}

fn format_exponent(x: f64) -> String {
    let formatted = format!("{x:e}");
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return formatted;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}

/// One declared parameter of a utility function
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
    pub default: Option<Value>,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Initial text shown in the input field
    pub fn default_text(&self) -> String {
        self.default.as_ref().map(Value::to_string).unwrap_or_default()
    }
}

impl fmt::Display for ParamSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.kind.as_str())?;
        if let Some(default) = &self.default {
            f.write_str(" = ")?;
            default.fmt_repr(f)?;
        }
        Ok(())
    }
}

/// Signature and documentation of a utility function
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSpec {
    pub name: String,
    pub doc: String,
    pub params: Vec<ParamSpec>,
}

impl FunctionSpec {
    pub fn new(name: impl Into<String>, doc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: doc.into(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    /// Human readable signature, e.g. `list_files(directory: str = '.')`
    pub fn signature(&self) -> String {
        let params: Vec<String> = self.params.iter().map(ToString::to_string).collect();
        format!("{}({})", self.name, params.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_annotation() {
        assert_eq!(ParamKind::from_annotation(Some("bool")), ParamKind::Bool);
        assert_eq!(ParamKind::from_annotation(Some("int")), ParamKind::Int);
        assert_eq!(ParamKind::from_annotation(Some(" float ")), ParamKind::Float);
        assert_eq!(ParamKind::from_annotation(Some("list")), ParamKind::Str);
        assert_eq!(ParamKind::from_annotation(None), ParamKind::Str);
    }

    #[test]
    fn test_float_display_keeps_fraction() {
        assert_eq!(Value::Float(212.0).to_string(), "212.0");
        assert_eq!(Value::Float(0.5).to_string(), "0.5");
        assert_eq!(Value::Float(-3.0).to_string(), "-3.0");
        assert_eq!(Value::Float(f64::INFINITY).to_string(), "inf");
    }

    #[test]
    fn test_float_display_exponent_range() {
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(1.234e20), "1.234e+20");
        assert_eq!(format_float(1e-5), "1e-05");
        assert_eq!(format_float(-2.5e-7), "-2.5e-07");
        assert_eq!(format_float(1e-4), "0.0001");
        assert_eq!(format_float(1e15), "1000000000000000.0");
        assert_eq!(format_float(0.0), "0.0");
    }

    #[test]
    fn test_nested_display_quotes_strings() {
        let value = Value::List(vec![Value::str("a@b.io"), Value::str("c@d.io")]);
        assert_eq!(value.to_string(), "['a@b.io', 'c@d.io']");

        let value = Value::List(vec![Value::Tuple(vec![Value::Int(3), Value::str("hit")])]);
        assert_eq!(value.to_string(), "[(3, 'hit')]");

        let value = Value::Map(vec![
            ("total".to_string(), Value::Int(2)),
            ("ok".to_string(), Value::Bool(true)),
        ]);
        assert_eq!(value.to_string(), "{'total': 2, 'ok': True}");
    }

    #[test]
    fn test_top_level_string_is_bare() {
        assert_eq!(Value::str("hello").to_string(), "hello");
    }

    #[test]
    fn test_arg_text() {
        assert_eq!(Value::Bool(true).to_arg(), "true");
        assert_eq!(Value::str("a b").to_arg(), "a b");
        assert_eq!(Value::Float(1.0).to_arg(), "1.0");
    }

    #[test]
    fn test_signature() {
        let spec = FunctionSpec::new("list_files", "")
            .param(ParamSpec::new("directory", ParamKind::Str).with_default("."))
            .param(ParamSpec::new("recursive", ParamKind::Bool).with_default(false));
        assert_eq!(spec.signature(), "list_files(directory: str = '.', recursive: bool = False)");
    }

    #[test]
    fn test_default_text() {
        assert_eq!(ParamSpec::new("x", ParamKind::Bool).with_default(true).default_text(), "True");
        assert_eq!(ParamSpec::new("x", ParamKind::Float).with_default(1.5).default_text(), "1.5");
        assert_eq!(ParamSpec::new("x", ParamKind::Str).default_text(), "");
    }
}
