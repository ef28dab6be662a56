//! Attribute values and the coercion rules applied when writing them.
//!
//! Two rules exist. The *static* rule is used for plain attribute values and
//! for the first evaluation of a bound attribute: `true` becomes the string
//! `"true"`, while `false`, `Null` and `Undefined` omit the attribute. The
//! *tick* rule is used by the reconciliation loop: `true` and `false` are both
//! written as literal strings and only `Null`/`Undefined` remove the attribute.

use std::fmt;

/// A value an attribute can take.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AttrValue {
    Bool(bool),
    Null,
    #[default]
    Undefined,
    Text(String),
}

/// The write a coercion rule asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrWrite {
    Set(String),
    Remove,
}

impl AttrValue {
    /// Coercion for static values and initial binding application.
    pub fn coerce_static(&self) -> AttrWrite {
        match self {
            AttrValue::Bool(true) => AttrWrite::Set("true".to_owned()),
            AttrValue::Bool(false) | AttrValue::Null | AttrValue::Undefined => AttrWrite::Remove,
            AttrValue::Text(s) => AttrWrite::Set(s.clone()),
        }
    }

    /// Coercion used when a tick observes a changed value.
    pub fn coerce_tick(&self) -> AttrWrite {
        match self {
            AttrValue::Bool(b) => AttrWrite::Set(b.to_string()),
            AttrValue::Null | AttrValue::Undefined => AttrWrite::Remove,
            AttrValue::Text(s) => AttrWrite::Set(s.clone()),
        }
    }

    /// String form, as a text child would render it.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, AttrValue::Null | AttrValue::Undefined)
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(b) => write!(f, "{b}"),
            AttrValue::Null => f.write_str("null"),
            AttrValue::Undefined => f.write_str("undefined"),
            AttrValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<&String> for AttrValue {
    fn from(value: &String) -> Self {
        AttrValue::Text(value.clone())
    }
}

impl From<char> for AttrValue {
    fn from(value: char) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Text(format_number(value))
    }
}

impl From<f32> for AttrValue {
    fn from(value: f32) -> Self {
        AttrValue::Text(format_number(f64::from(value)))
    }
}

macro_rules! attr_value_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for AttrValue {
                fn from(value: $t) -> Self {
                    AttrValue::Text(value.to_string())
                }
            }
        )*
    };
}

attr_value_from_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(AttrValue::Null, Into::into)
    }
}

/// Format a float the way a script runtime stringifies numbers: integral
/// values print without a fractional part.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if value == 0.0 {
        return "0".to_owned();
    }
    if value.fract() == 0.0 && value.abs() < 1e21 {
        return format!("{value:.0}");
    }
    value.to_string()
}

/// Escape a string for use inside a double-quoted attribute.
pub fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape a string for use as text content.
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn static_rule() {
        assert_eq!(
            AttrValue::Bool(true).coerce_static(),
            AttrWrite::Set("true".into())
        );
        assert_eq!(AttrValue::Bool(false).coerce_static(), AttrWrite::Remove);
        assert_eq!(AttrValue::Null.coerce_static(), AttrWrite::Remove);
        assert_eq!(AttrValue::Undefined.coerce_static(), AttrWrite::Remove);
        assert_eq!(
            AttrValue::from("x").coerce_static(),
            AttrWrite::Set("x".into())
        );
    }

    #[test]
    fn tick_rule_writes_literal_booleans() {
        assert_eq!(
            AttrValue::Bool(true).coerce_tick(),
            AttrWrite::Set("true".into())
        );
        assert_eq!(
            AttrValue::Bool(false).coerce_tick(),
            AttrWrite::Set("false".into())
        );
        assert_eq!(AttrValue::Null.coerce_tick(), AttrWrite::Remove);
        assert_eq!(AttrValue::Undefined.coerce_tick(), AttrWrite::Remove);
    }

    #[test]
    fn numbers_format_like_script_runtimes() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(AttrValue::from(42_u8), AttrValue::Text("42".into()));
    }

    #[test]
    fn option_maps_none_to_null() {
        assert_eq!(AttrValue::from(None::<&str>), AttrValue::Null);
        assert_eq!(AttrValue::from(Some("a")), AttrValue::Text("a".into()));
    }

    #[test]
    fn display() {
        assert_eq!(AttrValue::Null.to_text(), "null");
        assert_eq!(AttrValue::Undefined.to_text(), "undefined");
        assert_eq!(AttrValue::Bool(false).to_text(), "false");
    }

    #[test]
    fn escaping() {
        assert_eq!(escape_attribute(r#"a"b<c>&"#), "a&quot;b&lt;c&gt;&amp;");
        assert_eq!(escape_text(r#"a"b<c>&"#), "a\"b&lt;c&gt;&amp;");
    }
}
