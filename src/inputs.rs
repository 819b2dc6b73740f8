use swc_core::{
    common::DUMMY_SP,
    ecma::ast::*,
};

use crate::error::{LoaderError, Result};

// -----------------------------------------------------------------------------
// Input values
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ReportValue {
    Str(String),
    Num(f64),
}

impl ReportValue {
    /// Strings and numbers are kept, every other JSON value is dropped.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(Self::Str(s.clone())),
            serde_json::Value::Number(n) => n.as_f64().map(Self::Num),
            _ => None,
        }
    }

    /// Finite numbers become `Num`, anything else is taken verbatim.
    pub fn parse_loose(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Self::Num(n),
            _ => Self::Str(raw.to_string()),
        }
    }

    fn to_attr_value(&self) -> JSXAttrValue {
        match self {
            Self::Str(s) => JSXAttrValue::Lit(Lit::Str(Str {
                span: DUMMY_SP,
                value: s.clone().into(),
                raw: None,
            })),
            Self::Num(n) => JSXAttrValue::JSXExprContainer(JSXExprContainer {
                span: DUMMY_SP,
                expr: JSXExpr::Expr(Box::new(number_or_null(*n))),
            }),
        }
    }
}

impl From<&str> for ReportValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ReportValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<f64> for ReportValue {
    fn from(value: f64) -> Self {
        Self::Num(value)
    }
}

impl From<i64> for ReportValue {
    fn from(value: i64) -> Self {
        Self::Num(value as f64)
    }
}

// A falsy number (0, -0, NaN) is written as `null`, not as a numeric literal.
fn number_or_null(value: f64) -> Expr {
    if value == 0.0 || value.is_nan() {
        Expr::Lit(Lit::Null(Null { span: DUMMY_SP }))
    } else {
        Expr::Lit(Lit::Num(Number {
            span: DUMMY_SP,
            value,
            raw: None,
        }))
    }
}

// -----------------------------------------------------------------------------
// Ordered inputs
// -----------------------------------------------------------------------------

/// Attribute name/value pairs, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportInputs {
    entries: Vec<(String, ReportValue)>,
}

impl ReportInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Object semantics: re-inserting a key replaces its value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ReportValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ReportValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ReportValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_json_map(map: &serde_json::Map<String, serde_json::Value>) -> Self {
        let mut inputs = Self::new();
        for (key, value) in map {
            match ReportValue::from_json(value) {
                Some(v) => inputs.insert(key.clone(), v),
                None => tracing::trace!(key = %key, "dropping non string/number input"),
            }
        }
        inputs
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        match serde_json::from_str::<serde_json::Value>(raw)? {
            serde_json::Value::Object(map) => Ok(Self::from_json_map(&map)),
            other => Err(LoaderError::invalid(format!(
                "inputs must be a JSON object, got {other}"
            ))),
        }
    }

    /// One JSX attribute per entry, in entry order.
    pub fn to_jsx_attrs(&self) -> Vec<JSXAttrOrSpread> {
        self.entries
            .iter()
            .map(|(key, value)| {
                JSXAttrOrSpread::JSXAttr(JSXAttr {
                    span: DUMMY_SP,
                    name: JSXAttrName::Ident(IdentName::new(key.clone().into(), DUMMY_SP)),
                    value: Some(value.to_attr_value()),
                })
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<ReportValue>> FromIterator<(K, V)> for ReportInputs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut inputs = Self::new();
        for (k, v) in iter {
            inputs.insert(k, v);
        }
        inputs
    }
}
