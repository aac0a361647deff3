//! Parameter values and concrete parameter assignments.

use serde::{Deserialize, Serialize};

/// A concrete hyperparameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Float(f64),
    Int(i64),
    Json(serde_json::Value),
}

impl ParamValue {
    /// Integer view; `None` for non-integer values.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Float view; integers widen losslessly enough for hyperparameters.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Json(serde_json::Value::String(s)) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Json(v) => write!(f, "{v}"),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Json(serde_json::Value::String(v.to_string()))
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Json(serde_json::Value::Bool(v))
    }
}

/// One assignment of a single value to every parameter in a grid.
///
/// Entries stay in grid declaration order, so two `ParamSet`s produced
/// from the same grid are directly comparable and render identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ParamSet {
    entries: Vec<(String, ParamValue)>,
}

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a (name, value) pair. Callers are expected to keep names
    /// unique; the grid validator enforces this upstream.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Display for ParamSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (name, value) in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{name}={value}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_view_widens_ints() {
        assert_eq!(ParamValue::Int(3).as_float(), Some(3.0));
        assert_eq!(ParamValue::Float(0.1).as_float(), Some(0.1));
        assert_eq!(ParamValue::from("adam").as_float(), None);
    }

    #[test]
    fn int_view_rejects_floats() {
        assert_eq!(ParamValue::Int(3).as_int(), Some(3));
        assert_eq!(ParamValue::Float(3.0).as_int(), None);
    }

    #[test]
    fn param_set_preserves_declaration_order() {
        let mut params = ParamSet::new();
        params.insert("learning_rate", 0.1);
        params.insert("max_leaf_nodes", 30i64);

        let names: Vec<&str> = params.names().collect();
        assert_eq!(names, vec!["learning_rate", "max_leaf_nodes"]);
        assert_eq!(params.get("max_leaf_nodes"), Some(&ParamValue::Int(30)));
        assert!(params.get("missing").is_none());
    }

    #[test]
    fn param_set_display_is_compact() {
        let mut params = ParamSet::new();
        params.insert("k", 5i64);
        params.insert("power", 2.0);
        assert_eq!(params.to_string(), "k=5, power=2");
    }

    #[test]
    fn param_value_serializes_untagged() {
        let json = serde_json::to_string(&ParamValue::Float(0.5)).unwrap();
        assert_eq!(json, "0.5");
        let json = serde_json::to_string(&ParamValue::from("uniform")).unwrap();
        assert_eq!(json, "\"uniform\"");
    }
}
