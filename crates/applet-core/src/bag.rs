use serde_json::{Map, Value};

/// A daemon object as it crosses the RPC boundary: a flat property map.
///
/// Mapping functions (`LocalRepo::from_bag`, `CloneTask::from_bag`) read from
/// a bag with explicit defaults for absent keys. Bags are owned values, so the
/// daemon object is released as soon as the bag goes out of scope.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyBag {
    props: Map<String, Value>,
}

impl PropertyBag {
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(props) => Some(Self { props }),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// String property; numbers and bools are rendered, null counts as absent.
    pub fn opt_str(&self, key: &str) -> Option<String> {
        match self.props.get(key)? {
            Value::String(value) => Some(value.clone()),
            Value::Number(value) => Some(value.to_string()),
            Value::Bool(value) => Some(value.to_string()),
            _ => None,
        }
    }

    pub fn str_or_default(&self, key: &str) -> String {
        self.opt_str(key).unwrap_or_default()
    }

    pub fn int_or_default(&self, key: &str) -> i64 {
        match self.props.get(key) {
            Some(Value::Number(value)) => value
                .as_i64()
                .or_else(|| value.as_f64().map(|float| float as i64))
                .unwrap_or(0),
            Some(Value::String(value)) => value.trim().parse().unwrap_or(0),
            Some(Value::Bool(value)) => i64::from(*value),
            _ => 0,
        }
    }

    pub fn bool_or_default(&self, key: &str) -> bool {
        match self.props.get(key) {
            Some(Value::Bool(value)) => *value,
            Some(Value::Number(value)) => value.as_i64().is_some_and(|value| value != 0),
            Some(Value::String(value)) => matches!(value.trim(), "true" | "1"),
            _ => false,
        }
    }
}

impl From<Map<String, Value>> for PropertyBag {
    fn from(props: Map<String, Value>) -> Self {
        Self { props }
    }
}
