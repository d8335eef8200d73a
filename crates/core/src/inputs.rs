use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Input values
// ---------------------------------------------------------------------------

/// One decoded `contractInputsValues` entry.
///
/// Transaction-builder files encode array parameters as a stringified list
/// (`"[0xabc, 0xdef]"`). Those are decoded here, once, so classifiers only
/// ever see structured lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputValue {
    Scalar(String),
    List(Vec<String>),
}

impl InputValue {
    /// Decode a raw JSON value. `null` decodes to nothing.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(decode_string(s)),
            Value::Bool(b) => Some(Self::Scalar(b.to_string())),
            Value::Number(n) => Some(Self::Scalar(n.to_string())),
            Value::Array(items) => Some(Self::List(items.iter().map(scalar_text).collect())),
            Value::Object(_) => Some(Self::Scalar(value.to_string())),
        }
    }

    /// The value as a single string, if it is a scalar.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            Self::List(_) => None,
        }
    }

    /// Every element: a scalar yields itself, a list yields its items.
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Scalar(s) => vec![s.as_str()],
            Self::List(items) => items.iter().map(String::as_str).collect(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Scalar(s) => Value::String(s.clone()),
            Self::List(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
        }
    }
}

impl Serialize for InputValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Scalar(s) => serializer.serialize_str(s),
            Self::List(items) => items.serialize(serializer),
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn decode_string(raw: &str) -> InputValue {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix('[').and_then(|r| r.strip_suffix(']')) else {
        return InputValue::Scalar(raw.to_string());
    };

    // Properly quoted lists parse as JSON; bare `[0xabc, 0xdef]` does not.
    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(trimmed) {
        return InputValue::List(items.iter().map(scalar_text).collect());
    }

    let items = inner
        .split(',')
        .map(|item| item.trim().trim_matches('"').trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();
    InputValue::List(items)
}

// ---------------------------------------------------------------------------
// Contract inputs
// ---------------------------------------------------------------------------

/// Ordered `name -> value` parameters of a transaction-builder call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractInputs {
    entries: Vec<(String, InputValue)>,
}

impl ContractInputs {
    /// Decode a `contractInputsValues` object.
    ///
    /// Anything that is not a non-empty object is treated as absent.
    pub fn from_json(value: &Value) -> Option<Self> {
        let Value::Object(map) = value else {
            return None;
        };
        let inputs: Self = map
            .iter()
            .filter_map(|(name, raw)| InputValue::from_json(raw).map(|v| (name.clone(), v)))
            .collect();
        if inputs.is_empty() {
            None
        } else {
            Some(inputs)
        }
    }

    pub fn get(&self, name: &str) -> Option<&InputValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// A non-empty scalar parameter.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(InputValue::as_scalar).filter(|s| !s.is_empty())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &InputValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, InputValue)> for ContractInputs {
    fn from_iter<I: IntoIterator<Item = (String, InputValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Serialize for ContractInputs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stringified_bare_list() {
        let v = InputValue::from_json(&json!("[0xabc, 0xdef]")).unwrap();
        assert_eq!(v, InputValue::List(vec!["0xabc".into(), "0xdef".into()]));
    }

    #[test]
    fn stringified_quoted_list() {
        let v = InputValue::from_json(&json!("[\"0xabc\",\"0xdef\"]")).unwrap();
        assert_eq!(v.values(), vec!["0xabc", "0xdef"]);
    }

    #[test]
    fn empty_stringified_list() {
        let v = InputValue::from_json(&json!("[]")).unwrap();
        assert_eq!(v, InputValue::List(vec![]));
    }

    #[test]
    fn json_array_and_scalars() {
        assert_eq!(
            InputValue::from_json(&json!(["a", 1])).unwrap(),
            InputValue::List(vec!["a".into(), "1".into()])
        );
        assert_eq!(InputValue::from_json(&json!(true)).unwrap().as_scalar(), Some("true"));
        assert_eq!(InputValue::from_json(&json!(42)).unwrap().as_scalar(), Some("42"));
        assert!(InputValue::from_json(&Value::Null).is_none());
    }

    #[test]
    fn inputs_keep_order_and_skip_nulls() {
        let inputs = ContractInputs::from_json(&json!({
            "target": "0x1",
            "skip": null,
            "data": "0xdead",
        }))
        .unwrap();
        let names: Vec<_> = inputs.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["target", "data"]);
        assert_eq!(inputs.get_str("data"), Some("0xdead"));
        assert!(!inputs.contains("skip"));
    }

    #[test]
    fn malformed_inputs_are_absent() {
        assert!(ContractInputs::from_json(&json!({})).is_none());
        assert!(ContractInputs::from_json(&json!("nope")).is_none());
        assert!(ContractInputs::from_json(&json!([1, 2])).is_none());
    }

    #[test]
    fn empty_scalar_is_not_a_value() {
        let inputs = ContractInputs::from_json(&json!({"gaugeType": ""})).unwrap();
        assert_eq!(inputs.get_str("gaugeType"), None);
    }

    #[test]
    fn serializes_as_map() {
        let inputs = ContractInputs::from_json(&json!({"roles": "[0x1, 0x2]", "account": "0x3"})).unwrap();
        let out = serde_json::to_value(&inputs).unwrap();
        assert_eq!(out, json!({"roles": ["0x1", "0x2"], "account": "0x3"}));
    }
}
