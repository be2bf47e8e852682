use chrono::NaiveDate;

/// A scalar cell value. Upstream data quality is inconsistent, so the typed
/// accessors are lenient: anything that fails to parse reads as zero or as
/// a missing date rather than an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Null,
}

impl Value {
    pub fn from_json(value: &serde_json::Value) -> Value {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => Value::Text(s.clone()),
            serde_json::Value::Bool(b) => Value::Text(b.to_string()),
            other => Value::Text(other.to_string()),
        }
    }

    /// Numeric reading; missing or unparseable values are zero.
    pub fn number(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            Value::Text(s) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Date reading. Text values are accepted as `YYYY-MM-DD`, with any
    /// trailing time component ignored.
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::Text(s) => {
                let head = s.get(..10).unwrap_or(s);
                NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
            }
            _ => None,
        }
    }

    /// Plain string rendering: null is empty, numbers drop a trailing ".0".
    pub fn raw(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::Null => String::new(),
        }
    }
}

/// An ordered mapping from column key to value. Column order follows the
/// source payload; no fixed schema is enforced at this layer.
#[derive(Debug, Clone, Default)]
pub struct Row {
    values: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Row {
        Row::default()
    }

    pub fn from_pairs(pairs: Vec<(String, Value)>) -> Row {
        let mut row = Row::new();
        for (key, value) in pairs {
            row.set(key, value);
        }
        row
    }

    pub fn from_json_object(object: &serde_json::Map<String, serde_json::Value>) -> Row {
        Row {
            values: object
                .iter()
                .map(|(k, v)| (k.clone(), Value::from_json(v)))
                .collect(),
        }
    }

    /// Set a column, replacing an existing value for the same key.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if let Some(existing) = self.values.iter_mut().find(|(k, _)| *k == key) {
            existing.1 = value;
        } else {
            self.values.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn number(&self, key: &str) -> f64 {
        self.get(key).map(Value::number).unwrap_or(0.0)
    }

    pub fn date(&self, key: &str) -> Option<NaiveDate> {
        self.get(key).and_then(Value::date)
    }

    /// Text reading for labels; missing columns read as empty.
    pub fn text(&self, key: &str) -> &str {
        match self.get(key) {
            Some(Value::Text(s)) => s.as_str(),
            _ => "",
        }
    }

    /// Display-string reading for any column, used for key building.
    pub fn raw(&self, key: &str) -> String {
        self.get(key).map(Value::raw).unwrap_or_default()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(k, _)| k.as_str())
    }
}
