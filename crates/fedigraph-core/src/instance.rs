//! Registry records.
//!
//! The registry returns far more per instance than the crawler reads.
//! Only `name` and `users` are typed; everything else rides along in
//! `extra` so the registry cache keeps the full record.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One instance as listed by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    /// Domain name, unique across the registry.
    pub name: String,

    /// Registered user count.
    #[serde(default, deserialize_with = "users_from_number_or_string")]
    pub users: u64,

    /// Registry fields the crawler does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Instance {
    /// Creates an instance record with no extra registry fields.
    pub fn new(name: impl Into<String>, users: u64) -> Self {
        Self {
            name: name.into(),
            users,
            extra: Map::new(),
        }
    }
}

/// Body of the registry's `instances/list` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceList {
    pub instances: Vec<Instance>,
}

// The registry has shipped `users` both as a number and as a decimal string.
fn users_from_number_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_users_accepts_number_and_string() {
        let list: InstanceList = serde_json::from_value(json!({
            "instances": [
                { "name": "a.example", "users": 42 },
                { "name": "b.example", "users": "1337" },
                { "name": "c.example", "users": "lots" },
                { "name": "d.example", "users": null },
                { "name": "e.example" }
            ]
        }))
        .unwrap();

        let users: Vec<u64> = list.instances.iter().map(|i| i.users).collect();
        assert_eq!(users, vec![42, 1337, 0, 0, 0]);
    }

    #[test]
    fn test_extra_fields_survive_round_trip() {
        let raw = json!({
            "name": "a.example",
            "users": 3,
            "up": true,
            "version": "4.2.1"
        });

        let instance: Instance = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(instance.extra.get("version"), Some(&json!("4.2.1")));
        assert_eq!(serde_json::to_value(&instance).unwrap(), raw);
    }
}
