//! Builders for source documents.
//!
//! Documents are produced as raw JSON so tests exercise the same lenient
//! decoding path as production data.

#![allow(dead_code)]

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};

fn iso(at: DateTime<Utc>) -> Value {
    Value::String(at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Builder for `users` documents.
#[derive(Default)]
pub struct UserDoc {
    fields: Map<String, Value>,
}

impl UserDoc {
    pub fn new() -> Self {
        let mut fields = Map::new();
        fields.insert("email".into(), json!("viewer@example.com"));
        Self { fields }
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.fields.insert("createdAt".into(), iso(at));
        self
    }

    /// Firestore export form: `{_seconds, _nanoseconds}`.
    pub fn created_at_firestore(mut self, at: DateTime<Utc>) -> Self {
        self.fields.insert(
            "createdAt".into(),
            json!({
                "_seconds": at.timestamp(),
                "_nanoseconds": at.timestamp_subsec_nanos(),
            }),
        );
        self
    }

    pub fn last_login(mut self, at: DateTime<Utc>) -> Self {
        self.fields.insert("lastLogin".into(), iso(at));
        self
    }

    pub fn subscription(mut self, status: &str) -> Self {
        self.fields
            .insert("subscription".into(), json!({ "status": status, "plan": "monthly" }));
        self
    }

    pub fn raw(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    pub fn build(self) -> Value {
        Value::Object(self.fields)
    }
}

/// Builder for `transactions` documents.
pub struct TransactionDoc {
    fields: Map<String, Value>,
}

impl TransactionDoc {
    pub fn completed(amount: f64, kind: &str) -> Self {
        Self::with_status("completed").amount(amount).kind(kind)
    }

    pub fn failed(kind: &str) -> Self {
        Self::with_status("failed").amount(10.0).kind(kind)
    }

    pub fn with_status(status: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("status".into(), json!(status));
        fields.insert("currency".into(), json!("INR"));
        Self { fields }
    }

    pub fn amount(mut self, amount: f64) -> Self {
        self.fields.insert("amount".into(), json!(amount));
        self
    }

    pub fn kind(mut self, kind: &str) -> Self {
        self.fields.insert("type".into(), json!(kind));
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.fields.insert("createdAt".into(), iso(at));
        self
    }

    pub fn without(mut self, key: &str) -> Self {
        self.fields.remove(key);
        self
    }

    pub fn build(self) -> Value {
        Value::Object(self.fields)
    }
}

/// Builder for catalog documents (movies, series, short films, events).
#[derive(Default)]
pub struct ContentDoc {
    fields: Map<String, Value>,
}

impl ContentDoc {
    pub fn new(title: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("title".into(), json!(title));
        Self { fields }
    }

    pub fn views(mut self, views: f64) -> Self {
        self.fields.insert("views".into(), json!(views));
        self
    }

    pub fn rating(mut self, rating: f64) -> Self {
        self.fields.insert("rating".into(), json!(rating));
        self
    }

    pub fn build(self) -> Value {
        Value::Object(self.fields)
    }
}
