//! JSON line logging on stdout.
//!
//! Every record carries the service identity from [`LoggingConfig`], the id
//! of the request being handled (if any) and the record's key/values.

use std::future::Future;
use std::io::Write;

use chrono::{SecondsFormat, Utc};
use log::kv::{self, Key, VisitSource};
use log::Record;
use serde_json::{Map, Number, Value};

use crate::config::LoggingConfig;
use crate::{Error, Result};

tokio::task_local! {
    static REQUEST_ID: String;
}

/// Install the JSON logger as the global `log` backend.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let service = config.service.clone();
    let env = config.env.clone();
    let version = config.version.clone();

    env_logger::Builder::new()
        .filter_level(config.level_filter())
        .target(env_logger::Target::Stdout)
        .format(move |buf, record| {
            let line = format_record(record, &service, &env, &version, current_request_id());
            writeln!(buf, "{}", line)
        })
        .try_init()
        .map_err(|e| Error::logging(format!("Failed to initialize logger: {}", e)))
}

/// Run `fut` with `request_id` visible to every log record it emits.
pub async fn with_request_id<F: Future>(request_id: String, fut: F) -> F::Output {
    REQUEST_ID.scope(request_id, fut).await
}

/// Id of the request currently being handled on this task.
pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(|id| id.clone()).ok()
}

/// Render one record as a single-line JSON object.
pub fn format_record(
    record: &Record<'_>,
    service: &str,
    env: &str,
    version: &str,
    request_id: Option<String>,
) -> String {
    let mut payload = Map::new();
    payload.insert(
        "timestamp".to_string(),
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)),
    );
    payload.insert(
        "level".to_string(),
        Value::String(record.level().as_str().to_lowercase()),
    );
    payload.insert("logger".to_string(), Value::String(record.target().to_string()));
    payload.insert("message".to_string(), Value::String(record.args().to_string()));
    payload.insert("service".to_string(), Value::String(service.to_string()));
    payload.insert("env".to_string(), Value::String(env.to_string()));
    payload.insert("version".to_string(), Value::String(version.to_string()));

    if let Some(id) = request_id {
        payload.insert("request_id".to_string(), Value::String(id));
    }

    let mut fields = JsonFields(&mut payload);
    // visiting a plain key/value list cannot fail
    let _ = record.key_values().visit(&mut fields);

    Value::Object(payload).to_string()
}

struct JsonFields<'a>(&'a mut Map<String, Value>);

impl<'kvs> VisitSource<'kvs> for JsonFields<'_> {
    fn visit_pair(&mut self, key: Key<'kvs>, value: kv::Value<'kvs>) -> std::result::Result<(), kv::Error> {
        self.0
            .insert(key.as_str().to_string(), kv_to_json(key.as_str(), &value));
        Ok(())
    }
}

/// Key whose float values are rounded to two decimals.
const DURATION_KEY: &str = "duration_ms";

fn kv_to_json(key: &str, value: &kv::Value<'_>) -> Value {
    if let Some(b) = value.to_bool() {
        return Value::Bool(b);
    }
    if let Some(i) = value.to_i64() {
        return Value::Number(i.into());
    }
    if let Some(u) = value.to_u64() {
        return Value::Number(u.into());
    }
    if let Some(f) = value.to_f64() {
        let f = if key == DURATION_KEY {
            (f * 100.0).round() / 100.0
        } else {
            f
        };
        return Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null);
    }
    Value::String(value.to_string())
}
