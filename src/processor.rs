use crate::arrival::{ArrivalRecord, ArrivalStore};
use crate::config::PollConfig;
use crate::error::DecodeError;
use crate::filter::matches;
use crate::time::normalize_time;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, info, warn};

// One entry of the Metlink stop-predictions "departures" list.
// Every field falls back to its default, so an entry never fails to decode.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiDeparture {
    #[serde(deserialize_with = "lenient_text")]
    service_id: String,
    #[serde(deserialize_with = "lenient_nested")]
    destination: Destination,
    #[serde(deserialize_with = "lenient_text")]
    delay: String,
    #[serde(deserialize_with = "lenient_nested")]
    arrival: Arrival,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Destination {
    #[serde(deserialize_with = "lenient_text")]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Arrival {
    #[serde(deserialize_with = "lenient_text")]
    aimed: String,
    #[serde(deserialize_with = "lenient_text")]
    expected: String,
}

impl ApiDeparture {
    // Fields are looked up by name only; arrays never fill them by position
    fn from_entry(entry: &Value) -> Self {
        if !entry.is_object() {
            return Self::default();
        }
        Self::deserialize(entry).unwrap_or_default()
    }

    fn into_record(self) -> ArrivalRecord {
        ArrivalRecord::new(
            self.service_id,
            self.destination.name,
            normalize_time(&self.arrival.aimed),
            normalize_time(&self.arrival.expected),
            self.delay,
        )
    }
}

// Strings as is, other scalars as their JSON text, anything else empty
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(&value))
}

fn lenient_nested<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn decode(body: &[u8]) -> Result<Value, DecodeError> {
    Ok(serde_json::from_slice(body)?)
}

/// Rebuild `out` from a raw stop-predictions body.
///
/// The store is always cleared first. Entries are taken in document order;
/// the first `config.capacity` that match the configured route and destination
/// are kept and the rest are dropped. A body that is not JSON, or that has no
/// `departures` list, leaves the store empty. Returns the number kept.
pub fn process(body: &[u8], config: &PollConfig, out: &mut ArrivalStore) -> usize {
    out.clear();

    let document = match decode(body) {
        Ok(d) => d,
        Err(e) => {
            warn!(bytes = body.len(), "{}", e);
            return 0;
        }
    };

    let Some(entries) = document.get("departures").and_then(Value::as_array) else {
        warn!("Response has no departures list");
        return 0;
    };

    let mut matched = 0usize;
    for entry in entries {
        let record = ApiDeparture::from_entry(entry).into_record();
        if !matches(&record, config) {
            continue;
        }
        matched += 1;

        if out.len() >= config.capacity {
            debug!(capacity = config.capacity, "Capacity reached, dropping remaining departures");
            break;
        }
        if !out.try_append(record) {
            debug!(capacity = out.capacity(), "Store full, dropping remaining departures");
            break;
        }
    }

    info!(
        entries = entries.len(),
        count = out.len(),
        truncated = matched > out.len(),
        "Processed {} departures, kept {}",
        entries.len(),
        out.len()
    );

    out.len()
}
