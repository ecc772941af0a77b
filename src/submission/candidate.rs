//! Validation of submitted candidates.
//!
//! Every candidate in a batch is checked on its own. Candidates that fail any
//! check are dropped without being reported, the rest of the batch still goes
//! through.

use serde_json::{Map, Value};

use crate::{
    model::{Carrier, CarrierFilter, Sample},
    number,
};

/// Returns the samples that passed validation, in submission order.
pub fn validate_batch(candidates: &[Value]) -> Vec<Sample> {
    candidates.iter().filter_map(validate).collect()
}

pub fn validate(candidate: &Value) -> Option<Sample> {
    let fields = candidate.as_object()?;

    let latitude = field(fields, "latitude").filter(|x| *x >= 0.0)?;
    let longitude = field(fields, "longitude").filter(|x| *x >= 0.0)?;
    let dbm = field(fields, "dbm").and_then(number::round_i32)?;
    let network_type = field(fields, "type")
        .and_then(number::round_i32)
        .filter(|x| *x >= 0)?;
    let carrier = carrier(fields.get("provider")?)?;

    Some(Sample {
        latitude,
        longitude,
        dbm,
        network_type,
        carrier,
    })
}

fn field(fields: &Map<String, Value>, name: &str) -> Option<f64> {
    fields.get(name).and_then(number::from_value)
}

/// Submissions must name a concrete carrier, the `all` wildcard is refused.
fn carrier(value: &Value) -> Option<Carrier> {
    match value {
        Value::String(x) => x.parse::<CarrierFilter>().ok()?.carrier(),
        x => number::from_value(x).and_then(Carrier::from_code),
    }
}
