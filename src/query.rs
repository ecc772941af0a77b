//! Signal statistics around a point.
//!
//! Samples are fetched from a rectangle around the query point, narrowed to
//! an ellipse, and grouped by carrier and generation. Each group is reduced
//! to its minimum, maximum and mean signal strength.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use strum::IntoEnumIterator;

use crate::{
    bounds::SearchArea,
    db::SampleStore,
    model::{Carrier, CarrierFilter, Generation, Sample},
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stats {
    pub min: i32,
    pub max: i32,
    pub avg: f64,
}

impl Stats {
    pub fn from_values(values: &[i32]) -> Option<Self> {
        let min = *values.iter().min()?;
        let max = *values.iter().max()?;
        let sum: i64 = values.iter().map(|&x| x as i64).sum();
        Some(Self {
            min,
            max,
            avg: sum as f64 / values.len() as f64,
        })
    }
}

/// Statistics of one group, serialized as `-1` when the group saw no samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket(pub Option<Stats>);

impl Serialize for Bucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.0 {
            Some(stats) => stats.serialize(serializer),
            None => serializer.serialize_i8(-1),
        }
    }
}

/// Query result in its wire shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Summary {
    /// Indexed by carrier, then generation.
    AllCarriers(Vec<Vec<Bucket>>),
    /// Indexed by generation.
    Carrier(Vec<Bucket>),
}

type BucketKey = (Carrier, Generation);

/// Groups samples from `area` that match `filter` and reduces every group.
///
/// Samples outside the rectangle are ignored here as well, so the result does
/// not depend on how precisely the store applied the prefilter.
pub fn aggregate(area: &SearchArea, filter: CarrierFilter, samples: &[Sample]) -> Summary {
    let mut groups: BTreeMap<BucketKey, Vec<i32>> = BTreeMap::new();
    for sample in samples {
        if !filter.admits(sample.carrier) {
            continue;
        }
        if !area.contains(sample.latitude, sample.longitude) {
            continue;
        }
        groups
            .entry((sample.carrier, sample.generation()))
            .or_default()
            .push(sample.dbm);
    }

    let stats: BTreeMap<BucketKey, Stats> = groups
        .into_iter()
        .filter_map(|(key, values)| Some((key, Stats::from_values(&values)?)))
        .collect();

    let row = |carrier: Carrier| -> Vec<Bucket> {
        Generation::iter()
            .map(|generation| Bucket(stats.get(&(carrier, generation)).copied()))
            .collect()
    };

    match filter {
        CarrierFilter::All => Summary::AllCarriers(Carrier::iter().map(row).collect()),
        CarrierFilter::Only(carrier) => Summary::Carrier(row(carrier)),
    }
}

/// Looks up and aggregates samples around a point.
pub async fn query<S: SampleStore + ?Sized>(
    store: &S,
    latitude: f64,
    longitude: f64,
    filter: CarrierFilter,
) -> sqlx::Result<Summary> {
    let area = SearchArea::around(latitude, longitude);
    let samples = store.find_in(&area, filter.carrier()).await?;
    tracing::debug!(latitude, longitude, candidates = samples.len(), "aggregating samples");
    Ok(aggregate(&area, filter, &samples))
}
