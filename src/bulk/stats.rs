use std::collections::BTreeMap;

use anyhow::Result;
use futures::TryStreamExt;
use serde::Serialize;
use sqlx::{query_as, PgPool};
use strum::IntoEnumIterator;

use crate::{
    db::SampleRow,
    model::{Carrier, Generation, Sample},
};

#[derive(Debug, Default, PartialEq, Serialize)]
struct Stats {
    total: u64,
    carriers: Vec<CarrierStats>,
}

#[derive(Debug, PartialEq, Serialize)]
struct CarrierStats {
    code: i64,
    total: u64,
    generations: BTreeMap<String, u64>,
}

#[derive(Default)]
struct Tally {
    counts: BTreeMap<(Carrier, Generation), u64>,
}

impl Tally {
    fn add(&mut self, sample: &Sample) {
        *self
            .counts
            .entry((sample.carrier, sample.generation()))
            .or_default() += 1;
    }

    fn finish(self) -> Stats {
        let carriers: Vec<_> = Carrier::iter()
            .map(|carrier| {
                let generations: BTreeMap<_, _> = Generation::iter()
                    .map(|generation| {
                        let count = self
                            .counts
                            .get(&(carrier, generation))
                            .copied()
                            .unwrap_or_default();
                        (generation.to_string(), count)
                    })
                    .collect();
                CarrierStats {
                    code: carrier.code(),
                    total: generations.values().sum(),
                    generations,
                }
            })
            .collect();

        Stats {
            total: carriers.iter().map(|x| x.total).sum(),
            carriers,
        }
    }
}

pub async fn run(pool: PgPool) -> Result<()> {
    let mut rows = query_as::<_, SampleRow>(
        "select latitude, longitude, dbm, type, provider from samples",
    )
    .fetch(&pool);

    let mut tally = Tally::default();
    while let Some(row) = rows.try_next().await? {
        if let Some(sample) = row.into_sample() {
            tally.add(&sample);
        }
    }

    println!("{}", serde_json::to_string_pretty(&tally.finish())?);
    Ok(())
}
