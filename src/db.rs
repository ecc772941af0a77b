use async_trait::async_trait;
use serde::Serialize;
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool, Postgres, QueryBuilder};

use crate::{
    bounds::SearchArea,
    model::{Carrier, Sample},
};

// postgres caps a statement at 65535 bind parameters, five per row
const INSERT_CHUNK: usize = 10_000;

/// Append-only storage of samples.
#[async_trait]
pub trait SampleStore: Send + Sync {
    /// Samples inside the rectangle of `area`, edges included.
    async fn find_in(&self, area: &SearchArea, carrier: Option<Carrier>)
        -> sqlx::Result<Vec<Sample>>;

    /// Inserts every sample or none of them.
    async fn insert(&self, samples: &[Sample]) -> sqlx::Result<()>;
}

/// Row layout of the `samples` table.
#[derive(Debug, FromRow, Serialize)]
pub struct SampleRow {
    pub latitude: f64,
    pub longitude: f64,
    pub dbm: i32,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub network_type: i32,
    pub provider: i16,
}

impl SampleRow {
    pub fn into_sample(self) -> Option<Sample> {
        let carrier = u8::try_from(self.provider).ok().and_then(Carrier::new)?;
        Some(Sample {
            latitude: self.latitude,
            longitude: self.longitude,
            dbm: self.dbm,
            network_type: self.network_type,
            carrier,
        })
    }
}

pub async fn connect(url: &str, max_connections: u32) -> sqlx::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
}

#[derive(Clone)]
pub struct PgSampleStore {
    pool: PgPool,
}

impl PgSampleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SampleStore for PgSampleStore {
    async fn find_in(
        &self,
        area: &SearchArea,
        carrier: Option<Carrier>,
    ) -> sqlx::Result<Vec<Sample>> {
        let (min, max) = (area.rect().min(), area.rect().max());
        let mut query = QueryBuilder::<Postgres>::new(
            "select latitude, longitude, dbm, type, provider from samples where latitude between ",
        );
        query
            .push_bind(min.y)
            .push(" and ")
            .push_bind(max.y)
            .push(" and longitude between ")
            .push_bind(min.x)
            .push(" and ")
            .push_bind(max.x);
        if let Some(carrier) = carrier {
            query.push(" and provider = ").push_bind(carrier.index() as i16);
        }

        let mut conn = self.pool.acquire().await?;
        let rows: Vec<SampleRow> = query.build_query_as().fetch_all(&mut *conn).await?;

        let count = rows.len();
        let samples: Vec<_> = rows.into_iter().filter_map(SampleRow::into_sample).collect();
        if samples.len() != count {
            tracing::warn!(
                skipped = count - samples.len(),
                "ignoring rows with an unknown provider"
            );
        }
        Ok(samples)
    }

    async fn insert(&self, samples: &[Sample]) -> sqlx::Result<()> {
        let mut tx = self.pool.begin().await?;
        for chunk in samples.chunks(INSERT_CHUNK) {
            let mut query = QueryBuilder::<Postgres>::new(
                "insert into samples (latitude, longitude, dbm, type, provider) ",
            );
            query.push_values(chunk, |mut row, sample| {
                row.push_bind(sample.latitude)
                    .push_bind(sample.longitude)
                    .push_bind(sample.dbm)
                    .push_bind(sample.network_type)
                    .push_bind(sample.carrier.index() as i16);
            });
            query.build().execute(&mut *tx).await?;
        }
        tx.commit().await?;

        Ok(())
    }
}
