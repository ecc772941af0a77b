use std::io;

use anyhow::Result;
use futures::TryStreamExt;
use sqlx::{query_as, PgPool};

use crate::db::SampleRow;

pub async fn run(pool: PgPool) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout().lock());
    let mut rows = query_as::<_, SampleRow>(
        "select latitude, longitude, dbm, type, provider from samples order by id",
    )
    .fetch(&pool);

    let mut count = 0u64;
    while let Some(row) = rows.try_next().await? {
        writer.serialize(&row)?;
        count += 1;
    }
    writer.flush()?;

    tracing::info!(count, "exported samples");
    Ok(())
}
