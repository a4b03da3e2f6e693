//! CSV ingestion into the census tract table.
//!
//! Sources are read in order and concatenated. Each identifier is
//! normalized, and rows whose identifier is already stored or was seen
//! earlier in the run are skipped (first occurrence wins). Survivors are
//! inserted in one transaction, so a run either lands completely or not at
//! all.

pub mod error;
pub mod normalize;
pub mod source;

use std::path::PathBuf;

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::database::models::score_in_range;
use crate::database::{CensusTract, DatabaseError, TractRepository};

pub use error::IngestError;
pub use normalize::{is_valid_tract_id, normalize_tract_id};
pub use source::{load_file, load_reader, RawTractRow, SourceRow};

/// Load every source in order and ingest the combined rows. Returns the
/// number of newly inserted tracts.
pub async fn ingest(pool: &SqlitePool, sources: &[PathBuf]) -> Result<usize, IngestError> {
    let mut rows = Vec::new();
    for path in sources {
        rows.extend(load_file(path)?);
    }
    ingest_rows(pool, rows).await
}

/// Dedup and persist already-loaded rows in a single transaction.
pub async fn ingest_rows(pool: &SqlitePool, rows: Vec<SourceRow>) -> Result<usize, IngestError> {
    let mut tx = pool.begin().await.map_err(DatabaseError::from)?;

    let (inserted, skipped) = {
        let mut repo = TractRepository::new(&mut tx);

        // Read before any write of this run
        let mut seen = repo.select_ids().await?;

        let mut pending = Vec::new();
        let mut skipped = 0usize;

        for row in &rows {
            let census_tract = normalize_tract_id(&row.raw.census_tract);
            if !is_valid_tract_id(&census_tract) {
                return Err(IngestError::InvalidTractId {
                    origin: row.origin.clone(),
                    line: row.line,
                    value: row.raw.census_tract.clone(),
                });
            }

            if !seen.insert(census_tract.clone()) {
                debug!("{} line {}: duplicate tract {}, skipping", row.origin, row.line, census_tract);
                skipped += 1;
                continue;
            }

            pending.push(build_tract(row, census_tract)?);
        }

        for tract in &pending {
            repo.insert(tract).await?;
        }

        (pending.len(), skipped)
    };

    tx.commit().await.map_err(DatabaseError::from)?;

    info!(
        "Ingestion complete: {} rows read, {} inserted, {} duplicates skipped",
        rows.len(),
        inserted,
        skipped
    );
    Ok(inserted)
}

fn build_tract(row: &SourceRow, census_tract: String) -> Result<CensusTract, IngestError> {
    let raw = &row.raw;
    Ok(CensusTract {
        census_tract,
        inclusion_score: parse_score(row, "inclusion_score", &raw.inclusion_score)?,
        growth_score: parse_score(row, "growth_score", &raw.growth_score)?,
        economy_score: parse_score(row, "economy_score", &raw.economy_score)?,
        community_score: parse_score(row, "community_score", &raw.community_score)?,
    })
}

fn parse_score(row: &SourceRow, field: &'static str, value: &str) -> Result<f64, IngestError> {
    let score: f64 = value.trim().parse().map_err(|_| IngestError::InvalidScore {
        origin: row.origin.clone(),
        line: row.line,
        field,
        value: value.to_string(),
    })?;

    if !score_in_range(score) {
        return Err(IngestError::ScoreOutOfRange {
            origin: row.origin.clone(),
            line: row.line,
            field,
            value: score,
        });
    }

    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{csv_text, memory_pool};
    use std::fs;

    fn rows(origin: &str, lines: &[&str]) -> Vec<SourceRow> {
        load_reader(origin, csv_text(lines).as_bytes()).unwrap()
    }

    async fn stored(pool: &SqlitePool) -> Vec<CensusTract> {
        let mut conn = pool.acquire().await.unwrap();
        TractRepository::new(&mut conn).select_all().await.unwrap()
    }

    #[tokio::test]
    async fn inserts_normalized_rows() {
        let pool = memory_pool().await;
        let inserted = ingest_rows(&pool, rows("primary", &["6037102107.0,10,20,30,40", "6037102108,1,2,3,4"]))
            .await
            .unwrap();

        assert_eq!(inserted, 2);
        let all = stored(&pool).await;
        assert_eq!(all[0].census_tract, "06037102107");
        assert_eq!(all[0].community_score, 40.0);
        assert_eq!(all[1].census_tract, "06037102108");
    }

    #[tokio::test]
    async fn same_source_twice_inserts_once() {
        let pool = memory_pool().await;
        let lines = ["6037102107,10,20,30,40", "6037102108,1,2,3,4"];

        assert_eq!(ingest_rows(&pool, rows("a", &lines)).await.unwrap(), 2);
        assert_eq!(ingest_rows(&pool, rows("a", &lines)).await.unwrap(), 0);
        assert_eq!(stored(&pool).await.len(), 2);
    }

    #[tokio::test]
    async fn overlapping_sources_keep_first_seen_scores() {
        let pool = memory_pool().await;
        let mut combined = rows("primary", &["6037102107,10,10,10,10", "6037102108,20,20,20,20"]);
        combined.extend(rows("extra", &["06037102108,99,99,99,99", "6037102109.0,30,30,30,30"]));

        assert_eq!(ingest_rows(&pool, combined).await.unwrap(), 3);

        let all = stored(&pool).await;
        let ids: Vec<_> = all.iter().map(|t| t.census_tract.as_str()).collect();
        assert_eq!(ids, ["06037102107", "06037102108", "06037102109"]);
        assert_eq!(all[1].inclusion_score, 20.0);
    }

    #[tokio::test]
    async fn existing_rows_are_never_updated() {
        let pool = memory_pool().await;
        ingest_rows(&pool, rows("first", &["6037102107,10,10,10,10"])).await.unwrap();
        let inserted = ingest_rows(&pool, rows("second", &["6037102107,50,50,50,50"])).await.unwrap();

        assert_eq!(inserted, 0);
        assert_eq!(stored(&pool).await[0].inclusion_score, 10.0);
    }

    #[tokio::test]
    async fn bad_score_aborts_whole_run() {
        let pool = memory_pool().await;
        let err = ingest_rows(&pool, rows("primary", &["6037102107,10,10,10,10", "6037102108,abc,10,10,10"]))
            .await
            .unwrap_err();

        match err {
            IngestError::InvalidScore { origin, line, field, value } => {
                assert_eq!(origin, "primary");
                assert_eq!(line, 3);
                assert_eq!(field, "inclusion_score");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(stored(&pool).await.is_empty());
    }

    #[tokio::test]
    async fn out_of_range_score_aborts_run() {
        let pool = memory_pool().await;
        let err = ingest_rows(&pool, rows("primary", &["6037102107,10,10,100.5,10"])).await.unwrap_err();
        assert!(matches!(err, IngestError::ScoreOutOfRange { field: "economy_score", .. }));

        let err = ingest_rows(&pool, rows("primary", &["6037102107,NaN,10,10,10"])).await.unwrap_err();
        assert!(matches!(err, IngestError::ScoreOutOfRange { field: "inclusion_score", .. }));

        assert!(stored(&pool).await.is_empty());
    }

    #[tokio::test]
    async fn duplicates_are_skipped_before_scores_are_read() {
        let pool = memory_pool().await;
        let inserted = ingest_rows(&pool, rows("primary", &["6037102107,10,10,10,10", "6037102107,oops,,,"]))
            .await
            .unwrap();
        assert_eq!(inserted, 1);
    }

    #[tokio::test]
    async fn invalid_identifier_aborts_run() {
        let pool = memory_pool().await;
        let err = ingest_rows(&pool, rows("primary", &["6037102107,1,1,1,1", "abc,1,1,1,1"])).await.unwrap_err();
        assert!(matches!(err, IngestError::InvalidTractId { line: 3, .. }));
        assert!(stored(&pool).await.is_empty());
    }

    #[tokio::test]
    async fn empty_and_missing_sources_are_fine() {
        let pool = memory_pool().await;
        assert_eq!(ingest_rows(&pool, Vec::new()).await.unwrap(), 0);

        let dir = std::env::temp_dir().join(format!("igs-ingest-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let primary = dir.join("primary.csv");
        fs::write(&primary, csv_text(&["6037102107,1,2,3,4"])).unwrap();
        let empty = dir.join("empty.csv");
        fs::write(&empty, "").unwrap();
        let missing = dir.join("missing.csv");

        let inserted = ingest(&pool, &[primary, empty, missing]).await.unwrap();
        assert_eq!(inserted, 1);

        fs::remove_dir_all(&dir).ok();
    }
}
