use std::collections::HashSet;

use sqlx::SqliteConnection;

use crate::database::manager::DatabaseError;
use crate::database::models::CensusTract;

const SELECT_COLUMNS: &str =
    "SELECT census_tract, inclusion_score, growth_score, economy_score, community_score FROM census_tracts";

/// Census tract queries over a borrowed connection. The caller owns the
/// connection (a pooled handle or an open transaction) and decides its scope.
pub struct TractRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> TractRepository<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Every stored tract in insertion order.
    pub async fn select_all(&mut self) -> Result<Vec<CensusTract>, DatabaseError> {
        let sql = format!("{} ORDER BY id", SELECT_COLUMNS);
        let rows = sqlx::query_as::<_, CensusTract>(&sql)
            .fetch_all(&mut *self.conn)
            .await?;
        Ok(rows)
    }

    pub async fn select_one(&mut self, census_tract: &str) -> Result<Option<CensusTract>, DatabaseError> {
        let sql = format!("{} WHERE census_tract = ?", SELECT_COLUMNS);
        let row = sqlx::query_as::<_, CensusTract>(&sql)
            .bind(census_tract)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(row)
    }

    /// Exact-match lookup that turns absence into `DatabaseError::NotFound`.
    pub async fn select_404(&mut self, census_tract: &str) -> Result<CensusTract, DatabaseError> {
        self.select_one(census_tract)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Census tract not found".to_string()))
    }

    /// Identifiers already present, read in a single query.
    pub async fn select_ids(&mut self) -> Result<HashSet<String>, DatabaseError> {
        let ids = sqlx::query_scalar::<_, String>("SELECT census_tract FROM census_tracts")
            .fetch_all(&mut *self.conn)
            .await?;
        Ok(ids.into_iter().collect())
    }

    #[cfg(test)]
    pub async fn count(&mut self) -> Result<i64, DatabaseError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM census_tracts")
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(count)
    }

    pub async fn insert(&mut self, tract: &CensusTract) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO census_tracts
                (census_tract, inclusion_score, growth_score, economy_score, community_score)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&tract.census_tract)
        .bind(tract.inclusion_score)
        .bind(tract.growth_score)
        .bind(tract.economy_score)
        .bind(tract.community_score)
        .execute(&mut *self.conn)
        .await?;
        Ok(())
    }
}
