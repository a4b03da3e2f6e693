use sqlx::SqlitePool;

use crate::config::DatabaseConfig;
use crate::database;

/// Fresh, migrated in-memory store for a single test.
pub async fn memory_pool() -> SqlitePool {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        connection_timeout: 5,
    };
    database::connect(&config)
        .await
        .expect("in-memory store should open")
}

/// CSV text with the standard header followed by `rows`.
pub fn csv_text(rows: &[&str]) -> String {
    let mut text = String::from("census_tract,inclusion_score,growth_score,economy_score,community_score\n");
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_pools_are_isolated() {
        let first = memory_pool().await;
        let second = memory_pool().await;

        sqlx::query("INSERT INTO census_tracts (census_tract, inclusion_score, growth_score, economy_score, community_score) VALUES ('06037102107', 1, 2, 3, 4)")
            .execute(&first)
            .await
            .unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM census_tracts")
            .fetch_one(&second)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn csv_text_has_header() {
        let text = csv_text(&["1,2,3,4,5"]);
        assert!(text.starts_with("census_tract,"));
        assert!(text.ends_with("1,2,3,4,5\n"));
    }
}
