use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::sanitize;

/// Length every stored tract identifier is padded to.
pub const TRACT_ID_LEN: usize = 11;

/// Inclusive bounds for every indicator score.
pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 100.0;

/// One census tract's indicator scores. The same type is read from the
/// store and written to HTTP responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CensusTract {
    pub census_tract: String,
    pub inclusion_score: f64,
    pub growth_score: f64,
    pub economy_score: f64,
    pub community_score: f64,
}

impl CensusTract {
    /// Named scores, in column order.
    pub fn scores(&self) -> [(&'static str, f64); 4] {
        [
            ("inclusion_score", self.inclusion_score),
            ("growth_score", self.growth_score),
            ("economy_score", self.economy_score),
            ("community_score", self.community_score),
        ]
    }

    /// Copy with the identifier re-cleaned for output.
    pub fn sanitized(mut self) -> Self {
        self.census_tract = sanitize::clean(&self.census_tract);
        self
    }

    /// Check the response-boundary constraints: identifier at most 11
    /// characters and every score within [0, 100].
    pub fn check_publishable(&self) -> Result<(), String> {
        if self.census_tract.chars().count() > TRACT_ID_LEN {
            return Err(format!(
                "census_tract '{}' is longer than {} characters",
                self.census_tract, TRACT_ID_LEN
            ));
        }

        for (field, value) in self.scores() {
            if !score_in_range(value) {
                return Err(format!(
                    "{} of tract '{}' is outside [{}, {}]: {}",
                    field, self.census_tract, SCORE_MIN, SCORE_MAX, value
                ));
            }
        }

        Ok(())
    }
}

pub fn score_in_range(value: f64) -> bool {
    value.is_finite() && (SCORE_MIN..=SCORE_MAX).contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tract(id: &str, score: f64) -> CensusTract {
        CensusTract {
            census_tract: id.to_string(),
            inclusion_score: 50.0,
            growth_score: 50.0,
            economy_score: score,
            community_score: 50.0,
        }
    }

    #[test]
    fn accepts_bounds_inclusive() {
        assert!(tract("06037102107", 0.0).check_publishable().is_ok());
        assert!(tract("06037102107", 100.0).check_publishable().is_ok());
    }

    #[test]
    fn rejects_out_of_range_scores() {
        let err = tract("06037102107", 100.5).check_publishable().unwrap_err();
        assert!(err.contains("economy_score"));
        assert!(tract("06037102107", -0.1).check_publishable().is_err());
        assert!(tract("06037102107", f64::NAN).check_publishable().is_err());
    }

    #[test]
    fn rejects_long_identifiers() {
        assert!(tract("060371021070", 1.0).check_publishable().is_err());
    }

    #[test]
    fn sanitized_strips_markup_from_identifier() {
        let cleaned = tract("<b>06037102107</b>", 1.0).sanitized();
        assert_eq!(cleaned.census_tract, "06037102107");
    }

    #[test]
    fn serializes_with_api_field_names() {
        let value = serde_json::to_value(tract("06037102107", 12.5)).unwrap();
        assert_eq!(value["census_tract"], "06037102107");
        assert_eq!(value["economy_score"], 12.5);
        assert_eq!(value.as_object().unwrap().len(), 5);
    }
}
