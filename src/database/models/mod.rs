pub mod tract;

pub use tract::{score_in_range, CensusTract, SCORE_MAX, SCORE_MIN, TRACT_ID_LEN};
