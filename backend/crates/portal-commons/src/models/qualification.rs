use serde::{Deserialize, Serialize};

/// One education entry on a user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Qualification {
    pub degree: String,
    pub start_year: i32,
    pub end_year: i32,
}

impl Qualification {
    pub fn new(degree: impl Into<String>, start_year: i32, end_year: i32) -> Self {
        Self {
            degree: degree.into(),
            start_year,
            end_year,
        }
    }
}
