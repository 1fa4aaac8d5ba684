//! Account and profile request models
//!
//! Fields are optional at the serde level so that missing values surface as
//! the endpoint's own validation message instead of a deserialization error.

use serde::{Deserialize, Deserializer};

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub fullname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub mobile_number: Option<String>,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub birth_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateAccountRequest {
    #[serde(default)]
    pub fullname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualificationInput {
    #[serde(default)]
    pub degree: Option<String>,
    /// Number or numeric string; blank counts as missing
    #[serde(default, deserialize_with = "year_from_number_or_string")]
    pub start_year: Option<i32>,
    #[serde(default, deserialize_with = "year_from_number_or_string")]
    pub end_year: Option<i32>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum YearValue {
    Number(i32),
    Text(String),
}

fn year_from_number_or_string<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<YearValue>::deserialize(deserializer)? {
        None => Ok(None),
        Some(YearValue::Number(year)) => Ok(Some(year)),
        Some(YearValue::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("invalid year '{}'", text)))
        },
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct QualificationRequest {
    #[serde(default)]
    pub qualification: Option<QualificationInput>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyJobRequest {
    #[serde(default)]
    pub job_id: Option<String>,
}
