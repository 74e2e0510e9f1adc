use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::MatchError;
use crate::models::domain::Role;

/// Request to find matches for one participant
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindMatchesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(length(min = 1))]
    pub role: String,
    #[serde(default = "default_limit")]
    pub limit: u16,
}

fn default_limit() -> u16 {
    20
}

impl FindMatchesRequest {
    /// Validate the request and parse its role
    pub fn parse_role(&self) -> Result<Role, MatchError> {
        self.validate()
            .map_err(|errors| MatchError::InvalidRequest(errors.to_string()))?;
        self.role.parse()
    }
}

/// Request for a participant's match statistics
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StatisticsRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(length(min = 1))]
    pub role: String,
}

impl StatisticsRequest {
    pub fn parse_role(&self) -> Result<Role, MatchError> {
        self.validate()
            .map_err(|errors| MatchError::InvalidRequest(errors.to_string()))?;
        self.role.parse()
    }
}
