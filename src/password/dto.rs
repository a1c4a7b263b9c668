use serde::Deserialize;

use crate::engine::context::CandidatePassword;

/// Body of `POST /password/validate`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatePasswordDto {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub password: CandidatePassword,
}
