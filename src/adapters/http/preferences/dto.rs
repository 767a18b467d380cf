//! HTTP DTOs for preference endpoints.

use serde::{Deserialize, Serialize};

/// Body of add and update: `true` boosts the campaign, `false` demotes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceRequest {
    pub is_preferred: bool,
}
