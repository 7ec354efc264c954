use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::interview::{Interview, InterviewOrder};

#[derive(Debug, Clone, Serialize, Deserialize, Default, IntoParams)]
#[serde(default)]
#[into_params(parameter_in = Query)]
pub struct InterviewListQuery {
    /// `newest` or `oldest`; store order when omitted.
    pub order: Option<InterviewOrder>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InterviewListResponse {
    pub items: Vec<Interview>,
    pub total: usize,
}

impl From<Vec<Interview>> for InterviewListResponse {
    fn from(items: Vec<Interview>) -> Self {
        Self {
            total: items.len(),
            items,
        }
    }
}
