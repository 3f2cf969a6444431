use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TrackVisitRequest {
    #[validate(length(min = 1, max = 2048))]
    pub path: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct VisitSummaryQuery {
    /// Window in days, 30 when omitted
    pub days: Option<i64>,
}
