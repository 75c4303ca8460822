use axum::extract::{Query, State};
use axum::response::Html;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::Profile;
use crate::render::render_profile;

#[derive(Debug, Deserialize)]
pub struct ProfileParams {
    pub site: Option<String>,
    pub user: Option<String>,
}

impl ProfileParams {
    /// Both parameters, trimmed and non-empty.
    fn required(&self) -> Result<(&str, &str), ApiError> {
        let site = non_empty(self.site.as_deref())
            .ok_or_else(|| ApiError::BadRequest("missing 'site' parameter".to_string()))?;
        let user = non_empty(self.user.as_deref())
            .ok_or_else(|| ApiError::BadRequest("missing 'user' parameter".to_string()))?;
        Ok((site, user))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub site: String,
    pub generated_at: DateTime<Utc>,
    pub profile: Profile,
}

/// Profile rendered as an HTML page.
pub async fn profile_page(
    State(state): State<AppState>,
    Query(params): Query<ProfileParams>,
) -> Result<Html<String>, ApiError> {
    let (site, user) = params.required()?;
    let profile = state.dispatcher.profile(site, user).await?;
    Ok(Html(render_profile(&profile)))
}

/// Profile as JSON.
pub async fn profile_json(
    State(state): State<AppState>,
    Query(params): Query<ProfileParams>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let (site, user) = params.required()?;
    let profile = state.dispatcher.profile(site, user).await?;
    Ok(Json(ProfileResponse {
        site: site.to_string(),
        generated_at: Utc::now(),
        profile,
    }))
}
