use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tweetsense_sentiment::{Label, UserAnalysis};

use crate::middleware::RequestId;

use super::{map_analysis_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeTextRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub(super) struct TextAnalysisItem {
    pub label: Label,
    pub normalized: String,
}

pub(super) async fn analyze_text(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<AnalyzeTextRequest>,
) -> Result<Json<ApiResponse<TextAnalysisItem>>, ApiError> {
    let prediction = tweetsense_sentiment::analyze_text(&state.context, &body.text)
        .map_err(|e| map_analysis_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: TextAnalysisItem {
            label: prediction.label,
            normalized: prediction.normalized,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn analyze_user(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<UserAnalysis>>, ApiError> {
    let analysis = tweetsense_sentiment::analyze_user(&state.context, &state.source, &username)
        .await
        .map_err(|e| map_analysis_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: analysis,
        meta: ResponseMeta::new(req_id.0),
    }))
}
