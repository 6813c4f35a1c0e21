// src/handlers/insight.rs
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;
use chrono::Utc;
use log::{error, info};
use serde_json::json;
use crate::context::AppContext;
use crate::handlers::error::ApiError;
use crate::models::InsightRequest;

pub async fn post_insight(request: InsightRequest, ctx: Arc<AppContext>) -> Result<Json, Rejection> {
    info!("Handling insight request for {}", request.context);

    let gemini = ctx.gemini.as_ref().ok_or_else(|| {
        warp::reject::custom(ApiError::unavailable("AI advisor is not configured"))
    })?;

    let data = request
        .data
        .unwrap_or_else(|| json!({ "type": request.context, "timestamp": Utc::now().to_rfc3339() }));

    let insight = gemini.generate_insight(&request.context, &data).await.map_err(|e| {
        error!("Insight generation failed: {}", e);
        warp::reject::custom(ApiError::external_error("Error connecting to AI advisor. Please try again later."))
    })?;

    Ok(warp::reply::json(&json!({ "insight": insight })))
}
