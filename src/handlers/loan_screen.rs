// src/handlers/loan_screen.rs
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};
use warp::Rejection;
use log::{debug, error, info, warn};
use serde_json::json;
use crate::context::AppContext;
use crate::handlers::error::ApiError;
use crate::services::gemini::GenerationError;
use crate::services::loan_state::{LoanEdit, LoanScreen, TransitionError};

/// Writes the form to the storage slot after a transition.
fn persist(ctx: &AppContext, screen: &mut LoanScreen) {
    ctx.store.save(&screen.state);
    screen.has_saved_state = ctx.store.has_saved_state();
}

pub async fn get_loan_state(ctx: Arc<AppContext>) -> Result<Json, Rejection> {
    let screen = ctx.screen.lock().await;
    Ok(warp::reply::json(&screen.snapshot()))
}

pub async fn patch_loan_state(edit: LoanEdit, ctx: Arc<AppContext>) -> Result<Json, Rejection> {
    let mut screen = ctx.screen.lock().await;
    screen.edit(&edit);
    persist(&ctx, &mut screen);

    let snapshot = screen.snapshot();
    if !snapshot.is_input_valid {
        debug!("Loan form has validation messages: {:?}", snapshot.validation.messages());
    }
    Ok(warp::reply::json(&snapshot))
}

pub async fn load_loan_state(ctx: Arc<AppContext>) -> Result<Json, Rejection> {
    info!("Loading saved loan calculator state");
    let saved = ctx.store.load();

    let mut screen = ctx.screen.lock().await;
    let loaded = screen.restore(saved);
    if loaded {
        persist(&ctx, &mut screen);
    } else {
        warn!("No saved loan calculator state to load");
    }

    Ok(warp::reply::json(&json!({
        "loaded": loaded,
        "screen": screen.snapshot(),
    })))
}

pub async fn generate_offers(ctx: Arc<AppContext>) -> Result<WithStatus<Json>, Rejection> {
    info!("Handling request to generate loan offers");

    if ctx.gemini.is_none() {
        return Err(warp::reject::custom(ApiError::unavailable("Loan offer generation is not configured")));
    }

    let (amount, term) = {
        let mut screen = ctx.screen.lock().await;
        let params = screen.begin_generation().map_err(|e| match e {
            TransitionError::InvalidInput(_) => warp::reject::custom(ApiError::bad_request(e.to_string())),
            TransitionError::AlreadyGenerating => warp::reject::custom(ApiError::conflict(e.to_string())),
        })?;
        persist(&ctx, &mut screen);
        params
    };

    // Detached so the screen leaves Generating even if this request is dropped.
    // The screen lock is released while the model is working.
    let task_ctx = ctx.clone();
    let generation = tokio::spawn(async move {
        let result = match task_ctx.gemini.as_ref() {
            Some(gemini) => gemini.generate_loan_offers(amount, term).await,
            None => Err(GenerationError::MissingApiKey),
        };
        let status = if result.is_ok() { StatusCode::OK } else { StatusCode::BAD_GATEWAY };

        let mut screen = task_ctx.screen.lock().await;
        screen.finish_generation(result);
        persist(&task_ctx, &mut screen);
        (status, screen.snapshot())
    });

    let (status, snapshot) = generation.await.map_err(|e| {
        error!("Loan offer task did not complete: {}", e);
        warp::reject::custom(ApiError::new("Loan offer generation was interrupted"))
    })?;

    Ok(warp::reply::with_status(warp::reply::json(&snapshot), status))
}
