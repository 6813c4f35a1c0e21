// src/routes.rs
use std::sync::Arc;
use warp::reject::Rejection;
use crate::context::AppContext;
use crate::handlers::{
    calculators::{post_compound, post_loan, post_savings},
    currency::{get_conversion, get_currencies, ConversionQuery},
    insight::post_insight,
    loan_screen::{generate_offers, get_loan_state, load_loan_state, patch_loan_state},
};
use log::info;

use std::convert::Infallible;
use warp::{Filter, Reply};
use crate::handlers::error::ApiError;

const MAX_BODY_BYTES: u64 = 64 * 1024;

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status;
        message = api_error.message.clone();
    } else if let Some(body_error) = err.find::<warp::filters::body::BodyDeserializeError>() {
        code = warp::http::StatusCode::BAD_REQUEST;
        message = body_error.to_string();
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = warp::http::StatusCode::METHOD_NOT_ALLOWED;
        message = "Method Not Allowed".to_string();
    } else {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

fn json_body<T: serde::de::DeserializeOwned + Send>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

pub fn routes(ctx: Arc<AppContext>) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let ctx_filter = warp::any().map(move || ctx.clone());

    let compound_route = warp::path!("api" / "v1" / "compound")
        .and(warp::post())
        .and(json_body())
        .and_then(post_compound);

    let loan_route = warp::path!("api" / "v1" / "loan")
        .and(warp::post())
        .and(json_body())
        .and_then(post_loan);

    let savings_route = warp::path!("api" / "v1" / "savings")
        .and(warp::post())
        .and(json_body())
        .and_then(post_savings);

    let loan_state_route = warp::path!("api" / "v1" / "loan" / "state")
        .and(warp::get())
        .and(ctx_filter.clone())
        .and_then(get_loan_state);

    let loan_edit_route = warp::path!("api" / "v1" / "loan" / "state")
        .and(warp::patch())
        .and(json_body())
        .and(ctx_filter.clone())
        .and_then(patch_loan_state);

    let loan_load_route = warp::path!("api" / "v1" / "loan" / "state" / "load")
        .and(warp::post())
        .and(ctx_filter.clone())
        .and_then(load_loan_state);

    let loan_offers_route = warp::path!("api" / "v1" / "loan" / "offers")
        .and(warp::post())
        .and(ctx_filter.clone())
        .and_then(generate_offers);

    let conversion_route = warp::path!("api" / "v1" / "currency" / String / String / f64)
        .and(warp::get())
        .and(warp::query::<ConversionQuery>())
        .and(ctx_filter.clone())
        .and_then(get_conversion);

    let currencies_route = warp::path!("api" / "v1" / "currencies")
        .and(warp::get())
        .and_then(get_currencies);

    let insight_route = warp::path!("api" / "v1" / "insight")
        .and(warp::post())
        .and(json_body())
        .and(ctx_filter.clone())
        .and_then(post_insight);

    info!("All routes configured successfully.");

    compound_route
        .or(loan_route)
        .or(savings_route)
        .or(loan_state_route)
        .or(loan_edit_route)
        .or(loan_load_route)
        .or(loan_offers_route)
        .or(conversion_route)
        .or(currencies_route)
        .or(insight_route)
        .recover(handle_rejection)
}
