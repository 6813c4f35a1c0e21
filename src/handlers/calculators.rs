// src/handlers/calculators.rs
use warp::reply::Json;
use warp::Rejection;
use serde::Serialize;
use log::{error, info};
use crate::handlers::error::ApiError;
use crate::models::{CompoundRequest, LoanRequest, ProjectionPoint, SavingsRequest};
use crate::services::calculations::{
    calculate_loan_payment, calculate_mortgage_payment, project_compound_growth, solve_savings_goal,
    summarize_growth, validate_projection_years, GrowthSummary,
};

fn invalid_input(e: anyhow::Error) -> Rejection {
    error!("Invalid calculator parameters: {}", e);
    warp::reject::custom(ApiError::bad_request(e.to_string()))
}

#[derive(Serialize)]
struct CompoundResponse {
    projection: Vec<ProjectionPoint>,
    summary: GrowthSummary,
}

pub async fn post_compound(request: CompoundRequest) -> Result<Json, Rejection> {
    info!("Handling compound interest projection for {} years", request.years);

    if request.principal < 0.0 || request.monthly_contribution < 0.0 {
        return Err(warp::reject::custom(ApiError::bad_request(
            "Principal and contribution cannot be negative",
        )));
    }
    validate_projection_years(request.years).map_err(invalid_input)?;

    let projection = project_compound_growth(
        request.principal,
        request.annual_rate,
        request.monthly_contribution,
        request.years,
    );
    let summary = summarize_growth(&projection);

    Ok(warp::reply::json(&CompoundResponse { projection, summary }))
}

pub async fn post_loan(request: LoanRequest) -> Result<Json, Rejection> {
    info!("Handling loan payment calculation");

    let payment = match (request.term_months, request.term_years) {
        (Some(months), _) => calculate_loan_payment(request.amount, request.annual_rate, months),
        (None, Some(years)) => calculate_mortgage_payment(request.amount, request.annual_rate, years),
        (None, None) => {
            return Err(warp::reject::custom(ApiError::bad_request(
                "Either term_months or term_years is required",
            )))
        }
    }
    .map_err(invalid_input)?;

    Ok(warp::reply::json(&payment))
}

pub async fn post_savings(request: SavingsRequest) -> Result<Json, Rejection> {
    info!("Handling savings goal for target {}", request.target);

    if request.current < 0.0 {
        return Err(warp::reject::custom(ApiError::bad_request("Current savings cannot be negative")));
    }

    let plan = solve_savings_goal(request.target, request.current, request.years, request.annual_rate)
        .map_err(invalid_input)?;

    Ok(warp::reply::json(&plan))
}
