use axum::{extract::State, Json};
use serde::Deserialize;

use crate::api::extract::{Path, Query};
use crate::api::routes::ApiState;
use crate::config::list_page;
use crate::db::models::QuarterlyStat;
use crate::db::quarterly::{self, QuarterlyFilter, SuburbQuarterlyFilter};
use crate::db::query::{PageBounds, Paged};
use crate::error::AppError;
use crate::types::{non_empty, PropertyType};

const PAGE: PageBounds = PageBounds::new(list_page::DEFAULT_LIMIT, list_page::MAX_LIMIT);

#[derive(Debug, Deserialize)]
pub struct QuarterlyQuery {
    pub suburb: Option<String>,
    pub property_type: Option<String>,
    pub year: Option<i64>,
    pub quarter: Option<i64>,
    pub start_year: Option<i64>,
    pub end_year: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SuburbQuarterlyQuery {
    pub property_type: Option<String>,
    pub start_year: Option<i64>,
    pub end_year: Option<i64>,
}

pub async fn list_quarterly(
    State(state): State<ApiState>,
    Query(params): Query<QuarterlyQuery>,
) -> Result<Json<Paged<QuarterlyStat>>, AppError> {
    let filter = QuarterlyFilter {
        suburb: non_empty(&params.suburb).map(str::to_string),
        property_type: PropertyType::from_param(params.property_type.as_deref())?,
        year: params.year,
        quarter: params.quarter,
        start_year: params.start_year,
        end_year: params.end_year,
    };
    let page = PAGE.page(params.limit, params.offset)?;
    Ok(Json(quarterly::list_quarterly(&state.pool, &filter, page).await?))
}

pub async fn get_suburb_quarterly(
    State(state): State<ApiState>,
    Path(suburb): Path<String>,
    Query(params): Query<SuburbQuarterlyQuery>,
) -> Result<Json<Vec<QuarterlyStat>>, AppError> {
    let filter = SuburbQuarterlyFilter {
        property_type: PropertyType::from_param(params.property_type.as_deref())?,
        start_year: params.start_year,
        end_year: params.end_year,
    };
    Ok(Json(
        quarterly::suburb_quarterly(&state.pool, &suburb, &filter).await?,
    ))
}
