use axum::{extract::State, Json};
use serde::Deserialize;

use crate::api::extract::{Path, Query};
use crate::api::routes::ApiState;
use crate::config::{list_page, search_page};
use crate::db::analytics::{self, AnalyticsFilter, AnalyticsSort, SuburbSearch};
use crate::db::models::SuburbAnalytics;
use crate::db::query::{PageBounds, Paged};
use crate::error::AppError;
use crate::types::{non_empty, PropertyType, SortDirection};

const PAGE: PageBounds = PageBounds::new(list_page::DEFAULT_LIMIT, list_page::MAX_LIMIT);
const SEARCH_PAGE: PageBounds = PageBounds::new(search_page::DEFAULT_LIMIT, search_page::MAX_LIMIT);

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    pub suburb: Option<String>,
    pub property_type: Option<String>,
    /// Lower bound on current_median_price.
    pub min_price: Option<f64>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SuburbAnalyticsQuery {
    pub property_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub limit: Option<i64>,
}

pub async fn list_analytics(
    State(state): State<ApiState>,
    Query(params): Query<AnalyticsQuery>,
) -> Result<Json<Paged<SuburbAnalytics>>, AppError> {
    let filter = AnalyticsFilter {
        suburb: non_empty(&params.suburb).map(str::to_string),
        property_type: PropertyType::from_param(params.property_type.as_deref())?,
        min_price: params.min_price,
    };
    let sort = AnalyticsSort::from_param(params.sort_by.as_deref())?;
    let direction = SortDirection::from_param(params.order.as_deref())?;
    let page = PAGE.page(params.limit, params.offset)?;
    Ok(Json(
        analytics::list_analytics(&state.pool, &filter, sort, direction, page).await?,
    ))
}

pub async fn get_suburb_analytics(
    State(state): State<ApiState>,
    Path(suburb): Path<String>,
    Query(params): Query<SuburbAnalyticsQuery>,
) -> Result<Json<Vec<SuburbAnalytics>>, AppError> {
    let property_type = PropertyType::from_param(params.property_type.as_deref())?;
    Ok(Json(
        analytics::suburb_analytics(&state.pool, &suburb, property_type).await?,
    ))
}

pub async fn search_suburbs(
    State(state): State<ApiState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SuburbSearch>, AppError> {
    let term = non_empty(&params.q)
        .ok_or_else(|| AppError::Validation("q is required and must not be empty".to_string()))?;
    let page = SEARCH_PAGE.page(params.limit, None)?;
    Ok(Json(
        analytics::search_suburbs(&state.pool, term, page.limit).await?,
    ))
}
