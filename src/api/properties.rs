use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::api::extract::{Path, Query};
use crate::api::routes::ApiState;
use crate::config::list_page;
use crate::db::models::Property;
use crate::db::properties::{self, PropertyFilter};
use crate::db::query::{PageBounds, Paged};
use crate::db::stats::{self, PropertyStats};
use crate::error::AppError;
use crate::types::{non_empty, PropertyType};

const PAGE: PageBounds = PageBounds::new(list_page::DEFAULT_LIMIT, list_page::MAX_LIMIT);

/// Shared by the list and the stats summary; the summary ignores `limit`/`offset`.
#[derive(Debug, Deserialize)]
pub struct PropertiesQuery {
    pub suburb: Option<String>,
    pub property_type: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PropertiesQuery {
    fn filter(&self) -> Result<PropertyFilter, AppError> {
        Ok(PropertyFilter {
            suburb: non_empty(&self.suburb).map(str::to_string),
            property_type: PropertyType::from_param(self.property_type.as_deref())?,
            min_price: self.min_price,
            max_price: self.max_price,
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}

pub async fn list_properties(
    State(state): State<ApiState>,
    Query(params): Query<PropertiesQuery>,
) -> Result<Json<Paged<Property>>, AppError> {
    let filter = params.filter()?;
    let page = PAGE.page(params.limit, params.offset)?;
    Ok(Json(properties::list_properties(&state.pool, &filter, page).await?))
}

pub async fn get_property(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<Json<Property>, AppError> {
    Ok(Json(properties::get_property(&state.pool, id).await?))
}

pub async fn get_property_stats(
    State(state): State<ApiState>,
    Query(params): Query<PropertiesQuery>,
) -> Result<Json<PropertyStats>, AppError> {
    let filter = params.filter()?;
    Ok(Json(stats::property_stats(&state.pool, &filter).await?))
}
