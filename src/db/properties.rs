use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::db::filter::Filter;
use crate::db::models::Property;
use crate::db::query::{self, OrderBy, Page, Paged};
use crate::error::{AppError, Result};
use crate::types::PropertyType;

/// Newest settlements first; id breaks ties between same-day sales.
const ORDER: &[OrderBy] = &[OrderBy::desc("settlement_date"), OrderBy::desc("id")];

/// Filters accepted by the property list and the stats summary.
#[derive(Debug, Clone, Default)]
pub struct PropertyFilter {
    pub suburb: Option<String>,
    pub property_type: Option<PropertyType>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Inclusive lower bound on settlement_date.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on settlement_date.
    pub end_date: Option<NaiveDate>,
}

impl PropertyFilter {
    pub fn to_filter(&self) -> Filter {
        Filter::new()
            .eq_opt("suburb", self.suburb.clone())
            .eq_opt("property_type", self.property_type)
            .gte_opt("sale_price", "min_price", self.min_price)
            .lte_opt("sale_price", "max_price", self.max_price)
            .gte_opt("settlement_date", "start_date", self.start_date)
            .lte_opt("settlement_date", "end_date", self.end_date)
    }
}

pub async fn list_properties(
    pool: &SqlitePool,
    filter: &PropertyFilter,
    page: Page,
) -> Result<Paged<Property>> {
    query::fetch_page(pool, &filter.to_filter(), ORDER, page).await
}

pub async fn get_property(pool: &SqlitePool, id: i64) -> Result<Property> {
    query::fetch_optional(pool, &Filter::new().eq("id", id))
        .await?
        .ok_or_else(|| AppError::NotFound("Property not found".to_string()))
}
