use serde::Serialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::str::FromStr;
use tracing::debug;

use crate::db::filter::Filter;
use crate::db::models::SuburbAnalytics;
use crate::db::query::{self, OrderBy, Page, Paged, Resource};
use crate::error::{AppError, Result};
use crate::types::{PropertyType, SortDirection};

/// Client-selectable sort keys for the analytics list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalyticsSort {
    #[default]
    Suburb,
    PriceRank,
    GrowthRank,
    SpeedRank,
    CurrentMedianPrice,
}

impl AnalyticsSort {
    pub const ALL: [AnalyticsSort; 5] = [
        AnalyticsSort::Suburb,
        AnalyticsSort::PriceRank,
        AnalyticsSort::GrowthRank,
        AnalyticsSort::SpeedRank,
        AnalyticsSort::CurrentMedianPrice,
    ];

    /// The parameter spelling doubles as the column name.
    pub fn column(self) -> &'static str {
        match self {
            AnalyticsSort::Suburb => "suburb",
            AnalyticsSort::PriceRank => "price_rank",
            AnalyticsSort::GrowthRank => "growth_rank",
            AnalyticsSort::SpeedRank => "speed_rank",
            AnalyticsSort::CurrentMedianPrice => "current_median_price",
        }
    }

    pub fn from_param(value: Option<&str>) -> Result<Self> {
        match value {
            None | Some("") => Ok(AnalyticsSort::default()),
            Some(s) => s.parse(),
        }
    }

    /// Requested key first, then suburb/property_type so pages never overlap.
    fn order(self, direction: SortDirection) -> Vec<OrderBy> {
        let mut order = vec![OrderBy {
            column: self.column(),
            direction,
        }];
        if self != AnalyticsSort::Suburb {
            order.push(OrderBy::asc("suburb"));
        }
        order.push(OrderBy::asc("property_type"));
        order
    }
}

impl FromStr for AnalyticsSort {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        AnalyticsSort::ALL
            .into_iter()
            .find(|key| key.column() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = AnalyticsSort::ALL.iter().map(|k| k.column()).collect();
                AppError::Validation(format!("sort_by must be one of: {}", valid.join(", ")))
            })
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnalyticsFilter {
    pub suburb: Option<String>,
    pub property_type: Option<PropertyType>,
    /// Lower bound on current_median_price.
    pub min_price: Option<f64>,
}

impl AnalyticsFilter {
    pub fn to_filter(&self) -> Filter {
        Filter::new()
            .eq_opt("suburb", self.suburb.clone())
            .eq_opt("property_type", self.property_type)
            .gte_opt("current_median_price", "min_price", self.min_price)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuburbSearch {
    pub suburbs: Vec<String>,
    pub total: i64,
}

pub async fn list_analytics(
    pool: &SqlitePool,
    filter: &AnalyticsFilter,
    sort: AnalyticsSort,
    direction: SortDirection,
    page: Page,
) -> Result<Paged<SuburbAnalytics>> {
    query::fetch_page(pool, &filter.to_filter(), &sort.order(direction), page).await
}

pub async fn suburb_analytics(
    pool: &SqlitePool,
    suburb: &str,
    property_type: Option<PropertyType>,
) -> Result<Vec<SuburbAnalytics>> {
    let filter = Filter::new()
        .eq("suburb", suburb)
        .eq_opt("property_type", property_type);

    let rows: Vec<SuburbAnalytics> =
        query::fetch_all(pool, &filter, &[OrderBy::asc("property_type")]).await?;
    if rows.is_empty() {
        return Err(AppError::NotFound(format!(
            "Analytics not found for suburb: {suburb}"
        )));
    }
    Ok(rows)
}

/// Distinct suburbs containing `term`, alphabetical, with the uncapped match count.
pub async fn search_suburbs(pool: &SqlitePool, term: &str, limit: i64) -> Result<SuburbSearch> {
    if term.is_empty() {
        return Err(AppError::Validation("q must not be empty".to_string()));
    }
    let filter = Filter::new().contains("suburb", "q", term);
    let mut conn = pool.acquire().await?;

    let mut qb = QueryBuilder::<Sqlite>::new("SELECT DISTINCT suburb FROM ");
    qb.push(SuburbAnalytics::TABLE);
    filter.push_where(&mut qb);
    query::push_order(&mut qb, &[OrderBy::asc("suburb")]);
    qb.push(" LIMIT ");
    qb.push_bind(limit);
    debug!(sql = qb.sql(), "suburb search");
    let suburbs: Vec<String> = qb.build_query_scalar::<String>().fetch_all(&mut *conn).await?;

    let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(DISTINCT suburb) FROM ");
    qb.push(SuburbAnalytics::TABLE);
    filter.push_where(&mut qb);
    let total: i64 = qb.build_query_scalar::<i64>().fetch_one(&mut *conn).await?;

    Ok(SuburbSearch { suburbs, total })
}
