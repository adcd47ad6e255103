//! Row types for the three read-only tables. Fields bind to columns by name, and each
//! `COLUMNS` list is the select list for its table.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::db::query::Resource;
use crate::types::PropertyType;

/// A single sale transaction.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Property {
    pub id: i64,
    pub suburb: String,
    pub postcode: Option<String>,
    pub district: Option<String>,
    pub property_type: PropertyType,
    pub listing_date: Option<NaiveDate>,
    pub contract_date: NaiveDate,
    pub settlement_date: NaiveDate,
    pub sale_price: f64,
    pub days_on_market: Option<i64>,
    pub contract_to_settlement_days: Option<i64>,
    pub created_at: Option<NaiveDateTime>,
}

impl Resource for Property {
    const TABLE: &'static str = "properties";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "suburb",
        "postcode",
        "district",
        "property_type",
        "listing_date",
        "contract_date",
        "settlement_date",
        "sale_price",
        "days_on_market",
        "contract_to_settlement_days",
        "created_at",
    ];
}

/// Rollup of one (suburb, property_type, year, quarter) bucket.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct QuarterlyStat {
    pub id: i64,
    pub suburb: String,
    pub property_type: PropertyType,
    pub year: i64,
    pub quarter: i64,
    pub quarter_start: NaiveDate,
    pub num_sales: i64,
    pub median_price: Option<f64>,
    pub median_price_smoothed: Option<f64>,
    pub mean_price: Option<f64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub price_stddev: Option<f64>,
    pub price_p25: Option<f64>,
    pub price_p75: Option<f64>,
    pub median_ctsd: Option<f64>,
    pub mean_ctsd: Option<f64>,
    pub fast_sales_percentage: Option<f64>,
    pub fast_settlements_percentage: Option<f64>,
    pub liquidity_score: Option<f64>,
    pub contract_to_settlement_score: Option<f64>,
    pub qoq_price_change_percentage: Option<f64>,
    pub yoy_price_change_percentage: Option<f64>,
    pub created_at: Option<NaiveDateTime>,
}

impl Resource for QuarterlyStat {
    const TABLE: &'static str = "suburb_quarterly";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "suburb",
        "property_type",
        "year",
        "quarter",
        "quarter_start",
        "num_sales",
        "median_price",
        "median_price_smoothed",
        "mean_price",
        "min_price",
        "max_price",
        "price_stddev",
        "price_p25",
        "price_p75",
        "median_ctsd",
        "mean_ctsd",
        "fast_sales_percentage",
        "fast_settlements_percentage",
        "liquidity_score",
        "contract_to_settlement_score",
        "qoq_price_change_percentage",
        "yoy_price_change_percentage",
        "created_at",
    ];
}

/// All-history summary for one (suburb, property_type), refreshed externally.
///
/// `price_quarterly` and `ctsd_quarterly` are serialized series kept as opaque strings.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct SuburbAnalytics {
    pub suburb: String,
    pub property_type: PropertyType,
    pub last_updated: Option<NaiveDateTime>,
    pub current_quarter: Option<String>,
    pub current_median_price: Option<f64>,
    pub current_median_price_smoothed: Option<f64>,
    pub current_avg_ctsd: Option<f64>,
    pub current_num_sales: Option<i64>,

    pub growth_1yr_percentage: Option<f64>,
    pub growth_3yr_percentage: Option<f64>,
    pub growth_5yr_percentage: Option<f64>,
    pub growth_10yr_percentage: Option<f64>,
    pub growth_since_2005_percentage: Option<f64>,
    pub cagr_5yr: Option<f64>,
    pub cagr_10yr: Option<f64>,
    pub growth_1yr_percentage_smoothed: Option<f64>,
    pub growth_3yr_percentage_smoothed: Option<f64>,
    pub growth_5yr_percentage_smoothed: Option<f64>,
    pub growth_10yr_percentage_smoothed: Option<f64>,
    pub growth_since_2005_percentage_smoothed: Option<f64>,
    pub cagr_5yr_smoothed: Option<f64>,
    pub cagr_10yr_smoothed: Option<f64>,

    pub volatility_score: Option<f64>,
    pub max_drawdown_pct: Option<f64>,
    pub recovery_quarters: Option<i64>,
    pub avg_quarterly_volume: Option<i64>,
    pub overall_liquidity_score: Option<f64>,
    pub market_health_score: Option<f64>,

    pub q1_avg_premium_percentage: Option<f64>,
    pub q2_avg_premium_percentage: Option<f64>,
    pub q3_avg_premium_percentage: Option<f64>,
    pub q4_avg_premium_percentage: Option<f64>,
    pub best_quarter_to_sell: Option<String>,

    pub forecast_q1_price: Option<f64>,
    pub forecast_q1_lower: Option<f64>,
    pub forecast_q1_upper: Option<f64>,
    pub forecast_q2_price: Option<f64>,
    pub forecast_q2_lower: Option<f64>,
    pub forecast_q2_upper: Option<f64>,

    pub price_rank: Option<i64>,
    pub growth_rank: Option<i64>,
    pub speed_rank: Option<i64>,

    pub total_quarters_with_data: Option<i64>,
    pub data_completeness_percentage: Option<f64>,
    pub price_quarterly: Option<String>,
    pub ctsd_quarterly: Option<String>,
}

impl Resource for SuburbAnalytics {
    const TABLE: &'static str = "suburb_analytics";
    const COLUMNS: &'static [&'static str] = &[
        "suburb",
        "property_type",
        "last_updated",
        "current_quarter",
        "current_median_price",
        "current_median_price_smoothed",
        "current_avg_ctsd",
        "current_num_sales",
        "growth_1yr_percentage",
        "growth_3yr_percentage",
        "growth_5yr_percentage",
        "growth_10yr_percentage",
        "growth_since_2005_percentage",
        "cagr_5yr",
        "cagr_10yr",
        "growth_1yr_percentage_smoothed",
        "growth_3yr_percentage_smoothed",
        "growth_5yr_percentage_smoothed",
        "growth_10yr_percentage_smoothed",
        "growth_since_2005_percentage_smoothed",
        "cagr_5yr_smoothed",
        "cagr_10yr_smoothed",
        "volatility_score",
        "max_drawdown_pct",
        "recovery_quarters",
        "avg_quarterly_volume",
        "overall_liquidity_score",
        "market_health_score",
        "q1_avg_premium_percentage",
        "q2_avg_premium_percentage",
        "q3_avg_premium_percentage",
        "q4_avg_premium_percentage",
        "best_quarter_to_sell",
        "forecast_q1_price",
        "forecast_q1_lower",
        "forecast_q1_upper",
        "forecast_q2_price",
        "forecast_q2_lower",
        "forecast_q2_upper",
        "price_rank",
        "growth_rank",
        "speed_rank",
        "total_quarters_with_data",
        "data_completeness_percentage",
        "price_quarterly",
        "ctsd_quarterly",
    ];
}
