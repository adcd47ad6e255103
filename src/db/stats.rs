//! Sale-price summary over a filtered set of properties.

use serde::Serialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::db::models::Property;
use crate::db::properties::PropertyFilter;
use crate::db::query::Resource;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyStats {
    pub total_count: i64,
    pub avg_price: Option<f64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub median_price: Option<f64>,
}

#[derive(Debug, sqlx::FromRow)]
struct PriceAggregate {
    total_count: i64,
    avg_price: Option<f64>,
    min_price: Option<f64>,
    max_price: Option<f64>,
}

/// Row index of the median in an ascending sort: the middle element for odd counts,
/// the upper-middle one for even counts (no interpolation).
pub fn median_offset(count: i64) -> i64 {
    count / 2
}

pub async fn property_stats(pool: &SqlitePool, filter: &PropertyFilter) -> Result<PropertyStats> {
    let filter = filter.to_filter();
    let mut conn = pool.acquire().await?;

    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT COUNT(*) AS total_count, AVG(sale_price) AS avg_price, \
         MIN(sale_price) AS min_price, MAX(sale_price) AS max_price FROM ",
    );
    qb.push(Property::TABLE);
    filter.push_where(&mut qb);
    debug!(sql = qb.sql(), "aggregate");
    let agg: PriceAggregate = qb.build_query_as::<PriceAggregate>().fetch_one(&mut *conn).await?;

    let median_price = if agg.total_count > 0 {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT sale_price FROM ");
        qb.push(Property::TABLE);
        filter.push_where(&mut qb);
        qb.push(" ORDER BY sale_price ASC LIMIT 1 OFFSET ");
        qb.push_bind(median_offset(agg.total_count));
        debug!(sql = qb.sql(), "median");
        qb.build_query_scalar::<f64>()
            .fetch_optional(&mut *conn)
            .await?
    } else {
        None
    };

    Ok(PropertyStats {
        total_count: agg.total_count,
        avg_price: agg.avg_price,
        min_price: agg.min_price,
        max_price: agg.max_price,
        median_price,
    })
}
