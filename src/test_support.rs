//! In-memory store and row seeding shared by the unit tests.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

const SCHEMA: &str = include_str!("db/schema.sql");

/// A single-connection in-memory pool with the reference schema applied.
/// One connection keeps every query on the same in-memory database.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory sqlite");
    sqlx::raw_sql(SCHEMA)
        .execute(&pool)
        .await
        .expect("apply schema");
    pool
}

/// Inserts a sale and returns its id. Contract date is one month before settlement.
pub async fn seed_property(
    pool: &SqlitePool,
    suburb: &str,
    property_type: &str,
    sale_price: f64,
    settlement_date: &str,
) -> i64 {
    sqlx::query(
        r#"
        INSERT INTO properties (
            suburb, postcode, district, property_type,
            listing_date, contract_date, settlement_date,
            sale_price, days_on_market, contract_to_settlement_days
        ) VALUES (?, '2000', 'Inner', ?, NULL, date(?, '-1 month'), ?, ?, 21, 30)
        "#,
    )
    .bind(suburb)
    .bind(property_type)
    .bind(settlement_date)
    .bind(settlement_date)
    .bind(sale_price)
    .execute(pool)
    .await
    .expect("insert property")
    .last_insert_rowid()
}

pub async fn seed_quarterly(
    pool: &SqlitePool,
    suburb: &str,
    property_type: &str,
    year: i64,
    quarter: i64,
    median_price: f64,
) {
    let month = (quarter - 1) * 3 + 1;
    let quarter_start = format!("{year}-{month:02}-01");
    sqlx::query(
        r#"
        INSERT INTO suburb_quarterly (
            suburb, property_type, year, quarter, quarter_start,
            num_sales, median_price, mean_price
        ) VALUES (?, ?, ?, ?, ?, 12, ?, ?)
        "#,
    )
    .bind(suburb)
    .bind(property_type)
    .bind(year)
    .bind(quarter)
    .bind(quarter_start)
    .bind(median_price)
    .bind(median_price * 1.05)
    .execute(pool)
    .await
    .expect("insert quarterly");
}

/// Inserts an analytics row. Ranks are supplied by the caller as the external job would.
pub async fn seed_analytics(
    pool: &SqlitePool,
    suburb: &str,
    property_type: &str,
    current_median_price: f64,
    price_rank: i64,
    growth_rank: i64,
    speed_rank: i64,
) {
    sqlx::query(
        r#"
        INSERT INTO suburb_analytics (
            suburb, property_type, last_updated, current_quarter,
            current_median_price, current_num_sales,
            growth_1yr_percentage, price_rank, growth_rank, speed_rank,
            price_quarterly
        ) VALUES (?, ?, '2025-01-15 03:00:00', '2024Q4', ?, 40, 4.5, ?, ?, ?, '[{"q":"2024Q4"}]')
        "#,
    )
    .bind(suburb)
    .bind(property_type)
    .bind(current_median_price)
    .bind(price_rank)
    .bind(growth_rank)
    .bind(speed_rank)
    .execute(pool)
    .await
    .expect("insert analytics");
}
