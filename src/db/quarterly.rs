use sqlx::SqlitePool;

use crate::db::filter::Filter;
use crate::db::models::QuarterlyStat;
use crate::db::query::{self, OrderBy, Page, Paged};
use crate::error::{AppError, Result};
use crate::types::PropertyType;

const LIST_ORDER: &[OrderBy] = &[
    OrderBy::desc("year"),
    OrderBy::desc("quarter"),
    OrderBy::asc("suburb"),
];

const SUBURB_ORDER: &[OrderBy] = &[
    OrderBy::asc("property_type"),
    OrderBy::desc("year"),
    OrderBy::desc("quarter"),
];

#[derive(Debug, Clone, Default)]
pub struct QuarterlyFilter {
    pub suburb: Option<String>,
    pub property_type: Option<PropertyType>,
    pub year: Option<i64>,
    pub quarter: Option<i64>,
    pub start_year: Option<i64>,
    pub end_year: Option<i64>,
}

impl QuarterlyFilter {
    pub fn to_filter(&self) -> Result<Filter> {
        if let Some(q) = self.quarter {
            if !(1..=4).contains(&q) {
                return Err(AppError::Validation(
                    "quarter must be between 1 and 4".to_string(),
                ));
            }
        }
        Ok(Filter::new()
            .eq_opt("suburb", self.suburb.clone())
            .eq_opt("property_type", self.property_type)
            .eq_opt("year", self.year)
            .eq_opt("quarter", self.quarter)
            .gte_opt("year", "start_year", self.start_year)
            .lte_opt("year", "end_year", self.end_year))
    }
}

/// Optional narrowing for the per-suburb lookup.
#[derive(Debug, Clone, Default)]
pub struct SuburbQuarterlyFilter {
    pub property_type: Option<PropertyType>,
    pub start_year: Option<i64>,
    pub end_year: Option<i64>,
}

pub async fn list_quarterly(
    pool: &SqlitePool,
    filter: &QuarterlyFilter,
    page: Page,
) -> Result<Paged<QuarterlyStat>> {
    query::fetch_page(pool, &filter.to_filter()?, LIST_ORDER, page).await
}

pub async fn suburb_quarterly(
    pool: &SqlitePool,
    suburb: &str,
    filter: &SuburbQuarterlyFilter,
) -> Result<Vec<QuarterlyStat>> {
    let filter = Filter::new()
        .eq("suburb", suburb)
        .eq_opt("property_type", filter.property_type)
        .gte_opt("year", "start_year", filter.start_year)
        .lte_opt("year", "end_year", filter.end_year);

    let rows: Vec<QuarterlyStat> = query::fetch_all(pool, &filter, SUBURB_ORDER).await?;
    if rows.is_empty() {
        return Err(AppError::NotFound(format!(
            "Quarterly stats not found for suburb: {suburb}"
        )));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{memory_pool, seed_quarterly};

    async fn seeded() -> SqlitePool {
        let pool = memory_pool().await;
        seed_quarterly(&pool, "Ryde", "house", 2023, 4, 1_400_000.0).await;
        seed_quarterly(&pool, "Ryde", "house", 2024, 1, 1_450_000.0).await;
        seed_quarterly(&pool, "Ryde", "unit", 2024, 1, 700_000.0).await;
        seed_quarterly(&pool, "Epping", "house", 2024, 1, 1_600_000.0).await;
        seed_quarterly(&pool, "Epping", "house", 2022, 2, 1_300_000.0).await;
        pool
    }

    fn page() -> Page {
        Page { limit: 100, offset: 0 }
    }

    #[tokio::test]
    async fn list_orders_by_period_then_suburb() {
        let pool = seeded().await;
        let result = list_quarterly(&pool, &QuarterlyFilter::default(), page())
            .await
            .unwrap();

        assert_eq!(result.total, 5);
        let keys: Vec<(i64, i64, &str)> = result
            .items
            .iter()
            .map(|q| (q.year, q.quarter, q.suburb.as_str()))
            .collect();
        assert_eq!(keys[0], (2024, 1, "Epping"));
        assert_eq!(keys[1].2, "Ryde");
        assert_eq!(keys[3], (2023, 4, "Ryde"));
        assert_eq!(keys[4], (2022, 2, "Epping"));
    }

    #[tokio::test]
    async fn year_range_filter() {
        let pool = seeded().await;
        let filter = QuarterlyFilter {
            start_year: Some(2023),
            end_year: Some(2023),
            ..Default::default()
        };
        let result = list_quarterly(&pool, &filter, page()).await.unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.items[0].quarter, 4);
        assert_eq!(result.items[0].quarter_start.to_string(), "2023-10-01");
    }

    #[tokio::test]
    async fn invalid_quarter_is_rejected() {
        let pool = seeded().await;
        let filter = QuarterlyFilter {
            quarter: Some(5),
            ..Default::default()
        };
        let err = list_quarterly(&pool, &filter, page()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn suburb_lookup_groups_by_type_newest_first() {
        let pool = seeded().await;
        let rows = suburb_quarterly(&pool, "Ryde", &SuburbQuarterlyFilter::default())
            .await
            .unwrap();

        let keys: Vec<(PropertyType, i64, i64)> = rows
            .iter()
            .map(|q| (q.property_type, q.year, q.quarter))
            .collect();
        assert_eq!(
            keys,
            vec![
                (PropertyType::House, 2024, 1),
                (PropertyType::House, 2023, 4),
                (PropertyType::Unit, 2024, 1),
            ]
        );
    }

    #[tokio::test]
    async fn suburb_lookup_with_narrowing() {
        let pool = seeded().await;
        let filter = SuburbQuarterlyFilter {
            property_type: Some(PropertyType::House),
            start_year: Some(2024),
            ..Default::default()
        };
        let rows = suburb_quarterly(&pool, "Ryde", &filter).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].median_price, Some(1_450_000.0));
    }

    #[tokio::test]
    async fn unknown_suburb_is_not_found() {
        let pool = seeded().await;
        let err = suburb_quarterly(&pool, "Atlantis", &SuburbQuarterlyFilter::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg.ends_with("Atlantis")));
    }
}
