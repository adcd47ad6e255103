//! Generic filtered-list executor shared by every resource table.

use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::db::filter::Filter;
use crate::error::{AppError, Result};
use crate::types::SortDirection;

/// A table whose rows map onto `Self` by column name.
pub trait Resource: for<'r> FromRow<'r, SqliteRow> + Send + Unpin {
    const TABLE: &'static str;
    /// Select list; every entry must name a field of `Self`.
    const COLUMNS: &'static [&'static str];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: &'static str,
    pub direction: SortDirection,
}

impl OrderBy {
    pub const fn asc(column: &'static str) -> Self {
        Self {
            column,
            direction: SortDirection::Asc,
        }
    }

    pub const fn desc(column: &'static str) -> Self {
        Self {
            column,
            direction: SortDirection::Desc,
        }
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    pub default_limit: i64,
    pub max_limit: i64,
}

impl PageBounds {
    pub const fn new(default_limit: i64, max_limit: i64) -> Self {
        Self {
            default_limit,
            max_limit,
        }
    }

    /// Validates client pagination, filling in defaults.
    pub fn page(&self, limit: Option<i64>, offset: Option<i64>) -> Result<Page> {
        let limit = limit.unwrap_or(self.default_limit);
        if !(1..=self.max_limit).contains(&limit) {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {}",
                self.max_limit
            )));
        }
        let offset = offset.unwrap_or(0);
        if offset < 0 {
            return Err(AppError::Validation(
                "offset must be greater than or equal to 0".to_string(),
            ));
        }
        Ok(Page { limit, offset })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

/// List envelope returned by every paginated endpoint.
#[derive(Debug, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

// ---------------------------------------------------------------------------
// SQL assembly
// ---------------------------------------------------------------------------

fn select<R: Resource>(filter: &Filter, order: &[OrderBy]) -> QueryBuilder<'static, Sqlite> {
    let mut qb = QueryBuilder::new("SELECT ");
    qb.push(R::COLUMNS.join(", "));
    qb.push(" FROM ");
    qb.push(R::TABLE);
    filter.push_where(&mut qb);
    push_order(&mut qb, order);
    qb
}

fn count<R: Resource>(filter: &Filter) -> QueryBuilder<'static, Sqlite> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM ");
    qb.push(R::TABLE);
    filter.push_where(&mut qb);
    qb
}

pub fn push_order(qb: &mut QueryBuilder<'_, Sqlite>, order: &[OrderBy]) {
    for (i, o) in order.iter().enumerate() {
        qb.push(if i == 0 { " ORDER BY " } else { ", " });
        qb.push(o.column);
        qb.push(" ");
        qb.push(o.direction.as_sql());
    }
}

fn log_query(qb: &QueryBuilder<'_, Sqlite>, filter: &Filter) {
    let params: Vec<&str> = filter.bindings().iter().map(|(name, _)| *name).collect();
    debug!(sql = qb.sql(), predicate = %filter.predicate(), ?params, "query");
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// Count + one page of rows, both on a single pooled connection.
pub async fn fetch_page<R: Resource>(
    pool: &SqlitePool,
    filter: &Filter,
    order: &[OrderBy],
    page: Page,
) -> Result<Paged<R>> {
    let mut conn = pool.acquire().await?;

    let mut count_qb = count::<R>(filter);
    log_query(&count_qb, filter);
    let total: i64 = count_qb
        .build_query_scalar::<i64>()
        .fetch_one(&mut *conn)
        .await?;

    let mut qb = select::<R>(filter, order);
    qb.push(" LIMIT ");
    qb.push_bind(page.limit);
    qb.push(" OFFSET ");
    qb.push_bind(page.offset);
    log_query(&qb, filter);
    let items = qb.build_query_as::<R>().fetch_all(&mut *conn).await?;

    Ok(Paged {
        items,
        total,
        limit: page.limit,
        offset: page.offset,
    })
}

/// Every matching row, unpaginated.
pub async fn fetch_all<R: Resource>(
    pool: &SqlitePool,
    filter: &Filter,
    order: &[OrderBy],
) -> Result<Vec<R>> {
    let mut qb = select::<R>(filter, order);
    log_query(&qb, filter);
    Ok(qb.build_query_as::<R>().fetch_all(pool).await?)
}

pub async fn fetch_optional<R: Resource>(pool: &SqlitePool, filter: &Filter) -> Result<Option<R>> {
    let mut qb = select::<R>(filter, &[]);
    qb.push(" LIMIT 1");
    log_query(&qb, filter);
    Ok(qb.build_query_as::<R>().fetch_optional(pool).await?)
}
