//! Conjunctive WHERE-clause builder.
//!
//! Column names are `&'static str` chosen by the resource services; client input only
//! ever reaches the database as a bound parameter.

use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite};

use crate::types::PropertyType;

/// Value bound to a single placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Int(i64),
    Float(f64),
    Date(NaiveDate),
}

impl From<String> for BindValue {
    fn from(v: String) -> Self {
        BindValue::Text(v)
    }
}

impl From<&str> for BindValue {
    fn from(v: &str) -> Self {
        BindValue::Text(v.to_string())
    }
}

impl From<i64> for BindValue {
    fn from(v: i64) -> Self {
        BindValue::Int(v)
    }
}

impl From<f64> for BindValue {
    fn from(v: f64) -> Self {
        BindValue::Float(v)
    }
}

impl From<NaiveDate> for BindValue {
    fn from(v: NaiveDate) -> Self {
        BindValue::Date(v)
    }
}

impl From<PropertyType> for BindValue {
    fn from(v: PropertyType) -> Self {
        BindValue::Text(v.as_str().to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Gte,
    Lte,
    /// Substring match; the bound value already carries the `%` wildcards.
    Like,
}

impl Op {
    fn sql(self) -> &'static str {
        match self {
            Op::Eq => " = ",
            Op::Gte => " >= ",
            Op::Lte => " <= ",
            Op::Like => " LIKE ",
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Op::Like => " ESCAPE '\\'",
            _ => "",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Condition {
    pub column: &'static str,
    pub op: Op,
    /// Parameter name the value came from, e.g. `min_price` for `sale_price >= ?`.
    pub param: &'static str,
    pub value: BindValue,
}

#[derive(Debug, Clone, Default)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, column: &'static str, op: Op, param: &'static str, value: BindValue) -> Self {
        self.conditions.push(Condition {
            column,
            op,
            param,
            value,
        });
        self
    }

    pub fn eq(self, column: &'static str, value: impl Into<BindValue>) -> Self {
        self.push(column, Op::Eq, column, value.into())
    }

    pub fn gte(self, column: &'static str, param: &'static str, value: impl Into<BindValue>) -> Self {
        self.push(column, Op::Gte, param, value.into())
    }

    pub fn lte(self, column: &'static str, param: &'static str, value: impl Into<BindValue>) -> Self {
        self.push(column, Op::Lte, param, value.into())
    }

    /// `column LIKE '%term%'`, with LIKE metacharacters in `term` matched literally.
    pub fn contains(self, column: &'static str, param: &'static str, term: &str) -> Self {
        let pattern = format!("%{}%", escape_like(term));
        self.push(column, Op::Like, param, BindValue::Text(pattern))
    }

    // Optional variants: `None` leaves the filter untouched.

    pub fn eq_opt<T: Into<BindValue>>(self, column: &'static str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.eq(column, v),
            None => self,
        }
    }

    pub fn gte_opt<T: Into<BindValue>>(
        self,
        column: &'static str,
        param: &'static str,
        value: Option<T>,
    ) -> Self {
        match value {
            Some(v) => self.gte(column, param, v),
            None => self,
        }
    }

    pub fn lte_opt<T: Into<BindValue>>(
        self,
        column: &'static str,
        param: &'static str,
        value: Option<T>,
    ) -> Self {
        match value {
            Some(v) => self.lte(column, param, v),
            None => self,
        }
    }

    /// The predicate with `?` placeholders, `1=1` when there are no conditions.
    pub fn predicate(&self) -> String {
        if self.conditions.is_empty() {
            return "1=1".to_string();
        }
        self.conditions
            .iter()
            .map(|c| format!("{}{}?{}", c.column, c.op.sql(), c.op.suffix()))
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    /// Parameter names and values, in placeholder order.
    pub fn bindings(&self) -> Vec<(&'static str, &BindValue)> {
        self.conditions.iter().map(|c| (c.param, &c.value)).collect()
    }

    /// Appends ` WHERE <predicate>` to `qb`, binding every value.
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        qb.push(" WHERE ");
        if self.conditions.is_empty() {
            qb.push("1=1");
            return;
        }
        for (i, c) in self.conditions.iter().enumerate() {
            if i > 0 {
                qb.push(" AND ");
            }
            qb.push(c.column);
            qb.push(c.op.sql());
            match &c.value {
                BindValue::Text(s) => qb.push_bind(s.clone()),
                BindValue::Int(n) => qb.push_bind(*n),
                BindValue::Float(x) => qb.push_bind(*x),
                BindValue::Date(d) => qb.push_bind(*d),
            };
            qb.push(c.op.suffix());
        }
    }
}

fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
