//! # Pagination & Sorting
//!
//! List requests carry `page` (0-based), `size` and any number of
//! `sort=property[,property...][,asc|desc]` parameters. Sorting works on the
//! serialized (camelCase) representation of an entity, so any field a client
//! can see is a field it can sort by, with no per-entity code.
//!
//! Rows that compare equal keep their storage order (ascending id), which makes
//! pages stable across requests.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;

/// Default number of rows per page when the client omits `size`.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub property: String,
    pub direction: Direction,
}

impl SortOrder {
    pub fn asc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Desc,
        }
    }

    /// Parses one `sort` parameter value. `name,id,desc` sorts both properties descending.
    pub fn parse(value: &str) -> Result<Vec<SortOrder>, PageError> {
        let mut parts: Vec<&str> = value
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        let direction = match parts.last().map(|p| p.to_ascii_lowercase()) {
            Some(last) if last == "desc" => {
                parts.pop();
                Direction::Desc
            }
            Some(last) if last == "asc" => {
                parts.pop();
                Direction::Asc
            }
            _ => Direction::Asc,
        };

        if parts.is_empty() {
            return Err(PageError::EmptySort(value.to_string()));
        }

        Ok(parts
            .into_iter()
            .map(|property| SortOrder {
                property: property.to_string(),
                direction,
            })
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    #[error("Invalid value '{value}' for query parameter '{param}'")]
    InvalidNumber { param: &'static str, value: String },
    #[error("Sort parameter '{0}' names no property")]
    EmptySort(String),
}

/// A requested slice of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Vec<SortOrder>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.max(1),
            sort: Vec::new(),
        }
    }

    pub fn sorted_by(mut self, order: SortOrder) -> Self {
        self.sort.push(order);
        self
    }

    /// Index of the first row of this page.
    pub fn offset(&self) -> usize {
        (self.page as usize).saturating_mul(self.size as usize)
    }

    /// Builds a request from decoded query pairs. Unknown keys are ignored; `size`
    /// is clamped to `1..=max_size`.
    pub fn from_query<'a, I>(pairs: I, default_size: u32, max_size: u32) -> Result<Self, PageError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut request = PageRequest::new(0, default_size);
        for (key, value) in pairs {
            match key {
                "page" => request.page = parse_number("page", value)?,
                "size" => request.size = parse_number("size", value)?.clamp(1, max_size.max(1)),
                "sort" => request.sort.extend(SortOrder::parse(value)?),
                _ => {}
            }
        }
        Ok(request)
    }

    /// Sorts `rows` by this request's orders and cuts out the requested page.
    pub fn apply<T: Serialize>(&self, rows: Vec<T>) -> Page<T> {
        let total = rows.len() as u64;
        let rows = if self.sort.is_empty() {
            rows
        } else {
            sort_rows(rows, &self.sort)
        };
        let items = rows
            .into_iter()
            .skip(self.offset())
            .take(self.size as usize)
            .collect();
        Page {
            items,
            total,
            page: self.page,
            size: self.size,
        }
    }
}

fn parse_number(param: &'static str, value: &str) -> Result<u32, PageError> {
    value.trim().parse().map_err(|_| PageError::InvalidNumber {
        param,
        value: value.to_string(),
    })
}

/// One page of rows plus the size of the whole result.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u32 {
        if self.size == 0 {
            return 0;
        }
        u32::try_from(self.total.div_ceil(self.size as u64)).unwrap_or(u32::MAX)
    }

    pub fn has_next(&self) -> bool {
        self.page.saturating_add(1) < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            size: self.size,
        }
    }
}

fn sort_rows<T: Serialize>(rows: Vec<T>, orders: &[SortOrder]) -> Vec<T> {
    let mut keyed: Vec<(Value, T)> = rows
        .into_iter()
        .map(|row| (serde_json::to_value(&row).unwrap_or(Value::Null), row))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        orders
            .iter()
            .map(|order| {
                let ordering = compare_values(
                    a.get(&order.property).unwrap_or(&Value::Null),
                    b.get(&order.property).unwrap_or(&Value::Null),
                );
                match order.direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            })
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });

    keyed.into_iter().map(|(_, row)| row).collect()
}

fn instant(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).ok()
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over JSON scalars: null < bool < number < string. Containers compare equal.
/// Two RFC 3339 strings compare as instants, whatever their fractional precision.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => match (instant(x), instant(y)) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => x.cmp(y),
        },
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, Serialize)]
    struct Row {
        id: i64,
        name: Option<&'static str>,
        amount: f64,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { id: 1, name: Some("b"), amount: 3.0 },
            Row { id: 2, name: None, amount: 1.0 },
            Row { id: 3, name: Some("a"), amount: 3.0 },
            Row { id: 4, name: Some("c"), amount: 2.5 },
        ]
    }

    fn ids(page: &Page<Row>) -> Vec<i64> {
        page.items.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_parse_sort_variants() {
        assert_eq!(SortOrder::parse("name").unwrap(), vec![SortOrder::asc("name")]);
        assert_eq!(SortOrder::parse("name,DESC").unwrap(), vec![SortOrder::desc("name")]);
        assert_eq!(
            SortOrder::parse("name,id,desc").unwrap(),
            vec![SortOrder::desc("name"), SortOrder::desc("id")]
        );
        assert!(matches!(SortOrder::parse(",desc"), Err(PageError::EmptySort(_))));
    }

    #[test]
    fn test_from_query_reads_known_keys_and_clamps_size() {
        let pairs = vec![
            ("page", "2"),
            ("size", "5000"),
            ("sort", "name,desc"),
            ("sort", "id"),
            ("eagerload", "true"),
        ];
        let request = PageRequest::from_query(pairs, 20, 100).unwrap();
        assert_eq!(request.page, 2);
        assert_eq!(request.size, 100);
        assert_eq!(request.sort, vec![SortOrder::desc("name"), SortOrder::asc("id")]);

        let zero = PageRequest::from_query(vec![("size", "0")], 20, 100).unwrap();
        assert_eq!(zero.size, 1);
    }

    #[test]
    fn test_from_query_rejects_non_numeric_page() {
        let err = PageRequest::from_query(vec![("page", "first")], 20, 100).unwrap_err();
        assert_eq!(
            err,
            PageError::InvalidNumber {
                param: "page",
                value: "first".into()
            }
        );
    }

    #[test]
    fn test_unsorted_keeps_storage_order() {
        let page = PageRequest::new(0, 10).apply(rows());
        assert_eq!(ids(&page), vec![1, 2, 3, 4]);
        assert_eq!(page.total, 4);
    }

    #[test]
    fn test_sort_by_string_puts_nulls_first() {
        let page = PageRequest::new(0, 10)
            .sorted_by(SortOrder::asc("name"))
            .apply(rows());
        assert_eq!(ids(&page), vec![2, 3, 1, 4]);
    }

    #[test]
    fn test_multi_key_sort_with_stable_ties() {
        let page = PageRequest::new(0, 10)
            .sorted_by(SortOrder::desc("amount"))
            .apply(rows());
        assert_eq!(ids(&page), vec![1, 3, 4, 2]);

        let page = PageRequest::new(0, 10)
            .sorted_by(SortOrder::desc("amount"))
            .sorted_by(SortOrder::asc("name"))
            .apply(rows());
        assert_eq!(ids(&page), vec![3, 1, 4, 2]);
    }

    #[test]
    fn test_slicing_and_page_arithmetic() {
        let page = PageRequest::new(1, 3).apply(rows());
        assert_eq!(ids(&page), vec![4]);
        assert_eq!(page.total_pages(), 2);
        assert!(!page.has_next());
        assert!(page.has_previous());

        let beyond = PageRequest::new(5, 3).apply(rows());
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, 4);
    }

    #[test]
    fn test_compare_values_ranks_types() {
        assert_eq!(compare_values(&json!(null), &json!(false)), Ordering::Less);
        assert_eq!(compare_values(&json!(10), &json!(9.5)), Ordering::Greater);
        assert_eq!(compare_values(&json!("a"), &json!(1)), Ordering::Greater);
        assert_eq!(compare_values(&json!([1]), &json!([2])), Ordering::Equal);
    }

    #[test]
    fn test_instants_compare_by_time_not_text() {
        // "...00.5Z" < "...00Z" as text, but it is half a second later.
        assert_eq!(
            compare_values(&json!("2024-01-01T00:00:00.5Z"), &json!("2024-01-01T00:00:00Z")),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(&json!("2024-01-01T01:00:00+01:00"), &json!("2024-01-01T00:00:00Z")),
            Ordering::Equal
        );
        assert_eq!(compare_values(&json!("b"), &json!("a")), Ordering::Greater);
    }

    #[test]
    fn test_last_representable_page_does_not_overflow() {
        let page = PageRequest::new(u32::MAX, 20).apply(rows());
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages(), 1);
        assert!(!page.has_next());
        assert!(page.has_previous());

        let huge = PageRequest::new(u32::MAX, u32::MAX);
        assert_eq!(huge.offset(), u32::MAX as usize * u32::MAX as usize);
    }
}
