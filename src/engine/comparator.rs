//! Sort comparators
//!
//! The descending comparator is the exact reverse of the ascending one, and
//! sorting uses the stable `sort_by`, so equal keys keep their pre-sort order
//! in both directions.

use super::value::Row;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> SortOrder {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    /// Arrow shown next to a sorted header
    pub fn indicator(&self) -> &'static str {
        match self {
            SortOrder::Asc => "▲",
            SortOrder::Desc => "▼",
        }
    }
}

/// Build an ordering function over rows for `order_by`.
pub fn build_comparator(order: SortOrder, order_by: &str) -> impl Fn(&Row, &Row) -> Ordering + '_ {
    move |a: &Row, b: &Row| {
        let ascending = a.value(order_by).compare(b.value(order_by));
        match order {
            SortOrder::Asc => ascending,
            SortOrder::Desc => ascending.reverse(),
        }
    }
}

/// Stable-sort row indices into `rows` by `order_by`.
pub fn sort_indices(rows: &[Row], indices: &mut [usize], order: SortOrder, order_by: &str) {
    let compare = build_comparator(order, order_by);
    indices.sort_by(|&a, &b| compare(&rows[a], &rows[b]));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::value::Value;

    fn ids(rows: &[Row], indices: &[usize]) -> Vec<String> {
        indices
            .iter()
            .map(|&i| rows[i].value("id").to_display_string())
            .collect()
    }

    #[test]
    fn test_sort_by_name_both_directions() {
        let rows = vec![
            Row::new().with("id", 1).with("name", "b"),
            Row::new().with("id", 2).with("name", "a"),
        ];
        let mut indices = vec![0, 1];

        sort_indices(&rows, &mut indices, SortOrder::Asc, "name");
        assert_eq!(ids(&rows, &indices), vec!["2", "1"]);

        sort_indices(&rows, &mut indices, SortOrder::Desc, "name");
        assert_eq!(ids(&rows, &indices), vec!["1", "2"]);
    }

    #[test]
    fn test_ties_keep_input_order_in_both_directions() {
        let rows = vec![
            Row::new().with("id", 1).with("group", "x"),
            Row::new().with("id", 2).with("group", "y"),
            Row::new().with("id", 3).with("group", "x"),
            Row::new().with("id", 4).with("group", "y"),
        ];

        let mut asc: Vec<usize> = (0..rows.len()).collect();
        sort_indices(&rows, &mut asc, SortOrder::Asc, "group");
        assert_eq!(ids(&rows, &asc), vec!["1", "3", "2", "4"]);

        let mut desc: Vec<usize> = (0..rows.len()).collect();
        sort_indices(&rows, &mut desc, SortOrder::Desc, "group");
        assert_eq!(ids(&rows, &desc), vec!["2", "4", "1", "3"]);
    }

    #[test]
    fn test_descending_is_negated_ascending() {
        let a = Row::new().with("v", Value::from(3));
        let b = Row::new().with("v", Value::from("text"));
        let c = Row::new();

        for (x, y) in [(&a, &b), (&b, &c), (&a, &c), (&a, &a)] {
            let asc = build_comparator(SortOrder::Asc, "v");
            let desc = build_comparator(SortOrder::Desc, "v");
            assert_eq!(asc(x, y), desc(x, y).reverse());
        }
    }

    #[test]
    fn test_sort_order_serde() {
        assert_eq!(serde_json::to_string(&SortOrder::Desc).unwrap(), r#""desc""#);
        let order: SortOrder = serde_json::from_str(r#""asc""#).unwrap();
        assert_eq!(order, SortOrder::Asc);
        assert_eq!(SortOrder::Asc.toggled(), SortOrder::Desc);
    }
}
