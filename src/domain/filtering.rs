//! Text filtering for table rows.
//!
//! A row survives the filter when one of its scalar attributes contains the
//! query, or when any row below it (following the grouping spec) does, so
//! matches deep in the tree keep their ancestors visible.

use rtable::RowData;
use serde_json::Value;

/// Case-insensitive substring filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFilter {
    needle: String,
}

impl TextFilter {
    /// Returns `None` for a blank query.
    pub fn new(query: &str) -> Option<Self> {
        let needle = query.trim().to_lowercase();
        (!needle.is_empty()).then_some(Self { needle })
    }

    /// Checks the row's own attributes.
    ///
    /// # Arguments
    /// * `row` - The row to test
    /// * `columns` - Attribute names to look at
    pub fn matches_row<R: RowData>(&self, row: &R, columns: &[String]) -> bool {
        columns
            .iter()
            .filter_map(|column| row.attr(column))
            .any(|value| self.matches_value(&value))
    }

    /// Checks the row and its descendants below `depth`.
    pub fn matches_subtree<R: RowData>(&self, row: &R, depth: usize, grouping: &[String], columns: &[String]) -> bool {
        let mut stack = vec![(row.clone(), depth)];
        while let Some((current, depth)) = stack.pop() {
            if self.matches_row(&current, columns) {
                return true;
            }
            let Some(collection) = grouping.get(depth) else {
                continue;
            };
            let count = current.child_count(collection).unwrap_or(0);
            for index in 0..count {
                if let Some(child) = current.child_at(collection, index) {
                    stack.push((child, depth + 1));
                }
            }
        }
        false
    }

    fn matches_value(&self, value: &Value) -> bool {
        match value {
            Value::String(s) => s.to_lowercase().contains(&self.needle),
            Value::Number(n) => n.to_string().contains(&self.needle),
            Value::Bool(b) => b.to_string() == self.needle,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_blank_query() {
        assert!(TextFilter::new("   ").is_none());
    }

    #[test]
    fn test_matches_row_attributes() {
        let filter = TextFilter::new("Wid").unwrap();
        let row = json!({"product": "Widget", "quantity": 4});
        assert!(filter.matches_row(&&row, &columns(&["product"])));
        assert!(!filter.matches_row(&&row, &columns(&["quantity"])));

        let number = TextFilter::new("4").unwrap();
        assert!(number.matches_row(&&row, &columns(&["quantity"])));
    }

    #[test]
    fn test_descendant_match_keeps_ancestor() {
        let filter = TextFilter::new("gizmo").unwrap();
        let grouping = columns(&["stores", "orders"]);
        let row = json!({"name": "North", "stores": [
            {"name": "n1", "orders": [{"product": "Gizmo"}]}
        ]});
        let cols = columns(&["name", "product"]);
        assert!(filter.matches_subtree(&&row, 0, &grouping, &cols));
        // Below the grouping spec nothing is searched
        assert!(!filter.matches_subtree(&&row, 0, &grouping[..1], &cols));
    }
}
