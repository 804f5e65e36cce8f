/// Trait for accessing application rows as tree nodes.
///
/// A row is arbitrary application data plus zero or more named child
/// collections. Each entry of a grouping spec names the collection that
/// holds the next nesting level.
///
/// Implementors are cheap handles (`&Value`, arena indices, `Rc`s); the
/// flattener clones them freely while walking the tree.
pub trait RowData: Clone {
    /// Returns the number of children stored under `collection`.
    ///
    /// `None` means the row has no such collection, or the value stored under
    /// that name is not a list. Both cases are treated as "no children".
    fn child_count(&self, collection: &str) -> Option<usize>;

    /// Returns the child at `index` inside `collection`.
    fn child_at(&self, collection: &str, index: usize) -> Option<Self>;

    /// Returns a copy of the attribute stored under `key`.
    fn attr(&self, key: &str) -> Option<serde_json::Value>;
}

impl<'a> RowData for &'a serde_json::Value {
    #[inline]
    fn child_count(&self, collection: &str) -> Option<usize> {
        self.get(collection)?.as_array().map(|children| children.len())
    }

    #[inline]
    fn child_at(&self, collection: &str, index: usize) -> Option<Self> {
        self.get(collection)?.as_array()?.get(index)
    }

    fn attr(&self, key: &str) -> Option<serde_json::Value> {
        self.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_row_children() {
        let row = json!({"name": "north", "stores": [{"name": "a"}, {"name": "b"}]});
        let row_ref = &row;

        assert_eq!(row_ref.child_count("stores"), Some(2));
        assert_eq!(
            row_ref.child_at("stores", 1).and_then(|c| c.attr("name")),
            Some(json!("b"))
        );
        assert!(row_ref.child_at("stores", 2).is_none());
    }

    #[test]
    fn test_non_array_collection_is_no_children() {
        let row = json!({"stores": {"not": "a list"}, "empty": []});
        let row_ref = &row;

        assert_eq!(row_ref.child_count("stores"), None);
        assert_eq!(row_ref.child_count("missing"), None);
        assert_eq!(row_ref.child_count("empty"), Some(0));
    }
}
