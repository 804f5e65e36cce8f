//! Column sorting for table rows.
//!
//! Sorting is per sibling collection: children are reordered inside their
//! parent and never move across groups.

use rtable::RowData;
use serde_json::Value;
use std::cmp::Ordering;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn arrow(self) -> &'static str {
        match self {
            SortDir::Asc => "⏶",
            SortDir::Desc => "⏷",
        }
    }
}

/// Complete sorting specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortSpec {
    /// Attribute compared between siblings
    pub column: String,
    pub dir: SortDir,
}

impl SortSpec {
    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            dir: SortDir::Asc,
        }
    }

    /// Next spec when the header of `column` is clicked: ascending, then
    /// descending, then unsorted.
    pub fn cycle(current: Option<&SortSpec>, column: &str) -> Option<SortSpec> {
        match current {
            Some(spec) if spec.column == column && spec.dir == SortDir::Asc => Some(SortSpec {
                column: column.to_string(),
                dir: SortDir::Desc,
            }),
            Some(spec) if spec.column == column => None,
            _ => Some(SortSpec::ascending(column)),
        }
    }
}

/// Orders `indices` by the spec's column.
///
/// Stable: rows with equal keys keep their relative order. Rows without the
/// attribute sort after every row that has it, in either direction.
pub fn sort_indices<R: RowData>(siblings: &[R], indices: &mut [usize], spec: &SortSpec) {
    let keys: Vec<Option<Value>> = siblings.iter().map(|row| row.attr(&spec.column)).collect();
    indices.sort_by(|&a, &b| match (&keys[a], &keys[b]) {
        (Some(x), Some(y)) => {
            let ordering = compare_values(x, y);
            match spec.dir {
                SortDir::Asc => ordering,
                SortDir::Desc => ordering.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Total order over JSON scalars.
///
/// Numbers compare numerically, strings case-insensitively; mixed kinds are
/// ranked null < bool < number < string < array < object.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.total_cmp(&y)
        }
        (Value::String(x), Value::String(y)) => x.to_lowercase().cmp(&y.to_lowercase()).then_with(|| x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}
