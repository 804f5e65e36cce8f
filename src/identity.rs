//! Row identity resolution.
//!
//! Every row in the flattened sequence carries a [`RowId`]: one key per
//! nesting level, from the root collection down to the row itself. Equal ids
//! across two data snapshots mean "the same logical row", which is what keeps
//! expansion overrides, runtime state and transition diffs attached to rows
//! while the data underneath is replaced.
//!
//! Without an application-supplied id function the keys are positional
//! indices. Positional identity is fragile: inserting or removing a sibling
//! shifts the ids of every row after it. That mode is kept on purpose and
//! exposed as the default so hosts can opt into stable keys when they have
//! them.

use crate::traits::RowData;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One level of a [`RowId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowKey {
    /// Position of the row inside its sibling collection.
    Index(usize),
    /// Application-supplied key.
    Key(String),
}

impl From<usize> for RowKey {
    fn from(index: usize) -> Self {
        RowKey::Index(index)
    }
}

impl From<&str> for RowKey {
    fn from(key: &str) -> Self {
        RowKey::Key(key.to_string())
    }
}

impl From<String> for RowKey {
    fn from(key: String) -> Self {
        RowKey::Key(key)
    }
}

/// Stable identity path of a row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(Vec<RowKey>);

impl RowId {
    /// Creates the empty id used as the parent of root rows.
    pub fn root() -> Self {
        RowId(Vec::new())
    }

    /// Creates an id from its keys, root level first.
    pub fn from_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<RowKey>,
    {
        RowId(keys.into_iter().map(Into::into).collect())
    }

    /// Returns the keys, root level first.
    pub fn keys(&self) -> &[RowKey] {
        &self.0
    }

    /// Returns the nesting depth of the row (0 for root rows).
    ///
    /// The empty root id also reports depth 0.
    pub fn depth(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// Returns a new id with `key` appended as the next level.
    pub fn child(&self, key: RowKey) -> RowId {
        let mut keys = Vec::with_capacity(self.0.len() + 1);
        keys.extend_from_slice(&self.0);
        keys.push(key);
        RowId(keys)
    }

    /// Returns the id of the parent row, or `None` for root rows.
    pub fn parent(&self) -> Option<RowId> {
        if self.0.len() <= 1 {
            return None;
        }
        Some(RowId(self.0[..self.0.len() - 1].to_vec()))
    }

    /// Returns true if `self` is a strict ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &RowId) -> bool {
        self.0.len() < other.0.len() && other.0.starts_with(&self.0)
    }
}

impl fmt::Display for RowId {
    /// Writes the id as a JSON array, e.g. `[0,"north",3]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Everything an id function may look at when naming a row.
pub struct RowIdContext<'c, R> {
    /// The row being identified
    pub row: &'c R,
    /// Nesting depth (0 for root rows)
    pub depth: usize,
    /// Position inside the current sibling collection
    pub index: usize,
    /// Numeric index per level, ending with `index`
    pub index_path: &'c [usize],
    /// Id of the parent row (empty for root rows)
    pub parent_id: &'c RowId,
}

/// Application-supplied id function: returns the key for one level.
pub type RowIdFn<'f, R> = dyn Fn(&RowIdContext<'_, R>) -> RowKey + 'f;

/// Builds an id function keyed on one attribute of the row.
///
/// String and number attributes become [`RowKey::Key`]; rows without a usable
/// value fall back to their positional index.
pub fn attribute_key<R: RowData>(attribute: &str) -> impl Fn(&RowIdContext<'_, R>) -> RowKey + '_ {
    move |ctx| match ctx.row.attr(attribute) {
        Some(serde_json::Value::String(s)) => RowKey::Key(s),
        Some(serde_json::Value::Number(n)) => RowKey::Key(n.to_string()),
        _ => RowKey::Index(ctx.index),
    }
}

/// Resolves the [`RowId`] of a row.
///
/// Pure: identical inputs always produce identical ids, which lets callers
/// memoize on ids and lets the transition stager diff two passes.
///
/// # Arguments
/// * `ctx` - Row, depth, sibling index, index path and parent id
/// * `id_fn` - Optional application id function; positional keys otherwise
pub fn resolve_row_id<R>(ctx: &RowIdContext<'_, R>, id_fn: Option<&RowIdFn<'_, R>>) -> RowId {
    let key = match id_fn {
        Some(f) => f(ctx),
        None => RowKey::Index(ctx.index),
    };
    ctx.parent_id.child(key)
}

/// One step of a navigation path into the original row tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Index into a list
    Index(usize),
    /// Name of a child collection
    Collection(String),
}

/// Resolves a row path (`[0, "stores", 2]`) against a JSON row list.
///
/// The path alternates indices and collection names, starting with an index
/// into `rows`. Returns `None` for paths that do not match the tree.
pub fn row_at_path<'v>(rows: &'v [serde_json::Value], path: &[PathSegment]) -> Option<&'v serde_json::Value> {
    let (first, rest) = path.split_first()?;
    let PathSegment::Index(i) = first else {
        return None;
    };
    let mut current = rows.get(*i)?;
    let mut collection: Option<&str> = None;
    for segment in rest {
        match segment {
            PathSegment::Collection(name) => collection = Some(name.as_str()),
            PathSegment::Index(i) => {
                let name = collection.take()?;
                current = current.get(name)?.as_array()?.get(*i)?;
            }
        }
    }
    if collection.is_some() {
        return None;
    }
    Some(current)
}

/// Mutable variant of [`row_at_path`], for collaborators that patch rows in place.
pub fn row_at_path_mut<'v>(
    rows: &'v mut [serde_json::Value],
    path: &[PathSegment],
) -> Option<&'v mut serde_json::Value> {
    let (first, rest) = path.split_first()?;
    let PathSegment::Index(i) = first else {
        return None;
    };
    let mut current = rows.get_mut(*i)?;
    let mut collection: Option<&str> = None;
    for segment in rest {
        match segment {
            PathSegment::Collection(name) => collection = Some(name.as_str()),
            PathSegment::Index(i) => {
                let name = collection.take()?;
                current = current.get_mut(name)?.as_array_mut()?.get_mut(*i)?;
            }
        }
    }
    if collection.is_some() {
        return None;
    }
    Some(current)
}
