use anyhow::Result;
use rtable::{
    compute_window, flatten_rows, paginate, stage_transition, ExpansionState, FlattenOptions, HeightOffsets,
    PaginationMode, PageSize, RowKind, RowRuntimeState, ScrollDirection, SiblingOrder, WindowRequest,
};
use rtable::pagination::is_data_row;
use serde_json::{json, Value};
use std::collections::HashMap;

fn three_rows() -> Vec<Value> {
    vec![
        json!({"name": "alpha"}),
        json!({"name": "beta", "children": [
            {"name": "b1"}, {"name": "b2"}, {"name": "b3"}, {"name": "b4"}
        ]}),
        json!({"name": "gamma"}),
    ]
}

fn grouping() -> Vec<String> {
    vec!["children".to_string()]
}

/// Reverses every sibling collection.
struct Reversed;

impl SiblingOrder<&Value> for Reversed {
    fn sibling_indices(&self, siblings: &[&Value], _depth: usize) -> Option<Vec<usize>> {
        Some((0..siblings.len()).rev().collect())
    }
}

#[test]
fn test_collapsed_tree_flattens_roots_only() -> Result<()> {
    let rows = three_rows();
    let grouping = grouping();
    let flattened = flatten_rows(rows.iter(), &ExpansionState::new(), &HashMap::new(), &FlattenOptions::new(&grouping));

    assert_eq!(flattened.len(), 3);
    assert!(flattened.rows().iter().all(|row| row.kind == RowKind::Data));
    assert!(flattened.rows()[1].is_expandable);
    assert!(!flattened.rows()[1].is_expanded);
    Ok(())
}

#[test]
fn test_loading_parent_gets_one_state_row() -> Result<()> {
    let rows = three_rows();
    let grouping = grouping();
    let options = FlattenOptions::new(&grouping);

    let collapsed = flatten_rows(rows.iter(), &ExpansionState::new(), &HashMap::new(), &options);
    let parent_id = collapsed.rows()[1].row_id.clone();

    let mut expansion = ExpansionState::new();
    expansion.expand(parent_id.clone());
    let mut states = HashMap::new();
    states.insert(
        parent_id.clone(),
        RowRuntimeState {
            loading: true,
            ..RowRuntimeState::default()
        },
    );

    let flattened = flatten_rows(rows.iter(), &expansion, &states, &options);
    assert_eq!(flattened.len(), 4);
    let injected = &flattened.rows()[2];
    assert_eq!(injected.kind, RowKind::Loading);
    assert_eq!(injected.row_id, parent_id);
    assert_eq!(injected.absolute_row_index, None);
    assert_eq!(flattened.rows()[3].row["name"], "gamma");

    // Without a registered loading renderer the children show instead
    let mut bare = FlattenOptions::new(&grouping);
    bare.state_renderers = rtable::StateRenderers::NONE;
    let flattened = flatten_rows(rows.iter(), &expansion, &states, &bare);
    assert_eq!(flattened.len(), 7);
    Ok(())
}

#[test]
fn test_uniform_window_scrolling_down() -> Result<()> {
    let offsets = HeightOffsets::uniform(1000, 32.0);
    let window = compute_window(
        &offsets,
        &WindowRequest {
            scroll_top: 640.0,
            content_height: 320.0,
            buffer_rows: 5,
            direction: ScrollDirection::Down,
            virtualization_threshold: 100,
        },
    );

    assert_eq!(window.fully_visible, 20..30);
    assert_eq!(window.buffered, 18..37);
    let (top, bottom) = window.padding(&offsets);
    assert_eq!(top, 18.0 * 32.0);
    assert_eq!(bottom, (1000.0 - 37.0) * 32.0);
    Ok(())
}

#[test]
fn test_pure_reorder_stages_no_entering_or_exiting() -> Result<()> {
    let rows: Vec<Value> = (0..50).map(|i| json!({"n": i})).collect();
    let grouping: Vec<String> = Vec::new();
    let natural = flatten_rows(rows.iter(), &ExpansionState::new(), &HashMap::new(), &FlattenOptions::new(&grouping));

    let mut options = FlattenOptions::new(&grouping);
    options.order = Some(&Reversed);
    let reversed = flatten_rows(rows.iter(), &ExpansionState::new(), &HashMap::new(), &options);

    let staged = stage_transition(natural.rows(), reversed.rows());
    assert_eq!(staged.len(), 50);
    assert!(staged.entering.is_empty());
    assert!(staged.exiting.is_empty());
    assert!(staged.is_reorder_only());

    // Sorting never changes the absolute index of a row
    let first = &reversed.rows()[0];
    assert_eq!(first.row["n"], 49);
    assert_eq!(first.absolute_row_index, Some(49));
    assert_eq!(first.display_position, 0);
    Ok(())
}

#[test]
fn test_client_pages_split_on_data_rows() -> Result<()> {
    let rows: Vec<Value> = (0..25).map(|i| json!({"n": i})).collect();
    let grouping: Vec<String> = Vec::new();
    let flattened = flatten_rows(rows.iter(), &ExpansionState::new(), &HashMap::new(), &FlattenOptions::new(&grouping));

    let mode = PaginationMode::Client(PageSize::new(10)?);
    let last = paginate(flattened.rows(), mode, 2, is_data_row);
    assert_eq!(last.page_count, 3);
    assert_eq!(last.rows.len(), 5);

    let clamped = paginate(flattened.rows(), mode, 99, is_data_row);
    assert_eq!(clamped.page, 2);
    Ok(())
}
