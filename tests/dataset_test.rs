use anyhow::Result;
use rtable::virtual_dataset::{self, VirtualDatasetConfig};
use rtable::{flatten_rows, read_dataset, write_dataset, ExpansionState, FlattenOptions};
use std::collections::HashMap;
use std::env;
use std::fs;

fn small_config(seed: u64) -> VirtualDatasetConfig {
    VirtualDatasetConfig {
        regions: 3,
        max_stores: 3,
        max_orders: 5,
        seed,
    }
}

#[test]
fn test_write_and_read_plain_dataset() -> Result<()> {
    let path = env::temp_dir().join("rtable_test_plain.jsonl");
    let _ = fs::remove_file(&path);

    let dataset = virtual_dataset::generate(&small_config(7));
    write_dataset(&path, &dataset)?;
    let loaded = read_dataset(&path)?;

    assert_eq!(loaded.grouping, dataset.grouping);
    assert_eq!(loaded.rows, dataset.rows);
    assert_eq!(loaded.total_rows(), dataset.total_rows());

    fs::remove_file(&path)?;
    Ok(())
}

#[test]
fn test_write_and_read_compressed_dataset() -> Result<()> {
    let path = env::temp_dir().join("rtable_test_compressed.jsonl.br");
    let _ = fs::remove_file(&path);

    let dataset = virtual_dataset::generate(&small_config(11));
    write_dataset(&path, &dataset)?;

    // Brotli output is not plain JSON
    let raw = fs::read(&path)?;
    assert!(serde_json::from_slice::<serde_json::Value>(&raw).is_err());

    let loaded = read_dataset(&path)?;
    assert_eq!(loaded.rows, dataset.rows);

    fs::remove_file(&path)?;
    Ok(())
}

#[test]
fn test_json_document_with_grouping() -> Result<()> {
    let path = env::temp_dir().join("rtable_test_document.json");
    fs::write(
        &path,
        r#"{"grouping": ["children"], "rows": [
            {"name": "a", "children": [{"name": "a1"}, {"name": "a2"}]},
            {"name": "b"}
        ]}"#,
    )?;

    let dataset = read_dataset(&path)?;
    assert_eq!(dataset.grouping, vec!["children".to_string()]);
    assert_eq!(dataset.total_rows(), 4);

    let expansion = ExpansionState::with_expanded_depths([0]);
    let flattened = flatten_rows(dataset.roots(), &expansion, &HashMap::new(), &FlattenOptions::new(&dataset.grouping));
    let names: Vec<&str> = flattened.rows().iter().filter_map(|row| row.row["name"].as_str()).collect();
    assert_eq!(names, vec!["a", "a1", "a2", "b"]);
    assert!(flattened.rows()[2].is_last_group_row);

    fs::remove_file(&path)?;
    Ok(())
}

#[test]
fn test_missing_file_is_an_error() {
    let path = env::temp_dir().join("rtable_test_does_not_exist.jsonl");
    let err = read_dataset(&path).unwrap_err();
    assert!(format!("{err:#}").contains("rtable_test_does_not_exist"));
}
