//! Dataset files.
//!
//! Two layouts are read:
//!
//! - `.jsonl` is JSON Lines: a `header` line (version, grouping, metadata),
//!   one `row` line per root row, optional `footer` with the row count
//! - `.json` is a single document, either an array of root rows or an object
//!   with `grouping`, `metadata` and `rows`
//!
//! Either may carry a trailing `.br` for Brotli compression. Writing always
//! produces JSON Lines.

use anyhow::{anyhow, bail, Context, Result};
use brotli::enc::BrotliEncoderParams;
use brotli::{CompressorWriter, Decompressor};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Format version written into headers.
pub const DATASET_VERSION: &str = "rtable-1.0";

/// A loaded dataset: root rows plus the grouping spec they were built for.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub version: String,
    pub grouping: Vec<String>,
    pub metadata: Value,
    pub rows: Vec<Value>,
}

impl Dataset {
    pub fn new(grouping: Vec<String>, rows: Vec<Value>) -> Self {
        Self {
            version: DATASET_VERSION.to_string(),
            grouping,
            metadata: Value::Object(serde_json::Map::new()),
            rows,
        }
    }

    /// Root rows, ready for the flattener.
    pub fn roots(&self) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter()
    }

    /// Counts rows at every grouping level.
    pub fn total_rows(&self) -> usize {
        let mut total = 0;
        let mut stack: Vec<(&Value, usize)> = self.rows.iter().map(|row| (row, 0)).collect();
        while let Some((row, depth)) = stack.pop() {
            total += 1;
            let children = self
                .grouping
                .get(depth)
                .and_then(|collection| row.get(collection))
                .and_then(Value::as_array);
            if let Some(children) = children {
                stack.extend(children.iter().map(|child| (child, depth + 1)));
            }
        }
        total
    }

    /// Attribute names across all levels, in first-seen order.
    ///
    /// Follows the first row down each level of `grouping`; the child
    /// collections themselves are left out.
    pub fn columns(&self, grouping: &[String]) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        let mut level = self.rows.first();
        let mut depth = 0;
        while let Some(row) = level {
            if let Some(object) = row.as_object() {
                for key in object.keys() {
                    if !grouping.contains(key) && !columns.contains(key) {
                        columns.push(key.clone());
                    }
                }
            }
            level = grouping
                .get(depth)
                .and_then(|collection| row.get(collection))
                .and_then(Value::as_array)
                .and_then(|children| children.first());
            depth += 1;
        }
        columns
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum DatasetLine {
    Header {
        version: String,
        #[serde(default)]
        grouping: Vec<String>,
        #[serde(default)]
        metadata: Value,
    },
    Row {
        data: Value,
    },
    Footer {
        total_rows: usize,
    },
}

#[derive(Debug, Deserialize)]
struct DatasetDocument {
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    grouping: Vec<String>,
    #[serde(default)]
    metadata: Value,
    rows: Vec<Value>,
}

fn open_reader(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let reader: Box<dyn BufRead> = if has_extension(path, "br") {
        Box::new(BufReader::new(Decompressor::new(file, 4096)))
    } else {
        Box::new(BufReader::new(file))
    };
    Ok(reader)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

/// True for `*.json` and `*.json.br`.
fn is_json_document(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    let name = name.strip_suffix(".br").unwrap_or(name);
    name.ends_with(".json")
}

/// Reads a dataset file, decompressing `.br` files transparently.
///
/// # Examples
///
/// ```no_run
/// # fn main() -> anyhow::Result<()> {
/// let dataset = rtable::dataset::read_dataset("sales.jsonl.br".as_ref())?;
/// println!("{} root rows", dataset.rows.len());
/// # Ok(())
/// # }
/// ```
pub fn read_dataset(path: &Path) -> Result<Dataset> {
    let reader = open_reader(path)?;
    let dataset = if is_json_document(path) {
        parse_document(reader)
    } else {
        parse_lines(reader)
    }
    .with_context(|| format!("Failed to read dataset: {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        roots = dataset.rows.len(),
        levels = dataset.grouping.len(),
        "dataset loaded"
    );
    Ok(dataset)
}

/// Parses a single JSON document.
pub fn parse_document<R: Read>(reader: R) -> Result<Dataset> {
    let value: Value = serde_json::from_reader(reader).context("Failed to parse JSON document")?;
    match value {
        Value::Array(rows) => Ok(Dataset::new(Vec::new(), rows)),
        Value::Object(_) => {
            let document: DatasetDocument =
                serde_json::from_value(value).context("Dataset object needs a 'rows' array")?;
            Ok(Dataset {
                version: document.version.unwrap_or_else(|| DATASET_VERSION.to_string()),
                grouping: document.grouping,
                metadata: document.metadata,
                rows: document.rows,
            })
        }
        other => bail!("Expected an array or object, found {}", json_kind(&other)),
    }
}

/// Parses JSON Lines.
///
/// Malformed lines are errors. Recoverable oddities (missing header, rows
/// that are not objects, a footer count that does not match) are logged and
/// skipped.
pub fn parse_lines<R: BufRead>(reader: R) -> Result<Dataset> {
    let mut header: Option<(String, Vec<String>, Value)> = None;
    let mut rows = Vec::new();
    let mut footer_total: Option<usize> = None;

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result.with_context(|| format!("Failed to read line {}", line_num + 1))?;
        if line.trim().is_empty() {
            continue;
        }

        let parsed: DatasetLine = serde_json::from_str(&line)
            .with_context(|| format!("Failed to parse JSON at line {}", line_num + 1))?;

        match parsed {
            DatasetLine::Header {
                version,
                grouping,
                metadata,
            } => {
                if header.is_some() || !rows.is_empty() {
                    return Err(anyhow!("Header must be first line (found at line {})", line_num + 1));
                }
                header = Some((version, grouping, metadata));
            }
            DatasetLine::Row { data } => {
                if data.is_object() {
                    rows.push(data);
                } else {
                    tracing::warn!(line = line_num + 1, kind = json_kind(&data), "skipping non-object row");
                }
            }
            DatasetLine::Footer { total_rows } => footer_total = Some(total_rows),
        }
    }

    let (version, grouping, metadata) = header.unwrap_or_else(|| {
        tracing::warn!("dataset has no header, assuming flat rows");
        (DATASET_VERSION.to_string(), Vec::new(), Value::Null)
    });

    if let Some(expected) = footer_total {
        if expected != rows.len() {
            tracing::warn!(expected, found = rows.len(), "footer row count mismatch");
        }
    }

    Ok(Dataset {
        version,
        grouping,
        metadata,
        rows,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Streaming JSON Lines writer.
pub struct DatasetWriter {
    writer: Box<dyn Write>,
    row_count: usize,
}

impl DatasetWriter {
    /// Creates a writer for `path`.
    ///
    /// Brotli compression is enabled when the path ends with `.br`, using
    /// quality 6 and a 4 MiB window.
    pub fn new(path: &Path) -> Result<Self> {
        let file = File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))?;

        let writer: Box<dyn Write> = if has_extension(path, "br") {
            let params = BrotliEncoderParams {
                quality: 6,
                lgwin: 22,
                ..Default::default()
            };
            Box::new(CompressorWriter::with_params(BufWriter::new(file), 4096, &params))
        } else {
            Box::new(BufWriter::new(file))
        };

        Ok(Self::from_writer(writer))
    }

    /// Wraps an arbitrary sink (no compression is added).
    pub fn from_writer(writer: Box<dyn Write>) -> Self {
        Self { writer, row_count: 0 }
    }

    pub fn write_header(&mut self, grouping: &[String], metadata: Value) -> Result<()> {
        let header = serde_json::json!({
            "type": "header",
            "version": DATASET_VERSION,
            "grouping": grouping,
            "metadata": metadata
        });
        self.write_line(&header)
    }

    pub fn write_row(&mut self, row: &Value) -> Result<()> {
        let line = serde_json::json!({ "type": "row", "data": row });
        self.write_line(&line)?;
        self.row_count += 1;
        Ok(())
    }

    pub fn write_footer(&mut self) -> Result<()> {
        let footer = serde_json::json!({ "type": "footer", "total_rows": self.row_count });
        self.write_line(&footer)
    }

    /// Flushes buffered and compressed output.
    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush().context("Failed to flush writer")?;
        Ok(self.row_count)
    }

    fn write_line<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let json = serde_json::to_string(value).context("Failed to serialize to JSON")?;
        writeln!(self.writer, "{}", json).context("Failed to write line")?;
        Ok(())
    }
}

/// Writes a whole dataset as JSON Lines.
pub fn write_dataset(path: &Path, dataset: &Dataset) -> Result<()> {
    let mut writer = DatasetWriter::new(path)?;
    writer.write_header(&dataset.grouping, dataset.metadata.clone())?;
    for row in &dataset.rows {
        writer.write_row(row)?;
    }
    writer.write_footer()?;
    writer.finish()?;
    Ok(())
}
