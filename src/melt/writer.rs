use crate::codec::Key;
use crate::melt::extract::Extraction;
use crate::types::{Attribute, AttributeList, AttributeValue};
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::{BufReader, Read, Write};

/// One sliced record, as written by [`RowWriter`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub namespace: String,

    /// Position of the record among its namespace's records
    pub row: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<Key>,

    pub attributes: AttributeList,
}

impl Row {
    pub fn new(namespace: &str, row: usize, extraction: Extraction) -> Self {
        let key = match extraction.key {
            Some(AttributeValue::Key(key)) => Some(key),
            _ => None,
        };
        Row {
            namespace: namespace.to_string(),
            row,
            key,
            attributes: extraction.attributes,
        }
    }
}

/// Writes sliced rows as JSON Lines
pub struct RowWriter<W: Write> {
    writer: W,
}

impl<W: Write> RowWriter<W> {
    pub fn new(writer: W) -> Self {
        RowWriter { writer }
    }

    pub fn write_rows(&mut self, rows: &[Row]) -> Result<()> {
        for row in rows {
            let json = serde_json::to_string(row).context("Failed to serialize row")?;
            writeln!(self.writer, "{}", json).context("Failed to write row")?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush writer")
    }
}

/// Read an attribute list stored either as one JSON array or as JSON Lines
pub fn read_attributes<R: Read>(reader: R) -> Result<AttributeList> {
    let mut content = String::new();
    BufReader::new(reader)
        .read_to_string(&mut content)
        .context("Failed to read attributes")?;

    if content.trim_start().starts_with('[') {
        return serde_json::from_str(&content).context("Failed to parse attribute array");
    }

    let mut attributes = Vec::new();
    for (number, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let attribute: Attribute = serde_json::from_str(line)
            .with_context(|| format!("Failed to parse attribute on line {}", number + 1))?;
        attributes.push(attribute);
    }
    Ok(attributes)
}
