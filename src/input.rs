use crate::error::{Error, Result};
use crate::ir::{NodeTier, RawRow};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Document {
    Rows(Vec<Row>),
    Wrapped { rows: Vec<Row> },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Row {
    Object {
        id: Value,
        #[serde(default)]
        name: Value,
        #[serde(default)]
        parent: Value,
        #[serde(default)]
        tier: Value,
    },
    Cells(Vec<Value>),
}

/// Decode a JSON or JSON5 row table.
///
/// Accepts a top-level array (or an object with a `rows` array) whose entries
/// are either `{id, name, parent, tier?}` objects or `[id, name, parent, tier?]`
/// arrays. Cells may be strings, numbers or null.
pub fn parse_rows(input: &str) -> Result<Vec<RawRow>> {
    let document: Document = json5::from_str(input).map_err(|err| Error::Input {
        message: err.to_string(),
    })?;
    let rows = match document {
        Document::Rows(rows) | Document::Wrapped { rows } => rows,
    };
    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| decode_row(idx, row))
        .collect()
}

fn decode_row(idx: usize, row: Row) -> Result<RawRow> {
    let (id, name, parent, tier) = match row {
        Row::Object {
            id,
            name,
            parent,
            tier,
        } => (id, name, parent, tier),
        Row::Cells(cells) => {
            let mut cells = cells.into_iter();
            let mut next = || cells.next().unwrap_or(Value::Null);
            (next(), next(), next(), next())
        }
    };
    let tier = match cell_text(idx, "tier", tier)? {
        token if token.trim().is_empty() => None,
        token => Some(NodeTier::from_token(&token).ok_or_else(|| Error::Input {
            message: format!("row {idx}: unknown tier `{token}`"),
        })?),
    };
    Ok(RawRow {
        id: cell_text(idx, "id", id)?,
        name: cell_text(idx, "name", name)?,
        parent: cell_text(idx, "parent", parent)?,
        tier,
    })
}

fn cell_text(idx: usize, column: &str, value: Value) -> Result<String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(text) => Ok(text),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Number(number) => Ok(number_text(&number)),
        Value::Array(_) | Value::Object(_) => Err(Error::Input {
            message: format!("row {idx}: `{column}` must be a string or number"),
        }),
    }
}

/// Whole floats print without a fractional part, so `1.0` and `1` name the
/// same node.
fn number_text(number: &serde_json::Number) -> String {
    match number.as_f64() {
        Some(value) if number.is_f64() && value.is_finite() && value.fract() == 0.0 => {
            format!("{value:.0}")
        }
        _ => number.to_string(),
    }
}
