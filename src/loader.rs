use crate::error::{ReportError, Result};
use crate::types::RawRow;
use csv::{ReaderBuilder, Trim};
use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, info, warn};

pub const REQUIRED_COLUMNS: [&str; 7] = [
    "DEPARTAMENTO",
    "PROVINCIA",
    "DISTRITO",
    "FECHA_CORTE",
    "TOTAL_POBLACION",
    "POBLACION_CON_COBERTURA",
    "POBLACION_SIN_COBERTURA",
];

/// Decode file bytes as UTF-8, falling back to Latin-1 (ISO-8859-1).
///
/// Latin-1 maps every byte to a code point, so the fallback never fails.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Cow::Borrowed(s),
        Err(e) => {
            warn!(valid_up_to = e.valid_up_to(), "input is not UTF-8, decoding as Latin-1");
            encoding_rs::mem::decode_latin1(bytes)
        }
    }
}

/// Parse `;`-delimited text with a header row into raw rows.
pub fn parse_table(text: &str) -> Result<Vec<RawRow>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b';')
        .trim(Trim::All)
        .from_reader(text.as_bytes());
    let headers = rdr.headers()?.clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|col| !headers.iter().any(|h| h == **col))
    {
        return Err(ReportError::MissingColumn(missing.to_string()));
    }
    let mut rows = Vec::new();
    for result in rdr.deserialize::<RawRow>() {
        rows.push(result?);
    }
    Ok(rows)
}

/// Read the coverage table at `path`.
///
/// Any failure other than the encoding fallback is returned to the caller.
pub fn load_table(path: impl AsRef<Path>) -> Result<Vec<RawRow>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| ReportError::io(path, e))?;
    debug!(bytes = bytes.len(), path = %path.display(), "read input file");
    let text = decode_text(&bytes);
    let rows = parse_table(&text)?;
    info!(rows = rows.len(), path = %path.display(), "loaded coverage table");
    Ok(rows)
}
