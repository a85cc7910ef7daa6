use std::io::Read;

use log::debug;

use crate::error::ParseError;
use crate::geometry::AffineTransform;
use crate::transform::{Preset, TransformSet};


/// Fields per table row: a, b, c, d, e, f, probability.
pub const FIELDS_PER_ROW: usize = 7;

/// A table replaces the whole default set, so it must describe at least as
/// many maps as the default has.
pub const MIN_TABLE_ROWS: usize = 4;


pub fn load_default() -> TransformSet {
    TransformSet::preset(Preset::Barnsley)
}


/// Builds a transform set from rows of seven textual fields, in row order.
///
/// The probability sum is not checked here; see [`TransformSet::validate`].
pub fn load_from_table<T, R, F>(rows: T) -> Result<TransformSet, ParseError>
where
    T: IntoIterator<Item = R>,
    R: IntoIterator<Item = F>,
    F: AsRef<str>,
{
    let mut entries: Vec<(AffineTransform, f64)> = Vec::new();

    for (idx, row) in rows.into_iter().enumerate() {
        let row_number = idx + 1;
        let fields: Vec<F> = row.into_iter().collect();

        if fields.len() != FIELDS_PER_ROW {
            return Err(ParseError::FieldCount { row: row_number, found: fields.len() });
        }

        let mut values = [0.0_f64; FIELDS_PER_ROW];
        for (column, (field, value)) in fields.iter().zip(values.iter_mut()).enumerate() {
            *value = parse_field(field.as_ref(), row_number, column + 1)?;
        }

        let [a, b, c, d, e, f, p] = values;
        entries.push((AffineTransform::new(a, b, c, d, e, f), p));
    }

    if entries.is_empty() {
        return Err(ParseError::Empty);
    }

    if entries.len() < MIN_TABLE_ROWS {
        return Err(ParseError::TooFewRows { found: entries.len(), required: MIN_TABLE_ROWS });
    }

    debug!("loaded transform table with {} rows", entries.len());

    Ok(TransformSet::new(entries))
}


/// Reads a headerless comma-separated table. Lines starting with `#` are
/// skipped.
pub fn load_from_csv<R: Read>(reader: R) -> Result<TransformSet, ParseError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let records = csv_reader
        .records()
        .collect::<Result<Vec<csv::StringRecord>, csv::Error>>()?;

    load_from_table(&records)
}


fn parse_field(field: &str, row: usize, column: usize) -> Result<f64, ParseError> {
    match field.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ParseError::InvalidNumber {
            row,
            column,
            value: field.to_owned(),
        }),
    }
}
