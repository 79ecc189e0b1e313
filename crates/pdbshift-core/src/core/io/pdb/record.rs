use super::error::{FieldLocation, RecordError};
use crate::core::models::atom::{AtomRecord, RecordLayout};
use nalgebra::Point3;
use std::str::FromStr;

/// Width of a well-formed fixed-column ATOM record.
pub const FIXED_RECORD_WIDTH: usize = 80;

/// Decodes one ATOM line.
///
/// Lines of exactly 80 characters are read by column position. Anything else is split
/// on whitespace and the token count picks a [`RecordLayout`]; counts with no layout are
/// rejected. Every numeric field must cast cleanly, there are no silent defaults.
///
/// # Arguments
///
/// * `line` - The raw line, with or without its line terminator.
///
/// # Errors
///
/// Returns a [`RecordError`] describing the first field that failed to decode, or the
/// unrecognized token count.
pub fn parse_atom_line(line: &str) -> Result<AtomRecord, RecordError> {
    let line = line.trim_end_matches(['\n', '\r']);
    if line.chars().count() == FIXED_RECORD_WIDTH {
        return parse_fixed(line);
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    match RecordLayout::for_token_count(tokens.len()) {
        Some(layout) => parse_tokens(&tokens, layout),
        None => Err(RecordError::UnrecognizedLayout {
            tokens: tokens.len(),
        }),
    }
}

impl FromStr for AtomRecord {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_atom_line(s)
    }
}

struct FixedColumns {
    chars: Vec<char>,
}

impl FixedColumns {
    fn new(line: &str) -> Self {
        Self {
            chars: line.chars().collect(),
        }
    }

    /// Trimmed text of the 1-based inclusive column range `first..=last`.
    fn text(&self, first: usize, last: usize) -> String {
        self.chars
            .get(first - 1..last)
            .map(|cols| cols.iter().collect::<String>().trim().to_string())
            .unwrap_or_default()
    }

    /// The character at a 1-based column, `None` when blank.
    fn flag(&self, column: usize) -> Option<char> {
        self.chars
            .get(column - 1)
            .copied()
            .filter(|c| !c.is_whitespace())
    }
}

fn parse_fixed(line: &str) -> Result<AtomRecord, RecordError> {
    let cols = FixedColumns::new(line);

    let atom_id = parse_int::<usize>(&cols.text(7, 11), FieldLocation::Columns("7-11"))?;
    let residue_id = parse_int::<isize>(&cols.text(23, 26), FieldLocation::Columns("23-26"))?;
    let x = parse_float(&cols.text(31, 38), FieldLocation::Columns("31-38"))?;
    let y = parse_float(&cols.text(39, 46), FieldLocation::Columns("39-46"))?;
    let z = parse_float(&cols.text(47, 54), FieldLocation::Columns("47-54"))?;
    let occupancy = parse_float(&cols.text(55, 60), FieldLocation::Columns("55-60"))?;
    let beta = parse_float(&cols.text(61, 66), FieldLocation::Columns("61-66"))?;
    let charge = parse_charge(&cols.text(79, 80), FieldLocation::Columns("79-80"))?;

    let chain_id = cols.flag(22).map(String::from).unwrap_or_default();

    Ok(AtomRecord::new(
        atom_id,
        &cols.text(13, 16),
        &cols.text(18, 20),
        &chain_id,
        residue_id,
        Point3::new(x, y, z),
    )
    .with_record_name(&cols.text(1, 6))
    .with_alt_location(cols.flag(17))
    .with_insertion_code(cols.flag(27))
    .with_occupancy(occupancy)
    .with_temperature_factor(beta)
    .with_segment_id(&cols.text(73, 76))
    .with_element(&cols.text(77, 78))
    .with_charge(charge)
    .with_layout(RecordLayout::FixedColumn))
}

fn parse_tokens(tokens: &[&str], layout: RecordLayout) -> Result<AtomRecord, RecordError> {
    let of = tokens.len();
    let at = |index: usize| FieldLocation::Token { index: index + 1, of };

    // Everything after the residue name shifts by one when a chain token is present.
    let (chain_id, shift) = match layout {
        RecordLayout::Whitespace11 => (tokens[4], 1),
        RecordLayout::Whitespace10 | RecordLayout::FixedColumn => ("", 0),
    };

    let atom_id = parse_int::<usize>(tokens[1], at(1))?;
    let residue_id = parse_int::<isize>(tokens[4 + shift], at(4 + shift))?;
    let x = parse_float(tokens[5 + shift], at(5 + shift))?;
    let y = parse_float(tokens[6 + shift], at(6 + shift))?;
    let z = parse_float(tokens[7 + shift], at(7 + shift))?;
    let occupancy = parse_float(tokens[8 + shift], at(8 + shift))?;
    let beta = parse_float(tokens[9 + shift], at(9 + shift))?;

    Ok(AtomRecord::new(
        atom_id,
        tokens[2],
        tokens[3],
        chain_id,
        residue_id,
        Point3::new(x, y, z),
    )
    .with_record_name(tokens[0])
    .with_occupancy(occupancy)
    .with_temperature_factor(beta)
    .with_layout(layout))
}

fn parse_int<T: FromStr>(value: &str, location: FieldLocation) -> Result<T, RecordError> {
    value.parse().map_err(|_| RecordError::InvalidInt {
        location,
        value: value.to_string(),
    })
}

fn parse_float(value: &str, location: FieldLocation) -> Result<f64, RecordError> {
    value.parse().map_err(|_| RecordError::InvalidFloat {
        location,
        value: value.to_string(),
    })
}

/// Reads a formal charge written either PDB-style (`2+`, `1-`) or as a signed integer.
fn parse_charge(value: &str, location: FieldLocation) -> Result<Option<i32>, RecordError> {
    if value.is_empty() {
        return Ok(None);
    }
    let invalid = || RecordError::InvalidCharge {
        location,
        value: value.to_string(),
    };
    let parsed = match value.strip_suffix('+') {
        Some(magnitude) => magnitude.parse::<u8>().map(i32::from),
        None => match value.strip_suffix('-') {
            Some(magnitude) => magnitude.parse::<u8>().map(|m| -i32::from(m)),
            None => value.parse::<i32>(),
        },
    };
    parsed.map(Some).map_err(|_| invalid())
}
