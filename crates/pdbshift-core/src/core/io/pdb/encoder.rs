use super::error::FieldOverflow;
use crate::core::models::atom::AtomRecord;

/// Horizontal placement of a value inside its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justify {
    Left,
    Right,
    /// Padding split as `right = pad / 2`, `left = pad - right`.
    Center,
}

/// Pads `value` to exactly `width` characters.
///
/// # Errors
///
/// Returns [`FieldOverflow`] if `value` is already wider than `width`. Values are never
/// truncated.
pub fn pad_field(
    field: &'static str,
    value: &str,
    width: usize,
    justify: Justify,
) -> Result<String, FieldOverflow> {
    let len = value.chars().count();
    if len > width {
        return Err(FieldOverflow {
            field,
            value: value.to_string(),
            width,
        });
    }

    let pad = width - len;
    let (left, right) = match justify {
        Justify::Left => (0, pad),
        Justify::Right => (pad, 0),
        Justify::Center => (pad - pad / 2, pad / 2),
    };
    Ok(format!("{}{}{}", " ".repeat(left), value, " ".repeat(right)))
}

fn flag(value: Option<char>) -> String {
    value.map(String::from).unwrap_or_default()
}

/// Decimal places tried for occupancy and temperature factor, most conventional first.
const REAL_PRECISIONS: [usize; 6] = [2, 1, 0, 3, 4, 5];

/// Renders a real value for a `width`-column field.
///
/// Takes the first precision from [`REAL_PRECISIONS`] that fits and reads back as exactly
/// `value`, so `0.333` and `1000.0` survive unchanged. Values no precision reproduces fall
/// back to the shortest exact representation, which may overflow the field.
fn real_text(value: f64, width: usize) -> String {
    REAL_PRECISIONS
        .iter()
        .map(|&precision| format!("{:.*}", precision, value))
        .find(|text| text.len() <= width && text.parse::<f64>() == Ok(value))
        .unwrap_or_else(|| format!("{}", value))
}

fn charge_text(charge: Option<i32>) -> String {
    match charge {
        None => String::new(),
        Some(0) => "0".to_string(),
        Some(n) if n > 0 => format!("{}+", n),
        Some(n) => format!("{}-", n.unsigned_abs()),
    }
}

/// Renders an atom as one 80-column fixed-width ATOM line, without a line terminator.
///
/// Atom names shorter than four characters are written from column 14; four-character
/// names take the whole 13-16 field. Coordinates carry three decimals; occupancy and
/// temperature factor carry two unless another precision is needed to keep the value exact.
///
/// # Errors
///
/// Returns [`FieldOverflow`] for the first field whose rendered value is wider than its
/// column. Nothing is emitted in that case.
pub fn encode_atom(atom: &AtomRecord) -> Result<String, FieldOverflow> {
    let mut line = String::with_capacity(80);

    line.push_str(&pad_field("record name", atom.record_name(), 6, Justify::Left)?);
    line.push_str(&pad_field("atom serial", &atom.atom_id().to_string(), 5, Justify::Right)?);
    line.push(' ');
    let name = atom.atom_name();
    if name.chars().count() < 4 {
        line.push(' ');
        line.push_str(&pad_field("atom name", name, 3, Justify::Left)?);
    } else {
        line.push_str(&pad_field("atom name", name, 4, Justify::Left)?);
    }
    line.push_str(&pad_field("alternate location", &flag(atom.alt_location()), 1, Justify::Center)?);
    line.push_str(&pad_field("residue name", atom.residue_name(), 3, Justify::Center)?);
    line.push(' ');
    line.push_str(&pad_field("chain identifier", atom.chain_id(), 1, Justify::Right)?);
    line.push_str(&pad_field("residue sequence number", &atom.residue_id().to_string(), 4, Justify::Right)?);
    line.push_str(&pad_field("insertion code", &flag(atom.insertion_code()), 1, Justify::Right)?);
    line.push_str("   ");

    let position = atom.position();
    line.push_str(&pad_field("x coordinate", &format!("{:.3}", position.x), 8, Justify::Right)?);
    line.push_str(&pad_field("y coordinate", &format!("{:.3}", position.y), 8, Justify::Right)?);
    line.push_str(&pad_field("z coordinate", &format!("{:.3}", position.z), 8, Justify::Right)?);
    line.push_str(&pad_field("occupancy", &real_text(atom.occupancy(), 6), 6, Justify::Right)?);
    line.push_str(&pad_field(
        "temperature factor",
        &real_text(atom.temperature_factor(), 6),
        6,
        Justify::Right,
    )?);
    line.push_str("      ");
    line.push_str(&pad_field("segment identifier", atom.segment_id(), 4, Justify::Left)?);
    line.push_str(&pad_field("element", atom.element(), 2, Justify::Right)?);
    line.push_str(&pad_field("charge", &charge_text(atom.charge()), 2, Justify::Right)?);

    Ok(line)
}
