use nalgebra::Point3;
use std::fmt;

/// Identifies which column layout an atom record was decoded from.
///
/// Fixed-column records use the standard 80-character PDB column layout. The two
/// whitespace layouts are recovery paths for irregular files and are selected purely
/// by the number of whitespace-delimited tokens on the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordLayout {
    /// Strict 80-column positional record.
    #[default]
    FixedColumn,
    /// Ten tokens: no chain identifier, element or charge.
    Whitespace10,
    /// Eleven tokens: a chain identifier after the residue name, no element or charge.
    Whitespace11,
}

impl RecordLayout {
    /// Selects the whitespace layout matching a token count.
    ///
    /// # Return
    ///
    /// Returns `None` for any count that has no recognized layout.
    pub fn for_token_count(tokens: usize) -> Option<Self> {
        match tokens {
            10 => Some(RecordLayout::Whitespace10),
            11 => Some(RecordLayout::Whitespace11),
            _ => None,
        }
    }

    /// Number of whitespace tokens this layout expects, `None` for the fixed layout.
    pub fn token_count(self) -> Option<usize> {
        match self {
            RecordLayout::FixedColumn => None,
            RecordLayout::Whitespace10 => Some(10),
            RecordLayout::Whitespace11 => Some(11),
        }
    }
}

impl fmt::Display for RecordLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordLayout::FixedColumn => write!(f, "80-column fixed layout"),
            RecordLayout::Whitespace10 => write!(f, "10-token layout"),
            RecordLayout::Whitespace11 => write!(f, "11-token layout"),
        }
    }
}

/// One decoded ATOM record.
///
/// Identity fields (atom name, residue name) are only mutable through the owning
/// [`Residue`](super::residue::Residue), which keeps them consistent across every atom
/// of the residue. Construction goes through [`AtomRecord::new`] and the `with_*`
/// methods, which is how both the line parser and tests build records.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    record_name: String,
    atom_id: usize,
    atom_name: String,
    alt_location: Option<char>,
    residue_name: String,
    chain_id: String,
    residue_id: isize,
    insertion_code: Option<char>,
    position: Point3<f64>,
    occupancy: f64,
    temperature_factor: f64,
    segment_id: String,
    element: String,
    charge: Option<i32>,
    chain_local_id: Option<usize>,
    layout: RecordLayout,
}

impl AtomRecord {
    /// Creates an `ATOM` record with blank optional fields, unit occupancy and a zero
    /// temperature factor. The chain-local id stays unassigned until the record is
    /// placed in a chain.
    pub fn new(
        atom_id: usize,
        atom_name: &str,
        residue_name: &str,
        chain_id: &str,
        residue_id: isize,
        position: Point3<f64>,
    ) -> Self {
        Self {
            record_name: "ATOM".to_string(),
            atom_id,
            atom_name: atom_name.to_string(),
            alt_location: None,
            residue_name: residue_name.to_string(),
            chain_id: chain_id.to_string(),
            residue_id,
            insertion_code: None,
            position,
            occupancy: 1.0,
            temperature_factor: 0.0,
            segment_id: String::new(),
            element: String::new(),
            charge: None,
            chain_local_id: None,
            layout: RecordLayout::FixedColumn,
        }
    }

    pub fn with_record_name(mut self, record_name: &str) -> Self {
        self.record_name = record_name.to_string();
        self
    }
    pub fn with_alt_location(mut self, alt_location: Option<char>) -> Self {
        self.alt_location = alt_location;
        self
    }
    pub fn with_insertion_code(mut self, insertion_code: Option<char>) -> Self {
        self.insertion_code = insertion_code;
        self
    }
    pub fn with_occupancy(mut self, occupancy: f64) -> Self {
        self.occupancy = occupancy;
        self
    }
    pub fn with_temperature_factor(mut self, temperature_factor: f64) -> Self {
        self.temperature_factor = temperature_factor;
        self
    }
    pub fn with_segment_id(mut self, segment_id: &str) -> Self {
        self.segment_id = segment_id.to_string();
        self
    }
    pub fn with_element(mut self, element: &str) -> Self {
        self.element = element.to_string();
        self
    }
    pub fn with_charge(mut self, charge: Option<i32>) -> Self {
        self.charge = charge;
        self
    }
    pub fn with_layout(mut self, layout: RecordLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn record_name(&self) -> &str {
        &self.record_name
    }
    pub fn atom_id(&self) -> usize {
        self.atom_id
    }
    pub fn atom_name(&self) -> &str {
        &self.atom_name
    }
    pub fn alt_location(&self) -> Option<char> {
        self.alt_location
    }
    pub fn residue_name(&self) -> &str {
        &self.residue_name
    }
    /// The chain identifier; blank chains use the empty string.
    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }
    pub fn residue_id(&self) -> isize {
        self.residue_id
    }
    pub fn insertion_code(&self) -> Option<char> {
        self.insertion_code
    }
    pub fn position(&self) -> &Point3<f64> {
        &self.position
    }
    pub fn occupancy(&self) -> f64 {
        self.occupancy
    }
    pub fn temperature_factor(&self) -> f64 {
        self.temperature_factor
    }
    pub fn segment_id(&self) -> &str {
        &self.segment_id
    }
    pub fn element(&self) -> &str {
        &self.element
    }
    pub fn charge(&self) -> Option<i32> {
        self.charge
    }
    /// The 1-based index of the owning residue within its chain, once assigned.
    pub fn chain_local_id(&self) -> Option<usize> {
        self.chain_local_id
    }
    pub fn layout(&self) -> RecordLayout {
        self.layout
    }
    pub fn is_strict_format(&self) -> bool {
        self.layout == RecordLayout::FixedColumn
    }

    pub(crate) fn set_atom_id(&mut self, atom_id: usize) {
        self.atom_id = atom_id;
    }
    pub(crate) fn set_atom_name(&mut self, atom_name: &str) {
        self.atom_name = atom_name.to_string();
    }
    pub(crate) fn set_residue_name(&mut self, residue_name: &str) {
        self.residue_name = residue_name.to_string();
    }
    pub(crate) fn set_chain_local_id(&mut self, chain_local_id: usize) {
        self.chain_local_id = Some(chain_local_id);
    }
}

impl fmt::Display for AtomRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} -> {} [atom {}]",
            self.residue_name, self.residue_id, self.atom_name, self.atom_id
        )
    }
}
