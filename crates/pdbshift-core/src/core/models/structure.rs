use super::atom::AtomRecord;
use super::builder::ChainMap;
use super::chain::Chain;
use super::error::ModelError;
use super::residue::Residue;
use std::fmt;

/// Line terminator of a PDB text file, taken from its first line and reused for every
/// line written back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// A parsed PDB file: passthrough header and footer lines around an ordered set of
/// chains.
///
/// Every edit addresses residues by chain identifier plus *chain-local* residue id
/// (1-based position within the chain), never by the residue number written in the
/// file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdbStructure {
    header: Vec<String>,
    chains: ChainMap,
    footer: Vec<String>,
    line_ending: LineEnding,
}

impl PdbStructure {
    pub fn new(header: Vec<String>, chains: ChainMap, footer: Vec<String>) -> Self {
        Self {
            header,
            chains,
            footer,
            line_ending: LineEnding::default(),
        }
    }

    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Lines preceding the first ATOM record, verbatim apart from their terminator.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Non-ATOM, non-TER lines following the first ATOM record, verbatim apart from their
    /// terminator.
    pub fn footer(&self) -> &[String] {
        &self.footer
    }

    pub fn chain(&self, chain_id: &str) -> Option<&Chain> {
        self.chains.get(chain_id)
    }

    pub fn chain_ids(&self) -> impl Iterator<Item = &str> {
        self.chains.keys().map(String::as_str)
    }

    pub fn chains(&self) -> impl Iterator<Item = (&str, &Chain)> {
        self.chains.iter().map(|(id, chain)| (id.as_str(), chain))
    }

    /// All residues, chain by chain.
    pub fn residues(&self) -> impl Iterator<Item = &Residue> {
        self.chains.values().flat_map(Chain::iter)
    }

    /// All atoms, residue by residue.
    pub fn atoms(&self) -> impl Iterator<Item = &AtomRecord> {
        self.residues().flat_map(Residue::iter)
    }

    /// Number of chains.
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn residue_count(&self) -> usize {
        self.chains.values().map(Chain::len).sum()
    }

    pub fn atom_count(&self) -> usize {
        self.chains.values().map(Chain::atom_count).sum()
    }

    fn residue_mut(&mut self, chain_id: &str, local_id: usize) -> Result<&mut Residue, ModelError> {
        let chain = self
            .chains
            .get_mut(chain_id)
            .ok_or_else(|| ModelError::ChainNotFound {
                chain_id: chain_id.to_string(),
            })?;
        chain
            .residue_mut(local_id)
            .ok_or_else(|| ModelError::ResidueNotFound {
                chain_id: chain_id.to_string(),
                local_id,
            })
    }

    /// Renames a residue and all of its atoms.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the chain or chain-local residue id does not exist.
    pub fn rename_residue(
        &mut self,
        chain_id: &str,
        local_id: usize,
        new_name: &str,
    ) -> Result<(), ModelError> {
        self.residue_mut(chain_id, local_id)?.rename(new_name);
        Ok(())
    }

    /// Reorders the atoms of a residue by name; see [`Residue::set_atom_order`].
    ///
    /// # Errors
    ///
    /// Returns a lookup error for an unknown chain or residue and a structural error if
    /// `order` is not a permutation of the residue's atom names.
    pub fn define_residue_order<S: AsRef<str>>(
        &mut self,
        chain_id: &str,
        local_id: usize,
        order: &[S],
    ) -> Result<(), ModelError> {
        self.residue_mut(chain_id, local_id)?.set_atom_order(order)
    }

    /// Renames the first atom called `old_name` in a residue.
    ///
    /// # Errors
    ///
    /// Returns a lookup error for an unknown chain, residue or atom name.
    pub fn rename_atom(
        &mut self,
        chain_id: &str,
        local_id: usize,
        old_name: &str,
        new_name: &str,
    ) -> Result<(), ModelError> {
        self.residue_mut(chain_id, local_id)?
            .rename_atom(old_name, new_name)
    }
}

impl fmt::Display for PdbStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PDB structure of {} chains, {} residues and {} atoms",
            self.len(),
            self.residue_count(),
            self.atom_count()
        )
    }
}
