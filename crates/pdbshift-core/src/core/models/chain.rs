use super::atom::AtomRecord;
use super::error::ModelError;
use super::residue::Residue;
use std::fmt;
use std::ops::Index;

/// An ordered sequence of residues sharing one chain identifier.
///
/// Chain-local ids are handed out `1..=N` in residue order when the chain is built and
/// are never renumbered afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    residues: Vec<Residue>,
}

impl Chain {
    /// Builds a chain from the atoms of a single chain, in file order.
    ///
    /// A new residue starts every time the residue id differs from the previous atom's,
    /// so a residue id that reappears later in the stream opens a separate residue.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MixedChain`] if the atoms do not all share the first
    /// atom's chain identifier.
    pub fn from_atoms(atoms: Vec<AtomRecord>) -> Result<Self, ModelError> {
        if let Some(first) = atoms.first() {
            let expected = first.chain_id();
            if let Some(stray) = atoms.iter().find(|a| a.chain_id() != expected) {
                return Err(ModelError::MixedChain {
                    expected: expected.to_string(),
                    found: stray.chain_id().to_string(),
                    atom_id: stray.atom_id(),
                });
            }
        }

        let mut groups: Vec<Vec<AtomRecord>> = Vec::new();
        let mut current_residue_id = None;
        for atom in atoms {
            if current_residue_id != Some(atom.residue_id()) {
                current_residue_id = Some(atom.residue_id());
                groups.push(Vec::new());
            }
            if let Some(group) = groups.last_mut() {
                group.push(atom);
            }
        }

        let mut residues = groups
            .into_iter()
            .map(Residue::from_atoms)
            .collect::<Result<Vec<_>, _>>()?;
        for (idx, residue) in residues.iter_mut().enumerate() {
            residue.assign_chain_local_id(idx + 1);
        }

        Ok(Self { residues })
    }

    /// The chain identifier shared by the residues, `None` for an empty chain.
    pub fn name(&self) -> Option<&str> {
        self.residues.first().map(Residue::chain_id)
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Residue> {
        self.residues.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Residue> {
        self.residues.get(index)
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn atom_count(&self) -> usize {
        self.residues.iter().map(Residue::len).sum()
    }

    /// Looks up a residue by its 1-based chain-local id.
    pub fn residue(&self, local_id: usize) -> Option<&Residue> {
        self.residues
            .iter()
            .find(|r| r.chain_local_id() == Some(local_id))
    }

    pub(crate) fn residue_mut(&mut self, local_id: usize) -> Option<&mut Residue> {
        self.residues
            .iter_mut()
            .find(|r| r.chain_local_id() == Some(local_id))
    }

    /// Looks up the first residue carrying this residue sequence number from the file.
    pub fn residue_by_number(&self, residue_id: isize) -> Option<&Residue> {
        self.residues.iter().find(|r| r.id() == residue_id)
    }

    pub fn atoms(&self) -> impl Iterator<Item = &AtomRecord> {
        self.residues.iter().flat_map(Residue::iter)
    }
}

impl Index<usize> for Chain {
    type Output = Residue;

    fn index(&self, index: usize) -> &Self::Output {
        &self.residues[index]
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Residue;
    type IntoIter = std::slice::Iter<'a, Residue>;

    fn into_iter(self) -> Self::IntoIter {
        self.residues.iter()
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) if !name.is_empty() => {
                write!(f, "chain {} [{} residues]", name, self.residues.len())
            }
            _ => write!(f, "unnamed chain [{} residues]", self.residues.len()),
        }
    }
}
