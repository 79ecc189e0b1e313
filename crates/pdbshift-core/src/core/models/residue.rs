use super::atom::AtomRecord;
use super::error::ModelError;
use std::collections::HashSet;
use std::fmt;
use std::ops::Index;
use tracing::warn;

const ALPHA_CARBON_ATOM_NAME: &str = "CA";

/// An ordered run of atoms sharing one residue id within one chain.
///
/// The residue exclusively owns its atoms. Residue name and atom names can only be
/// changed through the methods here, which fan the change out so that every atom keeps
/// agreeing with the residue.
#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    name: String,
    id: isize,
    chain_id: String,
    chain_local_id: Option<usize>,
    atoms: Vec<AtomRecord>,
}

impl Residue {
    /// Builds a residue from a non-empty run of atoms.
    ///
    /// Residue id, chain and name are taken from the first atom. Atoms carrying a
    /// different residue name are brought in line with the first one.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::EmptyResidue`] if `atoms` is empty.
    pub(crate) fn from_atoms(mut atoms: Vec<AtomRecord>) -> Result<Self, ModelError> {
        let first = atoms.first().ok_or(ModelError::EmptyResidue)?;
        let name = first.residue_name().to_string();
        let id = first.residue_id();
        let chain_id = first.chain_id().to_string();
        let chain_local_id = first.chain_local_id();

        for atom in atoms.iter_mut().filter(|a| a.residue_name() != name) {
            warn!(
                "Atom {} in residue {} carries residue name '{}'; using '{}'",
                atom.atom_id(),
                id,
                atom.residue_name(),
                name
            );
            atom.set_residue_name(&name);
        }

        Ok(Self {
            name,
            id,
            chain_id,
            chain_local_id,
            atoms,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The residue sequence number from the source file.
    pub fn id(&self) -> isize {
        self.id
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn chain_local_id(&self) -> Option<usize> {
        self.chain_local_id
    }

    pub fn atoms(&self) -> &[AtomRecord] {
        &self.atoms
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AtomRecord> {
        self.atoms.iter()
    }

    pub fn get(&self, index: usize) -> Option<&AtomRecord> {
        self.atoms.get(index)
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Returns the first atom with exactly this name.
    pub fn atom(&self, name: &str) -> Option<&AtomRecord> {
        self.atoms.iter().find(|a| a.atom_name() == name)
    }

    pub fn alpha_carbon(&self) -> Option<&AtomRecord> {
        self.atom(ALPHA_CARBON_ATOM_NAME)
    }

    pub(crate) fn assign_chain_local_id(&mut self, chain_local_id: usize) {
        self.chain_local_id = Some(chain_local_id);
        for atom in &mut self.atoms {
            atom.set_chain_local_id(chain_local_id);
        }
    }

    /// Rearranges the atoms into the given name order.
    ///
    /// Serial numbers stay attached to positions, not to atoms: the atom that lands in
    /// slot `i` takes the serial that slot `i` held before the reorder. Every atom whose
    /// name matches a requested name is moved, in its current relative order, so the
    /// request must cover the whole residue.
    ///
    /// # Arguments
    ///
    /// * `order` - The atom names in their new order.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateOrderName`] if `order` names an atom twice, and
    /// [`ModelError::IncompleteOrder`] if the matched atoms do not cover the residue.
    /// The residue is left untouched on error.
    pub fn set_atom_order<S: AsRef<str>>(&mut self, order: &[S]) -> Result<(), ModelError> {
        let mut seen = HashSet::with_capacity(order.len());
        for name in order {
            if !seen.insert(name.as_ref()) {
                return Err(ModelError::DuplicateOrderName {
                    residue_id: self.id,
                    atom_name: name.as_ref().to_string(),
                });
            }
        }

        let permutation: Vec<usize> = order
            .iter()
            .flat_map(|name| {
                self.atoms
                    .iter()
                    .enumerate()
                    .filter(move |(_, atom)| atom.atom_name() == name.as_ref())
                    .map(|(idx, _)| idx)
            })
            .collect();

        if permutation.len() != self.atoms.len() {
            return Err(ModelError::IncompleteOrder {
                residue_id: self.id,
                residue_name: self.name.clone(),
                expected: self.atoms.len(),
                matched: permutation.len(),
            });
        }

        let serials: Vec<usize> = self.atoms.iter().map(AtomRecord::atom_id).collect();
        let mut slots: Vec<Option<AtomRecord>> = std::mem::take(&mut self.atoms)
            .into_iter()
            .map(Some)
            .collect();

        self.atoms = permutation
            .into_iter()
            .zip(serials)
            .filter_map(|(idx, serial)| {
                slots[idx].take().map(|mut atom| {
                    atom.set_atom_id(serial);
                    atom
                })
            })
            .collect();
        Ok(())
    }

    /// Renames the residue and every atom in it.
    pub fn rename(&mut self, new_name: &str) {
        for atom in &mut self.atoms {
            atom.set_residue_name(new_name);
        }
        self.name = new_name.to_string();
    }

    /// Renames the first atom called `old_name`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::AtomNotFound`] if no atom carries `old_name`; no atom is
    /// changed in that case.
    pub fn rename_atom(&mut self, old_name: &str, new_name: &str) -> Result<(), ModelError> {
        match self.atoms.iter_mut().find(|a| a.atom_name() == old_name) {
            Some(atom) => {
                atom.set_atom_name(new_name);
                Ok(())
            }
            None => Err(ModelError::AtomNotFound {
                atom_name: old_name.to_string(),
                replacement: new_name.to_string(),
                residue_id: self.id,
                residue_name: self.name.clone(),
                chain_id: self.chain_id.clone(),
            }),
        }
    }
}

impl Index<usize> for Residue {
    type Output = AtomRecord;

    fn index(&self, index: usize) -> &Self::Output {
        &self.atoms[index]
    }
}

impl<'a> IntoIterator for &'a Residue {
    type Item = &'a AtomRecord;
    type IntoIter = std::slice::Iter<'a, AtomRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.atoms.iter()
    }
}

impl fmt::Display for Residue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} [{} atoms]", self.name, self.id, self.atoms.len())
    }
}
