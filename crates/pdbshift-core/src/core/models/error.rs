use thiserror::Error;

/// Errors raised while building or editing the chain/residue/atom hierarchy.
///
/// Variants fall into two families: lookup failures (a requested chain, residue or
/// atom does not exist) and structural mismatches (an edit or construction request
/// that would break the hierarchy's invariants). Use [`ModelError::is_lookup_failure`]
/// and [`ModelError::is_structural_mismatch`] to branch on the family.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("No chain with identifier '{chain_id}' in structure")]
    ChainNotFound { chain_id: String },

    #[error("No residue with chain-local id {local_id} in chain '{chain_id}'")]
    ResidueNotFound { chain_id: String, local_id: usize },

    #[error(
        "Unable to find atom '{atom_name}' in residue {residue_id} ({residue_name}) in chain '{chain_id}' (to replace with '{replacement}')"
    )]
    AtomNotFound {
        atom_name: String,
        replacement: String,
        residue_id: isize,
        residue_name: String,
        chain_id: String,
    },

    #[error(
        "New atom order for residue {residue_id} ({residue_name}) must cover every atom exactly once: matched {matched} of {expected}"
    )]
    IncompleteOrder {
        residue_id: isize,
        residue_name: String,
        expected: usize,
        matched: usize,
    },

    #[error("Atom name '{atom_name}' appears more than once in the new order for residue {residue_id}")]
    DuplicateOrderName { residue_id: isize, atom_name: String },

    #[error("Atom {atom_id} belongs to chain '{found}' but was passed to chain '{expected}'")]
    MixedChain {
        expected: String,
        found: String,
        atom_id: usize,
    },

    #[error("A residue must contain at least one atom")]
    EmptyResidue,
}

impl ModelError {
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            ModelError::ChainNotFound { .. }
                | ModelError::ResidueNotFound { .. }
                | ModelError::AtomNotFound { .. }
        )
    }

    pub fn is_structural_mismatch(&self) -> bool {
        !self.is_lookup_failure()
    }
}
