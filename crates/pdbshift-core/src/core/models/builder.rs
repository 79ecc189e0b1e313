use super::atom::AtomRecord;
use super::chain::Chain;
use super::error::ModelError;
use indexmap::IndexMap;

/// Ordered map from chain identifier to chain, in first-appearance order.
pub type ChainMap = IndexMap<String, Chain>;

/// Partitions a flat stream of atom records into chains.
///
/// Atoms are bucketed by chain identifier as they arrive; the buckets keep the order in
/// which each identifier was first seen and the relative order of atoms within a
/// chain. Residue segmentation and chain-local numbering happen in [`ChainBuilder::build`].
#[derive(Debug, Default)]
pub struct ChainBuilder {
    partitions: IndexMap<String, Vec<AtomRecord>>,
}

impl ChainBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, atom: AtomRecord) -> &mut Self {
        self.partitions
            .entry(atom.chain_id().to_string())
            .or_default()
            .push(atom);
        self
    }

    pub fn extend(&mut self, atoms: impl IntoIterator<Item = AtomRecord>) -> &mut Self {
        for atom in atoms {
            self.push(atom);
        }
        self
    }

    pub fn build(self) -> Result<ChainMap, ModelError> {
        self.partitions
            .into_iter()
            .map(|(chain_id, atoms)| Chain::from_atoms(atoms).map(|chain| (chain_id, chain)))
            .collect()
    }

    /// Groups an ordered atom stream into chains in one call.
    pub fn group(atoms: impl IntoIterator<Item = AtomRecord>) -> Result<ChainMap, ModelError> {
        let mut builder = Self::new();
        builder.extend(atoms);
        builder.build()
    }
}
