use super::config::{ConversionConfig, ConversionDirection};
use crate::core::models::error::ModelError;
use crate::core::models::residue::Residue;
use crate::core::models::structure::PdbStructure;
use phf::{Map, phf_map};
use std::fmt;
use std::ops::AddAssign;
use thiserror::Error;
use tracing::{debug, info, instrument};

const HISTIDINE: &str = "HIS";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConvertError {
    #[error(
        "Histidine residue {residue_id} in chain '{chain_id}' has an odd protonation state ({epsilon} HE and {delta} HD protons)"
    )]
    AmbiguousHistidine {
        chain_id: String,
        residue_id: isize,
        epsilon: usize,
        delta: usize,
    },
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Counts of the edits a conversion applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionReport {
    pub residues_renamed: usize,
    pub atoms_renamed: usize,
    pub residues_reordered: usize,
}

impl ConversionReport {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl AddAssign for ConversionReport {
    fn add_assign(&mut self, other: Self) {
        self.residues_renamed += other.residues_renamed;
        self.atoms_renamed += other.atoms_renamed;
        self.residues_reordered += other.residues_reordered;
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} residues renamed, {} atoms renamed, {} residues reordered",
            self.residues_renamed, self.atoms_renamed, self.residues_reordered
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminus {
    Leading,
    Trailing,
}

/// How one terminal cap residue is rewritten.
struct CapRule {
    terminus: Terminus,
    residue_name: &'static str,
    order: &'static [&'static str],
    rename_to: Option<&'static str>,
    atom_renames: &'static [(&'static str, &'static str)],
}

const CAMPARI_TO_GROMACS_CAPS: &[CapRule] = &[
    CapRule {
        terminus: Terminus::Leading,
        residue_name: "ACE",
        order: &["CH3", "1H", "2H", "3H", "C", "O"],
        rename_to: None,
        atom_renames: &[("1H", "1HH3"), ("2H", "2HH3"), ("3H", "3HH3")],
    },
    CapRule {
        terminus: Terminus::Trailing,
        residue_name: "NME",
        order: &["N", "HN", "CH3", "1H", "2H", "3H"],
        rename_to: Some("NAC"),
        atom_renames: &[("HN", "H"), ("1H", "1HH3"), ("2H", "2HH3"), ("3H", "3HH3")],
    },
];

const GROMACS_TO_CAMPARI_CAPS: &[CapRule] = &[
    CapRule {
        terminus: Terminus::Leading,
        residue_name: "ACE",
        order: &["CH3", "C", "O", "1HH3", "2HH3", "3HH3"],
        rename_to: None,
        atom_renames: &[("1HH3", "1H"), ("2HH3", "2H"), ("3HH3", "3H")],
    },
    CapRule {
        terminus: Terminus::Trailing,
        residue_name: "NAC",
        order: &["N", "CH3", "H", "1HH3", "2HH3", "3HH3"],
        rename_to: Some("NME"),
        atom_renames: &[("H", "HN"), ("1HH3", "1H"), ("2HH3", "2H"), ("3HH3", "3H")],
    },
];

#[derive(Debug, Clone, Copy)]
enum RingNitrogen {
    Epsilon,
    Delta,
}

static HISTIDINE_PROTONS: Map<&'static str, RingNitrogen> = phf_map! {
    "HE1" => RingNitrogen::Epsilon,
    "HE2" => RingNitrogen::Epsilon,
    "HD1" => RingNitrogen::Delta,
    "HD2" => RingNitrogen::Delta,
};

fn cap_rules(direction: ConversionDirection) -> &'static [CapRule] {
    match direction {
        ConversionDirection::CampariToGromacs => CAMPARI_TO_GROMACS_CAPS,
        ConversionDirection::GromacsToCampari => GROMACS_TO_CAMPARI_CAPS,
    }
}

/// Rewrites residue and atom names of every chain between the CAMPARI and GROMACS
/// conventions.
///
/// With `cap_change` set, a leading `ACE` and a trailing `NME`/`NAC` cap are reordered
/// and renamed. Converting to CAMPARI additionally renames each `HIS` residue to `HIP`,
/// `HIE` or `HID` according to which ring protons it carries.
///
/// Edits are applied in place through the structure's mutation API and are not rolled
/// back: on error, chains processed before the failing one stay converted.
///
/// # Errors
///
/// Returns [`ConvertError::Model`] if a cap residue does not hold exactly the expected
/// atoms, and [`ConvertError::AmbiguousHistidine`] for a histidine whose protonation
/// cannot be classified.
#[instrument(skip_all, name = "convert_workflow", fields(direction = %config.direction))]
pub fn run(
    structure: &mut PdbStructure,
    config: &ConversionConfig,
) -> Result<ConversionReport, ConvertError> {
    let mut report = ConversionReport::default();
    let chain_ids: Vec<String> = structure.chain_ids().map(str::to_string).collect();

    for chain_id in &chain_ids {
        if config.cap_change {
            for rule in cap_rules(config.direction) {
                apply_cap_rule(structure, chain_id, rule, &mut report)?;
            }
        }
        if config.direction == ConversionDirection::GromacsToCampari {
            assign_histidine_names(structure, chain_id, &mut report)?;
        }
    }

    info!(chains = chain_ids.len(), "Conversion finished: {}.", report);
    Ok(report)
}

fn apply_cap_rule(
    structure: &mut PdbStructure,
    chain_id: &str,
    rule: &CapRule,
    report: &mut ConversionReport,
) -> Result<(), ConvertError> {
    let Some(chain) = structure.chain(chain_id) else {
        return Ok(());
    };
    let (local_id, residue) = match rule.terminus {
        Terminus::Leading => (1, chain.residues().first()),
        Terminus::Trailing => (chain.len(), chain.residues().last()),
    };
    if !residue.is_some_and(|r| r.name() == rule.residue_name) {
        return Ok(());
    }

    structure.define_residue_order(chain_id, local_id, rule.order)?;
    report.residues_reordered += 1;

    if let Some(new_name) = rule.rename_to {
        structure.rename_residue(chain_id, local_id, new_name)?;
        report.residues_renamed += 1;
    }
    for (old_name, new_name) in rule.atom_renames {
        structure.rename_atom(chain_id, local_id, old_name, new_name)?;
        report.atoms_renamed += 1;
    }

    debug!(
        chain = chain_id,
        residue = local_id,
        "Rewrote {:?} cap {}.",
        rule.terminus,
        rule.residue_name
    );
    Ok(())
}

fn histidine_name(chain_id: &str, residue: &Residue) -> Result<&'static str, ConvertError> {
    let (mut epsilon, mut delta) = (0, 0);
    for atom in residue {
        match HISTIDINE_PROTONS.get(atom.atom_name()) {
            Some(RingNitrogen::Epsilon) => epsilon += 1,
            Some(RingNitrogen::Delta) => delta += 1,
            None => {}
        }
    }

    match (epsilon, delta) {
        (2, 2) => Ok("HIP"),
        (2, _) => Ok("HIE"),
        (_, 2) => Ok("HID"),
        _ => Err(ConvertError::AmbiguousHistidine {
            chain_id: chain_id.to_string(),
            residue_id: residue.id(),
            epsilon,
            delta,
        }),
    }
}

fn assign_histidine_names(
    structure: &mut PdbStructure,
    chain_id: &str,
    report: &mut ConversionReport,
) -> Result<(), ConvertError> {
    let Some(chain) = structure.chain(chain_id) else {
        return Ok(());
    };
    let renames = chain
        .iter()
        .enumerate()
        .filter(|(_, residue)| residue.name() == HISTIDINE)
        .map(|(idx, residue)| histidine_name(chain_id, residue).map(|name| (idx + 1, name)))
        .collect::<Result<Vec<_>, _>>()?;

    for (local_id, name) in renames {
        structure.rename_residue(chain_id, local_id, name)?;
        report.residues_renamed += 1;
        debug!(chain = chain_id, residue = local_id, "Renamed HIS to {}.", name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::AtomRecord;
    use crate::core::models::builder::ChainBuilder;
    use crate::workflows::config::ConversionConfigBuilder;
    use nalgebra::Point3;

    fn residue(
        first_serial: usize,
        name: &str,
        chain: &str,
        residue_id: isize,
        atom_names: &[&str],
    ) -> Vec<AtomRecord> {
        atom_names
            .iter()
            .enumerate()
            .map(|(i, atom_name)| {
                AtomRecord::new(
                    first_serial + i,
                    atom_name,
                    name,
                    chain,
                    residue_id,
                    Point3::new(i as f64, 0.0, 0.0),
                )
            })
            .collect()
    }

    fn structure(residues: Vec<Vec<AtomRecord>>) -> PdbStructure {
        let chains = ChainBuilder::group(residues.into_iter().flatten()).unwrap();
        PdbStructure::new(Vec::new(), chains, Vec::new())
    }

    fn names(structure: &PdbStructure, chain: &str, local_id: usize) -> Vec<String> {
        structure
            .chain(chain)
            .unwrap()
            .residue(local_id)
            .unwrap()
            .iter()
            .map(|a| a.atom_name().to_string())
            .collect()
    }

    fn campari_peptide() -> PdbStructure {
        structure(vec![
            residue(1, "ACE", "A", 1, &["C", "O", "CH3", "1H", "2H", "3H"]),
            residue(7, "ALA", "A", 2, &["N", "CA"]),
            residue(9, "NME", "A", 3, &["N", "CH3", "HN", "1H", "2H", "3H"]),
        ])
    }

    fn gromacs_peptide() -> PdbStructure {
        structure(vec![
            residue(1, "ACE", "A", 1, &["1HH3", "CH3", "2HH3", "3HH3", "C", "O"]),
            residue(7, "ALA", "A", 2, &["N", "CA"]),
            residue(9, "NAC", "A", 3, &["N", "H", "CH3", "1HH3", "2HH3", "3HH3"]),
        ])
    }

    #[test]
    fn campari_caps_are_rewritten_for_gromacs() {
        let mut structure = campari_peptide();
        let config = ConversionConfig::new(ConversionDirection::CampariToGromacs);

        let report = run(&mut structure, &config).unwrap();

        assert_eq!(names(&structure, "A", 1), ["CH3", "1HH3", "2HH3", "3HH3", "C", "O"]);
        assert_eq!(names(&structure, "A", 3), ["N", "H", "CH3", "1HH3", "2HH3", "3HH3"]);
        let cap = structure.chain("A").unwrap().residue(3).unwrap();
        assert_eq!(cap.name(), "NAC");
        assert!(cap.iter().all(|a| a.residue_name() == "NAC"));
        assert_eq!(
            cap.iter().map(AtomRecord::atom_id).collect::<Vec<_>>(),
            vec![9, 10, 11, 12, 13, 14]
        );
        assert_eq!(
            report,
            ConversionReport {
                residues_renamed: 1,
                atoms_renamed: 7,
                residues_reordered: 2,
            }
        );
    }

    #[test]
    fn gromacs_caps_are_restored_for_campari_when_requested() {
        let mut structure = gromacs_peptide();
        let config = ConversionConfig {
            direction: ConversionDirection::GromacsToCampari,
            cap_change: true,
        };

        run(&mut structure, &config).unwrap();

        assert_eq!(names(&structure, "A", 1), ["CH3", "C", "O", "1H", "2H", "3H"]);
        assert_eq!(names(&structure, "A", 3), ["N", "CH3", "HN", "1H", "2H", "3H"]);
        assert_eq!(structure.chain("A").unwrap()[2].name(), "NME");
    }

    #[test]
    fn disabled_cap_change_leaves_structure_untouched() {
        let mut structure = campari_peptide();
        let original = structure.clone();
        let config = ConversionConfigBuilder::new()
            .direction(ConversionDirection::CampariToGromacs)
            .cap_change(false)
            .build()
            .unwrap();

        let report = run(&mut structure, &config).unwrap();

        assert!(report.is_empty());
        assert_eq!(structure, original);
    }

    #[test]
    fn caps_away_from_the_termini_are_ignored() {
        let mut structure = structure(vec![
            residue(1, "ALA", "A", 1, &["N", "CA"]),
            residue(3, "ACE", "A", 2, &["C", "O", "CH3"]),
            residue(6, "GLY", "A", 3, &["N", "CA"]),
        ]);
        let config = ConversionConfig::new(ConversionDirection::CampariToGromacs);

        let report = run(&mut structure, &config).unwrap();
        assert!(report.is_empty());
        assert_eq!(names(&structure, "A", 2), ["C", "O", "CH3"]);
    }

    #[test]
    fn histidines_are_named_by_protonation() {
        let mut structure = structure(vec![
            residue(1, "HIS", "A", 1, &["CA", "HD1", "HD2", "HE1", "HE2"]),
            residue(6, "HIS", "A", 2, &["CA", "HD2", "HE1", "HE2"]),
            residue(10, "HIS", "A", 3, &["CA", "HD1", "HD2", "HE1"]),
            residue(14, "ALA", "A", 4, &["CA"]),
        ]);
        let config = ConversionConfig::new(ConversionDirection::GromacsToCampari);

        let report = run(&mut structure, &config).unwrap();

        let chain = structure.chain("A").unwrap();
        let residue_names: Vec<&str> = chain.iter().map(|r| r.name()).collect();
        assert_eq!(residue_names, ["HIP", "HIE", "HID", "ALA"]);
        assert_eq!(report.residues_renamed, 3);
        assert_eq!(report.residues_reordered, 0);
    }

    #[test]
    fn histidines_are_left_alone_when_converting_to_gromacs() {
        let mut structure = structure(vec![residue(1, "HIS", "A", 1, &["CA", "HE2"])]);
        let config = ConversionConfig::new(ConversionDirection::CampariToGromacs);

        run(&mut structure, &config).unwrap();
        assert_eq!(structure.chain("A").unwrap()[0].name(), "HIS");
    }

    #[test]
    fn odd_histidine_protonation_is_an_error() {
        let mut structure = structure(vec![
            residue(1, "ALA", "B", 1, &["CA"]),
            residue(2, "HIS", "B", 7, &["CA", "HD2", "HE1"]),
        ]);
        let config = ConversionConfig::new(ConversionDirection::GromacsToCampari);

        let err = run(&mut structure, &config).unwrap_err();
        assert_eq!(
            err,
            ConvertError::AmbiguousHistidine {
                chain_id: "B".into(),
                residue_id: 7,
                epsilon: 1,
                delta: 1,
            }
        );
    }

    #[test]
    fn incomplete_cap_surfaces_the_model_error() {
        let mut structure = structure(vec![
            residue(1, "ACE", "A", 1, &["C", "O", "CH3", "1H", "2H", "3H", "OXT"]),
            residue(8, "ALA", "A", 2, &["N", "CA"]),
        ]);
        let config = ConversionConfig::new(ConversionDirection::CampariToGromacs);

        let err = run(&mut structure, &config).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Model(ModelError::IncompleteOrder {
                residue_id: 1,
                expected: 7,
                matched: 6,
                ..
            })
        ));
        assert_eq!(
            names(&structure, "A", 1),
            ["C", "O", "CH3", "1H", "2H", "3H", "OXT"]
        );
    }

    #[test]
    fn cap_missing_a_hydrogen_fails_on_rename() {
        let mut structure = structure(vec![residue(1, "ACE", "A", 1, &["C", "O", "CH3", "1H", "2H"])]);
        let config = ConversionConfig::new(ConversionDirection::CampariToGromacs);

        let err = run(&mut structure, &config).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Model(ModelError::AtomNotFound { ref atom_name, .. }) if atom_name == "3H"
        ));
    }

    #[test]
    fn every_chain_is_converted() {
        let mut structure = structure(vec![
            residue(1, "ACE", "A", 1, &["CH3", "C", "O", "1H", "2H", "3H"]),
            residue(7, "ACE", "B", 1, &["CH3", "C", "O", "1H", "2H", "3H"]),
        ]);
        let config = ConversionConfig::new(ConversionDirection::CampariToGromacs);

        let report = run(&mut structure, &config).unwrap();
        assert_eq!(report.residues_reordered, 2);
        assert_eq!(names(&structure, "B", 1), ["CH3", "1HH3", "2HH3", "3HH3", "C", "O"]);
    }

    #[test]
    fn reports_accumulate() {
        let mut total = ConversionReport::default();
        total += ConversionReport {
            residues_renamed: 1,
            atoms_renamed: 2,
            residues_reordered: 3,
        };
        total += ConversionReport {
            residues_renamed: 1,
            atoms_renamed: 0,
            residues_reordered: 1,
        };
        assert_eq!(
            total.to_string(),
            "2 residues renamed, 2 atoms renamed, 4 residues reordered"
        );
    }
}
