//! Reaction network representation.
//!
//! The network is an input constructed by the caller (typically from a
//! model-export step) and is immutable once built. Construction resolves all
//! name references to indices and rejects dangling ones, so the evaluation
//! stages can index without re-checking.

use std::collections::{BTreeMap, HashMap};

use ndarray::ArrayView1;

use crate::error::AnalysisError;

/// Rate law of a single reaction.
///
/// Mass action covers the networks the upstream model generators expand to.
/// Kept as an enum so other kinetics can be added without changing the
/// evaluator's callers.
#[derive(Clone, Debug, PartialEq)]
pub enum RateLaw {
    /// `k * prod([reactant_i]^stoich_i)` with `k` a named model parameter.
    MassAction { rate_constant: String },
}

/// Caller-facing reaction description with species referenced by name.
#[derive(Clone, Debug)]
pub struct ReactionSpec {
    pub name: String,
    pub rate: RateLaw,
    /// (species name, stoichiometric coefficient) pairs.
    pub reactants: Vec<(String, u32)>,
    pub products: Vec<(String, u32)>,
}

/// Validated reaction with all references resolved to indices.
#[derive(Clone, Debug)]
pub struct Reaction {
    name: String,
    /// Parameter index of the rate constant.
    rate_constant: usize,
    /// (species index, stoichiometry) factors of the mass-action product.
    reactants: Vec<(usize, u32)>,
    /// Net stoichiometric coefficient per species (products - reactants).
    /// Catalytic appearances cancel to zero and are removed.
    net_stoich: BTreeMap<usize, i32>,
}

impl Reaction {
    /// Reaction name as supplied by the caller.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Net stoichiometric coefficient of a species in this reaction.
    /// Zero when the reaction does not change the species.
    pub fn net_stoich(&self, species: usize) -> i32 {
        self.net_stoich.get(&species).copied().unwrap_or(0)
    }

    /// Whether this reaction produces or consumes the species.
    pub fn affects(&self, species: usize) -> bool {
        self.net_stoich.contains_key(&species)
    }

    /// Instantaneous rate at one time point.
    ///
    /// # Arguments
    /// * `concentrations` - Species concentrations at the time point
    /// * `parameters` - Parameter values in model order
    pub fn rate_at(&self, concentrations: ArrayView1<f64>, parameters: &[f64]) -> f64 {
        let mut rate = parameters[self.rate_constant];
        for &(sp, stoich) in &self.reactants {
            rate *= concentrations[sp].powi(stoich as i32);
        }
        rate
    }
}

/// Immutable reaction network: species, parameters and validated reactions.
#[derive(Clone, Debug)]
pub struct ReactionNetwork {
    species: Vec<String>,
    parameters: Vec<String>,
    reactions: Vec<Reaction>,
    species_idx: HashMap<String, usize>,
}

impl ReactionNetwork {
    /// Build a network, resolving every name reference.
    ///
    /// # Arguments
    /// * `species` - Species identifiers; position defines the species index
    /// * `parameters` - Parameter names; position defines the parameter index
    /// * `reactions` - Reaction descriptions referencing species by name
    ///
    /// Fails with `InvalidModelReference` if a reaction names a species or
    /// parameter that does not exist.
    pub fn new(
        species: Vec<String>,
        parameters: Vec<String>,
        reactions: Vec<ReactionSpec>,
    ) -> Result<Self, AnalysisError> {
        let species_idx: HashMap<String, usize> = species
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i))
            .collect();
        let param_idx: HashMap<&str, usize> = parameters
            .iter()
            .enumerate()
            .map(|(i, p)| (p.as_str(), i))
            .collect();

        let resolve = |reaction: usize, name: &str| -> Result<usize, AnalysisError> {
            species_idx.get(name).copied().ok_or_else(|| {
                AnalysisError::InvalidModelReference {
                    reaction,
                    kind: "species",
                    name: name.to_string(),
                }
            })
        };

        let mut resolved = Vec::with_capacity(reactions.len());
        for (r, spec) in reactions.into_iter().enumerate() {
            let RateLaw::MassAction { rate_constant } = &spec.rate;
            let rate_constant = param_idx.get(rate_constant.as_str()).copied().ok_or_else(
                || AnalysisError::InvalidModelReference {
                    reaction: r,
                    kind: "parameter",
                    name: rate_constant.clone(),
                },
            )?;

            let mut reactants = Vec::with_capacity(spec.reactants.len());
            let mut net_stoich: BTreeMap<usize, i32> = BTreeMap::new();
            for (name, stoich) in &spec.reactants {
                let sp = resolve(r, name)?;
                reactants.push((sp, *stoich));
                *net_stoich.entry(sp).or_insert(0) -= *stoich as i32;
            }
            for (name, stoich) in &spec.products {
                let sp = resolve(r, name)?;
                *net_stoich.entry(sp).or_insert(0) += *stoich as i32;
            }
            net_stoich.retain(|_, net| *net != 0);

            resolved.push(Reaction {
                name: spec.name,
                rate_constant,
                reactants,
                net_stoich,
            });
        }

        Ok(Self {
            species,
            parameters,
            reactions: resolved,
            species_idx,
        })
    }

    /// Number of species.
    #[inline]
    pub fn n_species(&self) -> usize {
        self.species.len()
    }

    /// Number of reactions.
    #[inline]
    pub fn n_reactions(&self) -> usize {
        self.reactions.len()
    }

    /// Number of parameters.
    #[inline]
    pub fn n_parameters(&self) -> usize {
        self.parameters.len()
    }

    /// Species names in index order.
    pub fn species(&self) -> &[String] {
        &self.species
    }

    /// Look up a species index by name.
    pub fn species_index(&self, name: &str) -> Option<usize> {
        self.species_idx.get(name).copied()
    }

    /// Validated reactions in index order.
    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    /// Indices of reactions with a nonzero net effect on a species.
    pub fn reactions_affecting(&self, species: usize) -> Vec<usize> {
        self.reactions
            .iter()
            .enumerate()
            .filter(|(_, rxn)| rxn.affects(species))
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A -> B -> C chain plus a B-consuming decay, mass action throughout.
    pub(crate) fn chain_network() -> ReactionNetwork {
        ReactionNetwork::new(
            vec!["A".to_string(), "B".to_string(), "C".to_string()],
            vec!["k1".to_string(), "k2".to_string(), "k3".to_string()],
            vec![
                ReactionSpec {
                    name: "a_to_b".to_string(),
                    rate: RateLaw::MassAction {
                        rate_constant: "k1".to_string(),
                    },
                    reactants: vec![("A".to_string(), 1)],
                    products: vec![("B".to_string(), 1)],
                },
                ReactionSpec {
                    name: "b_to_c".to_string(),
                    rate: RateLaw::MassAction {
                        rate_constant: "k2".to_string(),
                    },
                    reactants: vec![("B".to_string(), 1)],
                    products: vec![("C".to_string(), 1)],
                },
                ReactionSpec {
                    name: "b_decay".to_string(),
                    rate: RateLaw::MassAction {
                        rate_constant: "k3".to_string(),
                    },
                    reactants: vec![("B".to_string(), 1)],
                    products: vec![],
                },
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_network_construction() {
        let network = chain_network();
        assert_eq!(network.n_species(), 3);
        assert_eq!(network.n_reactions(), 3);
        assert_eq!(network.species_index("B"), Some(1));
        assert_eq!(network.species_index("X"), None);
    }

    #[test]
    fn test_net_stoichiometry() {
        let network = chain_network();
        // a_to_b produces B, b_to_c and b_decay consume it
        assert_eq!(network.reactions()[0].net_stoich(1), 1);
        assert_eq!(network.reactions()[1].net_stoich(1), -1);
        assert_eq!(network.reactions()[2].net_stoich(1), -1);
        assert_eq!(network.reactions_affecting(1), vec![0, 1, 2]);
    }

    #[test]
    fn test_catalytic_appearance_cancels() {
        // E + S -> E + P: E appears on both sides with equal counts
        let network = ReactionNetwork::new(
            vec!["E".to_string(), "S".to_string(), "P".to_string()],
            vec!["kcat".to_string()],
            vec![ReactionSpec {
                name: "catalysis".to_string(),
                rate: RateLaw::MassAction {
                    rate_constant: "kcat".to_string(),
                },
                reactants: vec![("E".to_string(), 1), ("S".to_string(), 1)],
                products: vec![("E".to_string(), 1), ("P".to_string(), 1)],
            }],
        )
        .unwrap();

        assert!(!network.reactions()[0].affects(0));
        assert_eq!(network.reactions()[0].net_stoich(1), -1);
        assert_eq!(network.reactions()[0].net_stoich(2), 1);
    }

    #[test]
    fn test_undefined_species_rejected() {
        let err = ReactionNetwork::new(
            vec!["A".to_string()],
            vec!["k1".to_string()],
            vec![ReactionSpec {
                name: "bad".to_string(),
                rate: RateLaw::MassAction {
                    rate_constant: "k1".to_string(),
                },
                reactants: vec![("A".to_string(), 1)],
                products: vec![("Ghost".to_string(), 1)],
            }],
        )
        .unwrap_err();

        assert_eq!(
            err,
            AnalysisError::InvalidModelReference {
                reaction: 0,
                kind: "species",
                name: "Ghost".to_string(),
            }
        );
    }

    #[test]
    fn test_undefined_parameter_rejected() {
        let err = ReactionNetwork::new(
            vec!["A".to_string()],
            vec![],
            vec![ReactionSpec {
                name: "bad".to_string(),
                rate: RateLaw::MassAction {
                    rate_constant: "k_missing".to_string(),
                },
                reactants: vec![("A".to_string(), 1)],
                products: vec![],
            }],
        )
        .unwrap_err();

        assert!(matches!(
            err,
            AnalysisError::InvalidModelReference {
                kind: "parameter",
                ..
            }
        ));
    }

    #[test]
    fn test_mass_action_rate() {
        let network = chain_network();
        let conc = ndarray::array![2.0, 3.0, 0.0];
        let params = [0.5, 1.0, 1.0];
        // k1 * [A] = 0.5 * 2.0
        let rate = network.reactions()[0].rate_at(conc.view(), &params);
        assert!((rate - 1.0).abs() < 1e-12);
    }
}
