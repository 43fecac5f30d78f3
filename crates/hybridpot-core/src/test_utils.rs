//! Fixtures shared by unit tests. Neighbor lists are built by brute force
//! here; in production the host owns that.

use crate::core::forcefield::params::{LennardJonesConfig, LennardJonesConfigBuilder};
use crate::core::learned::atomic::{AtomicModel, AtomicModelError, NeuralAtomicModel};
use crate::core::learned::descriptor::RadialSymmetryFunctions;
use crate::core::learned::readout::{Activation, DenseLayer, Readout};
use crate::core::models::neighbors::{NeighborListRequest, NeighborPair, NeighborPairSet};
use crate::core::models::system::{PeriodicSystem, SpeciesCode};
use nalgebra::{DMatrix, DVector, Matrix3, Point3, Vector3};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Baseline energy of [`propenol_frame`] under [`reference_config`].
pub const PROPENOL_BASELINE_ENERGY: f64 = 3.0488191939494205;

pub fn reference_config() -> LennardJonesConfig {
    LennardJonesConfigBuilder::new()
        .cutoff(6.0)
        .species(1, 2.32, 3.3104e-6)
        .species(6, 2.94, 2.3309e-6)
        .species(8, 2.66, 2.4673e-6)
        .build()
        .unwrap()
}

const PROPENOL: [(SpeciesCode, [f64; 3]); 9] = [
    (6, [0.0, 0.0, 0.0]),
    (6, [1.3308, 0.0, 0.0]),
    (6, [2.1013, 1.2808, 0.0]),
    (8, [3.4921, 1.0506, 0.0]),
    (1, [-0.5603, 0.9306, 0.0]),
    (1, [-0.5603, -0.9306, 0.0]),
    (1, [1.8811, -0.9406, 0.0]),
    (1, [1.8211, 1.8611, 0.8905]),
    (1, [3.8823, 1.9212, 0.0]),
];

/// Open 9-atom propenol-like frame (C3 O H5).
pub fn propenol_frame() -> PeriodicSystem {
    let (species, positions) = PROPENOL
        .iter()
        .map(|&(s, [x, y, z])| (s, Point3::new(x, y, z)))
        .unzip();
    PeriodicSystem::open(positions, species).unwrap()
}

/// A distorted copy of the propenol frame inside a periodic box small enough
/// for images to interact.
pub fn unseen_frame() -> PeriodicSystem {
    let positions = PROPENOL
        .iter()
        .enumerate()
        .map(|(i, &(_, [x, y, z]))| {
            let jitter = 0.05 * (i as f64 + 1.0).sin();
            Point3::new(x + 1.0 + jitter, y + 1.5 - jitter, z + 2.0 + 0.5 * jitter)
        })
        .collect();
    let species = PROPENOL.iter().map(|&(s, _)| s).collect();
    PeriodicSystem::new(positions, species, Matrix3::from_diagonal_element(7.5)).unwrap()
}

fn shift_bounds(system: &PeriodicSystem, cutoff: f64) -> [i32; 3] {
    if !system.is_periodic() {
        return [0, 0, 0];
    }
    let cell = system.cell();
    let rows: [Vector3<f64>; 3] = [
        cell.row(0).transpose(),
        cell.row(1).transpose(),
        cell.row(2).transpose(),
    ];
    let volume = rows[0].dot(&rows[1].cross(&rows[2])).abs();
    let mut bounds = [0; 3];
    for k in 0..3 {
        let face = rows[(k + 1) % 3].cross(&rows[(k + 2) % 3]);
        let height = volume / face.norm();
        bounds[k] = (cutoff / height).ceil() as i32;
    }
    bounds
}

fn is_canonical(pair: &NeighborPair) -> bool {
    pair.first < pair.second || (pair.first == pair.second && pair.cell_shift > [0, 0, 0])
}

pub fn build_neighbor_list(
    system: &PeriodicSystem,
    request: NeighborListRequest,
) -> NeighborPairSet {
    let [nx, ny, nz] = shift_bounds(system, request.cutoff);
    let mut pairs = Vec::new();
    for first in 0..system.len() {
        for second in 0..system.len() {
            for sx in -nx..=nx {
                for sy in -ny..=ny {
                    for sz in -nz..=nz {
                        let pair = NeighborPair::new(first, second, [sx, sy, sz]);
                        if first == second && !pair.has_shift() {
                            continue;
                        }
                        if !request.full_list && !is_canonical(&pair) {
                            continue;
                        }
                        if system.displacement(&pair).norm() < request.cutoff {
                            pairs.push(pair);
                        }
                    }
                }
            }
        }
    }
    NeighborPairSet::new(request, pairs)
}

pub fn attach_neighbor_lists(system: &mut PeriodicSystem, requests: &[NeighborListRequest]) {
    for &request in requests {
        let list = build_neighbor_list(system, request);
        system.add_neighbor_list(list).unwrap();
    }
}

/// Two-layer network over six radial features with fixed, non-trivial weights.
pub fn small_neural_model() -> NeuralAtomicModel {
    let descriptor =
        RadialSymmetryFunctions::new(4.0, vec![1, 6, 8], vec![(0.5, 1.0), (1.0, 2.0)]).unwrap();
    let hidden = DenseLayer {
        weights: DMatrix::from_fn(4, 6, |i, j| 0.1 * ((i * 6 + j) as f64 + 0.5).sin()),
        bias: DVector::from_fn(4, |i, _| 0.05 * i as f64 - 0.1),
        activation: Activation::Tanh,
    };
    let output = DenseLayer {
        weights: DMatrix::from_row_slice(1, 4, &[0.3, -0.2, 0.15, 0.4]),
        bias: DVector::from_element(1, 0.01),
        activation: Activation::Identity,
    };
    let readout = Readout::new(vec![hidden, output]).unwrap();
    NeuralAtomicModel::new(
        descriptor,
        readout,
        BTreeMap::from([(1, -0.1), (6, -1.0), (8, -2.0)]),
    )
    .unwrap()
}

/// Learned model returning `energy_per_atom` times the number of atoms it is
/// asked about, and recording every call.
pub struct CountingModel {
    energy_per_atom: f64,
    species: BTreeSet<SpeciesCode>,
    neighbor_lists: Vec<NeighborListRequest>,
    calls: AtomicUsize,
    last_selection: Mutex<Option<Vec<usize>>>,
}

impl CountingModel {
    pub fn new(energy_per_atom: f64) -> Self {
        Self {
            energy_per_atom,
            species: BTreeSet::from([1, 6, 8]),
            neighbor_lists: Vec::new(),
            calls: AtomicUsize::new(0),
            last_selection: Mutex::new(None),
        }
    }

    pub fn with_species(mut self, species: &[SpeciesCode]) -> Self {
        self.species = species.iter().copied().collect();
        self
    }

    pub fn with_neighbor_list(mut self, request: NeighborListRequest) -> Self {
        self.neighbor_lists.push(request);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_selection(&self) -> Option<Vec<usize>> {
        self.last_selection.lock().unwrap().clone()
    }
}

impl AtomicModel for CountingModel {
    fn supported_species(&self) -> BTreeSet<SpeciesCode> {
        self.species.clone()
    }

    fn declared_neighbor_lists(&self) -> Vec<NeighborListRequest> {
        self.neighbor_lists.clone()
    }

    fn predict(
        &self,
        system: &PeriodicSystem,
        selected_atoms: Option<&[usize]>,
    ) -> Result<f64, AtomicModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_selection.lock().unwrap() = selected_atoms.map(<[usize]>::to_vec);
        let count = selected_atoms.map_or(system.len(), <[usize]>::len);
        Ok(self.energy_per_atom * count as f64)
    }
}

pub enum FailingModel {
    Error,
    NotANumber,
}

impl AtomicModel for FailingModel {
    fn supported_species(&self) -> BTreeSet<SpeciesCode> {
        BTreeSet::from([1, 6, 8])
    }

    fn predict(
        &self,
        _system: &PeriodicSystem,
        _selected_atoms: Option<&[usize]>,
    ) -> Result<f64, AtomicModelError> {
        match self {
            FailingModel::Error => Err(AtomicModelError::Other("weights not loaded".to_string())),
            FailingModel::NotANumber => Ok(f64::NAN),
        }
    }
}
