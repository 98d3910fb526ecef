//! Solved trajectories supplied by the external ODE-integration collaborator.
//!
//! The core only reads these. Validation happens eagerly at construction so
//! the analysis stages can assume a well-formed, shared time grid.

use ndarray::{Array2, ArrayView1};

use crate::error::AnalysisError;

/// One solved trajectory: a time grid, the concentration of every species at
/// every time point, and the parameter values that produced it.
#[derive(Clone, Debug)]
pub struct Trajectory {
    times: Vec<f64>,
    /// (n_times, n_species) concentration matrix.
    concentrations: Array2<f64>,
    /// Parameter values in model order.
    parameters: Vec<f64>,
}

impl Trajectory {
    /// Create a trajectory, validating the time grid against the data.
    ///
    /// The grid must be non-empty and strictly increasing, and the
    /// concentration matrix must have one row per time point.
    pub fn new(
        times: Vec<f64>,
        concentrations: Array2<f64>,
        parameters: Vec<f64>,
    ) -> Result<Self, AnalysisError> {
        let traj = Self {
            times,
            concentrations,
            parameters,
        };
        traj.validate(0)?;
        Ok(traj)
    }

    /// Validate grid shape and monotonicity, reporting `index` as the
    /// trajectory identifier in errors.
    pub(crate) fn validate(&self, index: usize) -> Result<(), AnalysisError> {
        if self.times.is_empty() {
            return Err(AnalysisError::InvalidTimeGrid {
                trajectory: index,
                detail: "time grid is empty".to_string(),
            });
        }
        if self.times.windows(2).any(|w| w[1] <= w[0]) {
            return Err(AnalysisError::InvalidTimeGrid {
                trajectory: index,
                detail: "time grid is not strictly increasing".to_string(),
            });
        }
        if self.concentrations.nrows() != self.times.len() {
            return Err(AnalysisError::InvalidTimeGrid {
                trajectory: index,
                detail: format!(
                    "{} time points but {} concentration rows",
                    self.times.len(),
                    self.concentrations.nrows()
                ),
            });
        }
        Ok(())
    }

    /// Time grid.
    #[inline]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Number of time points.
    #[inline]
    pub fn n_times(&self) -> usize {
        self.times.len()
    }

    /// Number of species columns.
    #[inline]
    pub fn n_species(&self) -> usize {
        self.concentrations.ncols()
    }

    /// Total time span of the trajectory.
    pub fn span(&self) -> f64 {
        self.times[self.times.len() - 1] - self.times[0]
    }

    /// Concentrations of all species at one time point.
    #[inline]
    pub fn concentrations_at(&self, time_index: usize) -> ArrayView1<f64> {
        self.concentrations.row(time_index)
    }

    /// Parameter values in model order.
    #[inline]
    pub fn parameters(&self) -> &[f64] {
        &self.parameters
    }
}

/// A family of trajectories (one per parameter set) on a shared time grid.
///
/// The shared grid is a precondition of every cross-trajectory comparison;
/// checking it here makes the clustering stages grid-agnostic.
#[derive(Clone, Debug)]
pub struct Ensemble {
    trajectories: Vec<Trajectory>,
}

impl Ensemble {
    /// Assemble trajectories, validating each and requiring an identical
    /// time grid across all of them.
    ///
    /// Fails with `InconsistentTimeGrid` naming the first trajectory whose
    /// grid differs; re-sampling to a common grid is the caller's job.
    pub fn new(trajectories: Vec<Trajectory>) -> Result<Self, AnalysisError> {
        for (i, traj) in trajectories.iter().enumerate() {
            traj.validate(i)?;
        }
        if let Some(first) = trajectories.first() {
            for (i, traj) in trajectories.iter().enumerate().skip(1) {
                if traj.times() != first.times() {
                    return Err(AnalysisError::InconsistentTimeGrid { trajectory: i });
                }
            }
        }
        Ok(Self { trajectories })
    }

    /// Number of trajectories.
    #[inline]
    pub fn len(&self) -> usize {
        self.trajectories.len()
    }

    /// Whether the ensemble is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.trajectories.is_empty()
    }

    /// Trajectories in index order.
    #[inline]
    pub fn trajectories(&self) -> &[Trajectory] {
        &self.trajectories
    }

    /// One trajectory by index.
    #[inline]
    pub fn trajectory(&self, index: usize) -> &Trajectory {
        &self.trajectories[index]
    }
}
