//! Gaussian kernel density estimation.
//!
//! Bandwidths follow a fixed rule of `bandwidth_factor × (max − min)` per
//! axis. A constant axis has zero range; [`DegeneratePolicy`] decides what
//! happens then.

use std::f64::consts::PI;

use serde::Serialize;

use crate::config::{DegeneratePolicy, KdeConfig};
use crate::error::{EdaError, Result};

const SQRT_2PI: f64 = 2.506_628_274_631_000_5;

/// Observed extent and bandwidth of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub bandwidth: f64,
}

impl Axis {
    fn fit(samples: &[f64], config: &KdeConfig, what: &str) -> Result<Self> {
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mut bandwidth = config.bandwidth_factor * (max - min);

        if bandwidth <= 0.0 {
            match config.degenerate {
                DegeneratePolicy::Reject => {
                    return Err(EdaError::ZeroBandwidth(what.to_string()));
                }
                DegeneratePolicy::UnitScale => {
                    bandwidth = config.bandwidth_factor * min.abs().max(1.0);
                    log::warn!("{what} is constant at {min}; using bandwidth {bandwidth}");
                }
            }
        }

        Ok(Self {
            min,
            max,
            bandwidth,
        })
    }

    /// `n` evenly spaced points from `min` to `max` inclusive.
    pub fn linspace(&self, n: usize) -> Vec<f64> {
        match n {
            0 => Vec::new(),
            1 => vec![self.min],
            _ => {
                let step = (self.max - self.min) / (n - 1) as f64;
                (0..n).map(|i| self.min + step * i as f64).collect()
            }
        }
    }
}

fn finite(samples: &[f64]) -> Vec<f64> {
    samples.iter().copied().filter(|v| v.is_finite()).collect()
}

// ---------------------------------------------------------------------------
// 1D
// ---------------------------------------------------------------------------

/// A fitted one-dimensional estimator.
#[derive(Debug, Clone)]
pub struct Kde1d {
    samples: Vec<f64>,
    axis: Axis,
    grid_size: usize,
}

/// Density curve evaluated on an even grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityCurve {
    pub x: Vec<f64>,
    pub density: Vec<f64>,
    pub bandwidth: f64,
}

impl Kde1d {
    /// Fit to the finite values of `samples`.
    pub fn fit(samples: &[f64], config: &KdeConfig) -> Result<Self> {
        let samples = finite(samples);
        if samples.is_empty() {
            return Err(EdaError::EmptySample("density sample".into()));
        }
        let axis = Axis::fit(&samples, config, "sample")?;
        Ok(Self {
            samples,
            axis,
            grid_size: config.grid_size,
        })
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn bandwidth(&self) -> f64 {
        self.axis.bandwidth
    }

    /// Density at `point`.
    pub fn density(&self, point: f64) -> f64 {
        let h = self.axis.bandwidth;
        let sum: f64 = self
            .samples
            .iter()
            .map(|&s| {
                let u = (point - s) / h;
                (-0.5 * u * u).exp()
            })
            .sum();
        sum / (self.samples.len() as f64 * h * SQRT_2PI)
    }

    /// Evaluate over the observed range.
    pub fn curve(&self) -> DensityCurve {
        let x = self.axis.linspace(self.grid_size);
        let density = x.iter().map(|&p| self.density(p)).collect();
        DensityCurve {
            x,
            density,
            bandwidth: self.axis.bandwidth,
        }
    }
}

// ---------------------------------------------------------------------------
// 2D
// ---------------------------------------------------------------------------

/// A fitted two-dimensional estimator with independent per-axis bandwidths.
#[derive(Debug, Clone)]
pub struct Kde2d {
    points: Vec<(f64, f64)>,
    x_axis: Axis,
    y_axis: Axis,
    grid_size: usize,
}

/// Densities on a `grid_size × grid_size` grid. `z[row][col]` is the density
/// at `(x[col], y[row])`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityGrid {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<Vec<f64>>,
}

impl DensityGrid {
    /// Largest density on the grid.
    pub fn peak(&self) -> f64 {
        self.z
            .iter()
            .flatten()
            .copied()
            .fold(0.0, f64::max)
    }
}

impl Kde2d {
    /// Fit to the pairs where both sides are present and finite.
    pub fn fit(x: &[Option<f64>], y: &[Option<f64>], config: &KdeConfig) -> Result<Self> {
        let points: Vec<(f64, f64)> = x
            .iter()
            .zip(y)
            .filter_map(|(a, b)| match (a, b) {
                (Some(a), Some(b)) if a.is_finite() && b.is_finite() => Some((*a, *b)),
                _ => None,
            })
            .collect();

        if points.is_empty() {
            return Err(EdaError::EmptySample("density pairs".into()));
        }

        let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
        let x_axis = Axis::fit(&xs, config, "x axis")?;
        let y_axis = Axis::fit(&ys, config, "y axis")?;

        Ok(Self {
            points,
            x_axis,
            y_axis,
            grid_size: config.grid_size,
        })
    }

    pub fn axes(&self) -> (Axis, Axis) {
        (self.x_axis, self.y_axis)
    }

    /// Density at `(px, py)`.
    pub fn density(&self, px: f64, py: f64) -> f64 {
        let (hx, hy) = (self.x_axis.bandwidth, self.y_axis.bandwidth);
        let sum: f64 = self
            .points
            .iter()
            .map(|&(sx, sy)| {
                let ux = (px - sx) / hx;
                let uy = (py - sy) / hy;
                (-0.5 * (ux * ux + uy * uy)).exp()
            })
            .sum();
        sum / (self.points.len() as f64 * hx * hy * 2.0 * PI)
    }

    pub fn grid(&self) -> DensityGrid {
        let x = self.x_axis.linspace(self.grid_size);
        let y = self.y_axis.linspace(self.grid_size);
        let z = y
            .iter()
            .map(|&gy| x.iter().map(|&gx| self.density(gx, gy)).collect())
            .collect();
        DensityGrid { x, y, z }
    }
}
