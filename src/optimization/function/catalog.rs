//! Synthetic objectives with analytic gradients.
//!
//! Purpose
//! -------
//! Provide well-understood test problems for exercising line searches and
//! solvers: convex quadratics (`Sphere`, `Ellipsoid`), the curved valley of
//! `Rosenbrock`, the multi-modal `Bohachevsky` family, and a least-squares
//! regression (`StochasticLeastSquares`) whose stochastic path samples
//! minibatches.
//!
//! Conventions
//! -----------
//! - All minima are known in closed form: `0` at the origin for the
//!   quadratics and Bohachevsky, `0` at `(1, …, 1)` for Rosenbrock, and the
//!   generating coefficients for the noise-free least-squares problem.
//! - Dimensions are fixed at construction; `size()` never changes.
use std::cell::RefCell;
use std::f64::consts::PI;

use ndarray::{Array2, Axis};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::optimization::{
    errors::{OptError, OptResult},
    function::Function,
    types::{Scalar, Vector},
};

/// `f(x) = Σ x_i²`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sphere {
    size: usize,
}

impl Sphere {
    pub fn new(size: usize) -> Self {
        Self { size }
    }
}

impl Function for Sphere {
    fn size(&self) -> usize {
        self.size
    }

    fn eval(&self, x: &Vector) -> Scalar {
        x.dot(x)
    }

    fn eval_grad(&self, x: &Vector, g: &mut Vector) -> Scalar {
        g.assign(&(x * 2.0));
        x.dot(x)
    }
}

/// `f(x) = Σ (i + 1) · x_i²`: a quadratic with condition number `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ellipsoid {
    size: usize,
}

impl Ellipsoid {
    pub fn new(size: usize) -> Self {
        Self { size }
    }
}

impl Function for Ellipsoid {
    fn size(&self) -> usize {
        self.size
    }

    fn eval(&self, x: &Vector) -> Scalar {
        x.iter().enumerate().map(|(i, v)| (i + 1) as f64 * v * v).sum()
    }

    fn eval_grad(&self, x: &Vector, g: &mut Vector) -> Scalar {
        for (i, (gi, xi)) in g.iter_mut().zip(x.iter()).enumerate() {
            *gi = 2.0 * (i + 1) as f64 * xi;
        }
        self.eval(x)
    }
}

/// Extended Rosenbrock: `Σ 100·(x_{i+1} - x_i²)² + (1 - x_i)²`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rosenbrock {
    size: usize,
}

impl Rosenbrock {
    /// `size` must be at least 2 for the function to be non-trivial.
    pub fn new(size: usize) -> Self {
        Self { size }
    }
}

impl Function for Rosenbrock {
    fn size(&self) -> usize {
        self.size
    }

    fn eval(&self, x: &Vector) -> Scalar {
        (0..x.len().saturating_sub(1))
            .map(|i| {
                let a = x[i + 1] - x[i] * x[i];
                let b = 1.0 - x[i];
                100.0 * a * a + b * b
            })
            .sum()
    }

    fn eval_grad(&self, x: &Vector, g: &mut Vector) -> Scalar {
        g.fill(0.0);
        for i in 0..x.len().saturating_sub(1) {
            let a = x[i + 1] - x[i] * x[i];
            g[i] += -400.0 * a * x[i] - 2.0 * (1.0 - x[i]);
            g[i + 1] += 200.0 * a;
        }
        self.eval(x)
    }
}

/// Which member of the Bohachevsky family to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BohachevskyKind {
    One,
    Two,
    Three,
}

/// Two-dimensional Bohachevsky functions; global minimum `0` at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bohachevsky {
    kind: BohachevskyKind,
}

impl Bohachevsky {
    pub fn new(kind: BohachevskyKind) -> Self {
        Self { kind }
    }
}

impl Function for Bohachevsky {
    fn size(&self) -> usize {
        2
    }

    fn eval(&self, x: &Vector) -> Scalar {
        let (p1, p2) = (3.0 * PI * x[0], 4.0 * PI * x[1]);
        let u = x[0] * x[0] + 2.0 * x[1] * x[1];
        match self.kind {
            BohachevskyKind::One => u - 0.3 * p1.cos() - 0.4 * p2.cos() + 0.7,
            BohachevskyKind::Two => u - 0.3 * p1.cos() * p2.cos() + 0.3,
            BohachevskyKind::Three => u - 0.3 * (p1 + p2).cos() + 0.3,
        }
    }

    fn eval_grad(&self, x: &Vector, g: &mut Vector) -> Scalar {
        let (p1, p2) = (3.0 * PI * x[0], 4.0 * PI * x[1]);
        let (d1, d2) = (3.0 * PI, 4.0 * PI);
        let (gu1, gu2) = (2.0 * x[0], 4.0 * x[1]);
        match self.kind {
            BohachevskyKind::One => {
                g[0] = gu1 + 0.3 * d1 * p1.sin();
                g[1] = gu2 + 0.4 * d2 * p2.sin();
            }
            BohachevskyKind::Two => {
                g[0] = gu1 + 0.3 * d1 * p1.sin() * p2.cos();
                g[1] = gu2 + 0.3 * d2 * p1.cos() * p2.sin();
            }
            BohachevskyKind::Three => {
                g[0] = gu1 + 0.3 * d1 * (p1 + p2).sin();
                g[1] = gu2 + 0.3 * d2 * (p1 + p2).sin();
            }
        }
        self.eval(x)
    }
}

/// Linear least squares `f(x) = 1/(2m) · Σ_i (a_i·x - b_i)²`.
///
/// The full-batch path uses all `m` rows. The stochastic path averages over a
/// minibatch of `batch_size` rows drawn with replacement from a seeded RNG;
/// the same minibatch is reused until [`Function::stoch_next`] is called.
#[derive(Debug)]
pub struct StochasticLeastSquares {
    a: Array2<f64>,
    b: Vector,
    batch_size: usize,
    rng: RefCell<StdRng>,
    batch: RefCell<Vec<usize>>,
}

impl StochasticLeastSquares {
    /// Build from a design matrix `a` (`m × n`) and targets `b` (length `m`).
    ///
    /// # Errors
    /// - [`OptError::DimensionMismatch`] if `b.len() != a.nrows()`.
    /// - [`OptError::InvalidEpochSize`] if `batch_size == 0` or the matrix has
    ///   no rows.
    pub fn new(a: Array2<f64>, b: Vector, batch_size: usize, seed: u64) -> OptResult<Self> {
        if b.len() != a.nrows() {
            return Err(OptError::DimensionMismatch { expected: a.nrows(), found: b.len() });
        }
        if batch_size == 0 || a.nrows() == 0 {
            return Err(OptError::InvalidEpochSize {
                size: batch_size,
                reason: "Minibatches need at least one row from a non-empty dataset.",
            });
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let batch = sample_batch(&mut rng, a.nrows(), batch_size);
        Ok(Self { a, b, batch_size, rng: RefCell::new(rng), batch: RefCell::new(batch) })
    }

    /// Noise-free regression with `samples` rows drawn uniformly from
    /// `[-1, 1]^n` and targets `b = A · x_true`.
    pub fn synthetic(
        x_true: &Vector, samples: usize, batch_size: usize, seed: u64,
    ) -> OptResult<Self> {
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
        let a = Array2::from_shape_fn((samples, x_true.len()), |_| rng.gen_range(-1.0_f64..1.0));
        let b = a.dot(x_true);
        Self::new(a, b, batch_size, seed)
    }

    fn eval_rows(&self, rows: &[usize], x: &Vector, g: Option<&mut Vector>) -> Scalar {
        let scale = 1.0 / rows.len() as f64;
        let mut value = 0.0;
        let mut grad = g;
        if let Some(g) = grad.as_deref_mut() {
            g.fill(0.0);
        }
        for &r in rows {
            let row = self.a.index_axis(Axis(0), r);
            let residual = row.dot(x) - self.b[r];
            value += 0.5 * residual * residual;
            if let Some(g) = grad.as_deref_mut() {
                g.scaled_add(scale * residual, &row);
            }
        }
        value * scale
    }
}

impl Function for StochasticLeastSquares {
    fn size(&self) -> usize {
        self.a.ncols()
    }

    fn eval(&self, x: &Vector) -> Scalar {
        let rows: Vec<usize> = (0..self.a.nrows()).collect();
        self.eval_rows(&rows, x, None)
    }

    fn eval_grad(&self, x: &Vector, g: &mut Vector) -> Scalar {
        let rows: Vec<usize> = (0..self.a.nrows()).collect();
        self.eval_rows(&rows, x, Some(g))
    }

    fn stoch_eval(&self, x: &Vector) -> Scalar {
        self.eval_rows(&self.batch.borrow(), x, None)
    }

    fn stoch_eval_grad(&self, x: &Vector, g: &mut Vector) -> Scalar {
        self.eval_rows(&self.batch.borrow(), x, Some(g))
    }

    fn stoch_next(&self) {
        let next = sample_batch(&mut self.rng.borrow_mut(), self.a.nrows(), self.batch_size);
        *self.batch.borrow_mut() = next;
    }
}

fn sample_batch(rng: &mut StdRng, rows: usize, batch_size: usize) -> Vec<usize> {
    (0..batch_size).map(|_| rng.gen_range(0..rows)).collect()
}
