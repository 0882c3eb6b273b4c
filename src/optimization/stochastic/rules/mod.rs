//! Inner update rules of the stochastic solvers.
//!
//! Every rule implements [`StochRule`](crate::optimization::stochastic::run::StochRule)
//! and owns its accumulators (learning-rate schedule, moment estimates,
//! reference points) for exactly one run.

pub mod adam;
pub mod adaptive;
pub mod ag;
pub mod cocob;
pub mod sg;
pub mod svrg;

pub use self::adam::Adam;
pub use self::adaptive::{AdaDelta, AdaGrad, RmsProp};
pub use self::ag::{Ag, AgRestart};
pub use self::cocob::Cocob;
pub use self::sg::{Asgd, Ngd, Sg, Sgm};
pub use self::svrg::Svrg;
