#![allow(clippy::many_single_char_names)]
#![allow(clippy::type_complexity)]
#![warn(missing_docs)]

//! # gfopt
//!
//! A pure Rust framework and implementation of population-based and
//! single-point gradient-free methods for (bound-constrained) global
//! optimization.
//!
//! This library provides a variety of optimization algorithms that use nothing
//! but function values, written entirely in Rust. Bound constraints for
//! variables are supported first-class, which is useful for engineering
//! applications. All algorithms implement the same interface which is designed
//! to give full control over the process and allows to combine different
//! components to achieve the desired solution.
//!
//! ## Algorithms
//!
//! * [(1+1)-ES](algo::rechenberg) -- Recommended method to be used as a
//!   default, self-adapts its step size and restarts itself when it gets
//!   stuck.
//! * [Hill climber](algo::hill_climber) -- Simple and fast local search by
//!   Gaussian perturbation.
//! * [Annealed hill climber](algo::annealing) -- Hill climbing with Metropolis
//!   acceptance, able to escape local optima while the temperature is high.
//! * [Random search](algo::random_search) -- The crudest baseline, useful for
//!   sanity checks and as a lower bound on performance.
//! * [Cuckoo search](algo::cuckoo) -- Population-based global optimization
//!   combining local walks with far-field randomization.
//!
//! ## Problem
//!
//! The problem of global optimization is about finding values of *n* variables
//! that minimize a given objective function, using only evaluations of the
//! function itself. No gradient, Hessian or any other derivative information
//! is required.
//!
//! Mathematically, the problem is formulated as
//!
//! ```text
//! minimize f(x)
//!
//! where x = { x1, ..., xn }
//! ```
//!
//! Moreover, it is possible to add bound constraints to the variables. That is:
//!
//! ```text
//! Li <= xi <= Ui for some bounds [L, U] for every i
//! ```
//!
//! The bounds can be negative/positive infinity, effectively making the
//! variable unconstrained.
//!
//! More sophisticated constraints (such as (in)equalities consisting of
//! multiple variables) are currently out of the scope of this library. If you
//! are in need of those, feel free to contribute with the API design
//! incorporating them and the implementation of appropriate algorithms.
//!
//! When it comes to code, the problem is any type that implements the
//! [`Function`] and [`Problem`] traits.
//!
//! ```rust
//! // gfopt is based on `nalgebra` crate.
//! use gfopt::nalgebra as na;
//! use gfopt::{Domain, Function, Problem};
//! use na::{Dyn, IsContiguous};
//!
//! // A problem is represented by a type.
//! struct Rosenbrock {
//!     a: f64,
//!     b: f64,
//! }
//!
//! impl Problem for Rosenbrock {
//!     // The numeric type. Usually f64 or f32.
//!     type Field = f64;
//!
//!     // Specification for the domain. At the very least, the dimension
//!     // must be known.
//!     fn domain(&self) -> Domain<Self::Field> {
//!         Domain::unconstrained(2)
//!     }
//! }
//!
//! impl Function for Rosenbrock {
//!     // Evaluate trial values of variables to the function.
//!     fn apply<Sx>(&self, x: &na::Vector<Self::Field, Dyn, Sx>) -> Self::Field
//!     where
//!         Sx: na::storage::Storage<Self::Field, Dyn> + IsContiguous,
//!     {
//!         (self.a - x[0]).powi(2) + self.b * (x[1] - x[0].powi(2)).powi(2)
//!     }
//! }
//! ```
//!
//! And that's it. There is no need for defining gradient vector, Hessian or
//! Jacobian matrices. All algorithms in this library are derivative-free by
//! definition.
//!
//! The previous example used unconstrained variables, but it is also possible
//! to specify bounds.
//!
//! ```rust
//! # use gfopt::nalgebra as na;
//! # use gfopt::*;
//! #
//! # struct Rosenbrock {
//! #     a: f64,
//! #     b: f64,
//! # }
//! #
//! impl Problem for Rosenbrock {
//! #     type Field = f64;
//!     // ...
//!
//!     fn domain(&self) -> Domain<Self::Field> {
//!         Domain::rect(vec![-10.0, -10.0], vec![10.0, 10.0])
//!     }
//! }
//! ```
//!
//! ## Optimization
//!
//! When you have your function available, you can use the [`OptimizerDriver`]
//! to run the iteration process until a stopping criterion is reached.
//!
//! ```rust
//! use gfopt::OptimizerDriver;
//! # use gfopt::nalgebra as na;
//! # use gfopt::{Domain, Function, Problem};
//! # use na::{Dyn, IsContiguous};
//! #
//! # struct Rosenbrock {
//! #     a: f64,
//! #     b: f64,
//! # }
//! #
//! # impl Problem for Rosenbrock {
//! #     type Field = f64;
//! #
//! #     fn domain(&self) -> Domain<Self::Field> {
//! #         Domain::unconstrained(2)
//! #     }
//! # }
//! #
//! # impl Function for Rosenbrock {
//! #     fn apply<Sx>(&self, x: &na::Vector<Self::Field, Dyn, Sx>) -> Self::Field
//! #     where
//! #         Sx: na::storage::Storage<Self::Field, Dyn> + IsContiguous,
//! #     {
//! #         (self.a - x[0]).powi(2) + self.b * (x[1] - x[0].powi(2)).powi(2)
//! #     }
//! # }
//!
//! let f = Rosenbrock { a: 1.0, b: 1.0 };
//! let mut optimizer = OptimizerDriver::builder(&f)
//!     .with_initial(vec![-10.0, -5.0])
//!     .build();
//!
//! let tolerance = 1e-6;
//!
//! let (_, value) = optimizer
//!     .find(|state| {
//!         println!(
//!             "iter = {}\tf(x) = {}\tx = {:?}",
//!             state.iter(),
//!             state.fx(),
//!             state.x()
//!         );
//!         state.fx() <= tolerance || state.iter() >= 100
//!     })
//!     .expect("optimizer encountered an error");
//!
//! if value <= tolerance {
//!     println!("optimized");
//! } else {
//!     println!("maximum number of iterations exceeded");
//! }
//! ```
//!
//! ## Roadmap
//!
//! Listed *not* in order of priority.
//!
//! * Covariance matrix adaptation for the evolution strategy
//! * Differential evolution
//! * Bayesian optimization
//! * Parallel evaluation of populations
//!
//! ## License
//!
//! Licensed under MIT.

pub mod algo;
pub mod analysis;
mod core;
pub mod driver;
pub mod population;

pub use core::*;
pub use driver::OptimizerDriver;

#[cfg(feature = "testing")]
pub mod testing;

#[cfg(not(feature = "testing"))]
pub(crate) mod testing;

pub use nalgebra;
