//! Core abstractions and types.
//!
//! *Users* are mainly interested in implementing the [`Function`] trait and
//! specifying the [domain](Domain) of their problem. Algorithm *developers*
//! implement the [`Optimizer`] trait, optionally using the tools in the
//! [population](crate::population) module.

mod base;
mod domain;
mod function;
mod optimizer;

pub use base::*;
pub use domain::*;
pub use function::*;
pub use optimizer::*;
