//! shutbox Engine - Core solver types and logic
//!
//! Models Shut the Box as a finite Markov Decision Process and solves it
//! with value iteration: [`space::StateSpace`] enumerates every
//! (remaining numbers, dice total) state and its legal eliminations,
//! [`transition::TransitionModel`] fans each action out over the eleven
//! possible next dice totals, [`solver::ValueIterationSolver`] iterates the
//! utilities to convergence, and [`policy::PolicyExtractor`] reads the
//! optimal actions back out.
//!
//! The engine is platform-agnostic and has zero UI dependencies.

pub mod dice;
pub mod error;
pub mod policy;
pub mod solver;
pub mod space;
pub mod state;
pub mod transition;
