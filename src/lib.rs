//! Leiserchess: a two-monarch, reflective-laser chess variant engine.
//!
//! The crate is organized around the [`board`] module (position
//! model, move generation, laser simulation, evaluation, and the
//! parallel PVS/scout search), with the shared [`tt`] transposition
//! table, the compiled-in opening [`book`], and the [`uci`] command
//! coordinator around it.

pub mod board;
pub mod book;
pub mod sync;
pub mod tt;
pub mod uci;

pub(crate) mod zobrist;
