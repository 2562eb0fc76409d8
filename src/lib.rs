//! Evolutionary spatial Prisoner's Dilemma on a fixed 2D field.
//!
//! Every step each cell plays its 3x3 neighborhood (itself included), then
//! imitates the best-scoring cell it can see. Both phases read a frozen
//! snapshot so the whole field updates simultaneously.

pub mod cell;
pub mod config;
pub mod field;
pub mod game;
pub mod neighborhood;
pub mod render;
pub mod simulation_stats;
pub mod strategy;
pub mod viewer;

pub use cell::{Cell, Transition};
pub use config::{ConfigError, RenderConfig, SimulationConfig};
pub use field::{Field, FieldError};
pub use game::{
    Schedule, Simulation, SimulationError, compute_scores, compute_scores_with, evolve, step,
    update_strategies, update_strategies_with,
};
pub use neighborhood::{Bounds, Neighborhood};
pub use render::{RenderError, render_field, render_png, save_png};
pub use simulation_stats::{SimulationStats, StepStats};
pub use strategy::{Strategy, payoff};
pub use viewer::{ViewerError, run_viewer};
