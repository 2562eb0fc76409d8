use clap::ValueEnum;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::cell::Cell;
use crate::config::{ConfigError, SimulationConfig};
use crate::field::Field;
use crate::neighborhood::Bounds;
use crate::simulation_stats::{SimulationStats, StepStats};
use crate::strategy::{Strategy, payoff};

/// How the cells of one phase are visited. Both schedules read only the state
/// captured before the phase began, so they produce identical fields.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Schedule {
    Sequential,
    #[default]
    Parallel,
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build worker pool")]
    ThreadPool(#[from] ThreadPoolBuildError),
}

#[derive(Debug, Clone, Copy)]
struct CellSnapshot {
    score: f64,
    strategy: Strategy,
}

impl From<&Cell> for CellSnapshot {
    fn from(cell: &Cell) -> Self {
        CellSnapshot {
            score: cell.score,
            strategy: cell.strategy,
        }
    }
}

/// Score phase: every cell plays each in-bounds neighbor, itself included,
/// and its score is overwritten with the total reward.
pub fn compute_scores(field: &mut Field, b: f64) {
    compute_scores_with(field, b, Schedule::Sequential);
}

pub fn compute_scores_with(field: &mut Field, b: f64, schedule: Schedule) {
    let bounds = field.bounds();
    let strategies = field.strategies();
    let score = |(i, cell): (usize, &mut Cell)| {
        cell.score = play_neighborhood(&strategies, bounds, i, b);
    };
    match schedule {
        Schedule::Sequential => field.cells_mut().iter_mut().enumerate().for_each(score),
        Schedule::Parallel => field.cells_mut().par_iter_mut().enumerate().for_each(score),
    }
}

fn play_neighborhood(strategies: &[Strategy], bounds: Bounds, index: usize, b: f64) -> f64 {
    let (row, col) = bounds.position(index);
    let me = strategies[index];
    bounds
        .neighborhood(row, col)
        .map(|(r, c)| payoff(me, strategies[bounds.index(r, c)], b))
        .sum()
}

/// Strategy phase: every cell adopts the strategy of the best-scoring cell in
/// its neighborhood. All decisions read a snapshot taken before any cell
/// changes, so the update is simultaneous.
pub fn update_strategies(field: &mut Field) {
    update_strategies_with(field, Schedule::Sequential);
}

pub fn update_strategies_with(field: &mut Field, schedule: Schedule) {
    let bounds = field.bounds();
    let snapshot: Vec<CellSnapshot> = field.cells().iter().map(CellSnapshot::from).collect();
    let decide = |(i, cell): (usize, &mut Cell)| {
        cell.previous_strategy = Some(cell.strategy);
        cell.strategy = imitate_best(&snapshot, bounds, i);
    };
    match schedule {
        Schedule::Sequential => field.cells_mut().iter_mut().enumerate().for_each(decide),
        Schedule::Parallel => field.cells_mut().par_iter_mut().enumerate().for_each(decide),
    }
}

// Only a strictly higher score replaces the running best, so ties go to
// whichever cell was seen first and the cell itself is never displaced by an
// equal neighbor.
fn imitate_best(snapshot: &[CellSnapshot], bounds: Bounds, index: usize) -> Strategy {
    let (row, col) = bounds.position(index);
    let mut best = snapshot[index];
    for (r, c) in bounds.neighborhood(row, col) {
        let neighbor = snapshot[bounds.index(r, c)];
        if neighbor.score > best.score {
            best = neighbor;
        }
    }
    best.strategy
}

/// One full step: score phase, then strategy phase.
pub fn step(field: &mut Field, b: f64, schedule: Schedule) {
    compute_scores_with(field, b, schedule);
    update_strategies_with(field, schedule);
}

/// Advances `field` by `n_steps` synchronous steps.
pub fn evolve(mut field: Field, n_steps: usize, b: f64) -> Field {
    for _ in 0..n_steps {
        step(&mut field, b, Schedule::Sequential);
    }
    field
}

/// Owns a field for the duration of a run and advances it step by step,
/// recording population statistics after each step.
pub struct Simulation {
    field: Field,
    config: SimulationConfig,
    pool: Option<ThreadPool>,
    steps_taken: usize,
    stats: SimulationStats,
}

impl Simulation {
    pub fn new(field: Field, config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let pool = match config.threads {
            Some(threads) => Some(ThreadPoolBuilder::new().num_threads(threads).build()?),
            None => None,
        };
        let mut stats = SimulationStats::new(&field);
        stats.config = Some(config);
        Ok(Simulation {
            field,
            config,
            pool,
            steps_taken: 0,
            stats,
        })
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    pub fn is_finished(&self) -> bool {
        self.steps_taken >= self.config.steps
    }

    /// Steps still to run before the configured count is reached.
    pub fn remaining_steps(&self) -> usize {
        self.config.steps.saturating_sub(self.steps_taken)
    }

    /// Runs a single step, whether or not the configured count was reached.
    pub fn step(&mut self) -> StepStats {
        let b = self.config.temptation;
        let schedule = self.config.schedule;
        match &self.pool {
            Some(pool) => pool.install(|| step(&mut self.field, b, schedule)),
            None => step(&mut self.field, b, schedule),
        }
        self.steps_taken += 1;

        let stats = StepStats::from_field(self.steps_taken, &self.field);
        debug!(
            step = stats.step,
            cooperators = stats.cooperators,
            defectors = stats.defectors,
            newly_defected = stats.newly_defected,
            newly_cooperated = stats.newly_cooperated,
            max_score = stats.max_score,
            "step complete"
        );
        self.stats.record(stats);
        stats
    }

    /// Runs whatever is left of the configured step count. Steps already
    /// taken through `step` (for example by the viewer) are not repeated.
    pub fn run(&mut self) -> &Field {
        info!(
            rows = self.field.rows(),
            cols = self.field.cols(),
            steps_taken = self.steps_taken,
            remaining = self.remaining_steps(),
            b = self.config.temptation,
            schedule = ?self.config.schedule,
            threads = self.pool.as_ref().map_or_else(rayon::current_num_threads, |p| p.current_num_threads()),
            "evolving field"
        );
        while !self.is_finished() {
            self.step();
        }
        info!(
            cooperators = self.field.count(Strategy::Cooperate),
            defectors = self.field.count(Strategy::Defect),
            settled_at = ?self.stats.settled_at(),
            "evolution finished"
        );
        &self.field
    }

    pub fn into_parts(self) -> (Field, SimulationStats) {
        (self.field, self.stats)
    }
}
