use serde::{Deserialize, Serialize};

use crate::cell::Transition;
use crate::config::SimulationConfig;
use crate::field::Field;

/// Population summary taken after a step's strategy phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StepStats {
    pub step: usize,
    pub cooperators: usize,
    pub defectors: usize,
    pub newly_defected: usize,
    pub newly_cooperated: usize,
    pub average_score: f64,
    pub max_score: f64,
}

impl StepStats {
    pub fn from_field(step: usize, field: &Field) -> Self {
        let mut stats = StepStats {
            step,
            ..Default::default()
        };
        let mut total_score = 0.0;
        let mut max_score = f64::NEG_INFINITY;
        for cell in field.cells() {
            match cell.transition() {
                Transition::StableCooperate => stats.cooperators += 1,
                Transition::StableDefect => stats.defectors += 1,
                Transition::NewlyDefected => {
                    stats.defectors += 1;
                    stats.newly_defected += 1;
                }
                Transition::NewlyCooperated => {
                    stats.cooperators += 1;
                    stats.newly_cooperated += 1;
                }
            }
            total_score += cell.score;
            max_score = max_score.max(cell.score);
        }
        stats.average_score = total_score / field.cells().len() as f64;
        stats.max_score = max_score;
        stats
    }

    pub fn changed(&self) -> usize {
        self.newly_defected + self.newly_cooperated
    }

    pub fn cooperation_ratio(&self) -> f64 {
        let total = self.cooperators + self.defectors;
        if total == 0 {
            0.0
        } else {
            self.cooperators as f64 / total as f64
        }
    }
}

/// Run-level history, written out as JSON by the CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationStats {
    pub rows: usize,
    pub cols: usize,
    pub config: Option<SimulationConfig>,
    pub history: Vec<StepStats>,
}

impl SimulationStats {
    pub fn new(field: &Field) -> Self {
        SimulationStats {
            rows: field.rows(),
            cols: field.cols(),
            config: None,
            history: Vec::new(),
        }
    }

    pub fn record(&mut self, stats: StepStats) {
        self.history.push(stats);
    }

    pub fn last(&self) -> Option<&StepStats> {
        self.history.last()
    }

    /// First step after which no cell changed strategy.
    pub fn settled_at(&self) -> Option<usize> {
        self.history.iter().find(|s| s.changed() == 0).map(|s| s.step)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
