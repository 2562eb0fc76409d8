use serde::{Deserialize, Serialize};

use crate::strategy::Strategy;

/// State of one agent on the field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub strategy: Strategy,
    /// Total reward from the most recent score phase.
    pub score: f64,
    /// Strategy held right before the most recent strategy update.
    /// `None` until the first strategy phase has run.
    pub previous_strategy: Option<Strategy>,
}

impl Cell {
    pub fn new(strategy: Strategy) -> Self {
        Cell {
            strategy,
            score: 0.0,
            previous_strategy: None,
        }
    }

    pub fn transition(&self) -> Transition {
        let before = self.previous_strategy.unwrap_or(self.strategy);
        match (before, self.strategy) {
            (Strategy::Cooperate, Strategy::Cooperate) => Transition::StableCooperate,
            (Strategy::Defect, Strategy::Defect) => Transition::StableDefect,
            (Strategy::Cooperate, Strategy::Defect) => Transition::NewlyDefected,
            (Strategy::Defect, Strategy::Cooperate) => Transition::NewlyCooperated,
        }
    }
}

/// How a cell's strategy changed over the last update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    StableCooperate,
    StableDefect,
    NewlyDefected,
    NewlyCooperated,
}

impl Transition {
    pub fn rgb(self) -> [u8; 3] {
        match self {
            Transition::StableCooperate => [0, 0, 255],
            Transition::StableDefect => [255, 0, 0],
            Transition::NewlyDefected => [255, 255, 0],
            Transition::NewlyCooperated => [0, 255, 0],
        }
    }

    /// Same colour as `rgb`, as the normalised RGBA used by the viewer.
    pub fn color(self) -> [f32; 4] {
        let [r, g, b] = self.rgb();
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
    }
}
