use std::fmt;

use serde::{Deserialize, Serialize};

/// The two moves available to an agent in the spatial Prisoner's Dilemma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    Cooperate,
    Defect,
}

impl Strategy {
    /// Parses a single field character. Lowercase is accepted and normalised.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'C' | 'c' => Some(Strategy::Cooperate),
            'D' | 'd' => Some(Strategy::Defect),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Strategy::Cooperate => 'C',
            Strategy::Defect => 'D',
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Reward `me` receives from one game against `them`, where `b` is the
/// temptation to defect against a cooperator.
pub fn payoff(me: Strategy, them: Strategy, b: f64) -> f64 {
    match (me, them) {
        (Strategy::Cooperate, Strategy::Cooperate) => 1.0,
        (Strategy::Cooperate, Strategy::Defect) => 0.0,
        (Strategy::Defect, Strategy::Cooperate) => b,
        (Strategy::Defect, Strategy::Defect) => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payoff_table() {
        let b = 1.65;
        assert_eq!(payoff(Strategy::Cooperate, Strategy::Cooperate, b), 1.0);
        assert_eq!(payoff(Strategy::Cooperate, Strategy::Defect, b), 0.0);
        assert_eq!(payoff(Strategy::Defect, Strategy::Cooperate, b), b);
        assert_eq!(payoff(Strategy::Defect, Strategy::Defect, b), 0.0);
    }

    #[test]
    fn payoff_accepts_any_real_temptation() {
        assert_eq!(payoff(Strategy::Defect, Strategy::Cooperate, -2.5), -2.5);
        assert_eq!(payoff(Strategy::Defect, Strategy::Cooperate, 0.0), 0.0);
    }

    #[test]
    fn chars_normalise_case() {
        assert_eq!(Strategy::from_char('C'), Some(Strategy::Cooperate));
        assert_eq!(Strategy::from_char('c'), Some(Strategy::Cooperate));
        assert_eq!(Strategy::from_char('D'), Some(Strategy::Defect));
        assert_eq!(Strategy::from_char('d'), Some(Strategy::Defect));
        assert_eq!(Strategy::from_char('X'), None);
        assert_eq!(Strategy::from_char(' '), None);
        assert_eq!(Strategy::Defect.to_string(), "D");
    }
}
