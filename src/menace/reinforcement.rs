//! Game outcomes and the bead-count learning rule

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::tictactoe::{Player, TerminalStatus};

/// Result of a finished game from the engine's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    EngineWin,
    EngineLoss,
    Draw,
}

impl Outcome {
    /// Translate a board verdict for an engine playing `seat`.
    ///
    /// Returns `None` while the game is still going.
    pub fn from_status(status: TerminalStatus, seat: Player) -> Option<Outcome> {
        match status {
            TerminalStatus::Ongoing => None,
            TerminalStatus::Draw => Some(Outcome::Draw),
            TerminalStatus::XWins | TerminalStatus::OWins => {
                if status.winner() == Some(seat) {
                    Some(Outcome::EngineWin)
                } else {
                    Some(Outcome::EngineLoss)
                }
            }
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::EngineWin => "engine win",
            Outcome::EngineLoss => "engine loss",
            Outcome::Draw => "draw",
        })
    }
}

/// Bead adjustments applied to every engine move of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReinforcementValues {
    pub win: i32,
    /// Zero keeps draws neutral; other values also reward or punish draws
    pub draw: i32,
    pub loss: i32,
}

impl Default for ReinforcementValues {
    /// One bead added on a win, one removed on a loss, nothing on a draw
    fn default() -> Self {
        ReinforcementValues {
            win: 1,
            draw: 0,
            loss: -1,
        }
    }
}

impl ReinforcementValues {
    pub fn new(win: i32, draw: i32, loss: i32) -> Self {
        Self { win, draw, loss }
    }

    /// Bead delta for `outcome`
    pub fn delta(&self, outcome: Outcome) -> i32 {
        match outcome {
            Outcome::EngineWin => self.win,
            Outcome::EngineLoss => self.loss,
            Outcome::Draw => self.draw,
        }
    }

    /// Wins must add beads and losses must remove them.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] otherwise.
    pub fn validate(&self) -> crate::Result<()> {
        if self.win <= 0 {
            return Err(crate::Error::InvalidConfiguration {
                message: format!("win reinforcement must be positive, got {}", self.win),
            });
        }
        if self.loss >= 0 {
            return Err(crate::Error::InvalidConfiguration {
                message: format!("loss reinforcement must be negative, got {}", self.loss),
            });
        }
        Ok(())
    }
}

impl fmt::Display for ReinforcementValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.win, self.draw, self.loss)
    }
}

impl FromStr for ReinforcementValues {
    type Err = crate::Error;

    /// Parse `"win,draw,loss"`, e.g. `"3,1,-1"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s
            .split([',', ';'])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();

        if parts.len() != 3 {
            return Err(crate::Error::ParseReinforcement {
                input: s.to_string(),
                reason: format!("expected win,draw,loss but got {} value(s)", parts.len()),
            });
        }

        let mut values = [0i32; 3];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| crate::Error::ParseReinforcement {
                input: s.to_string(),
                reason: format!("'{part}' is not an integer"),
            })?;
        }

        let parsed = ReinforcementValues::new(values[0], values[1], values[2]);
        parsed
            .validate()
            .map_err(|err| crate::Error::ParseReinforcement {
                input: s.to_string(),
                reason: err.to_string(),
            })?;
        Ok(parsed)
    }
}
