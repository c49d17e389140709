//! Deterministic draw source for tests and reproducible demos

use crate::ports::DrawSource;

/// Replays a fixed list of draws, cycling when it runs out.
///
/// Each request returns `script[i % len] % bound`, so any script stays in
/// range whatever the current bound is. An empty script always yields 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDraws {
    script: Vec<u32>,
    cursor: usize,
}

impl ScriptedDraws {
    pub fn new(script: impl Into<Vec<u32>>) -> Self {
        Self {
            script: script.into(),
            cursor: 0,
        }
    }
}

impl DrawSource for ScriptedDraws {
    fn draw_below(&mut self, bound: u32) -> u32 {
        if self.script.is_empty() || bound == 0 {
            self.cursor += 1;
            return 0;
        }
        let value = self.script[self.cursor % self.script.len()] % bound;
        self.cursor += 1;
        value
    }
}
