use std::time::Duration;

/// UCB1 exploration coefficient.
pub const EXPLORATION: f64 = std::f64::consts::SQRT_2;

/// Default thinking time per engine move.
pub const DEFAULT_BUDGET: Duration = Duration::from_secs(5);

pub struct EngineConfig {
    /// Wall-clock budget per decision. Checked between search cycles, so the
    /// final cycle may overrun it.
    pub budget: Duration,
    /// Fixed rng seed for reproducible searches; None seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            budget: DEFAULT_BUDGET,
            seed: None,
        }
    }
}

/// Outcome of one decision, with the aggregate numbers callers log.
#[derive(Clone, Copy, Debug)]
pub struct SearchResult<M> {
    pub best_move: M,
    /// Completed search cycles == root visit count.
    pub iterations: u32,
    /// Win ratio of the chosen root child (draws count as wins).
    pub win_rate: f64,
}
