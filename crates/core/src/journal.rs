use serde::{Deserialize, Serialize};

use crate::types::InputEvent;

/// In-memory record of one sitting: the seed plus every accepted input with
/// the session-clock instant it was applied at. Feeding these back through
/// a fresh session reproduces the night exactly.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InputJournal {
    pub format_version: u16,
    pub build_id: String,
    pub config_hash: u64,
    pub seed: u64,
    pub inputs: Vec<InputRecord>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    pub seq: u64,
    pub at_ms: u64,
    pub input: InputEvent,
}

impl InputJournal {
    pub fn new(seed: u64, config_hash: u64) -> Self {
        Self {
            format_version: 1,
            build_id: "dev".to_string(),
            config_hash,
            seed,
            inputs: Vec::new(),
        }
    }

    /// Append an accepted input. Rejected inputs are never journaled; they
    /// have no state effect, so a replay reproduces them by absence.
    pub fn record(&mut self, at_ms: u64, input: InputEvent) {
        let seq = self.inputs.len() as u64;
        self.inputs.push(InputRecord { seq, at_ms, input });
    }
}
