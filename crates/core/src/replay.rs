use crate::config::SessionConfig;
use crate::journal::InputJournal;
use crate::session::Session;
use crate::types::{AgentId, Phase};

#[derive(Debug, PartialEq, Eq)]
pub enum ReplayError {
    /// A journaled input was rejected on replay. Usually means the journal
    /// was recorded under a different config (check `config_hash`).
    InputRejected { seq: u64 },
    /// The night never reached a terminal phase within the horizon.
    NoTermination,
}

#[derive(Debug, PartialEq)]
pub struct ReplayResult {
    pub final_phase: Phase,
    pub attacker: Option<AgentId>,
    pub final_ms: u64,
    pub final_snapshot_hash: u64,
}

/// Session-clock instant by which any journaled night must have concluded:
/// the last input, a full intro, every hour of the shift, the complete
/// outage sequence, and one hour of slack.
pub fn replay_horizon(config: &SessionConfig, journal: &InputJournal) -> u64 {
    let last_input = journal.inputs.last().map_or(0, |record| record.at_ms);
    let outage = config.outage_reveal_delay_ms
        + config.outage_reveal_hold_ms
        + config.outage_blackout_ms;
    last_input
        + config.intro_length_ms
        + config.hour_length_ms * u64::from(config.final_hour)
        + outage
        + config.hour_length_ms
}

/// Re-run a night from its journal: same seed, same inputs at the same
/// session-clock instants, then run the clock out to the horizon. A live
/// session advanced to the same instant produces the same snapshot hash.
pub fn replay_night(
    config: &SessionConfig,
    journal: &InputJournal,
) -> Result<ReplayResult, ReplayError> {
    let mut session = Session::new(journal.seed, config.clone());

    for record in &journal.inputs {
        session.advance_to(record.at_ms);
        if session.apply(record.input).is_err() {
            return Err(ReplayError::InputRejected { seq: record.seq });
        }
    }

    session.advance_to(replay_horizon(config, journal));
    if !session.phase().is_terminal() {
        return Err(ReplayError::NoTermination);
    }

    Ok(ReplayResult {
        final_phase: session.phase(),
        attacker: session.attacker(),
        final_ms: session.now_ms(),
        final_snapshot_hash: session.snapshot_hash(),
    })
}
