use serde::{Deserialize, Serialize};

/// The four intruders that roam the facility after hours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgentId {
    /// Patrols the west corridor toward the left office door.
    Prowler,
    /// Patrols the east corridor toward the right office door.
    Scavenger,
    /// Stays on the show stage; only the power-outage sequence moves it.
    Showman,
    /// Stays behind the alcove curtain. Carries a curtain counter that the
    /// base patrol protocol never advances.
    Lurker,
}

impl AgentId {
    pub const ALL: [Self; 4] = [Self::Prowler, Self::Scavenger, Self::Showman, Self::Lurker];
}

/// Camera zones of the facility. Every zone is viewable on the monitor;
/// only a subset appears on any patrol route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ZoneId {
    Stage,
    Atrium,
    Alcove,
    WestHall,
    WestNook,
    Storeroom,
    EastHall,
    EastNook,
    Backstage,
    Kitchen,
    Washrooms,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DoorSide {
    Left,
    Right,
}

/// Where an agent currently is: a camera zone, pressed against one of the
/// office doors, or inside the office itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    Zone(ZoneId),
    AtDoor(DoorSide),
    Office,
}

/// Per-side pair of door or light flags, indexed by [`DoorSide`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidePair<T> {
    pub left: T,
    pub right: T,
}

impl<T> SidePair<T> {
    pub fn get(&self, side: DoorSide) -> &T {
        match side {
            DoorSide::Left => &self.left,
            DoorSide::Right => &self.right,
        }
    }

    pub fn get_mut(&mut self, side: DoorSide) -> &mut T {
        match side {
            DoorSide::Left => &mut self.left,
            DoorSide::Right => &mut self.right,
        }
    }
}

/// Top-level session phase. Exactly one is active; it gates which scheduled
/// work runs and which inputs are accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Menu,
    Intro,
    Playing,
    PowerOut,
    Jumpscare,
    Win,
    GameOver,
}

impl Phase {
    /// Terminal phases require an acknowledge input to return to the menu.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Jumpscare | Self::Win | Self::GameOver)
    }
}

/// Visible stage of the power-outage sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutageStage {
    Dark,
    Reveal,
}

/// Player inputs, as emitted by whatever shell is driving the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    StartSession,
    SkipIntro,
    AcknowledgeEnd,
    OpenMonitor,
    CloseMonitor,
    SelectCamera(ZoneId),
    ToggleDoor(DoorSide),
    ToggleLight(DoorSide),
}

/// Append-only log entries a presentation layer consumes for cues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SessionEvent {
    ShiftStarted,
    HourAdvanced { hour: u8 },
    AgentMoved { agent: AgentId, from: Location, to: Location },
    AgentRepelled { agent: AgentId, side: DoorSide },
    /// A light came on while the corridor agent stood at that door.
    /// Cue only; the agent's state is untouched.
    FigureAtDoor { agent: AgentId, side: DoorSide },
    PowerDepleted,
    OutageStageChanged { stage: OutageStage },
    Jumpscare { agent: AgentId },
    NightSurvived,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionError {
    /// The input is not accepted in the current phase.
    PhaseMismatch,
    /// Door and light controls refuse to engage once power is gone.
    PowerOffline,
    /// Camera selection requires the monitor to be up.
    MonitorClosed,
}
