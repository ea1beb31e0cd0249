use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::types::{AgentId, DoorSide, Location, OutageStage, SidePair, ZoneId};

/// One adversary. `door_wait` counts ticks spent idling at an open door;
/// `sub_state` is reserved for agent-specific behavior (the alcove curtain).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub location: Location,
    pub aggression: u8,
    pub door_wait: u8,
    pub sub_state: u8,
}

impl Agent {
    fn new(id: AgentId, location: Location, aggression: u8) -> Self {
        Self { id, location, aggression, door_wait: 0, sub_state: 0 }
    }
}

/// West patrol route, ending pressed against the left door.
pub const WEST_ROUTE: [Location; 6] = [
    Location::Zone(ZoneId::Stage),
    Location::Zone(ZoneId::Atrium),
    Location::Zone(ZoneId::Backstage),
    Location::Zone(ZoneId::WestHall),
    Location::Zone(ZoneId::WestNook),
    Location::AtDoor(DoorSide::Left),
];

/// East patrol route, ending pressed against the right door.
pub const EAST_ROUTE: [Location; 7] = [
    Location::Zone(ZoneId::Stage),
    Location::Zone(ZoneId::Atrium),
    Location::Zone(ZoneId::Washrooms),
    Location::Zone(ZoneId::Kitchen),
    Location::Zone(ZoneId::EastHall),
    Location::Zone(ZoneId::EastNook),
    Location::AtDoor(DoorSide::Right),
];

/// The fixed ordered route an agent follows, if it patrols at all.
/// `Showman` and `Lurker` hold their posts and never patrol.
pub fn patrol_route(id: AgentId) -> Option<&'static [Location]> {
    match id {
        AgentId::Prowler => Some(&WEST_ROUTE),
        AgentId::Scavenger => Some(&EAST_ROUTE),
        AgentId::Showman | AgentId::Lurker => None,
    }
}

/// The corridor agent whose route ends at the given door.
pub fn corridor_agent(side: DoorSide) -> AgentId {
    match side {
        DoorSide::Left => AgentId::Prowler,
        DoorSide::Right => AgentId::Scavenger,
    }
}

/// Dense agent map keyed by identity. Always holds all four agents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentTable {
    agents: [Agent; 4],
}

impl AgentTable {
    fn with_aggression(prowler: u8, scavenger: u8, showman: u8, lurker: u8) -> Self {
        Self {
            agents: [
                Agent::new(AgentId::Prowler, Location::Zone(ZoneId::Stage), prowler),
                Agent::new(AgentId::Scavenger, Location::Zone(ZoneId::Stage), scavenger),
                Agent::new(AgentId::Showman, Location::Zone(ZoneId::Stage), showman),
                Agent::new(AgentId::Lurker, Location::Zone(ZoneId::Alcove), lurker),
            ],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }
}

impl Index<AgentId> for AgentTable {
    type Output = Agent;

    fn index(&self, id: AgentId) -> &Agent {
        &self.agents[id as usize]
    }
}

impl IndexMut<AgentId> for AgentTable {
    fn index_mut(&mut self, id: AgentId) -> &mut Agent {
        &mut self.agents[id as usize]
    }
}

/// Mutable world snapshot for one night. Constructed fresh on session start,
/// mutated by ticks and inputs, rendered read-only by the presentation layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    pub hour: u8,
    pub power: f32,
    pub monitor_open: bool,
    pub active_camera: ZoneId,
    pub doors_closed: SidePair<bool>,
    pub lights_on: SidePair<bool>,
    pub outage_stage: Option<OutageStage>,
    pub agents: AgentTable,
}

impl WorldState {
    fn with_agents(agents: AgentTable) -> Self {
        Self {
            hour: 0,
            power: 100.0,
            monitor_open: false,
            active_camera: ZoneId::Stage,
            doors_closed: SidePair::default(),
            lights_on: SidePair::default(),
            outage_stage: None,
            agents,
        }
    }

    /// What the menu shows before any night begins.
    pub fn menu_default() -> Self {
        Self::with_agents(AgentTable::with_aggression(5, 5, 3, 2))
    }

    /// Session-start preset: corridor agents come in hot, the other two
    /// stay dormant until the outage sequence.
    pub fn night_start() -> Self {
        Self::with_agents(AgentTable::with_aggression(12, 12, 0, 0))
    }

    /// Instantaneous device load: a baseline unit plus one per active
    /// device, recomputed fresh from the current flags.
    pub fn power_usage(&self) -> u8 {
        1 + u8::from(self.monitor_open)
            + u8::from(self.doors_closed.left)
            + u8::from(self.doors_closed.right)
            + u8::from(self.lights_on.left)
            + u8::from(self.lights_on.right)
    }
}
