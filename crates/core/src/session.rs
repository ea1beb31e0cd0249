use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

use crate::config::SessionConfig;
use crate::scheduler::{Scheduler, TaskKind};
use crate::state::{WorldState, corridor_agent, patrol_route};
use crate::types::{
    AgentId, DoorSide, InputEvent, Location, OutageStage, Phase, SessionError, SessionEvent,
    SidePair, ZoneId,
};

/// One night shift: the top-level state machine, the world it mutates, and
/// the timers that drive it. The embedder pumps time with [`advance_to`]
/// and feeds player input through [`apply`]; everything else is internal.
///
/// A `(seed, timed input sequence)` pair fully determines the night.
///
/// [`advance_to`]: Session::advance_to
/// [`apply`]: Session::apply
pub struct Session {
    seed: u64,
    config: SessionConfig,
    rng: ChaCha8Rng,
    clock_ms: u64,
    phase: Phase,
    world: WorldState,
    scheduler: Scheduler,
    log: Vec<SessionEvent>,
    attacker: Option<AgentId>,
}

impl Session {
    pub fn new(seed: u64, config: SessionConfig) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            clock_ms: 0,
            phase: Phase::Menu,
            world: WorldState::menu_default(),
            scheduler: Scheduler::new(),
            log: Vec::new(),
            attacker: None,
            config,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Read-only world snapshot for rendering.
    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn log(&self) -> &[SessionEvent] {
        &self.log
    }

    /// Who delivered the jumpscare, once the phase is [`Phase::Jumpscare`].
    pub fn attacker(&self) -> Option<AgentId> {
        self.attacker
    }

    pub fn now_ms(&self) -> u64 {
        self.clock_ms
    }

    // -----------------------------------------------------------------
    // Time
    // -----------------------------------------------------------------

    /// Advance the session clock, firing every due task in deadline order.
    /// Each task runs to completion before the next is considered, and a
    /// phase transition clears the queue, so a tick that became stale
    /// mid-advance never fires.
    pub fn advance_to(&mut self, now_ms: u64) {
        let target = now_ms.max(self.clock_ms);
        while let Some((due_ms, kind)) = self.scheduler.pop_due(target) {
            self.clock_ms = self.clock_ms.max(due_ms);
            self.run_task(due_ms, kind);
        }
        self.clock_ms = target;
    }

    fn run_task(&mut self, due_ms: u64, kind: TaskKind) {
        match kind {
            TaskKind::IntroTimeout => {
                if self.phase == Phase::Intro {
                    self.begin_playing();
                }
            }
            TaskKind::HourTick => self.hour_tick(due_ms),
            TaskKind::PowerTick => self.power_tick(due_ms),
            TaskKind::AdversaryTick => self.adversary_tick(due_ms),
            TaskKind::OutageReveal => self.outage_reveal(due_ms),
            TaskKind::OutageBlackout => self.outage_blackout(due_ms),
            TaskKind::OutageAttack => self.outage_attack(),
        }
    }

    // -----------------------------------------------------------------
    // Input surface
    // -----------------------------------------------------------------

    /// Dispatch a player input. Shells and the replay driver both feed the
    /// session exclusively through this.
    pub fn apply(&mut self, input: InputEvent) -> Result<(), SessionError> {
        match input {
            InputEvent::StartSession => self.start(),
            InputEvent::SkipIntro => self.skip_intro(),
            InputEvent::AcknowledgeEnd => self.acknowledge(),
            InputEvent::OpenMonitor => self.set_monitor(true),
            InputEvent::CloseMonitor => self.set_monitor(false),
            InputEvent::SelectCamera(zone) => self.select_camera(zone),
            InputEvent::ToggleDoor(side) => self.toggle_door(side),
            InputEvent::ToggleLight(side) => self.toggle_light(side),
        }
    }

    /// Begin a night: fresh world, harder corridor preset, intro screen.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.phase != Phase::Menu {
            return Err(SessionError::PhaseMismatch);
        }
        self.world = WorldState::night_start();
        self.attacker = None;
        self.log.clear();
        self.enter_phase(Phase::Intro);
        self.scheduler
            .schedule_at(self.clock_ms + self.config.intro_length_ms, TaskKind::IntroTimeout);
        Ok(())
    }

    /// Player clicked through the intro instead of waiting it out.
    pub fn skip_intro(&mut self) -> Result<(), SessionError> {
        if self.phase != Phase::Intro {
            return Err(SessionError::PhaseMismatch);
        }
        self.begin_playing();
        Ok(())
    }

    /// Leave a terminal screen and return to the menu.
    pub fn acknowledge(&mut self) -> Result<(), SessionError> {
        if !self.phase.is_terminal() {
            return Err(SessionError::PhaseMismatch);
        }
        self.enter_phase(Phase::Menu);
        Ok(())
    }

    /// Raise or lower the camera monitor. Never power-gated.
    pub fn set_monitor(&mut self, open: bool) -> Result<(), SessionError> {
        self.require_playing()?;
        self.world.monitor_open = open;
        Ok(())
    }

    pub fn select_camera(&mut self, zone: ZoneId) -> Result<(), SessionError> {
        self.require_playing()?;
        if !self.world.monitor_open {
            return Err(SessionError::MonitorClosed);
        }
        self.world.active_camera = zone;
        Ok(())
    }

    pub fn toggle_door(&mut self, side: DoorSide) -> Result<(), SessionError> {
        self.require_playing()?;
        self.require_power()?;
        let door = self.world.doors_closed.get_mut(side);
        *door = !*door;
        Ok(())
    }

    pub fn toggle_light(&mut self, side: DoorSide) -> Result<(), SessionError> {
        self.require_playing()?;
        self.require_power()?;
        let lit = {
            let light = self.world.lights_on.get_mut(side);
            *light = !*light;
            *light
        };
        let watcher = corridor_agent(side);
        if lit && self.world.agents[watcher].location == Location::AtDoor(side) {
            self.log.push(SessionEvent::FigureAtDoor { agent: watcher, side });
        }
        Ok(())
    }

    fn require_playing(&self) -> Result<(), SessionError> {
        if self.phase == Phase::Playing { Ok(()) } else { Err(SessionError::PhaseMismatch) }
    }

    fn require_power(&self) -> Result<(), SessionError> {
        if self.world.power > 0.0 { Ok(()) } else { Err(SessionError::PowerOffline) }
    }

    // -----------------------------------------------------------------
    // Phase transitions
    // -----------------------------------------------------------------

    /// Every transition tears down pending timers first; the phase being
    /// entered schedules only what it owns.
    fn enter_phase(&mut self, phase: Phase) {
        self.scheduler.clear();
        self.phase = phase;
    }

    fn begin_playing(&mut self) {
        self.enter_phase(Phase::Playing);
        self.log.push(SessionEvent::ShiftStarted);
        let now = self.clock_ms;
        self.scheduler.schedule_at(now + self.config.hour_length_ms, TaskKind::HourTick);
        self.scheduler.schedule_at(now + self.config.power_tick_ms, TaskKind::PowerTick);
        self.scheduler.schedule_at(now + self.config.adversary_tick_ms, TaskKind::AdversaryTick);
    }

    fn trigger_jumpscare(&mut self, agent: AgentId) {
        self.attacker = Some(agent);
        self.enter_phase(Phase::Jumpscare);
        self.log.push(SessionEvent::Jumpscare { agent });
    }

    fn finish_win(&mut self) {
        self.enter_phase(Phase::Win);
        self.log.push(SessionEvent::NightSurvived);
    }

    // -----------------------------------------------------------------
    // Periodic work
    // -----------------------------------------------------------------

    fn hour_tick(&mut self, due_ms: u64) {
        if self.phase != Phase::Playing {
            return;
        }
        if self.world.hour + 1 >= self.config.final_hour {
            self.world.hour = self.config.final_hour;
            self.finish_win();
            return;
        }
        self.world.hour += 1;
        self.log.push(SessionEvent::HourAdvanced { hour: self.world.hour });
        self.scheduler.schedule_at(due_ms + self.config.hour_length_ms, TaskKind::HourTick);
    }

    fn power_tick(&mut self, due_ms: u64) {
        if self.phase != Phase::Playing {
            return;
        }
        // Usage is recomputed fresh from the current flags; no hysteresis.
        let drain = f32::from(self.world.power_usage()) * self.config.drain_per_usage;
        self.world.power = (self.world.power - drain).max(0.0);
        if self.world.power <= 0.0 {
            self.begin_outage(due_ms);
            return;
        }
        self.scheduler.schedule_at(due_ms + self.config.power_tick_ms, TaskKind::PowerTick);
    }

    fn adversary_tick(&mut self, due_ms: u64) {
        if self.phase != Phase::Playing {
            return;
        }
        // West before east; an attack halts the sweep mid-tick.
        for id in [AgentId::Prowler, AgentId::Scavenger] {
            if let Some(attacker) = self.step_patroller(id) {
                self.trigger_jumpscare(attacker);
                return;
            }
        }
        self.scheduler.schedule_at(due_ms + self.config.adversary_tick_ms, TaskKind::AdversaryTick);
    }

    /// One patrol step. Returns the agent's id when its door patience ran
    /// out and it attacks.
    fn step_patroller(&mut self, id: AgentId) -> Option<AgentId> {
        let route = patrol_route(id)?;

        let draw = self.rng.next_u64() % u64::from(self.config.aggression_draw_range);
        let mut agent = self.world.agents[id];
        if draw >= u64::from(agent.aggression) {
            return None; // sat this tick out
        }

        let Some(Location::AtDoor(door)) = route.last().copied() else {
            return None;
        };

        if agent.location == Location::AtDoor(door) {
            if *self.world.doors_closed.get(door) {
                // Shut out: back to the start of the route.
                agent.location = route[0];
                agent.door_wait = 0;
                self.world.agents[id] = agent;
                self.log.push(SessionEvent::AgentRepelled { agent: id, side: door });
                return None;
            }
            agent.door_wait = agent.door_wait.saturating_add(1);
            self.world.agents[id] = agent;
            if agent.door_wait > self.config.door_patience_ticks {
                return Some(id);
            }
            return None;
        }

        match route.iter().position(|stop| *stop == agent.location) {
            // Off-route should not occur; recover silently to the start.
            None => agent.location = route[0],
            Some(index) => {
                if index + 1 < route.len() {
                    let from = agent.location;
                    agent.location = route[index + 1];
                    agent.door_wait = 0;
                    self.world.agents[id] = agent;
                    self.log.push(SessionEvent::AgentMoved { agent: id, from, to: agent.location });
                    return None;
                }
            }
        }
        self.world.agents[id] = agent;
        None
    }

    // -----------------------------------------------------------------
    // Power outage sequence
    // -----------------------------------------------------------------

    fn begin_outage(&mut self, due_ms: u64) {
        // Depletion strips every device in the same instant.
        self.world.monitor_open = false;
        self.world.doors_closed = SidePair::default();
        self.world.lights_on = SidePair::default();
        self.world.outage_stage = Some(OutageStage::Dark);
        self.enter_phase(Phase::PowerOut);
        self.log.push(SessionEvent::PowerDepleted);
        self.log.push(SessionEvent::OutageStageChanged { stage: OutageStage::Dark });
        self.scheduler
            .schedule_at(due_ms + self.config.outage_reveal_delay_ms, TaskKind::OutageReveal);
    }

    fn outage_reveal(&mut self, due_ms: u64) {
        if self.phase != Phase::PowerOut {
            return;
        }
        self.world.outage_stage = Some(OutageStage::Reveal);
        // The stage figure steps into the dark office.
        self.world.agents[AgentId::Showman].location = Location::Office;
        self.log.push(SessionEvent::OutageStageChanged { stage: OutageStage::Reveal });
        self.scheduler
            .schedule_at(due_ms + self.config.outage_reveal_hold_ms, TaskKind::OutageBlackout);
    }

    fn outage_blackout(&mut self, due_ms: u64) {
        if self.phase != Phase::PowerOut {
            return;
        }
        self.world.outage_stage = Some(OutageStage::Dark);
        self.log.push(SessionEvent::OutageStageChanged { stage: OutageStage::Dark });
        self.scheduler
            .schedule_at(due_ms + self.config.outage_blackout_ms, TaskKind::OutageAttack);
    }

    fn outage_attack(&mut self) {
        if self.phase != Phase::PowerOut {
            return;
        }
        self.trigger_jumpscare(AgentId::Showman);
    }

    // -----------------------------------------------------------------
    // Identity
    // -----------------------------------------------------------------

    /// Cheap digest of everything observable, used by replay-equivalence
    /// checks.
    pub fn snapshot_hash(&self) -> u64 {
        use std::hash::Hasher;
        use xxhash_rust::xxh3::Xxh3;

        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_u64(self.clock_ms);
        hasher.write_u8(self.phase as u8);
        hasher.write_u8(self.world.hour);
        hasher.write_u32(self.world.power.to_bits());
        hasher.write_u8(u8::from(self.world.monitor_open));
        hasher.write_u8(self.world.active_camera as u8);
        hasher.write_u8(u8::from(self.world.doors_closed.left));
        hasher.write_u8(u8::from(self.world.doors_closed.right));
        hasher.write_u8(u8::from(self.world.lights_on.left));
        hasher.write_u8(u8::from(self.world.lights_on.right));
        hasher.write_u8(match self.world.outage_stage {
            None => 0,
            Some(OutageStage::Dark) => 1,
            Some(OutageStage::Reveal) => 2,
        });
        hasher.write_u8(self.attacker.map_or(u8::MAX, |id| id as u8));
        for agent in self.world.agents.iter() {
            let (tag, detail) = match agent.location {
                Location::Zone(zone) => (0u8, zone as u8),
                Location::AtDoor(side) => (1, side as u8),
                Location::Office => (2, 0),
            };
            hasher.write_u8(tag);
            hasher.write_u8(detail);
            hasher.write_u8(agent.aggression);
            hasher.write_u8(agent.door_wait);
            hasher.write_u8(agent.sub_state);
        }
        hasher.finish()
    }
}
