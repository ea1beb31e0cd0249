use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use clap::Parser;
use nightshift_core::{
    AgentId, DoorSide, InputEvent, InputJournal, Location, Phase, Session, SessionConfig, ZoneId,
    patrol_route, replay_horizon, replay_night,
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base seed; omit for a fresh runtime seed
    #[arg(short, long)]
    seed: Option<u64>,
    /// How many random nights to run
    #[arg(short, long, default_value_t = 50)]
    nights: u64,
}

fn runtime_seed() -> u64 {
    let now_nanos =
        SystemTime::now().duration_since(UNIX_EPOCH).map_or(0_u128, |duration| duration.as_nanos());
    let entropy = (now_nanos as u64)
        ^ ((now_nanos >> 64) as u64)
        ^ u64::from(std::process::id()).rotate_left(17);
    mix_seed(entropy)
}

fn mix_seed(mut value: u64) -> u64 {
    value ^= value >> 30;
    value = value.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    value ^= value >> 27;
    value = value.wrapping_mul(0x94D0_49BB_1331_11EB);
    value ^ (value >> 31)
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn random_input(rng: &mut ChaCha8Rng) -> InputEvent {
    choose(
        rng,
        &[
            InputEvent::OpenMonitor,
            InputEvent::CloseMonitor,
            InputEvent::SelectCamera(ZoneId::Kitchen),
            InputEvent::SelectCamera(ZoneId::WestHall),
            InputEvent::SelectCamera(ZoneId::EastNook),
            InputEvent::ToggleDoor(DoorSide::Left),
            InputEvent::ToggleDoor(DoorSide::Right),
            InputEvent::ToggleLight(DoorSide::Left),
            InputEvent::ToggleLight(DoorSide::Right),
        ],
    )
}

fn location_is_legal(id: AgentId, location: Location) -> bool {
    match patrol_route(id) {
        Some(route) => route.contains(&location),
        None => matches!(location, Location::Zone(_) | Location::Office),
    }
}

fn run_night(
    config: &SessionConfig,
    seed: u64,
    rng: &mut ChaCha8Rng,
) -> Result<(Phase, Option<AgentId>)> {
    let mut session = Session::new(seed, config.clone());
    let mut journal = InputJournal::new(seed, config.content_hash());

    session
        .apply(InputEvent::StartSession)
        .map_err(|e| anyhow::anyhow!("start rejected: {e:?}"))?;
    journal.record(0, InputEvent::StartSession);
    session.advance_to(100);
    session.apply(InputEvent::SkipIntro).map_err(|e| anyhow::anyhow!("skip rejected: {e:?}"))?;
    journal.record(100, InputEvent::SkipIntro);

    let mut last_power = session.world().power;
    for _ in 0..2_000 {
        if session.phase().is_terminal() {
            break;
        }

        let step = 500 + rng.next_u64() % 4_000;
        session.advance_to(session.now_ms() + step);

        if session.phase() == Phase::Playing {
            let input = random_input(rng);
            if session.apply(input).is_ok() {
                journal.record(session.now_ms(), input);
            }
        }

        // Assert invariants
        let world = session.world();
        assert!(
            (0.0..=100.0).contains(&world.power),
            "Invariant failed: power out of range: {}",
            world.power
        );
        assert!(world.power <= last_power, "Invariant failed: power rose mid-night");
        last_power = world.power;
        assert!(world.hour <= config.final_hour, "Invariant failed: hour past the final hour");
        for agent in world.agents.iter() {
            assert!(
                location_is_legal(agent.id, agent.location),
                "Invariant failed: agent off its route: {agent:?}"
            );
        }
    }
    assert!(session.phase().is_terminal(), "night failed to conclude");

    // Live-vs-replay equivalence at a shared clock instant.
    session.advance_to(replay_horizon(config, &journal));
    let result =
        replay_night(config, &journal).map_err(|e| anyhow::anyhow!("replay failed: {e:?}"))?;
    assert_eq!(
        result.final_snapshot_hash,
        session.snapshot_hash(),
        "replay diverged from the live night"
    );

    Ok((result.final_phase, result.attacker))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let base_seed = args.seed.unwrap_or_else(runtime_seed);
    println!("Soak run: {} nights from base seed {base_seed}...", args.nights);

    let config = SessionConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(base_seed);

    let mut wins = 0_u64;
    let mut corridor_scares = 0_u64;
    let mut outage_scares = 0_u64;
    for night in 0..args.nights {
        let (phase, attacker) = run_night(&config, base_seed.wrapping_add(night), &mut rng)?;
        match (phase, attacker) {
            (Phase::Win, _) => wins += 1,
            (_, Some(AgentId::Showman)) => outage_scares += 1,
            _ => corridor_scares += 1,
        }
    }

    println!(
        "Soak completed: {wins} survived, {corridor_scares} corridor attacks, \
         {outage_scares} outage attacks."
    );
    Ok(())
}
