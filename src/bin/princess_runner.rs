//! Headless Princess Runner
//!
//! Builds a seeded random skirmish (or loads one from JSON), lets the bot
//! play every unit for a few rounds and prints its decisions as JSON.

use std::sync::Arc;

use clap::Parser;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use princess::board::{Board, Facing, HexCoord, Terrain};
use princess::core::error::Result;
use princess::core::types::UnitId;
use princess::core::DecisionConfig;
use princess::game::{GameEvent, GameSnapshot, Phase};
use princess::princess::{load_behavior, BehaviorSettings, FiringDecision, MoveDecision, Princess};
use princess::units::{Location, Unit, Weapon};

/// Headless Princess Runner - bot vs bot decisions for inspection
#[derive(Parser, Debug)]
#[command(name = "princess_runner")]
#[command(about = "Run the decision core over a skirmish and print its decisions")]
struct Args {
    /// Behavior name (loaded from data/behaviors/)
    #[arg(long, default_value = "default")]
    behavior: String,

    /// JSON game snapshot to play instead of a random skirmish
    #[arg(long)]
    scenario: Option<std::path::PathBuf>,

    /// Board width in hexes
    #[arg(long, default_value_t = 24)]
    width: u32,

    /// Board height in hexes
    #[arg(long, default_value_t = 16)]
    height: u32,

    /// Units per side in a random skirmish
    #[arg(long, default_value_t = 3)]
    units: u32,

    /// Rounds to play
    #[arg(long, default_value_t = 3)]
    rounds: u32,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Keep enemy reachable sets current on a background thread
    #[arg(long)]
    precognition: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct RunReport {
    seed: Option<u64>,
    behavior: String,
    rounds: Vec<RoundReport>,
}

#[derive(Serialize)]
struct RoundReport {
    round: u32,
    moves: Vec<MoveDecision>,
    attacks: Vec<FiringDecision>,
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "princess=debug" } else { "princess=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&args) {
        eprintln!("princess_runner: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let behavior = load_behavior(&args.behavior).unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load behavior '{}': {}", args.behavior, e);
        eprintln!("Using default behavior");
        BehaviorSettings::default()
    });

    let (mut game, seed) = match &args.scenario {
        Some(path) => {
            let contents = std::fs::read_to_string(path)?;
            (serde_json::from_str::<GameSnapshot>(&contents)?, None)
        }
        None => {
            let seed = args.seed.unwrap_or_else(rand::random);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            (random_skirmish(args.width, args.height, args.units, &mut rng), Some(seed))
        }
    };

    let bot = if args.precognition {
        Princess::with_precognition(behavior.clone(), DecisionConfig::default(), Arc::new(game.clone()))?
    } else {
        Princess::new(behavior.clone(), DecisionConfig::default())?
    };

    let mut report = RunReport {
        seed,
        behavior: behavior.name.clone(),
        rounds: Vec::new(),
    };

    for _ in 0..args.rounds {
        let round = play_round(&bot, &mut game)?;
        report.rounds.push(round);
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Movement for every unit in id order, then firing for every unit
fn play_round(bot: &Princess, game: &mut GameSnapshot) -> Result<RoundReport> {
    game.phase = Phase::Movement;
    for unit in game.units.values_mut() {
        unit.done = false;
    }
    notify(bot, game, GameEvent::PhaseChanged { phase: Phase::Movement })?;

    let order: Vec<UnitId> = game.active_units().map(|u| u.id).collect();
    let mut moves = Vec::with_capacity(order.len());
    for id in &order {
        let decision = bot.calculate_move_turn(game, *id)?;
        let from = apply_move(game, &decision);
        notify(
            bot,
            game,
            GameEvent::UnitMoved {
                unit: *id,
                from,
                to: decision.path.position,
            },
        )?;
        moves.push(decision);
    }

    game.phase = Phase::Firing;
    let mut attacks = Vec::with_capacity(order.len());
    // Units that flew off the board have nothing to shoot at
    let shooters: Vec<UnitId> = game.active_units().map(|u| u.id).collect();
    for id in &shooters {
        attacks.push(bot.calculate_firing_turn(game, *id)?);
    }

    let round = RoundReport {
        round: game.round,
        moves,
        attacks,
    };
    game.round += 1;
    Ok(round)
}

/// Commit a chosen path to the snapshot; returns where the unit started
fn apply_move(game: &mut GameSnapshot, decision: &MoveDecision) -> Option<HexCoord> {
    let unit = game.units.get_mut(&decision.unit)?;
    let from = unit.position;
    let path = &decision.path;
    unit.movement_mode = path.movement_mode(unit);
    unit.position = if path.off_board { None } else { Some(path.position) };
    unit.facing = path.facing;
    unit.secondary_facing = path.facing;
    unit.hexes_moved = path.hexes_moved;
    unit.prone = path.prone;
    unit.hull_down = path.hull_down;
    unit.velocity = path.velocity;
    unit.altitude = path.altitude;
    unit.done = true;
    from
}

fn notify(bot: &Princess, game: &GameSnapshot, event: GameEvent) -> Result<()> {
    if let Some(precognition) = bot.precognition() {
        precognition.update_snapshot(Arc::new(game.clone()))?;
        precognition.handle_event(event)?;
    }
    Ok(())
}

/// Two lances facing each other across a board with scattered woods
fn random_skirmish(width: u32, height: u32, per_side: u32, rng: &mut ChaCha8Rng) -> GameSnapshot {
    let mut board = Board::new(width, height);
    let woods = (width * height) / 12;
    for _ in 0..woods {
        let coord = HexCoord::new(rng.gen_range(0..width as i32), rng.gen_range(0..height as i32));
        let terrain = if rng.gen_bool(0.3) { Terrain::HeavyWoods } else { Terrain::LightWoods };
        board.set_terrain(coord, terrain);
    }

    let mut game = GameSnapshot::new(board);
    let mut next_id = 1;
    for team in 0..2u32 {
        let (column, facing) = if team == 0 { (1, Facing::East) } else { (width as i32 - 2, Facing::West) };
        for slot in 0..per_side {
            let row = ((slot + 1) * height / (per_side + 1)) as i32;
            let position = HexCoord::new(column, row);
            game.board.set_terrain(position, Terrain::Clear);
            game.add_unit(random_mech(next_id, team, rng).at(position, facing));
            next_id += 1;
        }
    }
    game
}

fn random_mech(id: u32, team: u32, rng: &mut ChaCha8Rng) -> Unit {
    let weight = 20.0 + 5.0 * rng.gen_range(0..=16) as f64;
    let walk_mp = (4.0 * 55.0 / weight).round().clamp(2.0, 8.0) as u32;
    let jump_mp = if rng.gen_bool(0.4) { walk_mp.min(5) } else { 0 };
    let mut unit = Unit::mech(id, &format!("Mech {}", id), team, weight, walk_mp, jump_mp)
        .with_skills(rng.gen_range(3..=5), rng.gen_range(4..=6))
        .with_heat_capacity(10 + rng.gen_range(0..=10));

    let mounts = [
        Location::RightArm,
        Location::LeftArm,
        Location::RightTorso,
        Location::LeftTorso,
        Location::CenterTorso,
    ];
    let slots = 2 + (weight / 25.0) as u16;
    for slot in 0..slots {
        let location = *mounts.choose(rng).unwrap_or(&Location::CenterTorso);
        let weapon = match rng.gen_range(0..7) {
            0 => Weapon::small_laser(slot, location),
            1 | 2 => Weapon::medium_laser(slot, location),
            3 => Weapon::large_laser(slot, location),
            4 => Weapon::ppc(slot, location),
            5 => Weapon::lrm(slot, 10, location),
            _ => Weapon::srm(slot, 4, location),
        };
        unit = unit.with_weapon(weapon);
    }
    unit
}
