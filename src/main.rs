//! Verbatim headless runner.
//!
//! Builds the bundled house, optionally resumes a saved session, then plays
//! a short scripted walk: the player turns, walks towards the bathroom door
//! and uses whatever is in front of them now and then. Cues and subtitles
//! go to the log. The session is saved when the run ends.
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --frames 900 --save-dir ./saves
//! ```

use std::path::PathBuf;

use clap::Parser;
use log::{debug, error, info};

use verbatim::house::{House, PLAYER_START};
use verbatim::persistence::save::{FileStore, load_game, save_game};
use verbatim::resources::simconfig::SimConfig;
use verbatim::session::Session;
use verbatim::simulation::Simulation;
use verbatim::systems::movement::MoveInput;

const FRAME_TIME: f32 = 1.0 / 60.0;
/// Frames between two attempts to use the targeted object.
const INTERACT_EVERY: u32 = 45;

/// Verbatim simulation core
#[derive(Parser)]
#[command(version, about = "Headless run of the Verbatim house simulation")]
struct Cli {
    /// INI file with simulation tunables (default: ./verbatim.ini).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of 60 Hz frames to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Directory holding the save file.
    #[arg(long, value_name = "PATH", default_value = "./saves")]
    save_dir: PathBuf,

    /// Resume from the saved session, if there is one.
    #[arg(long)]
    load: bool,

    /// Write the effective configuration back to the INI file and exit.
    #[arg(long)]
    write_config: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SimConfig::with_path(path),
        None => SimConfig::new(),
    };
    config.load_from_file().ok(); // ignore errors, use defaults

    if cli.write_config {
        if let Err(e) = config.save_to_file() {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        println!("Config written to {}", config.config_path.display());
        return;
    }

    let mut sim = Simulation::new(config);
    if let Err(e) = sim.register(&House) {
        eprintln!("Error building the house: {e}");
        std::process::exit(1);
    }
    sim.on_settled(|_, readiness| info!("House settled ({:?}), starting the walk", readiness));
    sim.readiness_mut().mark_ready();

    let mut store = FileStore::new(&cli.save_dir);
    let saved = if cli.load { load_game(&store) } else { None };
    let mut session = match saved {
        Some(save) => Session::from_save(&save, &mut sim),
        None => Session::new(PLAYER_START),
    };

    info!("Running {} frames", cli.frames);
    for frame in 0..cli.frames {
        let input = scripted_input(frame);
        if frame < 60 {
            session.body.yaw = 0.0;
            session.body.pitch = (frame as f32 / 60.0) * -0.1;
        }

        let eye = session.body.eye(&sim.config().player);
        let look = session.body.look_direction();
        let reach = sim.config().player.interact_distance;
        let target = sim.pick(eye, look, reach);
        sim.stare(target.as_ref().map(|hit| hit.entity), FRAME_TIME);

        if frame % INTERACT_EVERY == INTERACT_EVERY - 1 {
            if let Some(hit) = &target {
                debug!("Using '{}' ({})", hit.id, hit.prompt);
                let outcome = sim.interact(hit.entity, &mut session);
                if let Some(text) = outcome.text() {
                    info!("{}", text);
                }
            }
        }

        sim.step_player(&mut session.body, input, FRAME_TIME);
        session.update_story();
        sim.update(FRAME_TIME, Some(session.body.position));

        for cue in sim.drain_cues() {
            debug!("Cue: {:?}", cue);
        }
        if session.won {
            info!("The car pulls away. The end.");
            break;
        }
    }

    for line in &session.subtitles {
        info!("Subtitle: {}", line);
    }
    info!(
        "Finished at {:?} carrying {:?}",
        session.body.position,
        session.inventory.ids()
    );

    let save = session.to_save(&mut sim);
    if let Err(e) = save_game(&mut store, &save) {
        error!("Could not save the session: {}", e);
        std::process::exit(1);
    }
}

/// Walk forward after a short look around.
fn scripted_input(frame: u32) -> MoveInput {
    if frame < 60 {
        return MoveInput::default();
    }
    MoveInput {
        forward: 1.0,
        strafe: if (frame / 120) % 2 == 0 { 0.0 } else { -0.3 },
        jump: frame % 300 == 299,
    }
}
