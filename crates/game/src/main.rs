//! Breach - headless runner for the gameplay core.
//!
//! Plays a scripted input sequence against the configured levels and logs what
//! happens. Rendering and the on-screen HUD are provided by a host embedding the
//! `game` library; here the HUD goes to the log.

use anyhow::{Context, Result};
use game::{builtin_levels, level, GameConfig, GameSession, LogHud, TickOutcome};
use input::{ElementState, InputState, KeyCode, MouseButton};

/// Pointer pixels per frame while sweeping the view.
const SWEEP_SPEED: f64 = 6.0;

/// Drive the demo input for frame `frame` of a run at `frame_rate` Hz.
///
/// Walk forward for three seconds, then sweep the view left and right, clicking
/// once a second throughout and drawing the shotgun at the four second mark.
fn script(input: &mut InputState, frame: u32, frame_rate: u32) {
    input.begin_frame();
    let second = frame / frame_rate;
    let within = frame % frame_rate;

    if frame == 0 {
        input.set_cursor_locked(true);
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
    }
    if frame == 3 * frame_rate {
        input.process_keyboard(KeyCode::KeyW, ElementState::Released);
    }
    if frame == 4 * frame_rate {
        input.process_keyboard(KeyCode::Digit2, ElementState::Pressed);
    } else if frame == 4 * frame_rate + 1 {
        input.process_keyboard(KeyCode::Digit2, ElementState::Released);
    }

    if second >= 3 {
        let direction = if second % 2 == 0 { 1.0 } else { -1.0 };
        input.process_mouse_motion((direction * SWEEP_SPEED, 0.0));
    }

    match within {
        0 => input.process_mouse_button(MouseButton::Left, ElementState::Pressed),
        1 => input.process_mouse_button(MouseButton::Left, ElementState::Released),
        _ => {}
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GameConfig::load();
    let levels = match &config.levels_path {
        Some(path) => level::load_levels(path).with_context(|| format!("loading levels from {:?}", path))?,
        None => builtin_levels(),
    };
    log::info!("Starting Breach with {} levels", levels.len());

    let frames = config.frames;
    let frame_rate = config.frame_rate.max(1);
    let dt = config.frame_delta();
    let mut session = GameSession::new(config, levels).context("building the first level")?;
    log::info!(
        "Level 1/{}: {} walls, spawn at {:?}",
        session.level_count(),
        session.level().walls.len(),
        session.level().spawn
    );
    let mut hud = LogHud::new();
    let mut input = InputState::new();

    for frame in 0..frames {
        script(&mut input, frame, frame_rate);
        match session.tick(dt, &input, &mut hud).context("advancing the game")? {
            TickOutcome::LevelAdvanced { index } => {
                log::info!("Now on level {}/{}", index + 1, session.level_count())
            }
            TickOutcome::GameOver => {
                log::info!("Player died after {:.1}s, restarting", session.time().elapsed_seconds());
                session.restart().context("restarting")?;
            }
            TickOutcome::Running | TickOutcome::Waiting | TickOutcome::Victory => {}
        }
    }

    let player = session.player();
    log::info!(
        "Finished {} frames on level {}: health {}, {} of {} enemies alive, {:?}",
        session.time().frame_count(),
        session.level_index() + 1,
        player.health.current,
        session.roster().alive_count(),
        session.roster().len(),
        session.mission().state()
    );
    Ok(())
}
