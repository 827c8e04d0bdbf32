//! Temperature Control - terminal entry point

use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use clap::Parser;
use crossterm::event::Event;

use temperature_control::app::Game;
use temperature_control::assets::Assets;
use temperature_control::audio::{AudioManager, BellBackend, RodioBackend, SoundBackend};
use temperature_control::highscores::{DEFAULT_HIGHSCORE_FILE, HighScoreStore};
use temperature_control::ledger::{self, LedgerConfig};
use temperature_control::platform::{
    Framebuffer, KeyTracker, RasterCanvas, TerminalSession, present, spawn_event_reader,
};
use temperature_control::settings::{DEFAULT_SETTINGS_FILE, Settings};

const FRAME: Duration = Duration::from_micros(16_667);

#[derive(Parser, Debug)]
#[command(name = "temperature-control")]
#[command(about = "Steer the air conditioner, collect fans, dodge the heaters")]
struct Args {
    /// Directory holding ac.png, heater.png, fan.png, collect.wav and lose.wav
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// High score file
    #[arg(long, default_value = DEFAULT_HIGHSCORE_FILE)]
    highscore_file: PathBuf,

    /// Settings file (JSON)
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    settings: PathBuf,

    /// RNG seed (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,

    /// Append new high scores to this JSON-lines file for an external signer
    #[arg(long)]
    ledger_outbox: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    log::info!("Temperature Control starting...");

    let assets = match Assets::load(&args.assets) {
        Ok(assets) => assets,
        Err(e) => {
            log::error!("Failed to load assets: {}", e);
            std::process::exit(1);
        }
    };

    let settings = load_or_create_settings(&args.settings);
    let seed = args.seed.unwrap_or_else(time_seed);
    let sink = ledger::sink_from_config(args.ledger_outbox.clone(), LedgerConfig::from_env());
    let game = Game::new(
        seed,
        settings,
        AudioManager::new(sound_backend(&assets)),
        HighScoreStore::open(&args.highscore_file),
        sink,
    );

    if let Err(e) = run(game, &assets) {
        log::error!("Terminal error: {}", e);
        std::process::exit(1);
    }
    log::info!("Bye");
}

fn sound_backend(assets: &Assets) -> Box<dyn SoundBackend> {
    match RodioBackend::try_new(assets) {
        Ok(backend) => Box::new(backend),
        Err(e) => {
            log::warn!("No audio output ({}), falling back to the terminal bell", e);
            Box::new(BellBackend)
        }
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Load settings, writing the defaults out on first run so they can be edited
fn load_or_create_settings(path: &Path) -> Settings {
    let settings = Settings::load(path);
    if !path.exists() {
        if let Err(e) = settings.save(path) {
            log::warn!("Could not write default settings: {}", e);
        }
    }
    settings
}

fn run(mut game: Game, assets: &Assets) -> io::Result<()> {
    let mut session = TerminalSession::enter(BufWriter::new(io::stdout()))?;
    let events = spawn_event_reader();
    let (cols, rows) = session.size()?;
    let mut canvas = RasterCanvas::new(Framebuffer::new(cols, rows), assets);
    let mut keys = KeyTracker::new();

    let started = Instant::now();
    let mut last = started;
    loop {
        let frame_start = Instant::now();
        keys.begin_frame();
        drain_events(&events, &mut keys, &mut canvas);
        if keys.quit_requested() {
            break;
        }

        let dt = frame_start.duration_since(last).as_secs_f32();
        last = frame_start;
        game.set_input(keys.take_input());
        game.update(dt, started.elapsed().as_secs_f64());

        game.render(&mut canvas);
        present(&mut session.out, &canvas.fb)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
    Ok(())
}

fn drain_events(events: &Receiver<Event>, keys: &mut KeyTracker, canvas: &mut RasterCanvas) {
    while let Ok(event) = events.try_recv() {
        match event {
            Event::Key(key) => keys.handle(key),
            Event::Resize(cols, rows) => {
                log::debug!("Resized to {}x{}", cols, rows);
                canvas.fb = Framebuffer::new(cols, rows);
            }
            _ => {}
        }
    }
}
