//! Mouth Arcade headless runner
//!
//! Plays one variant against a scripted control signal at 60 frames/s of
//! simulated time. The fake detector publishes every 6th frame, like a face
//! tracker running slower than the display.
//!
//! Usage: `mouth-arcade [variant] [frames] [seed]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::Path;
    use std::time::{SystemTime, UNIX_EPOCH};

    use mouth_arcade::audio::{AudioCommand, AudioDirector};
    use mouth_arcade::consts::FRAME_MS;
    use mouth_arcade::sim::GameEvent;
    use mouth_arcade::{Engine, Settings, SharedControl, Variant};

    const SETTINGS_FILE: &str = "mouth-arcade.json";
    const DEFAULT_FRAMES: u64 = 3600;
    /// Display frames per detector sample
    const DETECT_EVERY: u64 = 6;
    /// Period of the scripted open/close cycle
    const MOUTH_CYCLE_SECS: f64 = 1.6;
    /// Every this many seconds the face drops out of view for one second
    const DROPOUT_EVERY_SECS: f64 = 15.0;

    /// Scripted mouth openness: a slow swell around the ascend threshold
    fn scripted_control(t_secs: f64, threshold: f32) -> Option<f32> {
        if t_secs % DROPOUT_EVERY_SECS > DROPOUT_EVERY_SECS - 1.0 {
            return None;
        }
        let swing = (std::f64::consts::TAU * t_secs / MOUTH_CYCLE_SECS).sin() as f32;
        Some(threshold + 0.5 * swing)
    }

    fn time_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    pub fn run() {
        env_logger::init();

        let mut settings = Settings::load_or_default(Path::new(SETTINGS_FILE));
        let mut args = std::env::args().skip(1);

        if let Some(name) = args.next() {
            match Variant::from_str(&name) {
                Some(variant) => settings.variant = variant,
                None => {
                    eprintln!("unknown variant '{name}' (try fish, airplane or flappy)");
                    std::process::exit(2);
                }
            }
        }
        let frames = args
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_FRAMES);
        if let Some(seed) = args.next().and_then(|s| s.parse().ok()) {
            settings.seed = Some(seed);
        }
        let seed = settings.seed.unwrap_or_else(time_seed);

        let config = settings.variant_config();
        let threshold = config.physics.threshold;
        let control = SharedControl::new();
        let detector = control.writer();

        let mut engine = match Engine::new(config, seed, control) {
            Ok(engine) => engine,
            Err(e) => {
                eprintln!("invalid configuration: {e}");
                std::process::exit(1);
            }
        };
        let mut audio = AudioDirector::from_settings(&settings);
        log_commands(audio.on_reset().into_iter());

        log::info!(
            "Mouth Arcade: {} for {frames} frames (seed {seed})",
            settings.variant.as_str()
        );

        let mut games = Vec::new();
        for frame in 0..frames {
            let now_ms = frame as f64 * FRAME_MS;
            if frame % DETECT_EVERY == 0 {
                match scripted_control(now_ms / 1000.0, threshold) {
                    Some(value) => detector.publish(value),
                    None => detector.clear(),
                }
            }

            let out = engine.frame(now_ms);
            for event in &out.events {
                log::debug!("frame {frame}: {event:?}");
            }
            log_commands(audio.handle_events(&out.events).into_iter());

            let final_score = out.events.iter().find_map(|e| match e {
                GameEvent::GameOver { final_score } => Some(*final_score),
                _ => None,
            });
            if let Some(score) = final_score {
                log::info!("game {} over at frame {frame}: score {score}", games.len() + 1);
                games.push(score);
                engine.reset();
                log_commands(audio.on_reset().into_iter());
            }
        }

        let snapshot = engine.snapshot();
        println!(
            "{}: {} finished game(s) {:?}; current game score {} with {}/{} lives",
            settings.variant.as_str(),
            games.len(),
            games,
            snapshot.score,
            snapshot.lives,
            snapshot.max_lives
        );
    }

    fn log_commands(commands: impl Iterator<Item = AudioCommand>) {
        for command in commands {
            match command {
                AudioCommand::PlayTone { tone, volume } => log::debug!(
                    "audio: {:?} {} Hz for {} s at {volume:.2}",
                    tone.waveform,
                    tone.frequency_hz,
                    tone.duration_secs
                ),
                AudioCommand::StartMusic { track, volume } => {
                    log::debug!("audio: music loop {} s at {volume:.2}", track.duration_secs)
                }
                AudioCommand::StopMusic => log::debug!("audio: music stopped"),
            }
        }
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is embedded by a host page; this is just to satisfy the compiler
}
