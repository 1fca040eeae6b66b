//! Orbital Dash headless runner
//!
//! Plays one seeded run with a simple autopilot, logs the summary and records
//! the score on the on-disk leaderboard.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use anyhow::{Context, Result};
    use clap::Parser;

    use orbital_dash::consts::DEFAULT_COUNTDOWN_SECONDS;
    use orbital_dash::persistence::FileStore;
    use orbital_dash::sim::{RunPhase, SimEvent, SimulationState};
    use orbital_dash::{AssetHandle, AssetManifest, DrawableKind, Session, Tuning};

    #[derive(Parser, Debug)]
    #[command(name = "orbital-dash")]
    #[command(about = "Run a seeded Orbital Dash session with the autopilot")]
    struct Cli {
        /// Run seed
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Give up after this many seconds of simulated time
        #[arg(long, default_value_t = 300.0)]
        seconds: f32,
        /// Host frame rate to simulate
        #[arg(long, default_value_t = 60.0)]
        fps: f32,
        /// Tuning overrides (JSON)
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// Directory holding the leaderboard files
        #[arg(long, default_value = "orbital-data")]
        data_dir: PathBuf,
        /// Name recorded on the leaderboard
        #[arg(long, default_value = "Autopilot")]
        name: String,
        /// Start immediately instead of counting down
        #[arg(long, default_value_t = false)]
        skip_countdown: bool,
    }

    /// One placeholder handle per drawable kind
    fn placeholder_manifest() -> AssetManifest {
        let kinds = [
            DrawableKind::Player,
            DrawableKind::Asteroid,
            DrawableKind::Debris,
            DrawableKind::PowerUp,
            DrawableKind::Alien,
            DrawableKind::AlienLaser,
            DrawableKind::Bullet,
            DrawableKind::Missile,
            DrawableKind::Streak,
            DrawableKind::Explosion,
        ];
        kinds
            .into_iter()
            .zip(1u32..)
            .fold(AssetManifest::new(), |manifest, (kind, id)| {
                manifest.with(kind, AssetHandle(id))
            })
    }

    /// Hover near mid-field and dodge the closest hazard ahead
    fn autopilot(state: &SimulationState) -> bool {
        let pos = state.player.pos;
        let field = state.field;
        let threat = state
            .hazards
            .hazards
            .iter()
            .filter(|h| h.pos.x > pos.x && h.pos.x - pos.x < 260.0)
            .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x));

        let mut target_y = field.y * 0.5;
        if let Some(hazard) = threat {
            let clearance = hazard.extent().y + 90.0;
            target_y = if hazard.pos.y > pos.y {
                hazard.pos.y - clearance
            } else {
                hazard.pos.y + clearance
            };
        }
        let target_y = target_y.clamp(150.0, field.y - 80.0);

        pos.y > target_y && state.player.vel.y > 0.0
    }

    fn load_tuning(cli: &Cli) -> Result<Tuning> {
        let Some(path) = &cli.tuning else {
            return Ok(Tuning::default());
        };
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading tuning file {}", path.display()))?;
        Ok(Tuning::from_json(&json))
    }

    pub fn run() -> Result<()> {
        let cli = Cli::parse();
        let tuning = load_tuning(&cli)?;
        std::fs::create_dir_all(&cli.data_dir)
            .with_context(|| format!("creating {}", cli.data_dir.display()))?;

        let mut session = Session::new(cli.seed, &tuning, FileStore::new(&cli.data_dir));
        session.attach_assets(placeholder_manifest());
        session.start_run(DEFAULT_COUNTDOWN_SECONDS)?;
        if cli.skip_countdown {
            session.skip_countdown();
        }

        let fps = cli.fps.max(1.0);
        let frame_ms = 1000.0 / f64::from(fps);
        let max_frames = ((cli.seconds + DEFAULT_COUNTDOWN_SECONDS) * fps) as u64;
        let mut now_ms = 0.0;

        for _ in 0..max_frames {
            if autopilot(session.state()) {
                session.jump();
            }
            session.fire();

            now_ms += frame_ms;
            for event in session.frame(now_ms) {
                match event {
                    SimEvent::PowerUpCollected(kind) => log::info!("Picked up {}", kind.name()),
                    SimEvent::PlayerHit { lives } => log::info!("Hit! lives: {lives:?}"),
                    _ => {}
                }
            }
            if session.phase() == RunPhase::GameOver {
                break;
            }
        }

        let Some(summary) = session.summary() else {
            let snapshot = session.snapshot();
            log::info!(
                "Time limit reached at {:.1}s with score {:.0}",
                snapshot.elapsed,
                snapshot.score
            );
            return Ok(());
        };

        log::info!(
            "Run over: score {} in {:.1}s ({} destroyed, {} phased, {} pickups)",
            summary.score,
            summary.elapsed,
            summary.destroyed,
            summary.phased,
            summary.pickups_collected
        );
        println!("{}", serde_json::to_string_pretty(&summary)?);

        let when = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs().to_string())
            .unwrap_or_default();
        if let Some(rank) = session.save_high_score(&cli.name, &when) {
            log::info!("{} placed #{rank}", cli.name);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Orbital Dash (headless) starting...");
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The wasm build is used as a library by the host page
}
