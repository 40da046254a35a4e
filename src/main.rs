//! Lane Dodger headless runner
//!
//! Plays a session with the autopilot on a virtual clock and prints the
//! resulting leaderboard. Useful for balancing spawn intervals and for
//! eyeballing the event stream (`RUST_LOG=debug`).

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use anyhow::{Context, Result, anyhow};

    use lane_dodger::sim::{Autopilot, GameEvent, Input, Session};
    use lane_dodger::{ControlMode, GameConfig, Leaderboard, LaunchOptions};

    /// Frame length fed to the session (ms)
    const FRAME_MS: u64 = 30;

    #[derive(Debug, Clone)]
    pub struct RunConfig {
        pub launch: LaunchOptions,
        pub seconds: u64,
        pub seed: Option<u64>,
        pub skill: f32,
        pub config_path: Option<String>,
        pub location: Option<(f64, f64)>,
    }

    impl Default for RunConfig {
        fn default() -> Self {
            Self {
                launch: LaunchOptions::default(),
                seconds: 120,
                seed: None,
                skill: 0.85,
                config_path: None,
                location: None,
            }
        }
    }

    impl RunConfig {
        /// Virtual time to play for
        pub fn total_ms(&self) -> u64 {
            self.seconds.saturating_mul(1000)
        }
    }

    pub fn parse_args(args: &[String]) -> Result<RunConfig> {
        let mut run = RunConfig::default();
        let mut mode: Option<String> = None;
        let mut speed: Option<String> = None;

        let mut i = 0usize;
        while i < args.len() {
            let flag = args[i].as_str();
            let mut value = || {
                i += 1;
                args.get(i)
                    .cloned()
                    .ok_or_else(|| anyhow!("missing value for {}", flag))
            };
            match flag {
                "--mode" => mode = Some(value()?),
                "--speed" => speed = Some(value()?),
                "--seconds" => {
                    let v = value()?;
                    run.seconds = v
                        .parse()
                        .map_err(|_| anyhow!("invalid --seconds value: {}", v))?;
                }
                "--seed" => {
                    let v = value()?;
                    run.seed = Some(v.parse().map_err(|_| anyhow!("invalid --seed value: {}", v))?);
                }
                "--skill" => {
                    let v = value()?;
                    run.skill = v
                        .parse()
                        .map_err(|_| anyhow!("invalid --skill value: {}", v))?;
                }
                "--config" => run.config_path = Some(value()?),
                "--location" => {
                    let v = value()?;
                    let (lat, lon) = v
                        .split_once(',')
                        .ok_or_else(|| anyhow!("--location expects LAT,LON, got {}", v))?;
                    let lat = lat.trim().parse().map_err(|_| anyhow!("invalid latitude: {}", lat))?;
                    let lon = lon.trim().parse().map_err(|_| anyhow!("invalid longitude: {}", lon))?;
                    run.location = Some((lat, lon));
                }
                other => return Err(anyhow!("unknown argument: {}", other)),
            }
            i += 1;
        }

        // Unknown mode/speed names fall back to buttons/slow
        run.launch = LaunchOptions::from_strs(mode.as_deref(), speed.as_deref());
        Ok(run)
    }

    fn load_config(run: &RunConfig) -> Result<GameConfig> {
        let mut config = match &run.config_path {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path))?;
                GameConfig::from_json(&json).with_context(|| format!("loading config {}", path))?
            }
            None => GameConfig::default(),
        };
        if let Some(seed) = run.seed {
            config.seed = seed;
        }
        Ok(config)
    }

    pub fn run(args: &[String]) -> Result<()> {
        let run = parse_args(args)?;
        let config = load_config(&run)?;
        let seed = config.seed;

        let mut session = Session::new(config, run.launch, Leaderboard::new());
        if let Some((lat, lon)) = run.location {
            session.handle(Input::LocationFix { lat, lon });
        }
        let mut pilot = Autopilot::new(seed ^ 0x5eed, run.skill);

        let mut games = 0u32;
        let total_ms = run.total_ms();
        while session.now_ms() < total_ms {
            if let Some(direction) = pilot.decide(&session) {
                for input in Autopilot::inputs_for(session.mode(), direction) {
                    session.handle(input);
                }
            }
            session.advance(FRAME_MS);

            for event in session.drain_events() {
                match event {
                    GameEvent::GameOver { score, rank, .. } => {
                        games += 1;
                        match rank {
                            Some(rank) => log::info!("Game {} over: {} (rank {})", games, score, rank),
                            None => log::info!("Game {} over: {}", games, score),
                        }
                    }
                    GameEvent::LifeLost { remaining } if remaining > 0 => {
                        log::info!("Ouch! Lives: {}", remaining);
                    }
                    other => log::trace!("{:?}", other),
                }
            }
        }

        let state = session.state();
        println!(
            "Ran {}s as {} ({} finished games). Current game: lives={} coins={} distance={}",
            run.seconds,
            session.variant(),
            games,
            state.lives,
            state.coins,
            state.distance
        );

        let variant = session.variant().to_string();
        let mode = session.mode();
        let board = session.into_leaderboard();
        println!("Top scores for {}:", variant);
        let scores = board.top_scores(&variant);
        if scores.is_empty() {
            println!("  (none)");
        }
        for (i, score) in scores.iter().enumerate() {
            println!("  {:2}. {}  @ {:.4},{:.4}", i + 1, score, score.lat, score.lon);
        }
        if mode == ControlMode::Sensors {
            log::debug!("Sensor games are ranked together regardless of speed");
        }
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Lane Dodger (headless) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    native::run(&args)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web host drives `lane_dodger::Session` directly
}
