//! Catch Snowflake entry point
//!
//! The browser build is driven from JavaScript through the library's
//! `WasmGame` bindings. Natively this binary plays one headless round with
//! the autopilot and records the result on a JSON leaderboard.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use clap::Parser;

    use catch_snowflake::highscores::format_age;
    use catch_snowflake::platform::{Autopilot, FileStore, now_ms};
    use catch_snowflake::renderer::LogRenderer;
    use catch_snowflake::{Session, Tuning};

    #[derive(Parser, Debug)]
    #[command(name = "catch-snowflake", about = "Headless Catch Snowflake round")]
    pub struct Args {
        /// RNG seed for snowflake spawning
        #[arg(long)]
        seed: Option<u64>,

        /// Sixty second round with five misses instead of three lives
        #[arg(long)]
        timed: bool,

        /// Tuning file (JSON); overrides --timed
        #[arg(long)]
        config: Option<PathBuf>,

        /// Leaderboard file
        #[arg(long, default_value = "highscores.json")]
        scores: PathBuf,

        /// Another leaderboard file to merge into --scores before playing
        #[arg(long)]
        import: Option<PathBuf>,

        /// Name to record if the score qualifies
        #[arg(long, default_value = "Autopilot")]
        name: String,

        /// Simulation frames per second
        #[arg(long, default_value_t = 60)]
        fps: u32,

        /// Give up after this many simulated seconds
        #[arg(long, default_value_t = 600)]
        max_seconds: u32,
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let args = Args::parse();

        let mut tuning = match &args.config {
            Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
            None if args.timed => Tuning::timed(),
            None => Tuning::default(),
        };
        if let Some(seed) = args.seed {
            tuning.seed = seed;
        }

        let mut session = Session::new(
            tuning,
            Autopilot,
            Box::new(LogRenderer::new(args.fps.max(1))),
            Box::new(FileStore::new(args.scores.clone())),
        )?;

        if let Some(path) = &args.import {
            if session.import_scores(&FileStore::new(path.clone())) {
                println!("Merged high scores from {}", path.display());
            }
        }

        log::info!("Catch Snowflake (native) starting...");
        session.start();

        let dt = 1.0 / args.fps.max(1) as f32;
        let max_frames = args.max_seconds as u64 * args.fps.max(1) as u64;
        let mut frames = 0u64;
        while session.engine().is_running() && frames < max_frames {
            session.step(dt);
            frames += 1;
        }
        if session.engine().is_running() {
            log::warn!("Giving up after {} simulated seconds", args.max_seconds);
            session.stop();
        }

        if let Some(result) = session.last_result() {
            println!(
                "Round over ({:?}) after {:.1}s: {} snowflakes caught",
                result.reason,
                session.engine().state().elapsed,
                result.score
            );
        }

        if session.qualifies() {
            if let Some(rank) = session.submit_score(&args.name) {
                println!("New high score! Rank #{}", rank);
            }
        } else if let Some(rank) = session
            .last_result()
            .and_then(|r| session.high_scores().rank_of(r.score))
        {
            println!("Same score as rank #{} on the board", rank);
        }

        let now = now_ms();
        println!("\nHigh scores:");
        for (i, entry) in session.high_scores().entries.iter().enumerate() {
            println!(
                "{:>2}. {:<16} {:>5}  {}",
                i + 1,
                entry.name,
                entry.score,
                format_age(now, entry.timestamp)
            );
        }

        session.shutdown();
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(e) = native::run() {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is the library's wasm_start, this is just to satisfy the compiler
}
