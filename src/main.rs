use anyhow::{bail, Result};
use tracing_subscriber::EnvFilter;

use rep_coach::config::Config;
use rep_coach::exercise::Exercise;
use rep_coach::replay::load_frames;
use rep_coach::session::Coach;

const CONFIG_PATH: &str = "config.toml";

fn usage() -> String {
    let exercises = Exercise::ALL.map(|e| e.name()).join("|");
    format!("Usage: rep-coach <recording.jsonl> [{}] [--json]", exercises)
}

fn main() -> Result<()> {
    let config = Config::load_or_default(CONFIG_PATH);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.app.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut json = false;
    let mut positional = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            "-h" | "--help" => {
                println!("{}", usage());
                return Ok(());
            }
            _ => positional.push(arg),
        }
    }

    let recording = match positional.first() {
        Some(path) => path.clone(),
        None => bail!(usage()),
    };
    let exercise = match positional.get(1) {
        Some(name) => name.parse::<Exercise>()?,
        None => config.app.exercise,
    };

    let frames = load_frames(&recording)?;
    let mut coach = Coach::from_config(&config);

    if !json {
        println!("Rep Coach ({})", env!("GIT_VERSION"));
        println!("Recording: {} ({} frames)", recording, frames.len());
        println!("Exercise: {}", exercise);
        println!();
    }

    let mut skipped = 0usize;
    let mut last_line = String::new();

    for (i, frame) in frames.iter().enumerate() {
        let report = match coach.process_frame(exercise, frame.as_ref()) {
            Some(r) => r,
            None => {
                skipped += 1;
                continue;
            }
        };

        if json {
            println!("{}", serde_json::to_string(&report)?);
            continue;
        }

        // 変化があったときだけ表示
        let line = match report.phase {
            Some(phase) => format!("reps={} phase={} | {}", report.reps, phase.name(), report.message),
            None => report.message.clone(),
        };
        if line != last_line {
            println!("[{:>5}] {}", i, line);
            last_line = line;
        }
    }

    let session = coach.session();
    tracing::info!(frames = frames.len(), skipped, "replay finished");
    if !json {
        println!();
        println!("Frames: {} (skipped {})", frames.len(), skipped);
        if exercise.counts_reps() {
            println!("{} reps: {}", exercise, session.rep_count(exercise));
        }
        if let Some(feedback) = coach.last_feedback() {
            println!("Last note: {}", feedback);
        }
        for (joint, degrees) in session.angles.iter() {
            println!("  {:<14} {:>3}°", joint.name(), degrees);
        }
    }

    Ok(())
}
