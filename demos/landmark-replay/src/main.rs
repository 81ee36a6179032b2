//! Replay a recorded landmark stream through the exercise tracker.
//!
//! Usage: landmark-replay <recording.jsonl> [config.json]
//!
//! Each input line is one frame:
//! `{"t_ms": 1033, "landmarks": [[x, y], [x, y, visibility], ...]}`
//! An empty or missing `landmarks` array is a frame with no detected pose.
//! Events are printed to stdout as JSON lines, followed by a summary.

use std::env;
use std::fs::File;
use std::io::{BufRead, BufReader};

use repsense_core::FrameTime;
use repsense_runtime::{init_logging, ExerciseTracker, Landmark, LogFormat, RuntimeConfig};
use repsense_time::ManualClock;
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct RecordedFrame {
    t_ms: u64,
    #[serde(default)]
    landmarks: Vec<Vec<f32>>,
}

impl RecordedFrame {
    fn landmarks(&self) -> Result<Vec<Landmark>, String> {
        self.landmarks
            .iter()
            .map(|values| match values.as_slice() {
                [x, y] => Ok(Landmark::new(*x, *y)),
                [x, y, v] => Ok(Landmark::with_visibility(*x, *y, *v)),
                other => Err(format!("landmark needs 2 or 3 values, got {}", other.len())),
            })
            .collect()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LogFormat::Plain);

    let args: Vec<String> = env::args().collect();
    let Some(recording) = args.get(1) else {
        let program = args.first().map(String::as_str).unwrap_or("landmark-replay");
        eprintln!("usage: {} <recording.jsonl> [config.json]", program);
        std::process::exit(2);
    };

    let config = match args.get(2) {
        Some(path) => RuntimeConfig::load(path)?,
        None => RuntimeConfig::default(),
    };
    info!(side = ?config.body_side, min_visibility = config.min_visibility, "loaded configuration");

    let clock = ManualClock::new();
    let mut tracker = ExerciseTracker::try_with_clock(config, clock.clone())?;

    let reader = BufReader::new(File::open(recording)?);
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let frame: RecordedFrame = match serde_json::from_str(&line) {
            Ok(frame) => frame,
            Err(err) => {
                warn!(line = line_no + 1, error = %err, "skipping unparseable line");
                continue;
            }
        };

        let now = FrameTime::from_millis(frame.t_ms);
        if clock.set(now) != now {
            warn!(line = line_no + 1, t_ms = frame.t_ms, "timestamp went backwards, holding clock");
        }

        let events = if frame.landmarks.is_empty() {
            tracker.process_lost_pose()
        } else {
            let landmarks = match frame.landmarks() {
                Ok(landmarks) => landmarks,
                Err(err) => {
                    warn!(line = line_no + 1, error = %err, "skipping malformed frame");
                    continue;
                }
            };
            match tracker.process_landmarks(&landmarks) {
                Ok(events) => events,
                Err(_) => continue,
            }
        };

        for event in events {
            println!("{}", serde_json::to_string(&event)?);
        }
    }

    let stats = tracker.stats();
    info!(
        frames = stats.frames_processed,
        rejected = stats.frames_rejected,
        low_visibility = stats.frames_low_visibility,
        lost_pose = stats.frames_lost_pose,
        "replay finished"
    );
    println!(
        "repetitions: {}, plank sessions: {}, best plank: {}s",
        stats.repetitions, stats.plank_sessions_started, stats.best_plank_seconds
    );

    Ok(())
}
