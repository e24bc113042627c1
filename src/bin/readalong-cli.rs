use anyhow::{Context, Result, ensure};
use clap::Parser;

use std::fs::File;
use std::io::{self, BufWriter};
use std::time::Duration;

use readalong::clock::ManualClock;
use readalong::index::TimingIndex;
use readalong::json_lines_sink::JsonLinesSink;
use readalong::policy::DEFAULT_SYNC_POLICY;
use readalong::raw::parse_raw_words;
use readalong::resolver::resolve;
use readalong::session::SyncSession;
use readalong::update_sink::UpdateSink;

fn main() -> Result<()> {
    readalong::logging::init();
    let params = Params::parse();
    let policy = DEFAULT_SYNC_POLICY;

    let file = File::open(&params.words_path)
        .with_context(|| format!("failed to open words payload '{}'", params.words_path))?;
    let raw_words = parse_raw_words(file)?;
    let index = TimingIndex::build(&raw_words, &policy);

    let stdout = io::stdout();
    let writer = BufWriter::new(stdout.lock());
    let mut sink = JsonLinesSink::new(writer);

    if !params.at.is_empty() {
        // One-shot resolution: print the location for each requested time.
        for &time in &params.at {
            let location = resolve(time, &index, &policy);
            let update = readalong::session::SyncUpdate {
                location,
                scroll_to: None,
            };
            sink.emit(&update)?;
        }
        sink.close()?;
        return Ok(());
    }

    // Simulated tick loop: drive a full session through the transcript,
    // streaming every update. A manual clock keeps the run instantaneous
    // and reproducible (the arbitration windows advance with the ticks).
    ensure!(params.interval > 0.0, "--interval must be positive");
    let to = params.to.unwrap_or_else(|| index.duration_seconds());

    let clock = ManualClock::new();
    let mut session = SyncSession::with_clock(index, policy, clock.clone());
    let step = Duration::from_secs_f32(params.interval);

    let mut time = params.from;
    while time <= to {
        let update = session.on_playback_tick(time);
        sink.emit(&update)?;
        session.on_scroll_complete();
        clock.advance(step);
        time += params.interval;
    }

    sink.close()?;
    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "readalong")]
#[command(about = "Resolve transcript playback positions from a word-timing payload")]
struct Params {
    /// Path to the raw word-timing JSON payload (array of word records).
    #[arg(short = 'w', long = "words")]
    pub words_path: String,

    /// Resolve these playback times (seconds) and exit.
    #[arg(long = "at", value_delimiter = ',')]
    pub at: Vec<f32>,

    /// Simulated tick interval in seconds.
    #[arg(long = "interval", default_value_t = 0.25)]
    pub interval: f32,

    /// Start of the simulated playback range.
    #[arg(long = "from", default_value_t = 0.0)]
    pub from: f32,

    /// End of the simulated range (defaults to the transcript duration).
    #[arg(long = "to")]
    pub to: Option<f32>,
}
