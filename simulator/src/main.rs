use anyhow::Context;
use anyhow::bail;
use clap::Parser;
use generator::profile::build_dataset;
use std::process;
use std::time::Instant;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod workflow;

#[derive(Parser, Debug)]
#[command(
    about = "Beam a synthetic sensor array and scan it for onsets",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Args {
    /// Total thread budget; one thread stays with the caller
    #[arg(short = 't', value_name = "N", allow_hyphen_values = true)]
    threads: String,
}

/// Accepts exactly `-t <N>` as two separate arguments.
fn parse_args<I, T>(argv: I) -> anyhow::Result<Args>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
    if argv.len() != 3 {
        bail!(
            "expected 2 arguments, received {}",
            argv.len().saturating_sub(1)
        );
    }
    if argv[1] != "-t" {
        bail!("unexpected argument: {}", argv[1]);
    }
    Ok(Args::try_parse_from(argv)?)
}

/// Reads a leading integer the way C's `atoi` does; anything else is 0.
fn parse_thread_budget(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end]
        .parse::<i64>()
        .map(|value| sign * value)
        .unwrap_or(0)
}

/// Workers handed to the beamformer once the caller's thread is reserved.
fn worker_count(budget: i64) -> usize {
    budget.saturating_sub(1).max(0) as usize
}

fn main() {
    env_logger::init();
    let args = match parse_args(std::env::args()) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("Failed: {}", err);
            process::exit(1);
        }
    };

    if let Err(err) = run(&args) {
        eprintln!("Failed: {:#}", err);
        process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let workers = worker_count(parse_thread_budget(&args.threads));
    let config = WorkflowConfig::from_env()?;
    let dataset = build_dataset(&config.generator).context("generating sensor array")?;

    let epoch = dataset.epoch();
    println!(
        "StartTime: {:.6}, EndTime: {:.6}, Length: {:.6}, SampleCount: {}",
        epoch.start,
        epoch.end,
        epoch.length(),
        dataset.sample_count()
    );

    let started = Instant::now();
    let runner = Runner::new(config);
    let report = runner.execute(&dataset, workers)?;
    let elapsed = started.elapsed();

    println!(
        "Beam start: {:.6}, Beam end: {:.6}, length: {:.6}",
        report.window.beam_start,
        report.window.beam_end,
        report.window.duration()
    );
    println!(
        "Beam samples: {} from {} sensors on {} workers",
        report.beam_length,
        dataset.sensor_count(),
        report.workers
    );
    for summary in [&report.coherent, &report.incoherent] {
        println!(
            "{} beam -> max {:.6}, average {:.6}, rms {:.6}",
            summary.kind, summary.max, summary.average, summary.rms
        );
    }
    let timings = report.onset_times.iter().zip(&report.end_times);
    for (event, (onset, ended)) in report.detection.events.iter().zip(timings) {
        match (event.end, ended) {
            (Some(end), Some(ended)) => println!(
                "Signal found starting at: {} ({:.3}), ended at: {} ({:.3})",
                event.start, onset, end, ended
            ),
            _ => println!(
                "Signal found starting at: {} ({:.3}), still open at end of beam",
                event.start, onset
            ),
        }
    }
    println!(
        "Detections on {} beam: {}",
        report.detected_on, report.detection.count
    );

    let micros = elapsed.as_micros();
    println!(
        "Total run time: {} us ({:.6} s)",
        micros,
        elapsed.as_secs_f64()
    );
    println!(
        "{}",
        serde_json::to_string(&report).context("serialising run report")?
    );

    Ok(())
}
