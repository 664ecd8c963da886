//! Presencebox CLI
//!
//! Usage:
//!   presencebox                                 # Monitor stdin telemetry (default)
//!   presencebox --images a.png b.png            # Monitor and drive a slideshow
//!   presencebox --line "A: 4.10 cm | B: 2.50 cm" # Condition a single line
//!   presencebox --simulate --autoplay           # Run the device loop on synthetic sensors
//!   presencebox --line "B: 2.0" --json          # JSON output

use clap::Parser;
use colored::Colorize;
use tokio::io::BufReader;
use tokio::sync::mpsc;

use presencebox::config::TriggerMode;
use presencebox::core::{
    run_pipeline, DeviceLoop, PanelState, PipelineEvent, SignalConditioner, WaveSampler,
};
use presencebox::types::{ConditionerOutput, GameEvent, Region};
use presencebox::{Config, Result, CONTROL_TICK_MS, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "presencebox",
    version = VERSION,
    about = "Presencebox - presence-driven slideshow and sequence game",
    long_about = "Presencebox turns noisy ultrasonic distance readings into stable decisions.\n\n\
                  Modes:\n  \
                  --monitor   Read telemetry lines from stdin, emit Start/Stop (default)\n  \
                  --line      Condition one telemetry line\n  \
                  --simulate  Run the on-device loop against synthetic sensors\n\n\
                  Decisions:\n  \
                  START     - Hand held close long enough, slideshow runs\n  \
                  STOP      - Hand gone long enough, slideshow halts\n  \
                  NO_CHANGE - Nothing to do"
)]
struct Args {
    /// Read telemetry lines from stdin (default mode)
    #[arg(short, long)]
    monitor: bool,

    /// Condition a single telemetry line
    #[arg(short, long)]
    line: Option<String>,

    /// Run the on-device loop against synthetic sensors
    #[arg(short, long)]
    simulate: bool,

    /// Loop iterations for --simulate
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// In --simulate, press the expected button whenever the game waits
    #[arg(long)]
    autoplay: bool,

    /// JSON config file
    #[arg(short, long)]
    config: Option<String>,

    /// Slideshow images, shown in order
    #[arg(long, num_args = 1..)]
    images: Vec<String>,

    /// Telemetry field to watch (overrides config)
    #[arg(long)]
    label: Option<String>,

    /// Slide interval in milliseconds (overrides config)
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Button trigger mode (overrides config)
    #[arg(long, value_enum)]
    trigger: Option<TriggerMode>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Print every line, not just transitions
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let args = Args::parse();
    if args.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = run(args).await {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;

    if args.simulate {
        run_simulate(&args, &config);
        Ok(())
    } else if let (Some(line), false) = (&args.line, args.monitor) {
        run_single(line, &args, &config);
        Ok(())
    } else {
        run_monitor(&args, config).await
    }
}

/// Config file (if any) plus command-line overrides
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(label) = &args.label {
        config.conditioner.label = label.clone();
    }
    if let Some(ms) = args.interval_ms {
        config.slideshow.interval_ms = ms;
    }
    if let Some(trigger) = args.trigger {
        config.device.trigger = trigger;
    }
    config.validate()?;
    Ok(config)
}

/// Condition one line
fn run_single(line: &str, args: &Args, config: &Config) {
    let mut conditioner = SignalConditioner::new(&config.conditioner);
    let output = conditioner.ingest(line, 0);
    print_output(&output, args.json, args.no_color);
}

/// Stdin telemetry → conditioner → slideshow
async fn run_monitor(args: &Args, config: Config) -> Result<()> {
    if !args.json {
        print_header("Monitor");
    }
    println!(
        "Watching field {} (start < {} cm for {} ms, stop > {} cm for {} ms)",
        config.conditioner.label.bold(),
        config.conditioner.start_threshold_cm,
        config.conditioner.start_debounce_ms,
        config.conditioner.stop_threshold_cm,
        config.conditioner.stop_debounce_ms,
    );
    if args.images.is_empty() {
        println!("{}", "No --images given, slideshow stays inert".dimmed());
    }
    println!();

    let (tx, mut rx) = mpsc::unbounded_channel::<PipelineEvent<String>>();
    let json = args.json;
    let verbose = args.verbose;
    let no_color = args.no_color;
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                PipelineEvent::Output(output) => {
                    if verbose || json || output.decision.is_transition() {
                        print_output(&output, json, no_color);
                    }
                }
                PipelineEvent::Showing { index, image } => {
                    if !json {
                        println!("  {} [{}] {}", "▶".green(), index, image);
                    }
                }
                PipelineEvent::Cleared => {
                    if !json {
                        println!("  {}", "■ transport closed, screen cleared".dimmed());
                    }
                }
            }
        }
    });

    let reader = BufReader::new(tokio::io::stdin());
    let summary = run_pipeline(reader, config, args.images.clone(), tx).await?;
    let _ = printer.await;

    if !args.json {
        println!();
        println!(
            "Lines: {} ({} dropped) | Starts: {} | Stops: {} | Images shown: {}",
            summary.lines_seen,
            summary.lines_dropped,
            summary.starts,
            summary.stops,
            summary.images_shown
        );
    }
    Ok(())
}

/// Device loop against synthetic sensors
fn run_simulate(args: &Args, config: &Config) {
    if !args.json {
        print_header("Simulation");
    }

    // A drifts across the presence threshold, B stays mostly far with dropouts
    let sensor_a = WaveSampler::new(4000, 1.0, 8.0);
    let sensor_b = WaveSampler::new(7000, 2.0, 12.0).with_dropout(9);
    let mut device = DeviceLoop::new(&config.device, sensor_a, sensor_b);
    let mut panel = PanelState::new(device.channels(), config.device.region_pixels);
    device.boot(0);

    let mut buttons = vec![false; device.channels()];
    let mut pressed_last = false;
    for i in 0..args.ticks {
        let now = i * CONTROL_TICK_MS;

        buttons.iter_mut().for_each(|b| *b = false);
        // Release between presses so edge triggering sees each one
        if args.autoplay && !pressed_last && !device.scheduler().is_busy() {
            if let Some(note) = device.game().expected_note() {
                if let Some(b) = (note as usize).checked_sub(1).and_then(|i| buttons.get_mut(i)) {
                    *b = true;
                }
            }
        }
        pressed_last = buttons.iter().any(|b| *b);

        let report = device.tick_into(now, &buttons, &mut panel);
        if let Some(line) = &report.telemetry {
            if !args.json {
                println!("{:>7} ms  {}", now, line.cyan());
            }
        }
        for update in &report.game {
            if matches!(update.event, GameEvent::None | GameEvent::InputIgnored) {
                continue;
            }
            if args.json {
                match serde_json::to_string(&update.event) {
                    Ok(s) => println!("{}", s),
                    Err(e) => log::warn!("could not encode game event: {}", e),
                }
            } else if args.verbose || is_milestone(update.event) {
                println!("{:>7} ms  {:?} ({})", now, update.event, update.reason.code().yellow());
            }
        }
    }

    if !args.json {
        let game = device.game();
        println!();
        println!(
            "Level: {} | Wins: {} | Fails: {} | Region A lit: {} | Region B lit: {}",
            game.level(),
            game.wins(),
            game.fails(),
            !panel.is_dark(Region::A),
            !panel.is_dark(Region::B)
        );
    }
}

fn is_milestone(event: GameEvent) -> bool {
    matches!(
        event,
        GameEvent::LevelComplete { .. } | GameEvent::Failed | GameEvent::Won
    )
}

fn print_output(output: &ConditionerOutput, json: bool, no_color: bool) {
    if json {
        match serde_json::to_string(output) {
            Ok(s) => println!("{}", s),
            Err(e) => log::warn!("could not encode output: {}", e),
        }
    } else if no_color {
        println!("{}", output.to_parseable_string());
    } else {
        println!("{}", output.to_terminal_string());
    }
}

fn print_header(mode: &str) {
    println!("{}", "════════════════════════════════════════".bold());
    println!("{}", format!("  Presencebox v{} - {}", VERSION, mode).bold());
    println!("{}", "════════════════════════════════════════".bold());
    println!();
}
