mod dump;

use std::io;
use std::time::Duration;

use clap::Parser;

use touch_synth::config::{Cli, Command, Config};
use touch_synth::format::BatchWriter;
use touch_synth::input::DeviceSource;
use touch_synth::{FrameDriver, GestureEngine, Timestamp};

const POLL_TIMEOUT: Duration = Duration::from_millis(500);

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    let default_filter = match cli.command {
        Some(Command::Dump { .. }) => "warn",
        None => "info",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let config = match Config::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    if let Some(Command::Dump { count }) = cli.command {
        return dump::run_dump(&config, count);
    }

    log::info!(
        "touch-synth starting (device={}, profile={}, screen={}x{}, axes={}x{}, max_fingers={}, filter={}, format={})",
        config.device,
        config.profile.name,
        config.screen_width,
        config.screen_height,
        config.x_max,
        config.y_max,
        config.max_fingers,
        if config.position_filter { "on" } else { "off" },
        config.format
    );

    run(&config)
}

fn run(config: &Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let source = DeviceSource::open(config.device_path(), config.layout)?;
    let engine = GestureEngine::new(config.gesture_settings())?;
    let mut driver = FrameDriver::new(source, engine, config.scaling()?, config.max_events_per_call);
    let mut writer = BatchWriter::new(io::stdout().lock(), config.format, config.layout);

    loop {
        if !driver.source().wait_ready(POLL_TIMEOUT)? {
            continue;
        }
        if let Some(batch) = driver.process_ready(Timestamp::now())? {
            writer.write_batch(&batch)?;
        }
    }
}
