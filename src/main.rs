#[macro_use]
extern crate log;

use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::process;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{spawn, JoinHandle};

use chrono::Local;
use getopts::{Matches, Options};
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

use compass_rust::compass_state::CompassState;
use compass_rust::display::render;
use compass_rust::heading_filter::FilterKind;
use compass_rust::maps_link::MapsLink;
use compass_rust::settings::{default_settings_path, Settings};
use compass_rust::telemetry::Language;
use compass_rust::telemetry_message::TelemetryMessage;
use compass_rust::telemetry_provider::TelemetryProvider;

const DEFAULT_GEO_LABEL: &str = "My location";


fn main() {
    let (opts, matches) = match handle_opts() {
        Some(parsed) => parsed,
        None => return,
    };
    debug!("Starting up");

    let command = match matches.free.first() {
        Some(command) => command.clone(),
        None => {
            print_usage(&opts);
            process::exit(2);
        }
    };

    let result = match command.as_str() {
        "maps" => run_maps(&matches),
        "replay" => run_replay(&matches),
        "settings" => run_settings(&matches),
        _ => {
            error!("Unknown command: {}", command);
            print_usage(&opts);
            process::exit(2);
        }
    };
    match result {
        Ok(_) => (),
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}


/**
 * Parses a coordinate pair from metadata strings, prints the map links and
 * optionally opens the web one.
 */
fn run_maps(matches: &Matches) -> Result<(), Box<dyn Error>> {
    let latitude = matches.opt_str("lat");
    let latitude_ref = matches.opt_str("lat-ref");
    let longitude = matches.opt_str("lon");
    let longitude_ref = matches.opt_str("lon-ref");
    let link = match MapsLink::from_coordinates(
        latitude.as_deref(),
        latitude_ref.as_deref(),
        longitude.as_deref(),
        longitude_ref.as_deref(),
    ) {
        Some(link) => link,
        None => {
            return Err("GPS coordinates are missing or could not be converted".into());
        }
    };

    let label = matches
        .opt_str("label")
        .unwrap_or_else(|| DEFAULT_GEO_LABEL.to_string());
    println!("{}", link.web_url());
    println!("{}", link.geo_uri(&label));

    if matches.opt_present("open") {
        link.open()?;
    }
    Ok(())
}


/**
 * Replays recorded telemetry through the compass state and prints frames.
 */
fn run_replay(matches: &Matches) -> Result<(), Box<dyn Error>> {
    let settings = Settings::load(&settings_path(matches))?;
    let language = settings.resolved_language();

    let kind = match matches.opt_str("filter") {
        Some(name) => FilterKind::from_name(&name)?,
        None => FilterKind::Exponential,
    };
    let parameter = match matches.opt_str("filter-parameter") {
        Some(value) => match value.parse::<f32>() {
            Ok(parameter) => Some(parameter),
            Err(e) => return Err(format!("Invalid filter parameter '{}': {}", value, e).into()),
        },
        None => None,
    };
    let mut state = CompassState::new(kind.build(parameter)?);
    info!("Replaying with {:?} heading filter", kind);

    let reader: Box<dyn BufRead + Send> = match matches.free.get(1) {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(BufReader::new(io::stdin())),
    };
    let (telemetry_message_tx, telemetry_message_rx) = channel();
    let provider_handle = spawn_telemetry_provider(reader, telemetry_message_tx);

    let follow = matches.opt_present("follow");
    consume_telemetry(&mut state, telemetry_message_rx, |state| {
        if follow {
            print_frame(state, &settings, language);
        }
    });

    match provider_handle.join() {
        Ok(_) => (),
        Err(_) => error!("Unable to join thread, child thread panicked"),
    }
    if !follow {
        print_frame(&state, &settings, language);
    }
    info!("Applied {} telemetry messages", state.messages_applied());
    Ok(())
}


/**
 * Shows the settings, applying any updates first.
 */
fn run_settings(matches: &Matches) -> Result<(), Box<dyn Error>> {
    let path = settings_path(matches);
    let mut settings = Settings::load(&path)?;

    let updates = matches.opt_strs("set");
    let next_theme = matches.opt_present("next-theme");
    for update in &updates {
        let mut parts = update.splitn(2, '=');
        match (parts.next(), parts.next()) {
            (Some(key), Some(value)) => settings.set(key.trim(), value)?,
            _ => return Err(format!("Expected key=value, got '{}'", update).into()),
        }
    }
    if next_theme {
        settings.theme_mode = settings.theme_mode.next();
    }
    if !updates.is_empty() || next_theme {
        settings.save(&path)?;
        info!("Saved settings to {}", path.display());
    }

    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}


/**
 * Applies every message to the state until the provider hangs up. The state,
 * and the heading filter inside it, is only ever touched from this loop.
 */
fn consume_telemetry<F>(
    state: &mut CompassState,
    telemetry_message_rx: Receiver<TelemetryMessage>,
    mut on_update: F,
) where
    F: FnMut(&CompassState),
{
    for message in telemetry_message_rx {
        state.apply(&message);
        if let TelemetryMessage::Compass { azimuth } = message {
            debug!("Raw azimuth {:.1}, smoothed {:?}", azimuth, state.azimuth());
        }
        on_update(state);
    }
}


fn spawn_telemetry_provider(
    reader: Box<dyn BufRead + Send>,
    telemetry_message_tx: Sender<TelemetryMessage>,
) -> JoinHandle<usize> {
    spawn(move || {
        let mut provider = TelemetryProvider::new(reader, telemetry_message_tx);
        provider.run()
    })
}


fn print_frame(state: &CompassState, settings: &Settings, language: Language) {
    for line in render(state, settings, language, Local::now().naive_local()) {
        println!("{}", line);
    }
    println!();
}


fn settings_path(matches: &Matches) -> PathBuf {
    match matches.opt_str("config") {
        Some(path) => PathBuf::from(path),
        None => default_settings_path(),
    }
}


fn handle_opts() -> Option<(Options, Matches)> {
    let mut opts = Options::new();
    opts.optflag("v", "verbose", "Prints extra logging.");
    opts.optflag("h", "help", "Print this help menu.");
    opts.optopt("c", "config", "Settings file.", "PATH");
    opts.optopt("", "log-file", "Also write logs to this file.", "PATH");
    opts.optopt("", "lat", "Latitude, e.g. 48°19'51.5\" (maps).", "COORDINATE");
    opts.optopt("", "lat-ref", "Latitude reference, N or S (maps).", "REF");
    opts.optopt("", "lon", "Longitude, e.g. 14,272329 (maps).", "COORDINATE");
    opts.optopt("", "lon-ref", "Longitude reference, E or W (maps).", "REF");
    opts.optopt("", "label", "Pin label for the geo: URI (maps).", "TEXT");
    opts.optflag("", "open", "Open the map in the browser (maps).");
    opts.optopt("", "filter", "Heading filter: exponential or step (replay).", "NAME");
    opts.optopt(
        "",
        "filter-parameter",
        "Retention for exponential, step fraction for step (replay).",
        "VALUE");
    opts.optflag("", "follow", "Print a frame after every message (replay).");
    opts.optmulti("", "set", "Change a setting (settings).", "KEY=VALUE");
    opts.optflag("", "next-theme", "Switch to the next theme (settings).");

    let mut args = std::env::args();
    args.next(); // Skip the program name
    let matches = match opts.parse(args) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Unable to parse options: {}", e);
            print_usage(&opts);
            process::exit(2);
        }
    };
    if matches.opt_present("h") {
        print_usage(&opts);
        return None;
    }

    let level = if matches.opt_present("v") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(TermLogger::new(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto));
    if let Some(path) = matches.opt_str("log-file") {
        match File::create(&path) {
            Ok(file) => loggers.push(WriteLogger::new(LevelFilter::Debug, Config::default(), file)),
            Err(e) => eprintln!("Unable to open log file {}: {}", path, e),
        }
    }
    match CombinedLogger::init(loggers) {
        Ok(_) => (),
        Err(e) => eprintln!("Unable to initialize logger: {}", e),
    };
    Some((opts, matches))
}


fn print_usage(opts: &Options) {
    let brief = "Usage: compass-rust [options] maps|replay [FILE]|settings";
    print!("{}", opts.usage(brief));
}
