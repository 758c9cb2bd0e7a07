use std::path::Path;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use log::{debug, error, info, LevelFilter};
use rand::Rng;

use petcare::{sim::random_session, Config};

const CONFIG_FILE: &str = "petcare.ron";
const SESSION_STEPS: usize = 1000;

fn load_config() -> Config {
    let path = Path::new(CONFIG_FILE);
    if path.exists() {
        match Config::load(path) {
            Ok(c) => c,
            Err(e) => {
                error!("{}; using the default config", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    }
}

/// Plays random sessions until Ctrl-C, reporting the strongest pet seen
fn soak(config: &Config) {
    let exit_flag = Arc::new(AtomicBool::new(false));
    let exit_flag_copy = exit_flag.clone();
    ctrlc::set_handler(move || exit_flag_copy.store(true, Ordering::Release))
        .expect("Failed to install Ctrl-C handler");

    let mut best = 0;
    let mut sessions = 0u64;
    while !exit_flag.load(Ordering::Acquire) {
        let seed = rand::thread_rng().gen();
        match random_session(config, seed, SESSION_STEPS) {
            Ok(engine) => {
                let top = engine.pets().map(|p| p.level()).max().unwrap_or(0);
                if top > best {
                    best = top;
                    debug!("New best level {} [{}]:\n{}", best, seed, engine);
                }
            }
            Err(e) => {
                error!("Invariant violated [{}]: {}", seed, e);
                break;
            }
        }
        sessions += 1;
        if sessions % 1000 == 0 {
            debug!("{} sessions [best level {}]", sessions, best);
        }
    }
    info!("Played {} sessions; best level reached was {}", sessions, best);
}

fn main() {
    use env_logger::Builder;

    let mut log = Builder::new();

    let args = std::env::args();
    match args.len() {
        1 => {
            log.filter_level(LevelFilter::Debug);
            log.parse_env("RUST_LOG");
            log.init();

            soak(&load_config());
        }
        2 => {
            // A single seeded session prints its full trace by default
            log.filter_level(LevelFilter::Trace);
            log.parse_env("RUST_LOG");
            log.init();

            let seed = args.last().unwrap().parse().expect("Seed must be a u64");
            match random_session(&load_config(), seed, SESSION_STEPS) {
                Ok(engine) => println!("{}", engine),
                Err(e) => error!("Invariant violated [{}]: {}", seed, e),
            }
        }
        i => {
            panic!("Invalid argument count {}", i);
        }
    }
}
