use std::env;

use muon_yield::logging::init_tracing;
use muon_yield::{Model, Settings, StraightLineTransport};
use tracing::{error, warn};

/// Settings file read before positional arguments are applied.
const SETTINGS_ENV: &str = "MUON_YIELD_SETTINGS";

// usage: muon-yield [events] [spectrum_file]
fn main() {
    init_tracing();

    let mut settings = match env::var_os(SETTINGS_ENV) {
        Some(path) => Settings::from_json_file(&path).unwrap_or_else(|e| {
            warn!("{e}; using default settings");
            Settings::default()
        }),
        None => Settings::default(),
    };
    if let Err(e) = settings.apply_args(env::args_os().skip(1)) {
        warn!("{e}; running {} events", settings.events);
    }

    let mut model = match Model::new(settings) {
        Ok(model) => model,
        Err(e) => {
            error!("{e}");
            return;
        }
    };

    println!("Starting run with {} events...", model.settings.events);
    let report = model.run_seeded(&mut StraightLineTransport::default());
    print!("{report}");
}
