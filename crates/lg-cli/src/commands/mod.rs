pub mod config;
pub mod simulate;

use std::path::Path;

use lg_simulation::SimConfig;

/// Load the configuration at `path`, or the defaults when none is given.
fn load_config(path: Option<&Path>) -> Result<SimConfig, String> {
    match path {
        Some(path) => SimConfig::load(path).map_err(|e| e.to_string()),
        None => Ok(SimConfig::default()),
    }
}
