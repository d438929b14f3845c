use std::path::Path;

use lg_simulation::SimConfig;

pub fn run(output: Option<&Path>) -> Result<(), String> {
    let json = SimConfig::default()
        .to_json_pretty()
        .map_err(|e| format!("JSON serialization error: {e}"))?;

    if let Some(path) = output {
        std::fs::write(path, format!("{json}\n"))
            .map_err(|e| format!("cannot write to {}: {e}", path.display()))?;
        println!("  Wrote default configuration to {}", path.display());
    } else {
        println!("{json}");
    }

    Ok(())
}
