use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the global logger. `RUST_LOG` wins when set.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);
    let _ = builder.try_init();
}
