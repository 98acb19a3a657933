/// Initializes `env_logger`: debug output with `--verbose`, warnings otherwise.
/// `RUST_LOG` still overrides the level when set.
pub fn init_logger(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .parse_default_env()
        .init();
}
