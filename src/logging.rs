use tracing_subscriber::EnvFilter;

/// RUST_LOG がないときのフィルタ
/// verbose なら admitted や woke up などモニタ内部のイベントも出す
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

pub fn init(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose))),
        )
        .with_thread_names(true)
        .init();
}
