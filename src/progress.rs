use indicatif::{ProgressBar, ProgressStyle};

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// A ticking spinner with `msg`, colored by an indicatif style name
/// ("blue", "green", ...).
pub fn spinner(color: &str, msg: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let template = format!("{{spinner:.{color}}} {{msg}}");
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(TICKS)
        .template(&template)
    {
        spinner.set_style(style);
    }
    spinner.set_message(msg.into());
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}

/// Init `env_logger` at `info` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
