use anyhow::{Context, Result};
use clap::Parser;
use eve_launch_manager::app::App;
use eve_launch_manager::cli::Cli;
use eve_launch_manager::config::Config;
use eve_launch_manager::utils::{get_config_path, get_log_dir, APP_NAME};

/// Set up panic hook to restore terminal state on panic
fn setup_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Leave raw mode and the alternate screen so the message is readable
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

fn main() -> Result<()> {
    setup_panic_hook();

    let log_dir = get_log_dir();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {:?}", log_dir))?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_file_name = format!("{}.log", APP_NAME);
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    let config_path = get_config_path();
    let config = Config::load_or_create(&config_path)
        .with_context(|| format!("Failed to load settings from {:?}", config_path))?;

    let result = if cli.command.is_some() {
        cli.execute(&config)
    } else {
        eprintln!("Logs are being written to: {:?}", log_dir.join(&log_file_name));
        App::new(config).and_then(|mut app| app.run())
    };

    // Flush pending log lines before exiting
    drop(guard);

    result
}
