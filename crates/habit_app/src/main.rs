use habit_app::app::{run, AppConfig};

fn main() {
    tracing_subscriber::fmt::init();
    let mut config = AppConfig::from_env().unwrap_or_default();
    if let Some(path) = std::env::args().nth(1) {
        config = config.with_data_file(path);
    }
    if let Err(err) = run(config) {
        eprintln!("Failed to build habit agenda: {err:#}");
        std::process::exit(1);
    }
}
