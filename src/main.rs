fn main() {
    if let Err(err) = charging_sessions::app::run() {
        eprintln!("application startup failed: {err}");
        std::process::exit(1);
    }
}
