fn main() {
    // Load .env file if present (credentials for local runs)
    // Silently ignore if not found - CI uses real env vars
    let _ = dotenvy::dotenv();

    if let Err(e) = scribe_harness::run() {
        log::error!("Smoke run failed: {}", e);
        eprintln!("Smoke run failed: {}", e);
        std::process::exit(1);
    }
}
