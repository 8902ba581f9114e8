use log::{error, info};
use service::{config::Config, logging::Logger};

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config);

    info!(
        "Resolving overlaps in {} using segments {}...",
        config.ctm_edits_in().display(),
        config.segments().display()
    );

    if let Err(e) = domain::run(&config).await {
        error!("{e}");
        std::process::exit(1);
    }
}
