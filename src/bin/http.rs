#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use shift_coverage::{SchedulerConfig, Session, config, http_api, logging};

    logging::init();

    let addr = config::http_addr_from_env()?;
    let config = SchedulerConfig::from_env()?;
    let session = Session::from_config(&config)?;

    println!("shift-coverage HTTP API listening on http://{addr}");
    http_api::serve(addr, session).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
