// verity-server: serves the demo validation API
//
// Settings come from defaults, the file named by `VERITY_CONFIG`, `.env`
// and `VERITY_*` variables, in that order.

use std::path::PathBuf;
use verity::{Application, api};
use verity_config::ServerConfig;
use verity_log::Level;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    verity_log::init();

    let file = std::env::var_os("VERITY_CONFIG").map(PathBuf::from);
    let config = ServerConfig::load(file.as_deref())?;
    if let Some(level) = Level::parse(&config.log_level) {
        verity_log::set_level(level);
    }

    let addr = config.socket_addr()?;
    verity_log::info!(target: "verity::server", "starting verity-server on {}", addr);

    Application::new(api::router()).listen(addr).await?;
    Ok(())
}
