use std::{env, io};

use log::info;
use tokio::signal;

use worker::{WorkerConfig, WorkerService};

#[tokio::main]
async fn main() -> io::Result<()> {
    env_logger::init();

    let config = WorkerConfig::from_env(env::args().nth(1))?;
    let service = WorkerService::bind(config).await?;

    service
        .run_until(async {
            if signal::ctrl_c().await.is_ok() {
                info!("received SIGINT");
            }
        })
        .await
}
