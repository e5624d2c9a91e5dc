mod configuration;
mod error;
mod feed_cache;
mod query_engine;
mod response;
mod shape;
mod trip_details;
mod web;
mod web_app_data;
mod web_cache;

use crate::configuration::Configuration;
use log::info;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Configuration::from_env()?;
    info!("Starting with {:?}", config);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(web::main(config))
}
