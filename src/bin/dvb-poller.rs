use clap::Parser;
use hermes::constants::PRODUCTION_API_ENDPOINT;
use hermes::network::NetworkClient;
use hermes::types::{Endpoint, Region};

#[derive(Parser)]
#[command(version, about = "Fetch a vehicle snapshot and dispatch one position request per vehicle", long_about = None)]
struct Args {
    /// HTTP API base to poll
    #[arg(short, long, default_value = PRODUCTION_API_ENDPOINT)]
    api: String,

    /// Region to poll, by name (e.g. dresden) or numeric id
    #[arg(short, long, default_value = "dresden")]
    region: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let api = Endpoint::parse(&args.api)?;
    let region = match args.region.parse::<u32>() {
        Ok(id) => Region::from_id(id),
        Err(_) => Region::from_name(&args.region)?,
    };

    println!("Polling {} for region {}", api, region);
    let client = NetworkClient::new(api, region)?;
    let dispatched = client.poll_and_dispatch().await?;
    println!("Dispatched {} position requests", dispatched);
    Ok(())
}
