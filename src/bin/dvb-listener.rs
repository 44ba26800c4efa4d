use clap::Parser;
use hermes::constants::{DEFAULT_REGION, PRODUCTION_WEBSOCKET_ENDPOINT};
use hermes::stream::{OutboundPayload, StreamClient, StreamConfig, SubscriptionFilter};
use hermes::types::Endpoint;

#[derive(Parser)]
#[command(version, about = "Subscribe to a vehicle stream and print every message", long_about = None)]
struct Args {
    /// WebSocket endpoint to connect to
    #[arg(short, long, default_value = PRODUCTION_WEBSOCKET_ENDPOINT)]
    endpoint: String,

    /// Region ids to subscribe to
    #[arg(short, long, value_delimiter = ',', default_values_t = [DEFAULT_REGION])]
    regions: Vec<u32>,

    /// Restrict the stream to these line numbers
    #[arg(short, long, value_delimiter = ',')]
    lines: Vec<u32>,

    /// Restrict the stream to these junction ids
    #[arg(short, long, value_delimiter = ',')]
    junctions: Vec<u32>,

    /// Send the plain text greeting instead of a subscription filter
    #[arg(long)]
    greet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let endpoint = Endpoint::parse(&args.endpoint)?;

    let initial_payload = if args.greet {
        OutboundPayload::greeting()
    } else {
        OutboundPayload::Subscribe(
            SubscriptionFilter::for_regions(args.regions)
                .with_lines(args.lines)
                .with_junctions(args.junctions),
        )
    };

    println!("Connecting to {}", endpoint);
    let client = StreamClient::new(StreamConfig {
        endpoint,
        initial_payload,
    })?;
    let mut session = client.connect().await?;
    println!("Connected, waiting for messages (Ctrl+C to stop)");

    session
        .receive_loop(|message| println!("{}", message))
        .await?;
    Ok(())
}
