use csv::{ReaderBuilder, Trim};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

mod bank;

use bank::{Bank, Teller};

/// The size of the channel for processing instructions.
const CHANNEL_SIZE: usize = 100;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = std::env::args().collect::<Vec<_>>();
    if args.len() != 2 {
        eprintln!("Usage: {} <input_csv_file>", args[0]);
        std::process::exit(1);
    }
    let input_file = &args[1];

    let (sender, receiver) = mpsc::channel(CHANNEL_SIZE);
    let mut teller = Teller::new(Bank::new(), receiver);

    let handle = tokio::spawn(async move {
        teller.run().await;
        teller
    });

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(input_file)
        .expect("Failed to read CSV file");

    for instruction in reader.deserialize().flatten() {
        if let Err(err) = sender.send(instruction).await {
            tracing::error!("Error sending instruction: {err}");
        }
    }

    drop(sender); // Close the sender to signal no more instructions will be sent
    let teller = handle.await.expect("Failed to join the teller task");

    let mut writer = csv::Writer::from_writer(std::io::stdout());
    for account in teller.get_bank().get_accounts() {
        if let Err(err) = writer.serialize(account) {
            tracing::error!("Error writing account: {err}");
        }
    }
}
