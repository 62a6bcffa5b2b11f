#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ballot_relay::server::run().await
}
