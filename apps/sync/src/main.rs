#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vocab_sync::run().await
}
