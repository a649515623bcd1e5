#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ironlog::run().await
}
