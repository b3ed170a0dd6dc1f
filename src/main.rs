#[tokio::main]
async fn main() -> anyhow::Result<()> {
    barterbrain::run().await
}
