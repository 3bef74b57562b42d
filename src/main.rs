use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    tutor::run().await
}
