#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pantrypal_server::start().await
}
