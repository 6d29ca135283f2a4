#[tokio::main]
async fn main() -> Result<(), kagi::provider::error::Error> {
    kagi::provider::main().await
}
