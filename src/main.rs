#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    focus_study::run().await
}
