use zkcard::cli::Cli;

#[tokio::main]
async fn main() {
    Cli::run().await;
}
