#[tokio::main]
async fn main() {
    if let Err(error) = daystack::run().await {
        eprintln!("failed to launch daystack: {error}");
        std::process::exit(1);
    }
}
