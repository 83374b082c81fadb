#[tokio::main]
async fn main() {
    if let Err(e) = patientele::run().await {
        eprintln!("startup failed: {e}");
        std::process::exit(1);
    }
}
