use tokio::net::TcpListener;

/// Serves the fixture API on `MOCK_ADDR` (default `127.0.0.1:3000`).
#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let addr = std::env::var("MOCK_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let listener = TcpListener::bind(&addr).await?;
    println!("mock JSON API listening on http://{}", listener.local_addr()?);
    mock_server::run(listener).await
}
