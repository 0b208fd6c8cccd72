use clap::{Parser, Subcommand};
use reqwest::StatusCode;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "shoplog-cli")]
#[command(about = "Inspect and manage a running shop request log", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List shops that have a log
    Shops,
    /// Print a shop's records as JSON
    Logs { shop: String },
    /// Delete a shop's log
    Clear { shop: String },
    /// Send a test request that gets logged for the shop
    Ping {
        shop: String,
        #[arg(short, long, default_value = "{\"ping\":true}")]
        body: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let res = build_request(&client, &cli.url, cli.command).send().await?;
    print_response(res).await
}

/// Map a subcommand onto the matching service route.
fn build_request(client: &reqwest::Client, url: &str, command: Commands) -> reqwest::RequestBuilder {
    let base = url.trim_end_matches('/');
    match command {
        Commands::Shops => client.get(format!("{base}/shops")),
        Commands::Logs { shop } => client.get(format!("{base}/shop/{shop}/logs.json")),
        Commands::Clear { shop } => client.delete(format!("{base}/shop/{shop}")),
        Commands::Ping { shop, body } => client
            .post(format!("{base}/shop/{shop}"))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body),
    }
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{text}"),
    }
    if status != StatusCode::OK {
        eprintln!("Request failed with status: {status}");
        std::process::exit(1);
    }
    Ok(())
}
