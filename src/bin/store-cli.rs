use clap::{Parser, Subcommand};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "store-cli")]
#[command(about = "Management CLI for the config store", long_about = None)]
struct Cli {
    #[arg(short, long, env = "CONFIG_STORE_URL", default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every config
    List,
    /// Show one config
    Get { name: String },
    /// Create or overwrite a config from a JSON record
    Create { json: String },
    /// Replace the config stored under NAME
    Update { name: String, json: String },
    /// Delete a config
    Delete { name: String },
    /// Search, e.g. `metadata.limits.cpu=1`
    Search { expression: String },
    /// Check service status
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = match cli.command {
        Commands::List => client.get(format!("{}/configs", base)),
        Commands::Get { name } => client.get(format!("{}/configs/{}", base, name)),
        Commands::Create { json } => {
            // Reject malformed JSON before sending.
            serde_json::from_str::<Value>(&json)?;
            client
                .post(format!("{}/configs", base))
                .header(CONTENT_TYPE, "application/json")
                .body(json)
        }
        Commands::Update { name, json } => {
            serde_json::from_str::<Value>(&json)?;
            client
                .put(format!("{}/configs/{}", base, name))
                .header(CONTENT_TYPE, "application/json")
                .body(json)
        }
        Commands::Delete { name } => client.delete(format!("{}/configs/{}", base, name)),
        Commands::Search { expression } => client.get(format!("{}/search?{}", base, expression)),
        Commands::Status => client.get(format!("{}/status", base)),
    };

    let res = request.send().await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: config store returned status {}", status);
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    if text.is_empty() {
        println!("ok");
        return Ok(());
    }

    let json: Value = serde_json::from_str(&text)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
