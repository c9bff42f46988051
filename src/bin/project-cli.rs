use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "project-cli")]
#[command(about = "Management CLI for the project service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:4000")]
    url: String,

    /// Base path the API is mounted under
    #[arg(short, long, default_value = "/project/")]
    base_path: String,

    /// Sent as `internal-access-token`
    #[arg(short, long)]
    token: Option<String>,

    /// Sent as `x-user-id`
    #[arg(long)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service status
    Health,
    /// Call an API path such as `v1/tasks/list?page=2`
    Call {
        path: String,
        #[arg(short, long, default_value = "GET")]
        method: String,
        /// JSON request body
        #[arg(long)]
        body: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let url = cli.url.trim_end_matches('/');

    let mut headers = HeaderMap::new();
    if let Some(token) = &cli.token {
        headers.insert("internal-access-token", HeaderValue::from_str(token)?);
    }
    if let Some(user) = &cli.user {
        headers.insert("x-user-id", HeaderValue::from_str(user)?);
    }

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{url}/health")).send().await?;
            print_response(res).await?;
        }
        Commands::Call { path, method, body } => {
            let method = Method::from_bytes(method.to_uppercase().as_bytes())?;
            let base = cli.base_path.trim_matches('/');
            let path = path.trim_start_matches('/');
            let target = if base.is_empty() {
                format!("{url}/{path}")
            } else {
                format!("{url}/{base}/{path}")
            };
            let mut request = client.request(method, target).headers(headers);
            if let Some(body) = body {
                let json: Value = serde_json::from_str(&body)?;
                request = request
                    .header(CONTENT_TYPE, "application/json")
                    .body(serde_json::to_vec(&json)?);
            }
            print_response(request.send().await?).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
