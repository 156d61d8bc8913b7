use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::json;

use org_routes::organization::{url_patterns, OrganizationDirectory};
use org_routes::routing::Params;

#[derive(Parser)]
#[command(name = "routes-cli")]
#[command(about = "Inspect the organization route table", long_about = None)]
struct Cli {
    /// Mount prefix prepended to reversed paths.
    #[arg(short, long, default_value = "organization/")]
    prefix: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List routes in match order
    List,
    /// Show which route a relative path resolves to
    Resolve {
        /// Path relative to the mount prefix, e.g. "org/42/"
        path: String,
    },
    /// Build the path for a named route
    Reverse {
        /// Route name, e.g. "organization_detail"
        name: String,
        /// Capture values as key=value
        #[arg(short = 'p', long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got {:?}", raw))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let table = url_patterns(Arc::new(OrganizationDirectory::new()))?;

    let output = match cli.command {
        Commands::List => {
            let routes: Vec<_> = table
                .routes()
                .map(|r| {
                    json!({
                        "name": r.name(),
                        "pattern": r.pattern().as_str(),
                        "handler": r.handler().name(),
                    })
                })
                .collect();
            json!(routes)
        }
        Commands::Resolve { path } => {
            let path = path.trim_start_matches('/');
            let resolved = table.resolve(path)?;
            json!({
                "name": resolved.name(),
                "pattern": resolved.route.pattern().as_str(),
                "handler": resolved.handler().name(),
                "params": resolved.params,
            })
        }
        Commands::Reverse { name, params } => {
            let params = params
                .into_iter()
                .fold(Params::new(), |acc, (k, v)| acc.with(k, v));
            let relative = table.reverse(&name, &params)?;
            json!({
                "name": name,
                "path": format!("/{}{}", cli.prefix, relative),
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
