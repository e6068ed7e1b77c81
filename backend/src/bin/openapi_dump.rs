//! Print the OpenAPI document as JSON, or YAML with `--yaml`.

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use lunchlog::ApiDoc;
use utoipa::OpenApi;

#[derive(Debug, Parser)]
#[command(name = "openapi-dump", about = "Print the Lunchlog OpenAPI document")]
struct Args {
    /// Emit YAML instead of pretty-printed JSON.
    #[arg(long)]
    yaml: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    let doc = ApiDoc::openapi();
    let rendered = if args.yaml {
        doc.to_yaml().wrap_err("failed to render OpenAPI document as YAML")?
    } else {
        doc.to_pretty_json()
            .wrap_err("failed to render OpenAPI document as JSON")?
    };
    println!("{rendered}");
    Ok(())
}
