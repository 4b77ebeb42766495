//! Fetches a project and lists its fields.

mod common;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use common::{prompt, CommonArgs};
use isense_client::Session;
use tracing::error;

#[derive(Parser, Debug)]
#[command(about = "List the fields of an iSENSE project")]
struct Cli
{
    /// Project ID; prompted for when omitted
    project_id: Option<String>,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> ExitCode
{
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()>
{
    let config = cli.common.init()?;

    let project_id = match cli.project_id {
        Some(id) => id,
        None => prompt("Please enter a project ID: ")?,
    };

    let mut session = Session::new(config)?;
    session.set_project_id(project_id);
    let project = session.load_schema()?;

    println!("Project: {}", project.name.as_deref().unwrap_or("(unnamed)"));
    println!("{:<10} {:<12} Name", "Field ID", "Type");
    for field in &project.fields {
        println!("{:<10} {:<12} {}", field.id, field.field_type.to_string(), field.name);
    }

    Ok(())
}
