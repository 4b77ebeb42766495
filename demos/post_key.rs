//! Uploads a new dataset using a project contributor key.

mod common;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use common::{prompt, push_sample_values, review, timestamped_title, CommonArgs};
use isense_client::Session;
use tracing::error;

#[derive(Parser, Debug)]
#[command(about = "Upload a sample dataset with a contributor key")]
struct Cli
{
    /// Values pushed per field
    #[arg(long, default_value_t = 10)]
    samples: usize,

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

    let project_id = prompt("Please set the project ID for this dataset: ")?;
    let key = prompt("Please set a contributor key for this project: ")?;
    let title = prompt("Please enter a title for the dataset: ")?;

    let mut session = Session::new(config)?;
    session.set_project_id(project_id);
    session.set_title(timestamped_title(&title));
    session.set_contributor_name("isense-client");
    session.set_contributor_key(key);

    session.load_schema()?;
    push_sample_values(&mut session, cli.samples);

    if !review(&mut session)? {
        return Ok(());
    }

    println!("Uploading...");
    let response = session.upload()?;
    match response.dataset_id() {
        Some(id) => println!("Created dataset {}", id),
        None => println!("Upload accepted (HTTP {})", response.status),
    }

    Ok(())
}
