//! Appends data to an existing dataset, chosen by dataset ID.

mod common;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use common::{prompt, push_sample_values, review, CommonArgs};
use isense_client::Session;
use tracing::error;

#[derive(Parser, Debug)]
#[command(about = "Append sample values to an existing dataset")]
struct Cli
{
    /// Values pushed per field
    #[arg(long, default_value_t = 1)]
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

    let project_id = prompt("Please set the project ID: ")?;
    let dataset_id = prompt("Please set the dataset ID to append to: ")?;
    let key = prompt("Please set a contributor key for this project: ")?;
    let title = prompt("Please enter the dataset title: ")?;

    let mut session = Session::new(config)?;
    session.set_project_id(project_id);
    session.set_title(title);
    session.set_contributor_key(key);
    session.set_dataset_id(dataset_id.clone());

    session.load_schema()?;
    push_sample_values(&mut session, cli.samples);

    if !review(&mut session)? {
        return Ok(());
    }

    println!("Appending to dataset {}...", dataset_id);
    session.append(dataset_id)?;
    println!("Append accepted.");

    Ok(())
}
