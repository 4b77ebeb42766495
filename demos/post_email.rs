//! Uploads a new dataset using an iSENSE account.

mod common;

use std::process::ExitCode;

use anyhow::{bail, Result};
use clap::Parser;
use common::{prompt, push_sample_values, review, timestamped_title, CommonArgs};
use isense_client::Session;
use tracing::error;

#[derive(Parser, Debug)]
#[command(about = "Upload a sample dataset with an email and password")]
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
    let email = prompt("Please set an email address (iSENSE account) for this project: ")?;
    let password = prompt("Please enter a password for the above iSENSE account: ")?;
    let title = prompt("Please enter a title for the dataset: ")?;

    let mut session = Session::new(config)?;
    session.set_project_id(project_id);
    session.set_title(timestamped_title(&title));
    session.set_contributor_name("isense-client");
    session.set_account(email, password);

    if !session.check_user()? {
        bail!("Email & password are not valid");
    }
    println!("Email & password are valid.");

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
