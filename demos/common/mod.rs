#![allow(dead_code)]

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use isense_client::{generate_timestamp, Configuration, FieldType, Session};
use tracing::{info, Level};

/// Flags shared by every demo.
#[derive(Args, Debug)]
pub struct CommonArgs
{
    /// Use the development server instead of the live one
    #[arg(long)]
    pub dev: bool,

    /// Path to a TOML configuration file (overrides --dev)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl CommonArgs
{
    /// Installs the log subscriber and resolves the configuration.
    pub fn init(&self) -> Result<Configuration>
    {
        let log_level = if self.verbose { Level::DEBUG } else { Level::INFO };
        tracing_subscriber::fmt().with_max_level(log_level).init();

        let config = match &self.config {
            Some(path) => {
                info!("Loading configuration from: {}", path.display());
                Configuration::from_file(path)?
            }
            None if self.dev => Configuration::dev(),
            None => Configuration::default(),
        };

        info!("Using server {}", config.base_url);
        Ok(config)
    }
}

/// Prints `message` and reads one trimmed line from stdin. Fails once stdin is closed.
pub fn prompt(message: &str) -> Result<String>
{
    read_answer(&mut io::stdin().lock(), message)
}

/// Asks until the answer is y or n.
pub fn confirm(message: &str) -> Result<bool>
{
    confirm_from(&mut io::stdin().lock(), message)
}

fn read_answer(input: &mut impl BufRead, message: &str) -> Result<String>
{
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("stdin closed while waiting for input");
    }
    Ok(line.trim().to_string())
}

fn confirm_from(input: &mut impl BufRead, message: &str) -> Result<bool>
{
    loop {
        match read_answer(input, message)?.as_str() {
            "y" | "Y" => return Ok(true),
            "n" | "N" => return Ok(false),
            _ => println!("Please enter y or n."),
        }
    }
}

/// Titles get the upload time appended so repeated runs don't collide.
pub fn timestamped_title(title: &str) -> String
{
    format!("{} {}", title, generate_timestamp())
}

/// Pushes a few sample values for every loaded field, chosen by field type.
pub fn push_sample_values(session: &mut Session, count: usize)
{
    let fields = session.fields().to_vec();
    let timestamp = generate_timestamp();

    for field in fields {
        for i in 0..count {
            let value = match field.field_type {
                FieldType::Timestamp => timestamp.clone(),
                FieldType::Number => i.to_string(),
                FieldType::Text => format!("sample {}", i),
                // Olsen Hall, UMass Lowell
                FieldType::Latitude => "42.654761".to_string(),
                FieldType::Longitude => "-71.326674".to_string(),
            };
            session.push(field.name.clone(), value);
        }
    }
}

/// Shows the session and asks before uploading. `Ok(false)` means the user declined.
pub fn review(session: &mut Session) -> Result<bool>
{
    session.build()?;
    println!("\n{}", session.report());

    if !confirm("Does the data look alright to you? (enter y/n) -> ")? {
        println!("\nUser chose not to upload. Quitting instead.");
        return Ok(false);
    }
    Ok(true)
}
