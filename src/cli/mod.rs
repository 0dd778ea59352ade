//! Tink App Command Line Interface

pub mod command;

use clap::{command, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the callback server and log a summary for every connection
    Serve {},

    /// Connect a bank in the browser, then print its transaction summary
    Connect {},
}
