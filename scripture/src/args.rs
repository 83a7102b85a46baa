use std::path::PathBuf;

use clap::Parser;

/// Scripture: the `Bible` formula on the command line
#[derive(Debug, Parser)]
#[command(name = "scripture", about = "Get a passage of the Bible from bible-api.com")]
pub struct Args {
    /// Verses to look up, e.g. "john 3:16" or "romans+12:1-2"
    pub verses: Option<String>,

    /// Translation abbreviation, e.g. "kjv" or "web"
    #[arg(short, long)]
    pub translation: Option<String>,

    /// Path to configuration file
    #[arg(short, long, env = "SCRIPTURE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the configured log filter
    #[arg(long, env = "SCRIPTURE_LOG")]
    pub log: Option<String>,

    /// Print the formula definition as JSON and exit
    #[arg(long)]
    pub describe: bool,
}
