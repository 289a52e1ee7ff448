use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;
use nessgrep_output::RecordFormat;
use nessgrep_types::OutputMode;

/// Default file glob.
pub const DEFAULT_FILE_GLOB: &str = "*.nessus";

/// nessgrep: search Nessus reports with a regular expression
#[derive(Parser, Debug)]
#[command(
    name = "nessgrep",
    version,
    about = "Search Nessus v2 scan reports and print matching hosts, ports or plugin output"
)]
pub struct Args {
    /// Files to search (glob, may contain '/' separated directories)
    #[arg(short = 'f', long = "file", value_name = "GLOB", default_value = DEFAULT_FILE_GLOB)]
    pub file: String,

    /// Base directory the file glob is resolved against
    #[arg(short = 'p', long = "path", value_name = "DIR", default_value = ".")]
    pub path: PathBuf,

    /// Match case-sensitively
    #[arg(short = 'c', long = "case_sensitive")]
    pub case_sensitive: bool,

    /// Report every file that could not be processed
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// What to print for each matching host
    #[arg(
        short = 'o',
        long = "output",
        value_name = "MODE",
        default_value = "xml_min",
        value_parser = ["xml", "xml_min", "ipv4", "mac", "mac+ipv4", "ports", "script"]
    )]
    pub output: String,

    /// Regular expression to search for
    #[arg(
        short = 'r',
        long = "regex",
        value_name = "REGEX",
        required_unless_present_any = ["list_profiles", "profile", "save_profile"]
    )]
    pub regex: Option<String>,

    /// Record format: text (console layout) or json (one object per line)
    #[arg(long = "format", value_name = "FORMAT", default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Write records to this file instead of stdout
    #[arg(long = "out-file", value_name = "FILE")]
    pub out_file: Option<PathBuf>,

    /// Increase log verbosity (use -v, -vv or -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    // --- Profiles ---
    /// Use a named search profile (built-in or user-defined)
    #[arg(long = "profile", value_name = "NAME")]
    pub profile: Option<String>,

    /// Save current CLI arguments as a named profile
    #[arg(long = "save-profile", value_name = "NAME")]
    pub save_profile: Option<String>,

    /// List available search profiles and exit
    #[arg(long = "list-profiles")]
    pub list_profiles: bool,
}

impl Args {
    pub fn output_mode(&self) -> Result<OutputMode> {
        self.output.parse().map_err(|e| anyhow!("{e}"))
    }

    pub fn record_format(&self) -> Result<RecordFormat> {
        self.format.parse().map_err(|e: String| anyhow!(e))
    }
}
