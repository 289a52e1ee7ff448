mod args;
mod profiles;

use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use clap::{CommandFactory, FromArgMatches};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use args::Args;
use nessgrep_core::{SearchEngine, SearchError, SearchEvent, SearchQuery, discover_files};
use nessgrep_output::{OutputConfig, OutputError, OutputManager};

/// Printed after a run with failed files when `-d` was not given.
const DEBUG_HINT: &str = "\nWARNING: Run with -d to see files that could not be processed";

fn main() -> Result<()> {
    // ArgMatches are kept so profile merging can tell explicit flags from defaults
    let matches = Args::command().get_matches();
    let mut args = Args::from_arg_matches(&matches).map_err(|e| anyhow!(e))?;

    if args.list_profiles {
        return profiles::show_profiles();
    }

    if let Some(ref name) = args.save_profile {
        let profile = profiles::args_to_profile(&args);
        let path = profiles::save_profile(name, &profile)?;
        eprintln!("Profile '{name}' saved to {}", path.display());
        return Ok(());
    }

    if let Some(ref profile_name) = args.profile.clone() {
        let profile = profiles::load_profile(profile_name)
            .with_context(|| format!("failed to load profile '{profile_name}'"))?;
        profiles::apply_profile_with_matches(&profile, &mut args, &matches);
    }

    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(ref profile) = args.profile {
        info!(profile = profile.as_str(), "applied search profile");
    }

    let Some(pattern) = args.regex.clone() else {
        bail!("no search expression given (use -r/--regex or a profile that sets one)");
    };
    let mode = args.output_mode()?;
    let format = args.record_format()?;

    let files = discover_files(&args.path, &args.file);
    info!(
        base = %args.path.display(),
        glob = args.file.as_str(),
        files = files.len(),
        "starting search"
    );

    let engine = SearchEngine::new(SearchQuery {
        pattern,
        case_sensitive: args.case_sensitive,
        mode,
    });

    let mut output = OutputManager::new(OutputConfig {
        mode,
        format,
        path: args.out_file.clone(),
    })
    .map_err(|e| anyhow!("output error: {e}"))?;
    output.begin().map_err(|e| anyhow!("output error: {e}"))?;

    let summary = engine
        .try_run(&files, |event| -> Result<(), OutputError> {
            match event {
                SearchEvent::Record(record) => output.write(&record)?,
                SearchEvent::FileSkipped { path, error } => {
                    if args.debug {
                        eprintln!("{}", skip_warning(&path, &error));
                    }
                }
                SearchEvent::FileComplete(report) => {
                    debug!(
                        path = %report.path.display(),
                        hosts = report.hosts_matched,
                        records = report.records,
                        "file searched"
                    );
                }
            }
            Ok(())
        })
        .map_err(|e| anyhow!("output error: {e}"))?;
    output.finish().map_err(|e| anyhow!("output error: {e}"))?;

    if summary.has_errors() && !args.debug {
        eprintln!("{DEBUG_HINT}");
    }

    Ok(())
}

/// The `--debug` line for a file that could not be processed.
fn skip_warning(path: &Path, error: &SearchError) -> String {
    match error {
        SearchError::NotAReportDocument => {
            format!("WARNING: {} is not a valid Nessus report", path.display())
        }
        SearchError::UnparsableInput(reason) => {
            format!("WARNING: Unable to parse {}: {reason}", path.display())
        }
        other => format!("WARNING: Unable to parse {}: {other}", path.display()),
    }
}
