use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use clap::parser::ValueSource;
use serde::{Deserialize, Serialize};

use crate::args::{Args, DEFAULT_FILE_GLOB};

/// A search profile that can be serialized to/from TOML.
///
/// `None` fields leave the CLI value alone. A `Some` value is applied only
/// if the user did not pass that flag explicitly.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchProfile {
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    // --- File selection ---
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    // --- Matching ---
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_sensitive: Option<bool>,

    // --- Output ---
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
}

// ---------------------------------------------------------------------------
// Built-in profiles
// ---------------------------------------------------------------------------

/// Names of built-in profiles that cannot be overwritten by users.
const BUILTIN_NAMES: &[&str] = &["web-ports", "ssl-ports", "ssh-ports"];

fn builtin_profiles() -> Vec<(&'static str, SearchProfile)> {
    vec![
        (
            "web-ports",
            SearchProfile {
                description: Some("Open web ports (http/https) as a port table".into()),
                regex: Some("http|www".into()),
                output: Some("ports".into()),
                ..Default::default()
            },
        ),
        (
            "ssl-ports",
            SearchProfile {
                description: Some("SSL/TLS-wrapped services (https, ssl, tls) as a port table".into()),
                regex: Some("https|ssl|tls".into()),
                output: Some("ports".into()),
                ..Default::default()
            },
        ),
        (
            "ssh-ports",
            SearchProfile {
                description: Some("SSH services, with the plugin text that identified them".into()),
                regex: Some("ssh".into()),
                output: Some("script".into()),
                ..Default::default()
            },
        ),
    ]
}

// ---------------------------------------------------------------------------
// Profile directory
// ---------------------------------------------------------------------------

fn profiles_dir() -> PathBuf {
    if cfg!(windows) {
        let appdata = std::env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(appdata).join("nessgrep").join("profiles")
    } else {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".nessgrep").join("profiles")
    }
}

/// Validate that a profile name is safe (no path traversal).
fn validate_profile_name(name: &str) -> Result<()> {
    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        bail!(
            "invalid profile name: {name:?} (only alphanumeric, hyphens, underscores, and dots allowed)"
        );
    }
    if name.contains("..") {
        bail!("invalid profile name: {name:?} (contains '..')");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Load a profile by name. Built-ins win over user TOML files.
pub fn load_profile(name: &str) -> Result<SearchProfile> {
    validate_profile_name(name)?;

    if let Some((_, profile)) = builtin_profiles().into_iter().find(|(n, _)| *n == name) {
        return Ok(profile);
    }

    let path = profiles_dir().join(format!("{name}.toml"));
    if path.exists() {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read profile '{}'", path.display()))?;
        let profile: SearchProfile = toml::from_str(&content)
            .with_context(|| format!("failed to parse profile '{}'", path.display()))?;
        return Ok(profile);
    }

    bail!("unknown profile '{name}'. Use --list-profiles to see available profiles.");
}

/// Save a profile under the user profile directory. Returns the file written.
pub fn save_profile(name: &str, profile: &SearchProfile) -> Result<PathBuf> {
    validate_profile_name(name)?;

    if BUILTIN_NAMES.contains(&name) {
        bail!("cannot overwrite built-in profile '{name}'");
    }

    let dir = profiles_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create profiles directory: {}", dir.display()))?;

    let path = dir.join(format!("{name}.toml"));
    let content =
        toml::to_string_pretty(profile).context("failed to serialize profile to TOML")?;
    std::fs::write(&path, content)
        .with_context(|| format!("failed to write profile to {}", path.display()))?;

    Ok(path)
}

/// All available profiles as (name, profile, is_builtin).
pub fn list_all_profiles() -> Result<Vec<(String, SearchProfile, bool)>> {
    let mut profiles: Vec<_> = builtin_profiles()
        .into_iter()
        .map(|(name, profile)| (name.to_string(), profile, true))
        .collect();

    let dir = profiles_dir();
    if dir.exists()
        && let Ok(entries) = std::fs::read_dir(&dir)
    {
        let mut user = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "toml") {
                let name = path.file_stem().unwrap_or_default().to_string_lossy().to_string();
                if BUILTIN_NAMES.contains(&name.as_str()) {
                    continue;
                }
                if let Ok(content) = std::fs::read_to_string(&path)
                    && let Ok(profile) = toml::from_str::<SearchProfile>(&content)
                {
                    user.push((name, profile, false));
                }
            }
        }
        user.sort_by(|a, b| a.0.cmp(&b.0));
        profiles.extend(user);
    }

    Ok(profiles)
}

/// Print formatted profile list to stdout.
pub fn show_profiles() -> Result<()> {
    let profiles = list_all_profiles()?;

    println!("Available search profiles:\n");
    for (name, profile, is_builtin) in &profiles {
        let tag = if *is_builtin { "[built-in]" } else { "[user]" };
        let desc = profile.description.as_deref().unwrap_or("(no description)");
        println!("  {name:<20} {tag:<12} {desc}");
    }

    println!(
        "\nUsage: nessgrep --profile <NAME> [-p <DIR>]\n\
         Save:  nessgrep --save-profile <NAME> [options]"
    );

    Ok(())
}

/// Apply a profile's settings to `args`, skipping flags given on the
/// command line.
pub fn apply_profile_with_matches(profile: &SearchProfile, args: &mut Args, matches: &ArgMatches) {
    let not_set = |id: &str| -> bool {
        matches
            .value_source(id)
            .is_none_or(|s| s != ValueSource::CommandLine)
    };

    if let Some(ref v) = profile.file
        && not_set("file")
    {
        args.file = v.clone();
    }
    if let Some(ref v) = profile.path
        && not_set("path")
    {
        args.path = v.clone();
    }

    if let Some(ref v) = profile.regex
        && not_set("regex")
    {
        args.regex = Some(v.clone());
    }
    if let Some(v) = profile.case_sensitive
        && not_set("case_sensitive")
    {
        args.case_sensitive = v;
    }

    if let Some(ref v) = profile.output
        && not_set("output")
    {
        args.output = v.clone();
    }
    if let Some(ref v) = profile.format
        && not_set("format")
    {
        args.format = v.clone();
    }
    if let Some(v) = profile.debug
        && not_set("debug")
    {
        args.debug = v;
    }
}

/// Convert current CLI args to a `SearchProfile` (for `--save-profile`).
pub fn args_to_profile(args: &Args) -> SearchProfile {
    SearchProfile {
        description: None,
        file: (args.file != DEFAULT_FILE_GLOB).then(|| args.file.clone()),
        path: (args.path.as_os_str() != ".").then(|| args.path.clone()),
        regex: args.regex.clone(),
        case_sensitive: Some(args.case_sensitive),
        output: Some(args.output.clone()),
        format: (args.format != "text").then(|| args.format.clone()),
        debug: Some(args.debug),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
