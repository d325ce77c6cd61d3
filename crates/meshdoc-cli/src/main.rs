// crates/meshdoc-cli/src/main.rs
// ============================================================================
// Module: meshdoc CLI Entry Point
// Description: Command dispatcher for profile inspection and golden docs.
// Purpose: Render, verify, and inspect control-plane documentation offline.
// Dependencies: clap, meshdoc-config, meshdoc-docs, serde_yaml, thiserror.
// ============================================================================

//! ## Overview
//! The meshdoc CLI exposes the same rendering and golden verification the
//! suite uses, so documentation can be refreshed or checked without running a
//! suite. Inputs are untrusted: overlay files are size-capped and must be
//! UTF-8, and golden trees are accessed without following symlinks.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use meshdoc_config::ControlPlaneConfig;
use meshdoc_config::DocsSelector;
use meshdoc_config::HarnessConfig;
use meshdoc_config::ProfileCatalog;
use meshdoc_config::ProfileDefinition;
use meshdoc_config::ProfileName;
use meshdoc_docs::CheckStatus;
use meshdoc_docs::DocsRenderer;
use meshdoc_docs::GoldenStore;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of an overlay values file.
const MAX_VALUES_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "meshdoc", version, disable_help_subcommand = true)]
struct Cli {
    /// Harness configuration file (TOML); environment overrides still apply.
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List built-in profiles.
    Profiles,
    /// Print effective deployment values as YAML.
    Values(ValuesCommand),
    /// Write generated docs into a directory.
    Render(RenderCommand),
    /// Verify generated docs against a golden tree.
    Verify(VerifyCommand),
}

/// Profile and overlay inputs shared by every rendering command.
#[derive(Args, Debug, Clone, Default)]
struct ProfileArgs {
    /// Profile name (defaults to the harness profile, then `default`).
    #[arg(long, value_name = "NAME")]
    profile: Option<String>,
    /// Overlay YAML file (defaults to the harness values file).
    #[arg(long = "values", value_name = "PATH")]
    values: Option<PathBuf>,
}

/// Arguments for `values`.
#[derive(Args, Debug)]
struct ValuesCommand {
    /// Profile inputs.
    #[command(flatten)]
    inputs: ProfileArgs,
}

/// Arguments for `render`.
#[derive(Args, Debug)]
struct RenderCommand {
    /// Profile inputs.
    #[command(flatten)]
    inputs: ProfileArgs,
    /// Output directory; documents land under `profile-<name>/`.
    #[arg(long, value_name = "DIR")]
    out: PathBuf,
}

/// Arguments for `verify`.
#[derive(Args, Debug)]
struct VerifyCommand {
    /// Profile inputs.
    #[command(flatten)]
    inputs: ProfileArgs,
    /// Golden root (defaults to the harness golden root).
    #[arg(long, value_name = "DIR")]
    golden: Option<PathBuf>,
    /// Docs selector such as `profile=default,topic=values`.
    #[arg(long = "select", value_name = "LABEL")]
    select: Option<String>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };
    let harness = HarnessConfig::load(cli.config.as_deref())
        .map_err(|err| CliError::new(format!("harness config invalid: {err}")))?;
    let catalog = ProfileCatalog::builtin();

    match command {
        Commands::Profiles => command_profiles(&catalog),
        Commands::Values(command) => command_values(&command, &harness, &catalog),
        Commands::Render(command) => command_render(&command, &harness, &catalog),
        Commands::Verify(command) => command_verify(&command, &harness, &catalog),
    }
}

/// Prints the top-level help text.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes `profiles`.
fn command_profiles(catalog: &ProfileCatalog) -> CliResult<ExitCode> {
    for profile in catalog.profiles() {
        write_stdout_line(&format!("{}\t{}", profile.name, profile.description))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes `values`.
fn command_values(
    command: &ValuesCommand,
    harness: &HarnessConfig,
    catalog: &ProfileCatalog,
) -> CliResult<ExitCode> {
    let (profile, config) = resolve_inputs(&command.inputs, None, harness, catalog)?;
    let overlay = config
        .validate()
        .map_err(|err| CliError::new(format!("overlay invalid: {err}")))?;
    let values = profile.effective_values(&overlay);
    let yaml = serde_yaml::to_string(&values)
        .map_err(|err| CliError::new(format!("values serialization failed: {err}")))?;
    write_stdout_bytes(yaml.as_bytes()).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `render`.
fn command_render(
    command: &RenderCommand,
    harness: &HarnessConfig,
    catalog: &ProfileCatalog,
) -> CliResult<ExitCode> {
    let (profile, config) = resolve_inputs(&command.inputs, None, harness, catalog)?;
    let bundle = DocsRenderer::new(profile, &config)
        .render()
        .map_err(|err| CliError::new(format!("render failed: {err}")))?;
    let selector = DocsSelector::for_profile(profile.name.clone());
    let written = GoldenStore::new(&command.out)
        .refresh(&bundle, &selector)
        .map_err(|err| CliError::new(format!("write failed: {err}")))?;
    for path in written {
        write_stdout_line(&format!("wrote {path}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes `verify`; exits non-zero when any document differs.
fn command_verify(
    command: &VerifyCommand,
    harness: &HarnessConfig,
    catalog: &ProfileCatalog,
) -> CliResult<ExitCode> {
    let selector = command
        .select
        .as_deref()
        .map(DocsSelector::parse)
        .transpose()
        .map_err(|err| CliError::new(format!("invalid selector: {err}")))?;
    let (profile, config) =
        resolve_inputs(&command.inputs, selector.as_ref(), harness, catalog)?;
    let selector = selector.unwrap_or_else(|| DocsSelector::for_profile(profile.name.clone()));
    let bundle = DocsRenderer::new(profile, &config)
        .render()
        .map_err(|err| CliError::new(format!("render failed: {err}")))?;
    let golden_root = command.golden.as_deref().unwrap_or(&harness.golden_root);
    let report = GoldenStore::new(golden_root)
        .verify(&bundle, &selector)
        .map_err(|err| CliError::new(format!("verification failed: {err}")))?;

    for check in &report.checks {
        write_stdout_line(&format!("{}\t{}", status_label(&check.status), check.path))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    if report.is_pass() {
        return Ok(ExitCode::SUCCESS);
    }
    write_stderr_line(report.describe_failures().trim_end())
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    Ok(ExitCode::FAILURE)
}

// ============================================================================
// SECTION: Input Resolution
// ============================================================================

/// Resolves the profile definition and control-plane configuration.
///
/// Precedence for the profile: `--profile`, the selector, the harness, then
/// `default`. Precedence for the overlay: `--values`, then the harness file.
fn resolve_inputs<'a>(
    args: &ProfileArgs,
    selector: Option<&DocsSelector>,
    harness: &HarnessConfig,
    catalog: &'a ProfileCatalog,
) -> CliResult<(&'a ProfileDefinition, ControlPlaneConfig)> {
    let name = match (&args.profile, selector) {
        (Some(raw), _) => {
            ProfileName::new(raw.as_str()).map_err(|err| CliError::new(err.to_string()))?
        }
        (None, Some(selector)) => selector.profile().clone(),
        (None, None) => harness.profile_or_default(),
    };
    let profile = catalog.get(&name).map_err(|err| CliError::new(err.to_string()))?;
    let values_path = args.values.as_deref().or(harness.values_file.as_deref());
    let control_plane_values = match values_path {
        Some(path) => read_values_file(path)?,
        None => String::new(),
    };
    let config = ControlPlaneConfig {
        control_plane_values,
        ..ControlPlaneConfig::default()
    };
    Ok((profile, config))
}

/// Reads an overlay file as UTF-8 under [`MAX_VALUES_BYTES`].
fn read_values_file(path: &Path) -> CliResult<String> {
    let bytes = read_bytes_with_limit(path, MAX_VALUES_BYTES).map_err(|err| match err {
        ReadLimitError::Io(err) => {
            CliError::new(format!("failed to read {}: {err}", path.display()))
        }
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(format!(
            "{} is {size} bytes; values files are limited to {limit} bytes",
            path.display()
        )),
    })?;
    String::from_utf8(bytes)
        .map_err(|_| CliError::new(format!("{} is not valid UTF-8", path.display())))
}

/// Errors returned by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let size = file.metadata().map_err(ReadLimitError::Io)?.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }
    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1)).read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        return Err(ReadLimitError::TooLarge {
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

// ============================================================================
// SECTION: Output
// ============================================================================

/// Returns the short label printed for a check status.
const fn status_label(status: &CheckStatus) -> &'static str {
    match status {
        CheckStatus::Match => "ok",
        CheckStatus::Mismatch {
            ..
        } => "differs",
        CheckStatus::MissingGolden => "missing",
        CheckStatus::Unexpected => "unexpected",
    }
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
