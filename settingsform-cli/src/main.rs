use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Report, Result, WrapErr, eyre};
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use settingsform::{
    AUTO_RESOLVE_MAX_HOURS, DocumentFormat, EndpointConfig, FormOptions, HttpEndpoint, Membership,
    OutputDestination, OutputOptions, ProjectTarget, SaveReport, SettingsForm, SubmitOutcome,
    domain::{allowed_values, format_label},
    emit, parse_document_any, parse_field_assignment,
};

/// Widest `steps` range accepted: one leap year of hours.
const MAX_STEP_SPAN: i64 = 366 * 24;

#[derive(Debug, Parser)]
#[command(
    name = "settingsform",
    version,
    about = "Render, edit and save project settings forms"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the settings form for a project document
    Render(RenderArgs),
    /// List the values an auto-resolve slider can take
    Steps(StepsArgs),
    /// Apply edits and save them to the server
    Save(SaveArgs),
}

#[derive(Debug, Args)]
struct ProjectArgs {
    /// Project spec: file path, inline payload, or "-" for stdin
    #[arg(short = 'p', long = "project", value_name = "SPEC")]
    project: String,

    /// Team memberships spec (array of {id, slug, isMember})
    #[arg(long = "teams", value_name = "SPEC")]
    teams: Option<String>,
}

#[derive(Debug, Args)]
struct RenderArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Wrap width for help text
    #[arg(long = "width", value_name = "N", default_value_t = 72)]
    width: usize,

    /// Omit help text below each field
    #[arg(long = "no-help")]
    no_help: bool,

    /// Apply edits before rendering
    #[arg(long = "set", value_name = "NAME=VALUE")]
    set: Vec<String>,
}

#[derive(Debug, Args)]
struct StepsArgs {
    #[arg(long = "min", value_name = "N", default_value_t = 0, allow_negative_numbers = true)]
    min: i64,

    #[arg(long = "max", value_name = "N", default_value_t = AUTO_RESOLVE_MAX_HOURS)]
    max: i64,
}

#[derive(Debug, Args)]
struct SaveArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Organization slug
    #[arg(long = "org", value_name = "ORG")]
    org: String,

    /// Project slug used in the request path
    #[arg(long = "project-slug", value_name = "SLUG")]
    project_slug: String,

    #[arg(long = "base-url", value_name = "URL", env = "SETTINGSFORM_BASE_URL")]
    base_url: String,

    #[arg(long = "token", value_name = "TOKEN", env = "SETTINGSFORM_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Field edits to apply before saving
    #[arg(long = "set", value_name = "NAME=VALUE")]
    set: Vec<String>,

    /// Output destinations for the saved snapshot ("-" writes to stdout)
    #[arg(short = 'o', long = "output", value_name = "DEST", num_args = 1..)]
    outputs: Vec<String>,

    /// Emit compact JSON/TOML rather than pretty formatting
    #[arg(long = "no-pretty")]
    no_pretty: bool,

    /// Write `{config, changes}` instead of the bare saved snapshot
    #[arg(long = "changes")]
    changes: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Render(args) => render(args),
        Command::Steps(args) => steps(&args),
        Command::Save(args) => save(args).await,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn render(args: RenderArgs) -> Result<()> {
    let options = FormOptions::default()
        .with_wrap_width(args.width)
        .with_help(!args.no_help);
    let mut form = load_form(&args.project)?.with_options(options);
    apply_assignments(&mut form, &args.set)?;
    println!("{}", form.render_text());
    Ok(())
}

fn steps(args: &StepsArgs) -> Result<()> {
    let span = args.max.checked_sub(args.min);
    if span.is_none_or(|span| span > MAX_STEP_SPAN) {
        return Err(eyre!(
            "--min {} and --max {} are more than {MAX_STEP_SPAN} hours apart",
            args.min,
            args.max
        ));
    }
    for hours in allowed_values(args.min, args.max) {
        println!("{hours:>5}  {}", format_label(hours));
    }
    Ok(())
}

async fn save(args: SaveArgs) -> Result<()> {
    let mut form = load_form(&args.project)?;
    apply_assignments(&mut form, &args.set)?;

    let mut config = EndpointConfig::new(args.base_url.clone());
    if let Some(token) = args.token.as_ref() {
        config = config.with_token(token.clone());
    }
    let endpoint = HttpEndpoint::new(config).wrap_err("failed to build HTTP client")?;
    let target = ProjectTarget::new(args.org.clone(), args.project_slug.clone());
    debug!(path = %target.path(), edits = args.set.len(), "saving project settings");

    let before = form.state().initial().clone();
    let outcome = form.submit(&endpoint, &target).await?;
    match outcome {
        SubmitOutcome::Saved => {
            eprintln!("{}", form.status());
            let changes = form.state().changes_since(&before);
            let report = SaveReport {
                snapshot: form.state().current(),
                changes: &changes,
            };
            emit(&report, &build_output_options(&args)).map_err(Report::msg)
        }
        SubmitOutcome::Rejected { issues } => {
            for (name, messages) in form.errors().iter() {
                for message in messages {
                    eprintln!("{name}: {message}");
                }
            }
            if let Some(notice) = form.notice() {
                eprintln!("{notice}");
            }
            Err(eyre!("{issues} issue(s) remaining"))
        }
        SubmitOutcome::TransportFailed { error } => {
            Err(Report::new(error).wrap_err("failed to save project settings"))
        }
        SubmitOutcome::Discarded => Err(eyre!("response was discarded")),
    }
}

fn load_form(args: &ProjectArgs) -> Result<SettingsForm> {
    let project = load_value(&args.project, "project")?;
    let mut form = SettingsForm::for_project(project);
    if let Some(spec) = args.teams.as_deref() {
        let teams = load_value(spec, "teams")?;
        let memberships: Vec<Membership> =
            serde_json::from_value(teams).wrap_err("teams must be an array of memberships")?;
        form.set_memberships(memberships);
    }
    Ok(form)
}

fn apply_assignments(form: &mut SettingsForm, assignments: &[String]) -> Result<()> {
    for raw in assignments {
        let (name, value) = parse_field_assignment(raw).map_err(Report::msg)?;
        form.set_field_value(&name, value)
            .wrap_err_with(|| format!("cannot apply --set {raw}"))?;
    }
    Ok(())
}

fn load_value(spec: &str, label: &str) -> Result<Value> {
    if spec == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .wrap_err("failed to read from stdin")?;
        return parse_contents(&buffer, DocumentFormat::default(), label);
    }

    let path = PathBuf::from(spec);
    let format = DocumentFormat::from_extension(&path).unwrap_or_default();
    match fs::read_to_string(&path) {
        Ok(contents) => parse_contents(&contents, format, label),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            parse_contents(spec, format, &format!("inline {label}"))
        }
        Err(err) => {
            Err(Report::new(err).wrap_err(format!("failed to load {label} from {}", path.display())))
        }
    }
}

fn parse_contents(contents: &str, format: DocumentFormat, label: &str) -> Result<Value> {
    let (value, detected) = parse_document_any(contents, format)
        .map_err(|err| eyre!("failed to parse {label}: {err:#}"))?;
    if detected != format {
        debug!(%label, %detected, "parsed with a fallback format");
    }
    Ok(value)
}

fn build_output_options(args: &SaveArgs) -> OutputOptions {
    let destinations: Vec<OutputDestination> = if args.outputs.is_empty() {
        vec![OutputDestination::Stdout]
    } else {
        args.outputs
            .iter()
            .map(|dest| OutputDestination::parse(dest))
            .collect()
    };
    let format = args
        .outputs
        .iter()
        .filter(|dest| dest.as_str() != "-")
        .find_map(|dest| DocumentFormat::from_extension(Path::new(dest)))
        .unwrap_or_default();
    OutputOptions::new(format)
        .with_pretty(!args.no_pretty)
        .with_changes(args.changes)
        .with_destinations(destinations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_project_is_parsed_when_no_file_exists() {
        let value = load_value(r#"{"name": "Inline"}"#, "project").unwrap();
        assert_eq!(value["name"], "Inline");
    }

    #[test]
    fn assignments_reject_unknown_fields() {
        let mut form = SettingsForm::for_project(serde_json::json!({"name": "A"}));
        let err = apply_assignments(&mut form, &["nope=1".to_string()]).unwrap_err();
        assert!(format!("{err:#}").contains("unknown field 'nope'"));
    }

    #[test]
    fn steps_rejects_unbounded_ranges() {
        let wide = StepsArgs {
            min: i64::MIN,
            max: AUTO_RESOLVE_MAX_HOURS,
        };
        assert!(steps(&wide).is_err());
        let reversed = StepsArgs { min: 10, max: 5 };
        assert!(steps(&reversed).is_ok());
        let default = StepsArgs {
            min: 0,
            max: AUTO_RESOLVE_MAX_HOURS,
        };
        assert!(steps(&default).is_ok());
    }

    #[test]
    fn unparseable_inline_project_names_the_input() {
        let err = load_value("{ not: [valid", "project").unwrap_err();
        assert!(err.to_string().contains("failed to parse inline project"));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
