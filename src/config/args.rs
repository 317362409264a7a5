use std::path::PathBuf;

use anstyle::{
    AnsiColor::{BrightRed, Cyan, Green, Magenta, Red, Yellow},
    Color::Ansi,
    Style,
};
use clap::{
    builder::{BoolishValueParser, Styles},
    Parser,
};
use url::Url;

use crate::{api::models::SubmissionStatus, runner::FailurePolicy};

pub(crate) const CARGO_PKG_NAME: &str = env!("CARGO_PKG_NAME");

pub(crate) const DEFAULT_DAYS_THRESHOLD: u32 = 14;

fn styles() -> Styles {
    Styles::styled()
        .usage(Style::new().bold().fg_color(Some(Ansi(Yellow))))
        .header(Style::new().bold().underline().fg_color(Some(Ansi(Magenta))))
        .literal(Style::new().fg_color(Some(Ansi(Green))))
        .invalid(Style::new().bold().fg_color(Some(Ansi(Red))))
        .error(Style::new().bold().fg_color(Some(Ansi(BrightRed))))
        .valid(Style::new().bold().fg_color(Some(Ansi(Green))))
        .placeholder(Style::new().fg_color(Some(Ansi(Cyan))))
}

// https://docs.rs/clap/latest/clap/_derive/index.html#arg-attributes
#[derive(Parser, Debug, PartialEq, Clone)]
#[command(version, styles = styles(), about = env!("CARGO_PKG_DESCRIPTION"))]
pub(crate) struct Args {
    /// Bearer token sent with every API call
    #[clap(env = "AUTH_TOKEN", long, hide_env_values = true, required = true)]
    pub(crate) auth_token: String,

    /// Base url of the evaluation platform API
    #[clap(env = "API_HOST_URL", long, value_parser = parse_host_url, required = true)]
    pub(crate) api_host_url: Url,

    /// Cancel submissions stuck for longer than this many days
    #[clap(
        env,
        long,
        short,
        default_value_t = DEFAULT_DAYS_THRESHOLD,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub(crate) days_threshold: u32,

    /// Submission statuses considered stuck
    #[clap(
        env,
        long,
        short,
        use_value_delimiter = true,
        value_delimiter = ',',
        default_value = "submitted,running,resuming",
        value_parser = SubmissionStatus::value_parser,
        required = false
    )]
    pub(crate) statuses: Vec<SubmissionStatus>,

    /// What to do when a single challenge fails
    #[clap(env, long, short, value_enum, default_value_t = FailurePolicy::Halt)]
    pub(crate) on_challenge_error: FailurePolicy,

    /// Only log what would be cancelled
    #[clap(
        env,
        long,
        num_args=0..=1,
        action = clap::ArgAction::SetTrue,
        default_value_t = false,
        value_parser = BoolishValueParser::new(),
    )]
    pub(crate) dry_run: bool,

    /// Only process these challenges instead of walking every challenge
    #[clap(
        env,
        long,
        short,
        use_value_delimiter = true,
        value_delimiter = ',',
        required = false
    )]
    pub(crate) challenge: Vec<u64>,

    /// Read endpoint templates from this file instead of the user config directory
    #[clap(env, long, required = false)]
    pub(crate) endpoint_config: Option<PathBuf>,
}

fn parse_host_url(arg: &str) -> Result<Url, String> {
    let url = Url::parse(arg).map_err(|err| format!("{arg:?} is not a valid url, {err}"))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(format!("{arg:?} is not an http(s) base url"));
    }
    Ok(url)
}
