//! Environment-driven configuration
//!
//! twig has no configuration file. Everything a command needs beyond its arguments comes from
//! the process environment:
//!
//! - `TWIG_AUTHOR_NAME` / `TWIG_AUTHOR_EMAIL`: identity recorded in new commits
//! - `TWIG_AUTHOR_DATE`: optional fixed commit date (RFC 2822 or `%Y-%m-%d %H:%M:%S %z`)
//! - `TWIG_LOG`: tracing filter directives, `warn` when unset
//! - `NO_PAGER`: disables the pager for long outputs

use anyhow::Context;
use chrono::{DateTime, FixedOffset};
use tracing_subscriber::{EnvFilter, fmt};

pub const AUTHOR_NAME_VAR: &str = "TWIG_AUTHOR_NAME";
pub const AUTHOR_EMAIL_VAR: &str = "TWIG_AUTHOR_EMAIL";
pub const AUTHOR_DATE_VAR: &str = "TWIG_AUTHOR_DATE";
pub const LOG_FILTER_VAR: &str = "TWIG_LOG";
pub const NO_PAGER_VAR: &str = "NO_PAGER";

const DEFAULT_LOG_FILTER: &str = "warn";
const AUTHOR_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Install the global tracing subscriber
///
/// Logs go to stderr so they never interleave with command output on stdout.
pub fn init_logging() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env(LOG_FILTER_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
}

/// Identity of the person recording a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
    pub date: Option<DateTime<FixedOffset>>,
}

impl Identity {
    pub fn from_env() -> anyhow::Result<Self> {
        let name = std::env::var(AUTHOR_NAME_VAR).context(format!("{AUTHOR_NAME_VAR} not set"))?;
        let email =
            std::env::var(AUTHOR_EMAIL_VAR).context(format!("{AUTHOR_EMAIL_VAR} not set"))?;
        let date = match std::env::var(AUTHOR_DATE_VAR) {
            Ok(raw) => Some(parse_author_date(&raw)?),
            Err(_) => None,
        };

        Ok(Identity { name, email, date })
    }
}

pub fn parse_author_date(raw: &str) -> anyhow::Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_str(raw, AUTHOR_DATE_FORMAT))
        .with_context(|| format!("invalid {AUTHOR_DATE_VAR}: {raw}"))
}

pub fn pager_disabled() -> bool {
    std::env::var_os(NO_PAGER_VAR).is_some()
}
