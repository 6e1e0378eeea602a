//! Tracing subscriber setup
//!
//! `RUST_LOG` overrides the per-environment directives; `LOG_FORMAT` overrides
//! the output format (JSON lines in prod, pretty elsewhere).

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Environment, Settings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

impl LogFormat {
    /// Unknown names fall back to the environment default
    pub fn resolve(name: Option<&str>, env: &Environment) -> Self {
        match name.map(|n| n.trim().to_lowercase()).as_deref() {
            Some("json") => Self::Json,
            Some("compact") => Self::Compact,
            Some("pretty") => Self::Pretty,
            _ if matches!(env, Environment::Prod) => Self::Json,
            _ => Self::Pretty,
        }
    }
}

fn default_directives(env: &Environment) -> &'static str {
    match env {
        Environment::Dev => "buildsim_backend=debug,tower_http=debug,sqlx=warn,info",
        Environment::Staging => "buildsim_backend=debug,tower_http=info,sqlx=warn,info",
        Environment::Prod => "buildsim_backend=info,tower_http=info,sqlx=error,warn",
    }
}

pub fn init_logging(settings: &Settings) {
    let env = &settings.env;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(env)));

    // Source locations only help when reading a local terminal
    let with_source = env.is_dev();
    let format = settings.log_format;

    let json = (format == LogFormat::Json).then(|| {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
    });
    let compact = (format == LogFormat::Compact).then(|| fmt::layer().compact().with_target(true));
    let pretty = (format == LogFormat::Pretty).then(|| {
        fmt::layer()
            .pretty()
            .with_file(with_source)
            .with_line_number(with_source)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(compact)
        .with(pretty)
        .init();

    tracing::info!(env = ?env, format = ?format, "Logging initialized");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_defaults_follow_environment() {
        assert_eq!(LogFormat::resolve(None, &Environment::Prod), LogFormat::Json);
        assert_eq!(LogFormat::resolve(None, &Environment::Dev), LogFormat::Pretty);
        assert_eq!(LogFormat::resolve(Some(" Compact "), &Environment::Prod), LogFormat::Compact);
        assert_eq!(LogFormat::resolve(Some("xml"), &Environment::Staging), LogFormat::Pretty);
    }

    #[test]
    fn directives_parse() {
        for env in [Environment::Dev, Environment::Staging, Environment::Prod] {
            assert!(EnvFilter::try_new(default_directives(&env)).is_ok());
        }
    }
}
