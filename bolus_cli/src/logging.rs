//! Tracing setup: console layer on stderr plus an optional JSON file layer.

use bolus_config::{LogRotation, Logging};
use eyre::{Result, WrapErr};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter precedence: `RUST_LOG`, then `--log-level`, then `[logging].level`, then `info`.
fn build_filter(cli_level: Option<&str>, cfg: &Logging) -> Result<EnvFilter> {
    if let Ok(f) = EnvFilter::try_from_default_env() {
        return Ok(f);
    }
    let level = cli_level.or(cfg.level.as_deref()).unwrap_or("info");
    EnvFilter::try_new(level).wrap_err_with(|| format!("invalid log level {level:?}"))
}

fn file_appender(path: &str, rotation: LogRotation) -> RollingFileAppender {
    let path = Path::new(path);
    let dir = path
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .map_or_else(|| "bolus.log".into(), |n| n.to_os_string());
    match rotation {
        LogRotation::Never => tracing_appender::rolling::never(dir, name),
        LogRotation::Daily => tracing_appender::rolling::daily(dir, name),
        LogRotation::Hourly => tracing_appender::rolling::hourly(dir, name),
    }
}

/// Install the global subscriber. The returned guard flushes the file layer on drop.
pub fn init(json: bool, cli_level: Option<&str>, cfg: &Logging) -> Result<Option<WorkerGuard>> {
    let filter = build_filter(cli_level, cfg)?;

    let pretty = (!json).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });
    let json_console = json.then(|| fmt::layer().json().with_writer(std::io::stderr));

    let (file_layer, guard) = match cfg.file.as_deref() {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(path, cfg.rotation));
            let layer = fmt::layer().json().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json_console)
        .with(file_layer)
        .try_init()
        .wrap_err("install tracing subscriber")?;
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_level_beats_profile_level() {
        // Only meaningful without RUST_LOG in the environment.
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let cfg = Logging {
            level: Some("warn".into()),
            ..Logging::default()
        };
        let f = build_filter(Some("debug"), &cfg).unwrap();
        assert_eq!(f.to_string(), "debug");
        let f = build_filter(None, &cfg).unwrap();
        assert_eq!(f.to_string(), "warn");
        let f = build_filter(None, &Logging::default()).unwrap();
        assert_eq!(f.to_string(), "info");
    }

    #[test]
    fn bogus_level_is_rejected() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert!(build_filter(Some("app=verbose"), &Logging::default()).is_err());
    }
}
