//! carbon — report the latest measured grid carbon intensity for a zone.
//!
//! Run with:  `RUST_LOG=info carbon [--watch] [--config PATH]`

use anyhow::{bail, Result};
use carbon_client::ElectricityMapsClient;
use carbon_renderer::MultiRenderer;
use carbon_reporter::{fetch_and_render, spawn_refresh, Report};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: carbon [--watch] [--config PATH]";

#[derive(Debug, Default, PartialEq)]
struct Args {
    watch: bool,
    config: Option<PathBuf>,
    help: bool,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut parsed = Self::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-w" | "--watch" => parsed.watch = true,
                "-c" | "--config" => match args.next() {
                    Some(path) => parsed.config = Some(PathBuf::from(path)),
                    None => bail!("--config needs a path\n{USAGE}"),
                },
                "-h" | "--help" => parsed.help = true,
                other => bail!("unexpected argument '{other}'\n{USAGE}"),
            }
        }
        Ok(parsed)
    }
}

/// Exit status for a one-shot run.
///
/// Fetch failures were already logged by `fetch_and_render`; they only set
/// the status.  Anything else goes back to the caller to be printed.
fn one_shot_exit(outcome: carbon_core::Result<Report>) -> Result<ExitCode> {
    match outcome {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(e) if e.is_fetch_failure() => Ok(ExitCode::FAILURE),
        Err(e) => Err(e.into()),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Logs go to stderr; stdout only carries the rendered summary.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse(std::env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(ExitCode::SUCCESS);
    }

    let path = carbon_config::resolve_path(args.config);
    let config = carbon_config::load(&path)?;
    tracing::info!(
        "carbon v{} starting for zone {}",
        env!("CARGO_PKG_VERSION"),
        config.api.zone_code
    );

    let client = ElectricityMapsClient::from_config(&config.api);
    let mut renderer = MultiRenderer::from_config(&config.render);
    if renderer.is_empty() {
        tracing::warn!("No render targets enabled; nothing will be written.");
    }

    if !args.watch {
        return one_shot_exit(fetch_and_render(&config.api, &client, &mut renderer).await);
    }

    let mut outcomes = spawn_refresh(path, config, client, renderer);
    loop {
        tokio::select! {
            outcome = outcomes.recv() => match outcome {
                Some(Err(e)) if !e.is_fetch_failure() => tracing::warn!("{e}"),
                Some(_) => {}
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted; shutting down.");
                break;
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use carbon_core::ReportError;
    use carbon_renderer::Content;

    fn parse(args: &[&str]) -> Result<Args> {
        Args::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn no_arguments_is_one_shot() {
        assert_eq!(parse(&[]).unwrap(), Args::default());
    }

    #[test]
    fn watch_and_config_flags() {
        let args = parse(&["--watch", "--config", "/etc/carbon.toml"]).unwrap();
        assert!(args.watch);
        assert_eq!(args.config, Some(PathBuf::from("/etc/carbon.toml")));
    }

    #[test]
    fn config_without_path_fails() {
        assert!(parse(&["-c"]).is_err());
    }

    #[test]
    fn unknown_flag_fails() {
        assert!(parse(&["--zone", "DE"]).is_err());
    }

    #[test]
    fn one_shot_fetch_failure_exits_nonzero_without_error() {
        let outcome = Err(ReportError::Network("connection refused".into()));
        assert_eq!(one_shot_exit(outcome).unwrap(), ExitCode::FAILURE);
    }

    #[test]
    fn one_shot_render_failure_is_returned() {
        let outcome = Err(ReportError::Render("'out.html': permission denied".into()));
        let err = one_shot_exit(outcome).unwrap_err();
        assert!(err.to_string().contains("out.html"));
    }

    #[test]
    fn one_shot_success_exits_zero() {
        let report = Report {
            zone: "FR".into(),
            content: Content::NoData,
            targets: 1,
        };
        assert_eq!(one_shot_exit(Ok(report)).unwrap(), ExitCode::SUCCESS);
    }
}
