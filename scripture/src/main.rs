#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use args::Args;
use clap::Parser;
use scripture_client::{DisplayError, ExecutionContext, FetcherOptions, ReqwestFetcher};
use scripture_config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    if args.describe {
        println!("{}", serde_json::to_string_pretty(&scripture_client::definition())?);
        return Ok(ExitCode::SUCCESS);
    }

    // Load configuration
    let config = Config::load_or_default(args.config.as_deref())?;

    // Initialize logging
    scripture_telemetry::init(&config.telemetry, args.log.as_deref())?;

    let fetcher = ReqwestFetcher::new(FetcherOptions {
        network_domains: config.api.network_domains.clone(),
        timeout: config.api.timeout()?,
        user_agent: config.api.user_agent.clone(),
    })?;
    let context = ExecutionContext::new(Arc::new(fetcher)).with_base_url(config.api.base_url.as_str());

    tracing::debug!(base_url = context.base_url(), "invoking formula");

    Ok(run(&args, &context, &mut io::stdout().lock(), &mut io::stderr().lock()).await?)
}

/// Invoke the formula once and report its outcome
async fn run(
    args: &Args,
    context: &ExecutionContext,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> io::Result<ExitCode> {
    let outcome = scripture_client::execute(context, args.verses.as_deref(), args.translation.as_deref()).await;
    report(outcome, stdout, stderr)
}

/// Passage text goes to stdout, the user-facing message to stderr
fn report(
    outcome: Result<String, DisplayError>,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> io::Result<ExitCode> {
    match outcome {
        Ok(text) => {
            writeln!(stdout, "{text}")?;
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            writeln!(stderr, "{error}")?;
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_prints_text_to_stdout() {
        let (mut stdout, mut stderr) = (Vec::new(), Vec::new());

        let code = report(Ok("In the beginning".to_owned()), &mut stdout, &mut stderr).unwrap();

        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(stdout, b"In the beginning\n");
        assert!(stderr.is_empty());
    }

    #[test]
    fn failure_prints_message_to_stderr() {
        let (mut stdout, mut stderr) = (Vec::new(), Vec::new());

        let code = report(Err(DisplayError::new("not found")), &mut stdout, &mut stderr).unwrap();

        assert_eq!(code, ExitCode::FAILURE);
        assert!(stdout.is_empty());
        assert_eq!(stderr, b"not found\n");
    }

    #[tokio::test]
    async fn missing_verses_exits_with_failure() {
        let args = Args::try_parse_from(["scripture"]).unwrap();
        let fetcher = ReqwestFetcher::new(FetcherOptions::default()).unwrap();
        let context = ExecutionContext::new(Arc::new(fetcher));
        let (mut stdout, mut stderr) = (Vec::new(), Vec::new());

        let code = run(&args, &context, &mut stdout, &mut stderr).await.unwrap();

        assert_eq!(code, ExitCode::FAILURE);
        assert!(stdout.is_empty());
        assert_eq!(String::from_utf8(stderr).unwrap(), "Must contain verses.\n");
    }
}
