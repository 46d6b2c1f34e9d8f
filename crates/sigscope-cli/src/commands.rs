use std::io::IsTerminal;

use sigscope_client::{Backend, Session, TcpBackend};
use sigscope_explain::{compare_files, dump_file, ExplainError, Explainer};
use sigscope_types::{SigFileRef, SignatureHash, TaskKey};
use thiserror::Error;
use tracing::debug;

use crate::cli::{Cli, ColorMode};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Explain(#[from] ExplainError),
}

impl CliError {
    /// Process exit code: 1 for usage and resolution errors, 2 when the
    /// backend itself is unavailable or reports failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 1,
            Self::Explain(ExplainError::Client(_)) => 2,
            Self::Explain(_) => 1,
        }
    }
}

/// Resolve the request and produce the report lines to print.
pub async fn run_command(cli: Cli) -> Result<Vec<String>, CliError> {
    let colorize = apply_color_mode(cli.color);

    match (cli.files.as_slice(), &cli.task) {
        ([file], None) => {
            debug!(file = %file.display(), "dumping record");
            Ok(dump_file(&SigFileRef::new(file.clone()))?)
        }
        ([from, to], None) => {
            debug!(from = %from.display(), to = %to.display(), "comparing record files");
            Ok(compare_files(
                &SigFileRef::new(from.clone()),
                &SigFileRef::new(to.clone()),
                colorize,
            )?)
        }
        ([], Some(task_args)) => {
            let task = parse_task(task_args)?;
            let pair = parse_signature_pair(cli.signature.as_deref())?;
            let backend = TcpBackend::new(cli.server.clone());
            explain_with_backend(&task, pair, Box::new(backend), colorize).await
        }
        ([], None) => Err(CliError::Usage(
            "nothing to do: pass FILE [FILE] or -t/--task RECIPE TASK".into(),
        )),
        // clap rejects more than two files and files combined with --task;
        // these arms are unreachable through argument parsing.
        _ => Err(CliError::Usage("invalid argument combination".into())),
    }
}

async fn explain_with_backend(
    task: &TaskKey,
    pair: Option<(SignatureHash, SignatureHash)>,
    backend: Box<dyn Backend>,
    colorize: bool,
) -> Result<Vec<String>, CliError> {
    let explainer = Explainer::new(Session::new(backend), colorize);
    let pair = pair.as_ref().map(|(from, to)| (from, to));
    Ok(explainer.explain_task(task, pair).await?)
}

fn parse_task(task_args: &[String]) -> Result<TaskKey, CliError> {
    TaskKey::new(&task_args[0], &task_args[1]).map_err(|e| CliError::Usage(e.to_string()))
}

fn parse_signature_pair(
    signature: Option<&[String]>,
) -> Result<Option<(SignatureHash, SignatureHash)>, CliError> {
    match signature {
        None => Ok(None),
        Some(pair) => {
            let from =
                SignatureHash::parse(&pair[0]).map_err(|e| CliError::Usage(e.to_string()))?;
            let to = SignatureHash::parse(&pair[1]).map_err(|e| CliError::Usage(e.to_string()))?;
            Ok(Some((from, to)))
        }
    }
}

/// Settle the color decision once, keeping the `colored` crate's global
/// switch in agreement with the flag we thread through the diff engine.
fn apply_color_mode(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => {
            colored::control::set_override(true);
            true
        }
        ColorMode::Never => {
            colored::control::set_override(false);
            false
        }
        ColorMode::Auto => std::io::stdout().is_terminal(),
    }
}
