//! Example CLI that derives its parser from a job record.
//!
//! ```text
//! cargo run --example job_runner -- --name nightly --tags db --tags cache --limits.cpu 2
//! ```

use std::io::{self, Write};

use ortho_args::{ArgChoice, ArgSchema, ArgsError, ArgsResult, PostParseContext, PostParseHook};

/// How aggressively the job trades safety for speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ArgChoice)]
enum Mode {
    Fast,
    Safe,
}

/// Resources reserved for the job.
#[derive(Debug, ArgSchema)]
struct Limits {
    /// CPU cores.
    cpu: u32,
    /// Memory in megabytes.
    #[ortho_args(default = 512)]
    memory: u64,
}

/// Runs a batch job.
#[derive(Debug, ArgSchema)]
#[ortho_args(name = "job-runner", post_parse_hook)]
struct Job {
    /// Job name.
    #[ortho_args(value_name = "NAME")]
    name: String,
    /// Attempts before the job is marked failed.
    #[ortho_args(default = 3)]
    retries: Option<u32>,
    /// Increase log detail; repeat for more.
    #[ortho_args(cli_short = 'v', count, default)]
    verbose: u8,
    /// Labels attached to the job.
    tags: Vec<String>,
    /// Execution mode.
    #[ortho_args(default = Mode::Safe)]
    mode: Mode,
    /// Optional resource limits.
    limits: Option<Limits>,
}

impl PostParseHook for Job {
    fn post_parse(&mut self, _ctx: &PostParseContext) -> ArgsResult<()> {
        if self.mode == Mode::Fast && self.retries.is_some_and(|retries| retries > 0) {
            return Err(ArgsError::validation("retries", "fast mode does not retry"));
        }
        Ok(())
    }
}

fn describe(job: &Job) -> String {
    let limits = job.limits.as_ref().map_or_else(
        || "unlimited".to_owned(),
        |limits| format!("{} cpu, {} MB", limits.cpu, limits.memory),
    );
    format!(
        "job {} ({:?}, retries {:?}, verbosity {}, tags [{}], {limits})",
        job.name,
        job.mode,
        job.retries,
        job.verbose,
        job.tags.join(", "),
    )
}

fn main() -> io::Result<()> {
    let job = Job::parse();
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", describe(&job))
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests panic to surface parsing mistakes"
)]
mod tests {
    use super::*;
    use anyhow::{Result, ensure};
    use rstest::rstest;

    #[rstest]
    fn describes_a_parsed_job() -> Result<()> {
        let job = Job::try_parse_from(["--name", "nightly", "-vv", "--limits.cpu", "2"])?;
        ensure!(
            describe(&job) == "job nightly (Safe, retries Some(3), verbosity 2, tags [], 2 cpu, 512 MB)"
        );
        Ok(())
    }

    #[rstest]
    fn fast_mode_rejects_retries() {
        let err = Job::try_parse_from(["--name", "x", "--mode", "fast"]).expect_err("retries");
        assert!(matches!(err, ArgsError::Validation { .. }));
    }
}
