use std::path::PathBuf;

use anyhow::{bail, Context};
use cutplan::{generate_job, init_logging, validate_job, GeneratorVersion, JobRequest};

const BUILD_DATE: &str = env!("BUILD_DATE");

fn usage() -> ! {
    eprintln!("cutplan {} ({})", env!("CARGO_PKG_VERSION"), BUILD_DATE);
    eprintln!("usage: cutplan <job.json> [output.nc] [--check] [--verbose-gcode] [--no-comments]");
    std::process::exit(2);
}

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let mut job_path: Option<PathBuf> = None;
    let mut out_path: Option<PathBuf> = None;
    let mut check_only = false;
    let mut version = GeneratorVersion::Optimized;
    let mut include_comments = true;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--check" => check_only = true,
            "--verbose-gcode" => version = GeneratorVersion::Verbose,
            "--no-comments" => include_comments = false,
            "--help" | "-h" => usage(),
            _ if job_path.is_none() => job_path = Some(PathBuf::from(arg)),
            _ if out_path.is_none() => out_path = Some(PathBuf::from(arg)),
            _ => usage(),
        }
    }
    let Some(job_path) = job_path else { usage() };

    let raw = std::fs::read_to_string(&job_path)
        .with_context(|| format!("reading job file {}", job_path.display()))?;
    let job: JobRequest = serde_json::from_str(&raw).context("parsing job file")?;

    if check_only {
        let outcome = validate_job(&job);
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        if !outcome.valid {
            bail!("configuration is not valid");
        }
        return Ok(());
    }

    let outcome = match generate_job(&job, version, include_comments) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("{err}");
            if let cutplan::EngineError::GenerationBlocked { errors } = &err {
                for issue in errors {
                    eprintln!("  [{}] {}: {}", issue.field, issue.message, issue.suggestion);
                }
            }
            std::process::exit(1);
        }
    };

    let meta = &outcome.metadata;
    eprintln!(
        "program: {} lines, {} bytes, estimated {:.0} s ({:.0} mm of travel)",
        meta.line_count,
        meta.byte_size,
        meta.time_estimate.total_time,
        meta.time_estimate.total_distance
    );

    match out_path {
        Some(path) => std::fs::write(&path, &outcome.program)
            .with_context(|| format!("writing {}", path.display()))?,
        None => print!("{}", outcome.program),
    }
    Ok(())
}
