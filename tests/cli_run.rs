// tests/cli_run.rs

mod common;
use crate::common::{init_tracing, with_timeout, TestResult};

use clap::Parser;
use flowdag::cli::CliArgs;
use flowdag::types::GraphShape;

#[test]
fn defaults_parse() -> TestResult {
    let args = CliArgs::try_parse_from(["flowdag"])?;
    assert_eq!(args.shape, GraphShape::Fan);
    assert_eq!(args.width, 8);
    assert_eq!(args.rounds, 4);
    assert!(args.workers.is_none());
    assert!(!args.dry_run);
    Ok(())
}

#[test]
fn unknown_shape_is_rejected() {
    assert!(CliArgs::try_parse_from(["flowdag", "--shape", "star"]).is_err());
}

#[tokio::test]
async fn dry_run_does_not_execute() -> TestResult {
    init_tracing();

    let args = CliArgs::try_parse_from(["flowdag", "--dry-run", "--workers", "2"])?;
    with_timeout(flowdag::run(args)).await?;
    Ok(())
}

#[tokio::test]
async fn small_diamond_run_completes() -> TestResult {
    init_tracing();

    let args = CliArgs::try_parse_from([
        "flowdag",
        "--workers",
        "2",
        "--shape",
        "diamond",
        "--width",
        "3",
        "--rounds",
        "3",
        "--work-ms",
        "0",
    ])?;
    with_timeout(flowdag::run(args)).await?;
    Ok(())
}

#[tokio::test]
async fn zero_workers_flag_fails() {
    init_tracing();

    let args = CliArgs::try_parse_from(["flowdag", "--workers", "0"]).expect("parses");
    assert!(with_timeout(flowdag::run(args)).await.is_err());
}
