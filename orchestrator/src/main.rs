use std::{env, process::ExitCode};

use log::error;
use matrix::{MatrixSource, RandomSource};

use orchestrator::{Coordinator, OrchestratorError, Verdict, configs::load_run_config};

/// Operands and products larger than this are not printed.
const PRINT_LIMIT: usize = 20;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: orchestrator <config.json>");
        return ExitCode::FAILURE;
    };

    match run(&path).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(path: &str) -> Result<bool, OrchestratorError> {
    let config = load_run_config(path)?;
    let printable = config.rows_a <= PRINT_LIMIT && config.cols_b <= PRINT_LIMIT;

    println!(
        "generating random matrices for {} worker(s)",
        config.workers.len()
    );

    let mut source = RandomSource::from_seed_or_os(config.seed);
    let a = source
        .generate(config.rows_a, config.cols_a)
        .map_err(OrchestratorError::Source)?;
    let b = source
        .generate(config.cols_a, config.cols_b)
        .map_err(OrchestratorError::Source)?;

    if printable {
        println!("\nA =\n{a}\n\nB =\n{b}");
    } else {
        println!("\n(matrices too large to print, carrying on)");
    }

    let coordinator = Coordinator::new(config)?;
    let outcome = coordinator.run_with(a, b).await?;

    if printable {
        println!("\nC (distributed) =\n{}", outcome.product);
    }

    let ok = match outcome.verdict {
        Verdict::Match => {
            println!("\nverification: SUCCESS, the distributed product equals the serial one");
            true
        }
        Verdict::Mismatch {
            mismatched,
            diff_norm,
        } => {
            println!(
                "\nverification: FAILURE, {mismatched} element(s) differ, ||C - A*B|| = {diff_norm}"
            );
            false
        }
        Verdict::ShapeMismatch {
            distributed,
            reference,
        } => {
            println!(
                "\nverification: FAILURE, distributed product is {distributed:?} but A*B is {reference:?}"
            );
            false
        }
    };

    println!(
        "distributed: {:?}, serial: {:?}",
        outcome.distributed_time, outcome.serial_time
    );

    Ok(ok)
}
