mod cli;
mod demo;

use perf_metrics::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
