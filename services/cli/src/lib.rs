mod cli;
mod commands;
mod infra;

use gojobs::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
