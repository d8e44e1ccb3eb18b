mod cli;
mod infra;
mod render;

use kitsusa::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
