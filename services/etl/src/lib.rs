mod cli;

use rental_feed::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
