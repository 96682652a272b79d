mod cli;
mod entries;
mod infra;
mod routes;
mod server;

use applications_form::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
