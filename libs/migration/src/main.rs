use migration::Migrator;
use sea_orm_migration::cli;

/// Schema CLI: `cargo run -p migration -- up|down|status|fresh`, reads `DATABASE_URL`.
#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
