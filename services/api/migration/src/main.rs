use sea_orm_migration::prelude::*;

mod m20260815_000001_create_users;
mod m20260815_000002_create_verification_codes;
mod m20260815_000003_create_sessions;
mod m20260815_000004_create_admin_sessions;
mod m20260815_000005_create_addresses;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260815_000001_create_users::Migration),
            Box::new(m20260815_000002_create_verification_codes::Migration),
            Box::new(m20260815_000003_create_sessions::Migration),
            Box::new(m20260815_000004_create_admin_sessions::Migration),
            Box::new(m20260815_000005_create_addresses::Migration),
        ]
    }
}

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
