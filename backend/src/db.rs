#[cfg(not(feature = "db-sqlite"))]
compile_error!("The `db-sqlite` feature must be enabled.");

#[cfg(feature = "db-sqlite")]
pub use sqlx::sqlite::{
    SqliteConnectOptions as DbConnectOptions, SqlitePool as DbPool,
    SqlitePoolOptions as DbPoolOptions,
};
