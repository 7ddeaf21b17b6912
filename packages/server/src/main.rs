#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Screening map API server binary.
//!
//! Configured through `BIND_ADDR`, `PORT`, `DATA_DIR`, `PERIOD_COUNT`,
//! `MAP_CONFIG` and `RUST_LOG`.

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    screening_map_server::run_server().await
}
