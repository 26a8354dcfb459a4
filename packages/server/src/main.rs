#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Vitibrasil API server binary.
//!
//! Configured through environment variables; see
//! [`vitibrasil_server::config`].

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    vitibrasil_server::run_server().await
}
