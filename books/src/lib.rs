// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! REST service to manage a catalog of books.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use bookshelf_core::db::Db;
use bookshelf_core::env::get_optional_var;
use log::{info, warn};
use std::error::Error;
use std::sync::Arc;
use tokio::net::TcpListener;

pub mod db;
pub(crate) mod driver;
use driver::Driver;
pub(crate) mod model;
mod rest;
use rest::app;

/// Address to bind to when none is configured.
const DEFAULT_HOST: &str = "0.0.0.0";

/// Port to listen on when none is configured.
const DEFAULT_PORT: u16 = 8000;

/// Options to establish the listening socket of the server.
#[derive(Debug, PartialEq)]
pub struct ServeOptions {
    /// Host name or address to bind to.
    pub host: String,

    /// Port to listen on.
    pub port: u16,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self { host: DEFAULT_HOST.to_owned(), port: DEFAULT_PORT }
    }
}

impl ServeOptions {
    /// Initializes a set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This will use variables such as `<prefix>_HOST` and `<prefix>_PORT`, falling back to the
    /// defaults for any that are not set.
    pub fn from_env(prefix: &str) -> Result<ServeOptions, String> {
        let defaults = ServeOptions::default();
        Ok(ServeOptions {
            host: get_optional_var::<String>(prefix, "HOST")?.unwrap_or(defaults.host),
            port: get_optional_var::<u16>(prefix, "PORT")?.unwrap_or(defaults.port),
        })
    }
}

/// Waits until the process is asked to terminate.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for termination signals: {}", e);
        futures::future::pending::<()>().await;
    }
}

/// Instantiates all resources to serve the application as configured by `opts`, persisting
/// data into `db`.
///
/// This lives in the library so that `main` does not need to see the crate-internal driver and
/// router types.
pub async fn serve(
    opts: ServeOptions,
    db: Arc<dyn Db + Send + Sync>,
) -> Result<(), Box<dyn Error>> {
    let driver = Driver::new(db.clone());
    let app = app(driver);

    let listener = TcpListener::bind((opts.host.as_str(), opts.port)).await?;
    info!("Listening on {}", listener.local_addr()?);

    let result = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await;

    info!("Shutting down");
    db.close().await;
    result?;
    Ok(())
}
