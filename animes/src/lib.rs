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

//! REST service that manages a catalog of animes.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use animes_authn::model::{Password, Role, Roles, User};
use animes_core::env::get_optional_var;
use animes_core::model::Username;
use std::fmt;

pub(crate) mod db;
pub(crate) mod driver;
pub(crate) mod model;
mod rest;

/// Port to listen on when the configuration does not specify one.
const DEFAULT_PORT: u16 = 8080;

/// Configuration of the service itself, as opposed to the configuration of its dependencies.
pub struct ServiceOptions {
    /// TCP port to listen on, on all interfaces.
    port: u16,

    /// Credentials of an administrator to create at startup if it does not exist yet.
    bootstrap_admin: Option<(Username, Password)>,
}

impl fmt::Debug for ServiceOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceOptions")
            .field("port", &self.port)
            .field("bootstrap_admin", &self.bootstrap_admin.as_ref().map(|(username, _)| username))
            .finish()
    }
}

impl ServiceOptions {
    /// Creates a set of options from environment variables whose name is prefixed with the given
    /// `prefix`.
    ///
    /// This will use variables such as `<prefix>_PORT`, `<prefix>_BOOTSTRAP_USERNAME` and
    /// `<prefix>_BOOTSTRAP_PASSWORD`.  All of them are optional, but the bootstrap credentials
    /// must be given together.
    pub fn from_env(prefix: &str) -> Result<ServiceOptions, String> {
        let port = get_optional_var::<u16>(prefix, "PORT")?.unwrap_or(DEFAULT_PORT);

        let username = get_optional_var::<String>(prefix, "BOOTSTRAP_USERNAME")?;
        let password = get_optional_var::<String>(prefix, "BOOTSTRAP_PASSWORD")?;
        let bootstrap_admin = match (username, password) {
            (Some(username), Some(password)) => Some((
                Username::new(username).map_err(|e| format!("Invalid bootstrap username: {}", e))?,
                Password::new(password).map_err(|e| format!("Invalid bootstrap password: {}", e))?,
            )),
            (None, None) => None,
            _ => {
                return Err(format!(
                    "{0}_BOOTSTRAP_USERNAME and {0}_BOOTSTRAP_PASSWORD must be set together",
                    prefix
                ));
            }
        };

        Ok(ServiceOptions { port, bootstrap_admin })
    }
}

/// Builds the administrator to create at startup from its `username` and `password`.
fn bootstrap_user(username: Username, password: Password) -> Result<User, String> {
    let password = password.hash().map_err(|e| format!("Cannot hash bootstrap password: {}", e))?;
    Ok(User::new(username, password)
        .with_name("Administrator")
        .with_roles(Roles::from([Role::User, Role::Admin])))
}

/// Waits until the process is asked to terminate.
#[cfg(feature = "postgres")]
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Cannot listen for the shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down");
}

/// Instantiates all resources to serve the application as configured by `opts` and backed by
/// the database described by `db_opts`.
///
/// While it'd be nice to push this responsibility to `main`, doing so would force us to expose many
/// crate-internal types to the public, which in turn would make dead code detection harder.
#[cfg(feature = "postgres")]
pub async fn serve(
    opts: ServiceOptions,
    db_opts: animes_core::db::postgres::PostgresOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    use animes_authn::db::PostgresCredentialStore;
    use animes_authn::driver::AuthnDriver;
    use animes_core::db::postgres::PostgresDb;
    use db::PostgresAnimeRepository;
    use driver::Driver;
    use std::net::{Ipv4Addr, SocketAddr};
    use std::sync::Arc;

    let db = PostgresDb::connect(db_opts)?;

    let repo = PostgresAnimeRepository::new(db.clone());
    repo.init_schema().await?;
    let store = PostgresCredentialStore::new(db.clone());
    store.init_schema().await?;

    let authn = AuthnDriver::new(Arc::from(store), rest::security_policy(), rest::REALM);
    if let Some((username, password)) = opts.bootstrap_admin {
        authn.clone().ensure_user(bootstrap_user(username, password)?).await?;
    }

    let app = rest::app(Driver::new(Arc::from(repo)), authn);

    let listener =
        tokio::net::TcpListener::bind(SocketAddr::from((Ipv4Addr::UNSPECIFIED, opts.port)))
            .await?;
    log::info!("Listening on {}", listener.local_addr()?);
    let result = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await;

    db.close().await;
    result?;
    Ok(())
}
