//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use server_actions::Trace;
use server_actions::doc::ApiDoc;
use server_actions::inbound::http::configure_actions;
use server_actions::inbound::http::state::HttpState;

#[derive(Clone)]
struct AppDependencies {
    http_state: web::Data<HttpState>,
    docs_enabled: bool,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        http_state,
        docs_enabled,
    } = deps;

    App::new()
        .app_data(http_state)
        .wrap(Trace)
        .configure(configure_actions)
        .configure(|cfg| {
            if docs_enabled {
                cfg.service(
                    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()),
                );
            }
        })
}

/// Construct an Actix HTTP server using the provided configuration.
///
/// # Parameters
/// - `config`: pre-built [`ServerConfig`] containing the bind address, the
///   identity provider endpoint, and the docs toggle.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when building the identity client, binding
/// the socket, or starting the server fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let http_state = build_http_state(&config)?;
    let ServerConfig {
        bind_addr,
        docs_enabled,
        ..
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            http_state: http_state.clone(),
            docs_enabled,
        })
    })
    .bind(bind_addr)?
    .run();

    Ok(server)
}
