// API layer - HTTP endpoints
pub mod admin;
pub mod auth;
pub mod evaluation;
pub mod first_access_gate;
pub mod health;
pub mod program;

pub use admin::AdminApi;
pub use auth::AuthApi;
pub use evaluation::EvaluationApi;
pub use first_access_gate::FirstAccessGate;
pub use health::HealthApi;
pub use program::ProgramApi;

use std::sync::Arc;

use poem::{middleware::Tracing, Endpoint, EndpointExt, Route};
use poem_openapi::{auth::Bearer, OpenApiService, SecurityScheme};

use crate::app_data::AppData;

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(ty = "bearer", key_name = "Authorization", key_in = "header", bearer_format = "JWT")]
pub struct BearerAuth(pub Bearer);

pub type Apis = (HealthApi, AuthApi, AdminApi, ProgramApi, EvaluationApi);

/// All API groups sharing one AppData
pub fn apis(app_data: Arc<AppData>) -> Apis {
    (
        HealthApi::new(app_data.db.clone()),
        AuthApi::new(app_data.clone()),
        AdminApi::new(app_data.clone()),
        ProgramApi::new(app_data.clone()),
        EvaluationApi::new(app_data),
    )
}

/// OpenAPI service mounted under `/api`
pub fn openapi_service(app_data: Arc<AppData>, server_url: &str) -> OpenApiService<Apis, ()> {
    OpenApiService::new(apis(app_data), "EstagioGO API", env!("CARGO_PKG_VERSION")).server(server_url)
}

/// Full application: API under `/api`, Swagger UI under `/swagger`, behind the first-access gate
pub fn build_app(app_data: Arc<AppData>, server_url: &str) -> impl Endpoint {
    let api_service = openapi_service(app_data.clone(), &format!("{}/api", server_url.trim_end_matches('/')));
    let ui = api_service.swagger_ui();

    Route::new()
        .nest("/api", api_service)
        .nest("/swagger", ui)
        .with(FirstAccessGate::new(app_data))
        .with(Tracing)
}
