use utoipa::OpenApi;

/// Service-level document info; domain paths are merged in by [`ApiDoc`].
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Accounts API",
        version = "0.1.0",
        description = "User registration and management"
    ),
    components(schemas(axum_helpers::HealthResponse, axum_helpers::PingResponse))
)]
struct BaseDoc;

/// Combined OpenAPI document served at `/api-docs/openapi.json`.
///
/// Domain routers are merged at the root with their full paths, so their
/// documents are merged the same way rather than nested.
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        let mut doc = BaseDoc::openapi();
        doc.merge(domain_users::ApiDoc::openapi());
        doc
    }
}
