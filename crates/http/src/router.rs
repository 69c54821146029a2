//! Router builder for the bookshelf HTTP server

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use uuid::{Timestamp, Uuid};

use bookshelf_kernel::{Module, ModuleRegistry};

/// Builder for constructing the main HTTP router
pub struct RouterBuilder {
    router: Router,
}

impl RouterBuilder {
    /// Create a new router builder
    pub fn new() -> Self {
        Self {
            router: Router::new(),
        }
    }

    /// Add a route to the router
    pub fn route(mut self, path: &str, route: axum::routing::MethodRouter) -> Self {
        self.router = self.router.route(path, route);
        self
    }

    /// Mount a module's router under its base path. A base path of `/` merges
    /// the module routes into the root router.
    pub fn mount_module(mut self, module: &dyn Module) -> Self {
        let base_path = module.base_path();
        let module_router = module.routes();

        tracing::info!(module = module.name(), base_path = %base_path, "mounting module routes");

        self.router = if base_path == "/" {
            self.router.merge(module_router)
        } else {
            self.router.nest(&base_path, module_router)
        };
        self
    }

    /// Add tracing middleware
    pub fn with_tracing(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
        );
        self
    }

    /// Add CORS middleware.
    ///
    /// `"*"` allows any origin. An empty list adds no layer, so browsers refuse
    /// cross-origin calls.
    pub fn with_cors(mut self, allowed_origins: &[String]) -> Self {
        if allowed_origins.is_empty() {
            tracing::info!("no CORS origins configured; cross-origin requests are denied");
            return self;
        }

        let allow_origin = if allowed_origins.iter().any(|origin| origin == "*") {
            AllowOrigin::from(Any)
        } else {
            let origins: Vec<HeaderValue> = allowed_origins
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(%origin, "ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();
            AllowOrigin::list(origins)
        };

        self.router = self.router.layer(
            CorsLayer::new()
                .allow_origin(allow_origin)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
                .max_age(Duration::from_secs(300)),
        );
        self
    }

    /// Add request ID middleware; the generated id is echoed on the response
    pub fn with_request_id(mut self) -> Self {
        self.router = self
            .router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7));
        self
    }

    /// Add timeout middleware
    #[allow(deprecated)]
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.router = self
            .router
            .layer(TimeoutLayer::new(Duration::from_millis(timeout_ms)));
        self
    }

    /// Serve a merged OpenAPI document built from every module's fragment
    pub fn with_openapi(mut self, registry: &ModuleRegistry) -> Self {
        let merged = merge_openapi(registry);

        // Prefer utoipa's normalized form; keep the raw merge if it does not fit the model
        let document = serde_json::from_value::<utoipa::openapi::OpenApi>(merged.clone())
            .and_then(|openapi| serde_json::to_value(&openapi))
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "merged OpenAPI document does not match the OpenAPI model");
                merged
            });

        self.router = self.router.route(
            "/docs/openapi.json",
            get(move || async move { axum::Json(document.clone()) }),
        );

        self
    }

    /// Build the final router
    pub fn build(self) -> Router {
        self.router
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Join a module base path and a module-relative OpenAPI path.
fn join_path(base_path: &str, path: &str) -> String {
    let base = base_path.trim_end_matches('/');
    match path {
        "" | "/" if base.is_empty() => "/".to_string(),
        "" | "/" => base.to_string(),
        _ => format!("{base}{path}"),
    }
}

fn merge_openapi(registry: &ModuleRegistry) -> serde_json::Value {
    let mut openapi_spec = serde_json::json!({
        "openapi": "3.1.0",
        "info": {
            "title": "Bookshelf API",
            "version": "1.0.0",
            "description": "Book catalogue and URL normalization service"
        },
        "paths": {},
        "components": {
            "schemas": {}
        }
    });

    openapi_spec["components"]["schemas"]["ErrorResponse"] = serde_json::json!({
        "type": "object",
        "properties": {
            "error": {
                "type": "object",
                "properties": {
                    "code": { "type": "string" },
                    "message": { "type": "string" },
                    "details": { "type": "array", "items": { "type": "object" } },
                    "trace_id": { "type": "string" },
                    "timestamp": { "type": "string" }
                },
                "required": ["code", "message", "trace_id", "timestamp"]
            }
        },
        "required": ["error"]
    });

    openapi_spec["paths"]["/healthz"] = serde_json::json!({
        "get": {
            "summary": "Health check",
            "responses": {
                "200": {
                    "description": "OK",
                    "content": {
                        "text/plain": { "schema": { "type": "string" } }
                    }
                }
            }
        }
    });

    for module in registry.modules() {
        let Some(module_spec) = module.openapi() else {
            continue;
        };
        let base_path = module.base_path();

        if let Some(paths) = module_spec.get("paths").and_then(|p| p.as_object()) {
            for (path, path_item) in paths {
                openapi_spec["paths"][join_path(&base_path, path)] = path_item.clone();
            }
        }

        if let Some(schemas) = module_spec
            .get("components")
            .and_then(|c| c.get("schemas"))
            .and_then(|s| s.as_object())
        {
            for (schema_name, schema_def) in schemas {
                openapi_spec["components"]["schemas"][schema_name] = schema_def.clone();
            }
        }
    }

    openapi_spec
}

/// UUIDv7 request id generator, so ids sort by arrival time
#[derive(Clone, Copy)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let timestamp = Timestamp::now(uuid::NoContext);
        let request_id = Uuid::new_v7(timestamp)
            .to_string()
            .parse::<HeaderValue>()
            .ok()?;
        Some(RequestId::new(request_id))
    }
}
