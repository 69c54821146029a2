pub mod models;
pub mod normalize;
pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Module};
use serde_json::json;

use normalize::UrlNormalizer;

/// URL processing module; its routes sit at the server root
pub struct UrlsModule {
    normalizer: Arc<UrlNormalizer>,
}

impl UrlsModule {
    pub fn new(normalizer: UrlNormalizer) -> Self {
        Self {
            normalizer: Arc::new(normalizer),
        }
    }
}

#[async_trait]
impl Module for UrlsModule {
    fn name(&self) -> &'static str {
        "urls"
    }

    fn base_path(&self) -> String {
        "/".to_string()
    }

    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            redirect_host = self.normalizer.redirect_host(),
            "urls module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(Arc::clone(&self.normalizer))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/process-url": {
                    "post": {
                        "summary": "Process a URL",
                        "description": "Apply canonical and/or redirection rules to a given URL",
                        "tags": ["URL"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/ProcessUrlRequest" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Processed URL",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ProcessUrlResponse" }
                                    }
                                }
                            },
                            "400": {
                                "description": "Invalid URL, operation, or body",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "ProcessUrlRequest": {
                        "type": "object",
                        "properties": {
                            "url": { "type": "string" },
                            "operation": {
                                "type": "string",
                                "enum": ["canonical", "redirection", "all"]
                            }
                        },
                        "required": ["url", "operation"]
                    },
                    "ProcessUrlResponse": {
                        "type": "object",
                        "properties": {
                            "processed_url": { "type": "string" }
                        },
                        "required": ["processed_url"]
                    }
                }
            }
        }))
    }
}

/// Create a new instance of the urls module
pub fn create_module(normalizer: UrlNormalizer) -> Arc<dyn Module> {
    Arc::new(UrlsModule::new(normalizer))
}
