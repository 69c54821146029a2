pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Module};
use serde_json::json;

use store::BookStore;

/// Books module: CRUD over the `books` table
pub struct BooksModule {
    store: Arc<dyn BookStore>,
}

impl BooksModule {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    fn base_path(&self) -> String {
        "/books".to_string()
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        self.store
            .ensure_schema()
            .await
            .context("unable to create books table")?;

        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(Arc::clone(&self.store))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error_response = json!({
            "description": "Error",
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                }
            }
        });
        let message_response = json!({
            "description": "Confirmation",
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/MessageResponse" }
                }
            }
        });
        let book_response = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/Book" }
                    }
                }
            })
        };
        let book_body = json!({
            "required": true,
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/BookPayload" }
                }
            }
        });
        let id_parameter = json!([{
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer", "format": "int32" }
        }]);

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "All books ordered by id",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Book" }
                                        }
                                    }
                                }
                            },
                            "500": error_response
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": book_body,
                        "responses": {
                            "201": book_response("Created book"),
                            "400": error_response,
                            "500": error_response
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a book by id",
                        "tags": ["Books"],
                        "parameters": id_parameter,
                        "responses": {
                            "200": book_response("The book"),
                            "400": error_response,
                            "404": error_response
                        }
                    },
                    "put": {
                        "summary": "Update a book",
                        "tags": ["Books"],
                        "parameters": id_parameter,
                        "requestBody": book_body,
                        "responses": {
                            "200": message_response,
                            "400": error_response,
                            "404": error_response,
                            "500": error_response
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": id_parameter,
                        "responses": {
                            "200": message_response,
                            "400": error_response,
                            "404": error_response,
                            "500": error_response
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int32" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "year": {
                                "type": "integer",
                                "format": "int32",
                                "description": "Publication year, 0 when unknown"
                            },
                            "created_at": { "type": "string", "format": "date-time" }
                        },
                        "required": ["id", "title", "author", "year", "created_at"]
                    },
                    "BookPayload": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "year": { "type": "integer", "format": "int32" }
                        },
                        "required": ["title", "author"]
                    },
                    "MessageResponse": {
                        "type": "object",
                        "properties": {
                            "message": { "type": "string" }
                        },
                        "required": ["message"]
                    }
                }
            }
        }))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(store: Arc<dyn BookStore>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}
