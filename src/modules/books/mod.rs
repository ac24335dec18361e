pub mod error;
pub mod models;
pub mod routes;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;
use shelf_kernel::{InitCtx, Migration, Module};

pub use error::BookError;
pub use service::{Actor, BookService};

/// Catalog CRUD under `/api/books`
pub struct BooksModule {
    service: Arc<BookService>,
}

impl BooksModule {
    pub fn new(service: Arc<BookService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            actor = self.service.actor().as_str(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::books_router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };
        let id_param = json!([{
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "string" }
        }]);

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books, newest first",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "List of books",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Book" }
                                        }
                                    }
                                }
                            },
                            "500": error("Storage error")
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/BookInput" }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Created",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/BookSummary" }
                                    }
                                }
                            },
                            "400": error("Missing required fields"),
                            "500": error("Storage error")
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "parameters": id_param,
                        "responses": {
                            "200": {
                                "description": "The book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            },
                            "404": error("Book not found"),
                            "500": error("Storage error")
                        }
                    },
                    "put": {
                        "summary": "Replace title, price and genre",
                        "tags": ["Books"],
                        "parameters": id_param,
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/BookInput" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Updated",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/BookSummary" }
                                    }
                                }
                            },
                            "400": error("Missing required fields"),
                            "500": error("Update failed, including an unknown id")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book and its cover image",
                        "tags": ["Books"],
                        "parameters": id_param,
                        "responses": {
                            "200": {
                                "description": "Deleted",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "id": { "type": "string" },
                                                "message": { "type": "string" }
                                            },
                                            "required": ["id", "message"]
                                        }
                                    }
                                }
                            },
                            "404": error("Book not found"),
                            "500": error("Storage error")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "title": { "type": "string" },
                            "price": { "type": "number" },
                            "genre": { "type": "string" },
                            "imageUrl": {
                                "type": "string",
                                "format": "uri",
                                "description": "Public cover URL, present once an image is attached"
                            },
                            "createdAt": { "type": "string", "format": "date-time" },
                            "updatedAt": { "type": "string", "format": "date-time" },
                            "createdBy": { "type": "string" },
                            "updatedBy": { "type": "string" }
                        },
                        "required": [
                            "id", "title", "price", "genre",
                            "createdAt", "updatedAt", "createdBy", "updatedBy"
                        ]
                    },
                    "BookInput": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "price": {
                                "oneOf": [{ "type": "number" }, { "type": "string" }],
                                "description": "Number or numeric string"
                            },
                            "genre": { "type": "string" }
                        },
                        "required": ["title", "price", "genre"]
                    },
                    "BookSummary": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "title": { "type": "string" },
                            "price": { "type": "number" },
                            "genre": { "type": "string" }
                        },
                        "required": ["id", "title", "price", "genre"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        shelf_db::books_migrations()
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

pub fn create_module(service: Arc<BookService>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(service))
}
