use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;
use shelf_kernel::{InitCtx, Module};

use super::books::{routes, BookService};

/// Cover image upload at `/api/upload`
pub struct UploadModule {
    service: Arc<BookService>,
}

impl UploadModule {
    pub fn new(service: Arc<BookService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Module for UploadModule {
    fn name(&self) -> &'static str {
        "upload"
    }

    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "upload module initialized");
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::upload_router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "post": {
                        "summary": "Attach a cover image to a book",
                        "description": "Writes the image under the book id, makes it public, then records it on the book.",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": {
                                            "imageBase64": {
                                                "type": "string",
                                                "format": "byte",
                                                "description": "Base64 image bytes or a data URL"
                                            },
                                            "bookId": { "type": "string" }
                                        },
                                        "required": ["imageBase64", "bookId"]
                                    }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Image stored",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "imageUrl": { "type": "string", "format": "uri" }
                                            },
                                            "required": ["imageUrl"]
                                        }
                                    }
                                }
                            },
                            "400": {
                                "description": "Missing required fields",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            },
                            "500": {
                                "description": "Upload failed",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }))
    }
}

pub fn create_module(service: Arc<BookService>) -> Arc<dyn Module> {
    Arc::new(UploadModule::new(service))
}
