use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use uuid::Uuid;

use crate::domain::order::{CreateOrder, CreateOrderHandler, FindOrder, FindOrderHandler, OrderError};
use crate::metrics::Metrics;

/// Shared state handed to every route
pub struct AppState {
    pub create_order: Arc<CreateOrderHandler>,
    pub find_order: Arc<FindOrderHandler>,
    pub metrics: Arc<Metrics>,
}

/// Maps order errors onto HTTP responses with a `{"error": ...}` body
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub OrderError);

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            OrderError::CustomerNotFound(_) | OrderError::ProductNotFound(_) => StatusCode::NOT_FOUND,
            OrderError::InsufficientQuantity { .. } | OrderError::InvalidQuantity { .. } => {
                StatusCode::BAD_REQUEST
            }
            OrderError::StockConflict { .. } => StatusCode::CONFLICT,
            OrderError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match &self.0 {
            OrderError::Repository(err) => {
                tracing::error!(error = %err, "Storage failure while handling request");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": message }))
    }
}

/// Register all routes on an actix-web service config
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/orders", web::post().to(create_order))
        .route("/orders/{id}", web::get().to(find_order))
        .route("/health", web::get().to(health_handler))
        .route("/metrics", web::get().to(metrics_handler));
}

async fn create_order(
    state: web::Data<AppState>,
    body: web::Json<CreateOrder>,
) -> Result<HttpResponse, ApiError> {
    let order = state.create_order.handle(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(order))
}

async fn find_order(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    match state.find_order.handle(FindOrder { id }).await? {
        Some(order) => Ok(HttpResponse::Ok().json(order)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Order not found: {id}")
        }))),
    }
}

async fn health_handler() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "order-service"
    }))
}

async fn metrics_handler(state: web::Data<AppState>) -> HttpResponse {
    match state.metrics.encode() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(body),
        Err(err) => {
            tracing::error!(error = %err, "Failed to encode metrics");
            HttpResponse::InternalServerError().finish()
        }
    }
}
