use crate::db::PostStore;
use actix_web::{web, HttpResponse};
use board_types::ServiceStatus;

const LIVENESS_MESSAGE: &str = "Copy";

/// `GET /` - fixed payload, no dependencies touched.
pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(ServiceStatus {
        message: LIVENESS_MESSAGE.to_string(),
    })
}

/// `GET /health/ready` - 200 once the post store answers a count.
pub async fn readiness(store: web::Data<dyn PostStore>) -> HttpResponse {
    match store.count().await {
        Ok(_) => HttpResponse::Ok().json(ServiceStatus {
            message: "ready".to_string(),
        }),
        Err(err) => {
            tracing::warn!("readiness check failed: {}", err);
            HttpResponse::ServiceUnavailable().json(ServiceStatus {
                message: "storage unavailable".to_string(),
            })
        }
    }
}
