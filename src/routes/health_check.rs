use actix_web::HttpResponse;

/// Used by the load balancer to know if the server is up
#[tracing::instrument(name = "Health check")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}
