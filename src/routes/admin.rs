use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::{domain::subscriber::Subscriber, intake::IntakePipeline};

#[derive(Serialize, Debug)]
pub struct SubscribersResponse {
    pub subscribers: Vec<Subscriber>,
    pub total: usize,
}

#[tracing::instrument(name = "Listing local subscribers", skip(pipeline))]
pub async fn handle_list_subscribers(pipeline: web::Data<IntakePipeline>) -> HttpResponse {
    let subscribers = pipeline.store().list().await;
    let total = subscribers.len();

    HttpResponse::Ok().json(SubscribersResponse { subscribers, total })
}
