use actix_multipart::form::text::Text;
use actix_multipart::form::{MultipartForm, MultipartFormConfig};
use actix_multipart::MultipartError;
use actix_web::error::{InternalError, JsonPayloadError, UrlencodedError};
use actix_web::http::StatusCode;
use actix_web::{web, Either, HttpRequest, HttpResponse, ResponseError};
use serde::Serialize;

use crate::{
    domain::{intake_channel::IntakeChannel, new_subscriber::SubscriptionForm},
    intake::{IntakeOutcome, IntakePipeline},
    subscriber_store::StoreError,
};

const INVALID_EMAIL_MESSAGE: &str = "Please provide a valid email address.";
const ALREADY_SUBSCRIBED_MESSAGE: &str = "You are already subscribed!";
const SERVER_ERROR_MESSAGE: &str = "Something went wrong. Please try again later.";

/// The site forms post `FormData` (multipart), plain HTML forms post url encoded bodies and
/// scripts tend to send JSON. All three are accepted.
pub type SubscriptionPayload = Either<
    MultipartForm<SubscriptionMultipart>,
    Either<web::Form<SubscriptionForm>, web::Json<SubscriptionForm>>,
>;

/// Multipart twin of [`SubscriptionForm`]. Unknown fields are ignored.
#[derive(MultipartForm)]
pub struct SubscriptionMultipart {
    email: Option<Text<String>>,
    source: Option<Text<String>>,
}

impl From<SubscriptionMultipart> for SubscriptionForm {
    fn from(multipart: SubscriptionMultipart) -> Self {
        SubscriptionForm {
            email: multipart.email.map(|email| email.0),
            source: multipart.source.map(|source| source.0),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct IntakeResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IntakeResponse {
    fn success(message: &str) -> Self {
        IntakeResponse {
            success: true,
            message: message.to_string(),
            error: None,
        }
    }

    fn failure(message: &str, error: Option<String>) -> Self {
        IntakeResponse {
            success: false,
            message: message.to_string(),
            error,
        }
    }
}

#[tracing::instrument(name = "Subscribing to the newsletter", skip(payload, pipeline))]
pub async fn handle_subscribe(
    payload: SubscriptionPayload,
    pipeline: web::Data<IntakePipeline>,
) -> Result<HttpResponse, SubscribeError> {
    subscribe(payload, &pipeline, &IntakeChannel::NEWSLETTER).await
}

#[tracing::instrument(name = "Subscribing from the arcade", skip(payload, pipeline))]
pub async fn handle_game_subscribe(
    payload: SubscriptionPayload,
    pipeline: web::Data<IntakePipeline>,
) -> Result<HttpResponse, SubscribeError> {
    subscribe(payload, &pipeline, &IntakeChannel::ARCADE).await
}

async fn subscribe(
    payload: SubscriptionPayload,
    pipeline: &IntakePipeline,
    channel: &IntakeChannel,
) -> Result<HttpResponse, SubscribeError> {
    let form = match payload {
        Either::Left(multipart) => multipart.0.into(),
        Either::Right(Either::Left(form)) => form.into_inner(),
        Either::Right(Either::Right(json)) => json.into_inner(),
    };
    let new_subscriber = form.into_new_subscriber(channel).map_err(|err| {
        tracing::error!("Validation error: {:?}", err);
        SubscribeError::Validation(err)
    })?;

    let outcome = pipeline.submit(new_subscriber).await.map_err(|err| {
        tracing::error!("Failed to store the new subscriber: {:?}", err);
        err
    })?;

    let message = match outcome {
        IntakeOutcome::Subscribed => channel.subscribed_message,
        IntakeOutcome::AlreadySubscribed => ALREADY_SUBSCRIBED_MESSAGE,
    };

    Ok(HttpResponse::Ok().json(IntakeResponse::success(message)))
}

/// Bodies that cannot be decoded at all get the same answer as an invalid email.
///
/// Every arm of [`SubscriptionPayload`] is tried in turn, so these handlers also run for the arms
/// that simply did not match the content type of a valid request.
pub fn subscription_form_config() -> web::FormConfig {
    web::FormConfig::default().error_handler(reject_payload::<UrlencodedError>)
}

pub fn subscription_json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(reject_payload::<JsonPayloadError>)
}

pub fn subscription_multipart_config() -> MultipartFormConfig {
    MultipartFormConfig::default().error_handler(reject_payload::<MultipartError>)
}

fn reject_payload<E>(err: E, _: &HttpRequest) -> actix_web::Error
where
    E: std::fmt::Debug + std::fmt::Display + 'static,
{
    tracing::debug!("Subscription payload did not decode: {}", err);
    let response =
        HttpResponse::BadRequest().json(IntakeResponse::failure(INVALID_EMAIL_MESSAGE, None));

    InternalError::from_response(err, response).into()
}

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("{0}")]
    Validation(String),
    #[error("Failed to store the new subscriber.")]
    Storage(#[from] StoreError),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscribeError::Validation(err) => write!(f, "Caused by:\n\t({})", err),
            SubscribeError::Storage(err) => write!(f, "Caused by:\n\t({:?})", err),
        }
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscribeError::Validation(_) => StatusCode::BAD_REQUEST,
            SubscribeError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            SubscribeError::Validation(_) => IntakeResponse::failure(INVALID_EMAIL_MESSAGE, None),
            SubscribeError::Storage(err) => {
                IntakeResponse::failure(SERVER_ERROR_MESSAGE, Some(err.to_string()))
            }
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
