use super::*;
use uuid::Uuid;

async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
    let response = error.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn validation_errors_carry_fields() {
    let mut fields = ValidationErrors::new();
    fields.add("title", "العنوان مطلوب");
    let (status, json) = body_json(ContentError::Invalid(fields).into()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation failed");
    assert_eq!(json["fields"]["title"], "العنوان مطلوب");
}

#[tokio::test]
async fn plain_errors_omit_fields() {
    let (status, json) = body_json(ContentError::not_found("certificate", Uuid::nil()).into()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "certificate not found");
    assert!(json.get("fields").is_none());
}

#[test]
fn message_errors_map_to_gateway_statuses() {
    assert_eq!(ApiError::from(MessageError::EmailDisabled).status, StatusCode::SERVICE_UNAVAILABLE);
    let mail = MessageError::Mail(MailError::Delivery("timeout".into()));
    assert_eq!(ApiError::from(mail).status, StatusCode::BAD_GATEWAY);
    assert_eq!(ApiError::from(MessageError::NotFound(Uuid::nil())).status, StatusCode::NOT_FOUND);
}

#[test]
fn storage_errors_map_to_client_statuses() {
    assert_eq!(ApiError::from(StorageError::UnknownBucket("x".into())).status, StatusCode::BAD_REQUEST);
    assert_eq!(ApiError::from(StorageError::NotAnImage("text/plain".into())).status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(ApiError::from(StorageError::TooLarge { size: 2, limit: 1 }).status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[test]
fn auth_and_rate_limit_statuses() {
    assert_eq!(ApiError::from(AuthError::InvalidCredentials).status, StatusCode::UNAUTHORIZED);
    let limited = RateLimitExceeded { limit: 5, window_secs: 600 };
    assert_eq!(ApiError::from(limited).status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn internal_errors_hide_details() {
    let (status, json) = body_json(sqlx::Error::PoolTimedOut.into()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "internal error");
}
