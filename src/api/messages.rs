//! Bullet message endpoints

use crate::api::ExtractPage;
use crate::api::error::ApiError;
use crate::core::traits::MessageService;
use crate::core::validation::validate_message;
use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use di_axum::Inject;

pub fn router() -> Router {
    Router::new()
        .route("/messages", get(list_messages).post(post_message))
        .route("/messages/:id", get(get_message))
        .route("/messages/:id/like", post(like_message))
}

async fn post_message(
    Inject(message_service): Inject<dyn MessageService>,
    payload: Result<Json<schemas::CreateMessage>, JsonRejection>,
) -> Result<Json<schemas::MessageReceipt>, ApiError> {
    let Json(request) = payload?;
    let message = validate_message(request.content, &request.option)?;

    let message_id = message_service.submit_message(message).await?;

    Ok(Json(schemas::MessageReceipt {
        success: true,
        message_id,
    }))
}

async fn list_messages(
    Inject(message_service): Inject<dyn MessageService>,
    ExtractPage(page): ExtractPage,
) -> Result<Json<schemas::MessagesList>, ApiError> {
    let (messages, total) = message_service.list_messages(page).await?;

    Ok(Json(schemas::MessagesList {
        messages: messages.into_iter().map(schemas::Message::from).collect(),
        total,
    }))
}

async fn get_message(
    Inject(message_service): Inject<dyn MessageService>,
    Path(message_id): Path<String>,
) -> Result<Json<schemas::Message>, ApiError> {
    let message = message_service.get_message(&message_id).await?;
    Ok(Json(message.into()))
}

async fn like_message(
    Inject(message_service): Inject<dyn MessageService>,
    Path(message_id): Path<String>,
) -> Result<Json<schemas::LikeReceipt>, ApiError> {
    let likes = message_service.like_message(&message_id).await?;
    Ok(Json(schemas::LikeReceipt {
        success: true,
        likes,
    }))
}

pub mod schemas {
    use crate::infrastructure::entities;
    use crate::infrastructure::entities::VoteOption;
    use serde::{Deserialize, Serialize};

    #[derive(Deserialize, Debug)]
    pub struct CreateMessage {
        pub content: String,
        pub option: String,
    }

    #[derive(Serialize, Debug)]
    pub struct MessageReceipt {
        pub success: bool,
        pub message_id: String,
    }

    #[derive(Serialize, Debug)]
    pub struct Message {
        pub id: String,
        pub content: String,
        pub option: VoteOption,
        pub likes: i64,
        pub timestamp: String,
    }

    impl From<entities::Message> for Message {
        fn from(message: entities::Message) -> Self {
            Message {
                id: message.id,
                content: message.content,
                option: message.option,
                likes: message.likes,
                timestamp: message.timestamp,
            }
        }
    }

    #[derive(Serialize, Debug)]
    pub struct MessagesList {
        pub messages: Vec<Message>,
        pub total: i64,
    }

    #[derive(Serialize, Debug)]
    pub struct LikeReceipt {
        pub success: bool,
        pub likes: i64,
    }
}
