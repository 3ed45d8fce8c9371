use crate::{
    api::{ErrorResponse, USER_HEADER},
    client::persist::ReorderApi,
    domain::{BoardId, Card, CardId, ListId, OrderUpdate, UserId},
    error::{KanbanError, Result},
    service::{MoveCardRequest, ReorderCardsRequest, ReorderListsRequest},
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};

/// [`ReorderApi`] over HTTP against a running server
pub struct HttpReorderApi {
    client: Client,
    base_url: String,
    user: UserId,
}

impl HttpReorderApi {
    pub fn new(base_url: impl Into<String>, user: UserId) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user,
        }
    }

    fn patch(&self, path: &str) -> RequestBuilder {
        self.client
            .patch(format!("{}{}", self.base_url, path))
            .header(USER_HEADER, self.user.as_str())
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| KanbanError::Request(format!("{}: {}", what, e)))?;
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => status.to_string(),
        };
        Err(error_for_status(status, message))
    }
}

/// Maps an error response back onto the error taxonomy
fn error_for_status(status: StatusCode, message: String) -> KanbanError {
    match status {
        StatusCode::UNAUTHORIZED => KanbanError::Unauthorized,
        StatusCode::FORBIDDEN => KanbanError::Forbidden,
        StatusCode::NOT_FOUND => KanbanError::NotFound(
            message
                .strip_suffix(" not found")
                .map(str::to_string)
                .unwrap_or(message),
        ),
        StatusCode::BAD_REQUEST => KanbanError::BadInput(message),
        _ => KanbanError::Request(format!("{}: {}", status, message)),
    }
}

#[async_trait]
impl ReorderApi for HttpReorderApi {
    async fn reorder_lists(&self, board: &BoardId, lists: &[OrderUpdate<ListId>]) -> Result<()> {
        let body = ReorderListsRequest {
            lists: lists.to_vec(),
        };
        let request = self.patch(&format!("/boards/{}/lists", board)).json(&body);
        self.send(request, "reorder lists").await?;
        Ok(())
    }

    async fn reorder_cards(&self, cards: &[OrderUpdate<CardId>]) -> Result<()> {
        let body = ReorderCardsRequest {
            cards: cards.to_vec(),
        };
        self.send(self.patch("/cards/reorder").json(&body), "reorder cards")
            .await?;
        Ok(())
    }

    async fn move_card(&self, card: &CardId, list: &ListId) -> Result<Card> {
        let body = MoveCardRequest {
            list_id: list.clone(),
            order: None,
        };
        let request = self.patch(&format!("/cards/{}/move", card)).json(&body);
        let response = self.send(request, "move card").await?;
        response
            .json()
            .await
            .map_err(|e| KanbanError::Request(format!("parse moved card: {}", e)))
    }
}
