use async_trait::async_trait;

use crate::domain::ticket::TicketDraft;
use crate::error::AppResult;

#[async_trait]
pub trait LanguageModelService: Send + Sync {
    async fn draft_ticket(&self, rough_input: &str) -> AppResult<TicketDraft>;
}
