//! Chat service — prompt assembly, completion and the apology path.

use asesor_core::cta;
use asesor_core::llm::{ChatMessage, CompletionClient, LlmError, Role};
use asesor_core::profile::{BusinessProfile, ProfileError, ProfileSource};
use asesor_core::prompt::SystemPrompt;
use asesor_core::rates::RateService;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::DEFAULT_HISTORY_LIMIT;
use crate::models::{ChatRequest, ChatResponse, HistoryTurn};

/// Shown whenever a reply cannot be generated.
pub const APOLOGY: &str = "Lo siento, tuve un problema con el cálculo. ¿Podemos continuar por WhatsApp para darte el precio exacto?";

/// Shown when the customer sends an empty message.
pub const GREETING: &str = "¡Hola! ¿En qué puedo ayudarle hoy?";

/// Failures that end in an apology.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Everything needed to answer a chat message.
#[derive(Debug, Clone)]
pub struct ChatService {
    rates: RateService,
    llm: CompletionClient,
    profiles: ProfileSource,
    history_limit: usize,
}

impl ChatService {
    pub fn new(rates: RateService, llm: CompletionClient, profiles: ProfileSource) -> Self {
        Self {
            rates,
            llm,
            profiles,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn rates(&self) -> &RateService {
        &self.rates
    }

    pub fn profiles(&self) -> &ProfileSource {
        &self.profiles
    }

    /// Answer a chat request. Never fails: errors become [`APOLOGY`].
    pub async fn reply(&self, request: ChatRequest) -> ChatResponse {
        let message = request.mensaje.trim();
        if message.is_empty() {
            return ChatResponse {
                respuesta: GREETING.to_string(),
                mostrar_whatsapp: false,
                whatsapp_url: None,
            };
        }

        let history = request.historial.as_deref().unwrap_or_default();
        match self.try_reply(message, history).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "chat reply failed, apologizing");
                self.apology()
            }
        }
    }

    /// The apology reply, with the contact button enabled.
    pub fn apology(&self) -> ChatResponse {
        ChatResponse {
            respuesta: APOLOGY.to_string(),
            mostrar_whatsapp: true,
            whatsapp_url: self
                .profiles
                .load()
                .ok()
                .and_then(|p| p.whatsapp_link()),
        }
    }

    async fn try_reply(
        &self,
        message: &str,
        history: &[HistoryTurn],
    ) -> Result<ChatResponse, ChatError> {
        let profile = self.profiles.load()?;
        let rate = self.rates.current().await;
        debug!(rate = rate.value, origin = ?rate.origin, "rendering prompt");

        let prompt = SystemPrompt::render(&profile, rate.value);
        let messages = build_messages(prompt, history, message, self.history_limit);
        let text = self.llm.complete(&messages).await?;

        Ok(respond(&profile, message, text))
    }
}

fn respond(profile: &BusinessProfile, message: &str, text: String) -> ChatResponse {
    ChatResponse {
        mostrar_whatsapp: cta::wants_contact(message, &text),
        respuesta: text,
        whatsapp_url: profile.whatsapp_link(),
    }
}

/// System prompt, then the last `limit` usable prior turns, then the new
/// message. Client-supplied system turns and empty turns are dropped.
pub fn build_messages(
    prompt: SystemPrompt,
    history: &[HistoryTurn],
    message: &str,
    limit: usize,
) -> Vec<ChatMessage> {
    let turns: Vec<ChatMessage> = history.iter().filter_map(history_turn).collect();
    let skip = turns.len().saturating_sub(limit);

    let mut messages = Vec::with_capacity(turns.len() - skip + 2);
    messages.push(ChatMessage::system(prompt.into_string()));
    messages.extend(turns.into_iter().skip(skip));
    messages.push(ChatMessage::user(message));
    messages
}

fn history_turn(turn: &HistoryTurn) -> Option<ChatMessage> {
    let content = turn.content.trim();
    if content.is_empty() {
        return None;
    }
    let role = match turn.role.trim().to_ascii_lowercase().as_str() {
        "user" | "usuario" => Role::User,
        "assistant" | "bot" | "model" => Role::Assistant,
        _ => return None,
    };
    Some(ChatMessage {
        role,
        content: content.to_string(),
    })
}
