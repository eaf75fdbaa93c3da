//! Wire payloads exchanged with the character-chat backend.
//!
//! The backend exposes two endpoints: `GET /new_session`, which mints an
//! opaque session identifier, and `POST /chat`, which takes one user turn
//! and returns the persona's reply. Replies may carry extra fields
//! (`character`, `session_id`); only `response` is read here.

use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct NewSessionResponse {
    pub session_id: String,
}

#[derive(Serialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub character: String,
    pub user_message: String,
}

#[derive(Deserialize)]
pub struct ChatResponse {
    pub response: String,
}
