pub mod client;
pub mod engine;
pub mod provider;
pub mod response;
pub mod secrets;

pub use client::{
    SessionKey, ensure_engine, find_api_key, healthcheck, offer_to_save, reprompt_api_key,
    test_configured_api_key,
};
pub use engine::{ChatEngine, QuestionEngine};
pub use provider::{BackendConfig, CredentialSource, Provider};
pub use response::parse_quiz;
pub use secrets::{clear_api_key, store_api_key};
