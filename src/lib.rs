pub mod aggregate;
pub mod chatbot;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod intent;
pub mod llm;
