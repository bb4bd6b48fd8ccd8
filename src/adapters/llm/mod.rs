//! LLM adapter module. Implements LlmPort for the coaching backend.
//!
//! Provides the HTTP agent-chat adapter and a mock adapter for offline use and tests.

pub mod agent_chat_adapter;
pub mod mock_adapter;

pub use agent_chat_adapter::AgentChatAdapter;
pub use mock_adapter::MockLlmAdapter;
