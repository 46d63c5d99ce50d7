//! Adapters implementing the application-layer ports

mod in_memory_task_registry;
mod openrouter_completion_adapter;

pub use in_memory_task_registry::InMemoryTaskRegistry;
pub use openrouter_completion_adapter::OpenRouterCompletionAdapter;
