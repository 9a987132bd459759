//! Domain layer - Core business logic and entities

pub mod error;
pub mod llm;
pub mod workflow;

pub use error::DomainError;
pub use llm::{
    CompletionClient, CompletionDefaults, CompletionError, CompletionOptions,
    LlmProvider, LlmRequest, LlmRequestBuilder, LlmResponse, Message, MessageRole, Usage,
};
pub use workflow::{
    ExecutionContext, ExecutionRequest, ExecutionResult, PromptStep, RunReport, RunState,
    StepAction, StepError, StepStatus, StepTrace, TemplateError, WorkflowDefinition,
    WorkflowExecutor, WorkflowStep,
};
