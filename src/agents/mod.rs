//! Persona agents.
//!
//! - [`parser`] - Normalizes raw completion replies into JSON objects
//! - [`result`] - Crisis / document result shapes and their fallbacks
//! - [`persona_agent`] - Binds a persona to a completion backend

pub mod parser;
pub mod persona_agent;
pub mod result;

pub use parser::{extract_structured, strip_code_fence, ParseError};
pub use persona_agent::{AgentError, PersonaAgent};
pub use result::{AgentOutput, CrisisResponse, DocumentAnalysis};
