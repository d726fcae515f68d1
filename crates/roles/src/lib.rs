//! The Role abstraction — a configured, reusable language-model persona.
//!
//! A role binds a fixed instruction set (per named operation) to optional
//! capabilities: a tool registry, a shared message window, a retrieval
//! filter. Invoking an operation follows one cycle:
//!
//! 1. **Render** the operation's template (every slot must be bound)
//! 2. **Assemble context** (system instructions + window snapshot +
//!    retrieved context + user content)
//! 3. **Send to the model** with the declared tool set
//! 4. **If tool calls**: execute them, fold results in, resubmit (depth
//!    bounded)
//! 5. **If text**: record the turn in the window and return it

pub mod presets;
pub mod role;

pub use role::{Role, bindings};

#[cfg(test)]
pub(crate) mod test_helpers;
