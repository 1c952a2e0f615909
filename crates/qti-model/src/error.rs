//! Errors raised by component collections.

use crate::kind::ComponentKind;
use crate::schema::Arity;
use qti_diagnostics::{DiagnosticMessage, DiagnosticMessageBuilder};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("<{parent}> cannot contain <{child}>")]
    DisallowedChild {
        parent: ComponentKind,
        child: ComponentKind,
    },

    #[error("<{kind}> does not hold child components")]
    NotAContainer { kind: ComponentKind },

    #[error("<{kind}> must have {arity} children, found {found}")]
    ChildCount {
        kind: ComponentKind,
        arity: Arity,
        found: usize,
    },
}

impl ModelError {
    /// Convert this error to a DiagnosticMessage with the appropriate QTI-3-* code.
    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        match self {
            ModelError::DisallowedChild { parent, child } => {
                DiagnosticMessageBuilder::error("Disallowed Child Kind")
                    .with_code("QTI-3-1")
                    .problem(self.to_string())
                    .add_detail(format!("<{}> is not accepted inside <{}>", child, parent))
                    .build()
            }
            ModelError::NotAContainer { .. } => {
                DiagnosticMessageBuilder::error("Not A Container")
                    .with_code("QTI-3-2")
                    .problem(self.to_string())
                    .build()
            }
            ModelError::ChildCount { .. } => {
                DiagnosticMessageBuilder::error("Wrong Number Of Children")
                    .with_code("QTI-3-3")
                    .problem(self.to_string())
                    .build()
            }
        }
    }
}
