//! Recursive families: kinds that nest within each other without bound.
//!
//! Each family says which of its kinds are composite (expanded by the
//! engine), which children are structural (converted through the registry
//! and placed first), and which shapes are valid. The policies in
//! [`crate::policy`] adapt a family to either conversion direction.

mod content;
mod operators;
mod rules;
mod sections;

pub use content::ContentFamily;
pub use operators::OperatorFamily;
pub use rules::RuleFamily;
pub use sections::SectionFamily;

use qti_model::ComponentKind;
use std::fmt::Debug;

pub trait Family: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    /// Whether the engine expands `kind` instead of converting it in one shot.
    fn is_composite(&self, kind: ComponentKind) -> bool;

    /// Whether the child at element `position` is owned by `parent` itself
    /// rather than being a family member.
    ///
    /// `child` is `None` when the child's tag is not registered.
    fn is_structural(
        &self,
        _parent: ComponentKind,
        _position: usize,
        _child: Option<ComponentKind>,
    ) -> bool {
        false
    }

    /// Reject a member child before it is converted.
    fn check_member(
        &self,
        _parent: ComponentKind,
        _child: Option<ComponentKind>,
    ) -> Result<(), String> {
        Ok(())
    }

    /// Validate the kinds of a finished node's children, structural ones included.
    fn check_shape(&self, parent: ComponentKind, children: &[ComponentKind]) -> Result<(), String> {
        let arity = parent.arity();
        if arity.allows(children.len()) {
            Ok(())
        } else {
            Err(format!(
                "must have {} children, found {}",
                arity,
                children.len()
            ))
        }
    }
}

pub static OPERATORS: OperatorFamily = OperatorFamily;
pub static CONTENT: ContentFamily = ContentFamily;
pub static RESPONSE_RULES: RuleFamily = RuleFamily::RESPONSE;
pub static OUTCOME_RULES: RuleFamily = RuleFamily::OUTCOME;
pub static TEMPLATE_RULES: RuleFamily = RuleFamily::TEMPLATE;
pub static SECTIONS: SectionFamily = SectionFamily;

pub static FAMILIES: [&dyn Family; 6] = [
    &OPERATORS,
    &CONTENT,
    &RESPONSE_RULES,
    &OUTCOME_RULES,
    &TEMPLATE_RULES,
    &SECTIONS,
];

/// The family in which `kind` is composite, if any.
pub fn family_of(kind: ComponentKind) -> Option<&'static dyn Family> {
    FAMILIES
        .iter()
        .copied()
        .find(|family| family.is_composite(kind))
}
