use super::Family;
use qti_model::{Category, ComponentKind};

/// Expressions built from sub-expressions: `and`, `sum`, `equal`, ...
///
/// Every element child is a member; non-operator expressions are leaves.
#[derive(Debug, Clone, Copy, Default)]
pub struct OperatorFamily;

impl Family for OperatorFamily {
    fn name(&self) -> &'static str {
        "operators"
    }

    fn is_composite(&self, kind: ComponentKind) -> bool {
        kind.has_category(Category::Operator)
    }
}
