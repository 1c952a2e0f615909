use super::Family;
use qti_model::{Category, ComponentKind};

/// Response, outcome or template rules: conditions, their branches and
/// rule fragments.
///
/// A condition holds one leading if branch, any number of else-if
/// branches and an optional trailing else. The expression an if or else-if
/// branch opens with is structural.
#[derive(Debug, Clone, Copy)]
pub struct RuleFamily {
    name: &'static str,
    condition: ComponentKind,
    if_branch: ComponentKind,
    else_if_branch: ComponentKind,
    else_branch: ComponentKind,
    fragment: Option<ComponentKind>,
}

impl RuleFamily {
    pub const RESPONSE: RuleFamily = RuleFamily {
        name: "response rules",
        condition: ComponentKind::ResponseCondition,
        if_branch: ComponentKind::ResponseIf,
        else_if_branch: ComponentKind::ResponseElseIf,
        else_branch: ComponentKind::ResponseElse,
        fragment: Some(ComponentKind::ResponseProcessingFragment),
    };

    pub const OUTCOME: RuleFamily = RuleFamily {
        name: "outcome rules",
        condition: ComponentKind::OutcomeCondition,
        if_branch: ComponentKind::OutcomeIf,
        else_if_branch: ComponentKind::OutcomeElseIf,
        else_branch: ComponentKind::OutcomeElse,
        fragment: Some(ComponentKind::OutcomeProcessingFragment),
    };

    pub const TEMPLATE: RuleFamily = RuleFamily {
        name: "template rules",
        condition: ComponentKind::TemplateCondition,
        if_branch: ComponentKind::TemplateIf,
        else_if_branch: ComponentKind::TemplateElseIf,
        else_branch: ComponentKind::TemplateElse,
        fragment: None,
    };

    fn is_branch(&self, kind: ComponentKind) -> bool {
        kind == self.if_branch || kind == self.else_if_branch || kind == self.else_branch
    }

    fn opens_with_expression(&self, kind: ComponentKind) -> bool {
        kind == self.if_branch || kind == self.else_if_branch
    }

    fn check_condition(&self, branches: &[ComponentKind]) -> Result<(), String> {
        let Some((first, rest)) = branches.split_first() else {
            return Err("has no branches".to_string());
        };
        if *first != self.if_branch {
            return Err(format!("must start with <{}>", self.if_branch));
        }
        for (i, kind) in rest.iter().enumerate() {
            let last = i + 1 == rest.len();
            if *kind == self.if_branch {
                return Err(format!("has more than one <{}>", self.if_branch));
            }
            if *kind == self.else_branch && !last {
                return Err(format!("must end with <{}>", self.else_branch));
            }
        }
        Ok(())
    }
}

impl Family for RuleFamily {
    fn name(&self) -> &'static str {
        self.name
    }

    fn is_composite(&self, kind: ComponentKind) -> bool {
        kind == self.condition || self.is_branch(kind) || Some(kind) == self.fragment
    }

    fn is_structural(
        &self,
        parent: ComponentKind,
        position: usize,
        _child: Option<ComponentKind>,
    ) -> bool {
        position == 0 && self.opens_with_expression(parent)
    }

    fn check_member(
        &self,
        parent: ComponentKind,
        child: Option<ComponentKind>,
    ) -> Result<(), String> {
        if parent != self.condition {
            return Ok(());
        }
        match child {
            Some(kind) if self.is_branch(kind) => Ok(()),
            _ => Err(format!("is not a branch of <{}>", self.condition)),
        }
    }

    fn check_shape(&self, parent: ComponentKind, children: &[ComponentKind]) -> Result<(), String> {
        if parent == self.condition {
            return self.check_condition(children);
        }
        if self.opens_with_expression(parent)
            && !children
                .first()
                .is_some_and(|kind| kind.has_category(Category::Expression))
        {
            return Err("must start with an expression".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ComponentKind::*;

    #[test]
    fn test_condition_shapes() {
        let rules = RuleFamily::RESPONSE;
        assert!(rules.check_shape(ResponseCondition, &[ResponseIf]).is_ok());
        assert!(
            rules
                .check_shape(
                    ResponseCondition,
                    &[ResponseIf, ResponseElseIf, ResponseElseIf, ResponseElse]
                )
                .is_ok()
        );
        assert_eq!(
            rules.check_shape(ResponseCondition, &[]),
            Err("has no branches".to_string())
        );
        assert_eq!(
            rules.check_shape(ResponseCondition, &[ResponseElse]),
            Err("must start with <responseIf>".to_string())
        );
        assert_eq!(
            rules.check_shape(ResponseCondition, &[ResponseIf, ResponseElse, ResponseElseIf]),
            Err("must end with <responseElse>".to_string())
        );
        assert_eq!(
            rules.check_shape(ResponseCondition, &[ResponseIf, ResponseIf]),
            Err("has more than one <responseIf>".to_string())
        );
    }

    #[test]
    fn test_branch_shapes() {
        let rules = RuleFamily::OUTCOME;
        assert!(rules.check_shape(OutcomeIf, &[Variable, SetOutcomeValue]).is_ok());
        assert!(rules.check_shape(OutcomeIf, &[And]).is_ok());
        assert_eq!(
            rules.check_shape(OutcomeElseIf, &[SetOutcomeValue]),
            Err("must start with an expression".to_string())
        );
        assert!(rules.check_shape(OutcomeElse, &[]).is_ok());
    }

    #[test]
    fn test_members() {
        let rules = RuleFamily::TEMPLATE;
        assert!(rules.check_member(TemplateCondition, Some(TemplateElse)).is_ok());
        assert!(rules.check_member(TemplateCondition, Some(OutcomeElse)).is_err());
        assert!(rules.check_member(TemplateCondition, None).is_err());
        assert!(rules.check_member(TemplateElse, Some(ExitTemplate)).is_ok());
        assert!(rules.is_structural(TemplateIf, 0, Some(Variable)));
        assert!(!rules.is_structural(TemplateIf, 1, Some(Variable)));
        assert!(!rules.is_structural(TemplateElse, 0, Some(Variable)));
        assert!(!rules.is_composite(ResponseProcessingFragment));
    }
}
