use super::Family;
use qti_model::ComponentKind;

/// Nested `assessmentSection`s.
///
/// Selection, ordering, rubrics and adaptive settings belong to the section
/// itself and come before its parts.
#[derive(Debug, Clone, Copy, Default)]
pub struct SectionFamily;

impl Family for SectionFamily {
    fn name(&self) -> &'static str {
        "sections"
    }

    fn is_composite(&self, kind: ComponentKind) -> bool {
        kind == ComponentKind::AssessmentSection
    }

    fn is_structural(
        &self,
        _parent: ComponentKind,
        _position: usize,
        child: Option<ComponentKind>,
    ) -> bool {
        use ComponentKind::*;
        matches!(
            child,
            Some(Selection | Ordering | RubricBlock | AdaptiveSelection)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_children() {
        use ComponentKind::*;
        let family = SectionFamily;
        assert!(family.is_structural(AssessmentSection, 3, Some(Ordering)));
        assert!(!family.is_structural(AssessmentSection, 0, Some(AssessmentItemRef)));
        assert!(!family.is_structural(AssessmentSection, 0, None));
    }
}
