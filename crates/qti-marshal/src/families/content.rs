use super::Family;
use qti_model::ComponentKind;

/// Body content: XHTML containers, feedback, rubrics and the interactions
/// that hold flow content.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentFamily;

impl Family for ContentFamily {
    fn name(&self) -> &'static str {
        "content"
    }

    fn is_composite(&self, kind: ComponentKind) -> bool {
        use ComponentKind::*;
        matches!(
            kind,
            ItemBody
                | Div
                | P
                | Span
                | Strong
                | Em
                | Code
                | Pre
                | Blockquote
                | Ul
                | Ol
                | Li
                | H1
                | H2
                | H3
                | A
                | Sub
                | Sup
                | Table
                | Tbody
                | Tr
                | Td
                | Prompt
                | SimpleChoice
                | FeedbackBlock
                | FeedbackInline
                | RubricBlock
                | ModalFeedback
                | ChoiceInteraction
                | ExtendedTextInteraction
        )
    }
}
