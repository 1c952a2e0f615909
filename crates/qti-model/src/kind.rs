//! The closed set of component kinds and their categories.

use std::fmt;

/// Groups of kinds that may appear in the same positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Anything that evaluates to a value.
    Expression,
    /// Expressions built from other expressions.
    Operator,
    ResponseRule,
    OutcomeRule,
    TemplateRule,
    /// Block-level body content.
    Block,
    /// Inline body content.
    Inline,
    /// Children of a section that select or reference content.
    SectionPart,
    /// Children of an interaction.
    InteractionPart,
    /// Declarations, processing containers and other item or test scaffolding.
    Structure,
}

macro_rules! component_kinds {
    ($($variant:ident => $name:literal [$($category:ident),*]),* $(,)?) => {
        /// A QTI class, identified by its QTI 2 element name.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum ComponentKind {
            $($variant),*
        }

        impl ComponentKind {
            /// Every kind, in declaration order.
            pub const ALL: &'static [ComponentKind] = &[$(ComponentKind::$variant),*];

            /// The QTI class name, which is also the QTI 2 element name.
            pub fn class_name(self) -> &'static str {
                match self {
                    $(ComponentKind::$variant => $name),*
                }
            }

            pub fn from_class_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(ComponentKind::$variant),)*
                    _ => None,
                }
            }

            pub fn categories(self) -> &'static [Category] {
                match self {
                    $(ComponentKind::$variant => &[$(Category::$category),*]),*
                }
            }
        }
    };
}

component_kinds! {
    // Expressions that take no sub-expressions
    BaseValue => "baseValue" [Expression],
    Variable => "variable" [Expression],
    Correct => "correct" [Expression],
    Default => "default" [Expression],
    Null => "null" [Expression],
    RandomInteger => "randomInteger" [Expression],
    RandomFloat => "randomFloat" [Expression],
    MapResponse => "mapResponse" [Expression],
    MapResponsePoint => "mapResponsePoint" [Expression],
    NumberCorrect => "numberCorrect" [Expression],
    NumberIncorrect => "numberIncorrect" [Expression],
    NumberPresented => "numberPresented" [Expression],
    NumberResponded => "numberResponded" [Expression],
    NumberSelected => "numberSelected" [Expression],
    OutcomeMinimum => "outcomeMinimum" [Expression],
    OutcomeMaximum => "outcomeMaximum" [Expression],
    TestVariables => "testVariables" [Expression],
    MathConstant => "mathConstant" [Expression],
    CustomOperator => "customOperator" [Expression],

    // Operators
    And => "and" [Expression, Operator],
    Or => "or" [Expression, Operator],
    Not => "not" [Expression, Operator],
    AnyN => "anyN" [Expression, Operator],
    Match => "match" [Expression, Operator],
    Equal => "equal" [Expression, Operator],
    EqualRounded => "equalRounded" [Expression, Operator],
    Lt => "lt" [Expression, Operator],
    Gt => "gt" [Expression, Operator],
    Lte => "lte" [Expression, Operator],
    Gte => "gte" [Expression, Operator],
    Sum => "sum" [Expression, Operator],
    Product => "product" [Expression, Operator],
    Subtract => "subtract" [Expression, Operator],
    Divide => "divide" [Expression, Operator],
    Power => "power" [Expression, Operator],
    IntegerDivide => "integerDivide" [Expression, Operator],
    IntegerModulus => "integerModulus" [Expression, Operator],
    Truncate => "truncate" [Expression, Operator],
    Round => "round" [Expression, Operator],
    RoundTo => "roundTo" [Expression, Operator],
    IntegerToFloat => "integerToFloat" [Expression, Operator],
    Multiple => "multiple" [Expression, Operator],
    Ordered => "ordered" [Expression, Operator],
    ContainerSize => "containerSize" [Expression, Operator],
    IsNull => "isNull" [Expression, Operator],
    Index => "index" [Expression, Operator],
    FieldValue => "fieldValue" [Expression, Operator],
    Random => "random" [Expression, Operator],
    Member => "member" [Expression, Operator],
    Delete => "delete" [Expression, Operator],
    Contains => "contains" [Expression, Operator],
    Substring => "substring" [Expression, Operator],
    StringMatch => "stringMatch" [Expression, Operator],
    PatternMatch => "patternMatch" [Expression, Operator],
    Inside => "inside" [Expression, Operator],
    DurationLt => "durationLT" [Expression, Operator],
    DurationGte => "durationGTE" [Expression, Operator],
    Min => "min" [Expression, Operator],
    Max => "max" [Expression, Operator],
    Gcd => "gcd" [Expression, Operator],
    Lcm => "lcm" [Expression, Operator],
    MathOperator => "mathOperator" [Expression, Operator],
    Repeat => "repeat" [Expression, Operator],
    StatsOperator => "statsOperator" [Expression, Operator],

    // Response processing
    ResponseProcessing => "responseProcessing" [Structure],
    ResponseCondition => "responseCondition" [ResponseRule],
    ResponseIf => "responseIf" [],
    ResponseElseIf => "responseElseIf" [],
    ResponseElse => "responseElse" [],
    ResponseProcessingFragment => "responseProcessingFragment" [ResponseRule],
    SetOutcomeValue => "setOutcomeValue" [ResponseRule, OutcomeRule],
    LookupOutcomeValue => "lookupOutcomeValue" [ResponseRule, OutcomeRule],
    ExitResponse => "exitResponse" [ResponseRule],

    // Outcome processing
    OutcomeProcessing => "outcomeProcessing" [Structure],
    OutcomeCondition => "outcomeCondition" [OutcomeRule],
    OutcomeIf => "outcomeIf" [],
    OutcomeElseIf => "outcomeElseIf" [],
    OutcomeElse => "outcomeElse" [],
    OutcomeProcessingFragment => "outcomeProcessingFragment" [OutcomeRule],
    ExitTest => "exitTest" [OutcomeRule],

    // Template processing
    TemplateProcessing => "templateProcessing" [Structure],
    TemplateCondition => "templateCondition" [TemplateRule],
    TemplateIf => "templateIf" [],
    TemplateElseIf => "templateElseIf" [],
    TemplateElse => "templateElse" [],
    SetTemplateValue => "setTemplateValue" [TemplateRule],
    SetCorrectResponse => "setCorrectResponse" [TemplateRule],
    SetDefaultValue => "setDefaultValue" [TemplateRule],
    ExitTemplate => "exitTemplate" [TemplateRule],
    TemplateConstraint => "templateConstraint" [TemplateRule],

    // Body content
    ItemBody => "itemBody" [Structure],
    Div => "div" [Block],
    P => "p" [Block],
    Span => "span" [Inline],
    Strong => "strong" [Inline],
    Em => "em" [Inline],
    Code => "code" [Inline],
    Pre => "pre" [Block],
    Blockquote => "blockquote" [Block],
    Ul => "ul" [Block],
    Ol => "ol" [Block],
    Li => "li" [],
    H1 => "h1" [Block],
    H2 => "h2" [Block],
    H3 => "h3" [Block],
    A => "a" [Inline],
    Sub => "sub" [Inline],
    Sup => "sup" [Inline],
    Table => "table" [Block],
    Tbody => "tbody" [],
    Tr => "tr" [],
    Td => "td" [],
    Br => "br" [Inline],
    Img => "img" [Inline],
    Hr => "hr" [Block],
    TextRun => "textRun" [Inline],
    Prompt => "prompt" [InteractionPart],
    SimpleChoice => "simpleChoice" [InteractionPart],
    FeedbackBlock => "feedbackBlock" [Block],
    FeedbackInline => "feedbackInline" [Inline],
    RubricBlock => "rubricBlock" [Block],
    ModalFeedback => "modalFeedback" [Structure],
    PrintedVariable => "printedVariable" [Inline],
    ChoiceInteraction => "choiceInteraction" [Block],
    TextEntryInteraction => "textEntryInteraction" [Inline],
    ExtendedTextInteraction => "extendedTextInteraction" [Block],

    // Tests, sections and selection
    AssessmentTest => "assessmentTest" [Structure],
    TestPart => "testPart" [Structure],
    AssessmentSection => "assessmentSection" [SectionPart],
    AssessmentSectionRef => "assessmentSectionRef" [SectionPart],
    AssessmentItemRef => "assessmentItemRef" [SectionPart],
    Selection => "selection" [],
    Ordering => "ordering" [],
    AdaptiveSelection => "adaptiveSelection" [],
    AdaptiveEngineRef => "adaptiveEngineRef" [],
    AdaptiveSettingsRef => "adaptiveSettingsRef" [],
    QtiUsagedataRef => "qtiUsagedataRef" [],

    // Item structure
    AssessmentItem => "assessmentItem" [Structure],
    ResponseDeclaration => "responseDeclaration" [Structure],
    OutcomeDeclaration => "outcomeDeclaration" [Structure],
    TemplateDeclaration => "templateDeclaration" [Structure],
    DefaultValue => "defaultValue" [],
    CorrectResponse => "correctResponse" [],
    Value => "value" [],
    Mapping => "mapping" [],
    MapEntry => "mapEntry" [],
}

impl ComponentKind {
    pub fn has_category(self, category: Category) -> bool {
        self.categories().contains(&category)
    }

    /// Kinds that are plain XHTML elements, spelled the same in every profile.
    pub fn is_xhtml(self) -> bool {
        use ComponentKind::*;
        matches!(
            self,
            Div | P | Span | Strong | Em | Code | Pre | Blockquote | Ul | Ol | Li | H1 | H2 | H3
                | A | Sub | Sup | Table | Tbody | Tr | Td | Br | Img | Hr
        )
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}
