//! Per-kind schema tables: attributes, content model and child arity.

use crate::kind::{Category, ComponentKind};

/// The type an attribute value is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    Identifier,
    Integer,
    Float,
    Boolean,
    /// One of a fixed set of tokens.
    OneOf(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSpec {
    /// Canonical (QTI 2) attribute name.
    pub name: &'static str,
    pub ty: AttributeType,
    pub required: bool,
}

/// Which child kinds a container holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accepts {
    Categories(&'static [Category]),
    Kinds(&'static [ComponentKind]),
}

impl Accepts {
    pub fn accepts(&self, kind: ComponentKind) -> bool {
        match self {
            Accepts::Categories(categories) => categories.iter().any(|c| kind.has_category(*c)),
            Accepts::Kinds(kinds) => kinds.contains(&kind),
        }
    }

    /// Whether text runs and other inline content belong here.
    pub fn accepts_inline(&self) -> bool {
        self.accepts(ComponentKind::TextRun)
    }
}

/// What a kind holds besides its attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentModel {
    Empty,
    /// Character data only.
    Text,
    /// An opaque fragment kept byte-for-byte.
    Blob,
    Children(Accepts),
}

/// Bounds on the number of children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    pub max: Option<usize>,
}

impl Arity {
    pub const ANY: Arity = Arity { min: 0, max: None };

    pub fn allows(&self, count: usize) -> bool {
        count >= self.min && self.max.is_none_or(|max| count <= max)
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "exactly {}", max),
            Some(max) => write!(f, "between {} and {}", self.min, max),
            None => write!(f, "at least {}", self.min),
        }
    }
}

const fn req(name: &'static str, ty: AttributeType) -> AttributeSpec {
    AttributeSpec {
        name,
        ty,
        required: true,
    }
}

const fn opt(name: &'static str, ty: AttributeType) -> AttributeSpec {
    AttributeSpec {
        name,
        ty,
        required: false,
    }
}

const fn arity(min: usize, max: usize) -> Arity {
    Arity {
        min,
        max: Some(max),
    }
}

const fn at_least(min: usize) -> Arity {
    Arity { min, max: None }
}

use AttributeType::{Boolean, Float, Identifier, Integer, OneOf};

pub const BASE_TYPES: &[&str] = &[
    "identifier",
    "boolean",
    "integer",
    "float",
    "string",
    "point",
    "pair",
    "directedPair",
    "duration",
    "file",
    "uri",
    "intOrIdentifier",
];
const CARDINALITIES: &[&str] = &["single", "multiple", "ordered", "record"];
const TOLERANCE_MODES: &[&str] = &["exact", "absolute", "relative"];
const ROUNDING_MODES: &[&str] = &["significantFigures", "decimalPlaces"];
const SHAPES: &[&str] = &["circle", "default", "ellipse", "poly", "rect"];
const SHOW_HIDE: &[&str] = &["show", "hide"];
const MATH_FUNCTIONS: &[&str] = &[
    "sin", "cos", "tan", "sec", "csc", "cot", "asin", "acos", "atan", "atan2", "asec", "acsc",
    "acot", "sinh", "cosh", "tanh", "sech", "csch", "coth", "log", "ln", "exp", "abs", "signum",
    "floor", "ceil", "toDegrees", "toRadians",
];
const STATISTICS: &[&str] = &["mean", "sampleVariance", "sampleSD", "popVariance", "popSD"];
const NAVIGATION_MODES: &[&str] = &["linear", "nonlinear"];
const SUBMISSION_MODES: &[&str] = &["individual", "simultaneous"];
const TEXT_FORMATS: &[&str] = &["plain", "preFormatted", "xhtml"];

const STRING: AttributeType = AttributeType::String;

const IDENTIFIER_ONLY: &[AttributeSpec] = &[req("identifier", Identifier)];
const HTML_COMMON: &[AttributeSpec] = &[opt("id", Identifier), opt("class", STRING)];
const ITEM_SUBSET: &[AttributeSpec] = &[
    opt("sectionIdentifier", Identifier),
    opt("includeCategory", STRING),
    opt("excludeCategory", STRING),
];
const OUTCOME_RANGE: &[AttributeSpec] = &[
    opt("sectionIdentifier", Identifier),
    opt("includeCategory", STRING),
    opt("excludeCategory", STRING),
    req("outcomeIdentifier", Identifier),
    opt("weightIdentifier", Identifier),
];
const FEEDBACK: &[AttributeSpec] = &[
    req("outcomeIdentifier", Identifier),
    req("identifier", Identifier),
    req("showHide", OneOf(SHOW_HIDE)),
];
const ROUNDING: &[AttributeSpec] = &[req("roundingMode", OneOf(ROUNDING_MODES)), req("figures", STRING)];
const REFERENCE: &[AttributeSpec] = &[req("identifier", Identifier), req("href", STRING)];
const DECLARATION: &[AttributeSpec] = &[
    req("identifier", Identifier),
    req("cardinality", OneOf(CARDINALITIES)),
    opt("baseType", OneOf(BASE_TYPES)),
];
const CASE_SENSITIVE: &[AttributeSpec] = &[req("caseSensitive", Boolean)];

const EXPRESSIONS: Accepts = Accepts::Categories(&[Category::Expression]);
const BRANCH_CONTENT_RESPONSE: Accepts =
    Accepts::Categories(&[Category::Expression, Category::ResponseRule]);
const BRANCH_CONTENT_OUTCOME: Accepts =
    Accepts::Categories(&[Category::Expression, Category::OutcomeRule]);
const BRANCH_CONTENT_TEMPLATE: Accepts =
    Accepts::Categories(&[Category::Expression, Category::TemplateRule]);
const INLINE: Accepts = Accepts::Categories(&[Category::Inline]);
const BLOCKS: Accepts = Accepts::Categories(&[Category::Block]);
const FLOW: Accepts = Accepts::Categories(&[Category::Block, Category::Inline]);
const VALUES: Accepts = Accepts::Kinds(&[ComponentKind::Value]);

impl ComponentKind {
    /// Attribute specs in canonical order.
    pub fn attributes(self) -> &'static [AttributeSpec] {
        use ComponentKind::*;
        match self {
            BaseValue => const { &[req("baseType", OneOf(BASE_TYPES))] },
            Variable => const {
                &[
                    req("identifier", Identifier),
                    opt("weightIdentifier", Identifier),
                ]
            },
            Correct | Default | MapResponse | MapResponsePoint => IDENTIFIER_ONLY,
            Null => &[],
            RandomInteger => const {
                &[
                    opt("min", Integer),
                    req("max", Integer),
                    opt("step", Integer),
                ]
            },
            RandomFloat => const { &[opt("min", Float), req("max", Float)] },
            NumberCorrect | NumberIncorrect | NumberPresented | NumberResponded
            | NumberSelected => ITEM_SUBSET,
            OutcomeMinimum | OutcomeMaximum => OUTCOME_RANGE,
            TestVariables => const {
                &[
                    opt("sectionIdentifier", Identifier),
                    opt("includeCategory", STRING),
                    opt("excludeCategory", STRING),
                    req("variableIdentifier", Identifier),
                    opt("weightIdentifier", Identifier),
                    opt("baseType", OneOf(BASE_TYPES)),
                ]
            },
            MathConstant => const { &[req("name", OneOf(&["pi", "e"]))] },
            CustomOperator => const { &[opt("class", STRING), opt("definition", STRING)] },

            AnyN => const { &[req("min", STRING), req("max", STRING)] },
            Equal => const {
                &[
                    req("toleranceMode", OneOf(TOLERANCE_MODES)),
                    opt("tolerance", STRING),
                    opt("includeLowerBound", Boolean),
                    opt("includeUpperBound", Boolean),
                ]
            },
            EqualRounded | RoundTo => ROUNDING,
            Index => const { &[req("n", STRING)] },
            FieldValue => const { &[req("fieldIdentifier", Identifier)] },
            Substring => CASE_SENSITIVE,
            StringMatch => const { &[req("caseSensitive", Boolean), opt("substring", Boolean)] },
            PatternMatch => const { &[req("pattern", STRING)] },
            Inside => const { &[req("shape", OneOf(SHAPES)), req("coords", STRING)] },
            MathOperator => const { &[req("name", OneOf(MATH_FUNCTIONS))] },
            Repeat => const { &[req("numberRepeats", STRING)] },
            StatsOperator => const { &[req("name", OneOf(STATISTICS))] },
            And | Or | Not | Match | Lt | Gt | Lte | Gte | Sum | Product | Subtract | Divide
            | Power | IntegerDivide | IntegerModulus | Truncate | Round | IntegerToFloat
            | Multiple | Ordered | ContainerSize | IsNull | Random | Member | Delete
            | Contains | DurationLt | DurationGte | Min | Max | Gcd | Lcm => &[],

            ResponseProcessing => const {
                &[
                    opt("template", STRING),
                    opt("templateLocation", STRING),
                ]
            },
            SetOutcomeValue | LookupOutcomeValue | SetTemplateValue | SetCorrectResponse
            | SetDefaultValue => IDENTIFIER_ONLY,
            ResponseCondition | ResponseIf | ResponseElseIf | ResponseElse
            | ResponseProcessingFragment | ExitResponse | OutcomeProcessing | OutcomeCondition
            | OutcomeIf | OutcomeElseIf | OutcomeElse | OutcomeProcessingFragment | ExitTest
            | TemplateProcessing | TemplateCondition | TemplateIf | TemplateElseIf
            | TemplateElse | ExitTemplate | TemplateConstraint => &[],

            ItemBody | Div | P | Span | Strong | Em | Code | Pre | Blockquote | Ul | Ol | Li
            | H1 | H2 | H3 | Sub | Sup | Table | Tbody | Tr | Td | Br | Hr | Prompt => HTML_COMMON,
            A => const { &[opt("id", Identifier), opt("class", STRING), req("href", STRING)] },
            Img => const {
                &[
                    opt("id", Identifier),
                    opt("class", STRING),
                    req("src", STRING),
                    req("alt", STRING),
                    opt("width", STRING),
                    opt("height", STRING),
                ]
            },
            TextRun => &[],
            SimpleChoice => const {
                &[
                    req("identifier", Identifier),
                    opt("fixed", Boolean),
                    opt("templateIdentifier", Identifier),
                    opt("showHide", OneOf(SHOW_HIDE)),
                ]
            },
            FeedbackBlock | FeedbackInline => FEEDBACK,
            RubricBlock => const { &[req("view", STRING), opt("use", STRING)] },
            ModalFeedback => const {
                &[
                    req("outcomeIdentifier", Identifier),
                    req("identifier", Identifier),
                    req("showHide", OneOf(SHOW_HIDE)),
                    opt("title", STRING),
                ]
            },
            PrintedVariable => const { &[req("identifier", Identifier), opt("format", STRING)] },
            ChoiceInteraction => const {
                &[
                    req("responseIdentifier", Identifier),
                    req("shuffle", Boolean),
                    req("maxChoices", Integer),
                    opt("minChoices", Integer),
                ]
            },
            TextEntryInteraction => const {
                &[
                    req("responseIdentifier", Identifier),
                    opt("expectedLength", Integer),
                    opt("patternMask", STRING),
                    opt("placeholderText", STRING),
                ]
            },
            ExtendedTextInteraction => const {
                &[
                    req("responseIdentifier", Identifier),
                    opt("expectedLines", Integer),
                    opt("expectedLength", Integer),
                    opt("format", OneOf(TEXT_FORMATS)),
                ]
            },

            AssessmentTest => const {
                &[
                    req("identifier", Identifier),
                    req("title", STRING),
                    opt("toolName", STRING),
                    opt("toolVersion", STRING),
                ]
            },
            TestPart => const {
                &[
                    req("identifier", Identifier),
                    req("navigationMode", OneOf(NAVIGATION_MODES)),
                    req("submissionMode", OneOf(SUBMISSION_MODES)),
                ]
            },
            AssessmentSection => const {
                &[
                    req("identifier", Identifier),
                    req("title", STRING),
                    req("visible", Boolean),
                    opt("required", Boolean),
                    opt("fixed", Boolean),
                    opt("keepTogether", Boolean),
                ]
            },
            AssessmentSectionRef => REFERENCE,
            AssessmentItemRef => const {
                &[
                    req("identifier", Identifier),
                    req("href", STRING),
                    opt("category", STRING),
                    opt("required", Boolean),
                    opt("fixed", Boolean),
                ]
            },
            Selection => const { &[req("select", Integer), opt("withReplacement", Boolean)] },
            Ordering => const { &[req("shuffle", Boolean)] },
            AdaptiveSelection => &[],
            AdaptiveEngineRef | AdaptiveSettingsRef | QtiUsagedataRef => REFERENCE,

            AssessmentItem => const {
                &[
                    req("identifier", Identifier),
                    req("title", STRING),
                    req("adaptive", Boolean),
                    req("timeDependent", Boolean),
                    opt("label", STRING),
                    opt("toolName", STRING),
                    opt("toolVersion", STRING),
                ]
            },
            ResponseDeclaration => DECLARATION,
            OutcomeDeclaration => const {
                &[
                    req("identifier", Identifier),
                    req("cardinality", OneOf(CARDINALITIES)),
                    opt("baseType", OneOf(BASE_TYPES)),
                    opt("normalMaximum", Float),
                    opt("normalMinimum", Float),
                ]
            },
            TemplateDeclaration => const {
                &[
                    req("identifier", Identifier),
                    req("cardinality", OneOf(CARDINALITIES)),
                    opt("baseType", OneOf(BASE_TYPES)),
                    opt("paramVariable", Boolean),
                    opt("mathVariable", Boolean),
                ]
            },
            DefaultValue | CorrectResponse => const { &[opt("interpretation", STRING)] },
            Value => const {
                &[
                    opt("fieldIdentifier", Identifier),
                    opt("baseType", OneOf(BASE_TYPES)),
                ]
            },
            Mapping => const {
                &[
                    opt("lowerBound", Float),
                    opt("upperBound", Float),
                    opt("defaultValue", Float),
                ]
            },
            MapEntry => const {
                &[
                    req("mapKey", STRING),
                    req("mappedValue", Float),
                    opt("caseSensitive", Boolean),
                ]
            },
        }
    }
}

impl ComponentKind {
    pub fn content(self) -> ContentModel {
        use ComponentKind::*;
        use ContentModel::{Blob, Children, Empty, Text};
        match self {
            BaseValue | Value | TextRun => Text,
            CustomOperator | Selection => Blob,

            kind if kind.has_category(Category::Operator) => Children(EXPRESSIONS),

            ResponseProcessing | ResponseElse | ResponseProcessingFragment => {
                Children(Accepts::Categories(&[Category::ResponseRule]))
            }
            ResponseCondition => Children(Accepts::Kinds(&[
                ResponseIf,
                ResponseElseIf,
                ResponseElse,
            ])),
            ResponseIf | ResponseElseIf => Children(BRANCH_CONTENT_RESPONSE),
            OutcomeProcessing | OutcomeElse | OutcomeProcessingFragment => {
                Children(Accepts::Categories(&[Category::OutcomeRule]))
            }
            OutcomeCondition => Children(Accepts::Kinds(&[OutcomeIf, OutcomeElseIf, OutcomeElse])),
            OutcomeIf | OutcomeElseIf => Children(BRANCH_CONTENT_OUTCOME),
            TemplateProcessing | TemplateElse => {
                Children(Accepts::Categories(&[Category::TemplateRule]))
            }
            TemplateCondition => Children(Accepts::Kinds(&[
                TemplateIf,
                TemplateElseIf,
                TemplateElse,
            ])),
            TemplateIf | TemplateElseIf => Children(BRANCH_CONTENT_TEMPLATE),
            SetOutcomeValue | LookupOutcomeValue | SetTemplateValue | SetCorrectResponse
            | SetDefaultValue | TemplateConstraint => Children(EXPRESSIONS),

            ItemBody | Blockquote => Children(BLOCKS),
            Div | Li | Td | Prompt | SimpleChoice | FeedbackBlock | RubricBlock | ModalFeedback => {
                Children(FLOW)
            }
            P | Span | Strong | Em | Code | Pre | H1 | H2 | H3 | A | Sub | Sup
            | FeedbackInline => Children(INLINE),
            Ul | Ol => Children(Accepts::Kinds(&[Li])),
            Table => Children(Accepts::Kinds(&[Tbody])),
            Tbody => Children(Accepts::Kinds(&[Tr])),
            Tr => Children(Accepts::Kinds(&[Td])),
            ChoiceInteraction => Children(Accepts::Kinds(&[Prompt, SimpleChoice])),
            ExtendedTextInteraction => Children(Accepts::Kinds(&[Prompt])),

            AssessmentTest => Children(Accepts::Kinds(&[
                OutcomeDeclaration,
                TestPart,
                OutcomeProcessing,
            ])),
            TestPart => Children(Accepts::Kinds(&[AssessmentSection])),
            AssessmentSection => Children(Accepts::Kinds(&[
                Selection,
                Ordering,
                RubricBlock,
                AdaptiveSelection,
                AssessmentSection,
                AssessmentSectionRef,
                AssessmentItemRef,
            ])),
            AdaptiveSelection => Children(Accepts::Kinds(&[
                AdaptiveEngineRef,
                AdaptiveSettingsRef,
                QtiUsagedataRef,
            ])),

            AssessmentItem => Children(Accepts::Kinds(&[
                ResponseDeclaration,
                OutcomeDeclaration,
                TemplateDeclaration,
                TemplateProcessing,
                ItemBody,
                ResponseProcessing,
                ModalFeedback,
            ])),
            ResponseDeclaration => Children(Accepts::Kinds(&[
                DefaultValue,
                CorrectResponse,
                Mapping,
            ])),
            OutcomeDeclaration | TemplateDeclaration => {
                Children(Accepts::Kinds(&[DefaultValue]))
            }
            DefaultValue | CorrectResponse => Children(VALUES),
            Mapping => Children(Accepts::Kinds(&[MapEntry])),

            _ => Empty,
        }
    }

    /// The collection rule for container kinds.
    pub fn accepts(self) -> Option<Accepts> {
        match self.content() {
            ContentModel::Children(accepts) => Some(accepts),
            _ => None,
        }
    }

    pub fn is_container(self) -> bool {
        self.accepts().is_some()
    }

    pub fn arity(self) -> Arity {
        use ComponentKind::*;
        match self {
            Not | Truncate | Round | RoundTo | IntegerToFloat | ContainerSize | IsNull | Index
            | FieldValue | Random | PatternMatch | Inside | StatsOperator => arity(1, 1),
            Match | Equal | EqualRounded | Lt | Gt | Lte | Gte | Subtract | Divide | Power
            | IntegerDivide | IntegerModulus | Member | Delete | Contains | Substring
            | StringMatch | DurationLt | DurationGte => arity(2, 2),
            MathOperator => arity(1, 2),
            And | Or | AnyN | Sum | Product | Min | Max | Gcd | Lcm | Repeat => at_least(1),

            ResponseCondition | OutcomeCondition | TemplateCondition => at_least(1),
            ResponseIf | ResponseElseIf | OutcomeIf | OutcomeElseIf | TemplateIf
            | TemplateElseIf => at_least(1),
            SetOutcomeValue | LookupOutcomeValue | SetTemplateValue | SetCorrectResponse
            | SetDefaultValue | TemplateConstraint => arity(1, 1),

            ChoiceInteraction | DefaultValue | CorrectResponse | Mapping | TestPart
            | AdaptiveSelection => at_least(1),
            ExtendedTextInteraction => arity(0, 1),

            _ => Arity::ANY,
        }
    }

    /// Look up the spec of a canonical attribute name.
    pub fn attribute(self, name: &str) -> Option<&'static AttributeSpec> {
        self.attributes().iter().find(|spec| spec.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operators_take_expressions() {
        for &kind in ComponentKind::ALL {
            if kind.has_category(Category::Operator) {
                assert_eq!(
                    kind.content(),
                    ContentModel::Children(EXPRESSIONS),
                    "{}",
                    kind
                );
                assert!(kind.arity().max != Some(0), "{}", kind);
            }
        }
    }

    #[test]
    fn test_leaf_expressions_hold_no_children() {
        assert_eq!(ComponentKind::Variable.content(), ContentModel::Empty);
        assert_eq!(ComponentKind::BaseValue.content(), ContentModel::Text);
        assert_eq!(ComponentKind::CustomOperator.content(), ContentModel::Blob);
        assert!(!ComponentKind::Null.is_container());
    }

    #[test]
    fn test_accepts() {
        let branch = ComponentKind::ResponseIf.accepts().unwrap();
        assert!(branch.accepts(ComponentKind::And));
        assert!(branch.accepts(ComponentKind::SetOutcomeValue));
        assert!(!branch.accepts(ComponentKind::ExitTest));

        let p = ComponentKind::P.accepts().unwrap();
        assert!(p.accepts_inline());
        assert!(!p.accepts(ComponentKind::Div));

        let ul = ComponentKind::Ul.accepts().unwrap();
        assert!(!ul.accepts_inline());
        assert!(ul.accepts(ComponentKind::Li));
    }

    #[test]
    fn test_arity() {
        assert!(ComponentKind::Not.arity().allows(1));
        assert!(!ComponentKind::Not.arity().allows(2));
        assert!(!ComponentKind::And.arity().allows(0));
        assert!(ComponentKind::And.arity().allows(50));
        assert!(ComponentKind::Multiple.arity().allows(0));
        assert_eq!(ComponentKind::Match.arity().to_string(), "exactly 2");
        assert_eq!(ComponentKind::MathOperator.arity().to_string(), "between 1 and 2");
        assert_eq!(ComponentKind::Sum.arity().to_string(), "at least 1");
    }

    #[test]
    fn test_attribute_lookup() {
        let spec = ComponentKind::BaseValue.attribute("baseType").unwrap();
        assert!(spec.required);
        assert!(matches!(spec.ty, AttributeType::OneOf(values) if values.contains(&"float")));
        assert!(ComponentKind::BaseValue.attribute("identifier").is_none());
    }

    #[test]
    fn test_attribute_tables_are_static() {
        let tables: Vec<&'static [AttributeSpec]> =
            ComponentKind::ALL.iter().map(|kind| kind.attributes()).collect();
        for (kind, table) in ComponentKind::ALL.iter().zip(&tables) {
            let mut names: Vec<&str> = table.iter().map(|spec| spec.name).collect();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), table.len(), "duplicate attribute on {}", kind);
        }
        assert_eq!(
            ComponentKind::MathConstant.attributes()[0].ty,
            AttributeType::OneOf(&["pi", "e"])
        );
        assert!(ComponentKind::Null.attributes().is_empty());
    }
}
