use qti_marshal::{
    ConverterRegistry, CustomTagConverter, Error, MarshalOptions, Marshaller, Profile,
    marshal_to_string, unmarshal_str,
};
use qti_model::{AttributeValue, Component, ComponentKind};
use std::sync::Arc;

fn options() -> MarshalOptions {
    MarshalOptions {
        xml_declaration: false,
        ..MarshalOptions::default()
    }
}

fn identifier(component: &Component) -> Option<&str> {
    component.attribute("identifier").and_then(|v| v.as_str())
}

#[test]
fn test_and_of_two_variables() {
    let and = unmarshal_str(
        r#"<and><variable identifier="A"/><variable identifier="B"/></and>"#,
        &options(),
    )
    .unwrap();

    assert_eq!(and.kind, ComponentKind::And);
    let children = and.children();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].kind, ComponentKind::Variable);
    assert_eq!(identifier(&children[0]), Some("A"));
    assert_eq!(identifier(&children[1]), Some("B"));
}

#[test]
fn test_nested_operators_keep_order() {
    let sum = unmarshal_str(
        r#"<sum>
             <baseValue baseType="integer">1</baseValue>
             <product>
               <variable identifier="X"/>
               <baseValue baseType="integer">2</baseValue>
             </product>
             <null/>
           </sum>"#,
        &options(),
    )
    .unwrap();

    let kinds: Vec<ComponentKind> = sum.walk().map(|(_, c)| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ComponentKind::Sum,
            ComponentKind::BaseValue,
            ComponentKind::Product,
            ComponentKind::Variable,
            ComponentKind::BaseValue,
            ComponentKind::Null,
        ]
    );
    assert_eq!(sum.children()[0].text.as_deref(), Some("1"));
}

#[test]
fn test_condition_with_only_if() {
    let condition = unmarshal_str(
        r#"<responseCondition>
             <responseIf>
               <isNull><variable identifier="RESPONSE"/></isNull>
               <setOutcomeValue identifier="SCORE">
                 <baseValue baseType="float">0</baseValue>
               </setOutcomeValue>
             </responseIf>
           </responseCondition>"#,
        &options(),
    )
    .unwrap();

    let branches = condition.children();
    assert_eq!(branches.len(), 1);
    assert_eq!(branches[0].kind, ComponentKind::ResponseIf);
    assert!(
        !branches
            .iter()
            .any(|b| matches!(b.kind, ComponentKind::ResponseElseIf | ComponentKind::ResponseElse))
    );

    let if_children: Vec<ComponentKind> = branches[0].children().iter().map(|c| c.kind).collect();
    assert_eq!(
        if_children,
        vec![ComponentKind::IsNull, ComponentKind::SetOutcomeValue]
    );
}

#[test]
fn test_condition_branch_order() {
    let condition = unmarshal_str(
        r#"<outcomeCondition>
             <outcomeIf><null/><exitTest/></outcomeIf>
             <outcomeElseIf><null/></outcomeElseIf>
             <outcomeElseIf><null/><exitTest/></outcomeElseIf>
             <outcomeElse><exitTest/></outcomeElse>
           </outcomeCondition>"#,
        &options(),
    )
    .unwrap();

    let kinds: Vec<ComponentKind> = condition.children().iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ComponentKind::OutcomeIf,
            ComponentKind::OutcomeElseIf,
            ComponentKind::OutcomeElseIf,
            ComponentKind::OutcomeElse,
        ]
    );
}

#[test]
fn test_condition_without_branches_is_malformed() {
    let err = unmarshal_str("<responseCondition/>", &options()).unwrap_err();
    assert!(matches!(
        err,
        Error::MalformedFamilyShape {
            family: "response rules",
            ..
        }
    ));
    insta::assert_snapshot!(err.to_diagnostic().to_text(None), @r"
    Error [QTI-2-2]: Malformed Structure
    <responseCondition> has no branches
    ℹ While converting response rules
    ");
}

#[test]
fn test_condition_rejects_foreign_children() {
    let err = unmarshal_str(
        r#"<responseCondition>
             <responseIf><null/></responseIf>
             <setOutcomeValue identifier="SCORE"><null/></setOutcomeValue>
           </responseCondition>"#,
        &options(),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Malformed response rules: <setOutcomeValue> is not a branch of <responseCondition>"
    );
    assert!(err.location().is_some());
}

#[test]
fn test_else_must_be_last() {
    let err = unmarshal_str(
        r#"<templateCondition>
             <templateIf><null/></templateIf>
             <templateElse/>
             <templateElseIf><null/></templateElseIf>
           </templateCondition>"#,
        &options(),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Malformed template rules: <templateCondition> must end with <templateElse>"
    );
}

#[test]
fn test_if_branch_needs_expression() {
    let err = unmarshal_str(
        r#"<responseCondition><responseIf><exitResponse/></responseIf></responseCondition>"#,
        &options(),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Malformed response rules: <responseIf> must start with an expression"
    );
}

#[test]
fn test_operator_arity() {
    let err = unmarshal_str(
        r#"<not><null/><null/></not>"#,
        &options(),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Malformed operators: <not> must have exactly 1 children, found 2"
    );
}

#[test]
fn test_disallowed_child_in_operator() {
    let err = unmarshal_str(
        r#"<and><variable identifier="A"/><exitResponse/></and>"#,
        &options(),
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "<and> cannot contain <exitResponse>");
    assert_eq!(err.to_diagnostic().code.as_deref(), Some("QTI-2-6"));
}

#[test]
fn test_text_in_element_only_content() {
    let err = unmarshal_str("<and>oops<null/></and>", &options()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unexpected content in <and>: text \"oops\" is not allowed here"
    );
}

#[test]
fn test_missing_required_attribute() {
    let err = unmarshal_str("<and><variable/></and>", &options()).unwrap_err();
    assert_eq!(
        err,
        Error::MissingRequiredAttribute {
            node: qti_marshal::NodeRef {
                name: "variable".to_string(),
                location: err.location().cloned(),
            },
            attribute: "identifier".to_string(),
        }
    );
    assert_eq!(err.location().map(|l| l.start_offset()), Some(5));
    insta::assert_snapshot!(err.to_diagnostic().to_text(None), @r#"
    Error [QTI-2-3]: Missing Required Attribute
    <variable> requires attribute 'identifier'
    ? Add identifier="..." to the element?
    "#);
}

#[test]
fn test_invalid_attribute_value() {
    let err = unmarshal_str(
        r#"<randomInteger min="1" max="many"/>"#,
        &options(),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid value 'many' for attribute 'max' on <randomInteger>: expected an integer"
    );
}

#[test]
fn test_unknown_attributes_are_dropped_unless_strict() {
    let input = r#"<variable identifier="A" colour="blue" xml:lang="en"/>"#;

    let lenient = unmarshal_str(input, &options()).unwrap();
    assert_eq!(lenient.attributes.len(), 1);

    let strict = MarshalOptions {
        strict_attributes: true,
        ..options()
    };
    let err = unmarshal_str(input, &strict).unwrap_err();
    insta::assert_snapshot!(err.to_diagnostic().to_text(None), @r"
    Error [QTI-2-5]: Unexpected Attribute
    Attribute 'colour' is not defined for <variable>
    ? Remove the attribute, or turn off strict attribute checking?
    ");
}

#[test]
fn test_strict_marshal_rejects_unknown_attributes() {
    let variable = Component::new(ComponentKind::Variable)
        .with_attribute("identifier", AttributeValue::Identifier("A".into()))
        .with_attribute("colour", AttributeValue::String("blue".into()));

    assert_eq!(
        marshal_to_string(&variable, &options()).unwrap(),
        r#"<variable identifier="A"/>"#
    );

    let strict = MarshalOptions {
        strict_attributes: true,
        ..options()
    };
    assert!(matches!(
        marshal_to_string(&variable, &strict),
        Err(Error::UnexpectedAttribute { .. })
    ));
}

#[test]
fn test_marshal_requires_attributes() {
    let variable = Component::new(ComponentKind::Variable);
    let err = marshal_to_string(&variable, &options()).unwrap_err();
    assert_eq!(err.to_string(), "<variable> requires attribute 'identifier'");
}

#[test]
fn test_marshal_checks_family_shape() {
    let mut condition = Component::new(ComponentKind::ResponseCondition);
    condition
        .push_child(Component::new(ComponentKind::ResponseElse))
        .unwrap();
    let err = marshal_to_string(&condition, &options()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Malformed response rules: <responseCondition> must start with <responseIf>"
    );
}

#[test]
fn test_custom_tag_uses_fallback() {
    let component = unmarshal_str(
        r#"<customTag definition="urn:x"><a>1</a><b/></customTag>"#,
        &options(),
    )
    .unwrap();
    assert_eq!(component.kind, ComponentKind::CustomOperator);
    assert_eq!(
        component.attribute("class").and_then(|v| v.as_str()),
        Some("customTag")
    );
    assert_eq!(
        component.attribute("definition").and_then(|v| v.as_str()),
        Some("urn:x")
    );
    assert_eq!(component.blob.as_deref(), Some("<a>1</a><b/>"));
    assert_eq!(
        marshal_to_string(&component, &options()).unwrap(),
        r#"<customTag definition="urn:x"><a>1</a><b/></customTag>"#
    );
}

#[test]
fn test_unknown_tag_is_not_found() {
    let err = unmarshal_str("<and><totallyUnknownTag/></and>", &options()).unwrap_err();
    match &err {
        Error::ConverterNotFound {
            tag,
            profile,
            location,
        } => {
            assert_eq!(tag, "totallyUnknownTag");
            assert_eq!(*profile, Profile::Qti2);
            assert!(location.is_some());
        }
        other => panic!("unexpected error: {:?}", other),
    }
    insta::assert_snapshot!(err.to_diagnostic().to_text(None), @r"
    Error [QTI-2-1]: Converter Not Found
    No converter is registered for <totallyUnknownTag>
    ℹ Active profile: qti2
    ? Is the element spelled for the document's QTI version?
    ");
}

#[test]
fn test_xhtml_root_uses_configured_profile() {
    let qti3 = Marshaller::new(options().with_profile(Profile::Qti3));
    let div = qti3
        .unmarshal_str(r#"<div><qti-text-entry-interaction response-identifier="R"/></div>"#)
        .unwrap();
    assert_eq!(div.children()[0].kind, ComponentKind::TextEntryInteraction);
    assert_eq!(
        div.children()[0]
            .attribute("responseIdentifier")
            .and_then(|v| v.as_str()),
        Some("R")
    );

    let qti2_spelling =
        qti3.unmarshal_str(r#"<div><textEntryInteraction responseIdentifier="R"/></div>"#);
    assert!(matches!(qti2_spelling, Err(Error::ConverterNotFound { .. })));
}

#[test]
fn test_custom_registry() {
    let mut registry = ConverterRegistry::for_profile(Profile::Qti2);
    registry.register(
        "vendorScore",
        Arc::new(CustomTagConverter::new("vendorScore")),
    );
    let marshaller = Marshaller::new(options()).with_registry(registry);

    let component = marshaller
        .unmarshal_str(r#"<and><vendorScore>42</vendorScore></and>"#)
        .unwrap();
    assert_eq!(component.children()[0].kind, ComponentKind::CustomOperator);
    assert_eq!(component.children()[0].blob.as_deref(), Some("42"));

    let qti3 = Marshaller::new(options()).unmarshal_str("<qti-and><vendorScore/></qti-and>");
    assert!(matches!(qti3, Err(Error::ConverterNotFound { .. })));

    // Ordinary custom operators keep their own element next to the extension tag.
    let source = r#"<and><customOperator class="com.x.Op"><baseValue baseType="integer">1</baseValue></customOperator><vendorScore>42</vendorScore></and>"#;
    let component = marshaller.unmarshal_str(source).unwrap();
    let written = marshaller.marshal_to_string(&component).unwrap();
    assert_eq!(written, source);
    assert_eq!(marshaller.unmarshal_str(&written).unwrap(), component);
}

#[test]
fn test_xml_errors_pass_through() {
    let err = unmarshal_str("<and><null/>", &options()).unwrap_err();
    assert!(matches!(err, Error::Xml(_)));
    assert!(
        err.to_diagnostic()
            .code
            .as_deref()
            .is_some_and(|code| code.starts_with("QTI-1-"))
    );
}

#[test]
fn test_qti3_output() {
    let item = unmarshal_str(
        r#"<assessmentItem xmlns="http://www.imsglobal.org/xsd/imsqti_v2p1" identifier="q1" title="Sum" adaptive="false" timeDependent="false"><responseDeclaration identifier="RESPONSE" cardinality="single" baseType="integer"/><itemBody><p>What is <strong>1 + 1</strong>?</p><extendedTextInteraction responseIdentifier="RESPONSE" expectedLines="1"/></itemBody></assessmentItem>"#,
        &options(),
    )
    .unwrap();

    let qti3 = options().with_profile(Profile::Qti3);
    insta::assert_snapshot!(marshal_to_string(&item, &qti3).unwrap(), @r#"<qti-assessment-item xmlns="http://www.imsglobal.org/xsd/imsqtiasi_v3p0" identifier="q1" title="Sum" adaptive="false" time-dependent="false"><qti-response-declaration identifier="RESPONSE" cardinality="single" base-type="integer"/><qti-item-body><p>What is <strong>1 + 1</strong>?</p><qti-extended-text-interaction response-identifier="RESPONSE" expected-lines="1"/></qti-item-body></qti-assessment-item>"#);
}

#[test]
fn test_marshaller_is_shared_between_threads() {
    let marshaller = Marshaller::new(options());
    std::thread::scope(|scope| {
        for id in ["A", "B", "C", "D"] {
            let marshaller = &marshaller;
            scope.spawn(move || {
                let input = format!(r#"<not><variable identifier="{}"/></not>"#, id);
                let not = marshaller.unmarshal_str(&input).unwrap();
                assert_eq!(identifier(&not.children()[0]), Some(id));
            });
        }
    });
}

#[test]
fn test_options_from_toml() {
    let parsed: MarshalOptions = toml::from_str(
        r#"
profile = "qti3"
strict-attributes = true
indent = 2
"#,
    )
    .unwrap();
    assert_eq!(parsed.profile, Profile::Qti3);
    assert!(parsed.strict_attributes);
    assert!(parsed.xml_declaration);
    assert_eq!(parsed.indent, Some(2));

    assert!(toml::from_str::<MarshalOptions>("pretty = true").is_err());
    assert_eq!(
        toml::from_str::<MarshalOptions>("").unwrap(),
        MarshalOptions::default()
    );
}
