//! Integration tests for the Markedly check pipeline

use markedly::{
    check, check_with_config, declarations, parse, CheckConfig, CheckError, Color,
    ComponentRegistry, Stylesheet, ValidationError, Validator, Value,
};
use pretty_assertions::assert_eq;

const MAIN_MENU: &str = include_str!("fixtures/main_menu.markedly");
const MENU_STYLE: &str = include_str!("fixtures/menu_style.markedly");
const BROKEN_MENU: &str = include_str!("fixtures/broken_menu.markedly");

#[test]
fn test_valid_button() {
    let registry = ComponentRegistry::builtin();
    let doc = check(r##"button { text: "OK"; color: "#FF0000"; }"##, &registry)
        .expect("Should validate");

    let button = &doc.components[0];
    assert_eq!(button.get("text"), Some(&Value::String("OK".to_string())));
    assert_eq!(
        button.get("color"),
        Some(&Value::Color(Color::rgb(255, 0, 0)))
    );
}

#[test]
fn test_unknown_attribute_is_the_only_error() {
    let registry = ComponentRegistry::builtin();
    let err = check(r#"button { unknown-attr: "x"; }"#, &registry).unwrap_err();
    match err {
        CheckError::Validation(errors) => {
            assert_eq!(errors.len(), 1);
            assert!(matches!(
                &errors[0],
                ValidationError::UnknownAttribute { name, .. } if name == "unknown-attr"
            ));
        }
        other => panic!("expected validation errors, got {:?}", other),
    }
}

#[test]
fn test_integer_and_float_boundary() {
    let mut registry = ComponentRegistry::builtin();
    registry
        .register(
            "spacer",
            &[],
            vec![
                markedly::AttributeDeclaration::new(
                    "size",
                    markedly::AttributeType::Integer,
                    "",
                ),
                markedly::AttributeDeclaration::new(
                    "weight",
                    markedly::AttributeType::Float,
                    "",
                ),
            ],
        )
        .expect("Should register");

    let doc = check("spacer { size: 16; weight: 16.5; }", &registry).expect("Should validate");
    assert_eq!(doc.components[0].get("size"), Some(&Value::Integer(16)));
    assert_eq!(doc.components[0].get("weight"), Some(&Value::Float(16.5)));

    let err = check("spacer { size: 16.5; }", &registry).unwrap_err();
    assert!(matches!(
        err,
        CheckError::Validation(ref errors)
            if matches!(&errors[0], ValidationError::InvalidLiteral { raw, .. } if raw == "16.5")
    ));

    let err = check("spacer { weight: 16; }", &registry).unwrap_err();
    assert!(matches!(
        err,
        CheckError::Validation(ref errors)
            if matches!(&errors[0], ValidationError::InvalidLiteral { raw, .. } if raw == "16")
    ));
}

#[test]
fn test_main_menu_fixture() {
    let registry = ComponentRegistry::builtin();
    let doc = check(MAIN_MENU, &registry).expect("Should validate");

    assert_eq!(doc.len(), 1);
    let menu = &doc.components[0];
    assert_eq!(menu.class.as_deref(), Some("menu"));
    assert_eq!(
        menu.get("color"),
        Some(&Value::Color(Color::new_u8(20, 20, 30, 128)))
    );

    let events: Vec<_> = menu
        .children
        .iter()
        .filter_map(|b| b.get("on-pressed").and_then(Value::as_str))
        .collect();
    assert_eq!(events, vec!["start-game", "open-settings", "quit"]);
}

#[test]
fn test_main_menu_with_stylesheet() {
    let registry = ComponentRegistry::builtin();
    let stylesheet = Stylesheet::from_str(MENU_STYLE, &registry).expect("Should load stylesheet");
    let config = CheckConfig::new().with_stylesheet(stylesheet);
    let doc = check_with_config(MAIN_MENU, &registry, &config).expect("Should validate");

    let buttons = &doc.components[0].children;
    // Class rule wins over the kind rule
    assert_eq!(
        buttons[0].get("color"),
        Some(&Value::Color(Color::rgb(0x21, 0x96, 0xF3)))
    );
    assert_eq!(
        buttons[1].get("color"),
        Some(&Value::Color(Color::rgb(0x33, 0x33, 0x33)))
    );
    // Explicit assignments win over the stylesheet
    assert_eq!(
        buttons[2].get("color-hovering"),
        Some(&Value::Color(Color::rgb(0xAA, 0, 0)))
    );
    assert_eq!(
        buttons[1].get("text-color"),
        Some(&Value::Color(Color::rgb(255, 255, 255)))
    );
}

#[test]
fn test_broken_menu_reports_everything() {
    let registry = ComponentRegistry::builtin();
    let err = check(BROKEN_MENU, &registry).unwrap_err();
    let errors = match err {
        CheckError::Validation(errors) => errors,
        other => panic!("expected validation errors, got {:?}", other),
    };

    let kinds: Vec<&str> = errors
        .iter()
        .map(|e| match e {
            ValidationError::UnknownComponentKind { .. } => "unknown-kind",
            ValidationError::UnknownAttribute { .. } => "unknown-attribute",
            ValidationError::InvalidLiteral { .. } => "invalid-literal",
            ValidationError::MissingRequiredAttribute { .. } => "missing",
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            "unknown-attribute",
            "invalid-literal",
            "invalid-literal",
            "unknown-kind",
        ]
    );

    let first = errors[0].span().start;
    assert_eq!(markedly::line_col(BROKEN_MENU, first), (2, 5));
}

#[test]
fn test_repeated_assignment_keeps_last_value() {
    let registry = ComponentRegistry::builtin();
    let doc = check(
        "button { border-radius: 4.0; text: \"A\"; border-radius: 12.0; }",
        &registry,
    )
    .expect("Should validate");
    assert_eq!(
        doc.components[0].get("border-radius"),
        Some(&Value::Float(12.0))
    );
}

#[test]
fn test_doc_comment_header() {
    let registry = ComponentRegistry::builtin();
    let source = "/** Main menu **/\n/***/\nbutton { /* ---- **/ text: \"OK\"; }";
    let doc = check(source, &registry).expect("Should validate");
    assert_eq!(doc.len(), 1);
}

#[test]
fn test_validation_is_idempotent() {
    let registry = ComponentRegistry::builtin();
    let doc = parse(BROKEN_MENU).expect("Should parse");
    let validator = Validator::new(&registry);
    let first = validator.validate_document(&doc);
    let second = validator.validate_document(&doc);
    assert_eq!(first, second);
}

#[test]
fn test_parse_error_stops_pipeline() {
    let registry = ComponentRegistry::builtin();
    let err = check("button { text: \"OK\" } container { }", &registry).unwrap_err();
    assert!(matches!(err, CheckError::Parse(ref errors) if errors.len() == 1));
}

#[test]
fn test_unrecognized_character_is_a_syntax_error() {
    let registry = ComponentRegistry::builtin();
    let err = check("button { text: \"OK\"; } @", &registry).unwrap_err();
    match err {
        CheckError::Parse(errors) => assert_eq!(errors[0].span(), &(23..24)),
        other => panic!("expected parse errors, got {:?}", other),
    }
}

#[test]
fn test_lazy_declarations_restart() {
    let mut decls = declarations("button { } container { } button { text: ; }");
    let kinds: Vec<_> = decls
        .by_ref()
        .map(|d| d.map(|d| d.node.kind.node.to_string()))
        .collect();
    assert_eq!(kinds.len(), 3);
    assert!(kinds[0].is_ok() && kinds[1].is_ok() && kinds[2].is_err());
    assert!(decls.next().is_none());

    decls.restart();
    let first = decls.next().expect("restart yields again").expect("valid");
    assert_eq!(first.node.kind.node.as_str(), "button");
}

#[test]
fn test_registry_shared_between_threads() {
    let registry = std::sync::Arc::new(ComponentRegistry::builtin());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let registry = std::sync::Arc::clone(&registry);
            std::thread::spawn(move || {
                let source = format!("button {{ text: \"{}\"; }}", i);
                check(&source, &registry).is_ok()
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().expect("thread panicked"));
    }
}
