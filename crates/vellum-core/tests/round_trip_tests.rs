//! Round-trip validation tests
//!
//! These tests validate that documents can be parsed and reprinted
//! byte for byte, and that edits through the editor change exactly the
//! region they target while the rest of the document keeps its
//! original spelling.

use vellum_core::{
    ErrorKind, LexicalEditor, Modifier, NodeKind, Property, PropertyValue, SyntaxTree, VellumError,
};

fn parse(source: &str) -> LexicalEditor {
    LexicalEditor::parse(source).unwrap()
}

fn first_class(editor: &LexicalEditor) -> vellum_core::NodeId {
    editor.tree().children(editor.root(), Property::Types)[0]
}

/// Parse and reprint without any edit
#[test]
fn test_identity_round_trip() {
    let sources = [
        "class A{ }",
        "class A{}",
        "public  final   class A  { }",
        "class A extends B, C{ }",
        "class A{\nint x;\nint y = 2;\n}",
        "class A{\n    int x;\n}\nclass B extends A{\n    int y;\n}\n",
    ];
    for source in sources {
        let editor = parse(source);
        assert_eq!(editor.text().unwrap(), source, "source: {source:?}");
    }
}

/// Comments in every position survive the round trip
#[test]
fn test_comments_round_trip() {
    let source = r#"// header comment
public class A { // trailing
    /* before member */
    int x; // field note
    /* multi
       line */
    int y = 2;
}
// footer
"#;
    let editor = parse(source);
    assert_eq!(editor.text().unwrap(), source);
}

/// Windows line endings come back unchanged
#[test]
fn test_crlf_round_trip() {
    let source = "class A{\r\nint x;\r\n}\r\n";
    let editor = parse(source);
    assert_eq!(editor.text().unwrap(), source);
}

/// Text blocks keep their internal line structure
#[test]
fn test_text_block_round_trip() {
    let source = "class A{\nString s = \"\"\"\nfirst line\nsecond line\n\"\"\";\n}";
    let editor = parse(source);
    assert_eq!(editor.text().unwrap(), source);
}

/// Empty and trivia-only documents are valid
#[test]
fn test_degenerate_documents_round_trip() {
    for source in ["", "   \n\t\n", "// just a comment\n", "/* only */"] {
        let editor = parse(source);
        assert_eq!(editor.text().unwrap(), source, "source: {source:?}");
    }
}

/// Serializing twice yields the same bytes, before and after an edit
#[test]
fn test_serialization_is_idempotent() {
    let source = "public class A extends B {\n    int x = 1; // note\n}\n";
    let mut editor = parse(source);
    assert_eq!(editor.text().unwrap(), editor.text().unwrap());

    let class = first_class(&editor);
    editor
        .set_property(class, Property::Name, PropertyValue::ident("C"))
        .unwrap();
    let first = editor.text().unwrap();
    assert_eq!(editor.text().unwrap(), first);
}

/// A rename touches one token and nothing else
#[test]
fn test_rename_is_minimal() {
    let source = "// doc\npublic class Account { int balance; }\n";
    let mut editor = parse(source);
    let class = first_class(&editor);
    editor
        .set_property(class, Property::Name, PropertyValue::ident("Ledger"))
        .unwrap();
    assert_eq!(
        editor.text().unwrap(),
        "// doc\npublic class Ledger { int balance; }\n"
    );
}

/// Renaming there and back restores the original bytes
#[test]
fn test_rename_inverts_cleanly() {
    let source = "public   class A /* odd */ { }\n";
    let mut editor = parse(source);
    let class = first_class(&editor);
    editor
        .set_property(class, Property::Name, PropertyValue::ident("B"))
        .unwrap();
    editor
        .set_property(class, Property::Name, PropertyValue::ident("A"))
        .unwrap();
    assert_eq!(editor.text().unwrap(), source);
}

/// Scenario: add a modifier to an unmodified class
#[test]
fn test_add_modifier() {
    let mut editor = parse("class A{ }");
    let class = first_class(&editor);
    editor
        .list_insert(class, Property::Modifiers, 0, Modifier::Public)
        .unwrap();
    assert_eq!(editor.text().unwrap(), "public class A{ }");
}

/// Scenario: remove the only extended type, clause and all
#[test]
fn test_remove_extends_clause() {
    let mut editor = parse("class A extends B { }");
    let class = first_class(&editor);
    editor
        .list_remove(class, Property::ExtendedTypes, 0)
        .unwrap();
    assert_eq!(editor.text().unwrap(), "class A { }");
}

/// Scenario: grow the extends list, separator included
#[test]
fn test_append_extended_type() {
    let mut editor = parse("class A extends B{ }");
    let class = first_class(&editor);
    let extra = editor
        .build(NodeKind::TypeRef)
        .property(Property::Name, PropertyValue::ident("C"))
        .finish();
    editor
        .list_push(class, Property::ExtendedTypes, extra)
        .unwrap();
    assert_eq!(editor.text().unwrap(), "class A extends B, C{ }");
}

/// Scenario: removing the last member removes its wrappers too
#[test]
fn test_removing_last_member_collapses_body() {
    let mut editor = parse("class A{\nint x;\n}");
    let class = first_class(&editor);
    editor.list_remove(class, Property::Members, 0).unwrap();
    assert_eq!(editor.text().unwrap(), "class A{}");
}

/// Scenario: the first member of an empty body brings its wrappers
#[test]
fn test_first_member_brings_layout() {
    let mut editor = parse("class A{}");
    let class = first_class(&editor);
    let field_type = editor
        .build(NodeKind::TypeRef)
        .property(Property::Name, PropertyValue::ident("int"))
        .finish();
    let field = editor
        .build(NodeKind::FieldDecl)
        .property(Property::FieldType, PropertyValue::Node(field_type))
        .property(Property::Name, PropertyValue::ident("x"))
        .finish();
    editor.list_push(class, Property::Members, field).unwrap();
    assert_eq!(editor.text().unwrap(), "class A{\nint x;\n}");
}

/// A tree assembled in memory prints from templates, then edits incrementally
#[test]
fn test_fresh_tree_accepts_edits() {
    let mut tree = SyntaxTree::new();
    let class = tree
        .build(NodeKind::ClassDecl)
        .property(Property::Name, PropertyValue::ident("Fresh"))
        .finish();
    let root = tree
        .build(NodeKind::CompilationUnit)
        .property(Property::Types, PropertyValue::Nodes(vec![class]))
        .finish();
    let mut editor = LexicalEditor::from_tree(tree, root).unwrap();
    assert_eq!(editor.text().unwrap(), "class Fresh{}");

    editor
        .list_insert(class, Property::Modifiers, 0, Modifier::Public)
        .unwrap();
    assert_eq!(editor.text().unwrap(), "public class Fresh{}");
}

/// Replacing a list element reuses the vacated spot
#[test]
fn test_replace_extended_type_in_place() {
    let mut editor = parse("class A extends B { }");
    let class = first_class(&editor);
    let replacement = editor
        .build(NodeKind::TypeRef)
        .property(Property::Name, PropertyValue::ident("C"))
        .finish();
    editor
        .list_replace(class, Property::ExtendedTypes, 0, replacement)
        .unwrap();
    assert_eq!(editor.text().unwrap(), "class A extends C { }");
}

/// Rewriting a string literal value keeps its delimiters
#[test]
fn test_string_value_rewrite() {
    let mut editor = parse("class A{\nString s = \"old\";\n}");
    let class = first_class(&editor);
    let field = editor.tree().children(class, Property::Members)[0];
    let init = editor.tree().child(field, Property::Initializer).unwrap();
    editor
        .set_property(init, Property::Value, PropertyValue::string("new"))
        .unwrap();
    assert_eq!(editor.text().unwrap(), "class A{\nString s = \"new\";\n}");
}

/// Several edits across one document compose
#[test]
fn test_edit_sequence() {
    let source = "// ledger types\nclass Account extends Base {\nint balance;\n}\n";
    let mut editor = parse(source);
    let class = first_class(&editor);

    editor
        .list_insert(class, Property::Modifiers, 0, Modifier::Public)
        .unwrap();
    assert_eq!(
        editor.text().unwrap(),
        "// ledger types\npublic class Account extends Base {\nint balance;\n}\n"
    );

    editor
        .list_remove(class, Property::ExtendedTypes, 0)
        .unwrap();
    assert_eq!(
        editor.text().unwrap(),
        "// ledger types\npublic class Account {\nint balance;\n}\n"
    );

    let field_type = editor
        .build(NodeKind::TypeRef)
        .property(Property::Name, PropertyValue::ident("int"))
        .finish();
    let field = editor
        .build(NodeKind::FieldDecl)
        .property(Property::FieldType, PropertyValue::Node(field_type))
        .property(Property::Name, PropertyValue::ident("limit"))
        .finish();
    editor.list_push(class, Property::Members, field).unwrap();
    assert_eq!(
        editor.text().unwrap(),
        "// ledger types\npublic class Account {\nint balance;\nint limit;\n}\n"
    );
}

/// Edits on a CRLF document synthesize CRLF line breaks
#[test]
fn test_crlf_edits_keep_convention() {
    let mut editor = parse("class A{\r\nint x;\r\n}\r\n");
    let class = first_class(&editor);
    let field_type = editor
        .build(NodeKind::TypeRef)
        .property(Property::Name, PropertyValue::ident("long"))
        .finish();
    let field = editor
        .build(NodeKind::FieldDecl)
        .property(Property::FieldType, PropertyValue::Node(field_type))
        .property(Property::Name, PropertyValue::ident("y"))
        .finish();
    editor.list_push(class, Property::Members, field).unwrap();
    assert_eq!(
        editor.text().unwrap(),
        "class A{\r\nint x;\r\nlong y;\r\n}\r\n"
    );
}

/// Malformed input is a parse error, not a panic
#[test]
fn test_parse_errors() {
    for source in [
        "class {",
        "class A extends { }",
        "class A{ int x }",
        "class A{ /* unterminated",
        "class A{ String s = \"open; }",
    ] {
        let err = LexicalEditor::parse(source).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse, "source: {source:?}");
        assert!(err.is_recoverable());
    }
}

/// Out of range list edits report bounds, text stays intact
#[test]
fn test_out_of_range_reports_bounds() {
    let source = "class A extends B{ }";
    let mut editor = parse(source);
    let class = first_class(&editor);
    let err = editor
        .list_remove(class, Property::ExtendedTypes, 3)
        .unwrap_err();
    match err {
        VellumError::IndexOutOfRange { index, len, .. } => {
            assert_eq!(index, 3);
            assert_eq!(len, 1);
        }
        other => panic!("Expected IndexOutOfRange, got {other}"),
    }
    assert_eq!(editor.text().unwrap(), source);
}

/// Nested classes keep their own buffers through outer edits
#[test]
fn test_nested_class_preserved_through_outer_edit() {
    let source = "class Outer{\nclass Inner  { int x; }\n}";
    let mut editor = parse(source);
    let outer = first_class(&editor);
    editor
        .set_property(outer, Property::Name, PropertyValue::ident("Wrapper"))
        .unwrap();
    assert_eq!(
        editor.text().unwrap(),
        "class Wrapper{\nclass Inner  { int x; }\n}"
    );
}
