use stackscript::block::BlockInstance;
use stackscript::block::options::BlockOptions;
use stackscript::parser::{ErrorKind, ParseError, Transpiler};
use stackscript::registry::Registry;

fn transpile(source: &str) -> Result<Vec<BlockInstance>, ParseError> {
    let registry = Registry::standard();
    Transpiler::new(source.to_string(), 0, &registry)
        .transpile()
        .map(|stack| stack.blocks)
}

fn blocks(source: &str) -> Vec<BlockInstance> {
    transpile(source).expect("transpile failed")
}

fn raw_script(block: &BlockInstance) -> &str {
    match block {
        BlockInstance::Raw(raw) => &raw.script,
        other => panic!("expected a raw block, got {:?}", other),
    }
}

/// The verbatim payload a Script block received.
fn script_code(block: &BlockInstance) -> &str {
    match block {
        BlockInstance::Structured(block) => match &block.options {
            BlockOptions::Script(options) => &options.code,
            other => panic!("expected Script options, got {:?}", other),
        },
        other => panic!("expected a structured block, got {:?}", other),
    }
}

#[test]
fn empty_input() {
    assert!(blocks("").is_empty());
}

#[test]
fn whitespace_only_input() {
    assert!(blocks("   \n\t\n  \n").is_empty());
}

#[test]
fn raw_only_input_is_one_block() {
    let blocks = blocks("first\nsecond");
    assert_eq!(blocks.len(), 1);
    assert_eq!(raw_script(&blocks[0]), "first\nsecond\n");
}

#[test]
fn crlf_raw_content_is_normalized() {
    let blocks = blocks("first\r\nsecond\r\n");
    assert_eq!(blocks.len(), 1);
    assert_eq!(raw_script(&blocks[0]), "first\nsecond\n");
}

#[test]
fn raw_lines_keep_their_indentation() {
    let blocks = blocks("  indented\n\tkeep tabs");
    assert_eq!(raw_script(&blocks[0]), "  indented\n\tkeep tabs\n");
}

#[test]
fn minimal_region_payload() {
    let blocks = blocks("BLOCK:Script\nX\nENDBLOCK");
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].type_id(), Some("Script"));
    assert_eq!(script_code(&blocks[0]), "X\n");
}

#[test]
fn payload_lines_are_trimmed() {
    let blocks = blocks("BLOCK:Script\n   X  \nENDBLOCK");
    assert_eq!(script_code(&blocks[0]), "X\n");
}

#[test]
fn crlf_region_behaves_like_lf() {
    let blocks = blocks("BLOCK:Script\r\nX\r\nENDBLOCK\r\n");
    assert_eq!(blocks.len(), 1);
    assert_eq!(script_code(&blocks[0]), "X\n");
}

#[test]
fn back_to_back_regions_produce_no_raw_block() {
    let blocks = blocks("BLOCK:Script\na\nENDBLOCK\nBLOCK:Script\nb\nENDBLOCK");
    assert_eq!(blocks.len(), 2);
    assert_eq!(script_code(&blocks[0]), "a\n");
    assert_eq!(script_code(&blocks[1]), "b\n");
}

#[test]
fn raw_segment_then_region() {
    let blocks = blocks("hello\nBLOCK:Script\nX\nENDBLOCK");
    assert_eq!(blocks.len(), 2);
    // The open directive is never absorbed into the raw payload.
    assert_eq!(raw_script(&blocks[0]), "hello\n");
    assert_eq!(blocks[1].type_id(), Some("Script"));
}

#[test]
fn blank_boundary_between_regions_is_discarded() {
    let blocks = blocks("BLOCK:Script\na\nENDBLOCK\n\nBLOCK:Script\nb\nENDBLOCK\n");
    assert_eq!(blocks.len(), 2);
}

#[test]
fn directives_do_not_nest() {
    let blocks = blocks("BLOCK:Script\nBLOCK:Parse\nENDBLOCK");
    assert_eq!(blocks.len(), 1);
    assert_eq!(script_code(&blocks[0]), "BLOCK:Parse\n");
}

#[test]
fn stray_close_directive_is_raw_content() {
    let blocks = blocks("ENDBLOCK\nmore text");
    assert_eq!(blocks.len(), 1);
    assert_eq!(raw_script(&blocks[0]), "ENDBLOCK\nmore text\n");
}

#[test]
fn source_order_is_preserved() {
    let source = "one\nBLOCK:Script\na\nENDBLOCK\ntwo\nBLOCK:Script\nb\nENDBLOCK";
    let blocks = blocks(source);
    assert_eq!(blocks.len(), 4);
    assert_eq!(raw_script(&blocks[0]), "one\n");
    assert_eq!(script_code(&blocks[1]), "a\n");
    assert_eq!(raw_script(&blocks[2]), "two\n");
    assert_eq!(script_code(&blocks[3]), "b\n");
}

#[test]
fn structured_span_covers_the_region() {
    let source = "BLOCK:Script\nX\nENDBLOCK";
    let blocks = blocks(source);
    assert_eq!(blocks[0].span(), &(0..source.len()));
}

#[test]
fn malformed_directive_bad_first_character() {
    let error = transpile("BLOCK:1abc").unwrap_err();
    assert_eq!(error.line, 1);
    assert_eq!(
        error.kind,
        ErrorKind::MalformedDirective {
            line_text: "BLOCK:1abc".to_string()
        }
    );
}

#[test]
fn malformed_directive_trailing_text() {
    let error = transpile("BLOCK:Script extra").unwrap_err();
    assert!(matches!(error.kind, ErrorKind::MalformedDirective { .. }));
}

#[test]
fn malformed_directive_missing_identifier() {
    let error = transpile("BLOCK:").unwrap_err();
    assert!(matches!(error.kind, ErrorKind::MalformedDirective { .. }));
}

#[test]
fn malformed_directive_after_raw_cites_its_line() {
    let error = transpile("one\ntwo\nBLOCK:3abc").unwrap_err();
    assert_eq!(error.line, 3);
}

#[test]
fn unknown_block_type_cites_the_identifier() {
    let error = transpile("BLOCK:DoesNotExist\nENDBLOCK").unwrap_err();
    assert_eq!(error.line, 1);
    assert_eq!(
        error.kind,
        ErrorKind::UnknownBlockType {
            id: "DoesNotExist".to_string()
        }
    );
    assert!(error.to_string().contains("DoesNotExist"));
}

#[test]
fn unterminated_region_is_an_error() {
    let error = transpile("text before\nBLOCK:Script\nX").unwrap_err();
    assert_eq!(error.line, 2);
    assert_eq!(
        error.kind,
        ErrorKind::UnterminatedBlock {
            id: "Script".to_string()
        }
    );
}

#[test]
fn option_errors_cite_the_absolute_source_line() {
    let error = transpile("intro\nBLOCK:HttpRequest\nurl = \"x\"\nmethod = NOPE\nENDBLOCK")
        .unwrap_err();
    assert_eq!(error.line, 4);
    match error.kind {
        ErrorKind::InvalidOptions { id, source } => {
            assert_eq!(id, "HttpRequest");
            assert!(source.message.contains("unknown http method"));
        }
        other => panic!("expected InvalidOptions, got {:?}", other),
    }
}

#[test]
fn open_directive_with_leading_whitespace_still_opens() {
    let blocks = blocks("   BLOCK:Script\nX\n   ENDBLOCK");
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].type_id(), Some("Script"));
}

#[test]
fn custom_registry_controls_known_types() {
    use stackscript::block::script::ScriptOptions;

    let mut registry = Registry::empty();
    registry.register("Snippet", || BlockOptions::Script(ScriptOptions::default()));

    let transpiler = Transpiler::new("BLOCK:Snippet\nhi\nENDBLOCK".to_string(), 0, &registry);
    let stack = transpiler.transpile().expect("transpile failed");
    assert_eq!(stack.blocks[0].type_id(), Some("Snippet"));

    let transpiler = Transpiler::new("BLOCK:Script\nhi\nENDBLOCK".to_string(), 0, &registry);
    assert!(transpiler.transpile().is_err());
}
