use stackscript::block::http_request::{HttpMethod, HttpRequestOptions};
use stackscript::block::options::BlockOptions;
use stackscript::block::{BlockInstance, RawBlock, StructuredBlock};
use stackscript::parser::Transpiler;
use stackscript::registry::Registry;
use stackscript::writer;

fn transpile(source: &str) -> Vec<BlockInstance> {
    let registry = Registry::standard();
    Transpiler::new(source.to_string(), 0, &registry)
        .transpile()
        .expect("transpile failed")
        .blocks
}

/// Structured blocks must keep identifier and options across a
/// write/transpile cycle; raw blocks must keep their script.
fn assert_equivalent(before: &[BlockInstance], after: &[BlockInstance]) {
    assert_eq!(before.len(), after.len());
    for (a, b) in before.iter().zip(after) {
        match (a, b) {
            (BlockInstance::Structured(a), BlockInstance::Structured(b)) => {
                assert_eq!(a.id(), b.id());
                assert_eq!(a.options, b.options);
            }
            (BlockInstance::Raw(a), BlockInstance::Raw(b)) => {
                assert_eq!(a.script, b.script);
            }
            (a, b) => panic!("block kind changed: {:?} became {:?}", a, b),
        }
    }
}

const MIXED_SCRIPT: &str = "\
fetch the landing page first
BLOCK:HttpRequest
  method = GET
  url = \"https://example.com\"
  header = \"Accept: text/html\"
ENDBLOCK
BLOCK:Parse
  mode = Between
  left = \"<title>\"
  right = \"</title>\"
  output = \"title\"
ENDBLOCK
note: the next block decides the outcome
BLOCK:KeyCheck
  success = \"Welcome\"
  failure = \"Denied\"
ENDBLOCK
BLOCK:Script
log(title)
ENDBLOCK
";

#[test]
fn roundtrip_preserves_a_mixed_stack() {
    let before = transpile(MIXED_SCRIPT);
    assert_eq!(before.len(), 6);

    let script = writer::write_stack(&before);
    let after = transpile(&script);
    assert_equivalent(&before, &after);
}

#[test]
fn writing_is_idempotent() {
    let first = writer::write_stack(&transpile(MIXED_SCRIPT));
    let second = writer::write_stack(&transpile(&first));
    assert_eq!(first, second);
}

#[test]
fn hand_built_stack_serializes_and_reparses() {
    let mut options = HttpRequestOptions::default();
    options.method = HttpMethod::Post;
    options.url = "https://example.com/submit".to_string();
    options.body = Some("a=1".to_string());

    let blocks = vec![
        BlockInstance::Raw(RawBlock::new("prepare input\n")),
        BlockInstance::Structured(StructuredBlock::new(
            "HttpRequest",
            BlockOptions::HttpRequest(options.clone()),
        )),
    ];

    let script = writer::write_stack(&blocks);
    let reparsed = transpile(&script);

    assert_eq!(reparsed.len(), 2);
    match &reparsed[0] {
        BlockInstance::Raw(raw) => assert_eq!(raw.script, "prepare input\n"),
        other => panic!("expected a raw block, got {:?}", other),
    }
    match &reparsed[1] {
        BlockInstance::Structured(block) => {
            assert_eq!(block.id(), "HttpRequest");
            assert_eq!(block.options, BlockOptions::HttpRequest(options));
        }
        other => panic!("expected a structured block, got {:?}", other),
    }
}

#[test]
fn quoted_values_survive_the_roundtrip() {
    let source = "BLOCK:Parse\n  left = \"value=\\\"\"\n  right = \"\\\"\"\nENDBLOCK\n";
    let before = transpile(source);
    let after = transpile(&writer::write_stack(&before));
    assert_equivalent(&before, &after);
}

#[test]
fn script_block_code_survives_the_roundtrip() {
    let source = "BLOCK:Script\nlet x = 1\n\nif (x) { go() }\nENDBLOCK\n";
    let before = transpile(source);
    let after = transpile(&writer::write_stack(&before));
    assert_equivalent(&before, &after);
}
