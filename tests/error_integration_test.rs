use tmplparse::options::DEFAULT_MAX_DEPTH;
use tmplparse::{ErrorKind, Location, ParseError, ParseOptions};

fn parse_err(source: &str) -> ParseError {
    let options = ParseOptions::new().with_builtins();
    match tmplparse::parse_with_options("err", source, &options) {
        Ok(_) => panic!("Expected {source:?} to fail"),
        Err(e) => e,
    }
}

/// Test syntax errors and their messages
#[test]
fn test_syntax_error_messages() {
    let cases = [
        ("{{end}}", "unexpected {{end}}"),
        ("{{else}}", "unexpected {{else}}"),
        ("{{if}}x{{end}}", "missing value for if"),
        ("{{ . | }}", "missing command after '|'"),
        ("{{ . | 3 }}", "non executable command in pipeline stage 2"),
        ("{{ $x }}", "undefined variable \"$x\""),
        ("{{ frobnicate }}", "function \"frobnicate\" not defined"),
        ("{{ break }}", "{{break}} outside {{range}}"),
        ("{{ continue }}", "{{continue}} outside {{range}}"),
        ("{{ true.Field }}", "unexpected . after term \"true\""),
        ("{{ $a, $b := . }}", "too many declarations in command"),
        ("{{ range $a, 3 }}{{end}}", "range can only initialize variables"),
        ("{{ range $a, $b, $c := . }}{{end}}", "too many declarations in range"),
        ("{{if .}}a{{else}}b{{else}}c{{end}}", "expected end; found {{else}}"),
        (r#"{{template .Name}}"#, "unexpected \".Name\" in template clause"),
        (r#"{{define "a"}}x{{else}}y{{end}}"#, "unexpected {{else}} in define clause"),
        (r#"{{define "a"}}1{{end}}{{define "a"}}2{{end}}"#, "multiple definition of template \"a\""),
        (
            r#"{{define "a"}}X{{end}}{{define "a"}}{{if .}}{{end}}{{end}}"#,
            "multiple definition of template \"a\"",
        ),
        ("{{ .A = 1 }}", "unexpected \"=\" in operand"),
    ];
    for (source, message) in cases {
        let err = parse_err(source);
        assert_eq!(err.message, message, "for {source:?}");
        assert_eq!(err.kind, ErrorKind::Syntax, "for {source:?}");
        assert_eq!(err.name, "err");
    }
}

/// Test unclosed constructs are reported at their opening keyword
#[test]
fn test_unclosed_constructs() {
    let cases = [
        ("{{ if . }}body", "unexpected EOF: unclosed if", Location::new(3, 2)),
        ("{{range .}}", "unexpected EOF: unclosed range", Location::new(2, 5)),
        ("x{{ with . }}", "unexpected EOF: unclosed with", Location::new(4, 4)),
        (r#"{{define "d"}}"#, "unexpected EOF: unclosed define clause", Location::new(2, 6)),
        (r#"{{block "b" .}}"#, "unexpected EOF: unclosed block clause", Location::new(2, 5)),
        ("{{if .}}{{else}}", "unexpected EOF: unclosed if", Location::new(2, 2)),
    ];
    for (source, message, location) in cases {
        let err = parse_err(source);
        assert_eq!(err.message, message, "for {source:?}");
        assert_eq!(err.location, location, "for {source:?}");
        assert!(err.is_syntax());
    }
}

/// Test lexical errors surface with their own kind
#[test]
fn test_lex_errors() {
    let err = parse_err("abc {{ .Name ");
    assert!(err.is_lex());
    assert_eq!(err.message, "unclosed action");
    assert_eq!(err.location, Location::new(4, 9));

    let err = parse_err(r#"{{ "open }}"#);
    assert!(err.is_lex());
    assert_eq!(err.message, "unterminated quoted string");

    let err = parse_err("{{/* never closed");
    assert!(err.is_lex());
    assert_eq!(err.message, "unclosed comment");

    let err = parse_err("{{ (len . }}");
    assert!(err.is_lex());
    assert_eq!(err.message, "unclosed left paren");
}

/// Test malformed literals
#[test]
fn test_literal_errors() {
    let err = parse_err("{{ 99999999999999999999 }}");
    assert_eq!(err.message, "integer overflow: \"99999999999999999999\"");
    assert_eq!(err.location, Location::new(3, 20));

    let err = parse_err(r#"{{ "\q" }}"#);
    assert!(err.is_syntax());
    assert_eq!(err.location, Location::new(3, 4));

    let err = parse_err(r#"{{ "\x+1" }}"#);
    assert!(err.is_syntax());
    assert_eq!(err.location, Location::new(3, 6));

    let err = parse_err(r"{{ '\u+041' }}");
    assert!(err.is_syntax());
    assert_eq!(err.location, Location::new(3, 8));
}

/// Test the nesting limit
#[test]
fn test_depth_limit() {
    let depth = 20;
    let source = format!("{}{}", "{{if .}}".repeat(depth), "{{end}}".repeat(depth));

    let options = ParseOptions::new().max_depth(depth);
    assert!(tmplparse::parse_with_options("deep", &source, &options).is_ok());

    let options = ParseOptions::new().max_depth(depth - 1);
    let err = tmplparse::parse_with_options("deep", &source, &options).unwrap_err();
    assert!(err.is_internal_limit());
    assert_eq!(err.message, format!("max nesting depth {} exceeded", depth - 1));

    let parens = format!("{{{{ {}.{} }}}}", "(".repeat(depth), ")".repeat(depth));
    let err = tmplparse::parse_with_options("deep", &parens, &options).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InternalLimit);
}

/// Test the default limit stops pathological input on an ordinary thread
#[test]
fn test_default_depth_limit() {
    let nested_with = std::thread::spawn(|| {
        let source = "{{with .}}".repeat(10_000);
        tmplparse::parse("deep", &source, "", "", &[]).unwrap_err()
    })
    .join()
    .unwrap();
    assert!(nested_with.is_internal_limit());
    assert_eq!(nested_with.location, Location::new(DEFAULT_MAX_DEPTH * 10 + 2, 4));

    let nested_parens = std::thread::spawn(|| {
        let source = format!("{{{{ {}.{} }}}}", "(".repeat(10_000), ")".repeat(10_000));
        tmplparse::parse("deep", &source, "", "", &[]).unwrap_err()
    })
    .join()
    .unwrap();
    assert!(nested_parens.is_internal_limit());
    assert_eq!(nested_parens.location, Location::new(3 + DEFAULT_MAX_DEPTH, 1));
}

/// Test error lines and display
#[test]
fn test_error_line_numbers() {
    let err = parse_err("one\ntwo\n{{ $missing }}");
    assert_eq!(err.line, 3);
    assert_eq!(
        err.to_string(),
        "template: err:3: undefined variable \"$missing\""
    );
}

/// Test that errors are deterministic
#[test]
fn test_errors_are_deterministic() {
    let source = "{{ range . }}{{ $v }}{{ end }}";
    assert_eq!(parse_err(source), parse_err(source));
}
