use pretty_assertions::assert_eq;
use whisker::{compile, ErrorKind, Token};

fn text(s: &str) -> Token {
    Token::Text(s.into())
}

fn var(name: &str) -> Token {
    Token::Variable {
        name: name.into(),
        escape: true,
    }
}

fn raw(name: &str) -> Token {
    Token::Variable {
        name: name.into(),
        escape: false,
    }
}

fn section(name: &str, tokens: Vec<Token>) -> Token {
    Token::Section {
        name: name.into(),
        inverted: false,
        tokens,
    }
}

fn inverted(name: &str, tokens: Vec<Token>) -> Token {
    Token::Section {
        name: name.into(),
        inverted: true,
        tokens,
    }
}

fn partial(name: &str) -> Token {
    Token::Partial { name: name.into() }
}

#[track_caller]
fn tokens(source: &str) -> Vec<Token> {
    compile(source).unwrap().tokens().to_vec()
}

#[track_caller]
fn compile_err(source: &str) -> whisker::Error {
    compile(source).unwrap_err()
}

#[test]
fn compile_empty() {
    assert!(tokens("").is_empty());
}

#[test]
fn compile_plain_text() {
    assert_eq!(
        tokens("lorem ipsum\ndolor } { sit amet"),
        [text("lorem ipsum\ndolor } { sit amet")]
    );
}

#[test]
fn compile_variable_whitespace_is_insignificant() {
    let exp = [text("Welcome to "), var("place"), text("!")];
    assert_eq!(tokens("Welcome to {{ place }}!"), exp);
    assert_eq!(tokens("Welcome to {{place}}!"), exp);
    assert_eq!(tokens("Welcome to {{  place  }}!"), exp);
    assert_eq!(tokens("Welcome to {{\n\tplace\n}}!"), exp);
}

#[test]
fn compile_variable_line_is_never_standalone() {
    assert_eq!(
        tokens("Welcome to {{ place }}!\n"),
        [text("Welcome to "), var("place"), text("!\n")]
    );
    assert_eq!(
        tokens("a\n  {{ place }}  \nb"),
        [text("a\n"), text("  "), var("place"), text("  \nb")]
    );
}

#[test]
fn compile_variable_content_grammar() {
    assert_eq!(
        tokens("{{ user.first-name? }}{{ a/b! }}"),
        [var("user.first-name?"), var("a/b!")]
    );
    assert_eq!(tokens("{{ . }}"), [var(".")]);
}

#[cfg(feature = "unicode")]
#[test]
fn compile_variable_unicode_name() {
    assert_eq!(tokens("{{ привіт }}"), [var("привіт")]);
}

#[test]
fn compile_unescaped_variable() {
    assert_eq!(tokens("{{{ a }}} {{& b }}"), [raw("a"), text(" "), raw("b")]);
}

#[test]
fn compile_comment_elision() {
    let exp = [text("12"), text("34")];
    for source in [
        "12{{! comment }}34",
        "12{{!comment}}34",
        "12{{! comment}}34",
        "12{{!comment }}34",
        "12{{! comment !}}34",
        "12{{!comment!}}34",
        "12{{! comment!}}34",
        "12{{!comment !}}34",
    ] {
        assert_eq!(tokens(source), exp, "source: {source:?}");
    }
}

#[test]
fn compile_comment_standalone() {
    assert_eq!(tokens("12\n{{! comment }}\n34"), [text("12\n"), text("34")]);
    assert_eq!(
        tokens("12\n  \t{{! comment }}  \n34"),
        [text("12\n"), text("34")]
    );
}

#[test]
fn compile_comment_not_standalone() {
    assert_eq!(
        tokens("12\n  {{! comment }} x\n34"),
        [text("12\n"), text("  "), text(" x\n34")]
    );
}

#[test]
fn compile_comment_multiline() {
    let exp = [text("12\n"), text("34")];
    assert_eq!(tokens("12\n{{!\ncomment\n}}\n34"), exp);
    assert_eq!(tokens("12\n{{! comment\n  spans lines !}}\n34"), exp);
    assert_eq!(tokens("12\n  {{!\n\n}}  \n34"), exp);
}

#[test]
fn compile_section() {
    assert_eq!(
        tokens("{{# users }}<{{ name }}>{{/ users }}"),
        [section("users", vec![text("<"), var("name"), text(">")])]
    );
}

#[test]
fn compile_section_standalone_lines() {
    assert_eq!(
        tokens("Users:\n{{# users }}\n  {{ name }}\n{{/ users }}\nDone"),
        [
            text("Users:\n"),
            section("users", vec![text("  "), var("name"), text("\n")]),
            text("Done"),
        ]
    );
}

#[test]
fn compile_section_standalone_at_end_of_input() {
    assert_eq!(
        tokens("{{# a }}\nx\n  {{/ a }}  "),
        [section("a", vec![text("x\n")])]
    );
}

#[test]
fn compile_section_crlf() {
    assert_eq!(
        tokens("{{# a }}\r\nx\r\n{{/ a }}\r\n"),
        [section("a", vec![text("x\r\n")])]
    );
}

#[test]
fn compile_section_nested() {
    assert_eq!(
        tokens("{{#a}}1{{^b}}2{{#c}}3{{/c}}{{/b}}4{{/a}}5"),
        [
            section(
                "a",
                vec![
                    text("1"),
                    inverted("b", vec![text("2"), section("c", vec![text("3")])]),
                    text("4"),
                ]
            ),
            text("5"),
        ]
    );
}

#[test]
fn compile_inverted_section() {
    assert_eq!(
        tokens("{{^ users }}none{{/ users }}"),
        [inverted("users", vec![text("none")])]
    );
}

#[test]
fn compile_partial() {
    assert_eq!(
        tokens("a {{> user }} b\n{{> footer }}\n"),
        [text("a "), partial("user"), text(" b\n"), partial("footer")]
    );
}

#[test]
fn compile_token_tree_walk() {
    fn names<'a>(tokens: &'a [Token], out: &mut Vec<&'a str>) {
        for token in tokens {
            out.extend(token.name());
            if let Some(children) = token.tokens() {
                names(children, out);
            }
        }
    }

    let source = "{{# users }}{{> user }}{{^ admin }}{{ name }}{{/ admin }}{{/ users }}!";
    let template = compile(source).unwrap();
    let mut out = Vec::new();
    names(template.tokens(), &mut out);
    assert_eq!(out, ["users", "user", "admin", "name"]);

    let users = &template.tokens()[0];
    assert_eq!(users.tokens().map(<[Token]>::len), Some(2));
    assert_eq!(users.tokens().unwrap()[0], partial("user"));

    let bang = &template.tokens()[1];
    assert_eq!(bang.name(), None);
    assert_eq!(bang.tokens(), None);
    assert_eq!(var("name").tokens(), None);
}

#[test]
fn compile_err_unexpected_tag_sigil() {
    let err = compile_err("lorem {{= <% %> =}}");
    assert_eq!(err.kind(), ErrorKind::UnexpectedTagSigil);
    assert_eq!(
        err.to_string(),
        "unexpected tag type `=` between bytes 8 and 9"
    );
}

#[test]
fn compile_err_illegal_tag_content() {
    for source in ["{{}}", "{{ }}", "{{# }}", "{{ a b }}", "{{ a, }}", "{{{ a b }}}"] {
        let err = compile_err(source);
        assert_eq!(err.kind(), ErrorKind::IllegalTagContent, "source: {source:?}");
    }
}

#[test]
fn compile_err_unclosed_tag() {
    for source in ["{{", "{{ a", "{{ a }", "{{{ a }}", "{{! comment }"] {
        let err = compile_err(source);
        assert_eq!(err.kind(), ErrorKind::UnclosedTag, "source: {source:?}");
    }
}

#[test]
fn compile_err_unclosed_tag_pretty() {
    let err = compile_err("lorem {{ ipsum }");
    assert_eq!(
        format!("{:#}", err),
        "
   |
 1 | lorem {{ ipsum }
   |       ^^ unclosed variable tag
"
    );
}

#[test]
fn compile_err_unclosed_section_names_outermost() {
    let err = compile_err("{{# a }}{{# b }}");
    assert_eq!(err.kind(), ErrorKind::UnclosedSection);
    assert_eq!(err.message(), "unclosed section `a`");
    assert_eq!(err.to_string(), "unclosed section `a` between bytes 0 and 8");
}

#[test]
fn compile_err_unclosed_section_pretty() {
    let err = compile_err("Hi\n{{# users }}\n{{ name }}");
    assert_eq!(
        format!("{:#}", err),
        "
   |
 2 | {{# users }}
   | ^^^^^^^^^^^^ unclosed section `users`
"
    );
    assert_eq!(format!("{:?}", err), format!("{:#}", err));
}

#[test]
fn compile_err_pretty_expands_tabs() {
    let err = compile_err("\t{{^a}}\r\n");
    assert_eq!(err.kind(), ErrorKind::UnclosedSection);
    assert_eq!(
        format!("{:#}", err),
        "
   |
 1 |     {{^a}}
   |     ^^^^^^ unclosed section `a`
"
    );
}

#[test]
fn compile_err_section_mismatch() {
    let err = compile_err("{{# a }}{{/ b }}");
    assert_eq!(err.kind(), ErrorKind::SectionMismatch);
    assert_eq!(
        err.to_string(),
        "expected close tag for `a`, found `b` between bytes 8 and 16"
    );
}

#[test]
fn compile_err_section_close_without_open() {
    let err = compile_err("x {{/ a }}");
    assert_eq!(err.kind(), ErrorKind::SectionMismatch);
    assert_eq!(
        err.message(),
        "unexpected close tag for `a`, no section is open"
    );
}
