//! Coverage for condition parsing and evaluation.
//!
//! Expected values below follow the right-grouping grammar, where every binary
//! operator takes the whole remainder of the line as its right operand. Several
//! cases are chosen so that conventional precedence would give the opposite
//! answer.

use rstest::rstest;

use super::{Condition, ExprError, MAX_DEPTH};
use crate::tags::TagContext;

fn parse(input: &str) -> Condition {
    Condition::parse(input).unwrap_or_else(|err| panic!("parse condition `{input}`: {err}"))
}

fn parse_error(input: &str) -> ExprError {
    match Condition::parse(input) {
        Ok(condition) => panic!("expected parse error for `{input}`, got {condition}"),
        Err(err) => err,
    }
}

fn tags(names: &[&str]) -> TagContext {
    names.iter().copied().collect()
}

#[rstest]
#[case("A && B || C", &["A", "C"], true)]
#[case("A && B || C", &["C"], false)]
#[case("A && B || C", &["A", "B"], true)]
#[case("A || B && C", &["B"], false)]
#[case("A ^ B || C", &["A", "C"], false)]
#[case("A ^ B ^ C", &["A", "B", "C"], true)]
#[case("!A && B", &[], false)]
#[case("!A && B", &["B"], true)]
#[case("!A || B", &["A"], false)]
#[case("(A && B) || C", &["C"], true)]
#[case("!(A || B)", &[], true)]
#[case("!(A || B)", &["B"], false)]
#[case("A&&!B", &["A"], true)]
fn evaluates_with_right_grouping(
    #[case] input: &str,
    #[case] defined: &[&str],
    #[case] expected: bool,
) {
    assert_eq!(parse(input).evaluate(&tags(defined)), expected, "{input}");
}

#[rstest]
#[case("A && B || C", "(A && (B || C))")]
#[case("!A && B", "(!A && B)")]
#[case("A ^ (B || C) && D", "(A ^ ((B || C) && D))")]
#[case("!!A", "!!A")]
fn renders_grouping(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(parse(input).to_string(), expected);
}

#[rstest]
#[case(&[])]
#[case(&["A"])]
fn double_negation_is_identity(#[case] defined: &[&str]) {
    let context = tags(defined);
    assert_eq!(
        parse("!!A").evaluate(&context),
        parse("A").evaluate(&context)
    );
}

#[test]
fn tags_are_case_sensitive() {
    let condition = parse("Debug");
    assert!(!condition.evaluate(&tags(&["debug"])));
    assert!(condition.evaluate(&tags(&["Debug"])));
}

#[test]
fn undoubled_operators_parse_as_doubled() {
    let context = tags(&["A"]);
    assert_eq!(parse("A & B"), parse("A && B"));
    assert!(parse("A | B").evaluate(&context));
}

#[rstest]
#[case("", ExprError::Empty)]
#[case("   ", ExprError::Empty)]
#[case("(A", ExprError::UnclosedParen { offset: 0 })]
#[case("A && (B", ExprError::UnclosedParen { offset: 5 })]
#[case("A B", ExprError::TrailingTokens { found: "tag `B`".into(), offset: 2 })]
#[case("A )", ExprError::TrailingTokens { found: "')'".into(), offset: 2 })]
#[case("(A B)", ExprError::Unexpected { expected: "')'", found: "tag `B`".into(), offset: 3 })]
#[case("&& A", ExprError::Unexpected { expected: "tag or '('", found: "'&&'".into(), offset: 0 })]
#[case("A ||", ExprError::Unexpected { expected: "tag or '('", found: "end of line".into(), offset: 4 })]
#[case("!", ExprError::Unexpected { expected: "tag or '('", found: "end of line".into(), offset: 1 })]
fn reports_parse_errors(#[case] input: &str, #[case] expected: ExprError) {
    assert_eq!(parse_error(input), expected);
}

#[test]
fn empty_condition_message_is_distinct() {
    assert_eq!(
        parse_error("").to_string(),
        "expected condition but got nothing"
    );
}

#[test]
fn rejects_runaway_nesting() {
    let depth = MAX_DEPTH + 1;
    let input = format!("{}A{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(
        parse_error(&input),
        ExprError::TooDeep { limit: MAX_DEPTH }
    );
}

#[test]
fn accepts_nesting_within_limit() {
    let depth = MAX_DEPTH - 1;
    let input = format!("{}A{}", "(".repeat(depth), ")".repeat(depth));
    assert!(parse(&input).evaluate(&tags(&["A"])));
}

#[test]
fn accepts_nesting_at_the_limit() {
    let input = format!("{}A{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
    assert!(parse(&input).evaluate(&tags(&["A"])));
}

#[rstest]
#[case(&["A"], true)]
#[case(&[], false)]
fn long_operator_chains_are_not_nesting(#[case] defined: &[&str], #[case] expected: bool) {
    let input = ["A"; 1000].join(" && ");
    assert_eq!(parse(&input).evaluate(&tags(defined)), expected);
}

#[test]
fn long_mixed_chain_still_groups_to_the_right() {
    let input = format!("B || {}", ["C"; 600].join(" && "));
    assert!(parse(&input).evaluate(&tags(&["B"])));
    assert!(!parse(&input).evaluate(&tags(&[])));
    let input = format!("{} || C", ["A"; 600].join(" && "));
    assert!(parse(&input).evaluate(&tags(&["A"])));
    assert!(!parse(&input).evaluate(&tags(&["C"])));
}

#[test]
fn tags_compare_as_raw_bytes() {
    let mut context = TagContext::new();
    context.define(b"\xff".as_slice());
    let mut source = crate::source::ByteSource::new(&b"\xfe"[..]);
    let lexed = super::Lexer::new(&mut source)
        .tokenize()
        .unwrap_or_else(|err| panic!("lex failed: {err}"));
    let condition =
        Condition::from_lexed(&lexed).unwrap_or_else(|err| panic!("parse failed: {err}"));
    assert!(!condition.evaluate(&context));
    assert_eq!(condition.to_string(), "\u{fffd}");
}
