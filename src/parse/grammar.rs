use winnow::ascii::{dec_int, till_line_ending};
use winnow::combinator::{alt, cut_err, delimited, opt, preceded, repeat, separated};
use winnow::error::{ErrMode, ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, take_while};

use crate::{CheckRef, CheckType, Policy, PolicyCheck, Value};

use super::parser::ParsedCatalog;

// -- Whitespace & comments --------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    let _: () = repeat(
        0..,
        alt((
            take_while(1.., |c: char| c.is_ascii_whitespace()).void(),
            ('#', till_line_ending).void(),
        )),
    )
    .parse_next(input)?;
    Ok(())
}

// -- Identifiers ------------------------------------------------------------

fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

// -- Values -----------------------------------------------------------------

fn string_literal(input: &mut &str) -> ModalResult<String> {
    '"'.parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = any.parse_next(input)?;
        match ch {
            '"' => return Ok(s),
            '\\' => {
                let esc = any.parse_next(input)?;
                match esc {
                    '"' => s.push('"'),
                    '\\' => s.push('\\'),
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            c => s.push(c),
        }
    }
}

fn value(input: &mut &str) -> ModalResult<Value> {
    ws.parse_next(input)?;
    alt((
        string_literal.map(Value::String),
        dec_int::<_, i64, _>.map(Value::Int),
        ident.map(|word| match word {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            atom => Value::atom(atom),
        }),
    ))
    .context(StrContext::Expected(StrContextValue::Description("value")))
    .parse_next(input)
}

// -- Checks -----------------------------------------------------------------

fn param(input: &mut &str) -> ModalResult<(String, Value)> {
    ws.parse_next(input)?;
    let key = ident.parse_next(input)?;
    ws.parse_next(input)?;
    cut_err(':')
        .context(StrContext::Expected(StrContextValue::CharLiteral(':')))
        .parse_next(input)?;
    let val = cut_err(value).parse_next(input)?;
    Ok((key.to_owned(), val))
}

fn check_ref(input: &mut &str) -> ModalResult<CheckRef> {
    ws.parse_next(input)?;
    let kind = ident
        .context(StrContext::Expected(StrContextValue::Description("check")))
        .parse_next(input)?;
    let params: Option<Vec<(String, Value)>> = opt(delimited(
        (ws, '('),
        separated(0.., param, (ws, ',')),
        (
            ws,
            cut_err(')').context(StrContext::Expected(StrContextValue::CharLiteral(')'))),
        ),
    ))
    .parse_next(input)?;

    Ok(params
        .unwrap_or_default()
        .into_iter()
        .fold(CheckRef::new(kind), |check, (key, val)| check.param(&key, val)))
}

// -- Policy statements ------------------------------------------------------

enum Statement {
    Condition(CheckRef),
    Check(PolicyCheck),
}

fn statement(input: &mut &str) -> ModalResult<Statement> {
    ws.parse_next(input)?;
    let checkpoint = input.checkpoint();
    let keyword = ident.parse_next(input)?;
    let check_type = match keyword {
        "condition" => None,
        "authorize_if" => Some(CheckType::AuthorizeIf),
        "forbid_if" => Some(CheckType::ForbidIf),
        "authorize_unless" => Some(CheckType::AuthorizeUnless),
        "forbid_unless" => Some(CheckType::ForbidUnless),
        _ => {
            input.reset(&checkpoint);
            return Err(ErrMode::from_input(input));
        }
    };
    let check = cut_err(check_ref).parse_next(input)?;
    Ok(match check_type {
        None => Statement::Condition(check),
        Some(check_type) => Statement::Check(PolicyCheck { check_type, check }),
    })
}

// -- Policy definitions -----------------------------------------------------

fn bypass_annotation(input: &mut &str) -> ModalResult<()> {
    (
        ws,
        '(',
        ws,
        cut_err("bypass").context(StrContext::Expected(StrContextValue::StringLiteral(
            "bypass",
        ))),
        ws,
        cut_err(')'),
    )
        .void()
        .parse_next(input)
}

fn policy_def(input: &mut &str) -> ModalResult<Policy> {
    ws.parse_next(input)?;
    "policy".parse_next(input)?;

    let description = opt(preceded(ws, string_literal)).parse_next(input)?;
    let bypass = opt(bypass_annotation).parse_next(input)?.is_some();

    ws.parse_next(input)?;
    cut_err(':')
        .context(StrContext::Expected(StrContextValue::CharLiteral(':')))
        .parse_next(input)?;

    let statements: Vec<Statement> = repeat(0.., statement).parse_next(input)?;
    let mut policy = Policy {
        description,
        bypass,
        ..Policy::default()
    };
    for statement in statements {
        match statement {
            Statement::Condition(check) => policy.condition.push(check),
            Statement::Check(check) => policy.checks.push(check),
        }
    }
    Ok(policy)
}

// -- Resource definitions ---------------------------------------------------

fn resource_def(input: &mut &str) -> ModalResult<(String, Vec<Policy>)> {
    ws.parse_next(input)?;
    "resource".parse_next(input)?;
    ws.parse_next(input)?;

    let name = cut_err(ident)
        .context(StrContext::Expected(StrContextValue::Description(
            "resource name",
        )))
        .parse_next(input)?;

    ws.parse_next(input)?;
    cut_err(':')
        .context(StrContext::Expected(StrContextValue::CharLiteral(':')))
        .parse_next(input)?;

    let policies: Vec<Policy> = repeat(0.., policy_def).parse_next(input)?;
    Ok((name.to_owned(), policies))
}

// -- Top-level parser -------------------------------------------------------

pub fn parse_catalog(input: &mut &str) -> ModalResult<ParsedCatalog> {
    let resources: Vec<(String, Vec<Policy>)> = repeat(0.., resource_def).parse_next(input)?;
    ws.parse_next(input)?;
    Ok(ParsedCatalog { resources })
}

#[cfg(test)]
mod tests {
    use crate::check;
    use crate::parse::parse;

    use super::*;

    fn single_policy(input: &str) -> Policy {
        let mut parsed = parse(input).unwrap();
        assert_eq!(parsed.resources.len(), 1);
        let (_, mut policies) = parsed.resources.remove(0);
        assert_eq!(policies.len(), 1);
        policies.remove(0)
    }

    #[test]
    fn parse_empty_input() {
        let parsed = parse("  # nothing here\n").unwrap();
        assert!(parsed.resources.is_empty());
    }

    #[test]
    fn parse_resource_without_policies() {
        let parsed = parse("resource post:").unwrap();
        assert_eq!(parsed.resources[0].0, "post");
        assert!(parsed.resources[0].1.is_empty());
    }

    #[test]
    fn parse_single_policy() {
        let policy = single_policy("resource post:\n    policy:\n        authorize_if owner");
        assert_eq!(policy.description, None);
        assert!(!policy.bypass);
        assert!(policy.condition.is_empty());
        assert_eq!(
            policy.checks,
            vec![PolicyCheck {
                check_type: CheckType::AuthorizeIf,
                check: check("owner"),
            }]
        );
    }

    #[test]
    fn parse_description_and_bypass() {
        let policy = single_policy(
            "resource post:\n    policy \"admins bypass\" (bypass):\n        authorize_if always",
        );
        assert_eq!(policy.description.as_deref(), Some("admins bypass"));
        assert!(policy.bypass);
    }

    #[test]
    fn parse_all_statement_kinds() {
        let policy = single_policy(
            "resource post:
    policy:
        condition read
        condition active
        authorize_if a
        forbid_if b
        authorize_unless c
        forbid_unless d",
        );
        assert_eq!(policy.condition, vec![check("read"), check("active")]);
        let types: Vec<CheckType> = policy.checks.iter().map(|c| c.check_type).collect();
        assert_eq!(
            types,
            vec![
                CheckType::AuthorizeIf,
                CheckType::ForbidIf,
                CheckType::AuthorizeUnless,
                CheckType::ForbidUnless,
            ]
        );
    }

    #[test]
    fn parse_all_value_types() {
        let policy = single_policy(
            r#"resource post:
    policy:
        authorize_if attr(s: "x y", n: -3, b: true, f: false, a: admin)"#,
        );
        let expected = check("attr")
            .param("s", "x y")
            .param("n", -3_i64)
            .param("b", true)
            .param("f", false)
            .param("a", Value::atom("admin"));
        assert_eq!(policy.checks[0].check, expected);
    }

    #[test]
    fn parse_empty_parens() {
        let policy = single_policy("resource post:\n    policy:\n        authorize_if owner()");
        assert_eq!(policy.checks[0].check, check("owner"));
    }

    #[test]
    fn parse_multiple_resources_and_policies() {
        let input = "\
# catalog
resource post:
    policy:
        authorize_if a
    policy:
        forbid_if b
resource comment:
    policy:
        authorize_if c
";
        let parsed = parse(input).unwrap();
        let names: Vec<&str> = parsed.resources.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["post", "comment"]);
        assert_eq!(parsed.resources[0].1.len(), 2);
        assert_eq!(parsed.resources[1].1.len(), 1);
    }

    #[test]
    fn parse_whitespace_insensitive() {
        let policy =
            single_policy("resource post: policy \"p\" ( bypass ) : condition x authorize_if y ( k : 1 )");
        assert!(policy.bypass);
        assert_eq!(policy.condition, vec![check("x")]);
        assert_eq!(policy.checks[0].check, check("y").param("k", 1_i64));
    }

    #[test]
    fn parse_string_with_escapes() {
        let policy = single_policy(
            r#"resource post:
    policy:
        authorize_if attr(v: "a\"b\\c")"#,
        );
        assert_eq!(policy.checks[0].check, check("attr").param("v", "a\"b\\c"));
    }

    #[test]
    fn reject_unknown_statement() {
        assert!(parse("resource post:\n    policy:\n        allow_if a").is_err());
    }

    #[test]
    fn reject_missing_colon() {
        assert!(parse("resource post\n    policy:").is_err());
        assert!(parse("resource post:\n    policy\n        authorize_if a").is_err());
    }

    #[test]
    fn reject_unclosed_params() {
        assert!(parse("resource post:\n    policy:\n        authorize_if a(k: 1").is_err());
    }

    #[test]
    fn reject_missing_check() {
        assert!(parse("resource post:\n    policy:\n        authorize_if").is_err());
    }
}
