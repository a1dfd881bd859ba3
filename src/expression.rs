use std::collections::HashMap;

use lazy_static::lazy_static;
use pest::Parser;
use pest::error::{Error as PestError, LineColLocation};
use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest_derive::Parser;
use tracing::debug;

use crate::datatype::Scalar;
use crate::error::{DocketError, Result};
use crate::query::Query;

#[derive(Parser)]
#[grammar = "expression.pest"]
struct ExpressionParser;

lazy_static! {
    // Lowest precedence first, mirroring the host grammar the expressions
    // are written in: boolean keywords below comparisons, comparisons below
    // the set operators, set operators below arithmetic. This is why
    // `a == 1 and b == 2` needs no parentheses while `a == 1 & b == 2`
    // does not parse the way it looks.
    static ref PRATT: PrattParser<Rule> = PrattParser::new()
        .op(Op::infix(Rule::or_kw, Assoc::Left))
        .op(Op::infix(Rule::and_kw, Assoc::Left))
        .op(Op::infix(Rule::eq, Assoc::Left)
            | Op::infix(Rule::ne, Assoc::Left)
            | Op::infix(Rule::le, Assoc::Left)
            | Op::infix(Rule::ge, Assoc::Left)
            | Op::infix(Rule::lt, Assoc::Left)
            | Op::infix(Rule::gt, Assoc::Left)
            | Op::infix(Rule::in_kw, Assoc::Left))
        .op(Op::infix(Rule::bit_or, Assoc::Left))
        .op(Op::infix(Rule::bit_and, Assoc::Left))
        .op(Op::infix(Rule::add, Assoc::Left) | Op::infix(Rule::sub, Assoc::Left))
        .op(Op::infix(Rule::mul, Assoc::Left)
            | Op::infix(Rule::div, Assoc::Left)
            | Op::infix(Rule::modulo, Assoc::Left));
}

// What a sub-expression has lowered to so far. Names stay unresolved until
// they are used: as a value they are looked up in the caller's name table,
// as the index side of a comparison they are taken literally.
enum Term {
    Value(Scalar),
    Name(String),
    List(Vec<Scalar>),
    Query(Query),
}

impl Term {
    fn describe(&self) -> &'static str {
        match self {
            Term::Value(_) => "a literal value",
            Term::Name(_) => "a name",
            Term::List(_) => "a list",
            Term::Query(_) => "a result set",
        }
    }
}

/// Compiles an expression string into a [`Query`] tree.
///
/// The expression must be a single statement in comparison/boolean/set
/// syntax: `==`, `!=`, `<`, `<=`, `>`, `>=` compare an index (left, a bare
/// name) against a value (right); `value in index` tests containment with
/// the operands reversed; `|`, `&`, `-` and the keywords `or`, `and` combine
/// sub-queries into unions, intersections and differences. Bare names used
/// as values are resolved through `names`.
///
/// List literals parse and resolve their name elements, but no operator
/// accepts a list operand: comparison values are single scalars, and the
/// batched `Any`/`All` comparators come from [`crate::optimize`] or direct
/// construction, not from this grammar. `index == [1, 2]` is a
/// [`DocketError::BadExpression`], by intent.
///
/// The grammar is deliberately a narrow whitelist. Anything else fails:
/// text outside the grammar with [`DocketError::Syntax`], recognized but
/// unsupported operators (arithmetic) with [`DocketError::UnsupportedSyntax`],
/// a free name missing from `names` with [`DocketError::UndefinedName`], and
/// an ill-typed operand with [`DocketError::BadExpression`]. A failed compile
/// never returns a partial tree.
pub fn compile(text: &str, names: &HashMap<String, Scalar>) -> Result<Query> {
    let mut pairs = ExpressionParser::parse(Rule::expression, text).map_err(syntax)?;
    let expr = pairs.next().expect("the grammar yields a single expression");
    match lower_expr(expr.into_inner(), names)? {
        Term::Query(query) => {
            debug!(%query, "compiled expression");
            Ok(query)
        }
        other => Err(DocketError::BadExpression(format!(
            "expression produces {}, not a result set",
            other.describe()
        ))),
    }
}

fn syntax(error: PestError<Rule>) -> DocketError {
    let (line, col) = match error.line_col {
        LineColLocation::Pos((line, col)) => (line, col),
        LineColLocation::Span((line, col), _) => (line, col),
    };
    DocketError::Syntax {
        message: error.variant.message().into_owned(),
        line: Some(line),
        col: Some(col),
    }
}

fn lower_expr(pairs: Pairs<Rule>, names: &HashMap<String, Scalar>) -> Result<Term> {
    PRATT
        .map_primary(|primary| lower_primary(primary, names))
        .map_infix(|left, op, right| lower_infix(left?, op, right?, names))
        .parse(pairs)
}

fn lower_primary(pair: Pair<Rule>, names: &HashMap<String, Scalar>) -> Result<Term> {
    match pair.as_rule() {
        Rule::number => Ok(Term::Value(parse_number(pair.as_str()))),
        Rule::string => {
            let inner = pair
                .into_inner()
                .next()
                .expect("a string literal wraps its contents");
            Ok(Term::Value(Scalar::Str(inner.as_str().to_string())))
        }
        Rule::name => Ok(Term::Name(pair.as_str().to_string())),
        Rule::list => {
            let mut values = Vec::new();
            for element in pair.into_inner() {
                match lower_expr(element.into_inner(), names)? {
                    Term::Value(value) => values.push(value),
                    Term::Name(name) => values.push(resolve(&name, names)?),
                    other => {
                        return Err(DocketError::BadExpression(format!(
                            "list elements must be literal values or names, not {}",
                            other.describe()
                        )));
                    }
                }
            }
            Ok(Term::List(values))
        }
        Rule::expr => lower_expr(pair.into_inner(), names),
        // the whitelist ends here: any grammar element without a handler
        // above is rejected rather than silently ignored
        rule => Err(DocketError::UnsupportedSyntax(format!("{:?}", rule))),
    }
}

fn lower_infix(
    left: Term,
    op: Pair<Rule>,
    right: Term,
    names: &HashMap<String, Scalar>,
) -> Result<Term> {
    match op.as_rule() {
        Rule::eq | Rule::ne | Rule::lt | Rule::le | Rule::gt | Rule::ge => {
            let index = index_name(left)?;
            let value = comparison_value(right, names)?;
            Ok(Term::Query(match op.as_rule() {
                Rule::eq => Query::Eq { index, value },
                Rule::ne => Query::NotEq { index, value },
                Rule::lt => Query::Lt { index, value },
                Rule::le => Query::Le { index, value },
                Rule::gt => Query::Gt { index, value },
                Rule::ge => Query::Ge { index, value },
                _ => unreachable!(),
            }))
        }
        Rule::in_kw => {
            // membership reads value-first, so the index name is the
            // right-hand operand
            let index = index_name(right)?;
            let value = comparison_value(left, names)?;
            Ok(Term::Query(Query::Contains { index, value }))
        }
        Rule::bit_or | Rule::bit_and | Rule::sub => {
            let operator = op.as_str().to_string();
            let left = operand(left, &operator, "left")?;
            let right = operand(right, &operator, "right")?;
            Ok(Term::Query(match op.as_rule() {
                Rule::bit_or => Query::Union(Box::new(left), Box::new(right)),
                Rule::bit_and => Query::Intersection(Box::new(left), Box::new(right)),
                Rule::sub => Query::Difference(Box::new(left), Box::new(right)),
                _ => unreachable!(),
            }))
        }
        // `a and b and c` arrives here twice thanks to left associativity,
        // so longer chains fold from the left on their own
        Rule::and_kw | Rule::or_kw => {
            let operator = op.as_str().to_string();
            let (left, right) = match (left, right) {
                (Term::Query(left), Term::Query(right)) => (left, right),
                (left, right) => {
                    let offender = if matches!(left, Term::Query(_)) {
                        right
                    } else {
                        left
                    };
                    return Err(DocketError::BadExpression(format!(
                        "all operands for {} must be result sets, found {}",
                        operator,
                        offender.describe()
                    )));
                }
            };
            Ok(Term::Query(match op.as_rule() {
                Rule::and_kw => Query::Intersection(Box::new(left), Box::new(right)),
                Rule::or_kw => Query::Union(Box::new(left), Box::new(right)),
                _ => unreachable!(),
            }))
        }
        rule => Err(DocketError::UnsupportedSyntax(format!(
            "{:?} ({})",
            rule,
            op.as_str()
        ))),
    }
}

fn parse_number(text: &str) -> Scalar {
    match text.parse::<i64>() {
        Ok(value) => Scalar::Int(value),
        Err(_) => Scalar::Float(
            text.parse()
                .expect("the grammar only admits numeric literals"),
        ),
    }
}

fn index_name(term: Term) -> Result<String> {
    match term {
        Term::Name(name) => Ok(name),
        other => Err(DocketError::BadExpression(format!(
            "index name must be a name, not {}",
            other.describe()
        ))),
    }
}

fn comparison_value(term: Term, names: &HashMap<String, Scalar>) -> Result<Scalar> {
    match term {
        Term::Value(value) => Ok(value),
        Term::Name(name) => resolve(&name, names),
        other => Err(DocketError::BadExpression(format!(
            "comparison value must be a scalar, not {}",
            other.describe()
        ))),
    }
}

fn resolve(name: &str, names: &HashMap<String, Scalar>) -> Result<Scalar> {
    names
        .get(name)
        .cloned()
        .ok_or_else(|| DocketError::UndefinedName(name.to_string()))
}

fn operand(term: Term, operator: &str, side: &str) -> Result<Query> {
    match term {
        Term::Query(query) => Ok(query),
        other => Err(DocketError::BadExpression(format!(
            "{} operand for {} must be a result set, found {}",
            side,
            operator,
            other.describe()
        ))),
    }
}
