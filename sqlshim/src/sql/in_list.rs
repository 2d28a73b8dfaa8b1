//! `IN` over materialized value sets, split into groups when the target
//! limits the length of a single list.

use crate::ir::{Expr, ExprKind, Literal};
use crate::{Error, Result, WithErrorInfo};

use super::collector::Collector;
use super::gen_expr::{visit_operand, Associativity, MEMBERSHIP_STRENGTH};
use super::visit::SqlVisitor;

/// Values of a homogeneous `IN` must be plain literals.
pub(super) fn literal_values(values: &[Expr]) -> Result<Vec<&Literal>> {
    values
        .iter()
        .map(|value| match &value.kind {
            ExprKind::Literal(literal) => Ok(literal),
            kind => Err(Error::new_invalid_argument(format!(
                "IN list values must be literals, found {kind:?}"
            ))
            .push_hint("use an `InList` expression for lists of arbitrary expressions")),
        })
        .collect()
}

/// Writes `<left> IN (...)`.
///
/// With more values than `max`, consecutive chunks of `max` values are
/// combined with `OR` (`AND` for `NOT IN`) inside parentheses, so that the
/// result matches the membership test over the whole set.
///
/// An empty set writes `<left> IN (NULL)`, which is never true. An empty
/// `NOT IN` writes `1=1`, since nothing is excluded.
pub(super) fn write_in_list<V: ?Sized + SqlVisitor>(
    v: &V,
    left: &Expr,
    values: &[&Literal],
    negated: bool,
    max: Option<usize>,
    c: &mut Collector,
) -> Result<()> {
    if values.is_empty() {
        if negated {
            c.push("1=1");
        } else {
            visit_operand(v, left, true, MEMBERSHIP_STRENGTH, &Associativity::Left, c)?;
            c.push(" IN (NULL)");
        }
        return Ok(());
    }

    let max = match max {
        Some(max) if values.len() > max => max,
        _ => return write_single(v, left, values, negated, c),
    };
    log::debug!(
        "splitting IN list of {} values into {} lists",
        values.len(),
        values.len().div_ceil(max)
    );

    let combinator = if negated { " AND " } else { " OR " };
    c.push_char('(');
    for (i, chunk) in values.chunks(max).enumerate() {
        if i > 0 {
            c.push(combinator);
        }
        write_single(v, left, chunk, negated, c)?;
    }
    c.push_char(')');
    Ok(())
}

fn write_single<V: ?Sized + SqlVisitor>(
    v: &V,
    left: &Expr,
    values: &[&Literal],
    negated: bool,
    c: &mut Collector,
) -> Result<()> {
    visit_operand(v, left, true, MEMBERSHIP_STRENGTH, &Associativity::Left, c)?;
    c.push(if negated { " NOT IN (" } else { " IN (" });
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            c.push(", ");
        }
        v.visit_literal(value, c)?;
    }
    c.push_char(')');
    Ok(())
}
