//! `LIMIT` / `OFFSET` emulated with the `ROWNUM` pseudo-column.
//!
//! `ROWNUM` is assigned as rows leave the `WHERE` of the query it appears
//! in, before that query's `ORDER BY`. So a limit can go straight into the
//! `WHERE` only if the order of rows doesn't matter. Otherwise the query is
//! wrapped, and the row numbers of the wrapped (already ordered) result are
//! filtered. `raw_sql_` and `raw_rnum_` are reserved: the wrapped query must
//! not use them as names.

use crate::ir::*;
use crate::{Error, Reason, Result, WithErrorInfo};

use crate::sql::collector::Collector;
use crate::sql::gen_query::walk_select;
use crate::sql::visit::SqlVisitor;
use super::OracleVisitor;

pub(super) fn write_row_number(
    v: &OracleVisitor,
    select: &SelectStatement,
    c: &mut Collector,
) -> Result<()> {
    if let Some(limit) = &select.limit {
        constant(&limit.expr, "limit")?;
    }
    if let Some(offset) = &select.offset {
        constant(&offset.expr, "offset")?;
    }

    match (&select.limit, &select.offset) {
        (None, None) => return walk_select(v, select, c),
        (Some(limit), None) if can_push_limit(select) => {
            log::debug!("limit pushed into WHERE as a ROWNUM predicate");
            return walk_select(v, &push_limit(select, limit)?, c);
        }
        _ => {}
    }

    if select.lock.is_some() {
        return Err(
            Error::new_unsupported("FOR UPDATE together with a row limit", v.ctx.dialect)
                .push_hint("lock the rows in a separate statement"),
        );
    }

    let inner = SelectStatement {
        limit: None,
        offset: None,
        ..select.clone()
    };

    match (&select.limit, &select.offset) {
        (Some(limit), Some(offset)) => {
            log::debug!("limit and offset emulated with two nested queries");
            c.push("SELECT * FROM (SELECT raw_sql_.*, rownum raw_rnum_ FROM (");
            walk_select(v, &inner, c)?;
            c.push(") raw_sql_ WHERE rownum <= ");
            write_upper_bound(v, offset, limit, c)?;
            c.push(") WHERE raw_rnum_ > ");
            v.visit_expr(&offset.expr, c)
        }
        (Some(limit), None) => {
            log::debug!("limit emulated with a wrapping query");
            c.push("SELECT * FROM (");
            walk_select(v, &inner, c)?;
            c.push(") WHERE ROWNUM <= ");
            v.visit_expr(&limit.expr, c)
        }
        (None, Some(offset)) => {
            log::debug!("offset emulated with two nested queries");
            c.push("SELECT * FROM (SELECT raw_sql_.*, rownum raw_rnum_ FROM (");
            walk_select(v, &inner, c)?;
            c.push(") raw_sql_) WHERE raw_rnum_ > ");
            v.visit_expr(&offset.expr, c)
        }
        (None, None) => walk_select(v, select, c),
    }
}

/// The order of rows is unconstrained, so any `limit` rows will do.
///
/// This changes which rows are returned compared to wrapping, when the
/// caller relied on the incidental order of an unordered query.
fn can_push_limit(select: &SelectStatement) -> bool {
    let [core] = select.cores.as_slice() else {
        return false;
    };
    select.orders.is_empty()
        && core.groups.is_empty()
        && core.havings.is_empty()
        && core.quantifier.is_none()
}

fn push_limit(select: &SelectStatement, limit: &Limit) -> Result<SelectStatement> {
    let mut select = SelectStatement {
        limit: None,
        ..select.clone()
    };
    let core = select
        .cores
        .last_mut()
        .ok_or_else(|| Error::new_assert("limit pushed into a select without cores"))?;
    core.wheres
        .push(Expr::raw("ROWNUM").binary(BinOp::LtEq, limit.expr.clone()));
    Ok(select)
}

/// `offset + limit`, folded when both are literals and otherwise left to the
/// database, so that parameters keep their placeholders.
fn write_upper_bound(
    v: &OracleVisitor,
    offset: &Offset,
    limit: &Limit,
    c: &mut Collector,
) -> Result<()> {
    match (constant(&offset.expr, "offset")?, constant(&limit.expr, "limit")?) {
        (Some(o), Some(l)) => {
            let bound = o.checked_add(l).ok_or_else(|| {
                Error::new_invalid_argument(format!("offset {o} plus limit {l} overflows"))
            })?;
            c.push(&bound.to_string());
        }
        _ => {
            c.push_char('(');
            v.visit_expr(&offset.expr, c)?;
            c.push(" + ");
            v.visit_expr(&limit.expr, c)?;
            c.push_char(')');
        }
    }
    Ok(())
}

/// Value of an integer literal. Anything else is only known at runtime.
fn constant(expr: &Expr, who: &str) -> Result<Option<i64>> {
    match &expr.kind {
        ExprKind::Literal(Literal::Integer(n)) if *n >= 0 => Ok(Some(*n)),
        ExprKind::Literal(Literal::Integer(n)) => Err(Error::new_invalid_argument(format!(
            "{who} must not be negative, found {n}"
        ))),
        ExprKind::Literal(literal) => Err(Error::new(Reason::Expected {
            who: Some(who.to_string()),
            expected: "an integer".to_string(),
            found: format!("{literal:?}"),
        })),
        _ => Ok(None),
    }
}
