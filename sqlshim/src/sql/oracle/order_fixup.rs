//! `SELECT DISTINCT` with an `ORDER BY` on columns outside the distinct list.
//!
//! Oracle requires ordering columns of a `DISTINCT` query to be selected.
//! Selecting them directly would change which rows are distinct, so each
//! ordering term is selected as `FIRST_VALUE(<term>) OVER (PARTITION BY
//! <distinct columns> ORDER BY <term>) AS alias_<i>__`, and the `ORDER BY`
//! then refers to those aliases.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

use crate::ir::*;
use crate::sql::collector::{Collector, ParamStyle};
use crate::sql::gen_expr::visit_exprs;
use crate::sql::split::split_order_string;
use crate::sql::visit::SqlVisitor;
use crate::{Error, Result};

const WINDOW_MARKER: &str = "FIRST_VALUE";

/// Rewrites the `ORDER BY` of a statement that selects `FIRST_VALUE`
/// projections into references to their `alias_<i>__` names.
///
/// Ordering terms are rendered and split on top-level commas, so one raw
/// ordering of `a DESC, f(b, c)` yields two aliases.
pub(super) fn order_hacks<'a, V: ?Sized + SqlVisitor>(
    v: &V,
    select: &'a SelectStatement,
) -> Result<Cow<'a, SelectStatement>> {
    if select.orders.is_empty() || !has_window_projection(v, select)? {
        return Ok(Cow::Borrowed(select));
    }

    let mut terms = Vec::new();
    for order in &select.orders {
        let text = render(ParamStyle::QuestionMark, |c| v.visit_order(order, c))?;
        terms.extend(split_order_string(&text));
    }
    log::debug!("ORDER BY rewritten into {} projection aliases", terms.len());

    let orders = terms
        .iter()
        .enumerate()
        .map(|(i, term)| {
            let mut text = format!("alias_{i}__");
            if trailing_desc().is_match(term.trim_end()) {
                text.push_str(" DESC");
            }
            OrderExpr {
                expr: Expr::raw(text),
                direction: None,
            }
        })
        .collect();

    Ok(Cow::Owned(SelectStatement {
        orders,
        ..select.clone()
    }))
}

fn has_window_projection<V: ?Sized + SqlVisitor>(v: &V, select: &SelectStatement) -> Result<bool> {
    for projection in select.cores.iter().flat_map(|core| &core.projections) {
        let text = render(ParamStyle::QuestionMark, |c| v.visit_expr(projection, c))?;
        if text.contains(WINDOW_MARKER) {
            return Ok(true);
        }
    }
    Ok(false)
}

pub(in crate::sql) fn projections_for_distinct<V: ?Sized + SqlVisitor>(
    v: &V,
    columns: &[Expr],
    orders: &[OrderExpr],
) -> Result<Vec<Expr>> {
    if columns.is_empty() {
        return Err(Error::new_invalid_argument(
            "DISTINCT projections need at least one column to partition by",
        ));
    }

    let partition = render(ParamStyle::Inline, |c| visit_exprs(v, columns, ", ", c))?;

    let mut terms = Vec::new();
    for order in orders {
        let text = render(ParamStyle::Inline, |c| v.visit_order(order, c))?;
        for term in split_order_string(&text) {
            let term = sort_direction().replace_all(&term, "");
            let term = term.trim();
            if !term.is_empty() {
                terms.push(term.to_string());
            }
        }
    }

    let mut res: Vec<Expr> = terms
        .iter()
        .enumerate()
        .map(|(i, term)| {
            Expr::raw(format!(
                "{WINDOW_MARKER}({term}) OVER (PARTITION BY {partition} ORDER BY {term}) AS alias_{i}__"
            ))
        })
        .collect();
    res.extend(columns.iter().cloned());
    Ok(res)
}

fn render(style: ParamStyle, f: impl FnOnce(&mut Collector) -> Result<()>) -> Result<String> {
    let mut c = Collector::new(style);
    f(&mut c)?;
    Ok(c.finish().sql)
}

fn trailing_desc() -> &'static Regex {
    static TRAILING_DESC: OnceLock<Regex> = OnceLock::new();
    TRAILING_DESC.get_or_init(|| Regex::new(r"(?i)\bdesc$").unwrap())
}

fn sort_direction() -> &'static Regex {
    static SORT_DIRECTION: OnceLock<Regex> = OnceLock::new();
    SORT_DIRECTION.get_or_init(|| Regex::new(r"(?i)\s+(asc|desc)\b").unwrap())
}
