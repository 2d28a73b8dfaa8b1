//! Statement-level emission: SELECT with its clauses, set operations,
//! pagination, and UPDATE / DELETE.

use crate::ir::*;
use crate::{Error, Reason, Result, WithErrorInfo};

use super::collector::Collector;
use super::dialect::Pagination;
use super::gen_expr::{visit_conjunction, visit_exprs, visit_orders, write_ident};
use super::visit::SqlVisitor;

pub(super) fn walk_statement<V: ?Sized + SqlVisitor>(
    v: &V,
    stmt: &Statement,
    c: &mut Collector,
) -> Result<()> {
    match stmt {
        Statement::Select(select) => v.visit_select(select, c),
        Statement::Update(update) => v.visit_update(update, c),
        Statement::Delete(delete) => v.visit_delete(delete, c),
    }
}

pub(super) fn walk_select<V: ?Sized + SqlVisitor>(
    v: &V,
    select: &SelectStatement,
    c: &mut Collector,
) -> Result<()> {
    if select.cores.is_empty() {
        return Err(Error::new_invalid_argument(
            "a select statement needs at least one core",
        ));
    }

    for (i, core) in select.cores.iter().enumerate() {
        match (i, &core.set_op) {
            (0, None) => {}
            (0, Some(op)) => {
                return Err(Error::new(Reason::Expected {
                    who: Some("the first select core".to_string()),
                    expected: "no set operator".to_string(),
                    found: format!("{}", op.kind),
                }))
            }
            (_, Some(op)) => {
                c.push_char(' ');
                v.visit_set_operator(op, c)?;
                c.push_char(' ');
            }
            (_, None) => {
                return Err(Error::new(Reason::Expected {
                    who: Some(format!("select core {i}")),
                    expected: "a set operator".to_string(),
                    found: "none".to_string(),
                }))
            }
        }
        v.visit_select_core(core, c)?;
    }

    if !select.orders.is_empty() {
        c.push(" ORDER BY ");
        visit_orders(v, &select.orders, c)?;
    }

    write_pagination(v, select.limit.as_ref(), select.offset.as_ref(), c)?;

    if let Some(lock) = &select.lock {
        c.push_char(' ');
        v.visit_lock(lock, c)?;
    }
    Ok(())
}

/// `LIMIT n OFFSET m`, or `OFFSET m ROWS FETCH FIRST n ROWS ONLY`.
fn write_pagination<V: ?Sized + SqlVisitor>(
    v: &V,
    limit: Option<&Limit>,
    offset: Option<&Offset>,
    c: &mut Collector,
) -> Result<()> {
    if v.ctx().capabilities.pagination() == Pagination::FetchFirst {
        if let Some(offset) = offset {
            c.push_char(' ');
            v.visit_offset(offset, c)?;
        }
        if let Some(limit) = limit {
            c.push_char(' ');
            v.visit_limit(limit, c)?;
        }
    } else {
        if let Some(limit) = limit {
            c.push_char(' ');
            v.visit_limit(limit, c)?;
        }
        if let Some(offset) = offset {
            c.push_char(' ');
            v.visit_offset(offset, c)?;
        }
    }
    Ok(())
}

pub(super) fn walk_select_core<V: ?Sized + SqlVisitor>(
    v: &V,
    core: &SelectCore,
    c: &mut Collector,
) -> Result<()> {
    c.push("SELECT ");
    if let Some(SetQuantifier::Distinct) = core.quantifier {
        c.push("DISTINCT ");
    }

    if core.projections.is_empty() {
        c.push_char('*');
    } else {
        visit_exprs(v, &core.projections, ", ", c)?;
    }

    if let Some(source) = &core.source {
        c.push(" FROM ");
        v.visit_join_source(source, c)?;
    }

    if !core.wheres.is_empty() {
        c.push(" WHERE ");
        visit_conjunction(v, &core.wheres, c)?;
    }

    if !core.groups.is_empty() {
        c.push(" GROUP BY ");
        visit_exprs(v, &core.groups, ", ", c)?;
    }

    if !core.havings.is_empty() {
        c.push(" HAVING ");
        visit_conjunction(v, &core.havings, c)?;
    }
    Ok(())
}

pub(super) fn walk_set_operator<V: ?Sized + SqlVisitor>(
    _v: &V,
    op: &SetOperator,
    c: &mut Collector,
) -> Result<()> {
    c.push(&op.kind.to_string());
    if op.all {
        c.push(" ALL");
    }
    Ok(())
}

pub(super) fn walk_order<V: ?Sized + SqlVisitor>(
    v: &V,
    order: &OrderExpr,
    c: &mut Collector,
) -> Result<()> {
    v.visit_expr(&order.expr, c)?;
    if let Some(direction) = order.direction {
        c.push(&format!(" {direction}"));
    }
    Ok(())
}

pub(super) fn walk_limit<V: ?Sized + SqlVisitor>(
    v: &V,
    limit: &Limit,
    c: &mut Collector,
) -> Result<()> {
    match v.ctx().capabilities.pagination() {
        Pagination::LimitOffset => {
            c.push("LIMIT ");
            v.visit_expr(&limit.expr, c)
        }
        Pagination::FetchFirst => {
            c.push("FETCH FIRST ");
            v.visit_expr(&limit.expr, c)?;
            c.push(" ROWS ONLY");
            Ok(())
        }
        Pagination::RowNumber => Err(unsupported_pagination(v, "LIMIT")),
    }
}

pub(super) fn walk_offset<V: ?Sized + SqlVisitor>(
    v: &V,
    offset: &Offset,
    c: &mut Collector,
) -> Result<()> {
    match v.ctx().capabilities.pagination() {
        Pagination::LimitOffset => {
            c.push("OFFSET ");
            v.visit_expr(&offset.expr, c)
        }
        Pagination::FetchFirst => {
            c.push("OFFSET ");
            v.visit_expr(&offset.expr, c)?;
            c.push(" ROWS");
            Ok(())
        }
        Pagination::RowNumber => Err(unsupported_pagination(v, "OFFSET")),
    }
}

fn unsupported_pagination<V: ?Sized + SqlVisitor>(v: &V, clause: &str) -> Error {
    Error::new_unsupported(clause, v.ctx().dialect).push_hint(
        "this target has neither LIMIT/OFFSET nor FETCH FIRST; compile for a dialect that emulates them",
    )
}

pub(super) fn walk_lock(lock: &Lock, c: &mut Collector) {
    c.push(match lock {
        Lock::ForUpdate => "FOR UPDATE",
        Lock::ForUpdateNoWait => "FOR UPDATE NOWAIT",
        Lock::ForUpdateSkipLocked => "FOR UPDATE SKIP LOCKED",
    });
}

pub(super) fn walk_join_source<V: ?Sized + SqlVisitor>(
    v: &V,
    source: &JoinSource,
    c: &mut Collector,
) -> Result<()> {
    v.visit_table_factor(&source.base, c)?;
    for join in &source.joins {
        c.push(match join.kind {
            JoinKind::Inner => " INNER JOIN ",
            JoinKind::Left => " LEFT OUTER JOIN ",
            JoinKind::Right => " RIGHT OUTER JOIN ",
            JoinKind::Full => " FULL OUTER JOIN ",
            JoinKind::Cross => " CROSS JOIN ",
        });
        v.visit_table_factor(&join.factor, c)?;

        match (&join.constraint, join.kind) {
            (Some(_), JoinKind::Cross) => {
                return Err(Error::new(Reason::Unexpected {
                    found: "a join constraint on CROSS JOIN".to_string(),
                }))
            }
            (Some(constraint), _) => {
                c.push(" ON ");
                v.visit_expr(constraint, c)?;
            }
            (None, _) => {}
        }
    }
    Ok(())
}

pub(super) fn walk_table_factor<V: ?Sized + SqlVisitor>(
    v: &V,
    factor: &TableFactor,
    c: &mut Collector,
) -> Result<()> {
    match factor {
        TableFactor::Table(table) => write_table(v, table, c),
        TableFactor::Derived { subquery, alias } => {
            c.push_char('(');
            v.visit_select(subquery, c)?;
            c.push(") ");
            write_ident(v, alias, c);
        }
    }
    Ok(())
}

/// `[schema.]name[ alias]`, without `AS` since not every dialect accepts it
/// for tables.
fn write_table<V: ?Sized + SqlVisitor>(v: &V, table: &TableRef, c: &mut Collector) {
    if let Some(schema) = &table.schema {
        write_ident(v, schema, c);
        c.push_char('.');
    }
    write_ident(v, &table.name, c);
    if let Some(alias) = &table.alias {
        c.push_char(' ');
        write_ident(v, alias, c);
    }
}

/// The parts of an UPDATE or DELETE that select the affected rows.
#[derive(Debug, Clone, Copy)]
pub(super) struct DmlSource<'a> {
    pub relation: &'a TableRef,
    pub wheres: &'a [Expr],
    pub orders: &'a [OrderExpr],
    pub limit: Option<&'a Limit>,
    pub offset: Option<&'a Offset>,
    pub groups: &'a [Expr],
    pub havings: &'a [Expr],
    pub key: Option<&'a Expr>,
}

impl<'a> From<&'a UpdateStatement> for DmlSource<'a> {
    fn from(u: &'a UpdateStatement) -> Self {
        DmlSource {
            relation: &u.relation,
            wheres: &u.wheres,
            orders: &u.orders,
            limit: u.limit.as_ref(),
            offset: u.offset.as_ref(),
            groups: &u.groups,
            havings: &u.havings,
            key: u.key.as_ref(),
        }
    }
}

impl<'a> From<&'a DeleteStatement> for DmlSource<'a> {
    fn from(d: &'a DeleteStatement) -> Self {
        DmlSource {
            relation: &d.relation,
            wheres: &d.wheres,
            orders: &d.orders,
            limit: d.limit.as_ref(),
            offset: d.offset.as_ref(),
            groups: &d.groups,
            havings: &d.havings,
            key: d.key.as_ref(),
        }
    }
}

impl DmlSource<'_> {
    /// Clauses that UPDATE and DELETE cannot carry, which go through a key
    /// subselect.
    pub fn needs_subselect(&self) -> bool {
        self.limit.is_some()
            || self.offset.is_some()
            || !self.orders.is_empty()
            || !self.groups.is_empty()
            || !self.havings.is_empty()
    }
}

pub(super) fn walk_build_subselect(key: &Expr, source: &DmlSource) -> SelectStatement {
    SelectStatement {
        cores: vec![SelectCore {
            projections: vec![key.clone()],
            source: Some(JoinSource::from(source.relation.clone())),
            wheres: source.wheres.to_vec(),
            groups: source.groups.to_vec(),
            havings: source.havings.to_vec(),
            ..Default::default()
        }],
        orders: source.orders.to_vec(),
        limit: source.limit.cloned(),
        offset: source.offset.cloned(),
        lock: None,
    }
}

pub(super) fn walk_update<V: ?Sized + SqlVisitor>(
    v: &V,
    update: &UpdateStatement,
    c: &mut Collector,
) -> Result<()> {
    if update.assignments.is_empty() {
        return Err(Error::new_invalid_argument("UPDATE without assignments"));
    }

    c.push("UPDATE ");
    write_table(v, &update.relation, c);
    c.push(" SET ");
    for (i, assignment) in update.assignments.iter().enumerate() {
        if i > 0 {
            c.push(", ");
        }
        write_ident(v, &assignment.column, c);
        c.push(" = ");
        v.visit_expr(&assignment.value, c)?;
    }

    write_dml_filter(v, DmlSource::from(update), c)
}

pub(super) fn walk_delete<V: ?Sized + SqlVisitor>(
    v: &V,
    delete: &DeleteStatement,
    c: &mut Collector,
) -> Result<()> {
    c.push("DELETE FROM ");
    write_table(v, &delete.relation, c);

    write_dml_filter(v, DmlSource::from(delete), c)
}

/// Either `WHERE <key> IN (<subselect>)`, or the plain clauses of the
/// statement when there is no key to select through.
fn write_dml_filter<V: ?Sized + SqlVisitor>(
    v: &V,
    source: DmlSource,
    c: &mut Collector,
) -> Result<()> {
    if let (true, Some(key)) = (source.needs_subselect(), source.key) {
        let subselect = v.build_subselect(key, &source);
        c.push(" WHERE ");
        v.visit_expr(key, c)?;
        c.push(" IN (");
        v.visit_select(&subselect, c)?;
        c.push_char(')');
        return Ok(());
    }

    if !source.groups.is_empty() || !source.havings.is_empty() {
        return Err(Error::new_invalid_argument(
            "grouping on UPDATE or DELETE needs a key to select rows through",
        ));
    }

    if !source.wheres.is_empty() {
        c.push(" WHERE ");
        visit_conjunction(v, source.wheres, c)?;
    }
    if !source.orders.is_empty() {
        c.push(" ORDER BY ");
        visit_orders(v, source.orders, c)?;
    }
    write_pagination(v, source.limit, source.offset, c)
}
