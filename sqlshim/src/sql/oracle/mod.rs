//! Rewrites for Oracle, which predates `LIMIT` / `OFFSET` (and before 12c,
//! `FETCH FIRST`), caps `IN` lists at 1000 elements, and rejects `ORDER BY`
//! in subqueries and in DML.

mod dml;
mod order_fixup;
mod pagination;

use crate::ir::*;
use crate::{Error, Result};

use super::collector::Collector;
use super::dialect::Pagination;
use super::gen_query::{walk_build_subselect, walk_select, walk_set_operator, DmlSource};
use super::visit::SqlVisitor;
use super::Context;

pub(super) use order_fixup::projections_for_distinct;

pub(super) struct OracleVisitor<'a> {
    pub(super) ctx: &'a Context,
}

impl SqlVisitor for OracleVisitor<'_> {
    fn ctx(&self) -> &Context {
        self.ctx
    }

    fn visit_select(&self, select: &SelectStatement, c: &mut Collector) -> Result<()> {
        let select = order_fixup::order_hacks(self, select)?;

        match self.ctx.capabilities.pagination() {
            Pagination::RowNumber => pagination::write_row_number(self, &select, c),
            Pagination::FetchFirst => {
                if (select.limit.is_some() || select.offset.is_some()) && select.lock.is_some() {
                    return Err(Error::new_unsupported(
                        "FOR UPDATE together with a row limit",
                        self.ctx.dialect,
                    ));
                }
                walk_select(self, &select, c)
            }
            Pagination::LimitOffset => walk_select(self, &select, c),
        }
    }

    fn visit_set_operator(&self, op: &SetOperator, c: &mut Collector) -> Result<()> {
        match (op.kind, op.all) {
            (SetOperatorKind::Except | SetOperatorKind::Intersect, true) => Err(
                Error::new_unsupported(format!("{} ALL", op.kind), self.ctx.dialect),
            ),
            (SetOperatorKind::Except, false) => {
                c.push("MINUS");
                Ok(())
            }
            _ => walk_set_operator(self, op, c),
        }
    }

    fn visit_is_distinct_from(
        &self,
        left: &Expr,
        right: &Expr,
        negated: bool,
        c: &mut Collector,
    ) -> Result<()> {
        c.push("DECODE(");
        self.visit_expr(left, c)?;
        c.push(", ");
        self.visit_expr(right, c)?;
        c.push(if negated { ", 0, 1) = 0" } else { ", 0, 1) = 1" });
        Ok(())
    }

    fn visit_update(&self, update: &UpdateStatement, c: &mut Collector) -> Result<()> {
        dml::write_update(self, update, c)
    }

    fn visit_delete(&self, delete: &DeleteStatement, c: &mut Collector) -> Result<()> {
        dml::write_delete(self, delete, c)
    }

    fn build_subselect(&self, key: &Expr, source: &DmlSource) -> SelectStatement {
        dml::strip_orders(walk_build_subselect(key, source))
    }
}
