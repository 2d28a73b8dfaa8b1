//! A trait to walk a statement tree and emit SQL into a [Collector].
//!
//! Each method has a default that calls the matching `walk_*` function, which
//! emits the standard form and recurses back through the visitor. Dialect
//! visitors override the methods for nodes they render differently and call
//! the `walk_*` function directly when they want the standard form.
use crate::ir::*;
use crate::Result;

use super::collector::Collector;
use super::gen_expr::*;
use super::gen_query::*;
use super::Context;

// Same shape as a fold: https://rust-unofficial.github.io/patterns/patterns/creational/fold.html
// but visitors are stateless, so they borrow the tree and take `&self`.
pub(super) trait SqlVisitor {
    fn ctx(&self) -> &Context;

    fn visit_statement(&self, stmt: &Statement, c: &mut Collector) -> Result<()> {
        walk_statement(self, stmt, c)
    }
    fn visit_select(&self, select: &SelectStatement, c: &mut Collector) -> Result<()> {
        walk_select(self, select, c)
    }
    fn visit_select_core(&self, core: &SelectCore, c: &mut Collector) -> Result<()> {
        walk_select_core(self, core, c)
    }
    fn visit_set_operator(&self, op: &SetOperator, c: &mut Collector) -> Result<()> {
        walk_set_operator(self, op, c)
    }
    fn visit_order(&self, order: &OrderExpr, c: &mut Collector) -> Result<()> {
        walk_order(self, order, c)
    }
    fn visit_limit(&self, limit: &Limit, c: &mut Collector) -> Result<()> {
        walk_limit(self, limit, c)
    }
    fn visit_offset(&self, offset: &Offset, c: &mut Collector) -> Result<()> {
        walk_offset(self, offset, c)
    }
    fn visit_lock(&self, lock: &Lock, c: &mut Collector) -> Result<()> {
        walk_lock(lock, c);
        Ok(())
    }
    fn visit_join_source(&self, source: &JoinSource, c: &mut Collector) -> Result<()> {
        walk_join_source(self, source, c)
    }
    fn visit_table_factor(&self, factor: &TableFactor, c: &mut Collector) -> Result<()> {
        walk_table_factor(self, factor, c)
    }
    fn visit_expr(&self, expr: &Expr, c: &mut Collector) -> Result<()> {
        walk_expr(self, expr, c)
    }
    fn visit_literal(&self, literal: &Literal, c: &mut Collector) -> Result<()> {
        walk_literal(self, literal, c)
    }
    fn visit_param(&self, name: &str, value: Option<&Literal>, c: &mut Collector) -> Result<()> {
        walk_param(self, name, value, c)
    }
    fn visit_homogeneous_in(
        &self,
        left: &Expr,
        values: &[Expr],
        negated: bool,
        c: &mut Collector,
    ) -> Result<()> {
        walk_homogeneous_in(self, left, values, negated, c)
    }
    fn visit_is_distinct_from(
        &self,
        left: &Expr,
        right: &Expr,
        negated: bool,
        c: &mut Collector,
    ) -> Result<()> {
        walk_is_distinct_from(self, left, right, negated, c)
    }
    fn visit_update(&self, update: &UpdateStatement, c: &mut Collector) -> Result<()> {
        walk_update(self, update, c)
    }
    fn visit_delete(&self, delete: &DeleteStatement, c: &mut Collector) -> Result<()> {
        walk_delete(self, delete, c)
    }
    /// Select of `key` over the rows a DML statement targets.
    fn build_subselect(&self, key: &Expr, source: &DmlSource) -> SelectStatement {
        walk_build_subselect(key, source)
    }
}

/// Emits standard SQL for every node.
pub(super) struct GenericVisitor<'a> {
    pub(super) ctx: &'a Context,
}

impl SqlVisitor for GenericVisitor<'_> {
    fn ctx(&self) -> &Context {
        self.ctx
    }
}
