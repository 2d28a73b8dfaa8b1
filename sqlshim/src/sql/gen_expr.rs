use std::cmp::Ordering;
use std::sync::OnceLock;

use regex::Regex;

use crate::ir::*;
use crate::{Error, Reason, Result, WithErrorInfo};

use super::collector::{Collector, ParamStyle};
use super::in_list;
use super::keywords;
use super::visit::SqlVisitor;

pub(super) fn walk_expr<V: ?Sized + SqlVisitor>(v: &V, expr: &Expr, c: &mut Collector) -> Result<()> {
    match &expr.kind {
        ExprKind::Column { relation, name } => {
            if let Some(relation) = relation {
                write_ident(v, relation, c);
                c.push_char('.');
            }
            write_ident(v, name, c);
        }
        ExprKind::Star { relation } => {
            if let Some(relation) = relation {
                write_ident(v, relation, c);
                c.push_char('.');
            }
            c.push_char('*');
        }
        ExprKind::Literal(literal) => v.visit_literal(literal, c)?,
        ExprKind::Param { name, value } => v.visit_param(name, value.as_ref(), c)?,
        ExprKind::SqlLiteral(text) => {
            c.push(text);
        }
        ExprKind::Binary { left, op, right } => {
            let strength = op.binding_strength();
            let associativity = op.associativity();
            visit_operand(v, left, true, strength, &associativity, c)?;
            c.push(&format!(" {op} "));
            visit_operand(v, right, false, strength, &associativity, c)?;
        }
        ExprKind::Unary { op, expr: operand } => {
            c.push(match op {
                UnOp::Neg => "-",
                UnOp::Not => "NOT ",
            });
            visit_operand(v, operand, false, op.binding_strength(), &op.associativity(), c)?;
        }
        ExprKind::IsNull { expr: operand, negated } => {
            visit_operand(v, operand, true, expr.binding_strength(), &Associativity::Left, c)?;
            c.push(if *negated { " IS NOT NULL" } else { " IS NULL" });
        }
        ExprKind::IsDistinctFrom {
            left,
            right,
            negated,
        } => v.visit_is_distinct_from(left, right, *negated, c)?,
        ExprKind::Between {
            expr: operand,
            low,
            high,
            negated,
        } => {
            let strength = expr.binding_strength();
            visit_operand(v, operand, true, strength, &Associativity::Left, c)?;
            c.push(if *negated { " NOT BETWEEN " } else { " BETWEEN " });
            visit_operand(v, low, false, strength, &Associativity::Left, c)?;
            c.push(" AND ");
            visit_operand(v, high, false, strength, &Associativity::Left, c)?;
        }
        ExprKind::InList {
            expr: operand,
            list,
            negated,
        } => {
            if list.is_empty() {
                c.push(if *negated { "1=1" } else { "1=0" });
            } else {
                visit_operand(v, operand, true, expr.binding_strength(), &Associativity::Left, c)?;
                c.push(if *negated { " NOT IN (" } else { " IN (" });
                visit_exprs(v, list, ", ", c)?;
                c.push_char(')');
            }
        }
        ExprKind::HomogeneousIn {
            left,
            values,
            negated,
        } => v.visit_homogeneous_in(left, values, *negated, c)?,
        ExprKind::InSubquery {
            expr: operand,
            subquery,
            negated,
        } => {
            visit_operand(v, operand, true, expr.binding_strength(), &Associativity::Left, c)?;
            c.push(if *negated { " NOT IN (" } else { " IN (" });
            v.visit_select(subquery, c)?;
            c.push_char(')');
        }
        ExprKind::Exists { subquery, negated } => {
            c.push(if *negated { "NOT EXISTS (" } else { "EXISTS (" });
            v.visit_select(subquery, c)?;
            c.push_char(')');
        }
        ExprKind::Function {
            name,
            args,
            distinct,
        } => {
            c.push(name).push_char('(');
            if *distinct {
                c.push("DISTINCT ");
            }
            visit_exprs(v, args, ", ", c)?;
            c.push_char(')');
        }
        ExprKind::Window {
            function,
            partition_by,
            order_by,
        } => {
            v.visit_expr(function, c)?;
            c.push(" OVER (");
            if !partition_by.is_empty() {
                c.push("PARTITION BY ");
                visit_exprs(v, partition_by, ", ", c)?;
            }
            if !order_by.is_empty() {
                if !partition_by.is_empty() {
                    c.push_char(' ');
                }
                c.push("ORDER BY ");
                visit_orders(v, order_by, c)?;
            }
            c.push_char(')');
        }
        ExprKind::Case {
            operand,
            cases,
            default,
        } => {
            if cases.is_empty() {
                return Err(Error::new(Reason::Expected {
                    who: Some("CASE".to_string()),
                    expected: "at least one WHEN branch".to_string(),
                    found: "none".to_string(),
                }));
            }
            c.push("CASE");
            if let Some(operand) = operand {
                c.push_char(' ');
                v.visit_expr(operand, c)?;
            }
            for case in cases {
                c.push(" WHEN ");
                v.visit_expr(&case.condition, c)?;
                c.push(" THEN ");
                v.visit_expr(&case.value, c)?;
            }
            if let Some(default) = default {
                c.push(" ELSE ");
                v.visit_expr(default, c)?;
            }
            c.push(" END");
        }
        ExprKind::Cast { expr, data_type } => {
            c.push("CAST(");
            v.visit_expr(expr, c)?;
            c.push(" AS ").push(data_type).push_char(')');
        }
        ExprKind::Grouping(expr) => {
            c.push_char('(');
            v.visit_expr(expr, c)?;
            c.push_char(')');
        }
        ExprKind::Alias { expr, alias } => {
            v.visit_expr(expr, c)?;
            c.push(" AS ");
            write_ident(v, alias, c);
        }
        ExprKind::Subquery(select) => {
            c.push_char('(');
            v.visit_select(select, c)?;
            c.push_char(')');
        }
    }
    Ok(())
}

pub(super) fn walk_literal<V: ?Sized + SqlVisitor>(
    v: &V,
    literal: &Literal,
    c: &mut Collector,
) -> Result<()> {
    match literal {
        Literal::Null => {
            c.push("NULL");
        }
        Literal::Boolean(b) => {
            let text = match (v.ctx().emulate_booleans, b) {
                (true, true) => "1",
                (true, false) => "0",
                (false, true) => "TRUE",
                (false, false) => "FALSE",
            };
            c.push(text);
        }
        Literal::Integer(i) => {
            c.push(&i.to_string());
        }
        Literal::Float(f) => {
            if !f.is_finite() {
                return Err(Error::new_invalid_argument(format!(
                    "float literal {f} has no SQL representation"
                )));
            }
            c.push(&format!("{f:?}"));
        }
        Literal::String(s) => {
            c.push(&quote_string(s));
        }
    }
    Ok(())
}

pub(super) fn walk_param<V: ?Sized + SqlVisitor>(
    v: &V,
    name: &str,
    value: Option<&Literal>,
    c: &mut Collector,
) -> Result<()> {
    if c.style() == ParamStyle::Inline {
        let value = value.ok_or_else(|| {
            Error::new_invalid_argument(format!("parameter `{name}` has no value to inline"))
                .push_hint("provide a value or compile with a placeholder parameter style")
        })?;
        return v.visit_literal(value, c);
    }
    c.add_bind(name, value);
    Ok(())
}

pub(super) fn walk_homogeneous_in<V: ?Sized + SqlVisitor>(
    v: &V,
    left: &Expr,
    values: &[Expr],
    negated: bool,
    c: &mut Collector,
) -> Result<()> {
    let values = in_list::literal_values(values)?;
    let max = v.ctx().capabilities.max_in_list;
    in_list::write_in_list(v, left, &values, negated, max, c)
}

pub(super) fn walk_is_distinct_from<V: ?Sized + SqlVisitor>(
    v: &V,
    left: &Expr,
    right: &Expr,
    negated: bool,
    c: &mut Collector,
) -> Result<()> {
    visit_operand(v, left, true, IS_STRENGTH, &Associativity::Left, c)?;
    c.push(if negated {
        " IS NOT DISTINCT FROM "
    } else {
        " IS DISTINCT FROM "
    });
    visit_operand(v, right, false, IS_STRENGTH, &Associativity::Left, c)
}

pub(super) fn visit_exprs<V: ?Sized + SqlVisitor>(
    v: &V,
    exprs: &[Expr],
    separator: &str,
    c: &mut Collector,
) -> Result<()> {
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            c.push(separator);
        }
        v.visit_expr(expr, c)?;
    }
    Ok(())
}

/// Writes terms that must all hold, as in `WHERE` or `HAVING`.
pub(super) fn visit_conjunction<V: ?Sized + SqlVisitor>(
    v: &V,
    exprs: &[Expr],
    c: &mut Collector,
) -> Result<()> {
    if let [expr] = exprs {
        return v.visit_expr(expr, c);
    }

    let strength = BinOp::And.binding_strength();
    let associativity = BinOp::And.associativity();
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            c.push(" AND ");
        }
        visit_operand(v, expr, i == 0, strength, &associativity, c)?;
    }
    Ok(())
}

pub(super) fn visit_orders<V: ?Sized + SqlVisitor>(
    v: &V,
    orders: &[OrderExpr],
    c: &mut Collector,
) -> Result<()> {
    for (i, order) in orders.iter().enumerate() {
        if i > 0 {
            c.push(", ");
        }
        v.visit_order(order, c)?;
    }
    Ok(())
}

/// Writes an operand of an operator with `parent_strength`, in parentheses
/// when it binds looser than the operator.
pub(super) fn visit_operand<V: ?Sized + SqlVisitor>(
    v: &V,
    expr: &Expr,
    is_left: bool,
    parent_strength: i32,
    parent_associativity: &Associativity,
    c: &mut Collector,
) -> Result<()> {
    if needs_parentheses(expr, is_left, parent_strength, parent_associativity) {
        c.push_char('(');
        v.visit_expr(expr, c)?;
        c.push_char(')');
        Ok(())
    } else {
        v.visit_expr(expr, c)
    }
}

/// For an operation represented as `a child b` with a surrounding parent
/// operation (e.g., `(a child b) parent c` or `a parent (b child c)`):
///
/// 1. When the child operator has higher precedence than the parent,
///    parentheses *are not* required.
///
/// 2. When the child operator has lower precedence than the parent,
///    parentheses *are* required.
///
/// 3. When the child and parent operators have the same precedence,
///    parentheses are not required if the child is on the side the parent
///    associates to. So `(a - b) - c` and `a + (b - c)` need none, while
///    `a - (b - c)` does.
fn needs_parentheses(
    expr: &Expr,
    is_left: bool,
    parent_strength: i32,
    parent_associativity: &Associativity,
) -> bool {
    let rule_3a = matches!(parent_associativity, Associativity::Both);
    let rule_3b_left = is_left && parent_associativity.left_associative();
    let rule_3b_right = !is_left && parent_associativity.right_associative();

    match expr.binding_strength().cmp(&parent_strength) {
        // Rule 1
        Ordering::Greater => false,
        // Rule 2
        Ordering::Less => true,
        // Rule 3
        Ordering::Equal => !(rule_3a || rule_3b_left || rule_3b_right),
    }
}

/// Associativity of an expression's operator.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum Associativity {
    Left,
    /// Mathematically associative, like `+` or `AND`
    Both,
    Right,
}

impl Associativity {
    /// Returns true iff `a + b + c = (a + b) + c`
    fn left_associative(&self) -> bool {
        matches!(self, Associativity::Left | Associativity::Both)
    }

    /// Returns true iff `a + b + c = a + (b + c)`
    fn right_associative(&self) -> bool {
        matches!(self, Associativity::Right | Associativity::Both)
    }
}

/// Strength of `IS NULL` and `IS [NOT] DISTINCT FROM`.
const IS_STRENGTH: i32 = 5;

/// Strength of `BETWEEN`, `IN` and `LIKE`.
pub(super) const MEMBERSHIP_STRENGTH: i32 = 7;

trait SqlExpression {
    /// Returns binding strength of a SQL expression
    /// https://www.postgresql.org/docs/current/sql-syntax-lexical.html#SQL-PRECEDENCE
    fn binding_strength(&self) -> i32;

    /// Default to `Both`, but expected to be overwritten by operators
    fn associativity(&self) -> Associativity {
        Associativity::Both
    }
}

impl SqlExpression for Expr {
    fn binding_strength(&self) -> i32 {
        // Only the top-level operator counts, nested ones are written in
        // parentheses when they bind looser
        match &self.kind {
            ExprKind::Binary { op, .. } => op.binding_strength(),
            ExprKind::Unary { op, .. } => op.binding_strength(),

            // written with a leading minus
            ExprKind::Literal(Literal::Integer(i)) if *i < 0 => UnOp::Neg.binding_strength(),
            ExprKind::Literal(Literal::Float(f)) if f.is_sign_negative() => {
                UnOp::Neg.binding_strength()
            }

            ExprKind::Between { .. }
            | ExprKind::InList { .. }
            | ExprKind::HomogeneousIn { .. }
            | ExprKind::InSubquery { .. } => MEMBERSHIP_STRENGTH,

            ExprKind::IsNull { .. } | ExprKind::IsDistinctFrom { .. } => IS_STRENGTH,

            // all other items bind stronger (function calls, literals, ...)
            _ => 20,
        }
    }
}

impl SqlExpression for BinOp {
    fn binding_strength(&self) -> i32 {
        match self {
            BinOp::Mod | BinOp::Mul | BinOp::Div => 11,
            BinOp::Sub | BinOp::Add => 10,
            BinOp::Concat => 9,
            BinOp::Like | BinOp::NotLike => MEMBERSHIP_STRENGTH,
            BinOp::Gt | BinOp::Lt | BinOp::GtEq | BinOp::LtEq | BinOp::Eq | BinOp::NotEq => 6,
            BinOp::And => 3,
            BinOp::Or => 2,
        }
    }

    fn associativity(&self) -> Associativity {
        match self {
            BinOp::Sub | BinOp::Div | BinOp::Mod => Associativity::Left,
            _ => Associativity::Both,
        }
    }
}

impl SqlExpression for UnOp {
    fn binding_strength(&self) -> i32 {
        match self {
            UnOp::Neg => 13,
            UnOp::Not => 4,
        }
    }

    // `--x` would start a comment
    fn associativity(&self) -> Associativity {
        match self {
            UnOp::Neg => Associativity::Left,
            UnOp::Not => Associativity::Right,
        }
    }
}

/// Writes an identifier, quoting it unless it is a plain lowercase word that
/// is not a keyword.
pub(super) fn write_ident<V: ?Sized + SqlVisitor>(v: &V, ident: &str, c: &mut Collector) {
    let is_bare = valid_ident().is_match(ident);

    if is_bare && !keywords::is_keyword(ident) {
        c.push(ident);
    } else {
        let quote = v.ctx().dialect_handler.ident_quote();
        let escaped = ident.replace(quote, &format!("{quote}{quote}"));
        c.push_char(quote).push(&escaped).push_char(quote);
    }
}

pub(super) fn quote_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn valid_ident() -> &'static Regex {
    static VALID_IDENT: OnceLock<Regex> = OnceLock::new();
    VALID_IDENT.get_or_init(|| {
        // An ident starting with `a-z_\$` and containing other characters `a-z0-9_\$`
        Regex::new(r"^[a-z_\$][a-z0-9_\$]*$").unwrap()
    })
}
