use enum_as_inner::EnumAsInner;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{OrderExpr, SelectStatement};

/// A scalar expression node.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Expr {
    pub kind: ExprKind,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, JsonSchema, EnumAsInner)]
pub enum ExprKind {
    Column {
        relation: Option<String>,
        name: String,
    },

    /// `*` or `relation.*`
    Star {
        relation: Option<String>,
    },

    Literal(Literal),

    /// Placeholder for a value provided at execution time.
    ///
    /// `value` is only required when the statement is compiled with
    /// inlined parameters.
    Param {
        name: String,
        value: Option<Literal>,
    },

    /// Text emitted verbatim.
    SqlLiteral(String),

    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },

    Unary {
        op: UnOp,
        expr: Box<Expr>,
    },

    IsNull {
        expr: Box<Expr>,
        negated: bool,
    },

    IsDistinctFrom {
        left: Box<Expr>,
        right: Box<Expr>,
        negated: bool,
    },

    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        negated: bool,
    },

    /// `IN` over arbitrary expressions.
    InList {
        expr: Box<Expr>,
        list: Vec<Expr>,
        negated: bool,
    },

    /// `IN` over a materialized set of literal values. Dialects may split it
    /// when the set is larger than their list limit.
    HomogeneousIn {
        left: Box<Expr>,
        values: Vec<Expr>,
        negated: bool,
    },

    InSubquery {
        expr: Box<Expr>,
        subquery: Box<SelectStatement>,
        negated: bool,
    },

    Exists {
        subquery: Box<SelectStatement>,
        negated: bool,
    },

    Function {
        name: String,
        args: Vec<Expr>,
        distinct: bool,
    },

    Window {
        function: Box<Expr>,
        partition_by: Vec<Expr>,
        order_by: Vec<OrderExpr>,
    },

    Case {
        operand: Option<Box<Expr>>,
        cases: Vec<SwitchCase>,
        default: Option<Box<Expr>>,
    },

    Cast {
        expr: Box<Expr>,
        data_type: String,
    },

    /// Parenthesized expression.
    Grouping(Box<Expr>),

    Alias {
        expr: Box<Expr>,
        alias: String,
    },

    Subquery(Box<SelectStatement>),
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SwitchCase {
    pub condition: Expr,
    pub value: Expr,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, JsonSchema, EnumAsInner)]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, JsonSchema, strum::Display)]
pub enum BinOp {
    #[strum(to_string = "=")]
    Eq,
    #[strum(to_string = "<>")]
    NotEq,
    #[strum(to_string = "<")]
    Lt,
    #[strum(to_string = "<=")]
    LtEq,
    #[strum(to_string = ">")]
    Gt,
    #[strum(to_string = ">=")]
    GtEq,
    #[strum(to_string = "AND")]
    And,
    #[strum(to_string = "OR")]
    Or,
    #[strum(to_string = "+")]
    Add,
    #[strum(to_string = "-")]
    Sub,
    #[strum(to_string = "*")]
    Mul,
    #[strum(to_string = "/")]
    Div,
    #[strum(to_string = "%")]
    Mod,
    #[strum(to_string = "||")]
    Concat,
    #[strum(to_string = "LIKE")]
    Like,
    #[strum(to_string = "NOT LIKE")]
    NotLike,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub enum UnOp {
    Neg,
    Not,
}

impl From<ExprKind> for Expr {
    fn from(kind: ExprKind) -> Self {
        Expr { kind }
    }
}

impl From<Literal> for Expr {
    fn from(literal: Literal) -> Self {
        ExprKind::Literal(literal).into()
    }
}

impl Expr {
    pub fn column<S: Into<String>>(name: S) -> Self {
        ExprKind::Column {
            relation: None,
            name: name.into(),
        }
        .into()
    }

    pub fn qualified<R: Into<String>, S: Into<String>>(relation: R, name: S) -> Self {
        ExprKind::Column {
            relation: Some(relation.into()),
            name: name.into(),
        }
        .into()
    }

    pub fn star() -> Self {
        ExprKind::Star { relation: None }.into()
    }

    pub fn int(value: i64) -> Self {
        Literal::Integer(value).into()
    }

    pub fn string<S: Into<String>>(value: S) -> Self {
        Literal::String(value.into()).into()
    }

    pub fn boolean(value: bool) -> Self {
        Literal::Boolean(value).into()
    }

    pub fn null() -> Self {
        Literal::Null.into()
    }

    /// A bound parameter with a known value.
    pub fn param<S: Into<String>>(name: S, value: Literal) -> Self {
        ExprKind::Param {
            name: name.into(),
            value: Some(value),
        }
        .into()
    }

    pub fn raw<S: Into<String>>(text: S) -> Self {
        ExprKind::SqlLiteral(text.into()).into()
    }

    pub fn function<S: Into<String>>(name: S, args: Vec<Expr>) -> Self {
        ExprKind::Function {
            name: name.into(),
            args,
            distinct: false,
        }
        .into()
    }

    pub fn binary(self, op: BinOp, right: Expr) -> Self {
        ExprKind::Binary {
            left: Box::new(self),
            op,
            right: Box::new(right),
        }
        .into()
    }

    pub fn eq(self, right: Expr) -> Self {
        self.binary(BinOp::Eq, right)
    }

    pub fn gt(self, right: Expr) -> Self {
        self.binary(BinOp::Gt, right)
    }

    pub fn and(self, right: Expr) -> Self {
        self.binary(BinOp::And, right)
    }

    pub fn or(self, right: Expr) -> Self {
        self.binary(BinOp::Or, right)
    }

    pub fn alias<S: Into<String>>(self, alias: S) -> Self {
        ExprKind::Alias {
            expr: Box::new(self),
            alias: alias.into(),
        }
        .into()
    }

    pub fn grouping(self) -> Self {
        ExprKind::Grouping(Box::new(self)).into()
    }

    pub fn in_values(self, values: Vec<Expr>) -> Self {
        ExprKind::HomogeneousIn {
            left: Box::new(self),
            values,
            negated: false,
        }
        .into()
    }

    pub fn not_in_values(self, values: Vec<Expr>) -> Self {
        ExprKind::HomogeneousIn {
            left: Box::new(self),
            values,
            negated: true,
        }
        .into()
    }

    pub fn is_distinct_from(self, right: Expr) -> Self {
        ExprKind::IsDistinctFrom {
            left: Box::new(self),
            right: Box::new(right),
            negated: false,
        }
        .into()
    }
}
