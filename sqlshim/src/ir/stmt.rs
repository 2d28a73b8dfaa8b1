use enum_as_inner::EnumAsInner;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Expr;

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, JsonSchema, EnumAsInner)]
pub enum Statement {
    Select(SelectStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
}

impl From<SelectStatement> for Statement {
    fn from(select: SelectStatement) -> Self {
        Statement::Select(select)
    }
}

impl From<UpdateStatement> for Statement {
    fn from(update: UpdateStatement) -> Self {
        Statement::Update(update)
    }
}

impl From<DeleteStatement> for Statement {
    fn from(delete: DeleteStatement) -> Self {
        Statement::Delete(delete)
    }
}

/// One or more cores combined by set operators, followed by the
/// statement-level ordering, pagination and lock.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SelectStatement {
    pub cores: Vec<SelectCore>,
    #[serde(default)]
    pub orders: Vec<OrderExpr>,
    #[serde(default)]
    pub limit: Option<Limit>,
    #[serde(default)]
    pub offset: Option<Offset>,
    #[serde(default)]
    pub lock: Option<Lock>,
}

#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SelectCore {
    /// How this core combines with the cores before it. `None` for the first
    /// core only.
    #[serde(default)]
    pub set_op: Option<SetOperator>,
    #[serde(default)]
    pub quantifier: Option<SetQuantifier>,
    #[serde(default)]
    pub projections: Vec<Expr>,
    #[serde(default)]
    pub source: Option<JoinSource>,
    #[serde(default)]
    pub wheres: Vec<Expr>,
    #[serde(default)]
    pub groups: Vec<Expr>,
    #[serde(default)]
    pub havings: Vec<Expr>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub enum SetQuantifier {
    Distinct,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub struct SetOperator {
    pub kind: SetOperatorKind,
    #[serde(default)]
    pub all: bool,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, JsonSchema, strum::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum SetOperatorKind {
    Union,
    Intersect,
    Except,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Limit {
    pub expr: Expr,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Offset {
    pub expr: Expr,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OrderExpr {
    pub expr: Expr,
    #[serde(default)]
    pub direction: Option<SortDirection>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, JsonSchema, strum::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub enum Lock {
    ForUpdate,
    ForUpdateNoWait,
    ForUpdateSkipLocked,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, JsonSchema)]
pub struct JoinSource {
    pub base: TableFactor,
    #[serde(default)]
    pub joins: Vec<Join>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Join {
    pub kind: JoinKind,
    pub factor: TableFactor,
    #[serde(default)]
    pub constraint: Option<Expr>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, JsonSchema, EnumAsInner)]
pub enum TableFactor {
    Table(TableRef),
    Derived {
        subquery: Box<SelectStatement>,
        alias: String,
    },
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TableRef {
    #[serde(default)]
    pub schema: Option<String>,
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Assignment {
    pub column: String,
    pub value: Expr,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateStatement {
    pub relation: TableRef,
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub wheres: Vec<Expr>,
    #[serde(default)]
    pub orders: Vec<OrderExpr>,
    #[serde(default)]
    pub limit: Option<Limit>,
    #[serde(default)]
    pub offset: Option<Offset>,
    #[serde(default)]
    pub groups: Vec<Expr>,
    #[serde(default)]
    pub havings: Vec<Expr>,
    /// Primary key of `relation`, used to restrict rows through a subselect.
    #[serde(default)]
    pub key: Option<Expr>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DeleteStatement {
    pub relation: TableRef,
    #[serde(default)]
    pub wheres: Vec<Expr>,
    #[serde(default)]
    pub orders: Vec<OrderExpr>,
    #[serde(default)]
    pub limit: Option<Limit>,
    #[serde(default)]
    pub offset: Option<Offset>,
    #[serde(default)]
    pub groups: Vec<Expr>,
    #[serde(default)]
    pub havings: Vec<Expr>,
    #[serde(default)]
    pub key: Option<Expr>,
}

impl SelectStatement {
    pub fn new(core: SelectCore) -> Self {
        SelectStatement {
            cores: vec![core],
            orders: Vec::new(),
            limit: None,
            offset: None,
            lock: None,
        }
    }

    /// `SELECT <projections> FROM <table>`
    pub fn from_table<S: Into<String>>(table: S, projections: Vec<Expr>) -> Self {
        SelectStatement::new(SelectCore {
            projections,
            source: Some(JoinSource::from(TableRef::new(table))),
            ..Default::default()
        })
    }

    pub fn with_limit(mut self, expr: Expr) -> Self {
        self.limit = Some(Limit { expr });
        self
    }

    pub fn with_offset(mut self, expr: Expr) -> Self {
        self.offset = Some(Offset { expr });
        self
    }

    pub fn with_order(mut self, expr: Expr, direction: SortDirection) -> Self {
        self.orders.push(OrderExpr {
            expr,
            direction: Some(direction),
        });
        self
    }

    pub fn with_where(mut self, expr: Expr) -> Self {
        if let Some(core) = self.cores.last_mut() {
            core.wheres.push(expr);
        }
        self
    }

    pub fn distinct(mut self) -> Self {
        if let Some(core) = self.cores.last_mut() {
            core.quantifier = Some(SetQuantifier::Distinct);
        }
        self
    }

    /// Appends `other`'s cores, the first of them combined with `kind`.
    /// Statement-level clauses of `other` are discarded.
    pub fn combine(mut self, kind: SetOperatorKind, all: bool, other: SelectStatement) -> Self {
        let mut cores = other.cores.into_iter();
        if let Some(mut first) = cores.next() {
            first.set_op = Some(SetOperator { kind, all });
            self.cores.push(first);
        }
        self.cores.extend(cores);
        self
    }
}

impl TableRef {
    pub fn new<S: Into<String>>(name: S) -> Self {
        TableRef {
            schema: None,
            name: name.into(),
            alias: None,
        }
    }

    pub fn aliased<S: Into<String>>(mut self, alias: S) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

impl From<TableRef> for JoinSource {
    fn from(table: TableRef) -> Self {
        JoinSource {
            base: TableFactor::Table(table),
            joins: Vec::new(),
        }
    }
}

impl OrderExpr {
    pub fn asc(expr: Expr) -> Self {
        OrderExpr {
            expr,
            direction: Some(SortDirection::Asc),
        }
    }

    pub fn desc(expr: Expr) -> Self {
        OrderExpr {
            expr,
            direction: Some(SortDirection::Desc),
        }
    }
}

impl UpdateStatement {
    pub fn new(relation: TableRef, assignments: Vec<Assignment>) -> Self {
        UpdateStatement {
            relation,
            assignments,
            wheres: Vec::new(),
            orders: Vec::new(),
            limit: None,
            offset: None,
            groups: Vec::new(),
            havings: Vec::new(),
            key: None,
        }
    }
}

impl DeleteStatement {
    pub fn new(relation: TableRef) -> Self {
        DeleteStatement {
            relation,
            wheres: Vec::new(),
            orders: Vec::new(),
            limit: None,
            offset: None,
            groups: Vec::new(),
            havings: Vec::new(),
            key: None,
        }
    }
}
