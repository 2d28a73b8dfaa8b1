//! Compiler of dialect-neutral SQL statement trees into SQL text for a
//! target dialect.
//!
//! Statements are built by a query builder (or read from JSON) as [ir]
//! trees. Compiling them for a dialect rewrites the constructs the dialect
//! cannot express: `LIMIT` / `OFFSET` without native support, `IN` lists
//! longer than the dialect allows, `ORDER BY` where it is rejected.
//!
//! ```
//! use sqlshim::ir::{Expr, SelectStatement, Statement};
//! use sqlshim::{compile, sql::Dialect, Options, Target};
//!
//! let select = SelectStatement::from_table("employees", vec![Expr::column("name")])
//!     .with_limit(Expr::int(10))
//!     .with_offset(Expr::int(20));
//!
//! let opts = Options::default()
//!     .with_target(Target::Sql(Some(Dialect::Oracle)))
//!     .no_format()
//!     .no_signature();
//! let compiled = compile(&Statement::Select(select), &opts).unwrap();
//!
//! assert_eq!(
//!     compiled.sql,
//!     "SELECT * FROM (SELECT raw_sql_.*, rownum raw_rnum_ FROM (SELECT name FROM employees) raw_sql_ WHERE rownum <= 30) WHERE raw_rnum_ > 20"
//! );
//! ```

#![forbid(unsafe_code)]
// Our error type carries a few strings and an enum, which is above the
// default warning level. Results are not on a hot path.
#![allow(clippy::result_large_err)]

use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::VariantNames;

pub use error::{Error, MessageKind, Reason, WithErrorInfo};
pub use error_message::{ErrorMessage, ErrorMessages};
pub use sql::{BoundParam, Capabilities, CompiledSql, ParamStyle};

mod error;
mod error_message;
pub mod ir;
pub mod sql;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Compile a statement tree into SQL.
///
/// See [`Options`] for configuration and [`sql::Dialect`] for supported
/// dialects.
pub fn compile(statement: &ir::Statement, options: &Options) -> Result<CompiledSql, ErrorMessages> {
    sql::compile(statement, options).map_err(ErrorMessages::from)
}

/// Projections for a `SELECT DISTINCT` that orders by columns outside of it.
///
/// See [`sql::distinct_projections`].
pub fn distinct_projections(
    columns: &[ir::Expr],
    orders: &[ir::OrderExpr],
    options: &Options,
) -> Result<Vec<ir::Expr>, ErrorMessages> {
    sql::distinct_projections(columns, orders, options).map_err(ErrorMessages::from)
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub enum Target {
    /// If `None` is used, the generic dialect is used.
    Sql(Option<sql::Dialect>),
}

impl Default for Target {
    fn default() -> Self {
        Self::Sql(None)
    }
}

impl Target {
    pub fn names() -> Vec<String> {
        let mut names = vec!["sql.any".to_string()];

        let dialects = sql::Dialect::VARIANTS;
        names.extend(dialects.iter().map(|d| format!("sql.{d}")));

        names
    }
}

impl FromStr for Target {
    type Err = Error;

    fn from_str(s: &str) -> Result<Target, Self::Err> {
        if let Some(dialect) = s.strip_prefix("sql.") {
            if dialect == "any" {
                return Ok(Target::Sql(None));
            }

            if let Ok(dialect) = sql::Dialect::from_str(dialect) {
                return Ok(Target::Sql(Some(dialect)));
            }
        }

        Err(Error::new(Reason::NotFound {
            name: format!("{s:?}"),
            namespace: "target".to_string(),
        })
        .push_hint(format!("available targets: {}", Target::names().join(", "))))
    }
}

/// Compilation options.
///
/// Settings left as `None` take the default of the target dialect.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Options {
    /// Pass generated SQL string through a formatter that splits it
    /// into multiple lines and prettifies indentation and spacing.
    ///
    /// Defaults to true.
    pub format: bool,

    /// Target and dialect to compile to.
    pub target: Target,

    /// Emits the compiler signature as a comment after generated SQL
    ///
    /// Defaults to true.
    pub signature_comment: bool,

    /// Overrides what the target database supports, e.g. for a newer server
    /// version than the dialect assumes.
    pub capabilities: Option<Capabilities>,

    pub param_style: Option<ParamStyle>,

    /// Write booleans as `1` / `0`.
    pub emulate_booleans: Option<bool>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            format: true,
            target: Target::Sql(None),
            signature_comment: true,
            capabilities: None,
            param_style: None,
            emulate_booleans: None,
        }
    }
}

impl Options {
    pub fn with_format(mut self, format: bool) -> Self {
        self.format = format;
        self
    }

    pub fn no_format(self) -> Self {
        self.with_format(false)
    }

    pub fn with_signature_comment(mut self, signature_comment: bool) -> Self {
        self.signature_comment = signature_comment;
        self
    }

    pub fn no_signature(self) -> Self {
        self.with_signature_comment(false)
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    pub fn with_param_style(mut self, param_style: ParamStyle) -> Self {
        self.param_style = Some(param_style);
        self
    }

    pub fn with_emulate_booleans(mut self, emulate_booleans: bool) -> Self {
        self.emulate_booleans = Some(emulate_booleans);
        self
    }
}

/// JSON serialization and deserialization functions
pub mod json {
    use super::*;

    /// JSON serialization
    pub fn from_statement(statement: &ir::Statement) -> Result<String, ErrorMessages> {
        serde_json::to_string(statement).map_err(convert_json_err)
    }

    /// JSON deserialization
    pub fn to_statement(json: &str) -> Result<ir::Statement, ErrorMessages> {
        serde_json::from_str(json).map_err(convert_json_err)
    }

    fn convert_json_err(err: serde_json::Error) -> ErrorMessages {
        ErrorMessages::from(Error::new_simple(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use insta::assert_debug_snapshot;

    use crate::Target;

    #[test]
    fn test_target_from_str() {
        assert_debug_snapshot!(Target::from_str("sql.oracle"), @r"
        Ok(
            Sql(
                Some(
                    Oracle,
                ),
            ),
        )
        ");

        assert_debug_snapshot!(Target::from_str("sql.any"), @r"
        Ok(
            Sql(
                None,
            ),
        )
        ");

        assert!(Target::from_str("sql.foo").is_err());
        assert!(Target::from_str("oracle").is_err());
    }

    #[test]
    fn test_target_names() {
        assert_debug_snapshot!(Target::names(), @r#"
        [
            "sql.any",
            "sql.generic",
            "sql.oracle",
        ]
        "#);
    }
}
