//! Feature map for SQL dialects.
//!
//! Output targets the generic dialect wherever possible. Dialect-specifics
//! are added only where the generic form is not accepted by the target, e.g.
//! databases without `LIMIT`/`OFFSET` or with a ceiling on `IN` list length.
//!
//! What a dialect supports is described by [Capabilities], which the caller
//! may override when it knows the server version better than we do.
use core::fmt::Debug;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ParamStyle;

/// SQL dialect.
#[derive(
    Debug,
    PartialEq,
    Eq,
    Clone,
    Copy,
    Serialize,
    Default,
    Deserialize,
    JsonSchema,
    strum::Display,
    strum::EnumString,
    strum::VariantNames,
)]
#[strum(serialize_all = "lowercase")]
pub enum Dialect {
    #[default]
    Generic,
    Oracle,
}

impl Dialect {
    pub(super) fn handler(&self) -> Box<dyn DialectHandler> {
        match self {
            Dialect::Generic => Box::new(GenericDialect),
            Dialect::Oracle => Box::new(OracleDialect),
        }
    }

    /// What the dialect supports when no [Capabilities] are given.
    pub fn capabilities(&self) -> Capabilities {
        self.handler().capabilities()
    }
}

#[derive(Debug)]
pub struct GenericDialect;
#[derive(Debug)]
pub struct OracleDialect;

pub(super) trait DialectHandler: Debug {
    fn ident_quote(&self) -> char {
        '"'
    }

    fn param_style(&self) -> ParamStyle {
        ParamStyle::QuestionMark
    }

    /// Write booleans as `1` / `0`.
    fn emulate_booleans(&self) -> bool {
        false
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }
}

impl DialectHandler for GenericDialect {}

impl DialectHandler for OracleDialect {
    fn param_style(&self) -> ParamStyle {
        ParamStyle::Colon
    }

    fn emulate_booleans(&self) -> bool {
        true
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::oracle(11)
    }
}

/// What the target database can express natively.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub struct Capabilities {
    /// `LIMIT n OFFSET m`
    pub offset_limit: bool,
    /// `OFFSET m ROWS FETCH FIRST n ROWS ONLY`
    pub fetch_first: bool,
    /// Maximum number of elements in an `IN (...)` list.
    pub max_in_list: Option<usize>,
}

impl Default for Capabilities {
    fn default() -> Self {
        Capabilities {
            offset_limit: true,
            fetch_first: true,
            max_in_list: None,
        }
    }
}

impl Capabilities {
    /// Oracle gained `FETCH FIRST` in release 12.
    pub fn oracle(major_version: u32) -> Self {
        Capabilities {
            offset_limit: false,
            fetch_first: major_version >= 12,
            max_in_list: Some(1000),
        }
    }

    pub fn pagination(&self) -> Pagination {
        if self.offset_limit {
            Pagination::LimitOffset
        } else if self.fetch_first {
            Pagination::FetchFirst
        } else {
            Pagination::RowNumber
        }
    }
}

/// How `LIMIT` / `OFFSET` are rendered.
#[derive(Debug, PartialEq, Eq, Clone, Copy, strum::Display)]
pub enum Pagination {
    /// `LIMIT n OFFSET m`
    LimitOffset,
    /// `OFFSET m ROWS FETCH FIRST n ROWS ONLY`
    FetchFirst,
    /// Nested subqueries filtered on a row-number pseudo-column.
    RowNumber,
}
