//! Backend for translating statement trees into SQL.

mod collector;
mod dialect;
mod gen_expr;
mod gen_query;
mod in_list;
mod keywords;
mod oracle;
mod split;
mod visit;

use sqlformat::{format, FormatOptions, QueryParams};

pub use collector::{BoundParam, CompiledSql, ParamStyle};
pub use dialect::{Capabilities, Dialect, Pagination};
pub use split::split_order_string;

use crate::ir::{Expr, OrderExpr, Statement};
use crate::{Error, Options, Result, Target};

use collector::Collector;
use dialect::DialectHandler;
use visit::{GenericVisitor, SqlVisitor};

/// Translate a statement into SQL.
pub fn compile(statement: &Statement, options: &Options) -> Result<CompiledSql> {
    let ctx = Context::new(options)?;
    log::debug!(
        "compiling for {} with {} pagination",
        ctx.dialect,
        ctx.capabilities.pagination()
    );

    let mut collector = Collector::new(ctx.param_style);
    ctx.visitor().visit_statement(statement, &mut collector)?;
    let mut compiled = collector.finish();

    if options.format {
        compiled.sql = format(
            &compiled.sql,
            &QueryParams::None,
            &FormatOptions::default(),
        );
    }

    if options.signature_comment {
        compiled.sql.push_str(&format!(
            "\n\n-- Generated by sqlshim version:{} (target: {})\n",
            env!("CARGO_PKG_VERSION"),
            ctx.dialect
        ));
    }

    Ok(compiled)
}

/// Projections for a `SELECT DISTINCT` of `columns` that also orders by
/// `orders`.
///
/// Each ordering term becomes
/// `FIRST_VALUE(<term>) OVER (PARTITION BY <columns> ORDER BY <term>) AS alias_<i>__`,
/// followed by the columns themselves. The ordering terms don't change which
/// rows are distinct, and compiling such a statement for a dialect that
/// needs it rewrites its `ORDER BY` to refer to the aliases.
pub fn distinct_projections(
    columns: &[Expr],
    orders: &[OrderExpr],
    options: &Options,
) -> Result<Vec<Expr>> {
    let ctx = Context::new(options)?;
    let visitor = ctx.visitor();
    oracle::projections_for_distinct(&*visitor, columns, orders)
}

/// Settings of one compilation, resolved from [Options] and the dialect.
struct Context {
    dialect: Dialect,
    dialect_handler: Box<dyn DialectHandler>,
    capabilities: Capabilities,
    param_style: ParamStyle,
    emulate_booleans: bool,
}

impl Context {
    fn new(options: &Options) -> Result<Self> {
        let Target::Sql(dialect) = &options.target;
        let dialect = dialect.unwrap_or_default();
        let dialect_handler = dialect.handler();

        let capabilities = options
            .capabilities
            .unwrap_or_else(|| dialect_handler.capabilities());
        if capabilities.max_in_list == Some(0) {
            return Err(Error::new_invalid_argument(
                "the maximum IN list length must be at least 1",
            ));
        }

        Ok(Context {
            dialect,
            capabilities,
            param_style: (options.param_style).unwrap_or_else(|| dialect_handler.param_style()),
            emulate_booleans: (options.emulate_booleans)
                .unwrap_or_else(|| dialect_handler.emulate_booleans()),
            dialect_handler,
        })
    }

    fn visitor(&self) -> Box<dyn SqlVisitor + '_> {
        match self.dialect {
            Dialect::Generic => Box::new(GenericVisitor { ctx: self }),
            Dialect::Oracle => Box::new(oracle::OracleVisitor { ctx: self }),
        }
    }
}
