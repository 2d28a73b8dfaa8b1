use crate::ir::*;
use crate::sql::collector::Collector;
use crate::sql::gen_query::{walk_delete, walk_update, DmlSource};
use crate::{Error, Reason, Result, WithErrorInfo};

use super::OracleVisitor;

pub(super) fn write_update(
    v: &OracleVisitor,
    update: &UpdateStatement,
    c: &mut Collector,
) -> Result<()> {
    if check_dml(&DmlSource::from(update), "UPDATE")? {
        let update = UpdateStatement {
            orders: Vec::new(),
            ..update.clone()
        };
        return walk_update(v, &update, c);
    }
    walk_update(v, update, c)
}

pub(super) fn write_delete(
    v: &OracleVisitor,
    delete: &DeleteStatement,
    c: &mut Collector,
) -> Result<()> {
    if check_dml(&DmlSource::from(delete), "DELETE")? {
        let delete = DeleteStatement {
            orders: Vec::new(),
            ..delete.clone()
        };
        return walk_delete(v, &delete, c);
    }
    walk_delete(v, delete, c)
}

/// Validates ordering and pagination of a DML statement. Returns whether its
/// ordering should be dropped.
///
/// Without a limit, ordering cannot change which rows are affected. With a
/// limit it would, and since the ordering cannot be expressed it is an error.
fn check_dml(source: &DmlSource, statement: &str) -> Result<bool> {
    if !source.orders.is_empty() && source.limit.is_some() {
        return Err(Error::new(Reason::InvalidOrderingContext {
            statement: format!("{statement} with a limit"),
        })
        .push_hint("select the keys of the affected rows in a separate query"));
    }

    if (source.limit.is_some() || source.offset.is_some()) && source.key.is_none() {
        return Err(Error::new_invalid_argument(format!(
            "{statement} with a limit or offset needs a key to select rows through"
        )));
    }

    let drop_orders = !source.orders.is_empty();
    if drop_orders {
        log::debug!("dropping ORDER BY of {statement} without a limit");
    }
    Ok(drop_orders)
}

/// Subselects feeding DML never carry an ordering. Row order does not change
/// which keys are selected.
pub(super) fn strip_orders(mut select: SelectStatement) -> SelectStatement {
    select.orders.clear();
    select
}
