use insta::assert_snapshot;
use rstest::rstest;
use similar_asserts::assert_eq;
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;

use sqlshim::ir::*;
use sqlshim::sql::Dialect;
use sqlshim::{compile, distinct_projections, json, Capabilities, ErrorMessages, Options, Target};

fn oracle_opts() -> Options {
    Options::default()
        .with_target(Target::Sql(Some(Dialect::Oracle)))
        .no_format()
        .no_signature()
}

fn oracle(stmt: impl Into<Statement>) -> String {
    compile(&stmt.into(), &oracle_opts()).unwrap().sql
}

fn oracle_err(stmt: impl Into<Statement>) -> ErrorMessages {
    compile(&stmt.into(), &oracle_opts()).unwrap_err()
}

fn employees() -> SelectStatement {
    SelectStatement::from_table("employees", vec![Expr::column("name")])
}

fn assert_parses(sql: &str) {
    if let Err(err) = Parser::parse_sql(&GenericDialect {}, sql) {
        panic!("generated SQL does not parse: {err}\n{sql}");
    }
}

#[test]
fn limit_and_offset() {
    let sql = oracle(
        employees()
            .with_order(Expr::column("name"), SortDirection::Asc)
            .with_limit(Expr::int(10))
            .with_offset(Expr::int(20)),
    );
    assert_snapshot!(sql, @"SELECT * FROM (SELECT raw_sql_.*, rownum raw_rnum_ FROM (SELECT name FROM employees ORDER BY name ASC) raw_sql_ WHERE rownum <= 30) WHERE raw_rnum_ > 20");
    assert_parses(&sql);
}

#[test]
fn limit_and_offset_as_params() {
    let stmt = employees()
        .with_limit(Expr::param("lim", Literal::Integer(10)))
        .with_offset(Expr::param("off", Literal::Integer(20)));

    let compiled = compile(&Statement::Select(stmt), &oracle_opts()).unwrap();
    assert_snapshot!(compiled.sql, @"SELECT * FROM (SELECT raw_sql_.*, rownum raw_rnum_ FROM (SELECT name FROM employees) raw_sql_ WHERE rownum <= (:a1 + :a2)) WHERE raw_rnum_ > :a3");

    let bound: Vec<_> = compiled
        .params
        .iter()
        .map(|p| (p.marker.as_str(), p.name.as_str()))
        .collect();
    assert_eq!(bound, vec![(":a1", "off"), (":a2", "lim"), (":a3", "off")]);
}

#[test]
fn limit_only_unordered() {
    let stmt = employees()
        .with_where(Expr::column("active").eq(Expr::boolean(true)))
        .with_limit(Expr::int(10));
    let sql = oracle(stmt);
    assert_snapshot!(sql, @"SELECT name FROM employees WHERE active = 1 AND ROWNUM <= 10");
    assert_parses(&sql);
}

fn in_either_dept() -> Expr {
    Expr::column("dept")
        .eq(Expr::int(1))
        .or(Expr::column("dept").eq(Expr::int(2)))
}

#[test]
fn limit_only_unordered_keeps_disjunction_whole() {
    let sql = oracle(employees().with_where(in_either_dept()).with_limit(Expr::int(10)));
    assert_snapshot!(sql, @"SELECT name FROM employees WHERE (dept = 1 OR dept = 2) AND ROWNUM <= 10");
    assert_parses(&sql);

    let sql = oracle(
        employees()
            .with_where(in_either_dept())
            .with_where(Expr::column("active").eq(Expr::boolean(true)))
            .with_order(Expr::column("name"), SortDirection::Asc)
            .with_limit(Expr::int(10)),
    );
    assert_snapshot!(sql, @"SELECT * FROM (SELECT name FROM employees WHERE (dept = 1 OR dept = 2) AND active = 1 ORDER BY name ASC) WHERE ROWNUM <= 10");
    assert_parses(&sql);
}

#[test]
fn limit_only_ordered() {
    let stmt = employees()
        .with_order(Expr::column("name"), SortDirection::Desc)
        .with_limit(Expr::int(10));
    let sql = oracle(stmt);
    assert_snapshot!(sql, @"SELECT * FROM (SELECT name FROM employees ORDER BY name DESC) WHERE ROWNUM <= 10");
    assert_parses(&sql);
}

#[test]
fn limit_only_distinct_or_grouped() {
    let sql = oracle(employees().distinct().with_limit(Expr::int(5)));
    assert_snapshot!(sql, @"SELECT * FROM (SELECT DISTINCT name FROM employees) WHERE ROWNUM <= 5");

    let mut grouped = employees().with_limit(Expr::int(5));
    grouped.cores[0].groups.push(Expr::column("name"));
    assert_snapshot!(oracle(grouped), @"SELECT * FROM (SELECT name FROM employees GROUP BY name) WHERE ROWNUM <= 5");
}

#[test]
fn offset_only() {
    let sql = oracle(employees().with_offset(Expr::int(20)));
    assert_snapshot!(sql, @"SELECT * FROM (SELECT raw_sql_.*, rownum raw_rnum_ FROM (SELECT name FROM employees) raw_sql_) WHERE raw_rnum_ > 20");
    assert_parses(&sql);
}

#[test]
fn set_operation_is_wrapped() {
    let stmt = employees()
        .combine(SetOperatorKind::Union, false, SelectStatement::from_table("contractors", vec![Expr::column("name")]))
        .with_limit(Expr::int(5));
    assert_snapshot!(oracle(stmt), @"SELECT * FROM (SELECT name FROM employees UNION SELECT name FROM contractors) WHERE ROWNUM <= 5");
}

#[test]
fn nested_subquery_is_rewritten() {
    let inner = SelectStatement::from_table("managers", vec![Expr::column("id")]).with_limit(Expr::int(3));
    let stmt = employees().with_where(
        ExprKind::InSubquery {
            expr: Box::new(Expr::column("manager_id")),
            subquery: Box::new(inner),
            negated: false,
        }
        .into(),
    );
    assert_snapshot!(oracle(stmt), @"SELECT name FROM employees WHERE manager_id IN (SELECT id FROM managers WHERE ROWNUM <= 3)");
}

#[test]
fn lock_with_limit() {
    let mut fast = employees().with_limit(Expr::int(1));
    fast.lock = Some(Lock::ForUpdateSkipLocked);
    assert_snapshot!(oracle(fast), @"SELECT name FROM employees WHERE ROWNUM <= 1 FOR UPDATE SKIP LOCKED");

    let mut wrapped = employees()
        .with_order(Expr::column("name"), SortDirection::Asc)
        .with_limit(Expr::int(1));
    wrapped.lock = Some(Lock::ForUpdate);
    let err = oracle_err(wrapped);
    assert_snapshot!(err, @r"
    [E0101] Error: FOR UPDATE together with a row limit is not supported by dialect `oracle`
    ↳ Hint: lock the rows in a separate statement
    ");

    let mut fetch_first = employees().with_limit(Expr::int(1));
    fetch_first.lock = Some(Lock::ForUpdate);
    let opts = oracle_opts().with_capabilities(Capabilities::oracle(12));
    let err = compile(&Statement::Select(fetch_first), &opts).unwrap_err();
    assert_eq!(err.inner[0].code.as_deref(), Some("E0101"));

    let mut offset_only = employees().with_offset(Expr::int(5));
    offset_only.lock = Some(Lock::ForUpdate);
    let err = compile(&Statement::Select(offset_only.clone()), &opts).unwrap_err();
    assert_eq!(err.inner[0].code.as_deref(), Some("E0101"));
    let err = oracle_err(offset_only);
    assert_eq!(err.inner[0].code.as_deref(), Some("E0101"));
}

#[rstest]
#[case(11, "SELECT * FROM (SELECT raw_sql_.*, rownum raw_rnum_ FROM (SELECT name FROM employees ORDER BY name ASC) raw_sql_ WHERE rownum <= 30) WHERE raw_rnum_ > 20")]
#[case(12, "SELECT name FROM employees ORDER BY name ASC OFFSET 20 ROWS FETCH FIRST 10 ROWS ONLY")]
#[case(19, "SELECT name FROM employees ORDER BY name ASC OFFSET 20 ROWS FETCH FIRST 10 ROWS ONLY")]
fn server_versions(#[case] version: u32, #[case] expected: &str) {
    let stmt = employees()
        .with_order(Expr::column("name"), SortDirection::Asc)
        .with_limit(Expr::int(10))
        .with_offset(Expr::int(20));
    let opts = oracle_opts().with_capabilities(Capabilities::oracle(version));
    let sql = compile(&Statement::Select(stmt), &opts).unwrap().sql;
    assert_eq!(sql.as_str(), expected);
}

#[test]
fn invalid_pagination_values() {
    let err = oracle_err(employees().with_limit(Expr::int(-1)));
    assert_snapshot!(err, @r"
    [E0103] Error: invalid argument: limit must not be negative, found -1
    ");

    let err = oracle_err(employees().with_offset(Expr::string("ten")));
    assert_snapshot!(err, @r#"
    Error: offset expected an integer, but found String("ten")
    "#);

    let err = oracle_err(
        employees()
            .with_limit(Expr::int(i64::MAX))
            .with_offset(Expr::int(1)),
    );
    assert_eq!(err.inner[0].code.as_deref(), Some("E0103"));
}

#[test]
fn long_in_list() {
    let values = (0..2500).map(Expr::int).collect();
    let stmt = SelectStatement::from_table("employees", vec![])
        .with_where(Expr::column("id").in_values(values));
    let sql = oracle(stmt);

    let where_clause = sql.strip_prefix("SELECT * FROM employees WHERE (").unwrap();
    let where_clause = where_clause.strip_suffix(')').unwrap();
    let groups: Vec<usize> = where_clause
        .split(" OR ")
        .map(|group| {
            let list = group.strip_prefix("id IN (").unwrap().strip_suffix(')').unwrap();
            list.split(", ").count()
        })
        .collect();
    assert_eq!(groups, vec![1000, 1000, 500]);
    assert!(where_clause.starts_with("id IN (0, 1, 2,"));
    assert!(where_clause.ends_with("2498, 2499)"));
    assert_parses(&sql);
}

#[test]
fn long_not_in_list() {
    let values = (0..1001).map(Expr::int).collect();
    let stmt = SelectStatement::from_table("employees", vec![])
        .with_where(Expr::column("id").not_in_values(values));
    let sql = oracle(stmt);

    assert_eq!(sql.matches(" NOT IN (").count(), 2);
    assert!(sql.contains(") AND id NOT IN (1000))"));
}

#[test]
fn set_operators() {
    let stmt = employees().combine(
        SetOperatorKind::Except,
        false,
        SelectStatement::from_table("managers", vec![Expr::column("name")]),
    );
    assert_snapshot!(oracle(stmt), @"SELECT name FROM employees MINUS SELECT name FROM managers");

    let stmt = employees().combine(SetOperatorKind::Intersect, true, employees());
    let err = oracle_err(stmt);
    assert_snapshot!(err.inner[0].reason, @"INTERSECT ALL is not supported by dialect `oracle`");
}

#[test]
fn is_distinct_from() {
    let stmt = employees().with_where(Expr::column("a").is_distinct_from(Expr::column("b")));
    assert_snapshot!(oracle(stmt), @"SELECT name FROM employees WHERE DECODE(a, b, 0, 1) = 1");

    let stmt = employees().with_where(
        ExprKind::IsDistinctFrom {
            left: Box::new(Expr::column("a")),
            right: Box::new(Expr::null()),
            negated: true,
        }
        .into(),
    );
    assert_snapshot!(oracle(stmt), @"SELECT name FROM employees WHERE DECODE(a, NULL, 0, 1) = 0");
}

#[test]
fn distinct_with_foreign_ordering() {
    let columns = vec![Expr::column("dept")];
    let orders = vec![
        OrderExpr::desc(Expr::column("hired")),
        OrderExpr::asc(Expr::function("LOWER", vec![Expr::column("name")])),
    ];

    let projections = distinct_projections(&columns, &orders, &oracle_opts()).unwrap();
    assert_eq!(projections.len(), 3);

    let mut stmt = SelectStatement::from_table("employees", projections).distinct();
    stmt.orders = orders;
    let stmt = stmt.with_limit(Expr::int(5));

    assert_snapshot!(oracle(stmt), @"SELECT * FROM (SELECT DISTINCT FIRST_VALUE(hired) OVER (PARTITION BY dept ORDER BY hired) AS alias_0__, FIRST_VALUE(LOWER(name)) OVER (PARTITION BY dept ORDER BY LOWER(name)) AS alias_1__, dept FROM employees ORDER BY alias_0__ DESC, alias_1__) WHERE ROWNUM <= 5");
}

#[test]
fn distinct_ordering_split_from_raw_text() {
    let columns = vec![Expr::column("dept")];
    let orders = vec![OrderExpr {
        expr: Expr::raw("salary DESC, COALESCE(bonus, 0)"),
        direction: None,
    }];

    let projections = distinct_projections(&columns, &orders, &oracle_opts()).unwrap();
    let mut stmt = SelectStatement::from_table("employees", projections).distinct();
    stmt.orders = orders;

    assert_snapshot!(oracle(stmt), @"SELECT DISTINCT FIRST_VALUE(salary) OVER (PARTITION BY dept ORDER BY salary) AS alias_0__, FIRST_VALUE(COALESCE(bonus, 0)) OVER (PARTITION BY dept ORDER BY COALESCE(bonus, 0)) AS alias_1__, dept FROM employees ORDER BY alias_0__ DESC, alias_1__");
}

fn raise_salaries() -> UpdateStatement {
    let mut update = UpdateStatement::new(
        TableRef::new("employees"),
        vec![Assignment {
            column: "salary".to_string(),
            value: Expr::column("salary").binary(BinOp::Mul, Expr::raw("1.1")),
        }],
    );
    update.wheres.push(Expr::column("dept").eq(Expr::int(3)));
    update
}

#[test]
fn dml_ordering_without_limit_is_dropped() {
    let mut update = raise_salaries();
    update.orders.push(OrderExpr::asc(Expr::column("hired")));
    assert_snapshot!(oracle(update), @"UPDATE employees SET salary = salary * 1.1 WHERE dept = 3");

    let mut delete = DeleteStatement::new(TableRef::new("employees"));
    delete.orders.push(OrderExpr::desc(Expr::column("hired")));
    assert_snapshot!(oracle(delete), @"DELETE FROM employees");
}

#[test]
fn dml_ordering_with_limit() {
    let mut update = raise_salaries();
    update.orders.push(OrderExpr::asc(Expr::column("hired")));
    update.limit = Some(Limit { expr: Expr::int(5) });
    update.key = Some(Expr::column("id"));

    let err = oracle_err(update);
    assert_snapshot!(err, @r"
    [E0102] Error: UPDATE with a limit cannot be ordered in this context
    ↳ Hint: select the keys of the affected rows in a separate query
    ");
}

#[test]
fn dml_limit_through_key() {
    let mut update = raise_salaries();
    update.limit = Some(Limit { expr: Expr::int(5) });

    let err = oracle_err(update.clone());
    assert_eq!(err.inner[0].code.as_deref(), Some("E0103"));

    update.key = Some(Expr::column("id"));
    assert_snapshot!(oracle(update), @"UPDATE employees SET salary = salary * 1.1 WHERE id IN (SELECT id FROM employees WHERE dept = 3 AND ROWNUM <= 5)");
}

#[test]
fn dml_limit_through_key_keeps_disjunction_whole() {
    let mut delete = DeleteStatement::new(TableRef::new("employees"));
    delete.wheres.push(in_either_dept());
    delete.limit = Some(Limit { expr: Expr::int(5) });
    delete.key = Some(Expr::column("id"));

    let sql = oracle(delete);
    assert_snapshot!(sql, @"DELETE FROM employees WHERE id IN (SELECT id FROM employees WHERE (dept = 1 OR dept = 2) AND ROWNUM <= 5)");
    assert_parses(&sql);
}

#[test]
fn dml_grouping_through_key() {
    let mut delete = DeleteStatement::new(TableRef::new("orders"));
    delete.groups.push(Expr::column("customer"));
    delete
        .havings
        .push(Expr::function("COUNT", vec![Expr::star()]).gt(Expr::int(10)));
    delete.key = Some(Expr::column("customer"));

    assert_snapshot!(oracle(delete), @"DELETE FROM orders WHERE customer IN (SELECT customer FROM orders GROUP BY customer HAVING COUNT(*) > 10)");
}

#[test]
fn json_statement() {
    let stmt = Statement::Select(
        employees()
            .with_where(Expr::column("dept").eq(Expr::param("dept", Literal::Integer(3))))
            .with_limit(Expr::int(10)),
    );

    let text = json::from_statement(&stmt).unwrap();
    let parsed = json::to_statement(&text).unwrap();
    assert_eq!(parsed, stmt);

    let compiled = compile(&parsed, &oracle_opts()).unwrap();
    assert_snapshot!(compiled.sql, @"SELECT name FROM employees WHERE dept = :a1 AND ROWNUM <= 10");
    assert_eq!(compiled.params[0].value, Some(Literal::Integer(3)));

    let err = json::to_statement("{\"Select\": {}}").unwrap_err();
    assert!(err.to_string().contains("missing field `cores`"));
}

#[test]
fn signature_names_the_dialect() {
    let opts = oracle_opts().with_signature_comment(true);
    let sql = compile(&Statement::Select(employees()), &opts).unwrap().sql;
    assert!(sql.ends_with("(target: oracle)\n"));
}
