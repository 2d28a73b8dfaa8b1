use std::collections::HashSet;
use std::sync::OnceLock;

/// Reserved words that must be quoted when used as identifiers.
///
/// This is the union of words reserved by the supported dialects, so some
/// identifiers get quoted in dialects where they would not need to be.
fn sql_keywords() -> &'static HashSet<&'static str> {
    static KEYWORDS: OnceLock<HashSet<&str>> = OnceLock::new();
    KEYWORDS.get_or_init(|| {
        HashSet::from_iter([
            "access", "add", "all", "alter", "and", "any", "as", "asc", "audit", "between",
            "by", "case", "char", "check", "cluster", "column", "comment", "compress",
            "connect", "create", "cross", "current", "date", "decimal", "default", "delete",
            "desc", "distinct", "drop", "else", "end", "except", "exclusive", "exists",
            "fetch", "file", "float", "for", "from", "full", "grant", "group", "having",
            "identified", "immediate", "in", "increment", "index", "initial", "inner",
            "insert", "integer", "intersect", "into", "is", "join", "left", "level", "like",
            "limit", "lock", "long", "maxextents", "minus", "mode", "modify", "natural",
            "noaudit", "nocompress", "not", "nowait", "null", "number", "of", "offline",
            "offset", "on", "online", "option", "or", "order", "outer", "pctfree", "prior",
            "public", "raw", "rename", "resource", "revoke", "right", "row", "rowid",
            "rownum", "rows", "select", "session", "set", "share", "size", "smallint",
            "start", "successful", "synonym", "sysdate", "table", "then", "to", "trigger",
            "uid", "union", "unique", "update", "user", "using", "validate", "values",
            "varchar", "varchar2", "view", "whenever", "when", "where", "with",
        ])
    })
}

pub(super) fn is_keyword(ident: &str) -> bool {
    sql_keywords().contains(ident.to_ascii_lowercase().as_str())
}
