use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ir::Literal;

/// How bound parameters appear in generated SQL.
#[derive(
    Debug,
    PartialEq,
    Eq,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::Display,
    strum::EnumString,
    strum::VariantNames,
)]
#[strum(serialize_all = "snake_case")]
pub enum ParamStyle {
    /// Values are written into the SQL as literals.
    Inline,
    /// `?`
    QuestionMark,
    /// `:a1`, `:a2`, ...
    Colon,
    /// `$1`, `$2`, ...
    Dollar,
}

/// A placeholder written into the SQL, in emission order.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BoundParam {
    pub marker: String,
    pub name: String,
    pub value: Option<Literal>,
}

/// Output of a compilation.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CompiledSql {
    pub sql: String,
    /// Empty when parameters are inlined.
    pub params: Vec<BoundParam>,
}

/// Append-only sink for emitted SQL.
#[derive(Debug)]
pub struct Collector {
    sql: String,
    style: ParamStyle,
    params: Vec<BoundParam>,
}

impl Collector {
    pub fn new(style: ParamStyle) -> Self {
        Collector {
            sql: String::new(),
            style,
            params: Vec::new(),
        }
    }

    pub fn style(&self) -> ParamStyle {
        self.style
    }

    pub fn push(&mut self, text: &str) -> &mut Self {
        self.sql.push_str(text);
        self
    }

    pub fn push_char(&mut self, c: char) -> &mut Self {
        self.sql.push(c);
        self
    }

    /// Writes a placeholder for a parameter and records it.
    ///
    /// Callers handle [ParamStyle::Inline] themselves, since inlining needs
    /// literal rendering rules of the dialect.
    pub fn add_bind(&mut self, name: &str, value: Option<&Literal>) -> &mut Self {
        let position = self.params.len() + 1;
        let marker = match self.style {
            ParamStyle::Inline | ParamStyle::QuestionMark => "?".to_string(),
            ParamStyle::Colon => format!(":a{position}"),
            ParamStyle::Dollar => format!("${position}"),
        };
        self.sql.push_str(&marker);
        self.params.push(BoundParam {
            marker,
            name: name.to_string(),
            value: value.cloned(),
        });
        self
    }

    pub fn finish(self) -> CompiledSql {
        CompiledSql {
            sql: self.sql,
            params: self.params,
        }
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn markers_follow_emission_order() {
        let mut c = Collector::new(ParamStyle::Colon);
        c.push("WHERE a = ")
            .add_bind("a", Some(&Literal::Integer(1)))
            .push(" AND b = ")
            .add_bind("b", None);

        let compiled = c.finish();
        assert_snapshot!(compiled.sql, @"WHERE a = :a1 AND b = :a2");
        let markers: Vec<_> = compiled.params.iter().map(|p| p.marker.as_str()).collect();
        assert_eq!(markers, vec![":a1", ":a2"]);
        assert_eq!(compiled.params[0].value, Some(Literal::Integer(1)));
    }

    #[test]
    fn dollar_and_question_mark() {
        let mut c = Collector::new(ParamStyle::Dollar);
        c.add_bind("x", None).push(", ").add_bind("y", None);
        assert_snapshot!(c.finish().sql, @"$1, $2");

        let mut c = Collector::new(ParamStyle::QuestionMark);
        c.add_bind("x", None).push(", ").add_bind("y", None);
        let compiled = c.finish();
        assert_snapshot!(compiled.sql, @"?, ?");
        assert_eq!(compiled.params.len(), 2);
    }

    #[test]
    fn param_style_names() {
        use std::str::FromStr;
        use strum::VariantNames;

        assert_eq!(
            ParamStyle::VARIANTS,
            &["inline", "question_mark", "colon", "dollar"]
        );
        assert_eq!(ParamStyle::from_str("colon").unwrap(), ParamStyle::Colon);
        assert_eq!(ParamStyle::Dollar.to_string(), "dollar");
    }
}
