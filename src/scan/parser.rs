//! SQL object extraction.
//!
//! Each scanned file is expected to define one object (`CREATE TABLE` or
//! `CREATE VIEW`). The AST pass pulls out the created name and every table
//! referenced in the body, excluding names bound by the statement's own
//! CTEs. Files that the dialect parser rejects fall back to a regex pass so
//! a single malformed file never sinks a scan.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use sqlparser::ast::{
    Cte, Expr, ObjectName, Query, Select, SetExpr, Statement, TableFactor, TableWithJoins,
};
use sqlparser::parser::Parser;

use crate::dialect::Dialect;

/// One object definition extracted from a SQL file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlObject {
    /// Created name as written, dot-joined (`project.dataset.table`).
    pub name: String,
    /// "table", "view", or "unknown" when only the fallback matched.
    pub source_type: String,
    /// Referenced table names, deduplicated, CTE names excluded.
    pub dependencies: Vec<String>,
}

static CREATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)create\s+(?:or\s+replace\s+)?(?:materialized\s+)?(table|view)\s+(?:if\s+not\s+exists\s+)?[`"\[]?([\w.$-]+)[`"\]]?"#,
    )
    .expect("create regex")
});

static REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:from|join)\s+[`"\[]?([\w.$-]+)[`"\]]?"#).expect("reference regex")
});

static CTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:\bwith\s+|,\s*)([\w$-]+)\s+as\s*\("#).expect("cte regex")
});

/// Extract the object defined by `sql`, or `None` when the file creates
/// nothing recognizable.
pub fn extract_object(sql: &str, dialect: Dialect) -> Option<SqlObject> {
    match Parser::parse_sql(&*dialect.parser(), sql) {
        Ok(statements) => statements.iter().find_map(object_from_statement),
        Err(_) => extract_with_regex(sql),
    }
}

fn object_from_statement(statement: &Statement) -> Option<SqlObject> {
    match statement {
        Statement::CreateTable(create) => {
            let mut collector = ReferenceCollector::default();
            if let Some(query) = &create.query {
                collector.visit_query(query);
            }
            Some(SqlObject {
                name: object_name(&create.name),
                source_type: "table".to_string(),
                dependencies: collector.finish(),
            })
        }
        Statement::CreateView { name, query, .. } => {
            let mut collector = ReferenceCollector::default();
            collector.visit_query(query);
            Some(SqlObject {
                name: object_name(name),
                source_type: "view".to_string(),
                dependencies: collector.finish(),
            })
        }
        _ => None,
    }
}

fn object_name(name: &ObjectName) -> String {
    name.0
        .iter()
        .map(|ident| ident.value.clone())
        .collect::<Vec<_>>()
        .join(".")
}

/// Walks a query tree collecting referenced table names, tracking CTE
/// bindings so they are excluded from the result.
#[derive(Default)]
struct ReferenceCollector {
    references: Vec<String>,
    seen: HashSet<String>,
    cte_names: HashSet<String>,
}

impl ReferenceCollector {
    fn finish(self) -> Vec<String> {
        let cte_names = self.cte_names;
        self.references
            .into_iter()
            .filter(|name| {
                let last = name.rsplit('.').next().unwrap_or(name);
                !cte_names.contains(&last.to_lowercase())
            })
            .collect()
    }

    fn record(&mut self, name: &ObjectName) {
        let joined = object_name(name);
        if self.seen.insert(joined.clone()) {
            self.references.push(joined);
        }
    }

    fn visit_query(&mut self, query: &Query) {
        if let Some(with) = &query.with {
            for cte in &with.cte_tables {
                self.visit_cte(cte);
            }
        }
        self.visit_set_expr(&query.body);
    }

    fn visit_cte(&mut self, cte: &Cte) {
        self.cte_names.insert(cte.alias.name.value.to_lowercase());
        self.visit_query(&cte.query);
    }

    fn visit_set_expr(&mut self, body: &SetExpr) {
        match body {
            SetExpr::Select(select) => self.visit_select(select),
            SetExpr::Query(query) => self.visit_query(query),
            SetExpr::SetOperation { left, right, .. } => {
                self.visit_set_expr(left);
                self.visit_set_expr(right);
            }
            _ => {}
        }
    }

    fn visit_select(&mut self, select: &Select) {
        for table in &select.from {
            self.visit_table_with_joins(table);
        }
        if let Some(selection) = &select.selection {
            self.visit_expr(selection);
        }
    }

    fn visit_table_with_joins(&mut self, table: &TableWithJoins) {
        self.visit_table_factor(&table.relation);
        for join in &table.joins {
            self.visit_table_factor(&join.relation);
        }
    }

    fn visit_table_factor(&mut self, factor: &TableFactor) {
        match factor {
            TableFactor::Table { name, .. } => self.record(name),
            TableFactor::Derived { subquery, .. } => self.visit_query(subquery),
            TableFactor::NestedJoin {
                table_with_joins, ..
            } => self.visit_table_with_joins(table_with_joins),
            _ => {}
        }
    }

    // Only subquery-bearing expressions matter here.
    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Subquery(query) | Expr::Exists { subquery: query, .. } => {
                self.visit_query(query)
            }
            Expr::InSubquery { subquery, expr, .. } => {
                self.visit_expr(expr);
                self.visit_query(subquery);
            }
            Expr::BinaryOp { left, right, .. } => {
                self.visit_expr(left);
                self.visit_expr(right);
            }
            Expr::UnaryOp { expr, .. } | Expr::Nested(expr) => self.visit_expr(expr),
            _ => {}
        }
    }
}

/// Last-resort extraction for files the AST parser rejects.
fn extract_with_regex(sql: &str) -> Option<SqlObject> {
    let create = CREATE_RE.captures(sql)?;
    let source_type = create.get(1).map_or("unknown", |m| m.as_str()).to_lowercase();
    let name = create.get(2)?.as_str().to_string();

    let cte_names: HashSet<String> = CTE_RE
        .captures_iter(sql)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_lowercase())
        .collect();

    let mut seen = HashSet::new();
    let dependencies = REF_RE
        .captures_iter(sql)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|dep| {
            let last = dep.rsplit('.').next().unwrap_or(dep);
            dep != &name && !cte_names.contains(&last.to_lowercase())
        })
        .filter(|dep| seen.insert(dep.clone()))
        .collect();

    Some(SqlObject {
        name,
        source_type,
        dependencies,
    })
}
