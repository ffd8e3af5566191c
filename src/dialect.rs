//! SQL dialect selection.
//!
//! The engine only needs dialects to drive reference extraction in the
//! scanner; the mapping hands back the matching sqlparser-rs dialect.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    BigQuery,
    Postgres,
    MySql,
    TSql,
    DuckDb,
    Snowflake,
    Redshift,
    Databricks,
    Generic,
}

impl Dialect {
    /// Lowercase name as it appears in persisted metadata and query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::BigQuery => "bigquery",
            Dialect::Postgres => "postgres",
            Dialect::MySql => "mysql",
            Dialect::TSql => "tsql",
            Dialect::DuckDb => "duckdb",
            Dialect::Snowflake => "snowflake",
            Dialect::Redshift => "redshift",
            Dialect::Databricks => "databricks",
            Dialect::Generic => "generic",
        }
    }

    /// The sqlparser-rs dialect used for reference extraction.
    pub fn parser(&self) -> Box<dyn sqlparser::dialect::Dialect> {
        use sqlparser::dialect::{
            BigQueryDialect, DatabricksDialect, DuckDbDialect, GenericDialect, MsSqlDialect,
            MySqlDialect, PostgreSqlDialect, RedshiftSqlDialect, SnowflakeDialect,
        };
        match self {
            Dialect::BigQuery => Box::new(BigQueryDialect {}),
            Dialect::Postgres => Box::new(PostgreSqlDialect {}),
            Dialect::MySql => Box::new(MySqlDialect {}),
            Dialect::TSql => Box::new(MsSqlDialect {}),
            Dialect::DuckDb => Box::new(DuckDbDialect {}),
            Dialect::Snowflake => Box::new(SnowflakeDialect {}),
            Dialect::Redshift => Box::new(RedshiftSqlDialect {}),
            Dialect::Databricks => Box::new(DatabricksDialect {}),
            Dialect::Generic => Box::new(GenericDialect {}),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bigquery" => Ok(Dialect::BigQuery),
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "mysql" => Ok(Dialect::MySql),
            "tsql" | "mssql" => Ok(Dialect::TSql),
            "duckdb" => Ok(Dialect::DuckDb),
            "snowflake" => Ok(Dialect::Snowflake),
            "redshift" => Ok(Dialect::Redshift),
            "databricks" => Ok(Dialect::Databricks),
            "generic" => Ok(Dialect::Generic),
            other => Err(format!("unknown dialect: '{}'", other)),
        }
    }
}
