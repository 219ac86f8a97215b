use log::{debug, info};

use super::{ddl::lower_statement, parser::parse_sql};
use crate::{catalog::Catalog, core::SQLError};

/// Feeds SQL scripts into a catalog, one statement at a time.
pub struct Session {
    catalog: Catalog,
}

impl Session {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn into_catalog(self) -> Catalog {
        self.catalog
    }

    /// Apply every DDL statement of `sql_text` to the catalog and return how
    /// many were applied. Execution stops at the first error; statements
    /// before it stay applied.
    pub fn execute(&mut self, sql_text: &str) -> Result<usize, SQLError> {
        info!("Executing SQL: {}", sql_text.trim());

        let statements = parse_sql(sql_text)?;

        let mut applied = 0;
        for statement in &statements {
            match lower_statement(statement)? {
                Some(ddl) => {
                    self.catalog.update(&ddl)?;
                    applied += 1;
                }
                None => debug!("Skipping non-DDL statement: {}", statement),
            }
        }

        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::defs::RelationName, core::ErrorKind};

    #[test]
    fn test_execute_script() {
        let mut session = Session::new(Catalog::new());
        let applied = session
            .execute(
                "CREATE TABLE users (id int, name text);
                 SELECT * FROM users;
                 ALTER TABLE users ADD COLUMN email text;
                 ALTER TABLE users DROP COLUMN name;",
            )
            .unwrap();
        assert_eq!(applied, 3);

        let table = session
            .catalog()
            .get_table(&RelationName::new(None, "users"))
            .unwrap();
        let columns = table
            .columns
            .iter()
            .map(|col| format!("{}:{}", col.name, col.data_type))
            .collect::<Vec<_>>();
        assert_eq!(columns, vec!["id:int", "email:text"]);
    }

    #[test]
    fn test_execute_stops_at_first_error() {
        let mut session = Session::new(Catalog::new());
        let err = session
            .execute(
                "CREATE TABLE a (id int);
                 CREATE TABLE a (id int);
                 CREATE TABLE b (id int);",
            )
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::AlreadyExists);
        assert_eq!(
            session.into_catalog().list_tables("public").unwrap(),
            vec!["a"]
        );
    }

    #[test]
    fn test_parse_error() {
        let mut session = Session::new(Catalog::new());
        let err = session.execute("CREATE TABLE (").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ParseError);
    }
}
