use std::io::{BufRead, Write};

use crate::{
    core::SQLError,
    sql::{
        ddl::{normalize_ident, relation_name},
        parser::parse_object_name,
        Session,
    },
};

enum Command<'a> {
    /// `\dn`
    ListSchemas,
    /// `\dt [schema]`
    ListTables(Option<&'a str>),
    /// `\d table`
    Describe(&'a str),
    /// `\q`
    Quit,
    Sql(&'a str),
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        let mut words = line.split_whitespace();
        match words.next() {
            Some("\\dn") => Command::ListSchemas,
            Some("\\dt") => Command::ListTables(words.next()),
            Some("\\d") => match words.next() {
                Some(name) => Command::Describe(name),
                None => Command::ListTables(None),
            },
            Some("\\q") => Command::Quit,
            _ => Command::Sql(line),
        }
    }
}

pub struct CliApp<I: BufRead, O: Write> {
    session: Session,

    input: I,
    output: O,
}

impl<I: BufRead, O: Write> CliApp<I, O> {
    pub fn new(session: Session, input: I, output: O) -> Self {
        Self {
            session,
            input,
            output,
        }
    }

    /// Read lines until EOF or `\q`. SQL is buffered until a line ends with
    /// `;`; meta commands are only recognized at the start of a statement.
    pub fn run(&mut self) -> Result<(), SQLError> {
        self.bootstrap()?;

        let mut line_buf = String::new();
        let mut sql_buf = String::new();
        loop {
            self.prompt(sql_buf.is_empty())?;
            line_buf.clear();
            if self.input.read_line(&mut line_buf)? == 0 {
                break;
            }

            if sql_buf.is_empty() {
                match Command::parse(&line_buf) {
                    Command::Quit => break,
                    Command::Sql("") => continue,
                    Command::Sql(_) => {}
                    command => {
                        let result = self.handle_command(command);
                        self.print(&result)?;
                        self.print("\n")?;
                        continue;
                    }
                }
            }

            sql_buf.push_str(&line_buf);
            if !line_buf.trim_end().ends_with(';') {
                continue;
            }

            let result = self.handle_command(Command::Sql(&sql_buf));
            sql_buf.clear();
            self.print(&result)?;
            self.print("\n")?;
        }

        // A final statement without its `;`.
        if !sql_buf.trim().is_empty() {
            let result = self.handle_command(Command::Sql(&sql_buf));
            self.print(&result)?;
            self.print("\n")?;
        }

        Ok(())
    }

    fn bootstrap(&mut self) -> Result<(), SQLError> {
        let welcome = "Welcome to leicat!\n";
        self.print(welcome)?;
        Ok(())
    }

    fn prompt(&mut self, new_statement: bool) -> Result<(), SQLError> {
        let prompt: &[u8] = if new_statement { b"ddl=# " } else { b"ddl-# " };
        self.output.write_all(prompt)?;
        self.output.flush()?;
        Ok(())
    }

    fn handle_command(&mut self, command: Command<'_>) -> String {
        let result = match command {
            Command::Sql(sql) => self
                .session
                .execute(sql)
                .map(|applied| format!("OK {}", applied)),
            Command::ListSchemas => Ok(self.session.catalog().list_schemas().join("\n")),
            Command::ListTables(schema) => self.list_tables(schema),
            Command::Describe(name) => self.describe(name),
            Command::Quit => Ok(String::new()),
        };

        result.unwrap_or_else(|e| e.to_string())
    }

    fn list_tables(&self, schema: Option<&str>) -> Result<String, SQLError> {
        let catalog = self.session.catalog();
        let schema = match schema {
            Some(text) => match parse_object_name(text)?.0.as_slice() {
                [ident] => normalize_ident(ident),
                _ => return Err(SQLError::schema_not_found(text)),
            },
            None => catalog.default_schema.clone(),
        };

        Ok(catalog.list_tables(&schema)?.join("\n"))
    }

    /// Column listing with types shown by their `pg_catalog` names.
    fn describe(&self, name: &str) -> Result<String, SQLError> {
        let rel = relation_name(&parse_object_name(name)?)?;
        let table = self.session.catalog().get_table(&rel)?;

        let mut lines = vec![format!("Table \"{}\"", table.rel)];
        for col in &table.columns {
            let mut line = format!("  {} {}", col.name, col.data_type.canonical_name());
            for _ in 0..col.data_type.array_dims {
                line.push_str("[]");
            }
            if col.not_null {
                line.push_str(" NOT NULL");
            }
            lines.push(line);
        }

        Ok(lines.join("\n"))
    }

    fn print(&mut self, string: &str) -> Result<(), SQLError> {
        self.output.write_all(string.as_bytes())?;
        self.output.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::CliApp;
    use crate::{catalog::Catalog, sql::Session};

    fn run(script: &str) -> String {
        let mut output = vec![];
        let mut app = CliApp::new(
            Session::new(Catalog::new()),
            Cursor::new(script.as_bytes()),
            &mut output,
        );
        app.run().unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_cli_session() {
        let output = run("CREATE TABLE users (id int NOT NULL, name text, tags varchar[]);\n\
             \\dt\n\
             \\d users\n\
             \\dn\n");

        assert!(output.starts_with("Welcome to leicat!\n"));
        assert!(output.contains("OK 1\n"));
        assert!(output.contains("ddl=# users\n"));
        assert!(output.contains(
            "Table \"public.users\"\n  id int4 NOT NULL\n  name text\n  tags varchar[]\n"
        ));
        assert!(output.contains("ddl=# public\n"));
    }

    #[test]
    fn test_cli_statement_over_several_lines() {
        let output = run("CREATE TABLE t (\n\
             a int\n\
             );\n\
             \\d T\n\
             \\dt PUBLIC\n");

        assert!(!output.contains("Parse Error"));
        assert!(output.contains("ddl-# ddl-# OK 1\n"));
        assert!(output.contains("Table \"public.t\"\n  a int4\n"));
        assert!(output.contains("ddl=# t\n"));
    }

    #[test]
    fn test_cli_final_statement_without_semicolon() {
        let output = run("CREATE TABLE t (a int)");
        assert!(output.contains("OK 1\n"));
    }

    #[test]
    fn test_cli_reports_errors_and_continues() {
        let output = run("DROP TABLE missing;\n\
             CREATE TABLE t (a int);\n\
             \\d missing\n\
             \\q\n\
             CREATE TABLE never (a int);\n");

        assert!(output.contains("Not Found: relation \"missing\" does not exist\n"));
        assert_eq!(output.matches("OK 1").count(), 1);
        assert_eq!(output.matches("relation \"missing\"").count(), 2);
    }
}
