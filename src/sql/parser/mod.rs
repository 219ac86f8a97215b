use std::fmt::Display;

use sqlparser::{
    ast::{AlterTableOperation, ObjectName, Statement},
    dialect::{Dialect, PostgreSqlDialect},
    keywords::Keyword,
    parser::Parser,
    tokenizer::{Token, Tokenizer},
};

use crate::core::{ErrorKind, SQLError};

/// A parsed statement. `ALTER TABLE` keeps every comma-separated operation,
/// in the order written.
#[derive(Debug, Clone, PartialEq)]
pub enum SQLStatement {
    AlterTable {
        name: ObjectName,
        operations: Vec<AlterTableOperation>,
    },
    Other(Statement),
}

impl Display for SQLStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SQLStatement::AlterTable { name, operations } => {
                let operations = operations
                    .iter()
                    .map(|op| op.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "ALTER TABLE {} {}", name, operations)
            }
            SQLStatement::Other(stmt) => write!(f, "{}", stmt),
        }
    }
}

fn parse_error(e: impl Display) -> SQLError {
    SQLError::new(ErrorKind::ParseError, e.to_string())
}

/// Parse a SQL script into its statements, in source order
pub fn parse_sql(sql_text: &str) -> Result<Vec<SQLStatement>, SQLError> {
    let dialect = PostgreSqlDialect {};
    let tokens = Tokenizer::new(&dialect, sql_text)
        .tokenize()
        .map_err(parse_error)?;

    let mut statements = vec![];
    for chunk in tokens.split(|token| *token == Token::SemiColon) {
        if chunk.iter().all(|token| matches!(token, Token::Whitespace(_))) {
            continue;
        }

        if is_alter_table(chunk) {
            statements.push(parse_alter_table(&dialect, chunk)?);
        } else {
            let stmts = Parser::new(&dialect)
                .with_tokens(chunk.to_vec())
                .parse_statements()
                .map_err(parse_error)?;
            statements.extend(stmts.into_iter().map(SQLStatement::Other));
        }
    }

    Ok(statements)
}

fn is_alter_table(tokens: &[Token]) -> bool {
    let mut words = tokens
        .iter()
        .filter(|token| !matches!(token, Token::Whitespace(_)));
    matches!(
        (words.next(), words.next()),
        (Some(Token::Word(alter)), Some(Token::Word(table)))
            if alter.keyword == Keyword::ALTER && table.keyword == Keyword::TABLE
    )
}

/// Split at `separator` tokens that are not nested in parentheses or brackets.
fn split_top_level<'a>(tokens: &'a [Token], separator: &Token) -> Vec<&'a [Token]> {
    let mut segments = vec![];
    let mut depth = 0usize;
    let mut start = 0;
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::LParen | Token::LBracket => depth += 1,
            Token::RParen | Token::RBracket => depth = depth.saturating_sub(1),
            _ if depth == 0 && token == separator => {
                segments.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&tokens[start..]);
    segments
}

fn parse_single(dialect: &dyn Dialect, tokens: Vec<Token>) -> Result<Statement, SQLError> {
    let mut stmts = Parser::new(dialect)
        .with_tokens(tokens)
        .parse_statements()
        .map_err(parse_error)?;
    match stmts.len() {
        1 => Ok(stmts.remove(0)),
        n => Err(SQLError::new(
            ErrorKind::ParseError,
            format!("expected a single statement, found {}", n),
        )),
    }
}

/// `ALTER TABLE name op [, op ...]`. The first segment is parsed as written;
/// every following operation is parsed behind a rebuilt `ALTER TABLE name`.
fn parse_alter_table(dialect: &dyn Dialect, tokens: &[Token]) -> Result<SQLStatement, SQLError> {
    let mut segments = split_top_level(tokens, &Token::Comma).into_iter();
    let head = segments.next().unwrap_or_default();

    let (name, first) = match parse_single(dialect, head.to_vec())? {
        Statement::AlterTable { name, operation } => (name, operation),
        stmt => {
            return Err(SQLError::new(
                ErrorKind::ParseError,
                format!("expected ALTER TABLE, found: {}", stmt),
            ))
        }
    };

    let mut operations = vec![first];
    for segment in segments {
        let mut tokens = Tokenizer::new(dialect, &format!("ALTER TABLE {} ", name))
            .tokenize()
            .map_err(parse_error)?;
        tokens.extend_from_slice(segment);

        match parse_single(dialect, tokens)? {
            Statement::AlterTable { operation, .. } => operations.push(operation),
            stmt => {
                return Err(SQLError::new(
                    ErrorKind::ParseError,
                    format!("expected an ALTER TABLE operation, found: {}", stmt),
                ))
            }
        }
    }

    Ok(SQLStatement::AlterTable { name, operations })
}

/// Parse a bare, possibly qualified, table name such as `app."Users"`.
pub fn parse_object_name(text: &str) -> Result<ObjectName, SQLError> {
    let mut parser = Parser::new(&PostgreSqlDialect {})
        .try_with_sql(text)
        .map_err(parse_error)?;
    let name = parser.parse_object_name().map_err(parse_error)?;
    if parser.peek_token() != Token::EOF {
        return Err(SQLError::new(
            ErrorKind::ParseError,
            format!("invalid name: {}", text),
        ));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_statements() {
        let stmts = parse_sql(
            "CREATE TABLE t (a text DEFAULT 'x;y');
             ;
             -- trailing comment
             SELECT 1",
        )
        .unwrap();
        assert_eq!(stmts.len(), 2);
        assert!(matches!(stmts[1], SQLStatement::Other(Statement::Query(_))));
    }

    #[test]
    fn test_alter_table_operations() {
        let stmts = parse_sql(
            "ALTER TABLE ONLY app.t
                 ALTER COLUMN a TYPE numeric(10, 2),
                 ADD COLUMN b int[],
                 DROP COLUMN IF EXISTS c;",
        )
        .unwrap();
        assert_eq!(stmts.len(), 1);

        let SQLStatement::AlterTable { name, operations } = &stmts[0] else {
            panic!("expected ALTER TABLE, got {:?}", stmts[0]);
        };
        assert_eq!(name.to_string(), "app.t");
        assert_eq!(operations.len(), 3);
        assert!(matches!(
            operations[2],
            AlterTableOperation::DropColumn { if_exists: true, .. }
        ));
        assert_eq!(
            stmts[0].to_string(),
            "ALTER TABLE app.t ALTER COLUMN a SET DATA TYPE NUMERIC(10,2), ADD COLUMN b INT[], DROP COLUMN IF EXISTS c"
        );
    }

    #[test]
    fn test_alter_table_quoted_name() {
        let stmts = parse_sql("ALTER TABLE \"Odd\"\"Name\" ADD b int, ADD c int").unwrap();
        let SQLStatement::AlterTable { name, operations } = &stmts[0] else {
            panic!("expected ALTER TABLE");
        };
        assert_eq!(name.0[0].value, "Odd\"Name");
        assert_eq!(operations.len(), 2);
    }

    #[test]
    fn test_alter_table_errors() {
        let err = parse_sql("ALTER TABLE t ADD COLUMN b int,").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ParseError);

        let err = parse_sql("ALTER TABLE t ADD COLUMN b int c").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ParseError);
    }

    #[test]
    fn test_parse_object_name() {
        let name = parse_object_name("app.\"Users\"").unwrap();
        assert_eq!(name.0.len(), 2);
        assert_eq!(name.0[1].value, "Users");

        assert!(parse_object_name("users extra").is_err());
    }
}
