//! Classification of SQL text into read, destructive and rejected statements.
//!
//! Statements are parsed with the MySQL dialect of `sqlparser`. MySQL
//! executable comments (`/*! ... */`) run their body on the server, so any
//! statement carrying one is rejected before parsing.

use sqlparser::ast::{SetExpr, Statement};
use sqlparser::dialect::MySqlDialect;
use sqlparser::keywords::Keyword;
use sqlparser::parser::Parser;
use sqlparser::tokenizer::{Token, Tokenizer, Whitespace};

/// Kind of an accepted read-only statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadKind {
    /// `SELECT`, `WITH ... SELECT`, `VALUES` and set operations.
    Query,
    Show,
    Describe,
    Explain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementClass {
    Read(ReadKind),
    /// Writes data, changes schema or privileges. Never executed.
    Destructive { keyword: String },
    /// Neither a plain read nor a recognised write.
    Rejected { reason: String },
}

const DESTRUCTIVE: &[&str] = &[
    "INSERT", "UPDATE", "DELETE", "REPLACE", "MERGE", "UPSERT", "CREATE", "DROP", "ALTER",
    "TRUNCATE", "RENAME", "GRANT", "REVOKE", "LOAD", "IMPORT",
];

/// Verbs that make an unparseable statement destructive wherever they appear.
const WRITE_VERBS: &[&str] = &["INSERT", "UPDATE", "DELETE"];

pub fn classify(sql: &str) -> StatementClass {
    let dialect = MySqlDialect {};
    let tokens = match Tokenizer::new(&dialect, sql).tokenize() {
        Ok(tokens) => tokens,
        Err(error) => return rejected(&format!("could not tokenize statement: {error}")),
    };
    if tokens.iter().any(is_executable_comment) {
        return rejected("MySQL executable comments (/*! ... */) are not allowed");
    }

    let words = unquoted_words(&tokens);
    let statements = match Parser::parse_sql(&dialect, sql) {
        Ok(statements) => statements,
        Err(error) => return classify_unparsed(&words, &error.to_string()),
    };

    match statements.as_slice() {
        [] => rejected("empty statement"),
        [statement] => classify_statement(statement, &tokens, &words),
        _ => rejected("multiple statements are not allowed"),
    }
}

fn classify_statement(statement: &Statement, tokens: &[Token], words: &[String]) -> StatementClass {
    match statement {
        Statement::Query(query) => match query.body.as_ref() {
            SetExpr::Select { .. }
            | SetExpr::Query { .. }
            | SetExpr::SetOperation { .. }
            | SetExpr::Values { .. }
            | SetExpr::Table { .. } => {
                if selects_into(tokens) {
                    rejected("SELECT ... INTO writes to a table, a variable or a server file")
                } else {
                    StatementClass::Read(ReadKind::Query)
                }
            }
            _ => destructive(statement),
        },
        Statement::ShowTables { .. }
        | Statement::ShowColumns { .. }
        | Statement::ShowCreate { .. }
        | Statement::ShowVariables { .. }
        | Statement::ShowVariable { .. }
        | Statement::ShowStatus { .. }
        | Statement::ShowFunctions { .. }
        | Statement::ShowCollation { .. } => StatementClass::Read(ReadKind::Show),
        Statement::ExplainTable { .. } => StatementClass::Read(ReadKind::Describe),
        Statement::Explain {
            statement: explained,
            ..
        } => match classify_statement(explained, tokens, words) {
            StatementClass::Read(_) => StatementClass::Read(ReadKind::Explain),
            other => other,
        },
        Statement::Insert { .. }
        | Statement::Update { .. }
        | Statement::Delete { .. }
        | Statement::Merge { .. }
        | Statement::Drop { .. }
        | Statement::AlterTable { .. }
        | Statement::Truncate { .. }
        | Statement::Grant { .. }
        | Statement::Revoke { .. }
        | Statement::CreateTable { .. }
        | Statement::CreateView { .. }
        | Statement::CreateIndex { .. }
        | Statement::CreateSchema { .. }
        | Statement::CreateDatabase { .. } => destructive(statement),
        _ => match words.first().map(String::as_str) {
            Some("SHOW") => StatementClass::Read(ReadKind::Show),
            Some(word) if DESTRUCTIVE.contains(&word) => StatementClass::Destructive {
                keyword: word.to_string(),
            },
            Some(word) => rejected(&format!("{word} statements are not read-only")),
            None => rejected("empty statement"),
        },
    }
}

/// Statements the parser does not understand are still destructive when
/// they lead with, or contain, a write verb.
fn classify_unparsed(words: &[String], error: &str) -> StatementClass {
    if let Some(first) = words.first().filter(|word| DESTRUCTIVE.contains(&word.as_str())) {
        return StatementClass::Destructive {
            keyword: first.clone(),
        };
    }
    if let Some(verb) = words.iter().find(|word| WRITE_VERBS.contains(&word.as_str())) {
        return StatementClass::Destructive {
            keyword: verb.clone(),
        };
    }
    rejected(&format!("could not parse statement: {error}"))
}

/// Keyword reported for a destructive statement, e.g. `DELETE` or `REPLACE`.
fn destructive(statement: &Statement) -> StatementClass {
    let rendered = statement.to_string();
    let keyword = rendered
        .split_whitespace()
        .find(|word| DESTRUCTIVE.contains(&word.to_ascii_uppercase().as_str()))
        .unwrap_or("WRITE")
        .to_ascii_uppercase();
    StatementClass::Destructive { keyword }
}

fn selects_into(tokens: &[Token]) -> bool {
    tokens
        .iter()
        .any(|token| matches!(token, Token::Word(word) if word.keyword == Keyword::INTO))
}

fn is_executable_comment(token: &Token) -> bool {
    matches!(
        token,
        Token::Whitespace(Whitespace::MultiLineComment(body)) if body.starts_with('!')
    )
}

/// Unquoted words in upper case, in statement order.
fn unquoted_words(tokens: &[Token]) -> Vec<String> {
    tokens
        .iter()
        .filter_map(|token| match token {
            Token::Word(word) if word.quote_style.is_none() => {
                Some(word.value.to_ascii_uppercase())
            }
            _ => None,
        })
        .collect()
}

fn rejected(reason: &str) -> StatementClass {
    StatementClass::Rejected {
        reason: reason.to_string(),
    }
}
