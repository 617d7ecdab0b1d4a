//! Default values for every tunable that may be omitted from the config file.

pub const DEFAULT_DB_PORT: u16 = 3306;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_DB_ACQUIRE_TIMEOUT_SECS: u64 = 5;

pub const DEFAULT_PROVIDER: &str = "openai";
pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com";
pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://127.0.0.1:11434";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MODEL_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_MODEL_RETRY_BACKOFF_MS: u64 = 500;
pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_DIALECT: &str = "MySQL";
pub const DEFAULT_MAX_ROWS: usize = 5;
pub const DEFAULT_SAMPLE_ROWS: usize = 3;
pub const DEFAULT_MAX_STEPS: usize = 10;
pub const DEFAULT_MAX_CORRECTIONS: usize = 3;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_SCHEMA_CACHE_TTL_SECS: u64 = 30;

pub const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60;
pub const DEFAULT_MAX_MESSAGES: usize = 200;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

pub const DEFAULT_BIND: &str = "0.0.0.0:8000";

pub const DEFAULT_EXTRA_INSTRUCTIONS: &str = "Think step-by-step. \
If a question is ambiguous or the query it needs might be unsafe, ask the user to clarify instead of guessing. \
Avoid selecting too many rows unless necessary. \
Format dates consistently as YYYY-MM-DD, and date-times as YYYY-MM-DDTHH:MM:SS.";

pub const DEFAULT_PROMPT_TEMPLATE: &str = r#"
You are an agent designed to interact with a {{dialect}} database.
Given an input question, create a syntactically correct {{dialect}} query to run, then look at the results of the query and return the answer.
Unless the user specifies a specific number of examples they wish to obtain, always limit your query to at most {{top_k}} results.
You can order the results by a relevant column to return the most interesting examples in the database.
Never query for all the columns from a specific table, only ask for the relevant columns given the question.
You MUST double check your query before executing it. If you get an error while executing a query, rewrite the query and try again.
DO NOT make any DML statements (INSERT, UPDATE, DELETE, DROP etc.) to the database.
To start you should ALWAYS look at the tables in the database to see what you can query. Do NOT skip this step.
Then you should query the schema of the most relevant tables.

{{extra_instructions}}

{{custom_instruction}}

{{tool_catalogue}}
"#;
