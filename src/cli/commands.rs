//! CLI command implementations
//!
//! One-shot commands (`collections`, `records`, `show`, `set`) open a fresh
//! browsing session, walk it to the requested view and print that view.
//! `browse` keeps one session open and drives it from stdin.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::navigator::{
    CollectionNavigator, Location, NavigatorError, NavigatorResult, View, ViewRecorder,
};
use crate::observability::{init_logging, Event};
use crate::schema::{CollectionSchema, SchemaError, SchemaLoader};
use crate::store::{FileStore, Store};

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_request, read_requests, write_error, write_response};

/// One operator action in a `browse` session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Select the `index`-th row of the current view
    Select { index: usize },
    ToggleEdit,
    /// Submit raw text for the `field`-th field of the current record
    Submit { field: usize, value: String },
    Back,
    /// Re-render the current view
    Show,
    Dismiss,
}

/// What a view response carries.
#[derive(Debug, Serialize)]
struct Screen {
    location: Location,
    edit_mode: bool,
    #[serde(flatten)]
    view: View,
}

/// Main CLI entry point
///
/// Parses arguments, loads configuration, installs logging and dispatches.
/// Failures are reported as an error line on stdout and returned.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = Config::resolve(&cli.config, cli.data_dir.as_ref()).and_then(|config| {
        init_logging(config.log_filter.as_deref());
        info!(
            event = Event::ConfigLoaded.as_str(),
            data_dir = %config.data_dir,
            "config loaded"
        );
        run_command(cli.command, &config, &mut out)
    });

    if let Err(e) = &result {
        write_error(&mut out, e.code_str(), e.message())?;
    }
    result
}

/// Run the appropriate command
pub fn run_command(cmd: Command, config: &Config, out: &mut impl Write) -> CliResult<()> {
    match cmd {
        Command::Init => init(config, out),
        Command::Define { schema } => define(config, &schema, out),
        Command::Insert { collection } => {
            let document = read_request()?;
            insert(config, &collection, document, out)
        }
        Command::Collections => collections(config, out),
        Command::Records { collection } => records(config, &collection, out),
        Command::Show { collection, index } => show(config, &collection, index, out),
        Command::Set {
            collection,
            index,
            field,
            value,
        } => set(config, &collection, index, &field, &value, out),
        Command::Browse => {
            let mut navigator = open_navigator(config)?;
            let stdin = io::stdin();
            browse_session(&mut navigator, stdin.lock(), out)
        }
    }
}

/// Initialize a new data directory
pub fn init(config: &Config, out: &mut impl Write) -> CliResult<()> {
    let data_dir = config.data_path();

    if is_initialized(data_dir) {
        return Err(CliError::already_initialized());
    }

    let schema_dir = SchemaLoader::new(data_dir).schema_dir().to_path_buf();
    fs::create_dir_all(&schema_dir).map_err(|e| {
        CliError::config_error(format!("Failed to create directory {:?}: {}", schema_dir, e))
    })?;
    FileStore::open(data_dir)?;

    write_response(out, json!({"initialized": true, "data_dir": config.data_dir}))
}

/// Define a collection from a schema file
pub fn define(config: &Config, schema_path: &Path, out: &mut impl Write) -> CliResult<()> {
    let content = fs::read_to_string(schema_path).map_err(|e| {
        CliError::io_error(format!("Failed to read schema {:?}: {}", schema_path, e))
    })?;
    let schema: CollectionSchema = serde_json::from_str(&content)
        .map_err(|e| SchemaError::malformed_schema(schema_path.display().to_string(), e.to_string()))?;

    let name = schema.name.clone();
    let fields = schema.fields.len();
    open_store(config)?.define_collection(schema)?;

    write_response(out, json!({"defined": name, "fields": fields}))
}

/// Insert one document
pub fn insert(
    config: &Config,
    collection: &str,
    document: Value,
    out: &mut impl Write,
) -> CliResult<()> {
    let Value::Object(document) = document else {
        return Err(CliError::invalid_request("Document must be a JSON object"));
    };

    let id = open_store(config)?.insert(collection, document)?;
    write_response(out, json!({"id": id}))
}

/// Print the collections view
pub fn collections(config: &Config, out: &mut impl Write) -> CliResult<()> {
    let navigator = open_navigator(config)?;
    write_response(out, screen(&navigator)?)
}

/// Print the records view of one collection
pub fn records(config: &Config, collection: &str, out: &mut impl Write) -> CliResult<()> {
    let mut navigator = open_navigator(config)?;
    open_collection(&mut navigator, collection)?;
    write_response(out, screen(&navigator)?)
}

/// Print the fields view of one record
pub fn show(config: &Config, collection: &str, index: usize, out: &mut impl Write) -> CliResult<()> {
    let mut navigator = open_navigator(config)?;
    open_record(&mut navigator, collection, index)?;
    write_response(out, screen(&navigator)?)
}

/// Edit one field and print the updated fields view
pub fn set(
    config: &Config,
    collection: &str,
    index: usize,
    field: &str,
    value: &str,
    out: &mut impl Write,
) -> CliResult<()> {
    let mut navigator = open_navigator(config)?;
    open_record(&mut navigator, collection, index)?;

    let field_index = navigator
        .registry()
        .collection(collection)
        .and_then(|c| c.field_descriptors.iter().position(|f| f.name == field))
        .ok_or_else(|| {
            CliError::invalid_request(format!("Collection '{}' has no field '{}'", collection, field))
        })?;

    navigator.toggle_edit_mode()?;
    navigator.submit_edit(field_index, value)?;
    write_response(out, screen(&navigator)?)
}

/// Drives `navigator` with one JSON action per input line.
///
/// Every action answers with exactly one line: the new view, or an error.
/// Rejected actions leave the session open. The session ends on a
/// `dismiss` action or at end of input.
pub fn browse_session<S: Store>(
    navigator: &mut CollectionNavigator<S>,
    input: impl BufRead,
    out: &mut impl Write,
) -> CliResult<()> {
    write_response(out, screen(navigator)?)?;

    for request in read_requests(input) {
        let action = match request
            .and_then(|value| serde_json::from_value::<Action>(value).map_err(CliError::from))
        {
            Ok(action) => action,
            Err(e) => {
                write_error(out, e.code_str(), e.message())?;
                continue;
            }
        };
        debug!(?action, "browse action");

        if action == Action::Dismiss {
            navigator.dismiss()?;
            return write_response(out, json!({"dismissed": true}));
        }

        match apply_action(navigator, &action) {
            Ok(()) => write_response(out, screen(navigator)?)?,
            Err(e) => {
                let fatal = e.is_fatal();
                let e = CliError::from(e);
                write_error(out, e.code_str(), e.message())?;
                if fatal {
                    return Err(e);
                }
            }
        }
    }

    if !navigator.is_dismissed() {
        navigator.dismiss()?;
    }
    Ok(())
}

fn apply_action<S: Store>(
    navigator: &mut CollectionNavigator<S>,
    action: &Action,
) -> NavigatorResult<()> {
    match action {
        Action::Select { index } => match navigator.location() {
            Location::Collections => navigator.select_collection(*index),
            Location::Records { .. } => navigator.select_record(*index),
            Location::Fields { .. } => navigator.select_field(*index),
        },
        Action::ToggleEdit => navigator.toggle_edit_mode().map(|_| ()),
        Action::Submit { field, value } => navigator.submit_edit(*field, value),
        Action::Back => navigator.back(),
        Action::Show => Ok(()),
        Action::Dismiss => navigator.dismiss(),
    }
}

fn screen<S: Store>(navigator: &CollectionNavigator<S>) -> CliResult<Value> {
    let mut recorder = ViewRecorder::new();
    navigator.render(&mut recorder)?;
    let view = recorder
        .take()
        .ok_or_else(|| CliError::io_error("Nothing was rendered"))?;

    Ok(serde_json::to_value(Screen {
        location: navigator.location(),
        edit_mode: navigator.edit_mode(),
        view,
    })?)
}

fn open_collection<S: Store>(
    navigator: &mut CollectionNavigator<S>,
    collection: &str,
) -> CliResult<()> {
    let index = navigator
        .registry()
        .list_collections()
        .iter()
        .position(|c| c.name == collection)
        .ok_or_else(|| SchemaError::unknown_collection(collection))?;
    navigator.select_collection(index)?;
    Ok(())
}

fn open_record<S: Store>(
    navigator: &mut CollectionNavigator<S>,
    collection: &str,
    index: usize,
) -> CliResult<()> {
    open_collection(navigator, collection)?;
    navigator.select_record(index)?;

    // Selecting in an empty collection leaves the records view in place.
    if !matches!(navigator.location(), Location::Fields { .. }) {
        return Err(NavigatorError::IndexOutOfRange { index, len: 0 }.into());
    }
    Ok(())
}

fn open_store(config: &Config) -> CliResult<FileStore> {
    let data_dir = config.data_path();
    if !is_initialized(data_dir) {
        return Err(CliError::not_initialized());
    }
    Ok(FileStore::open(data_dir)?)
}

fn open_navigator(config: &Config) -> CliResult<CollectionNavigator<FileStore>> {
    Ok(CollectionNavigator::open(open_store(config)?)?)
}

fn is_initialized(data_dir: &Path) -> bool {
    SchemaLoader::new(data_dir).schema_dir().is_dir()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().join("data").to_string_lossy().into_owned(),
            log_filter: None,
        }
    }

    fn lines(out: Vec<u8>) -> Vec<Value> {
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    fn seeded(temp_dir: &TempDir) -> Config {
        let config = config(temp_dir);
        let mut out = Vec::new();
        init(&config, &mut out).unwrap();

        let schema_path = temp_dir.path().join("person.json");
        fs::write(
            &schema_path,
            r#"{"name": "Person", "fields": [
                {"name": "name", "type": "string"},
                {"name": "age", "type": "int"}
            ]}"#,
        )
        .unwrap();
        define(&config, &schema_path, &mut out).unwrap();
        insert(&config, "Person", json!({"name": "Alice", "age": 30}), &mut out).unwrap();
        config
    }

    #[test]
    fn test_init_twice_fails() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(&temp_dir);

        init(&config, &mut Vec::new()).unwrap();
        let err = init(&config, &mut Vec::new()).unwrap_err();
        assert_eq!(err.code_str(), "SCOPE_CLI_ALREADY_INITIALIZED");
    }

    #[test]
    fn test_commands_require_init() {
        let temp_dir = TempDir::new().unwrap();
        let err = collections(&config(&temp_dir), &mut Vec::new()).unwrap_err();
        assert_eq!(err.code_str(), "SCOPE_CLI_NOT_INITIALIZED");
    }

    #[test]
    fn test_set_then_show() {
        let temp_dir = TempDir::new().unwrap();
        let config = seeded(&temp_dir);

        set(&config, "Person", 0, "age", "31", &mut Vec::new()).unwrap();

        let mut out = Vec::new();
        show(&config, "Person", 0, &mut out).unwrap();
        let response = &lines(out)[0];
        assert_eq!(response["status"], "ok");
        assert_eq!(response["data"]["view"], "fields");
        assert_eq!(response["data"]["rows"][1]["display"], "31");
    }

    #[test]
    fn test_set_rejects_bad_int() {
        let temp_dir = TempDir::new().unwrap();
        let config = seeded(&temp_dir);

        let err = set(&config, "Person", 0, "age", "thirty", &mut Vec::new()).unwrap_err();
        assert_eq!(err.code_str(), "SCOPE_INVALID_INT");
    }

    #[test]
    fn test_set_unknown_field() {
        let temp_dir = TempDir::new().unwrap();
        let config = seeded(&temp_dir);

        let err = set(&config, "Person", 0, "height", "2", &mut Vec::new()).unwrap_err();
        assert_eq!(err.code_str(), "SCOPE_CLI_INVALID_REQUEST");
    }

    #[test]
    fn test_insert_requires_object() {
        let temp_dir = TempDir::new().unwrap();
        let config = seeded(&temp_dir);

        let err = insert(&config, "Person", json!([1, 2]), &mut Vec::new()).unwrap_err();
        assert_eq!(err.code_str(), "SCOPE_CLI_INVALID_REQUEST");
    }

    #[test]
    fn test_records_unknown_collection() {
        let temp_dir = TempDir::new().unwrap();
        let config = seeded(&temp_dir);

        let err = records(&config, "Ghost", &mut Vec::new()).unwrap_err();
        assert_eq!(err.code_str(), "SCOPE_UNKNOWN_COLLECTION");
    }

    #[test]
    fn test_browse_session_lines() {
        let temp_dir = TempDir::new().unwrap();
        let config = seeded(&temp_dir);
        let mut navigator = open_navigator(&config).unwrap();

        let input = Cursor::new(
            [
                r#"{"action": "select", "index": 0}"#,
                r#"{"action": "select", "index": 0}"#,
                r#"{"action": "toggle_edit"}"#,
                r#"{"action": "submit", "field": 1, "value": "abc"}"#,
                r#"{"action": "fly"}"#,
                r#"{"action": "dismiss"}"#,
            ]
            .join("\n"),
        );
        let mut out = Vec::new();
        browse_session(&mut navigator, input, &mut out).unwrap();

        let responses = lines(out);
        assert_eq!(responses.len(), 7);
        assert_eq!(responses[0]["data"]["view"], "collections");
        assert_eq!(responses[1]["data"]["view"], "records");
        assert_eq!(responses[2]["data"]["location"]["frame"], "fields");
        assert_eq!(responses[3]["data"]["edit_mode"], true);
        assert_eq!(responses[4]["code"], "SCOPE_INVALID_INT");
        assert_eq!(responses[5]["code"], "SCOPE_CLI_INVALID_REQUEST");
        assert_eq!(responses[6]["data"]["dismissed"], true);
        assert!(navigator.is_dismissed());
    }
}
