use crate::error::{Error, Result};
use crate::models::Todo;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;
use tempfile::NamedTempFile;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Format> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        ext.parse()
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Format> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "toml" => Ok(Format::Toml),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => write!(f, "json"),
            Format::Toml => write!(f, "toml"),
        }
    }
}

// TOML has no top-level arrays, so a list is stored as `[[todos]]` tables.
#[derive(Serialize, Deserialize)]
struct TodoDocument {
    #[serde(default)]
    todos: Vec<Todo>,
}

fn missing_field_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^missing field `([^`]+)`").expect("valid regex"))
}

fn missing_field(message: &str) -> Option<String> {
    missing_field_re()
        .captures(message)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn from_json_error(err: serde_json::Error) -> Error {
    if err.classify() != Category::Data {
        return Error::Json(err);
    }
    let message = err.to_string();
    match missing_field(&message) {
        Some(field) => Error::MissingField(field),
        None => Error::InvalidShape(message),
    }
}

fn from_toml_error(err: toml::de::Error) -> Error {
    let message = err.to_string();
    if let Some(field) = missing_field(&message) {
        Error::MissingField(field)
    } else if message.starts_with("invalid type") || message.starts_with("invalid value") {
        Error::InvalidShape(message)
    } else {
        Error::Toml(err)
    }
}

pub fn from_json(input: &str) -> Result<Todo> {
    serde_json::from_str(input).map_err(from_json_error)
}

pub fn from_json_list(input: &str) -> Result<Vec<Todo>> {
    serde_json::from_str(input).map_err(from_json_error)
}

pub fn to_json(todo: &Todo) -> Result<String> {
    Ok(serde_json::to_string(todo)?)
}

pub fn to_json_list(todos: &[Todo]) -> Result<String> {
    Ok(serde_json::to_string_pretty(todos)?)
}

pub fn from_toml(input: &str) -> Result<Vec<Todo>> {
    let doc: TodoDocument = toml::from_str(input).map_err(from_toml_error)?;
    Ok(doc.todos)
}

/// TOML integers are signed, so ids above `i64::MAX` cannot be written.
pub fn to_toml(todos: &[Todo]) -> Result<String> {
    if let Some(todo) = todos.iter().find(|t| i64::try_from(t.id).is_err()) {
        return Err(Error::InvalidShape(format!(
            "id {} does not fit in a TOML integer",
            todo.id
        )));
    }
    let doc = TodoDocument {
        todos: todos.to_vec(),
    };
    Ok(toml::to_string(&doc)?)
}

pub fn decode(format: Format, input: &str) -> Result<Vec<Todo>> {
    match format {
        Format::Json => from_json_list(input),
        Format::Toml => from_toml(input),
    }
}

pub fn encode(format: Format, todos: &[Todo]) -> Result<String> {
    match format {
        Format::Json => to_json_list(todos),
        Format::Toml => to_toml(todos),
    }
}

/// Reads a list of todos, choosing the format from the file extension.
/// A file that does not exist yet reads as an empty list.
pub fn read_file(path: &Path) -> Result<Vec<Todo>> {
    let format = Format::from_path(path)?;
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "todo file not found, starting empty");
            return Ok(Vec::new());
        }
        Err(err) => return Err(err.into()),
    };
    let todos = decode(format, &contents)?;
    debug!(path = %path.display(), %format, count = todos.len(), "read todos");
    Ok(todos)
}

pub fn write_file(path: &Path, todos: &[Todo]) -> Result<()> {
    let format = Format::from_path(path)?;
    let contents = encode(format, todos)?;

    // Write next to the target and rename over it, so readers never see a partial file.
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.persist(path).map_err(|err| err.error)?;
    debug!(path = %path.display(), %format, count = todos.len(), "wrote todos");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_without_interact() {
        let input = Todo::new(1, "buy milk");
        let json = to_json(&input).unwrap();
        assert_eq!(json, r#"{"text":"buy milk","done":false,"id":1}"#);

        let read_back = from_json(&json).unwrap();
        assert_eq!(read_back, input);
        assert_eq!(read_back.interact, None);
    }

    #[test]
    fn test_reader_exposes_all_four_fields() {
        let todo = from_json(r#"{"text": "call mom", "done": true, "interact": true, "id": 2}"#)
            .unwrap();
        assert_eq!(todo.text, "call mom");
        assert!(todo.done);
        assert_eq!(todo.interact, Some(true));
        assert_eq!(todo.id, 2);
    }

    #[test]
    fn test_interact_false_survives_round_trip() {
        let input = Todo::new(4, "stretch").with_interact(false);
        let json = to_json(&input).unwrap();
        assert!(json.contains(r#""interact":false"#));
        assert_eq!(from_json(&json).unwrap().interact, Some(false));
    }

    #[test]
    fn test_missing_required_field() {
        let err = from_json(r#"{"text": "buy milk", "id": 1}"#).unwrap_err();
        match err {
            Error::MissingField(field) => assert_eq!(field, "done"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_wrong_field_type() {
        let err = from_json(r#"{"text": "buy milk", "done": "no", "id": 1}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidShape(_)), "got {err:?}");

        let err = from_json(r#"{"text": "buy milk", "done": false, "id": -3}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidShape(_)), "got {err:?}");
    }

    #[test]
    fn test_malformed_json_is_not_a_shape_error() {
        let err = from_json(r#"{"text": "buy milk","#).unwrap_err();
        assert!(matches!(err, Error::Json(_)), "got {err:?}");
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let todo = from_json(r#"{"text": "a", "done": false, "id": 9, "colour": "red"}"#).unwrap();
        assert_eq!(todo, Todo::new(9, "a"));
    }

    #[test]
    fn test_toml_document() {
        let input = "[[todos]]\ntext = \"buy milk\"\ndone = false\nid = 1\n\n\
                     [[todos]]\ntext = \"call mom\"\ndone = true\ninteract = true\nid = 2\n";
        let todos = from_toml(input).unwrap();
        assert_eq!(
            todos,
            vec![
                Todo::new(1, "buy milk"),
                Todo {
                    text: "call mom".to_string(),
                    done: true,
                    interact: Some(true),
                    id: 2,
                },
            ]
        );

        let written = to_toml(&todos).unwrap();
        assert_eq!(from_toml(&written).unwrap(), todos);
    }

    #[test]
    fn test_toml_missing_field() {
        let err = from_toml("[[todos]]\ntext = \"a\"\ndone = false\n").unwrap_err();
        match err {
            Error::MissingField(field) => assert_eq!(field, "id"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("todos.json")).unwrap(), Format::Json);
        assert_eq!(Format::from_path(Path::new("todos.TOML")).unwrap(), Format::Toml);
        assert!(matches!(
            Format::from_path(Path::new("todos.md")),
            Err(Error::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_quoted_message_in_value_is_still_a_shape_error() {
        let err = from_json(r#"{"text": "a", "done": "missing field `id`", "id": 1}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidShape(_)), "got {err:?}");

        let err = from_toml("[[todos]]\ntext = \"a\"\ndone = \"missing field `id`\"\nid = 1\n")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidShape(_)), "got {err:?}");
    }

    #[test]
    fn test_toml_rejects_ids_beyond_signed_range() {
        let err = to_toml(&[Todo::new(u64::MAX, "big")]).unwrap_err();
        assert!(matches!(err, Error::InvalidShape(_)), "got {err:?}");

        let largest = vec![Todo::new(i64::MAX as u64, "largest")];
        assert_eq!(from_toml(&to_toml(&largest).unwrap()).unwrap(), largest);
    }

    #[test]
    fn test_json_list_decode_and_encode() {
        let todos = from_json_list(
            r#"[{"text": "buy milk", "done": false, "id": 1},
                {"text": "call mom", "done": true, "interact": false, "id": 2}]"#,
        )
        .unwrap();
        assert_eq!(todos.len(), 2);
        assert_eq!(todos[1].interact, Some(false));

        let json = encode(Format::Json, &todos).unwrap();
        assert_eq!(decode(Format::Json, &json).unwrap(), todos);

        let as_toml = encode(Format::Toml, &todos).unwrap();
        assert!(as_toml.contains("[[todos]]"));
        assert_eq!(decode(Format::Toml, &as_toml).unwrap(), todos);
    }

    #[test]
    fn test_json_list_reports_missing_field_of_an_element() {
        let err = from_json_list(r#"[{"text": "a", "done": false}]"#).unwrap_err();
        match err {
            Error::MissingField(field) => assert_eq!(field, "id"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_read_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let todos = read_file(&dir.path().join("todos.json")).unwrap();
        assert!(todos.is_empty());
    }

    #[test]
    fn test_file_round_trip_picks_format_from_extension() {
        let dir = TempDir::new().unwrap();
        let todos = vec![
            Todo::new(1, "buy milk"),
            Todo::new(2, "call mom").with_interact(true),
        ];

        let json_path = dir.path().join("todos.json");
        write_file(&json_path, &todos).unwrap();
        let on_disk = fs::read_to_string(&json_path).unwrap();
        assert!(on_disk.trim_start().starts_with('['));
        assert_eq!(read_file(&json_path).unwrap(), todos);

        let toml_path = dir.path().join("todos.toml");
        write_file(&toml_path, &todos).unwrap();
        let on_disk = fs::read_to_string(&toml_path).unwrap();
        assert!(on_disk.contains("[[todos]]"));
        assert_eq!(read_file(&toml_path).unwrap(), todos);
    }

    #[test]
    fn test_write_replaces_previous_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todos.json");
        write_file(&path, &[Todo::new(1, "a"), Todo::new(2, "b")]).unwrap();
        write_file(&path, &[Todo::new(3, "c")]).unwrap();

        assert_eq!(read_file(&path).unwrap(), vec![Todo::new(3, "c")]);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_unknown_extension_is_rejected_before_io() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todos.md");
        assert!(matches!(read_file(&path), Err(Error::UnknownFormat(_))));
        assert!(matches!(write_file(&path, &[]), Err(Error::UnknownFormat(_))));
        assert!(!path.exists());
    }
}
