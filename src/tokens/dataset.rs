use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::ServerError;

/// The theme-set every lookup reads from.
pub const LIGHT_SET: &str = "light";

/// One named design token and its per-theme values.
#[derive(Debug, Clone, Default)]
pub struct Token {
    pub sets: BTreeMap<String, ValueRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct ValueRecord {
    pub value: Option<String>,
}

impl Token {
    /// Build a token from its JSON entry. Unexpected shapes degrade to a token
    /// without values instead of failing the whole dataset.
    pub fn from_json(entry: &Value) -> Self {
        let sets = entry
            .get("sets")
            .and_then(Value::as_object)
            .map(|sets| {
                sets.iter()
                    .map(|(name, set)| {
                        let value = set.get("value").and_then(Value::as_str).map(str::to_owned);
                        (name.clone(), ValueRecord { value })
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self { sets }
    }

    /// Raw value of the light theme-set, if it has one.
    pub fn light_value(&self) -> Option<&str> {
        self.sets.get(LIGHT_SET)?.value.as_deref()
    }

    #[cfg(test)]
    pub fn light(value: &str) -> Self {
        let mut sets = BTreeMap::new();
        sets.insert(
            LIGHT_SET.to_string(),
            ValueRecord {
                value: Some(value.to_string()),
            },
        );
        Self { sets }
    }
}

/// Read-only token mapping in dataset order.
#[derive(Debug, Default)]
pub struct TokenSet {
    tokens: Vec<(String, Token)>,
    names: HashSet<String>,
}

impl TokenSet {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Token)> {
        self.tokens.iter().map(|(name, token)| (name.as_str(), token))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Append every entry of a token object, keeping the first definition of
    /// a repeated name. Returns how many entries were added.
    fn merge_object(&mut self, object: &Map<String, Value>, source: &Path) -> usize {
        let mut added = 0;
        for (name, entry) in object {
            if !self.names.insert(name.clone()) {
                warn!(token = %name, path = %source.display(), "duplicate token, keeping first definition");
                continue;
            }
            if !entry.is_object() {
                debug!(token = %name, "token entry is not an object");
            }
            self.tokens.push((name.clone(), Token::from_json(entry)));
            added += 1;
        }
        added
    }
}

impl FromIterator<(String, Token)> for TokenSet {
    fn from_iter<I: IntoIterator<Item = (String, Token)>>(iter: I) -> Self {
        let mut set = TokenSet::default();
        for (name, token) in iter {
            if set.names.insert(name.clone()) {
                set.tokens.push((name, token));
            }
        }
        set
    }
}

/// Load the token dataset from a JSON file, or from every `*.json` file in a
/// directory (in file-name order).
pub fn load(path: &Path) -> Result<TokenSet, ServerError> {
    let files = if path.is_dir() {
        json_files_in(path)?
    } else {
        vec![path.to_path_buf()]
    };

    let mut set = TokenSet::default();
    for file in &files {
        let object = read_token_object(file)?;
        let added = set.merge_object(&object, file);
        debug!(path = %file.display(), tokens = added, "read token file");
    }

    info!(path = %path.display(), files = files.len(), tokens = set.len(), "loaded tokens");
    Ok(set)
}

fn json_files_in(dir: &Path) -> Result<Vec<PathBuf>, ServerError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| ServerError::Dataset(format!("cannot read {}: {e}", dir.display())))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(ServerError::Dataset(format!(
            "no .json files in {}",
            dir.display()
        )));
    }
    Ok(files)
}

fn read_token_object(file: &Path) -> Result<Map<String, Value>, ServerError> {
    let content = fs::read_to_string(file)
        .map_err(|e| ServerError::Dataset(format!("cannot read {}: {e}", file.display())))?;
    let value: Value = serde_json::from_str(&content)
        .map_err(|e| ServerError::Dataset(format!("invalid JSON in {}: {e}", file.display())))?;
    match value {
        Value::Object(object) => Ok(object),
        _ => Err(ServerError::Dataset(format!(
            "{} is not a token object",
            file.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_light_value_from_sets() {
        let token = Token::from_json(&json!({
            "sets": {
                "light": { "value": "rgb(2, 101, 220)", "uuid": "x" },
                "dark": { "value": "rgb(64, 105, 253)" }
            }
        }));
        assert_eq!(token.light_value(), Some("rgb(2, 101, 220)"));
        assert_eq!(token.sets.len(), 2);
    }

    #[test]
    fn test_odd_shapes_have_no_light_value() {
        assert!(Token::from_json(&json!("#ff0000")).light_value().is_none());
        assert!(Token::from_json(&json!({ "value": "4px" })).light_value().is_none());
        assert!(Token::from_json(&json!({ "sets": [] })).light_value().is_none());
        assert!(
            Token::from_json(&json!({ "sets": { "light": { "value": 12 } } }))
                .light_value()
                .is_none()
        );
    }

    #[test]
    fn test_load_file_keeps_dataset_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "tokens.json",
            r##"{
                "zebra": { "sets": { "light": { "value": "#000000" } } },
                "alpha": { "sets": { "light": { "value": "#ffffff" } } },
                "middle": { "value": "8px" }
            }"##,
        );
        let set = load(&path).unwrap();
        let names: Vec<&str> = set.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zebra", "alpha", "middle"]);
    }

    #[test]
    fn test_load_directory_merges_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "b-palette.json",
            r##"{ "blue-500": { "sets": { "light": { "value": "#0000ff" } } },
                  "shared": { "sets": { "light": { "value": "#222222" } } } }"##,
        );
        write(
            dir.path(),
            "a-semantic.json",
            r##"{ "shared": { "sets": { "light": { "value": "#111111" } } } }"##,
        );
        write(dir.path(), "README.md", "not tokens");

        let set = load(dir.path()).unwrap();
        let entries: Vec<(&str, Option<&str>)> =
            set.iter().map(|(name, t)| (name, t.light_value())).collect();
        assert_eq!(
            entries,
            vec![("shared", Some("#111111")), ("blue-500", Some("#0000ff"))]
        );
    }

    #[test]
    fn test_load_rejects_non_object_root() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "tokens.json", "[1, 2, 3]");
        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("is not a token object"));
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "tokens.json", "{ nope");
        assert!(matches!(load(&path), Err(ServerError::Dataset(_))));
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }

    #[test]
    fn test_load_empty_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("no .json files"));
    }
}
