//! Compose command implementation

use super::loader_options;
use crate::OutputFormat;
use anyhow::{Context, Result, bail};
use serde_json::{Map, Number, Value};
use std::path::{Path, PathBuf};
use stitch_import::{ImportLoader, Yaml};
use tracing::info;
use yaml_rust2::YamlEmitter;

pub fn execute(file: &Path, root: Option<PathBuf>, sorted: bool, format: OutputFormat) -> Result<()> {
    // FILE is relative to where stitch runs, not to the import root
    let file = std::path::absolute(file)
        .with_context(|| format!("Invalid input path: {}", file.display()))?;

    let mut loader = ImportLoader::new(loader_options(root, sorted));
    info!(file = %file.display(), root = %loader.relative_import_dir().display(), "composing");

    let value = match loader.load_file(&file) {
        Ok(value) => value,
        Err(err) => {
            eprint!(
                "{}",
                err.to_diagnostic().to_text(Some(loader.source_context()))
            );
            bail!("failed to compose {}", file.display());
        }
    };

    println!("{}", render(&value, format)?);
    Ok(())
}

fn render(value: &Yaml, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => {
            let mut out = String::new();
            YamlEmitter::new(&mut out)
                .dump(value)
                .context("Failed to emit YAML")?;
            Ok(out)
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(&to_json(value)).context("Failed to serialize JSON")
        }
    }
}

/// Convert a constructed YAML value to JSON. Non-string keys use their scalar text.
pub fn to_json(value: &Yaml) -> Value {
    match value {
        Yaml::Null | Yaml::BadValue | Yaml::Alias(_) => Value::Null,
        Yaml::Boolean(b) => Value::Bool(*b),
        Yaml::Integer(i) => Value::Number((*i).into()),
        Yaml::Real(text) => text
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map_or_else(|| Value::String(text.clone()), Value::Number),
        Yaml::String(s) => Value::String(s.clone()),
        Yaml::Array(items) => Value::Array(items.iter().map(to_json).collect()),
        Yaml::Hash(hash) => {
            let mut map = Map::new();
            for (key, value) in hash {
                map.insert(key_text(key), to_json(value));
            }
            Value::Object(map)
        }
    }
}

fn key_text(key: &Yaml) -> String {
    match key {
        Yaml::String(s) | Yaml::Real(s) => s.clone(),
        Yaml::Integer(i) => i.to_string(),
        Yaml::Boolean(b) => b.to_string(),
        Yaml::Null => "null".to_string(),
        other => to_json(other).to_string(),
    }
}
