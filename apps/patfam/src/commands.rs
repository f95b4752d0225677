//! Subcommand implementations

use std::path::{Path, PathBuf};

use impress_patents::{parse_identifiers, PatentIdentifier};
use patfam_core::{
    select_representative, DeduplicationEngine, EngineConfig, InMemoryIndex, NamedCollection,
    PreferenceOrder,
};

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// `NAME=FILE`, or a bare `FILE` named after its stem
pub fn parse_input(value: &str) -> Result<(String, PathBuf), String> {
    match value.split_once('=') {
        Some((name, _)) if name.is_empty() => Err(format!("empty collection name in `{value}`")),
        Some((_, file)) if file.is_empty() => Err(format!("missing file in `{value}`")),
        Some((name, file)) => Ok((name.to_string(), PathBuf::from(file))),
        None => {
            let path = PathBuf::from(value);
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .ok_or_else(|| format!("cannot name collection from `{value}`"))?;
            Ok((name, path))
        }
    }
}

pub fn parse(text: &str) {
    for token in parse_identifiers(text) {
        println!("{token}");
    }
}

pub fn each(ids: &[String], f: fn(&str) -> String) {
    for id in ids {
        println!("{}", f(id));
    }
}

fn preference_or(
    config: &EngineConfig,
    setting: Option<&str>,
) -> Result<PreferenceOrder, Box<dyn std::error::Error>> {
    Ok(match setting {
        Some(setting) => PreferenceOrder::parse(setting)?,
        None => config.preference.clone(),
    })
}

pub fn select(config: &EngineConfig, preference: Option<&str>, ids: &[String]) -> CommandResult {
    let preference = preference_or(config, preference)?;
    let members: Vec<PatentIdentifier> = ids.iter().map(|id| PatentIdentifier::parse(id)).collect();

    if let Some(chosen) = select_representative(&members, &preference) {
        println!("{}", chosen.canonical);
    }
    Ok(())
}

fn read_collection(name: &str, path: &Path) -> Result<NamedCollection, Box<dyn std::error::Error>> {
    let text =
        std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    let collection = NamedCollection::from_text(name, &text);
    tracing::debug!(
        collection = name,
        identifiers = collection.identifiers.len(),
        "read input"
    );
    Ok(collection)
}

pub fn dedupe(
    config: EngineConfig,
    inputs: &[(String, PathBuf)],
    index: Option<&Path>,
    existing: Option<&Path>,
    preference: Option<&str>,
) -> CommandResult {
    let preference = preference_or(&config, preference)?;

    let collections = inputs
        .iter()
        .map(|(name, path)| read_collection(name, path))
        .collect::<Result<Vec<_>, _>>()?;

    let index = match index {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| format!("{}: {}", path.display(), e))?;
            let index = InMemoryIndex::from_json(&json)?;
            tracing::info!(documents = index.len(), "loaded index");
            Some(index)
        }
        None => None,
    };

    let existing = match existing {
        Some(path) => read_collection("existing", path)?.identifiers,
        None => Vec::new(),
    };

    let mut engine = DeduplicationEngine::new(config).with_existing(existing);
    if let Some(index) = &index {
        engine = engine.with_validity(index).with_families(index);
    }

    let report = engine.combine_with(&collections, &preference)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
