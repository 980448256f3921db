use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use regex::Regex;
use serde_yaml::Value;

use codetyper::catalog::Catalog;
use codetyper::engine::achievements::{ACHIEVEMENTS, AchievementId};

fn flatten(prefix: &str, value: &Value, out: &mut BTreeSet<String>) {
    match value {
        Value::Mapping(map) => {
            for (k, v) in map {
                let key = match k {
                    Value::String(s) => s.clone(),
                    Value::Bool(b) => b.to_string(),
                    other => panic!("unexpected key {other:?}"),
                };
                let path = if prefix.is_empty() {
                    key
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, v, out);
            }
        }
        _ => {
            out.insert(prefix.to_string());
        }
    }
}

fn locale_keys(name: &str) -> BTreeSet<String> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("locales")
        .join(format!("{name}.yml"));
    let content = fs::read_to_string(&path).unwrap();
    let value: Value = serde_yaml::from_str(&content).unwrap();
    let mut keys = BTreeSet::new();
    flatten("", &value, &mut keys);
    keys
}

#[test]
fn locales_define_the_same_keys() {
    let en = locale_keys("en");
    let ru = locale_keys("ru");
    let missing_ru: Vec<_> = en.difference(&ru).collect();
    let missing_en: Vec<_> = ru.difference(&en).collect();
    assert!(missing_ru.is_empty(), "missing in ru: {missing_ru:?}");
    assert!(missing_en.is_empty(), "missing in en: {missing_en:?}");
}

#[test]
fn every_achievement_is_translated() {
    for name in ["en", "ru"] {
        let keys = locale_keys(name);
        for def in ACHIEVEMENTS {
            let id = def.id.to_key();
            assert!(keys.contains(&format!("achievement.{id}.title")), "{name}: {id}");
            assert!(keys.contains(&format!("achievement.{id}.description")), "{name}: {id}");
        }
    }
}

#[test]
fn achievement_keys_are_snake_case() {
    let re = Regex::new(r"^[a-z][a-z0-9_]*$").unwrap();
    for def in ACHIEVEMENTS {
        let key = def.id.to_key();
        assert!(re.is_match(key), "{key}");
        assert_eq!(AchievementId::from_key(key), Some(def.id));
    }
}

#[test]
fn builtin_snippet_ids_are_slugs() {
    let re = Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").unwrap();
    let catalog = Catalog::builtin().unwrap();
    for snippet in catalog.snippets() {
        assert!(re.is_match(&snippet.id), "{}", snippet.id);
        assert!(!snippet.filename.is_empty(), "{}", snippet.id);
    }
}

#[test]
fn placeholders_match_across_locales() {
    let re = Regex::new(r"%\{(\w+)\}").unwrap();
    let load = |name: &str| -> Value {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("locales")
            .join(format!("{name}.yml"));
        serde_yaml::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    };
    let en = load("en");
    let ru = load("ru");

    for key in locale_keys("en") {
        let lookup = |root: &Value| -> String {
            let mut node = root;
            for part in key.split('.') {
                node = &node[part];
            }
            node.as_str().unwrap_or_default().to_string()
        };
        let vars = |s: &str| -> BTreeSet<String> {
            re.captures_iter(s).map(|c| c[1].to_string()).collect()
        };
        assert_eq!(vars(&lookup(&en)), vars(&lookup(&ru)), "{key}");
    }
}
