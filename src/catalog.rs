use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

use crate::config::DifficultyFilter;

#[derive(Embed)]
#[folder = "assets/"]
struct CatalogAssets;

const BUILTIN_FILE: &str = "snippets.toml";

/// Snippets unlock in groups of this size, one group per level.
const SNIPPETS_PER_LEVEL: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: String,
    pub filename: String,
    pub language: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub points: Option<u32>,
    pub code: String,
}

#[derive(Deserialize)]
struct SnippetFile {
    #[serde(default, rename = "snippet")]
    snippets: Vec<Snippet>,
}

/// Ordered, read-only list of practice snippets.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    snippets: Vec<Snippet>,
}

impl Catalog {
    /// Snippets compiled into the binary.
    pub fn builtin() -> Result<Self> {
        let file = CatalogAssets::get(BUILTIN_FILE)
            .with_context(|| format!("bundled {BUILTIN_FILE} is missing"))?;
        let content = std::str::from_utf8(file.data.as_ref())
            .with_context(|| format!("bundled {BUILTIN_FILE} is not UTF-8"))?;
        Self::from_toml_str(content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let parsed: SnippetFile = toml::from_str(content)?;
        Self::from_snippets(parsed.snippets)
    }

    pub fn from_snippets(snippets: Vec<Snippet>) -> Result<Self> {
        let mut seen = HashSet::new();
        for snippet in &snippets {
            if snippet.code.is_empty() {
                bail!("snippet {:?} has no code", snippet.id);
            }
            if !seen.insert(snippet.id.as_str()) {
                bail!("duplicate snippet id {:?}", snippet.id);
            }
        }
        Ok(Self { snippets })
    }

    /// Bundled snippets followed by any `*.toml` snippet files in `dir`.
    /// Unreadable files and id clashes are logged and skipped.
    pub fn load(user_dir: Option<&Path>) -> Result<Self> {
        let mut catalog = Self::builtin()?;
        if let Some(dir) = user_dir {
            if dir.is_dir() {
                catalog.extend_from_dir(dir)?;
            }
        }
        Ok(catalog)
    }

    fn extend_from_dir(&mut self, dir: &Path) -> Result<()> {
        let mut paths: Vec<_> = fs::read_dir(dir)
            .with_context(|| format!("reading snippet dir {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("toml"))
            .collect();
        paths.sort();

        for path in paths {
            let extra = match fs::read_to_string(&path)
                .map_err(anyhow::Error::from)
                .and_then(|content| Self::from_toml_str(&content))
            {
                Ok(extra) => extra,
                Err(err) => {
                    log::warn!("skipping snippet file {}: {err:#}", path.display());
                    continue;
                }
            };
            for snippet in extra.snippets {
                if self.find(&snippet.id).is_some() {
                    log::warn!(
                        "skipping snippet {:?} from {}: id already in use",
                        snippet.id,
                        path.display()
                    );
                    continue;
                }
                self.snippets.push(snippet);
            }
        }
        Ok(())
    }

    pub fn snippets(&self) -> &[Snippet] {
        &self.snippets
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Snippet> {
        self.snippets.get(idx)
    }

    pub fn find(&self, id: &str) -> Option<(usize, &Snippet)> {
        self.snippets.iter().enumerate().find(|(_, s)| s.id == id)
    }

    /// Level a player needs before the snippet at `idx` can be practiced.
    pub fn required_level(idx: usize) -> u32 {
        (idx / SNIPPETS_PER_LEVEL) as u32 + 1
    }

    pub fn is_unlocked(idx: usize, level: u32) -> bool {
        level >= Self::required_level(idx)
    }

    /// Catalog indices that pass the difficulty filter, in catalog order.
    pub fn visible(&self, filter: DifficultyFilter) -> Vec<usize> {
        self.snippets
            .iter()
            .enumerate()
            .filter(|(_, s)| filter.matches(s.difficulty))
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[[snippet]]
id = "one"
filename = "one.rs"
language = "rust"
difficulty = "easy"
code = "fn one() {}"

[[snippet]]
id = "two"
filename = "two.py"
language = "python"
difficulty = "hard"
category = "Scripts"
points = 200
code = '''
def two():
    return 2'''
"#;

    #[test]
    fn test_parse_catalog() {
        let catalog = Catalog::from_toml_str(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 2);
        let (idx, two) = catalog.find("two").unwrap();
        assert_eq!(idx, 1);
        assert_eq!(two.difficulty, Difficulty::Hard);
        assert_eq!(two.category.as_deref(), Some("Scripts"));
        assert_eq!(two.code, "def two():\n    return 2");
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let dup = format!("{SAMPLE}\n[[snippet]]\nid = \"one\"\nfilename = \"x\"\nlanguage = \"x\"\ndifficulty = \"easy\"\ncode = \"x\"\n");
        let err = Catalog::from_toml_str(&dup).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_empty_code_rejected() {
        let empty = "[[snippet]]\nid = \"e\"\nfilename = \"e\"\nlanguage = \"e\"\ndifficulty = \"easy\"\ncode = \"\"\n";
        assert!(Catalog::from_toml_str(empty).is_err());
    }

    #[test]
    fn test_required_level_groups_of_three() {
        assert_eq!(Catalog::required_level(0), 1);
        assert_eq!(Catalog::required_level(2), 1);
        assert_eq!(Catalog::required_level(3), 2);
        assert_eq!(Catalog::required_level(8), 3);
        assert!(Catalog::is_unlocked(2, 1));
        assert!(!Catalog::is_unlocked(3, 1));
        assert!(Catalog::is_unlocked(3, 2));
    }

    #[test]
    fn test_visible_respects_filter() {
        let catalog = Catalog::from_toml_str(SAMPLE).unwrap();
        assert_eq!(catalog.visible(DifficultyFilter::All), vec![0, 1]);
        assert_eq!(catalog.visible(DifficultyFilter::Hard), vec![1]);
        assert!(catalog.visible(DifficultyFilter::Medium).is_empty());
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.len() >= 6);
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert!(catalog.snippets().iter().any(|s| s.difficulty == difficulty));
        }
    }

    #[test]
    fn test_user_dir_extends_catalog() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(
            dir.path().join("mine.toml"),
            "[[snippet]]\nid = \"mine\"\nfilename = \"m.rs\"\nlanguage = \"rust\"\ndifficulty = \"medium\"\ncode = \"let m = 1;\"\n",
        )
        .unwrap();
        fs::write(dir.path().join("broken.toml"), "not [valid").unwrap();

        let builtin = Catalog::builtin().unwrap().len();
        let catalog = Catalog::load(Some(dir.path())).unwrap();
        assert_eq!(catalog.len(), builtin + 1);
        assert!(catalog.find("mine").is_some());
    }
}
