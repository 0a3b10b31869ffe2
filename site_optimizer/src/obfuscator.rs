use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

static FUNCTION_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bfunction\s+([a-zA-Z_$][a-zA-Z0-9_$]*)\s*\(").unwrap());

static VARIABLE_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b((?:let|const|var)\s+)([a-zA-Z_$][a-zA-Z0-9_$]*)").unwrap());

static IDENTIFIER_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z_$][a-zA-Z0-9_$]*").unwrap());

const ALPHABET: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Error)]
pub enum ObfuscationError {
    #[error("regex compile error: {0}")]
    RegexCompile(String),
}

/// Maps a counter value to `_a`, `_b`, ... `_z`, `_aa`, `_ab`, ...
pub fn synthesize_name(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index;
    loop {
        letters.push(ALPHABET[n % 26]);
        n /= 26;
        if n == 0 {
            break;
        }
        n -= 1;
    }
    letters.reverse();
    let mut name = String::with_capacity(letters.len() + 1);
    name.push('_');
    name.extend(letters.into_iter().map(char::from));
    name
}

/// Hands out synthesized names in strictly increasing order. One generator
/// serves functions and variables alike. Reserved names are skipped.
#[derive(Debug, Default)]
pub struct NameGenerator {
    counter: usize,
    reserved: HashSet<String>,
}

impl NameGenerator {
    pub fn reserving<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            counter: 0,
            reserved: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn next_name(&mut self) -> String {
        loop {
            let name = synthesize_name(self.counter);
            self.counter += 1;
            if !self.reserved.contains(&name) {
                return name;
            }
        }
    }

    pub fn issued(&self) -> usize {
        self.counter
    }
}

/// Original identifier to replacement, in the order names were first seen.
#[derive(Debug, Default, Clone)]
pub struct IdentifierMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl IdentifierMap {
    pub fn get(&self, original: &str) -> Option<&str> {
        self.index
            .get(original)
            .map(|&i| self.entries[i].1.as_str())
    }

    fn get_or_assign(&mut self, original: &str, names: &mut NameGenerator) -> String {
        if let Some(existing) = self.get(original) {
            return existing.to_string();
        }
        let replacement = names.next_name();
        self.index.insert(original.to_string(), self.entries.len());
        self.entries.push((original.to_string(), replacement.clone()));
        replacement
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(o, r)| (o.as_str(), r.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ProtectedNames(HashSet<String>);

impl ProtectedNames {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }
}

impl Default for ProtectedNames {
    fn default() -> Self {
        Self::new(crate::config::default_protected_names())
    }
}

#[derive(Debug)]
pub struct Obfuscated {
    pub code: String,
    pub identifiers: IdentifierMap,
}

/// State of one renaming pass. Never shared between documents.
struct RenamePass {
    names: NameGenerator,
    map: IdentifierMap,
}

impl RenamePass {
    /// Every identifier-shaped token already in `source` is reserved, so a
    /// synthesized name never lands on a name the script still uses.
    fn new(source: &str) -> Self {
        let tokens = IDENTIFIER_TOKEN.find_iter(source).map(|m| m.as_str());
        Self {
            names: NameGenerator::reserving(tokens),
            map: IdentifierMap::default(),
        }
    }

    fn declare(&mut self, name: &str, protected: &ProtectedNames) {
        if !protected.contains(name) {
            self.map.get_or_assign(name, &mut self.names);
        }
    }

    /// Rewrites every whole-token occurrence of a declared name in one scan,
    /// so a replacement is never itself matched again.
    fn rewrite(&self, source: &str) -> Result<String, ObfuscationError> {
        if self.map.is_empty() {
            return Ok(source.to_string());
        }
        let alternation = self
            .map
            .iter()
            .map(|(original, _)| regex::escape(original))
            .collect::<Vec<_>>()
            .join("|");
        let tokens = Regex::new(&format!(r"\b(?:{})\b", alternation))
            .map_err(|e| ObfuscationError::RegexCompile(e.to_string()))?;
        Ok(tokens
            .replace_all(source, |caps: &Captures| {
                self.map.get(&caps[0]).unwrap_or(&caps[0]).to_string()
            })
            .into_owned())
    }
}

pub struct Obfuscator {
    protected: ProtectedNames,
}

impl Obfuscator {
    pub fn new(protected: ProtectedNames) -> Self {
        Self { protected }
    }

    /// Renames declared functions and variables. Renaming is keyed on the
    /// name only: same-named bindings in different scopes share a
    /// replacement, and property accesses or string contents matching a
    /// renamed identifier are rewritten as well.
    pub fn obfuscate(&self, source: &str) -> Result<Obfuscated, ObfuscationError> {
        let mut pass = RenamePass::new(source);

        for caps in FUNCTION_DECL.captures_iter(source) {
            pass.declare(&caps[1], &self.protected);
        }
        for caps in VARIABLE_DECL.captures_iter(source) {
            pass.declare(&caps[2], &self.protected);
        }
        let code = pass.rewrite(source)?;

        tracing::debug!(
            renamed = pass.map.len(),
            issued = pass.names.issued(),
            "obfuscated script"
        );

        Ok(Obfuscated {
            code,
            identifiers: pass.map,
        })
    }
}

impl Default for Obfuscator {
    fn default() -> Self {
        Self::new(ProtectedNames::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_follow_bijective_base26() {
        assert_eq!(synthesize_name(0), "_a");
        assert_eq!(synthesize_name(25), "_z");
        assert_eq!(synthesize_name(26), "_aa");
        assert_eq!(synthesize_name(27), "_ab");
        assert_eq!(synthesize_name(701), "_zz");
        assert_eq!(synthesize_name(702), "_aaa");
    }

    #[test]
    fn generated_names_are_unique() {
        let mut names = NameGenerator::default();
        let issued: HashSet<String> = (0..2000).map(|_| names.next_name()).collect();
        assert_eq!(issued.len(), 2000);
    }

    #[test]
    fn reserved_names_are_skipped() {
        let mut names = NameGenerator::reserving(["_a", "_c"]);
        assert_eq!(names.next_name(), "_b");
        assert_eq!(names.next_name(), "_d");
        assert_eq!(names.issued(), 4);
    }

    #[test]
    fn counter_is_shared_between_functions_and_variables() {
        let src = "function go() {} let speed = 1; function stop() {}";
        let out = Obfuscator::default().obfuscate(src).unwrap();
        assert_eq!(out.identifiers.get("go"), Some("_a"));
        assert_eq!(out.identifiers.get("stop"), Some("_b"));
        assert_eq!(out.identifiers.get("speed"), Some("_c"));
    }

    #[test]
    fn declaration_keyword_is_not_touched() {
        let out = Obfuscator::default().obfuscate("let e = 1; var v = e;").unwrap();
        assert_eq!(out.code, "let _a = 1; var _b = _a;");
    }
}
