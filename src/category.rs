//! Resolution of user-typed category aliases to sheet names.
use regex::Regex;
use std::collections::HashMap;

/// Built-in aliases, keyed by lower-case alias.
const BUILTIN_ALIASES: [(&str, &str); 4] = [
    ("overall", "GL 4* Overall rankings"),
    ("no-csb", "GL 4* No CSB rankings"),
    ("cod", "GL CoD Speedrun rankings"),
    ("magicite", "4* Magicite"),
];

/// Words left in lower case unless they open or close the title.
const SMALL_WORDS: [&str; 24] = [
    "a", "an", "and", "as", "at", "but", "by", "en", "for", "if", "in", "nor", "of", "on", "or", "per", "the", "to",
    "up", "v", "v.", "vs", "vs.", "via",
];

/// Finite alias table with a title-casing fallback for anything unlisted.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryAliases {
    table: HashMap<String, String>,
}

impl Default for CategoryAliases {
    fn default() -> Self {
        Self::new(BUILTIN_ALIASES.iter().map(|(alias, sheet)| (alias.to_string(), sheet.to_string())))
    }
}

impl CategoryAliases {
    /// Builds a table from (alias, sheet) pairs; aliases are matched case-insensitively.
    pub fn new(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            table: entries
                .into_iter()
                .map(|(alias, sheet)| (alias.to_lowercase(), sheet))
                .collect(),
        }
    }

    /// Adds or replaces aliases.
    pub fn extend(&mut self, entries: impl IntoIterator<Item = (String, String)>) {
        self.table
            .extend(entries.into_iter().map(|(alias, sheet)| (alias.to_lowercase(), sheet)));
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the sheet name for `category`.
    ///
    /// The input is lower-cased first; unknown aliases are title-cased so that
    /// a full sheet name typed in any case still resolves.
    pub fn resolve(&self, category: &str) -> String {
        let alias = category.to_lowercase();
        self.table
            .get(&alias)
            .cloned()
            .unwrap_or_else(|| lax_title_case(&alias))
    }
}

/// Normalizes a subcategory label the same way sheet headers are written.
pub fn normalize_subcategory(subcategory: &str) -> String {
    lax_title_case(subcategory)
}

/// Title-cases `text` without lowering anything.
///
/// Every word gets its first alphanumeric character upper-cased, except small
/// words in the middle of the title and words that already carry inner
/// capitals or dots (`CoD`, `v1.2`). A small word right after a colon opens a
/// subtitle and is capitalized too. Separators and spacing are kept as typed.
pub fn lax_title_case(text: &str) -> String {
    let pattern = Regex::new(r"[^\s:\x{2013}\x{2014}-]+|.").expect("Hardcode regex pattern");
    let tokens: Vec<&str> = pattern.find_iter(text).map(|token| token.as_str()).collect();
    let first = tokens.iter().position(|token| is_word(token));
    let last = tokens.iter().rposition(|token| is_word(token));
    let mut after_colon = false;
    let mut title = String::with_capacity(text.len());
    for (index, token) in tokens.iter().enumerate() {
        let edge = Some(index) == first || Some(index) == last || after_colon;
        if !is_word(token) || is_manual_case(token) || (!edge && is_small_word(token)) {
            title.push_str(token);
        } else {
            title.push_str(&capitalize(token));
        }
        if !token.trim().is_empty() {
            after_colon = *token == ":";
        }
    }
    title
}

fn is_word(token: &str) -> bool {
    token.chars().any(char::is_alphanumeric)
}

fn is_small_word(token: &str) -> bool {
    SMALL_WORDS.contains(&token.to_lowercase().as_str())
}

/// Inner capitals or inner dots mean the word was cased on purpose.
fn is_manual_case(token: &str) -> bool {
    let mut chars = token.chars().peekable();
    while chars.next().is_some() {
        match chars.peek().copied() {
            Some(next) if next.is_uppercase() => return true,
            Some('.') if chars.clone().nth(1).is_some() => return true,
            _ => (),
        }
    }
    false
}

fn capitalize(token: &str) -> String {
    match token.char_indices().find(|(_, c)| c.is_alphanumeric()) {
        Some((index, c)) => {
            let rest = &token[index + c.len_utf8()..];
            format!("{}{}{}", &token[..index], c.to_uppercase(), rest)
        }
        None => token.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_aliases() {
        let aliases = CategoryAliases::default();
        assert_eq!(aliases.len(), 4);
        assert_eq!(aliases.resolve("overall"), "GL 4* Overall rankings");
        assert_eq!(aliases.resolve("No-CSB"), "GL 4* No CSB rankings");
        assert_eq!(aliases.resolve("COD"), "GL CoD Speedrun rankings");
        assert_eq!(aliases.resolve("magicite"), "4* Magicite");
    }

    #[test]
    fn unknown_alias_falls_back_to_title_case() {
        let aliases = CategoryAliases::default();
        assert_eq!(aliases.resolve("torgen raid"), "Torgen Raid");
        assert_eq!(aliases.resolve("RUSH OF THE DEAD"), "Rush of the Dead");
    }

    #[test]
    fn overrides_replace_builtins() {
        let mut aliases = CategoryAliases::default();
        aliases.extend([
            ("Overall".to_owned(), "GL 5* Overall rankings".to_owned()),
            ("raid".to_owned(), "Raid rankings".to_owned()),
        ]);
        assert_eq!(aliases.len(), 5);
        assert_eq!(aliases.resolve("overall"), "GL 5* Overall rankings");
        assert_eq!(aliases.resolve("Raid"), "Raid rankings");
    }

    #[test]
    fn empty_table_only_title_cases() {
        let aliases = CategoryAliases::new(std::iter::empty());
        assert!(aliases.is_empty());
        assert_eq!(aliases.resolve("overall"), "Overall");
    }

    #[test]
    fn title_case_words() {
        assert_eq!(lax_title_case("any% no major glitches"), "Any% No Major Glitches");
        assert_eq!(lax_title_case("the end of the line"), "The End of the Line");
        assert_eq!(lax_title_case("ride on"), "Ride On");
        assert_eq!(lax_title_case("100m"), "100m");
        assert_eq!(lax_title_case("\"quoted\" run"), "\"Quoted\" Run");
    }

    #[test]
    fn title_case_opens_subtitle_after_colon() {
        assert_eq!(lax_title_case("a: the end"), "A: The End");
        assert_eq!(lax_title_case("ride:of the end"), "Ride:Of the End");
        assert_eq!(lax_title_case("a - the end"), "A - the End");
    }

    #[test]
    fn manual_case_detection() {
        assert!(is_manual_case("CoD"));
        assert!(is_manual_case("v1.2"));
        assert!(is_manual_case("e.g"));
        assert!(!is_manual_case("end."));
        assert!(!is_manual_case("Speedrun"));
        assert!(!is_manual_case(""));
    }

    #[test]
    fn title_case_keeps_manual_case_and_spacing() {
        assert_eq!(lax_title_case("CoD speedrun"), "CoD Speedrun");
        assert_eq!(lax_title_case("v1.2 route"), "v1.2 Route");
        assert_eq!(lax_title_case("NO  csb"), "NO  Csb");
        assert_eq!(lax_title_case("low-level run"), "Low-Level Run");
        assert_eq!(lax_title_case(""), "");
    }

    #[test]
    fn subcategory_normalization() {
        assert_eq!(normalize_subcategory("marilith"), "Marilith");
        assert_eq!(normalize_subcategory("sky dragon of the north"), "Sky Dragon of the North");
    }
}
