// ============================================================
// Layer 4 — Text Normalizer
// ============================================================
// Cleans raw tweets before tokenisation.
//
// The cleaning is a fixed, ordered list of rewrite rules.
// Each rule consumes the output of the previous one:
//
//   1. split_tags         "#MachineLearning" → "Machine Learning"
//   2. lowercase          "Machine Learning" → "machine learning"
//   3. remove_links       "see http://t.co/x" → "see "
//   4. strip_symbols      "rocks!"           → "rocks"
//   5. collapse_spaces    "a \t\n b"         → "a b"
//   6. strip_edge_quotes  "'hi'"             → "hi"   ("don't" kept)
//   7. trim               " a b "            → "a b"
//
// Order matters: stripping symbols before splitting tags
// would delete the '#' and '@' markers that rule 1 looks for.
// Links are removed before symbols, so a word such as "ht!tpx"
// comes out as "httpx" and only a second pass drops it.
//
// The same Normalizer is used for training and test data.
// Every rule is total, so normalisation never fails.
//
// Reference: regex crate documentation
//            Rust Book §8 (Strings in Rust)

use anyhow::Result;
use regex::{Captures, Regex};

use crate::domain::sample::Sample;

/// One named rewrite step
pub struct Rule {
    pub name:  &'static str,
    apply_fn:  Box<dyn Fn(&str) -> String + Send + Sync>,
}

impl Rule {
    fn new(
        name: &'static str,
        apply_fn: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Self {
        Self { name, apply_fn: Box::new(apply_fn) }
    }

    pub fn apply(&self, text: &str) -> String {
        (self.apply_fn)(text)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

#[derive(Debug)]
pub struct Normalizer {
    rules: Vec<Rule>,
}

impl Normalizer {
    /// Compile every rule's regex once.
    pub fn new() -> Result<Self> {
        let tag       = Regex::new(r"[#|@](\w+)")?;
        let camel     = Regex::new(r"[A-Z][a-z]+")?;
        let http      = Regex::new(r"http\S+")?;
        let scheme    = Regex::new(r"\S+://\S+")?;
        let symbols   = Regex::new(r"[^0-9a-zA-Z\s']")?;
        let spaces    = Regex::new(r"\s+")?;
        let quotes    = Regex::new(r"(^|\s)'?([\w']+\w+)'?")?;

        let rules = vec![
            Rule::new("split_tags",        move |t| split_tags(&tag, &camel, t)),
            Rule::new("lowercase",         lowercase),
            Rule::new("remove_links",      move |t| remove_links(&http, &scheme, t)),
            Rule::new("strip_symbols",     move |t| replace(&symbols, t, "")),
            Rule::new("collapse_spaces",   move |t| replace(&spaces, t, " ")),
            Rule::new("strip_edge_quotes", move |t| replace(&quotes, t, "${1}${2}")),
            Rule::new("trim",              |t| t.trim().to_string()),
        ];

        Ok(Self { rules })
    }

    /// The rules in the order they are applied
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Run every rule in order on one text.
    pub fn normalize(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, rule| rule.apply(&acc))
    }

    /// Normalise the text of every sample, keeping ids, labels and
    /// row order. Rows whose text becomes empty are kept.
    pub fn normalize_samples(&self, samples: &[Sample]) -> Vec<Sample> {
        samples
            .iter()
            .map(|s| s.with_text(self.normalize(&s.text)))
            .collect()
    }

    /// Remove rows whose normalised text is empty.
    ///
    /// Not called by the pipelines: the test CSV must keep every row
    /// so predicted labels line up with the input.
    pub fn drop_empty(samples: Vec<Sample>) -> Vec<Sample> {
        samples.into_iter().filter(|s| !s.text.is_empty()).collect()
    }
}

// ─── Rules ────────────────────────────────────────────────────────────────────

/// Replace each `#tag` / `@mention` by its capitalised word runs.
/// Spans that are not `[A-Z][a-z]+` are dropped, so "@johnSmith"
/// becomes "Smith" and "#lol" disappears entirely.
fn split_tags(tag: &Regex, camel: &Regex, text: &str) -> String {
    tag.replace_all(text, |caps: &Captures| {
        camel
            .find_iter(&caps[1])
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    })
    .into_owned()
}

fn lowercase(text: &str) -> String {
    text.to_lowercase()
}

/// Two independent passes: anything glued to "http", then any
/// other scheme://target.
fn remove_links(http: &Regex, scheme: &Regex, text: &str) -> String {
    let without_http = http.replace_all(text, "");
    scheme.replace_all(&without_http, "").into_owned()
}

fn replace(re: &Regex, text: &str, with: &str) -> String {
    re.replace_all(text, with).into_owned()
}
