//! Tag signatures recognised by the extractor
//!
//! The extractor reacts to a small closed set of opening tags. Each kind of
//! trigger is described by one (tag, attribute, value) signature; everything
//! else in the markup is ignored.

use crate::config::{ExtractorConfig, SignatureConfig};
use crate::url::contains_tokens;

/// The kinds of opening tag the extractor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    /// Start of one listing's markup
    JobBoundary,

    /// Region whose next text is the job title
    TitleRegion,

    /// Region whose next text is the posted-date label
    PostedRegion,

    /// Link to the next listing page
    NextPage,
}

/// An opening tag with its attributes
///
/// Attribute names are lower-cased and values entity-decoded by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartTag {
    pub name: String,
    pub attributes: Vec<(String, String)>,
}

impl StartTag {
    pub fn new(name: &str, attributes: &[(&str, &str)]) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
                .collect(),
        }
    }

    /// Value of the first attribute called `name`
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// One (tag, attribute, value) signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSignature {
    tag: String,
    attribute: String,
    value: String,
}

impl TagSignature {
    pub fn new(tag: &str, attribute: &str, value: &str) -> Self {
        Self {
            tag: tag.trim().to_ascii_lowercase(),
            attribute: attribute.trim().to_ascii_lowercase(),
            value: value.to_string(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns true if `tag` has the signature's name and attribute tokens
    pub fn matches(&self, tag: &StartTag) -> bool {
        tag.name == self.tag
            && tag
                .attribute(&self.attribute)
                .is_some_and(|value| contains_tokens(&self.value, value))
    }
}

impl From<&SignatureConfig> for TagSignature {
    fn from(config: &SignatureConfig) -> Self {
        Self::new(&config.tag, &config.attribute, &config.value)
    }
}

/// The full, immutable set of triggers for one site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerSet {
    triggers: Vec<(TriggerKind, TagSignature)>,
}

impl TriggerSet {
    /// Builds the set; earlier entries win when a tag matches several
    pub fn new(triggers: Vec<(TriggerKind, TagSignature)>) -> Self {
        Self { triggers }
    }

    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self::new(vec![
            (TriggerKind::JobBoundary, TagSignature::from(&config.job)),
            (TriggerKind::TitleRegion, TagSignature::from(&config.title)),
            (TriggerKind::PostedRegion, TagSignature::from(&config.posted)),
            (TriggerKind::NextPage, TagSignature::from(&config.next_page)),
        ])
    }

    /// Returns true if some signature uses this tag name
    ///
    /// Lets the caller skip collecting attributes for irrelevant tags.
    pub fn watches(&self, tag_name: &str) -> bool {
        self.triggers.iter().any(|(_, sig)| sig.tag() == tag_name)
    }

    /// Classifies an opening tag
    pub fn classify(&self, tag: &StartTag) -> Option<TriggerKind> {
        self.triggers
            .iter()
            .find(|(_, sig)| sig.matches(tag))
            .map(|(kind, _)| *kind)
    }
}

impl Default for TriggerSet {
    fn default() -> Self {
        Self::from_config(&ExtractorConfig::default())
    }
}
