//! Localization resource AST.
//!
//! The tree has a fixed shape: a [`Resource`] per language holds an ordered
//! list of [`Message`]s, and every message owns exactly one [`Pattern`].
//! Pattern elements are opaque to the linter and only exposed to rules.
//!
//! Nodes are identified across trees by [`NodeKey`], never by address, so a
//! diagnostic reported against one tree can be attached to a clone of it.

use crate::types::LintReport;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// Discriminator for the three node kinds the linter visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// A [`Resource`] node.
    Resource,
    /// A [`Message`] node.
    Message,
    /// A [`Pattern`] node.
    Pattern,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resource => write!(f, "Resource"),
            Self::Message => write!(f, "Message"),
            Self::Pattern => write!(f, "Pattern"),
        }
    }
}

/// A BCP 47 style language tag, e.g. `en` or `de-AT`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct LanguageTag {
    /// The tag itself.
    pub name: String,
}

impl LanguageTag {
    /// Creates a new language tag.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Identifier of a message, unique within its resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct Identifier {
    /// The identifier text.
    pub name: String,
}

impl Identifier {
    /// Creates a new identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// All translated messages of one language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub struct Resource {
    /// Language of every message in this resource.
    pub language_tag: LanguageTag,
    /// Messages in catalog order.
    #[serde(default)]
    pub body: Vec<Message>,
    /// Lint reports attached by a lint run.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lint: Vec<LintReport>,
}

impl Resource {
    /// Creates a resource for `language` holding `body`.
    #[must_use]
    pub fn new(language: impl Into<String>, body: Vec<Message>) -> Self {
        Self {
            language_tag: LanguageTag::new(language),
            body,
            lint: Vec::new(),
        }
    }

    /// Returns the language tag name.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language_tag.name
    }

    /// Finds a message by id.
    #[must_use]
    pub fn message(&self, id: &str) -> Option<&Message> {
        self.body.iter().find(|m| m.id() == id)
    }

    fn message_mut(&mut self, id: &str) -> Option<&mut Message> {
        self.body.iter_mut().find(|m| m.id.name == id)
    }
}

/// A single translatable unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct Message {
    /// Stable identifier of the message.
    pub id: Identifier,
    /// The translated content.
    pub pattern: Pattern,
    /// Lint reports attached by a lint run.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lint: Vec<LintReport>,
}

impl Message {
    /// Creates a message.
    #[must_use]
    pub fn new(id: impl Into<String>, pattern: Pattern) -> Self {
        Self {
            id: Identifier::new(id),
            pattern,
            lint: Vec::new(),
        }
    }

    /// Returns the message id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id.name
    }
}

/// The content of a message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct Pattern {
    /// Text and placeholder segments, in order.
    #[serde(default)]
    pub elements: Vec<PatternElement>,
    /// Lint reports attached by a lint run.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lint: Vec<LintReport>,
}

impl Pattern {
    /// Creates a pattern from its elements.
    #[must_use]
    pub fn new(elements: Vec<PatternElement>) -> Self {
        Self {
            elements,
            lint: Vec::new(),
        }
    }

    /// Creates a pattern holding a single text segment.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::new(vec![PatternElement::Text {
            value: value.into(),
        }])
    }

    /// Renders the pattern as a flat string, placeholders as `{name}`.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.elements.iter().map(PatternElement::to_string).collect()
    }

    /// Returns true if the pattern renders no visible content.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.elements.iter().all(|e| match e {
            PatternElement::Text { value } => value.trim().is_empty(),
            PatternElement::Placeholder { .. } => false,
        })
    }
}

/// A segment of a [`Pattern`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PatternElement {
    /// Literal text.
    Text {
        /// The text.
        value: String,
    },
    /// A named variable substituted at runtime.
    Placeholder {
        /// Variable name.
        name: String,
    },
}

impl fmt::Display for PatternElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text { value } => f.write_str(value),
            Self::Placeholder { name } => write!(f, "{{{name}}}"),
        }
    }
}

/// Stable identity of a node across clones of a tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeKey {
    /// The resource of `language`.
    Resource {
        /// Language tag of the resource.
        language: String,
    },
    /// Message `id` in the resource of `language`.
    Message {
        /// Language tag of the owning resource.
        language: String,
        /// Message id.
        id: String,
    },
    /// The pattern of `message` in the resource of `language`.
    Pattern {
        /// Language tag of the owning resource.
        language: String,
        /// Id of the owning message.
        message: String,
    },
}

impl NodeKey {
    /// Returns the kind of node this key points to.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Resource { .. } => NodeKind::Resource,
            Self::Message { .. } => NodeKind::Message,
            Self::Pattern { .. } => NodeKind::Pattern,
        }
    }

    /// Returns the language tag of the resource owning the node.
    #[must_use]
    pub fn language(&self) -> &str {
        match self {
            Self::Resource { language }
            | Self::Message { language, .. }
            | Self::Pattern { language, .. } => language,
        }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resource { language } => write!(f, "{language}"),
            Self::Message { language, id } => write!(f, "{language}/{id}"),
            Self::Pattern { language, message } => write!(f, "{language}/{message}#pattern"),
        }
    }
}

/// A read-only view of a node together with its [`NodeKey`].
///
/// Dereferences to the node, so rules can read fields directly.
#[derive(Debug)]
pub struct NodeRef<'a, N> {
    node: &'a N,
    key: NodeKey,
}

impl<N> Clone for NodeRef<'_, N> {
    fn clone(&self) -> Self {
        Self {
            node: self.node,
            key: self.key.clone(),
        }
    }
}

impl<'a, N> NodeRef<'a, N> {
    /// Returns the underlying node.
    #[must_use]
    pub fn node(&self) -> &'a N {
        self.node
    }

    /// Returns the key of the node.
    #[must_use]
    pub fn key(&self) -> &NodeKey {
        &self.key
    }
}

impl<N> Deref for NodeRef<'_, N> {
    type Target = N;

    fn deref(&self) -> &N {
        self.node
    }
}

impl<'a> NodeRef<'a, Resource> {
    /// Views a resource.
    #[must_use]
    pub fn resource(resource: &'a Resource) -> Self {
        Self {
            node: resource,
            key: NodeKey::Resource {
                language: resource.language().to_string(),
            },
        }
    }
}

impl<'a> NodeRef<'a, Message> {
    /// Views a message of the resource tagged `language`.
    #[must_use]
    pub fn message(language: &str, message: &'a Message) -> Self {
        Self {
            node: message,
            key: NodeKey::Message {
                language: language.to_string(),
                id: message.id().to_string(),
            },
        }
    }

    /// Views the pattern of this message.
    #[must_use]
    pub fn pattern(&self) -> NodeRef<'a, Pattern> {
        NodeRef {
            node: &self.node.pattern,
            key: NodeKey::Pattern {
                language: self.key.language().to_string(),
                message: self.node.id().to_string(),
            },
        }
    }
}

/// Resolves `key` to the lint list of the node it identifies.
pub(crate) fn lint_list_mut<'t>(
    resources: &'t mut [Resource],
    key: &NodeKey,
) -> Option<&'t mut Vec<LintReport>> {
    let resource = resources
        .iter_mut()
        .find(|r| r.language() == key.language())?;
    match key {
        NodeKey::Resource { .. } => Some(&mut resource.lint),
        NodeKey::Message { id, .. } => resource.message_mut(id).map(|m| &mut m.lint),
        NodeKey::Pattern { message, .. } => {
            resource.message_mut(message).map(|m| &mut m.pattern.lint)
        }
    }
}
