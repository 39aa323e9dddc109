//! Shared models used across crates

use serde::{Deserialize, Serialize};

/// Structural kind of a block as reported by the analysis engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockType {
    Page,
    Line,
    Word,
    SelectionElement,
    KeyValueSet,
    Table,
    Cell,
    MergedCell,
    Signature,
    /// Any tag this model does not know about. Such blocks are indexed but never rendered.
    #[serde(other)]
    Other,
}

/// Role of a `KEY_VALUE_SET` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Key,
    Value,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionStatus {
    Selected,
    NotSelected,
    /// Unrecognized status; treated as not selected.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    /// Key block -> paired value block(s).
    Value,
    /// Composite block -> the words / selection marks it is made of.
    Child,
    #[serde(other)]
    Other,
}

/// Typed, ordered edge from one block to others, by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Relationship {
    #[serde(rename = "Type")]
    pub kind: RelationshipType,
    #[serde(default)]
    pub ids: Vec<String>,
}

impl Relationship {
    pub fn new<I, S>(kind: RelationshipType, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { kind, ids: ids.into_iter().map(Into::into).collect() }
    }
}

/// One recognized structural unit of an analysis result.
///
/// Blocks never point at each other directly; every edge is an id list in
/// [`Block::relationships`], so a collection of blocks is a plain arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Block {
    pub id: String,
    pub block_type: BlockType,
    /// Only meaningful on `KEY_VALUE_SET`; no `KEY` entry means the block is a value.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entity_types: Vec<EntityType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,
    /// Literal text of `WORD` and `LINE` blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_status: Option<SelectionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    /// 1-based page number for multi-page results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl Block {
    pub fn new(id: impl Into<String>, block_type: BlockType) -> Self {
        Self {
            id: id.into(),
            block_type,
            entity_types: Vec::new(),
            relationships: Vec::new(),
            text: None,
            selection_status: None,
            confidence: None,
            page: None,
        }
    }

    pub fn word(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, BlockType::Word).with_text(text)
    }

    pub fn line(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, BlockType::Line).with_text(text)
    }

    pub fn selection(id: impl Into<String>, status: SelectionStatus) -> Self {
        let mut b = Self::new(id, BlockType::SelectionElement);
        b.selection_status = Some(status);
        b
    }

    /// A `KEY_VALUE_SET` block tagged `KEY`.
    pub fn key(id: impl Into<String>) -> Self {
        Self::new(id, BlockType::KeyValueSet).with_entity_types([EntityType::Key])
    }

    /// A `KEY_VALUE_SET` block tagged `VALUE`.
    pub fn value(id: impl Into<String>) -> Self {
        Self::new(id, BlockType::KeyValueSet).with_entity_types([EntityType::Value])
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_entity_types(mut self, types: impl IntoIterator<Item = EntityType>) -> Self {
        self.entity_types = types.into_iter().collect();
        self
    }

    pub fn with_relationship<I, S>(mut self, kind: RelationshipType, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relationships.push(Relationship::new(kind, ids));
        self
    }

    pub fn with_children<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_relationship(RelationshipType::Child, ids)
    }

    pub fn with_values<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_relationship(RelationshipType::Value, ids)
    }

    /// True for a `KEY_VALUE_SET` block whose roles include `KEY`.
    pub fn is_key(&self) -> bool {
        self.block_type == BlockType::KeyValueSet && self.entity_types.contains(&EntityType::Key)
    }

    /// True for any other `KEY_VALUE_SET` block.
    pub fn is_value(&self) -> bool {
        self.block_type == BlockType::KeyValueSet && !self.entity_types.contains(&EntityType::Key)
    }

    pub fn is_selected(&self) -> bool {
        self.selection_status == Some(SelectionStatus::Selected)
    }

    /// Relationships of one kind, in declaration order.
    pub fn relationships_of(&self, kind: RelationshipType) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter().filter(move |r| r.kind == kind)
    }

    pub fn has_relationship(&self, kind: RelationshipType) -> bool {
        self.relationships_of(kind).next().is_some()
    }
}

/// Top-level analysis response: the flat block collection plus engine metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AnalysisDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_metadata: Option<DocumentMetadata>,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DocumentMetadata {
    #[serde(default)]
    pub pages: u32,
}

impl AnalysisDocument {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { document_metadata: None, blocks }
    }

    /// Decode the engine's JSON response body.
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}
