//! Reconstruct form fields from the flat block graph of a document-analysis result.
//!
//! Blocks reference each other by id only. [`block_index::BlockIndex`] borrows
//! the caller's collection and exposes three id lookups; [`key_values`] walks
//! key blocks through their VALUE and CHILD edges to build a
//! [`field_values::FieldValues`] multi-map. [`template`] holds the
//! document-type specific extractors that read LINE texts instead.

pub mod error;
pub mod block_index;
pub mod text;
pub mod normalize;
pub mod field_values;
pub mod key_values;
pub mod lines;
pub mod template;

use block_model::Block;

pub use block_index::{build_index, BlockIndex, BlockLookup};
pub use error::{ExtractError, Lookup};
pub use field_values::{FieldValues, FlatFields};
pub use key_values::{find_value_block, reconstruct, reconstruct_with, resolve_pair, KeyValuePair};
pub use lines::line_texts;
pub use normalize::normalize_key;
pub use template::{LineRule, LineTemplate, RuleTemplate, TemplateRecord, TemplateRegistry};
pub use text::resolve_text;

/// Index `blocks` and reconstruct every key/value pair in one call.
pub fn extract_key_values(blocks: &[Block]) -> Result<FieldValues, ExtractError> {
    let index = BlockIndex::build(blocks);
    reconstruct(&index)
}
