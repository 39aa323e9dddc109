use block_model::{Block, RelationshipType};

use crate::block_index::{BlockIndex, BlockLookup};
use crate::error::{ExtractError, Lookup};
use crate::field_values::FieldValues;
use crate::normalize::normalize_key;
use crate::text::resolve_text;

/// A reconstructed form field before it is merged into [`FieldValues`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValuePair {
    pub key_id: String,
    /// Normalized field name.
    pub key: String,
    /// Trimmed value text.
    pub value: String,
}

/// Paired value block of `key_block`.
///
/// Every VALUE target is resolved and the last one wins; a key pointing at
/// several value blocks therefore reports only the final one.
pub fn find_value_block<'a>(
    key_block: &Block,
    values: &BlockLookup<'a>,
) -> Result<&'a Block, ExtractError> {
    let mut found = None;
    for rel in key_block.relationships_of(RelationshipType::Value) {
        for value_id in &rel.ids {
            let block = values.get(value_id).ok_or_else(|| ExtractError::UnresolvedReference {
                from_id: key_block.id.clone(),
                target_id: value_id.clone(),
                lookup: Lookup::Value,
            })?;
            found = Some(block);
        }
    }
    found.ok_or_else(|| ExtractError::MissingValueLink { key_id: key_block.id.clone() })
}

/// Resolve one key block into its normalized name and trimmed value.
pub fn resolve_pair(key_block: &Block, index: &BlockIndex<'_>) -> Result<KeyValuePair, ExtractError> {
    let value_block = find_value_block(key_block, &index.values)?;
    let key_text = resolve_text(key_block, &index.all)?;
    let value_text = resolve_text(value_block, &index.all)?;
    Ok(KeyValuePair {
        key_id: key_block.id.clone(),
        key: normalize_key(&key_text),
        value: value_text.trim().to_string(),
    })
}

/// Walk every key block in index order and collect its value under the normalized key.
///
/// Stops at the first structural inconsistency.
pub fn reconstruct(index: &BlockIndex<'_>) -> Result<FieldValues, ExtractError> {
    reconstruct_with(index, |key_id| {
        Err(ExtractError::MissingValueLink { key_id: key_id.to_string() })
    })
}

/// [`reconstruct`] with a caller-chosen reaction to key blocks lacking a VALUE link.
///
/// `on_missing` gets the key id; `Ok(())` drops that key and continues, an error
/// aborts the walk. Unresolved references always abort.
pub fn reconstruct_with<F>(index: &BlockIndex<'_>, mut on_missing: F) -> Result<FieldValues, ExtractError>
where
    F: FnMut(&str) -> Result<(), ExtractError>,
{
    let mut fields = FieldValues::new();
    for key_block in index.keys.iter() {
        match resolve_pair(key_block, index) {
            Ok(pair) => fields.push(pair.key, pair.value),
            Err(ExtractError::MissingValueLink { key_id }) => on_missing(&key_id)?,
            Err(e) => return Err(e),
        }
    }
    tracing::debug!(keys = fields.len(), values = fields.value_count(), "key values reconstructed");
    Ok(fields)
}
