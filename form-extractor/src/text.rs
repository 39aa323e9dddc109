use block_model::{Block, BlockType, RelationshipType};

use crate::block_index::BlockLookup;
use crate::error::{ExtractError, Lookup};

/// Marker emitted for a ticked selection element.
pub const SELECTED_MARK: &str = "X";

/// Concatenate the displayable text of `block` from its CHILD edges.
///
/// Words contribute their text plus one trailing space, selected marks
/// contribute [`SELECTED_MARK`] with no space, everything else nothing.
/// Child order is taken as-is; the result is not trimmed.
pub fn resolve_text(block: &Block, all: &BlockLookup<'_>) -> Result<String, ExtractError> {
    let mut text = String::new();
    for rel in block.relationships_of(RelationshipType::Child) {
        for child_id in &rel.ids {
            let child = all.get(child_id).ok_or_else(|| ExtractError::UnresolvedReference {
                from_id: block.id.clone(),
                target_id: child_id.clone(),
                lookup: Lookup::All,
            })?;
            match child.block_type {
                BlockType::Word => {
                    text.push_str(child.text.as_deref().unwrap_or_default());
                    text.push(' ');
                }
                BlockType::SelectionElement if child.is_selected() => text.push_str(SELECTED_MARK),
                _ => {}
            }
        }
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block_index::BlockIndex;
    use block_model::SelectionStatus;

    #[test]
    fn mixes_words_and_marks_in_child_order() {
        let blocks = vec![
            Block::value("v").with_children(["s", "w1", "l", "w2"]),
            Block::selection("s", SelectionStatus::Selected),
            Block::word("w1", "Yes"),
            Block::line("l", "ignored line"),
            Block::word("w2", "please"),
        ];
        let index = BlockIndex::build(&blocks);
        assert_eq!(resolve_text(&blocks[0], &index.all).unwrap(), "XYes please ");
    }

    #[test]
    fn word_without_text_still_adds_separator() {
        let blocks = vec![Block::value("v").with_children(["w"]), Block::new("w", BlockType::Word)];
        let index = BlockIndex::build(&blocks);
        assert_eq!(resolve_text(&blocks[0], &index.all).unwrap(), " ");
    }
}
