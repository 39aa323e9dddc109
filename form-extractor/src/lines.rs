use block_model::{Block, BlockType};

/// Texts of all LINE blocks in collection order.
///
/// A LINE without text contributes an empty string so that positions stay
/// aligned with the engine's line numbering.
pub fn line_texts(blocks: &[Block]) -> Vec<&str> {
    blocks
        .iter()
        .filter(|b| b.block_type == BlockType::Line)
        .map(|b| b.text.as_deref().unwrap_or_default())
        .collect()
}
