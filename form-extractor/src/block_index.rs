use block_model::Block;
use indexmap::IndexMap;

/// Insertion-ordered id -> block lookup borrowing from the caller's collection.
///
/// Re-inserting an id replaces the block but keeps the position of the first insert.
#[derive(Debug, Clone, Default)]
pub struct BlockLookup<'a>(IndexMap<&'a str, &'a Block>);

impl<'a> BlockLookup<'a> {
    fn insert(&mut self, block: &'a Block) {
        self.0.insert(block.id.as_str(), block);
    }

    pub fn get(&self, id: &str) -> Option<&'a Block> {
        self.0.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    /// Blocks in first-insert order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Block> + '_ {
        self.0.values().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The three lookups one extraction runs against.
#[derive(Debug, Clone, Default)]
pub struct BlockIndex<'a> {
    pub keys: BlockLookup<'a>,
    pub values: BlockLookup<'a>,
    pub all: BlockLookup<'a>,
}

impl<'a> BlockIndex<'a> {
    /// Single pass over `blocks`. Every block lands in `all`; `KEY_VALUE_SET`
    /// blocks also land in `keys` or `values` depending on their `KEY` role.
    pub fn build(blocks: &'a [Block]) -> Self {
        let mut index = BlockIndex::default();
        for block in blocks {
            index.all.insert(block);
            if block.is_key() {
                index.keys.insert(block);
            } else if block.is_value() {
                index.values.insert(block);
            }
        }
        tracing::trace!(
            blocks = index.all.len(),
            keys = index.keys.len(),
            values = index.values.len(),
            "block index built"
        );
        index
    }
}

/// Tuple-shaped variant of [`BlockIndex::build`]: `(keys, values, all)`.
pub fn build_index(blocks: &[Block]) -> (BlockLookup<'_>, BlockLookup<'_>, BlockLookup<'_>) {
    let BlockIndex { keys, values, all } = BlockIndex::build(blocks);
    (keys, values, all)
}
