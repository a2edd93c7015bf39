pub mod angel;

pub use angel::{
    Angel, Attribute, ITEM_SEPARATOR, ModelError, Status, compare_ids, join_items, split_items,
};
