//! Search filter for the board.

use crate::model::item::Item;

/// Items whose company, position, contact or notes contain `query`,
/// case-insensitively. A blank query matches everything.
pub fn filter_items<'a>(items: &'a [Item], query: &str) -> Vec<&'a Item> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|item| item.matches_lowercase(&needle))
        .collect()
}
