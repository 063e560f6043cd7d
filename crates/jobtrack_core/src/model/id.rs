//! Item id generation.
//!
//! Ids are short and opaque: `id_` plus seven base-36 characters taken from a
//! v4 UUID's random bits. They are not meant to be unguessable.

use crate::model::item::ItemId;
use std::collections::HashSet;
use uuid::Uuid;

const ID_PREFIX: &str = "id_";
const ID_SUFFIX_LEN: usize = 7;
const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates a fresh item id.
pub fn generate_id() -> ItemId {
    let mut bits = Uuid::new_v4().as_u128();
    let mut id = String::with_capacity(ID_PREFIX.len() + ID_SUFFIX_LEN);
    id.push_str(ID_PREFIX);
    for _ in 0..ID_SUFFIX_LEN {
        id.push(char::from(BASE36_DIGITS[(bits % 36) as usize]));
        bits /= 36;
    }
    id
}

/// Generates an id not present in `taken`, and records it there.
pub fn generate_unique_id(taken: &mut HashSet<ItemId>) -> ItemId {
    loop {
        let id = generate_id();
        if taken.insert(id.clone()) {
            return id;
        }
    }
}

/// Uniform value in `[0, 1)`.
pub(crate) fn random_unit() -> f64 {
    let bits = (Uuid::new_v4().as_u128() & u128::from(u32::MAX)) as u32;
    f64::from(bits) / (f64::from(u32::MAX) + 1.0)
}
