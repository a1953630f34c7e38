//! Generated element ids.

use rand::Rng;

use crate::document::Document;

/// Prefix of generated ids. Content using it for its own ids is rejected on load.
pub const AUTO_ID_PREFIX: &str = "auto-";

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 10;

/// A fresh id not used by any element of `doc`.
pub fn generate_id(doc: &Document) -> String {
    let mut rng = rand::rng();
    loop {
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
            .collect();
        let id = format!("{}{}", AUTO_ID_PREFIX, suffix);
        if doc.find_by_id(&id).is_none() {
            return id;
        }
    }
}

pub fn is_generated(id: &str) -> bool {
    id.starts_with(AUTO_ID_PREFIX)
}
