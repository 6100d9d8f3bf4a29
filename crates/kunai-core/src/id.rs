//! Opaque user identifiers

use rand::{distr::Alphanumeric, Rng};

/// Length of generated user ids
const ID_LEN: usize = 21;

/// Generate a new opaque user id (21 alphanumeric characters)
pub fn new_user_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LEN)
        .map(char::from)
        .collect()
}
