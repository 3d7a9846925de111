//! One-time verification code generation for the gift flow's code-entry
//! step. Fixed-length numeric string, digits 0-9.

use rand::Rng;

pub fn generate(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length).map(|_| char::from(b'0' + rng.gen_range(0..10))).collect()
}
