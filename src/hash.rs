const OFFSET_BASIS: u64 = 14695981039346656037;
const PRIME: u64 = 1099511628211;

/// Number of children of every tree node.
pub const CHILD_COUNT: usize = 8;
/// Number of hash bits consumed per tree level.
pub const SHIFT: u32 = 3;

/// Hashes a key with 64-bit FNV-1a over its Unicode code points.
pub fn hash_key(key: &str) -> u64 {
    key.chars().fold(OFFSET_BASIS, |hash, character| {
        (hash ^ u64::from(character)).wrapping_mul(PRIME)
    })
}

/// Returns a child index for the lowest routing digit of a remaining hash.
pub fn child_index(remaining: u64) -> usize {
    (remaining % CHILD_COUNT as u64) as usize
}

/// Drops the routing digit consumed at the current level.
pub fn next_digits(remaining: u64) -> u64 {
    remaining >> SHIFT
}
