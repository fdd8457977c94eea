use serde::Serialize;
use std::num::Wrapping;

/// A progressive version of djb2: hashing continues from the query key `h` as if the
/// serialized variables were appended to it.
pub fn progressive_hash<V: Serialize>(h: u32, x: &V) -> Result<u64, bincode::Error> {
    let x = bincode::serialize(x)?;

    let mut h = Wrapping(h as u64);

    for byte in x {
        h = (h << 5) + h + Wrapping(byte as u64)
    }

    Ok(h.0)
}

#[cfg(test)]
mod tests {
    use super::progressive_hash;

    #[test]
    fn same_variables_same_key() {
        let a = progressive_hash(7, &("1".to_string(), 5i64)).unwrap();
        let b = progressive_hash(7, &("1".to_string(), 5i64)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn key_depends_on_query_and_variables() {
        let base = progressive_hash(7, &"1").unwrap();
        assert_ne!(base, progressive_hash(8, &"1").unwrap());
        assert_ne!(base, progressive_hash(7, &"2").unwrap());
    }
}
