//! Rule identity hashing.
//!
//! Two rules in the same rule set are the same rule slot when their protocol
//! and port range match. The fingerprint is a 64-bit FNV-1a hash of
//! `"<protocol>-<port_range>"`; parties do not contribute.

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Fingerprint of a rule's identity key.
#[must_use]
pub fn fingerprint(protocol: &str, port_range: &str) -> u64 {
    let key = format!("{protocol}-{port_range}");
    fnv1a(key.as_bytes())
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv1a_reference_vectors() {
        assert_eq!(fnv1a(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a(b"a"), 0xaf63_dc4c_8601_ec8c);
        assert_eq!(fnv1a(b"foobar"), 0x8594_4171_f739_67e8);
    }

    #[test]
    fn equal_keys_fingerprint_equal() {
        assert_eq!(fingerprint("tcp", "22"), fingerprint("tcp", "22"));
    }

    #[test]
    fn protocol_and_port_both_count() {
        assert_ne!(fingerprint("tcp", "22"), fingerprint("udp", "22"));
        assert_ne!(fingerprint("tcp", "22"), fingerprint("tcp", "80"));
        assert_ne!(fingerprint("tcp", "0"), fingerprint("tcp", "all"));
    }
}
