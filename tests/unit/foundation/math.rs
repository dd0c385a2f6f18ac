use super::*;

#[test]
fn fnv1a64_known_vector() {
    let mut h = Fnv1a64::new_default();
    h.write_bytes(b"a");
    assert_eq!(h.finish(), 0xaf63_dc4c_8601_ec8c);
}

#[test]
fn hash_unit_is_deterministic_and_in_range() {
    for i in 0..64 {
        let v = hash_unit(42, i, -i, 7);
        assert!((0.0..1.0).contains(&v));
        assert_eq!(v, hash_unit(42, i, -i, 7));
    }
    assert_ne!(hash_unit(1, 0, 0, 0), hash_unit(2, 0, 0, 0));
}

#[test]
fn premultiply_roundtrip_is_exact_for_opaque_and_zeroes_transparent() {
    let mut px = vec![100, 50, 200, 255, 10, 20, 30, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![100, 50, 200, 255, 0, 0, 0, 0]);
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![100, 50, 200, 255, 0, 0, 0, 0]);
}

#[test]
fn premultiply_half_alpha() {
    let mut px = vec![100, 50, 200, 128];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(
        px,
        vec![
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128
        ]
    );
}
