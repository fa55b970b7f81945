use super::*;

#[test]
fn fnv_split_writes_match_single_write() {
    let mut a = Fnv1a64::new_default();
    a.write_bytes(b"lamp");
    let mut b = Fnv1a64::new_default();
    b.write_u8(b'l');
    b.write_bytes(b"amp");
    assert_eq!(a.finish(), b.finish());
}

#[test]
fn fnv_empty_is_offset_basis() {
    assert_eq!(Fnv1a64::new_default().finish(), Fnv1a64::OFFSET_BASIS);
}
