use chirpmon_types::HEADER_SIZE;

pub fn write_u8_local(
    buf: &mut [u8; HEADER_SIZE],
    off: &mut usize,
    val: u8,
) {
    buf[*off] = val;
    *off += 1;
}

pub fn write_u16_local(
    buf: &mut [u8; HEADER_SIZE],
    off: &mut usize,
    val: u16,
) {
    buf[*off..*off + 2].copy_from_slice(&val.to_le_bytes());
    *off += 2;
}

pub fn write_i16_local(
    buf: &mut [u8; HEADER_SIZE],
    off: &mut usize,
    val: i16,
) {
    write_u16_local(buf, off, val as u16);
}
