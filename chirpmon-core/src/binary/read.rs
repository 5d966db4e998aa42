use chirpmon_types::HEADER_SIZE;

pub fn read_u8_local(
    buf: &[u8; HEADER_SIZE],
    off: &mut usize,
) -> u8 {
    let v = buf[*off];
    *off += 1;
    v
}

pub fn read_u16_local(
    buf: &[u8; HEADER_SIZE],
    off: &mut usize,
) -> u16 {
    let b = [buf[*off], buf[*off + 1]];
    *off += 2;
    u16::from_le_bytes(b)
}

pub fn read_i16_local(
    buf: &[u8; HEADER_SIZE],
    off: &mut usize,
) -> i16 {
    read_u16_local(buf, off) as i16
}
