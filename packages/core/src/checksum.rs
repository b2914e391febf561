use crc16::*;

/// Computes the XOR "checksum" used to terminate every serial-API frame
/// (see [`crate::definitions`] frame layout): `0xFF` folded with every byte
/// from `length` through the end of the payload.
pub fn xor_sum(data: &[u8]) -> u8 {
    data.iter().fold(0xff, |acc, x| acc ^ x)
}

/// CRC16/AUG-CCITT, used by the CRC16 Encapsulation command class.
pub fn crc16(data: &[u8]) -> u16 {
    State::<AUG_CCITT>::calculate(data)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_xor_sum() {
        let input = hex::decode("030002").unwrap();
        assert_eq!(xor_sum(&input), 0xfe);
    }

    #[test]
    fn test_crc16() {
        assert_eq!(crc16(&[]), 0x1d0f);
        assert_eq!(crc16(b"123456789"), 0xe5cc);
    }
}
