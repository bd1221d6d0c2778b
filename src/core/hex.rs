//! Lower-case hex encoding, shared by checksum computation in
//! `schema::creators::minimal` and `packer::packer`.

pub fn encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
