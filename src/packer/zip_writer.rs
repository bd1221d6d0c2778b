//! Minimal stored-method ZIP writer for the legacy `.zip` publication
//! artifact. Symmetric to the central-directory reader in
//! `schema::creators::jar`: no compression, one local header and one
//! central-directory record per entry, so no crate beyond `crc32fast`
//! (already part of the dependency stack) is needed.

use std::io::{self, Write};

use crc32fast::Hasher;

struct Entry {
    name: String,
    data: Vec<u8>,
    crc32: u32,
    local_header_offset: u32,
}

pub fn write_zip<W: Write>(w: &mut W, entries: &[(&str, &[u8])]) -> io::Result<()> {
    let mut written = Vec::with_capacity(entries.len());
    let mut offset: u32 = 0;

    for (name, data) in entries {
        let mut hasher = Hasher::new();
        hasher.update(data);
        let crc32 = hasher.finalize();

        write_local_header(w, name, data.len() as u32, crc32)?;
        w.write_all(data)?;

        let header_len = 30 + name.len() as u32;
        written.push(Entry {
            name: name.to_string(),
            data: data.to_vec(),
            crc32,
            local_header_offset: offset,
        });
        offset += header_len + data.len() as u32;
    }

    let central_dir_start = offset;
    let mut central_dir_size: u32 = 0;
    for entry in &written {
        let before = central_dir_size;
        write_central_directory_header(w, entry)?;
        central_dir_size = before + 46 + entry.name.len() as u32;
    }

    write_eocd(w, written.len() as u16, central_dir_size, central_dir_start)?;
    Ok(())
}

fn write_local_header<W: Write>(w: &mut W, name: &str, size: u32, crc32: u32) -> io::Result<()> {
    w.write_all(&0x04034b50u32.to_le_bytes())?;
    w.write_all(&20u16.to_le_bytes())?; // version needed
    w.write_all(&0u16.to_le_bytes())?; // flags
    w.write_all(&0u16.to_le_bytes())?; // method: stored
    w.write_all(&0u16.to_le_bytes())?; // mod time
    w.write_all(&0u16.to_le_bytes())?; // mod date
    w.write_all(&crc32.to_le_bytes())?;
    w.write_all(&size.to_le_bytes())?; // compressed size
    w.write_all(&size.to_le_bytes())?; // uncompressed size
    w.write_all(&(name.len() as u16).to_le_bytes())?;
    w.write_all(&0u16.to_le_bytes())?; // extra field length
    w.write_all(name.as_bytes())?;
    Ok(())
}

fn write_central_directory_header<W: Write>(w: &mut W, entry: &Entry) -> io::Result<()> {
    w.write_all(&0x02014b50u32.to_le_bytes())?;
    w.write_all(&20u16.to_le_bytes())?; // version made by
    w.write_all(&20u16.to_le_bytes())?; // version needed
    w.write_all(&0u16.to_le_bytes())?; // flags
    w.write_all(&0u16.to_le_bytes())?; // method: stored
    w.write_all(&0u16.to_le_bytes())?; // mod time
    w.write_all(&0u16.to_le_bytes())?; // mod date
    w.write_all(&entry.crc32.to_le_bytes())?;
    w.write_all(&(entry.data.len() as u32).to_le_bytes())?;
    w.write_all(&(entry.data.len() as u32).to_le_bytes())?;
    w.write_all(&(entry.name.len() as u16).to_le_bytes())?;
    w.write_all(&0u16.to_le_bytes())?; // extra field length
    w.write_all(&0u16.to_le_bytes())?; // comment length
    w.write_all(&0u16.to_le_bytes())?; // disk number start
    w.write_all(&0u16.to_le_bytes())?; // internal attributes
    w.write_all(&0u32.to_le_bytes())?; // external attributes
    w.write_all(&entry.local_header_offset.to_le_bytes())?;
    w.write_all(entry.name.as_bytes())?;
    Ok(())
}

fn write_eocd<W: Write>(
    w: &mut W,
    entry_count: u16,
    central_dir_size: u32,
    central_dir_offset: u32,
) -> io::Result<()> {
    w.write_all(&0x06054b50u32.to_le_bytes())?;
    w.write_all(&0u16.to_le_bytes())?; // disk number
    w.write_all(&0u16.to_le_bytes())?; // disk with central directory
    w.write_all(&entry_count.to_le_bytes())?;
    w.write_all(&entry_count.to_le_bytes())?;
    w.write_all(&central_dir_size.to_le_bytes())?;
    w.write_all(&central_dir_offset.to_le_bytes())?;
    w.write_all(&0u16.to_le_bytes())?; // comment length
    Ok(())
}
