//! The published snapshot wire frame:
//! `[magic=4][version=1][timestamp=8 BE millis][doc-count=varint][document*]`,
//! each document `[field-count=varint]([name-len=varint][name][flags=1][value-len=varint][value])*`.
//!
//! Modelled on a length-prefixed WAL append format, generalized from a
//! single `bincode`-opaque record to this crate's explicit,
//! cross-implementation-readable field list.

use std::io::{self, Read, Write};

use chrono::{DateTime, TimeZone, Utc};

use crate::index::descriptor;
use crate::packer::varint;
use crate::schema::{Document, FieldRegistry};
use crate::storage::StoredDocument;

pub const MAGIC: [u8; 4] = *b"NXIX";
pub const FORMAT_VERSION: u8 = 1;

const FLAG_STORED: u8 = 0b001;
const FLAG_INDEXED: u8 = 0b010;
const FLAG_TOKENIZED: u8 = 0b100;

#[derive(Debug, Clone, PartialEq)]
pub struct WireField {
    pub name: String,
    pub flags: u8,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WireDocument {
    pub fields: Vec<WireField>,
}

impl WireDocument {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.value.as_str())
    }
}

pub fn write_snapshot<W: Write>(
    w: &mut W,
    timestamp: DateTime<Utc>,
    documents: &[StoredDocument],
    fields: &FieldRegistry,
) -> io::Result<()> {
    let wire_docs: Vec<WireDocument> = documents.iter().filter_map(|d| to_wire(d, fields)).collect();

    w.write_all(&MAGIC)?;
    w.write_all(&[FORMAT_VERSION])?;
    w.write_all(&(timestamp.timestamp_millis() as u64).to_be_bytes())?;
    varint::write_u64(w, wire_docs.len() as u64)?;
    for doc in &wire_docs {
        varint::write_u64(w, doc.fields.len() as u64)?;
        for field in &doc.fields {
            varint::write_u64(w, field.name.len() as u64)?;
            w.write_all(field.name.as_bytes())?;
            w.write_all(&[field.flags])?;
            let value_bytes = field.value.as_bytes();
            varint::write_u64(w, value_bytes.len() as u64)?;
            w.write_all(value_bytes)?;
        }
    }
    Ok(())
}

pub fn read_snapshot<R: Read>(r: &mut R) -> io::Result<(DateTime<Utc>, Vec<WireDocument>)> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "bad snapshot magic"));
    }
    let mut version = [0u8; 1];
    r.read_exact(&mut version)?;
    if version[0] != FORMAT_VERSION {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "unsupported snapshot version",
        ));
    }
    let mut millis_buf = [0u8; 8];
    r.read_exact(&mut millis_buf)?;
    let millis = u64::from_be_bytes(millis_buf) as i64;
    let timestamp = Utc
        .timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "bad snapshot timestamp"))?;

    let doc_count = varint::read_u64(r)?;
    let mut documents = Vec::with_capacity(doc_count as usize);
    for _ in 0..doc_count {
        let field_count = varint::read_u64(r)?;
        let mut doc_fields = Vec::with_capacity(field_count as usize);
        for _ in 0..field_count {
            let name_len = varint::read_u64(r)? as usize;
            let mut name_buf = vec![0u8; name_len];
            r.read_exact(&mut name_buf)?;
            let name = String::from_utf8(name_buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

            let mut flags_buf = [0u8; 1];
            r.read_exact(&mut flags_buf)?;

            let value_len = varint::read_u64(r)? as usize;
            let mut value_buf = vec![0u8; value_len];
            r.read_exact(&mut value_buf)?;
            let value = String::from_utf8(value_buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

            doc_fields.push(WireField {
                name,
                flags: flags_buf[0],
                value,
            });
        }
        documents.push(WireDocument { fields: doc_fields });
    }
    Ok((timestamp, documents))
}

fn to_wire(doc: &StoredDocument, fields: &FieldRegistry) -> Option<WireDocument> {
    match doc {
        StoredDocument::Live(document) => Some(WireDocument {
            fields: live_wire_fields(document, fields),
        }),
        StoredDocument::Tombstone { uinfo } => Some(WireDocument {
            fields: vec![WireField {
                name: "DELETED".to_string(),
                flags: FLAG_STORED | FLAG_INDEXED,
                value: uinfo.clone(),
            }],
        }),
        StoredDocument::Descriptor { version, repository_id } => Some(WireDocument {
            fields: vec![WireField {
                name: "IDXINFO".to_string(),
                flags: FLAG_STORED | FLAG_INDEXED,
                value: descriptor::encode_idxinfo(*version, repository_id),
            }],
        }),
        StoredDocument::GroupSet { .. } => None,
    }
}

fn live_wire_fields(document: &Document, fields: &FieldRegistry) -> Vec<WireField> {
    let keys: Vec<&str> = document.keys().collect();
    let mut out = Vec::new();
    for key in keys {
        let tokenized = fields.find_by_storage_key(key).map(|f| !f.keyword).unwrap_or(false);
        let flags = FLAG_STORED | FLAG_INDEXED | if tokenized { FLAG_TOKENIZED } else { 0 };
        for value in document.get_all(key) {
            out.push(WireField {
                name: key.to_string(),
                flags,
                value: value.clone(),
            });
        }
    }
    out
}
