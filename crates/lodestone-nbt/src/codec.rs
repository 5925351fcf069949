use crate::compound::CompoundTag;
use crate::list::ListTag;
use crate::size_tracker::SizeTracker;
use crate::tag::Tag;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use lodestone_common::{LodestoneError, Result};
use std::io::{self, Cursor, Read, Write};

/// Containers nested deeper than this abort the whole decode.
pub const MAX_DEPTH: usize = 512;

// Fixed per-tag weight charged before each payload is read, in bits.
const CHARGE_END: u64 = 64;
const CHARGE_BYTE: u64 = 72;
const CHARGE_SHORT: u64 = 80;
const CHARGE_INT: u64 = 96;
const CHARGE_LONG: u64 = 128;
const CHARGE_FLOAT: u64 = 96;
const CHARGE_DOUBLE: u64 = 128;
const CHARGE_STRING: u64 = 288;
const CHARGE_ARRAY: u64 = 192;
const CHARGE_LIST: u64 = 296;
const CHARGE_COMPOUND: u64 = 384;
const CHARGE_COMPOUND_ENTRY: u64 = 224;
const CHARGE_COMPOUND_OVERWRITE: u64 = 288;

// The length prefix is an unsigned 16-bit byte count; longer strings cannot
// be encoded and must be rejected rather than silently wrapped.
fn write_string<W: Write>(writer: &mut W, value: &str) -> io::Result<()> {
    if value.len() > u16::MAX as usize {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("String too long to encode: {} bytes", value.len()),
        ));
    }
    writer.write_u16::<BigEndian>(value.len() as u16)?;
    writer.write_all(value.as_bytes())
}

fn read_string<R: Read>(reader: &mut R) -> Result<String> {
    let length = reader.read_u16::<BigEndian>()?;
    let mut bytes = vec![0u8; length as usize];
    reader.read_exact(&mut bytes)?;
    String::from_utf8(bytes)
        .map_err(|e| LodestoneError::MalformedStream(format!("invalid UTF-8 string: {}", e)))
}

impl Tag {
    /// Reads one named tag, the root of a stream. A bare End byte here is a
    /// malformed stream, not a terminator.
    pub fn read_named<R: Read>(
        reader: &mut R,
        tracker: &mut SizeTracker,
    ) -> Result<(String, Tag)> {
        let type_id = reader.read_u8()?;
        if type_id == 0 {
            return Err(LodestoneError::MalformedStream(
                "TAG_End found without a TAG_Compound/TAG_List tag preceding it".to_string(),
            ));
        }

        let name = read_string(reader)?;
        tracker.track_string(name.len())?;

        let tag = Tag::read_payload(reader, type_id, 0, tracker)?;
        Ok((name, tag))
    }

    // Dispatch only; every arm lives in its own non-inlined helper so the
    // recursive frames stay small enough for a 512-deep stream on a
    // default-size thread stack.
    fn read_payload<R: Read>(
        reader: &mut R,
        type_id: u8,
        depth: usize,
        tracker: &mut SizeTracker,
    ) -> Result<Tag> {
        match type_id {
            0 => {
                tracker.track(CHARGE_END)?;
                Ok(Tag::End)
            }
            1..=6 => read_scalar(reader, type_id, tracker),
            7 => read_byte_array(reader, tracker),
            8 => read_string_payload(reader, tracker),
            9 => read_list(reader, depth, tracker),
            10 => read_compound(reader, depth, tracker),
            11 => read_int_array(reader, tracker),
            12 => read_long_array(reader, tracker),
            _ => Err(LodestoneError::MalformedStream(format!(
                "Invalid tag type: {}",
                type_id
            ))),
        }
    }

    pub fn write_named<W: Write>(&self, writer: &mut W, name: &str) -> io::Result<()> {
        writer.write_u8(self.get_type_id())?;

        if !matches!(self, Tag::End) {
            write_string(writer, name)?;
        }

        self.write_payload(writer)
    }

    fn write_payload<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        match self {
            Tag::End => Ok(()),
            Tag::Byte(v) => writer.write_i8(*v),
            Tag::Short(v) => writer.write_i16::<BigEndian>(*v),
            Tag::Int(v) => writer.write_i32::<BigEndian>(*v),
            Tag::Long(v) => writer.write_i64::<BigEndian>(*v),
            Tag::Float(v) => writer.write_f32::<BigEndian>(*v),
            Tag::Double(v) => writer.write_f64::<BigEndian>(*v),
            Tag::ByteArray(v) => {
                writer.write_i32::<BigEndian>(v.len() as i32)?;
                for &b in v {
                    writer.write_i8(b)?;
                }
                Ok(())
            }
            Tag::String(v) => write_string(writer, v),
            Tag::List(v) => {
                // 0 element type for empty lists
                writer.write_u8(v.element_type())?;
                writer.write_i32::<BigEndian>(v.len() as i32)?;
                for tag in v {
                    tag.write_payload(writer)?;
                }
                Ok(())
            }
            Tag::Compound(v) => {
                for (key, tag) in v {
                    tag.write_named(writer, key)?;
                }
                writer.write_u8(0)
            }
            Tag::IntArray(v) => {
                writer.write_i32::<BigEndian>(v.len() as i32)?;
                for &i in v {
                    writer.write_i32::<BigEndian>(i)?;
                }
                Ok(())
            }
            Tag::LongArray(v) => {
                writer.write_i32::<BigEndian>(v.len() as i32)?;
                for &l in v {
                    writer.write_i64::<BigEndian>(l)?;
                }
                Ok(())
            }
        }
    }
}

#[inline(never)]
fn read_scalar<R: Read>(reader: &mut R, type_id: u8, tracker: &mut SizeTracker) -> Result<Tag> {
    match type_id {
        1 => {
            tracker.track(CHARGE_BYTE)?;
            Ok(Tag::Byte(reader.read_i8()?))
        }
        2 => {
            tracker.track(CHARGE_SHORT)?;
            Ok(Tag::Short(reader.read_i16::<BigEndian>()?))
        }
        3 => {
            tracker.track(CHARGE_INT)?;
            Ok(Tag::Int(reader.read_i32::<BigEndian>()?))
        }
        4 => {
            tracker.track(CHARGE_LONG)?;
            Ok(Tag::Long(reader.read_i64::<BigEndian>()?))
        }
        5 => {
            tracker.track(CHARGE_FLOAT)?;
            Ok(Tag::Float(reader.read_f32::<BigEndian>()?))
        }
        _ => {
            tracker.track(CHARGE_DOUBLE)?;
            Ok(Tag::Double(reader.read_f64::<BigEndian>()?))
        }
    }
}

#[inline(never)]
fn read_byte_array<R: Read>(reader: &mut R, tracker: &mut SizeTracker) -> Result<Tag> {
    tracker.track(CHARGE_ARRAY)?;
    let length = read_array_length(reader)?;
    tracker.track(8 * length as u64)?;
    let mut bytes = Vec::with_capacity(length);
    for _ in 0..length {
        bytes.push(reader.read_i8()?);
    }
    Ok(Tag::ByteArray(bytes))
}

#[inline(never)]
fn read_string_payload<R: Read>(reader: &mut R, tracker: &mut SizeTracker) -> Result<Tag> {
    tracker.track(CHARGE_STRING)?;
    let value = read_string(reader)?;
    tracker.track_string(value.len())?;
    Ok(Tag::String(value))
}

#[inline(never)]
fn read_list<R: Read>(reader: &mut R, depth: usize, tracker: &mut SizeTracker) -> Result<Tag> {
    tracker.track(CHARGE_LIST)?;
    if depth >= MAX_DEPTH {
        return Err(LodestoneError::DepthExceeded(MAX_DEPTH));
    }

    let element_type = reader.read_u8()?;
    let length = read_array_length(reader)?;
    if element_type == 0 && length > 0 {
        return Err(LodestoneError::MalformedStream(
            "Missing type on ListTag".to_string(),
        ));
    }

    tracker.track(32 * length as u64)?;
    let mut elements = Vec::with_capacity(length);
    for _ in 0..length {
        elements.push(Tag::read_payload(reader, element_type, depth + 1, tracker)?);
    }
    Ok(Tag::List(ListTag::from_raw(elements, element_type)))
}

#[inline(never)]
fn read_compound<R: Read>(reader: &mut R, depth: usize, tracker: &mut SizeTracker) -> Result<Tag> {
    tracker.track(CHARGE_COMPOUND)?;
    if depth >= MAX_DEPTH {
        return Err(LodestoneError::DepthExceeded(MAX_DEPTH));
    }

    let mut compound = CompoundTag::new();
    loop {
        let entry_type = reader.read_u8()?;
        if entry_type == 0 {
            break;
        }

        let key = read_string(reader)?;
        tracker.track(CHARGE_COMPOUND_ENTRY + 16 * key.len() as u64)?;

        let value = Tag::read_payload(reader, entry_type, depth + 1, tracker)?;
        if compound.insert(key, value).is_some() {
            tracker.track(CHARGE_COMPOUND_OVERWRITE)?;
        }
    }
    Ok(Tag::Compound(compound))
}

#[inline(never)]
fn read_int_array<R: Read>(reader: &mut R, tracker: &mut SizeTracker) -> Result<Tag> {
    tracker.track(CHARGE_ARRAY)?;
    let length = read_array_length(reader)?;
    tracker.track(32 * length as u64)?;
    let mut ints = Vec::with_capacity(length);
    for _ in 0..length {
        ints.push(reader.read_i32::<BigEndian>()?);
    }
    Ok(Tag::IntArray(ints))
}

#[inline(never)]
fn read_long_array<R: Read>(reader: &mut R, tracker: &mut SizeTracker) -> Result<Tag> {
    tracker.track(CHARGE_ARRAY)?;
    let length = read_array_length(reader)?;
    tracker.track(64 * length as u64)?;
    let mut longs = Vec::with_capacity(length);
    for _ in 0..length {
        longs.push(reader.read_i64::<BigEndian>()?);
    }
    Ok(Tag::LongArray(longs))
}

fn read_array_length<R: Read>(reader: &mut R) -> Result<usize> {
    let length = reader.read_i32::<BigEndian>()?;
    if length < 0 {
        return Err(LodestoneError::MalformedStream(format!(
            "Negative element count: {}",
            length
        )));
    }
    Ok(length as usize)
}

/// A complete NBT stream: one root tag and its outer name. The name is
/// conventionally empty for structure files.
pub struct NbtFile {
    pub root: Tag,
    pub name: String,
}

impl NbtFile {
    pub fn new(name: String, root: Tag) -> Self {
        NbtFile { root, name }
    }

    pub fn read<R: Read>(reader: &mut R, tracker: &mut SizeTracker) -> Result<Self> {
        let (name, root) = Tag::read_named(reader, tracker)?;
        Ok(NbtFile { root, name })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.root.write_named(writer, &self.name)
    }

    pub fn read_gzip<R: Read>(reader: &mut R, tracker: &mut SizeTracker) -> Result<Self> {
        let mut decoder = GzDecoder::new(reader);
        Self::read(&mut decoder, tracker)
    }

    pub fn write_gzip<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let mut encoder = GzEncoder::new(writer, Compression::default());
        self.write(&mut encoder)?;
        encoder.finish()?;
        Ok(())
    }

    /// Reads a byte buffer, sniffing the gzip magic to pick the wrapping.
    pub fn read_detect(bytes: &[u8], tracker: &mut SizeTracker) -> Result<Self> {
        let mut cursor = Cursor::new(bytes);
        if bytes.starts_with(&[0x1f, 0x8b]) {
            Self::read_gzip(&mut cursor, tracker)
        } else {
            Self::read(&mut cursor, tracker)
        }
    }
}
