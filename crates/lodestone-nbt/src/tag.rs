use crate::compound::CompoundTag;
use crate::list::ListTag;

/// Pseudo type id matching any numeric tag (Byte through Double).
pub const TYPE_ANY_NUMERIC: u8 = 99;

/// A single NBT value. The thirteen kinds form a closed set; containers
/// (`List`, `Compound`) recurse into the same enum.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    End,
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(ListTag),
    Compound(CompoundTag),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Tag {
    pub fn get_type_id(&self) -> u8 {
        match self {
            Tag::End => 0,
            Tag::Byte(_) => 1,
            Tag::Short(_) => 2,
            Tag::Int(_) => 3,
            Tag::Long(_) => 4,
            Tag::Float(_) => 5,
            Tag::Double(_) => 6,
            Tag::ByteArray(_) => 7,
            Tag::String(_) => 8,
            Tag::List(_) => 9,
            Tag::Compound(_) => 10,
            Tag::IntArray(_) => 11,
            Tag::LongArray(_) => 12,
        }
    }

    pub fn type_name(type_id: u8) -> &'static str {
        match type_id {
            0 => "TAG_End",
            1 => "TAG_Byte",
            2 => "TAG_Short",
            3 => "TAG_Int",
            4 => "TAG_Long",
            5 => "TAG_Float",
            6 => "TAG_Double",
            7 => "TAG_Byte_Array",
            8 => "TAG_String",
            9 => "TAG_List",
            10 => "TAG_Compound",
            11 => "TAG_Int_Array",
            12 => "TAG_Long_Array",
            TYPE_ANY_NUMERIC => "Any Numeric Tag",
            _ => "UNKNOWN",
        }
    }

    /// True for the numeric family (ids 1 through 6).
    pub fn is_numeric(&self) -> bool {
        matches!(self.get_type_id(), 1..=6)
    }

    pub fn as_compound(&self) -> Option<&CompoundTag> {
        match self {
            Tag::Compound(compound) => Some(compound),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListTag> {
        match self {
            Tag::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tag::String(s) => Some(s),
            _ => None,
        }
    }

    /// Coerces any numeric variant to i64. Floating point values truncate
    /// toward negative infinity, integer values widen losslessly.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Tag::Byte(n) => Some(*n as i64),
            Tag::Short(n) => Some(*n as i64),
            Tag::Int(n) => Some(*n as i64),
            Tag::Long(n) => Some(*n),
            Tag::Float(n) => Some(n.floor() as i64),
            Tag::Double(n) => Some(n.floor() as i64),
            _ => None,
        }
    }

    /// Coerces any numeric variant to i32. Wider integers keep the low bits.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Tag::Byte(n) => Some(*n as i32),
            Tag::Short(n) => Some(*n as i32),
            Tag::Int(n) => Some(*n),
            Tag::Long(n) => Some(*n as i32),
            Tag::Float(n) => Some(n.floor() as i32),
            Tag::Double(n) => Some(n.floor() as i32),
            _ => None,
        }
    }

    pub fn as_i16(&self) -> Option<i16> {
        match self {
            Tag::Byte(n) => Some(*n as i16),
            Tag::Short(n) => Some(*n),
            Tag::Int(n) => Some(*n as i16),
            Tag::Long(n) => Some(*n as i16),
            Tag::Float(n) => Some((n.floor() as i32) as i16),
            Tag::Double(n) => Some((n.floor() as i64) as i16),
            _ => None,
        }
    }

    pub fn as_i8(&self) -> Option<i8> {
        match self {
            Tag::Byte(n) => Some(*n),
            Tag::Short(n) => Some(*n as i8),
            Tag::Int(n) => Some(*n as i8),
            Tag::Long(n) => Some(*n as i8),
            Tag::Float(n) => Some((n.floor() as i32) as i8),
            Tag::Double(n) => Some((n.floor() as i64) as i8),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Tag::Byte(n) => Some(*n as f64),
            Tag::Short(n) => Some(*n as f64),
            Tag::Int(n) => Some(*n as f64),
            Tag::Long(n) => Some(*n as f64),
            Tag::Float(n) => Some(*n as f64),
            Tag::Double(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Tag::Byte(n) => Some(*n as f32),
            Tag::Short(n) => Some(*n as f32),
            Tag::Int(n) => Some(*n as f32),
            Tag::Long(n) => Some(*n as f32),
            Tag::Float(n) => Some(*n),
            Tag::Double(n) => Some(*n as f32),
            _ => None,
        }
    }
}
