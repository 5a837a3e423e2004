use crate::types::schema::DataType;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Field {
    Null,
    Boolean(bool),
    Integer(i32),
    BigInt(i64),
    Float(f32),
    String(String),
}

impl PartialEq for Field {
    fn eq(&self, other: &Field) -> bool {
        match (self, other) {
            (Field::Null, Field::Null) => true,
            (Field::Boolean(b), Field::Boolean(b2)) => b == b2,
            (Field::Integer(i), Field::Integer(i2)) => i == i2,
            (Field::BigInt(i), Field::BigInt(i2)) => i == i2,
            // match on NaN as well as equality
            (Field::Float(f), Field::Float(f2)) => (f == f2) || (f.is_nan() && f2.is_nan()),
            (Field::String(s), Field::String(s2)) => s == s2,
            _ => false,
        }
    }
}

impl Eq for Field {}

impl std::hash::Hash for Field {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Field::Null => 0.hash(state),
            Field::Boolean(b) => b.hash(state),
            Field::Integer(i) => i.hash(state),
            Field::BigInt(i) => i.hash(state),
            Field::Float(f) => {
                if f.is_nan() {
                    0.hash(state);
                } else {
                    f.to_bits().hash(state);
                }
            }
            Field::String(s) => s.hash(state),
        }
    }
}

// for use in predicates and sorting
impl Ord for Field {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match (self, other) {
            (Field::Null, Field::Null) => std::cmp::Ordering::Equal,
            (Field::Null, _) => std::cmp::Ordering::Less,
            (_, Field::Null) => std::cmp::Ordering::Greater,
            (Field::Boolean(b), Field::Boolean(b2)) => b.cmp(b2),
            (Field::Integer(i), Field::Integer(i2)) => i.cmp(i2),
            (Field::BigInt(i), Field::BigInt(i2)) => i.cmp(i2),
            (Field::Integer(i), Field::BigInt(i2)) => (*i as i64).cmp(i2),
            (Field::BigInt(i), Field::Integer(i2)) => i.cmp(&(*i2 as i64)),
            (Field::Float(f), Field::Float(f2)) => match (f.is_nan(), f2.is_nan()) {
                (true, true) => std::cmp::Ordering::Equal,
                (true, false) => std::cmp::Ordering::Greater,
                (false, true) => std::cmp::Ordering::Less,
                (false, false) => f.partial_cmp(f2).unwrap_or(std::cmp::Ordering::Equal),
            },
            (Field::String(s), Field::String(s2)) => s.cmp(s2),
            (Field::Boolean(_), _) => std::cmp::Ordering::Less,
            (Field::Integer(_), Field::Boolean(_)) => std::cmp::Ordering::Greater,
            (Field::Integer(_), _) => std::cmp::Ordering::Less,
            (Field::BigInt(_), Field::Boolean(_)) => std::cmp::Ordering::Greater,
            (Field::BigInt(_), _) => std::cmp::Ordering::Less,
            (Field::Float(_), Field::String(_)) => std::cmp::Ordering::Less,
            (Field::Float(_), _) => std::cmp::Ordering::Greater,
            (Field::String(_), _) => std::cmp::Ordering::Greater,
        }
    }
}

impl PartialOrd for Field {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Field::Null => write!(f, "NULL"),
            Field::Boolean(b) => write!(f, "{}", b),
            Field::Integer(i) => write!(f, "{}", i),
            Field::BigInt(i) => write!(f, "{}", i),
            Field::Float(v) => write!(f, "{}", v),
            Field::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for Field {
    fn from(v: bool) -> Self {
        Field::Boolean(v)
    }
}

impl From<i32> for Field {
    fn from(v: i32) -> Self {
        Field::Integer(v)
    }
}

impl From<i64> for Field {
    fn from(v: i64) -> Self {
        Field::BigInt(v)
    }
}

impl From<f32> for Field {
    fn from(v: f32) -> Self {
        Field::Float(v)
    }
}

impl From<String> for Field {
    fn from(v: String) -> Self {
        Field::String(v)
    }
}

impl From<&str> for Field {
    fn from(v: &str) -> Self {
        Field::String(v.to_string())
    }
}

impl Field {
    pub fn get_type(&self) -> Option<DataType> {
        match self {
            Field::Null => None,
            Field::Boolean(_) => Some(DataType::Bool),
            Field::Integer(_) => Some(DataType::Int),
            Field::BigInt(_) => Some(DataType::BigInt),
            Field::Float(_) => Some(DataType::Float),
            Field::String(_) => Some(DataType::Text),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Field::Null)
    }

    /// Serializes the field into its little-endian byte form. Strings are
    /// emitted unpadded; the record layer pads them to the column width.
    pub fn serialize(&self) -> Vec<u8> {
        match self {
            Field::Null => vec![],
            Field::Boolean(b) => vec![*b as u8],
            Field::Integer(i) => i.to_le_bytes().to_vec(),
            Field::BigInt(i) => i.to_le_bytes().to_vec(),
            Field::Float(f) => f.to_le_bytes().to_vec(),
            Field::String(s) => s.as_bytes().to_vec(),
        }
    }

    /// Decodes a field of the given type from a fixed-width byte slice.
    /// Text columns are stored zero-padded, so trailing NULs are trimmed.
    pub fn deserialize(data: &[u8], data_type: DataType) -> Field {
        match data_type {
            DataType::Bool => Field::Boolean(data[0] != 0),
            DataType::Int => Field::Integer(i32::from_le_bytes(data.try_into().unwrap())),
            DataType::BigInt => Field::BigInt(i64::from_le_bytes(data.try_into().unwrap())),
            DataType::Float => Field::Float(f32::from_le_bytes(data.try_into().unwrap())),
            DataType::Text => {
                let end = data
                    .iter()
                    .rposition(|&b| b != 0)
                    .map_or(0, |last| last + 1);
                Field::String(String::from_utf8_lossy(&data[..end]).into_owned())
            }
        }
    }
}
