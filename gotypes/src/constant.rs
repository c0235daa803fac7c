//! Constant values attached to constant declarations.
use bigdecimal::{BigDecimal, ToPrimitive, Zero};
use num_bigint::BigInt;
use strum::EnumIs;

/// An exact constant value.
///
/// Floating-point constants are kept as exact decimals: every float carried by
/// export data is a dyadic rational `m / 2^k`, which always has a finite decimal
/// expansion.
#[derive(Debug, Clone, PartialEq, Eq, EnumIs)]
pub enum ConstValue {
    Bool(bool),
    Int(BigInt),
    Float(BigDecimal),
    Complex { re: BigDecimal, im: BigDecimal },
    /// Raw bytes; a string constant need not be valid UTF-8.
    String(Vec<u8>),
    /// Value of a constant in a package that failed to type-check.
    Unknown,
}

impl ConstValue {
    /// Numeric value as a decimal, if this is an integer or float constant.
    pub fn to_decimal(&self) -> Option<BigDecimal> {
        match self {
            ConstValue::Int(value) => Some(BigDecimal::from(value.clone())),
            ConstValue::Float(value) => Some(value.clone()),
            _ => None,
        }
    }

    /// Build `re + im*i` from two numeric constants.
    pub fn complex(re: &ConstValue, im: &ConstValue) -> Option<Self> {
        Some(ConstValue::Complex {
            re: re.to_decimal()?,
            im: im.to_decimal()?,
        })
    }

    /// Nearest `f64` of an integer or float constant.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            ConstValue::Int(value) => value.to_f64(),
            // Parsing the exact decimal expansion rounds correctly.
            ConstValue::Float(value) => value.to_string().parse().ok(),
            _ => None,
        }
    }

    pub fn to_i64(&self) -> Option<i64> {
        match self {
            ConstValue::Int(value) => value.to_i64(),
            _ => None,
        }
    }

    /// Text of a string constant, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConstValue::String(bytes) => std::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            ConstValue::Int(value) => value.is_zero(),
            ConstValue::Float(value) => value.is_zero(),
            ConstValue::Complex { re, im } => re.is_zero() && im.is_zero(),
            _ => false,
        }
    }
}

impl From<bool> for ConstValue {
    fn from(value: bool) -> Self {
        ConstValue::Bool(value)
    }
}

impl From<i64> for ConstValue {
    fn from(value: i64) -> Self {
        ConstValue::Int(value.into())
    }
}

impl From<BigInt> for ConstValue {
    fn from(value: BigInt) -> Self {
        ConstValue::Int(value)
    }
}

impl From<BigDecimal> for ConstValue {
    fn from(value: BigDecimal) -> Self {
        ConstValue::Float(value)
    }
}

impl From<String> for ConstValue {
    fn from(value: String) -> Self {
        ConstValue::String(value.into_bytes())
    }
}

impl From<Vec<u8>> for ConstValue {
    fn from(value: Vec<u8>) -> Self {
        ConstValue::String(value)
    }
}

/// Double-quoted rendering of a byte string. Valid UTF-8 is printed as text,
/// anything else byte by byte with `\xNN` escapes.
pub struct Quoted<'a>(pub &'a [u8]);

impl std::fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match std::str::from_utf8(self.0) {
            Ok(text) => write!(f, "{:?}", text),
            Err(_) => write!(f, "\"{}\"", self.0.escape_ascii()),
        }
    }
}

impl std::fmt::Display for ConstValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstValue::Bool(value) => write!(f, "{}", value),
            ConstValue::Int(value) => write!(f, "{}", value),
            ConstValue::Float(value) => write!(f, "{}", value),
            ConstValue::Complex { re, im } => write!(f, "({} + {}i)", re, im),
            ConstValue::String(value) => write!(f, "{}", Quoted(value)),
            ConstValue::Unknown => write!(f, "unknown"),
        }
    }
}
