//! Constant values.
use bigdecimal::BigDecimal;
use gotypes::constant::ConstValue;
use num_bigint::{BigInt, Sign};

use crate::{
    driver::Importer,
    error::{FormatError, FormatResult},
    tags::Tag,
};

/// Largest binary exponent accepted for float constants.
pub const MAX_FLOAT_EXPONENT: i64 = 1 << 16;

/// `mant * 2^exp` where `mant` holds the big-endian mantissa bytes of a value
/// in `[0.5, 1)`.
///
/// Integral values come back as [`ConstValue::Int`]; everything else is an
/// exact [`ConstValue::Float`].
pub fn float_from_parts(negative: bool, exp: i64, mant: &[u8]) -> FormatResult<ConstValue> {
    let leading = mant.iter().take_while(|b| **b == 0).count();
    let mant = &mant[leading..];

    // The mantissa is a fraction; shift the exponent to make it an integer.
    let mut exp = (mant.len() as i64)
        .checked_mul(8)
        .and_then(|bits| exp.checked_sub(bits))
        .ok_or(FormatError::ExponentOutOfRange(exp))?;
    if let Some(&msd) = mant.first() {
        exp += msd.leading_zeros() as i64;
    }
    if exp.unsigned_abs() > MAX_FLOAT_EXPONENT as u64 {
        return Err(FormatError::ExponentOutOfRange(exp));
    }

    let mut x = BigInt::from_bytes_be(Sign::Plus, mant);
    if exp < 0 {
        // Reduce x / 2^k to lowest terms.
        let k = exp.unsigned_abs();
        let shift = x.trailing_zeros().map_or(k, |tz| tz.min(k));
        x >>= shift;
        exp += shift as i64;
    }

    let value = if exp < 0 {
        // x / 2^k == x * 5^k / 10^k
        let k = exp.unsigned_abs() as u32;
        let digits = x * BigInt::from(5u8).pow(k);
        let value = BigDecimal::new(digits, k as i64);
        ConstValue::Float(if negative { -value } else { value })
    } else {
        let value = x << exp as usize;
        ConstValue::Int(if negative { -value } else { value })
    };
    Ok(value)
}

impl Importer<'_> {
    pub(crate) fn value(&mut self) -> FormatResult<ConstValue> {
        let tag = self.reader.tag_or_index()?;
        match Tag::from_repr(tag) {
            Some(Tag::False) => Ok(ConstValue::Bool(false)),
            Some(Tag::True) => Ok(ConstValue::Bool(true)),
            Some(Tag::Int64) => Ok(ConstValue::Int(self.reader.int64()?.into())),
            Some(Tag::Float) => self.float(),
            Some(Tag::Complex) => {
                let re = self.float()?;
                let im = self.float()?;
                ConstValue::complex(&re, &im).ok_or(FormatError::UnexpectedTag {
                    context: "complex value",
                    tag,
                })
            }
            Some(Tag::String) => Ok(ConstValue::String(self.string_bytes()?.into_vec())),
            Some(Tag::Unknown) => Ok(ConstValue::Unknown),
            _ => Err(FormatError::UnexpectedTag {
                context: "value",
                tag,
            }),
        }
    }

    fn float(&mut self) -> FormatResult<ConstValue> {
        let sign = self.reader.int()?;
        if sign == 0 {
            return Ok(ConstValue::Int(BigInt::from(0u8)));
        }

        let exp = self.reader.int()?;
        let mant = self.string_bytes()?;
        float_from_parts(sign < 0, exp, &mant)
    }
}
