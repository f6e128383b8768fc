//! 任意精度の実数
//!
//! rug (MPFR) の `Float` を包み、プロセス起動時に決めた有効桁数
//! （[`Precision`]）で全ての演算を行う。f64 への変換は一切行わない。

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use rug::Float;

use crate::common::constants::{DEFAULT_PRECISION_DIGITS, GUARD_BITS, MAX_DECIMAL_EXPONENT};
use crate::error::{Error, Result};

/// 有効桁数（10進）。起動時に一度だけ決めて、以後は値として持ち回る。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Precision {
    digits: u32,
}

impl Precision {
    /// 0 桁は 1 桁として扱う
    pub fn new(digits: u32) -> Self {
        Self {
            digits: digits.max(1),
        }
    }

    pub fn digits(&self) -> u32 {
        self.digits
    }

    /// MPFR に渡す仮数部のビット数
    ///
    /// digits * log2(10) を切り上げ、ガードビットを足す。
    pub fn bits(&self) -> u32 {
        let bits = (u64::from(self.digits) * 3_321_929).div_ceil(1_000_000);
        u32::try_from(bits)
            .unwrap_or(u32::MAX - GUARD_BITS)
            .saturating_add(GUARD_BITS)
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::new(DEFAULT_PRECISION_DIGITS)
    }
}

/// 任意精度の実数値
#[derive(Clone, Debug)]
pub struct Number {
    value: Float,
    precision: Precision,
}

impl Number {
    /// 10進文字列を解析する
    ///
    /// 空文字列、数値でない文字列、`inf` / `nan`、10進指数が
    /// [`MAX_DECIMAL_EXPONENT`] を超える値は [`Error::Parse`] になる。
    pub fn parse(text: &str, precision: Precision) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(Error::Parse("空の数値文字列".to_string()));
        }
        let incomplete = Float::parse(trimmed)
            .map_err(|e| Error::Parse(format!("{:?} は数値ではありません: {}", text, e)))?;
        let value = Float::with_val(precision.bits(), incomplete);
        if !value.is_finite() {
            return Err(Error::Parse(format!("{:?} は有限の数値ではありません", text)));
        }
        let number = Self { value, precision };
        if !number.within_exponent_limit() {
            return Err(Error::Parse(format!(
                "{:?} の指数が大きすぎます (上限 10^±{})",
                text, MAX_DECIMAL_EXPONENT
            )));
        }
        Ok(number)
    }

    pub fn from_i64(value: i64, precision: Precision) -> Self {
        Self {
            value: Float::with_val(precision.bits(), value),
            precision,
        }
    }

    pub fn zero(precision: Precision) -> Self {
        Self::from_i64(0, precision)
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub(crate) fn as_float(&self) -> &Float {
        &self.value
    }

    pub(crate) fn from_float(value: Float, precision: Precision) -> Self {
        Self { value, precision }
    }

    /// 10進指数（値 = 0.d × 10^exp）。0 のときは None。
    pub(crate) fn decimal_exponent(&self) -> Option<i32> {
        if self.value.is_zero() {
            return None;
        }
        self.value.to_sign_string_exp(10, Some(1)).2
    }

    /// 10進指数の絶対値が [`MAX_DECIMAL_EXPONENT`] 以内か
    ///
    /// 2進指数 × log10(2) で見積もるので文字列は作らない。
    pub fn within_exponent_limit(&self) -> bool {
        match self.value.get_exp() {
            None => true,
            Some(exp) => u64::from(exp.unsigned_abs()) * 30_103 / 100_000 <= u64::from(MAX_DECIMAL_EXPONENT),
        }
    }

    /// 設定桁数の10進表記に丸めた値（応答として送る値そのもの）
    pub fn rounded(&self) -> Result<Number> {
        Number::parse(&self.to_decimal_string(), self.precision)
    }

    fn bits(&self) -> u32 {
        self.precision.bits()
    }

    fn check_precision(&self, other: &Number) {
        debug_assert_eq!(
            self.precision, other.precision,
            "精度の異なる値同士を演算しようとしました"
        );
    }

    pub fn add(&self, other: &Number) -> Number {
        self.check_precision(other);
        Number::from_float(Float::with_val(self.bits(), &self.value + &other.value), self.precision)
    }

    pub fn sub(&self, other: &Number) -> Number {
        self.check_precision(other);
        Number::from_float(Float::with_val(self.bits(), &self.value - &other.value), self.precision)
    }

    pub fn mul(&self, other: &Number) -> Number {
        self.check_precision(other);
        Number::from_float(Float::with_val(self.bits(), &self.value * &other.value), self.precision)
    }

    /// 除算。除数が 0 なら [`Error::DivisionByZero`]。
    pub fn div(&self, other: &Number) -> Result<Number> {
        self.check_precision(other);
        if other.is_zero() {
            return Err(Error::DivisionByZero("除数が 0 です"));
        }
        Ok(Number::from_float(
            Float::with_val(self.bits(), &self.value / &other.value),
            self.precision,
        ))
    }

    /// 2 で割る（2進浮動小数点なので丸め誤差なし）
    pub fn half(&self) -> Number {
        Number::from_float(Float::with_val(self.bits(), &self.value / 2u32), self.precision)
    }

    pub fn square(&self) -> Number {
        Number::from_float(Float::with_val(self.bits(), self.value.square_ref()), self.precision)
    }

    pub fn abs(&self) -> Number {
        Number::from_float(Float::with_val(self.bits(), self.value.abs_ref()), self.precision)
    }

    pub fn compare(&self, other: &Number) -> Ordering {
        self.check_precision(other);
        self.value.partial_cmp(&other.value).unwrap_or(Ordering::Equal)
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        !self.value.is_zero() && self.value.is_sign_negative()
    }

    pub fn is_finite(&self) -> bool {
        self.value.is_finite()
    }

    /// 指数表記を使わない10進表記に変換する
    ///
    /// 有効桁数は [`Precision::digits`] に丸め、末尾の 0 は落とす。
    pub fn to_decimal_string(&self) -> String {
        let (negative, digits, exp) = self
            .value
            .to_sign_string_exp(10, Some(self.precision.digits() as usize));
        let exp = match exp {
            Some(exp) if !self.value.is_zero() => exp,
            _ => return "0".to_string(),
        };
        let digits = digits.trim_end_matches('0');
        if digits.is_empty() {
            return "0".to_string();
        }

        // 値 = 0.digits × 10^exp
        let mut out = String::with_capacity(digits.len() + exp.unsigned_abs() as usize + 3);
        if negative {
            out.push('-');
        }
        if exp <= 0 {
            out.push_str("0.");
            out.extend(std::iter::repeat('0').take(exp.unsigned_abs() as usize));
            out.push_str(digits);
        } else {
            let int_len = exp as usize;
            if int_len >= digits.len() {
                out.push_str(digits);
                out.extend(std::iter::repeat('0').take(int_len - digits.len()));
            } else {
                out.push_str(&digits[..int_len]);
                out.push('.');
                out.push_str(&digits[int_len..]);
            }
        }
        out
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal_string())
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl<'a> Add<&'a Number> for &'a Number {
    type Output = Number;

    fn add(self, rhs: &'a Number) -> Number {
        Number::add(self, rhs)
    }
}

impl<'a> Sub<&'a Number> for &'a Number {
    type Output = Number;

    fn sub(self, rhs: &'a Number) -> Number {
        Number::sub(self, rhs)
    }
}

impl<'a> Mul<&'a Number> for &'a Number {
    type Output = Number;

    fn mul(self, rhs: &'a Number) -> Number {
        Number::mul(self, rhs)
    }
}

impl Neg for &Number {
    type Output = Number;

    fn neg(self) -> Number {
        Number::from_float(Float::with_val(self.bits(), -&self.value), self.precision)
    }
}
