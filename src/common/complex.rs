//! 任意精度の複素数（実部・虚部の組）

use crate::common::number::{Number, Precision};
use crate::error::Result;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComplexPair {
    pub re: Number,
    pub im: Number,
}

impl ComplexPair {
    pub fn new(re: Number, im: Number) -> Self {
        Self { re, im }
    }

    pub fn zero(precision: Precision) -> Self {
        Self::new(Number::zero(precision), Number::zero(precision))
    }

    /// 実部・虚部の10進文字列から作る
    pub fn parse(re: &str, im: &str, precision: Precision) -> Result<Self> {
        Ok(Self::new(
            Number::parse(re, precision)?,
            Number::parse(im, precision)?,
        ))
    }

    pub fn add(&self, other: &ComplexPair) -> ComplexPair {
        ComplexPair::new(self.re.add(&other.re), self.im.add(&other.im))
    }

    /// (re² − im², 2·re·im)
    pub fn square(&self) -> ComplexPair {
        let re = self.re.square().sub(&self.im.square());
        let im = self.re.mul(&self.im);
        let im = im.add(&im);
        ComplexPair::new(re, im)
    }

    /// re² + im²（平方根を取らずに脱出判定に使う）
    pub fn squared_magnitude(&self) -> Number {
        self.re.square().add(&self.im.square())
    }
}
