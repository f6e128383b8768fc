//! 表示範囲（ビューポート）とズームによる再計算

use crate::common::complex::ComplexPair;
use crate::common::constants::{MAX_DECIMAL_EXPONENT, MIN_RESOLVED_DIGITS};
use crate::common::number::{Number, Precision};
use crate::error::{Error, Result};

/// 複素平面上の矩形範囲。常に `min_re < max_re` かつ `min_im < max_im`。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Viewport {
    min_re: Number,
    max_re: Number,
    min_im: Number,
    max_im: Number,
}

impl Viewport {
    pub fn new(min_re: Number, max_re: Number, min_im: Number, max_im: Number) -> Result<Self> {
        if min_re >= max_re {
            return Err(Error::InvalidViewport(format!(
                "min_re ({}) >= max_re ({})",
                min_re, max_re
            )));
        }
        if min_im >= max_im {
            return Err(Error::InvalidViewport(format!(
                "min_im ({}) >= max_im ({})",
                min_im, max_im
            )));
        }
        Ok(Self {
            min_re,
            max_re,
            min_im,
            max_im,
        })
    }

    /// 4つの10進文字列から作る
    pub fn parse(
        min_re: &str,
        max_re: &str,
        min_im: &str,
        max_im: &str,
        precision: Precision,
    ) -> Result<Self> {
        Self::new(
            Number::parse(min_re, precision)?,
            Number::parse(max_re, precision)?,
            Number::parse(min_im, precision)?,
            Number::parse(max_im, precision)?,
        )
    }

    pub fn min_re(&self) -> &Number {
        &self.min_re
    }

    pub fn max_re(&self) -> &Number {
        &self.max_re
    }

    pub fn min_im(&self) -> &Number {
        &self.min_im
    }

    pub fn max_im(&self) -> &Number {
        &self.max_im
    }

    pub fn precision(&self) -> Precision {
        self.min_re.precision()
    }

    /// 矩形の幾何中心
    pub fn center(&self) -> ComplexPair {
        ComplexPair::new(
            self.min_re.add(&self.max_re).half(),
            self.min_im.add(&self.max_im).half(),
        )
    }

    pub fn width(&self) -> Number {
        self.max_re.sub(&self.min_re)
    }

    pub fn height(&self) -> Number {
        self.max_im.sub(&self.min_im)
    }

    /// 中心を保ったまま幅と高さを `zoom_level` で割る
    ///
    /// `zoom_level > 1` で拡大、`0 < zoom_level < 1` で縮小。
    /// `zoom_level == 0` は [`Error::DivisionByZero`]、負の値は
    /// min と max が入れ替わるため [`Error::InvalidViewport`] になる。
    ///
    /// 結果の各端点は設定桁数の10進表記に丸めてから検証する。応答で送る
    /// 文字列が同じになる（min == max）場合や、10進指数が
    /// [`MAX_DECIMAL_EXPONENT`] を超える場合も [`Error::InvalidViewport`]。
    pub fn rescale(&self, zoom_level: &Number) -> Result<Viewport> {
        if zoom_level.is_zero() {
            return Err(Error::DivisionByZero("zoom_level が 0 です"));
        }
        if zoom_level.is_negative() {
            return Err(Error::InvalidViewport(format!(
                "zoom_level ({}) が負です",
                zoom_level
            )));
        }

        let center = self.center();
        let half_width = self.width().div(zoom_level)?.half();
        let half_height = self.height().div(zoom_level)?.half();

        // 精度を使い切ると min == max になり得るので丸めた値で再検証する
        Viewport::new(
            round_bound(center.re.sub(&half_width))?,
            round_bound(center.re.add(&half_width))?,
            round_bound(center.im.sub(&half_height))?,
            round_bound(center.im.add(&half_height))?,
        )
    }

    /// 設定された有効桁数で、まだ範囲の中を区別できるかどうか
    ///
    /// 端点と幅（高さ）の10進指数の差に [`MIN_RESOLVED_DIGITS`] を足して
    /// 有効桁数を超えたら、これ以上のズームには桁が足りないとみなす。
    pub fn is_resolvable(&self) -> bool {
        let digits = i64::from(self.precision().digits());
        let axis_ok = |min: &Number, max: &Number, extent: &Number| -> bool {
            let Some(extent_exp) = extent.decimal_exponent() else {
                return false;
            };
            let magnitude_exp = [min.decimal_exponent(), max.decimal_exponent()]
                .into_iter()
                .flatten()
                .max()
                .unwrap_or(extent_exp);
            i64::from(magnitude_exp) - i64::from(extent_exp) + i64::from(MIN_RESOLVED_DIGITS) <= digits
        };
        axis_ok(&self.min_re, &self.max_re, &self.width())
            && axis_ok(&self.min_im, &self.max_im, &self.height())
    }
}

fn round_bound(bound: Number) -> Result<Number> {
    if !bound.within_exponent_limit() {
        return Err(Error::InvalidViewport(format!(
            "計算結果の指数が上限 (10^±{}) を超えました",
            MAX_DECIMAL_EXPONENT
        )));
    }
    bound.rounded()
}

/// [`Viewport::rescale`] の関数版
pub fn rescale(viewport: &Viewport, zoom_level: &Number) -> Result<Viewport> {
    viewport.rescale(zoom_level)
}
