//! マンデルブロ集合のエスケープタイム計算関数

use num_complex::Complex;
use rayon::prelude::*;
use rug::{Assign, Float};

use crate::common::complex::ComplexPair;
use crate::common::constants::ESCAPE_RADIUS_SQR;

/// マンデルブロ集合の反復回数を計算（f64高速版）
///
/// 浅いズーム用。ビューポート幅が f64 の分解能に近づいたら [`escape_time`] を使うこと。
pub fn escape_time_fast(c: Complex<f64>, max_iter: u32) -> u32 {
    let mut z = Complex::new(0.0, 0.0);

    for i in 0..max_iter {
        if z.norm_sqr() > f64::from(ESCAPE_RADIUS_SQR) {
            return i;
        }
        z = z * z + c;
    }
    max_iter
}

/// マンデルブロ集合の反復回数を計算（任意精度版）
///
/// 戻り値は `[0, max_iter]`。`max_iter` は「脱出しなかった」を表す。
/// z は c と同じ精度で計算する。
pub fn escape_time(c: &ComplexPair, max_iter: u32) -> u32 {
    let precision = c.re.precision().bits();
    let c_real = c.re.as_float();
    let c_imag = c.im.as_float();

    let mut z_real = Float::with_val(precision, 0);
    let mut z_imag = Float::with_val(precision, 0);

    // 作業用変数を事前に確保（アロケーション削減）
    let mut zr2 = Float::new(precision);
    let mut zi2 = Float::new(precision);
    let mut norm_sqr = Float::new(precision);
    let mut next_i = Float::new(precision);

    for i in 0..max_iter {
        zr2.assign(z_real.square_ref());
        zi2.assign(z_imag.square_ref());

        norm_sqr.assign(&zr2 + &zi2);
        if norm_sqr > ESCAPE_RADIUS_SQR {
            return i;
        }

        // next_i = 2 * z_real * z_imag + c_imag
        next_i.assign(&z_real * &z_imag);
        next_i *= 2u32;
        next_i += c_imag;

        // z_real = zr2 - zi2 + c_real
        z_real.assign(&zr2 - &zi2);
        z_real += c_real;

        std::mem::swap(&mut z_imag, &mut next_i);
    }
    max_iter
}

/// 複数の点をまとめて計算する（Rayon並列処理）
///
/// 結果の順序は入力の順序と同じ。
pub fn escape_time_batch(points: &[ComplexPair], max_iter: u32) -> Vec<u32> {
    points
        .par_iter()
        .map(|c| escape_time(c, max_iter))
        .collect()
}
