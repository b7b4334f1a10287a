use core::f64;

use candle_core::{Result, Tensor};

/// floor on log probabilities, so an exact hit at the 0/1 boundary
/// contributes zero instead of NaN
const MIN_LOG_PROB: f64 = -100.;

/// Bernoulli log-likelihood of [0,1]-valued data
///
/// llik(i) = sum_w x(i,w) * log r(i,w) + (1 - x(i,w)) * log(1 - r(i,w))
///
/// The negated sum is the binary cross-entropy with sum reduction.
///
/// * `x_nd` - data tensor (observed data, values in [0,1])
/// * `recon_nd` - probability tensor (reconstruction, values in (0,1))
///
pub fn bernoulli_likelihood(x_nd: &Tensor, recon_nd: &Tensor) -> Result<Tensor> {
    let log_recon_nd = recon_nd.log()?.clamp(MIN_LOG_PROB, f64::INFINITY)?;

    let log_one_minus_nd = recon_nd
        .affine(-1., 1.)?
        .log()?
        .clamp(MIN_LOG_PROB, f64::INFINITY)?;

    x_nd.mul(&log_recon_nd)?
        .add(&x_nd.affine(-1., 1.)?.mul(&log_one_minus_nd)?)?
        .sum(x_nd.rank() - 1)
}
