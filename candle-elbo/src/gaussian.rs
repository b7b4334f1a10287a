use candle_core::{DType, Device, Result, Tensor};

/// Diagonal Gaussian N(μ, σ²I) over a tensor of parameters
///
/// Covers both roles in the variational objective: the per-call posterior
/// q(z|x) built from encoder outputs of shape (n, k), and the fixed prior
/// p(z) of shape (k,).
pub struct Gaussian {
    /// mean μ
    mean: Tensor,
    /// standard deviation σ, must be strictly positive
    std: Tensor,
}

impl Gaussian {
    /// Build a Gaussian from mean and standard deviation tensors of the
    /// same shape. The standard deviation is not checked for positivity;
    /// σ ≤ 0 yields NaN/Inf downstream.
    pub fn new(mean: Tensor, std: Tensor) -> Self {
        debug_assert_eq!(mean.dims(), std.dims());
        Self { mean, std }
    }

    /// Standard Gaussian N(0, I) of size `dim` on the given dtype/device
    pub fn standard(dim: usize, dtype: DType, device: &Device) -> Result<Self> {
        Ok(Self {
            mean: Tensor::zeros(dim, dtype, device)?,
            std: Tensor::ones(dim, dtype, device)?,
        })
    }

    pub fn mean(&self) -> &Tensor {
        &self.mean
    }

    pub fn std(&self) -> &Tensor {
        &self.std
    }
}

/// Closed-form KL divergence KL(q ‖ p) between two diagonal Gaussians,
/// elementwise over the broadcast of their parameter shapes
///
/// ln(σp/σq) + (σq² + (μq − μp)²) / (2 σp²) − 1/2
///
/// Argument order matters: KL is not symmetric, and the variational
/// objective needs KL(posterior ‖ prior), never the reverse.
///
/// * `q` - the distribution the divergence is measured from (posterior)
/// * `p` - the reference distribution (prior)
///
pub fn kl_divergence(q: &Gaussian, p: &Gaussian) -> Result<Tensor> {
    let log_std_ratio = p.std.log()?.broadcast_sub(&q.std.log()?)?;

    let q_var = q.std.sqr()?;
    let mean_diff_sq = q.mean.broadcast_sub(&p.mean)?.sqr()?;
    let scaled = q_var
        .broadcast_add(&mean_diff_sq)?
        .broadcast_div(&(p.std.sqr()? * 2.)?)?;

    log_std_ratio.broadcast_add(&scaled)? - 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;

    #[test]
    fn kl_of_prior_from_itself_is_zero() -> Result<()> {
        let device = Device::Cpu;
        let prior = Gaussian::standard(4, DType::F32, &device)?;
        let posterior = Gaussian::new(
            Tensor::zeros((3, 4), DType::F32, &device)?,
            Tensor::ones((3, 4), DType::F32, &device)?,
        );

        let kl = kl_divergence(&posterior, &prior)?;

        assert_eq!(kl.dims(), &[3, 4]);
        for row in kl.to_vec2::<f32>()? {
            for val in row {
                approx::assert_abs_diff_eq!(val, 0.0);
            }
        }
        Ok(())
    }

    #[test]
    fn kl_is_non_negative() -> Result<()> {
        let device = Device::Cpu;
        let prior = Gaussian::standard(8, DType::F32, &device)?;

        let mean = Tensor::randn(0f32, 1f32, (16, 8), &device)?;
        let std = (Tensor::randn(0f32, 1f32, (16, 8), &device)? * 0.5)?.exp()?;
        let posterior = Gaussian::new(mean, std);

        let kl = kl_divergence(&posterior, &prior)?;
        let min_val = kl.min_all()?.to_scalar::<f32>()?;
        assert!(min_val >= -1e-6, "negative KL element: {}", min_val);

        let avg = (kl.sum_all()? / 16.)?.to_scalar::<f32>()?;
        assert!(avg >= 0.0);
        Ok(())
    }

    #[test]
    fn kl_argument_order_matters() -> Result<()> {
        let device = Device::Cpu;
        let prior = Gaussian::standard(2, DType::F64, &device)?;
        let posterior = Gaussian::new(
            Tensor::zeros((1, 2), DType::F64, &device)?,
            (Tensor::ones((1, 2), DType::F64, &device)? * 2.)?,
        );

        let forward = kl_divergence(&posterior, &prior)?.sum_all()?.to_scalar::<f64>()?;
        let reverse = kl_divergence(&prior, &posterior)?.sum_all()?.to_scalar::<f64>()?;

        // KL(N(0,4) ‖ N(0,1)) = 2 - 1/2 - ln 2, per dimension
        let expected = 2.0 - 0.5 - 2f64.ln();
        approx::assert_abs_diff_eq!(forward, 2.0 * expected, epsilon = 1e-10);
        assert!((forward - reverse).abs() > 1e-3);
        Ok(())
    }
}
