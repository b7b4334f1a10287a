//! Negative evidence lower bound (ELBO) for variational autoencoders.
//!
//! The ELBO decomposes as `-KL(q(z|x) ‖ p(z)) + E[log p(x|z)]`, with the
//! expectation approximated by a single-sample Monte-Carlo estimate. Both
//! terms are kept in their minimization-oriented form, so the returned
//! scalar is the *negative* ELBO:
//!
//! - regularization term: `KL(q(z|x) ‖ p(z))`, closed form for diagonal
//!   Gaussians, summed over batch and latent dimensions and divided by the
//!   batch size. Pulls the posterior toward the standard Gaussian prior so
//!   that latent vectors drawn from N(0, I) decode to plausible data.
//! - reconstruction term: binary cross-entropy between reconstruction and
//!   target with sum reduction, divided by the batch size. Equal to the
//!   negative log-likelihood of the target under a per-element Bernoulli
//!   model, which is why the target must live in [0,1].
//!
//! # Example
//!
//! ```ignore
//! use candle_elbo::elbo::Elbo;
//!
//! let elbo = Elbo::new(16);
//! // (recon, x) of shape (n, d); (z_mean, z_std) of shape (n, 16)
//! let loss = elbo.evaluate(&recon, &x, &z_mean, &z_std)?;
//! // optimizer.backward_step(&loss)?;
//! ```

use crate::gaussian::{kl_divergence, Gaussian};
use crate::loss_functions::bernoulli_likelihood;

use candle_core::{Result, Tensor};

/// Negative ELBO evaluator with a fixed latent dimensionality
pub struct Elbo {
    n_latent: usize,
}

impl Elbo {
    /// * `n_latent` - dimensionality of the latent space, shapes the prior
    pub fn new(n_latent: usize) -> Self {
        Self { n_latent }
    }

    pub fn dim_latent(&self) -> usize {
        self.n_latent
    }

    /// Evaluate the negative ELBO for one batch.
    ///
    /// Returns a rank-0 tensor; minimizing it maximizes the ELBO.
    ///
    /// # Arguments
    /// * `recon_nd` - reconstruction (n x d), values in (0,1)
    /// * `x_nd` - target data (n x d), values in [0,1]
    /// * `z_mean_nk` - posterior mean of q(z|x) (n x k)
    /// * `z_std_nk` - posterior standard deviation of q(z|x) (n x k), positive
    pub fn evaluate(
        &self,
        recon_nd: &Tensor,
        x_nd: &Tensor,
        z_mean_nk: &Tensor,
        z_std_nk: &Tensor,
    ) -> Result<Tensor> {
        debug_assert_eq!(recon_nd.dims(), x_nd.dims());
        debug_assert_eq!(z_mean_nk.dims(), z_std_nk.dims());
        debug_assert_eq!(x_nd.dim(0)?, z_mean_nk.dim(0)?);
        debug_assert_eq!(z_mean_nk.dim(z_mean_nk.rank() - 1)?, self.n_latent);

        let batch_size = x_nd.dim(0)? as f64;

        // prior p(z) rebuilt per call on the posterior's dtype/device
        let prior = Gaussian::standard(self.n_latent, z_mean_nk.dtype(), z_mean_nk.device())?;
        let posterior = Gaussian::new(z_mean_nk.clone(), z_std_nk.clone());

        let regularization = (kl_divergence(&posterior, &prior)?.sum_all()? / batch_size)?;

        let llik_n = bernoulli_likelihood(x_nd, recon_nd)?;
        let reconstruction = (llik_n.sum_all()?.neg()? / batch_size)?;

        regularization + reconstruction
    }
}
