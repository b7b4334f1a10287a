use anyhow::Result;
use candle_core::{Device, Tensor};
use candle_elbo::elbo::Elbo;
use log::info;

/// Evaluate the negative ELBO on a fake minibatch, standing in for the
/// encoder/decoder outputs a VAE training step would supply.
fn main() -> Result<()> {
    env_logger::init();

    let device = Device::Cpu;
    let (n_batch, n_features, n_latent) = (16, 784, 8);

    // posterior parameters as an encoder would emit them
    let z_mean_nk = Tensor::randn(0f32, 1f32, (n_batch, n_latent), &device)?;
    let z_std_nk = (Tensor::randn(0f32, 1f32, (n_batch, n_latent), &device)? * 0.1)?.exp()?;

    // raw decoder scores squashed into (0,1) probabilities
    let scores_nd = Tensor::randn(0f32, 1f32, (n_batch, n_features), &device)?;
    let recon_nd = candle_nn::ops::sigmoid(&scores_nd)?;

    let x_nd = Tensor::rand(0f32, 1f32, (n_batch, n_features), &device)?;

    let elbo = Elbo::new(n_latent);
    let loss = elbo.evaluate(&recon_nd, &x_nd, &z_mean_nk, &z_std_nk)?;

    info!(
        "negative ELBO over {} samples: {}",
        n_batch,
        loss.to_scalar::<f32>()?
    );

    Ok(())
}
