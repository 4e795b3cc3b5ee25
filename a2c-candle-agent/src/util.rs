//! Utilities.
use anyhow::Result;
use candle_core::{Device, Tensor};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use std::f64::consts::PI;

/// Converts a vector to a tensor of shape `(1, v.len())`.
pub fn to_tensor(v: &[f32], device: &Device) -> Result<Tensor> {
    Ok(Tensor::from_slice(v, (1, v.len()), device)?)
}

/// Numerically stable softplus, `ln(1 + exp(x))`.
pub fn softplus(x: &Tensor) -> Result<Tensor> {
    let log1p = (x.abs()?.neg()?.exp()? + 1.0)?.log()?;
    Ok((x.relu()? + log1p)?)
}

/// Density of `x` under the Normal distribution `N(mean, std)`, elementwise.
pub fn normal_density(x: &Tensor, mean: &Tensor, std: &Tensor) -> Result<Tensor> {
    let z = x.broadcast_sub(mean)?.broadcast_div(std)?;
    let numer = (z.sqr()? * -0.5)?.exp()?;
    let denom = (std * (2.0 * PI).sqrt())?;
    Ok(numer.broadcast_div(&denom)?)
}

/// Temporal difference target `reward + (1 - is_done) * gamma * next_value`.
///
/// The returned tensor is detached from the computation graph.
pub fn td_target(reward: f32, is_done: bool, gamma: f64, next_value: &Tensor) -> Result<Tensor> {
    let not_done = if is_done { 0.0 } else { 1.0 };
    Ok(next_value.affine(not_done * gamma, reward as f64)?.detach())
}

/// Draws one sample per dimension from `N(mean, std)` and clips it to
/// `[-max_action, max_action]`.
///
/// Fails if a standard deviation is not finite.
pub fn sample_clipped<R: Rng>(
    mean: &[f32],
    std: &[f32],
    max_action: f32,
    rng: &mut R,
) -> Result<Vec<f32>> {
    mean.iter()
        .zip(std.iter())
        .map(|(&m, &s)| -> Result<f32> {
            let a = Normal::new(m, s)?.sample(rng);
            Ok(a.clamp(-max_action, max_action))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn test_td_target() -> Result<()> {
        let next_value = Tensor::from_slice(&[2f32], (1, 1), &Device::Cpu)?;

        let target = td_target(-1.0, true, 0.99, &next_value)?;
        assert_eq!(target.flatten_all()?.to_vec1::<f32>()?, vec![-1.0]);

        let target = td_target(0.1, false, 0.99, &next_value)?;
        let target = target.flatten_all()?.to_vec1::<f32>()?[0];
        assert!((target - 2.08).abs() < 1e-5);
        Ok(())
    }

    #[test]
    fn test_softplus() -> Result<()> {
        let x = Tensor::from_slice(&[-100f32, 0.0, 100.0], (3,), &Device::Cpu)?;
        let y = softplus(&x)?.to_vec1::<f32>()?;
        assert!(y[0] >= 0.0 && y[0] < 1e-6);
        assert!((y[1] - 2f32.ln()).abs() < 1e-6);
        assert!((y[2] - 100.0).abs() < 1e-4);
        Ok(())
    }

    #[test]
    fn test_normal_density() -> Result<()> {
        let x = Tensor::from_slice(&[0f32, 1.0], (1, 2), &Device::Cpu)?;
        let mean = Tensor::from_slice(&[0f32, 0.0], (1, 2), &Device::Cpu)?;
        let std = Tensor::from_slice(&[1f32, 2.0], (1, 2), &Device::Cpu)?;
        let p = normal_density(&x, &mean, &std)?.flatten_all()?.to_vec1::<f32>()?;
        assert!((p[0] - 0.398_942_3).abs() < 1e-6);
        assert!((p[1] - 0.176_032_7).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_sample_clipped() -> Result<()> {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..1000 {
            let a = sample_clipped(&[0.0, 50.0], &[1e6, 1.0], 1.0, &mut rng)?;
            assert!(a.iter().all(|v| (-1.0..=1.0).contains(v)));
            assert_eq!(a[1], 1.0);
        }
        Ok(())
    }

    #[test]
    fn test_sample_clipped_rejects_invalid_std() {
        let mut rng = SmallRng::seed_from_u64(42);
        assert!(sample_clipped(&[0.0], &[f32::NAN], 1.0, &mut rng).is_err());
        assert!(sample_clipped(&[0.0], &[f32::INFINITY], 1.0, &mut rng).is_err());
    }
}
