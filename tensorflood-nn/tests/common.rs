use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use tensorflood_core::{tensor, Array};

/// Two Gaussian blobs around (1, 1) (label 1) and (-1, -1) (label 0).
/// Returns inputs of shape `[2 * per_class, 2]` and labels of shape
/// `[2 * per_class, 1]`.
#[allow(dead_code)]
pub fn two_blobs(per_class: usize, seed: u64) -> (Array, Array) {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 0.3).expect("valid normal parameters");
    let mut inputs = Vec::with_capacity(per_class * 4);
    let mut labels = Vec::with_capacity(per_class * 2);
    for (center, label) in [(1.0, 1.0), (-1.0, 0.0)] {
        for _ in 0..per_class {
            inputs.push(center + noise.sample(&mut rng));
            inputs.push(center + noise.sample(&mut rng));
            labels.push(label);
        }
    }
    (
        tensor::from_vec(inputs, &[per_class * 2, 2]).expect("inputs shape"),
        tensor::from_vec(labels, &[per_class * 2, 1]).expect("labels shape"),
    )
}
