#[inline]
pub fn lennard_jones_12_6(dist: f64, sigma: f64, epsilon: f64) -> f64 {
    let rho6 = (sigma / dist).powi(6);
    let rho12 = rho6 * rho6;
    4.0 * epsilon * (rho12 - rho6)
}

/// Lennard-Jones energy minus its value at `cutoff`, so the pair energy goes
/// to zero continuously at the cutoff.
#[inline]
pub fn shifted_lennard_jones_12_6(dist: f64, sigma: f64, epsilon: f64, shift: f64) -> f64 {
    lennard_jones_12_6(dist, sigma, epsilon) - shift
}

#[inline]
pub fn energy_shift(cutoff: f64, sigma: f64, epsilon: f64) -> f64 {
    lennard_jones_12_6(cutoff, sigma, epsilon)
}

/// Lorentz-Berthelot mixing: arithmetic mean of sigmas, geometric mean of
/// epsilons.
#[inline]
pub fn lorentz_berthelot(sigma_i: f64, epsilon_i: f64, sigma_j: f64, epsilon_j: f64) -> (f64, f64) {
    ((sigma_i + sigma_j) / 2.0, (epsilon_i * epsilon_j).sqrt())
}

#[inline]
pub fn cosine_cutoff(dist: f64, cutoff: f64) -> f64 {
    if dist >= cutoff {
        0.0
    } else {
        0.5 * ((std::f64::consts::PI * dist / cutoff).cos() + 1.0)
    }
}
