use crate::constants::{EXACT_KS_MAX_PRODUCT, KOLMOGOROV_EPS, KOLMOGOROV_TERMS};
use std::cmp::Ordering;

/// Result of a two sample Kolmogorov-Smirnov test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KsTest {
    /// Largest absolute gap between the two empirical CDFs.
    pub statistic: f64,
    /// Two sided p-value.
    pub pvalue: f64,
}

/// Survival function of the Kolmogorov distribution.
///
/// Q(λ) = 2 Σ_{k≥1} (-1)^{k-1} exp(-2 k² λ²)
pub fn kolmogorov_p_value(lambda: f64) -> f64 {
    // The series converges too slowly for tiny λ, where Q is 1 to machine precision.
    if lambda < 0.2 {
        return 1.0;
    }
    let mut p = 0.0;
    let mut sign = 1.0;
    for k in 1..=KOLMOGOROV_TERMS {
        let term = sign * (-2.0 * (k * k) as f64 * lambda * lambda).exp();
        p += term;
        if term.abs() < KOLMOGOROV_EPS {
            break;
        }
        sign = -sign;
    }
    (2.0 * p).clamp(0.0, 1.0)
}

/// Exact two sided p-value of the statistic `d` for samples of size `n` and `m`.
///
/// Counts the monotone lattice paths from (0, 0) to (n, m) that stay inside
/// the band |i/n - j/m| < d, normalised by C(n + m, n) as the walk goes.
pub fn exact_p_value(d: f64, n: usize, m: usize) -> f64 {
    let (n, m) = if n > m { (m, n) } else { (n, m) };
    let nd = n as f64;
    let md = m as f64;
    // Half a grid step below d on the 1/(n m) lattice.
    let q = (0.5 + (d * nd * md - 1e-7).floor()) / (nd * md);
    let mut u: Vec<f64> = (0..=m).map(|j| if j as f64 / md > q { 0.0 } else { 1.0 }).collect();
    for i in 1..=n {
        let w = i as f64 / (i + m) as f64;
        let x = i as f64 / nd;
        u[0] = if x > q { 0.0 } else { w * u[0] };
        for j in 1..=m {
            u[j] = if (x - j as f64 / md).abs() > q {
                0.0
            } else {
                w * u[j] + u[j - 1]
            };
        }
    }
    (1.0 - u[m]).clamp(0.0, 1.0)
}

/// Two sided Kolmogorov-Smirnov statistic.
/// Both slices must be sorted ascending and free of NaN.
pub fn ks_statistic(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len() as f64;
    let m = b.len() as f64;
    let mut i = 0;
    let mut j = 0;
    let mut d: f64 = 0.0;
    while i < a.len() && j < b.len() {
        let x = if a[i] <= b[j] { a[i] } else { b[j] };
        // Step past every tied value before comparing the CDFs.
        while i < a.len() && a[i] <= x {
            i += 1;
        }
        while j < b.len() && b[j] <= x {
            j += 1;
        }
        d = d.max((i as f64 / n - j as f64 / m).abs());
    }
    d
}

/// Two sample Kolmogorov-Smirnov test.
///
/// NaN values are ignored. Small samples, where `n * m` is at most
/// [`EXACT_KS_MAX_PRODUCT`], get the exact p-value. Larger ones use the
/// asymptotic Kolmogorov distribution with the Stephens correction.
/// If either sample is empty the statistic and p-value are NaN.
pub fn ks_2samp(a: &[f64], b: &[f64]) -> KsTest {
    let mut a: Vec<f64> = a.iter().copied().filter(|v| !v.is_nan()).collect();
    let mut b: Vec<f64> = b.iter().copied().filter(|v| !v.is_nan()).collect();
    if a.is_empty() || b.is_empty() {
        return KsTest {
            statistic: f64::NAN,
            pvalue: f64::NAN,
        };
    }
    a.sort_unstable_by(|x, y| x.partial_cmp(y).unwrap_or(Ordering::Equal));
    b.sort_unstable_by(|x, y| x.partial_cmp(y).unwrap_or(Ordering::Equal));

    let statistic = ks_statistic(&a, &b);
    if a.len() * b.len() <= EXACT_KS_MAX_PRODUCT {
        return KsTest {
            statistic,
            pvalue: exact_p_value(statistic, a.len(), b.len()),
        };
    }
    let n = a.len() as f64;
    let m = b.len() as f64;
    let en = (n * m / (n + m)).sqrt();
    let lambda = (en + 0.12 + 0.11 / en) * statistic;
    KsTest {
        statistic,
        pvalue: kolmogorov_p_value(lambda),
    }
}
