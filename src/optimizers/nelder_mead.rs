//! Nelder-Mead simplex minimization with a bounded iteration budget.
//!
//! The mixture objective is discontinuous at the feasibility boundary (it
//! jumps to the penalty sentinel), so only comparison-driven derivative-free
//! search applies. Termination is guaranteed by the iteration cap even when
//! the tolerances are never met.

use ndarray::{s, Array1, Array2, Axis};

/// Simplex search options
#[derive(Debug, Clone)]
pub struct NelderMeadOptions {
    /// Hard cap on iterations; the run stops there even without convergence
    pub max_iters: usize,
    /// Absolute tolerance on the spread of objective values across vertices
    pub fatol: f64,
    /// Absolute tolerance on the spread of vertex coordinates
    pub xatol: f64,
    /// Reflection coefficient
    pub alpha: f64,
    /// Expansion coefficient
    pub gamma: f64,
    /// Contraction coefficient
    pub rho: f64,
    /// Shrink coefficient
    pub sigma: f64,
}

impl Default for NelderMeadOptions {
    fn default() -> Self {
        Self {
            max_iters: 5000,
            fatol: 1e-4,
            xatol: 1e-4,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
        }
    }
}

/// Result of a single minimization run
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// Best point found
    pub x: Array1<f64>,
    /// Objective value at `x`
    pub fval: f64,
    /// Iterations actually used
    pub n_iters: usize,
    /// Whether both tolerances were met before the iteration cap
    pub converged: bool,
}

/// Minimize `fun` starting from `x0`.
pub fn minimize<F: Fn(&[f64]) -> f64>(
    fun: F,
    x0: &Array1<f64>,
    options: &NelderMeadOptions,
) -> NelderMeadResult {
    let ndim = x0.len();
    let (mut splx, mut fval) = init_simplex(&fun, x0);
    let mut n_iters = 0;
    let mut converged = false;

    loop {
        // Order vertices best to worst; the simplex is held column-wise
        let mut indices: Vec<_> = (0..=ndim).collect();
        indices.sort_by(|&i, &j| fval[i].total_cmp(&fval[j]));
        fval = indices.iter().map(|&i| fval[i]).collect();
        splx = splx.select(Axis(1), &indices);

        if f_spread(&fval) <= options.fatol && x_spread(&splx) <= options.xatol {
            converged = true;
            break;
        }
        if n_iters >= options.max_iters {
            break;
        }
        n_iters += 1;

        let x_best = splx.column(0).to_owned();
        let x_worst = splx.column(ndim).to_owned();
        let x_cent = splx.slice(s![.., ..ndim]).mean_axis(Axis(1)).unwrap();

        let xr = &x_cent + options.alpha * (&x_cent - &x_worst);
        let fr = fun(&xr.to_vec());

        if fr < fval[0] {
            let xe = &x_cent + options.gamma * (&xr - &x_cent);
            let fe = fun(&xe.to_vec());
            if fe < fr {
                replace_worst(&mut splx, &mut fval, &xe, fe);
            } else {
                replace_worst(&mut splx, &mut fval, &xr, fr);
            }
        } else if fr < fval[ndim - 1] {
            replace_worst(&mut splx, &mut fval, &xr, fr);
        } else if fr < fval[ndim] {
            // Contract outside, toward the reflected point
            let xc = &x_cent + options.rho * (&xr - &x_cent);
            let fc = fun(&xc.to_vec());
            if fc <= fr {
                replace_worst(&mut splx, &mut fval, &xc, fc);
            } else {
                shrink(&fun, &mut splx, &mut fval, &x_best, options.sigma);
            }
        } else {
            // Contract inside, toward the worst point
            let xc = &x_cent + options.rho * (&x_worst - &x_cent);
            let fc = fun(&xc.to_vec());
            if fc < fval[ndim] {
                replace_worst(&mut splx, &mut fval, &xc, fc);
            } else {
                shrink(&fun, &mut splx, &mut fval, &x_best, options.sigma);
            }
        }
    }

    let best = fval
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .unwrap();
    NelderMeadResult {
        x: splx.column(best.0).to_owned(),
        fval: *best.1,
        n_iters,
        converged,
    }
}

/// Initial simplex: perturb one coordinate of the start point per vertex
/// (5% of a nonzero coordinate, a small absolute step otherwise).
fn init_simplex<F: Fn(&[f64]) -> f64>(fun: &F, x0: &Array1<f64>) -> (Array2<f64>, Vec<f64>) {
    const NONZDELT: f64 = 0.05;
    const ZDELT: f64 = 0.00025;

    let ndim = x0.len();
    let mut splx = Array2::<f64>::zeros((ndim, ndim + 1));
    splx.column_mut(0).assign(x0);
    for k in 0..ndim {
        splx.column_mut(k + 1).assign(x0);
        if x0[k] != 0. {
            splx[(k, k + 1)] = x0[k] * (1. + NONZDELT);
        } else {
            splx[(k, k + 1)] = ZDELT;
        }
    }

    let fval = splx
        .columns()
        .into_iter()
        .map(|column| fun(&column.to_vec()))
        .collect();
    (splx, fval)
}

fn replace_worst(splx: &mut Array2<f64>, fval: &mut [f64], x: &Array1<f64>, fx: f64) {
    let ndim = fval.len() - 1;
    splx.slice_mut(s![.., ndim]).assign(x);
    fval[ndim] = fx;
}

fn shrink<F: Fn(&[f64]) -> f64>(
    fun: &F,
    splx: &mut Array2<f64>,
    fval: &mut [f64],
    x_best: &Array1<f64>,
    sigma: f64,
) {
    for (k, mut column) in splx.columns_mut().into_iter().enumerate().skip(1) {
        let xk = x_best + sigma * (&column - x_best);
        column.assign(&xk);
        fval[k] = fun(&xk.to_vec());
    }
}

fn f_spread(fval: &[f64]) -> f64 {
    fval.iter()
        .skip(1)
        .map(|f| (f - fval[0]).abs())
        .fold(0., f64::max)
}

fn x_spread(splx: &Array2<f64>) -> f64 {
    let x_best = splx.column(0);
    splx.columns()
        .into_iter()
        .skip(1)
        .flat_map(|column| {
            (&column - &x_best).iter().map(|d| d.abs()).collect::<Vec<_>>()
        })
        .fold(0., f64::max)
}
