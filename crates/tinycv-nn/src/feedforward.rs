use rand::Rng;
use rand_distr::StandardNormal;

use crate::error::NetworkError;
use crate::matrix::{matmul, matmul_ta, matmul_tb, Matrix};

/// Configuration for a [`FeedForwardNetwork`].
///
/// All dimensions must be positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedForwardConfig {
    /// Number of input features.
    pub input_dim: usize,
    /// Number of units in the first hidden layer.
    pub hidden_dim: usize,
    /// Number of units in the second hidden layer.
    pub hidden_dim2: usize,
    /// Number of output units.
    pub output_dim: usize,
    /// Step size of the gradient descent updates.
    pub learning_rate: f64,
}

impl Default for FeedForwardConfig {
    fn default() -> Self {
        Self {
            input_dim: 2,
            hidden_dim: 64,
            hidden_dim2: 64,
            output_dim: 1,
            learning_rate: 0.1,
        }
    }
}

/// A three-layer fully-connected network with sigmoid activations, trained
/// with full-batch gradient descent and manually derived gradients.
///
/// The network owns six parameter matrices and the activations of the most
/// recent forward pass. Both [`forward`](Self::forward) and
/// [`train`](Self::train) take `&mut self`: the activation cache and the
/// weights are shared mutable state, so a single instance must not be driven
/// from multiple threads at once.
///
/// # Examples
///
/// ```
/// use tinycv_nn::feedforward::{FeedForwardConfig, FeedForwardNetwork};
/// use tinycv_nn::matrix::Matrix;
///
/// let mut network = FeedForwardNetwork::new(FeedForwardConfig::default());
///
/// let x = Matrix::from_vec(4, 2, vec![0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0]).unwrap();
/// let t = Matrix::from_vec(4, 1, vec![0.0, 1.0, 1.0, 0.0]).unwrap();
///
/// for _ in 0..1000 {
///     network.train(&x, &t).unwrap();
/// }
///
/// let predictions = network.forward(&x).unwrap();
/// assert_eq!(predictions.rows(), 4);
/// assert_eq!(predictions.cols(), 1);
/// ```
pub struct FeedForwardNetwork {
    config: FeedForwardConfig,
    w1: Matrix,
    b1: Vec<f64>,
    w2: Matrix,
    b2: Vec<f64>,
    wout: Matrix,
    bout: Vec<f64>,
    // activations of the most recent forward pass
    z2: Matrix,
    z3: Matrix,
    out: Matrix,
}

impl FeedForwardNetwork {
    /// Create a network with parameters drawn from the standard normal
    /// distribution, using the thread-local random number generator.
    pub fn new(config: FeedForwardConfig) -> Self {
        Self::new_with_rng(config, &mut rand::rng())
    }

    /// Create a network with parameters drawn from the standard normal
    /// distribution, using the given random number generator.
    pub fn new_with_rng<R: Rng>(config: FeedForwardConfig, rng: &mut R) -> Self {
        let mut randn = |rows: usize, cols: usize| {
            Matrix::from_fn(rows, cols, || rng.sample(StandardNormal))
        };

        let w1 = randn(config.input_dim, config.hidden_dim);
        let w2 = randn(config.hidden_dim, config.hidden_dim2);
        let wout = randn(config.hidden_dim2, config.output_dim);

        let mut randn_vec =
            |len: usize| (0..len).map(|_| rng.sample(StandardNormal)).collect::<Vec<f64>>();

        let b1 = randn_vec(config.hidden_dim);
        let b2 = randn_vec(config.hidden_dim2);
        let bout = randn_vec(config.output_dim);

        Self {
            config,
            w1,
            b1,
            w2,
            b2,
            wout,
            bout,
            z2: Matrix::zeros(0, config.hidden_dim),
            z3: Matrix::zeros(0, config.hidden_dim2),
            out: Matrix::zeros(0, config.output_dim),
        }
    }

    /// The configuration the network was created with.
    pub fn config(&self) -> &FeedForwardConfig {
        &self.config
    }

    /// Run a forward pass on a batch of inputs.
    ///
    /// # Arguments
    ///
    /// * `x` - The input batch with shape (N, input_dim).
    ///
    /// # Returns
    ///
    /// The network output with shape (N, output_dim); every value is in the
    /// open interval (0, 1).
    ///
    /// Side effect: the cached layer activations are overwritten, so a later
    /// [`train`](Self::train) call always recomputes them itself.
    ///
    /// # Errors
    ///
    /// Returns an error if `x` does not have `input_dim` columns.
    pub fn forward(&mut self, x: &Matrix) -> Result<Matrix, NetworkError> {
        if x.cols() != self.config.input_dim {
            return Err(NetworkError::InputDimMismatch(
                x.cols(),
                self.config.input_dim,
            ));
        }

        self.z2 = linear_sigmoid(x, &self.w1, &self.b1);
        self.z3 = linear_sigmoid(&self.z2, &self.w2, &self.b2);
        self.out = linear_sigmoid(&self.z3, &self.wout, &self.bout);

        Ok(self.out.clone())
    }

    /// Run one full-batch gradient descent step.
    ///
    /// The forward pass is recomputed first so the gradients never rely on a
    /// stale activation cache. Each layer's gradient is computed from the
    /// pre-update weights of that pass: the error is propagated through
    /// `wout` before `wout` is decremented, and through `w2` before `w2` is
    /// decremented.
    ///
    /// # Arguments
    ///
    /// * `x` - The input batch with shape (N, input_dim).
    /// * `t` - The target batch with shape (N, output_dim).
    ///
    /// # Errors
    ///
    /// Returns an error if the operand shapes do not match the network.
    pub fn train(&mut self, x: &Matrix, t: &Matrix) -> Result<(), NetworkError> {
        if t.cols() != self.config.output_dim {
            return Err(NetworkError::TargetDimMismatch(
                t.cols(),
                self.config.output_dim,
            ));
        }
        if x.rows() != t.rows() {
            return Err(NetworkError::BatchSizeMismatch(x.rows(), t.rows()));
        }

        self.forward(x)?;

        let lr = self.config.learning_rate;

        // quadratic-loss gradient through the sigmoid output
        let mut en = self.out.clone();
        for ((e, &target), &o) in en
            .as_slice_mut()
            .iter_mut()
            .zip(t.as_slice())
            .zip(self.out.as_slice())
        {
            *e = (o - target) * o * (1.0 - o);
        }

        // output layer
        let grad_wout = matmul_ta(&self.z3, &en);
        let grad_bout = en.column_sums();
        let mut grad_u2 = matmul_tb(&en, &self.wout);
        sigmoid_backward(&mut grad_u2, &self.z3);
        apply_update(&mut self.wout, &grad_wout, lr);
        apply_bias_update(&mut self.bout, &grad_bout, lr);

        // second hidden layer
        let grad_w2 = matmul_ta(&self.z2, &grad_u2);
        let grad_b2 = grad_u2.column_sums();
        let mut grad_u1 = matmul_tb(&grad_u2, &self.w2);
        sigmoid_backward(&mut grad_u1, &self.z2);
        apply_update(&mut self.w2, &grad_w2, lr);
        apply_bias_update(&mut self.b2, &grad_b2, lr);

        // first hidden layer
        let grad_w1 = matmul_ta(x, &grad_u1);
        let grad_b1 = grad_u1.column_sums();
        apply_update(&mut self.w1, &grad_w1, lr);
        apply_bias_update(&mut self.b1, &grad_b1, lr);

        Ok(())
    }
}

/// Compute `sigmoid(x * w + b)` with the bias broadcast over the batch rows.
fn linear_sigmoid(x: &Matrix, w: &Matrix, b: &[f64]) -> Matrix {
    let mut z = matmul(x, w);
    for row in z.as_slice_mut().chunks_exact_mut(b.len()) {
        for (v, bias) in row.iter_mut().zip(b.iter()) {
            *v = sigmoid(*v + bias);
        }
    }
    z
}

#[inline]
fn sigmoid(v: f64) -> f64 {
    1.0 / (1.0 + (-v).exp())
}

/// Multiply an error signal by the sigmoid derivative `a * (1 - a)` of the
/// cached activation.
fn sigmoid_backward(grad: &mut Matrix, activation: &Matrix) {
    for (g, &a) in grad.as_slice_mut().iter_mut().zip(activation.as_slice()) {
        *g *= a * (1.0 - a);
    }
}

fn apply_update(weights: &mut Matrix, grad: &Matrix, lr: f64) {
    for (w, &g) in weights.as_slice_mut().iter_mut().zip(grad.as_slice()) {
        *w -= lr * g;
    }
}

fn apply_bias_update(bias: &mut [f64], grad: &[f64], lr: f64) {
    for (b, &g) in bias.iter_mut().zip(grad.iter()) {
        *b -= lr * g;
    }
}
