use serde::{Serialize, Deserialize};

use crate::{math::matrix::Matrix, activation::activation::ActivationFunction};

/// Fully connected layer operating on whole batches (one sample per row).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dense {
    pub inputs: usize,
    pub outputs: usize,
    pub weights: Matrix,    // (inputs × outputs)
    pub biases: Matrix,     // (1 × outputs)
    pub activator: ActivationFunction,
    /// Post-activation output of the last forward pass; read by the next
    /// layer's backward step.
    #[serde(skip)]
    pub activations: Matrix,
    // pre-activation values (z = xW + b) needed for correct derivative
    #[serde(skip)]
    pre_activations: Matrix,
}

impl Dense {
    pub fn new(inputs: usize, outputs: usize, activation: ActivationFunction) -> Dense {
        // He before ReLU, Xavier otherwise; zero biases.
        let weights = match activation {
            ActivationFunction::ReLU => Matrix::he(inputs, outputs),
            _ => Matrix::xavier(inputs, outputs),
        };
        let biases = Matrix::zeros(1, outputs);

        Dense {
            inputs,
            outputs,
            weights,
            biases,
            activator: activation,
            activations: Matrix::default(),
            pre_activations: Matrix::default(),
        }
    }

    /// Forward pass for a batch; stores z and a for backprop.
    pub fn forward(&mut self, input: &Matrix) -> Matrix {
        assert_eq!(input.cols, self.inputs, "input size does not match layer input size");

        let z = (input.clone() * self.weights.clone()).add_row(&self.biases);
        let a = z.map(|x| self.activator.function(x));
        self.pre_activations = z;
        self.activations = a.clone();
        a
    }

    /// Computes batch gradients. Returns (weights_grad, biases_grad, prev_delta).
    /// `delta` is ∂L/∂a for this layer (error in activation space, batch × outputs);
    /// `inputs` is the batch that was fed into this layer. `prev_delta` is
    /// ∂L/∂a for the previous layer.
    pub fn compute_gradients(
        &self,
        delta: &Matrix,
        inputs: &Matrix,
    ) -> (Matrix, Matrix, Matrix) {
        // Use pre-activation z so that derivative(z) is computed correctly
        let act_derivative = self.pre_activations.map(|x| self.activator.derivative(x));
        // Element-wise (Hadamard) product: δ = error ⊙ act'(z)
        let layer_delta = hadamard(delta, &act_derivative);

        // Summing over the batch happens inside the matrix products; the loss
        // gradient already carries the 1/batch factor.
        let weights_grad = inputs.transpose() * layer_delta.clone();
        let biases_grad = layer_delta.column_sum();
        let prev_delta = layer_delta * self.weights.transpose();

        (weights_grad, biases_grad, prev_delta)
    }

    /// Applies pre-computed gradients scaled by lr.
    pub fn apply_gradients(&mut self, weights_grad: Matrix, biases_grad: Matrix, lr: f64) {
        self.weights = self.weights.clone() - weights_grad.map(|x| x * lr);
        self.biases = self.biases.clone() - biases_grad.map(|x| x * lr);
    }
}

/// Element-wise (Hadamard) product of two same-shape matrices.
fn hadamard(a: &Matrix, b: &Matrix) -> Matrix {
    assert_eq!(a.rows, b.rows);
    assert_eq!(a.cols, b.cols);
    let data = a.data.iter().zip(b.data.iter())
        .map(|(row_a, row_b)| {
            row_a.iter().zip(row_b.iter()).map(|(x, y)| x * y).collect()
        })
        .collect();
    Matrix::from_data(data)
}
